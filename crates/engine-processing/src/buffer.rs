use crate::error::BufferError;
use model::records::record::Record;
use std::{
    pin::pin,
    sync::{Mutex, MutexGuard, PoisonError},
};
use tokio::sync::Notify;
use tracing::trace;

pub const DEFAULT_BUFFER_CAPACITY: usize = 10_000;

#[derive(Debug, Default)]
struct Queue {
    records: Vec<Record>,
    closed: bool,
}

/// Bounded FIFO between the fetch worker and readers.
///
/// One writer pushes, any number of readers drain. `drain` swaps the whole
/// backing vector out under the lock, so every pushed record is returned by
/// exactly one drain and in push order.
#[derive(Debug)]
pub struct RecordBuffer {
    queue: Mutex<Queue>,
    capacity: usize,
    space: Notify,
}

impl RecordBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(Queue::default()),
            capacity: capacity.max(1),
            space: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a record, waiting while the buffer is full.
    pub async fn push(&self, record: Record) -> Result<(), BufferError> {
        loop {
            // Register for wake-ups before checking, so a drain between the
            // check and the await is not missed.
            let mut notified = pin!(self.space.notified());
            notified.as_mut().enable();

            {
                let mut queue = self.lock();
                if queue.closed {
                    return Err(BufferError::Closed);
                }
                if queue.records.len() < self.capacity {
                    queue.records.push(record);
                    return Ok(());
                }
            }

            trace!(capacity = self.capacity, "Record buffer full. Waiting for a drain.");
            notified.await;
        }
    }

    /// Removes and returns everything currently buffered.
    pub fn drain(&self) -> Vec<Record> {
        let drained = std::mem::take(&mut self.lock().records);
        if !drained.is_empty() {
            self.space.notify_waiters();
        }
        drained
    }

    /// Rejects further pushes. Buffered records stay drainable.
    pub fn close(&self) {
        self.lock().closed = true;
        self.space.notify_waiters();
    }

    /// Closes the buffer and drops its contents, returning how many were dropped.
    pub fn discard(&self) -> usize {
        let dropped = {
            let mut queue = self.lock();
            queue.closed = true;
            std::mem::take(&mut queue.records).len()
        };
        self.space.notify_waiters();
        dropped
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RecordBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::{sync::Arc, time::Duration};

    fn record(n: u64) -> Record {
        Record::new(&n.to_string(), "activity", json!({ "n": n })).with_sequence(n)
    }

    fn sequences(records: &[Record]) -> Vec<u64> {
        records.iter().map(|r| r.sequence).collect()
    }

    #[tokio::test]
    async fn drain_returns_in_push_order_and_empties() {
        let buffer = RecordBuffer::new(10);
        for n in 0..3 {
            buffer.push(record(n)).await.unwrap();
        }

        assert_eq!(sequences(&buffer.drain()), vec![0, 1, 2]);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
        assert!(buffer.drain().is_empty());
    }

    #[tokio::test]
    async fn full_buffer_blocks_until_drained() {
        let buffer = Arc::new(RecordBuffer::new(2));
        buffer.push(record(0)).await.unwrap();
        buffer.push(record(1)).await.unwrap();

        let writer = {
            let buffer = buffer.clone();
            tokio::spawn(async move { buffer.push(record(2)).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!writer.is_finished());
        assert_eq!(buffer.len(), 2);

        assert_eq!(sequences(&buffer.drain()), vec![0, 1]);
        writer.await.unwrap().unwrap();
        assert_eq!(sequences(&buffer.drain()), vec![2]);
    }

    #[tokio::test]
    async fn close_rejects_pushes_but_keeps_contents() {
        let buffer = RecordBuffer::new(4);
        buffer.push(record(0)).await.unwrap();
        buffer.close();

        assert_eq!(buffer.push(record(1)).await, Err(BufferError::Closed));
        assert_eq!(sequences(&buffer.drain()), vec![0]);
    }

    #[tokio::test]
    async fn close_wakes_a_blocked_writer() {
        let buffer = Arc::new(RecordBuffer::new(1));
        buffer.push(record(0)).await.unwrap();

        let writer = {
            let buffer = buffer.clone();
            tokio::spawn(async move { buffer.push(record(1)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(buffer.discard(), 1);
        assert_eq!(writer.await.unwrap(), Err(BufferError::Closed));
        assert!(buffer.drain().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_drains_see_every_record_once() {
        const TOTAL: u64 = 5_000;
        let buffer = Arc::new(RecordBuffer::new(64));

        let writer = {
            let buffer = buffer.clone();
            tokio::spawn(async move {
                for n in 0..TOTAL {
                    buffer.push(record(n)).await.unwrap();
                }
                buffer.close();
            })
        };

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let buffer = buffer.clone();
                tokio::spawn(async move {
                    let mut seen = Vec::new();
                    loop {
                        let closed = buffer.is_closed();
                        let batch = buffer.drain();
                        // Within one drain the order is the push order.
                        assert!(batch.windows(2).all(|w| w[0].sequence < w[1].sequence));
                        seen.extend(sequences(&batch));
                        if closed {
                            break;
                        }
                        tokio::task::yield_now().await;
                    }
                    seen
                })
            })
            .collect();

        writer.await.unwrap();
        let mut all = Vec::new();
        for reader in readers {
            all.extend(reader.await.unwrap());
        }
        all.sort_unstable();

        assert_eq!(all, (0..TOTAL).collect::<Vec<_>>());
    }
}
