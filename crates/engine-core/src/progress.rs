use crate::scroll::cursor::ScrollCursor;
use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerProgress {
    hits_reported: AtomicU64,
    records_delivered: AtomicU64,
    records_buffered: AtomicU64,
    decode_failures: AtomicU64,
    batches_fetched: AtomicU64,
}

/// Read-side progress counters of a scroll session.
///
/// Written by the fetch worker only; any clone can read.
#[derive(Debug, Clone, Default)]
pub struct ReadProgress {
    inner: Arc<InnerProgress>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    /// Total hits as last reported by the cluster.
    pub hits_reported: u64,
    /// Hits handed out by the cursor.
    pub records_delivered: u64,
    /// Decoded records pushed into the buffer.
    pub records_buffered: u64,
    pub decode_failures: u64,
    pub batches_fetched: u64,
}

impl ProgressSnapshot {
    /// Share of reported hits read so far, in `[0, 1]`. Zero until the
    /// cluster has reported a count.
    pub fn read_percent(&self) -> f64 {
        if self.hits_reported == 0 {
            return 0.0;
        }
        (self.records_delivered as f64 / self.hits_reported as f64).min(1.0)
    }

    /// Reported hits not yet delivered.
    pub fn remaining(&self) -> u64 {
        self.hits_reported.saturating_sub(self.records_delivered)
    }
}

impl ReadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the cursor's counters.
    pub fn observe(&self, cursor: &ScrollCursor) {
        self.inner
            .hits_reported
            .store(cursor.total_hits(), Ordering::Relaxed);
        self.inner
            .records_delivered
            .store(cursor.delivered(), Ordering::Relaxed);
        self.inner
            .batches_fetched
            .store(cursor.batches_fetched(), Ordering::Relaxed);
    }

    pub fn increment_buffered(&self, count: u64) {
        self.inner
            .records_buffered
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_decode_failures(&self, count: u64) {
        self.inner
            .decode_failures
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn hits_reported(&self) -> u64 {
        self.inner.hits_reported.load(Ordering::Relaxed)
    }

    pub fn records_delivered(&self) -> u64 {
        self.inner.records_delivered.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            hits_reported: self.inner.hits_reported.load(Ordering::Relaxed),
            records_delivered: self.inner.records_delivered.load(Ordering::Relaxed),
            records_buffered: self.inner.records_buffered.load(Ordering::Relaxed),
            decode_failures: self.inner.decode_failures.load(Ordering::Relaxed),
            batches_fetched: self.inner.batches_fetched.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::cursor::tests::{ScriptedCluster, spec};

    #[tokio::test]
    async fn observes_cursor_counters() {
        let cluster = ScriptedCluster::with_batches(&[2, 2]);
        let mut cursor = ScrollCursor::open(cluster, &spec(2, -1)).await.unwrap();
        let progress = ReadProgress::new();

        cursor.advance().await;
        cursor.advance().await;
        cursor.advance().await;
        progress.observe(&cursor);

        let snapshot = progress.clone().snapshot();
        assert_eq!(snapshot.hits_reported, 4);
        assert_eq!(snapshot.records_delivered, 3);
        assert_eq!(snapshot.batches_fetched, 2);
        assert_eq!(snapshot.remaining(), 1);
        assert!((snapshot.read_percent() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_progress_reads_zero_percent() {
        let snapshot = ReadProgress::new().snapshot();
        assert_eq!(snapshot.read_percent(), 0.0);
        assert_eq!(snapshot.remaining(), 0);
    }
}
