use crate::{buffer::RecordBuffer, decode::HitDecoder, producer::status::SessionStatus};
use connectors::adapter::ScrollClient;
use engine_core::{
    progress::ReadProgress,
    scroll::cursor::{CursorState, ScrollCursor},
};
use model::records::record::Record;
use planner::query::spec::QuerySpec;
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Upper bound for the best-effort clear-scroll at the end of a session.
const RELEASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bundles construction arguments for `FetchWorker`.
pub struct FetchWorkerParams {
    pub client: Arc<dyn ScrollClient>,
    pub spec: QuerySpec,
    pub decoder: Arc<dyn HitDecoder>,
    pub buffer: Arc<RecordBuffer>,
    pub progress: ReadProgress,
    pub status_tx: watch::Sender<SessionStatus>,
    pub cancel: CancellationToken,
}

/// Drives one scroll cursor to the end and fills the record buffer.
///
/// The worker is the only writer of both the cursor and the buffer. It checks
/// for cancellation between hits, never during a scroll call.
pub struct FetchWorker {
    client: Arc<dyn ScrollClient>,
    spec: QuerySpec,
    decoder: Arc<dyn HitDecoder>,
    buffer: Arc<RecordBuffer>,
    progress: ReadProgress,
    status_tx: watch::Sender<SessionStatus>,
    cancel: CancellationToken,
}

impl FetchWorker {
    pub fn new(params: FetchWorkerParams) -> Self {
        let FetchWorkerParams {
            client,
            spec,
            decoder,
            buffer,
            progress,
            status_tx,
            cancel,
        } = params;

        FetchWorker {
            client,
            spec,
            decoder,
            buffer,
            progress,
            status_tx,
            cancel,
        }
    }

    /// Runs the session to a terminal status and publishes it.
    pub async fn run(self) -> SessionStatus {
        self.publish(SessionStatus::Running);

        let mut cursor = match ScrollCursor::open(self.client.clone(), &self.spec).await {
            Ok(cursor) => cursor,
            Err(e) => {
                error!(error = %e, "Failed to open scroll. Terminating fetch worker.");
                let status = SessionStatus::Failed(e.to_string());
                self.publish(status.clone());
                return status;
            }
        };
        self.progress.observe(&cursor);

        let status = self.pump(&mut cursor).await;

        let snapshot = self.progress.snapshot();
        info!(
            status = %status,
            hits_reported = snapshot.hits_reported,
            records_delivered = snapshot.records_delivered,
            records_buffered = snapshot.records_buffered,
            decode_failures = snapshot.decode_failures,
            batches = snapshot.batches_fetched,
            "Fetch worker finished."
        );

        // Published before the release so a slow clear-scroll never holds
        // back the terminal status.
        self.publish(status.clone());

        if tokio::time::timeout(RELEASE_TIMEOUT, cursor.release())
            .await
            .is_err()
        {
            warn!(
                timeout_ms = RELEASE_TIMEOUT.as_millis() as u64,
                "Scroll release timed out. The context expires on its own."
            );
        }

        status
    }

    async fn pump(&self, cursor: &mut ScrollCursor) -> SessionStatus {
        loop {
            if self.cancel.is_cancelled() {
                info!("Cancellation requested. Stopping fetch worker.");
                return SessionStatus::Stopped;
            }

            let next = cursor.advance().await;
            self.progress.observe(cursor);
            let Some(hit) = next else {
                return Self::final_status(cursor);
            };

            // Sequence is the hit's delivery position; decode failures leave gaps.
            let sequence = cursor.delivered() - 1;
            match self.decoder.decode(&hit) {
                Ok(record) => {
                    if !self.push(record.with_sequence(sequence)).await {
                        return SessionStatus::Stopped;
                    }
                }
                Err(e) => {
                    self.progress.increment_decode_failures(1);
                    warn!(hit_id = %hit.id, index = %hit.index, error = %e, "Skipping hit that failed to decode.");
                }
            }
        }
    }

    /// Pushes into the buffer; false if the session is being stopped.
    async fn push(&self, record: Record) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                info!("Cancellation requested while the buffer was full.");
                false
            }
            res = self.buffer.push(record) => match res {
                Ok(()) => {
                    self.progress.increment_buffered(1);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Record buffer rejected a record. Stopping fetch worker.");
                    false
                }
            },
        }
    }

    fn final_status(cursor: &ScrollCursor) -> SessionStatus {
        match cursor.state() {
            CursorState::Failed => SessionStatus::Failed(
                cursor
                    .failure()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "scroll failed".to_string()),
            ),
            _ => SessionStatus::Exhausted,
        }
    }

    fn publish(&self, status: SessionStatus) {
        self.status_tx.send_replace(status);
    }
}
