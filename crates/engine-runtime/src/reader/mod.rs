use crate::{error::SessionError, reader::options::ReaderOptions};
use connectors::adapter::ScrollClient;
use engine_core::progress::{ProgressSnapshot, ReadProgress};
use engine_processing::{
    buffer::RecordBuffer,
    decode::{HitDecoder, SourceDecoder},
    producer::{FetchWorker, FetchWorkerParams, SessionStatus},
};
use model::records::record::Record;
use planner::query::spec::QuerySpec;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub mod options;

struct Session {
    buffer: Arc<RecordBuffer>,
    progress: ReadProgress,
    status_rx: watch::Receiver<SessionStatus>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<SessionStatus>>>,

    /// Set when the worker was aborted or died without publishing a status.
    status_override: Mutex<Option<SessionStatus>>,
}

impl Session {
    fn status(&self) -> SessionStatus {
        if let Some(status) = lock(&self.status_override).clone() {
            return status;
        }
        self.status_rx.borrow().clone()
    }

    fn override_status(&self, status: SessionStatus) {
        *lock(&self.status_override) = Some(status);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Entry point for reading a scroll result set.
///
/// `start` launches one background fetch worker; any number of callers may
/// then `drain` concurrently. An empty drain only means nothing new arrived,
/// check `is_session_exhausted` to know whether more records can follow.
pub struct ScrollReader {
    client: Arc<dyn ScrollClient>,
    decoder: Arc<dyn HitDecoder>,
    options: ReaderOptions,
    session: OnceLock<Session>,
}

impl ScrollReader {
    pub fn new(client: Arc<dyn ScrollClient>) -> Self {
        Self {
            client,
            decoder: Arc::new(SourceDecoder),
            options: ReaderOptions::default(),
            session: OnceLock::new(),
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn HitDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Starts the session on the current tokio runtime.
    pub fn start(&self, spec: QuerySpec) -> Result<(), SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;

        let (status_tx, status_rx) = watch::channel(SessionStatus::Idle);
        let session = Session {
            buffer: Arc::new(RecordBuffer::new(self.options.buffer_capacity)),
            progress: ReadProgress::new(),
            status_rx,
            cancel: CancellationToken::new(),
            handle: Mutex::new(None),
            status_override: Mutex::new(None),
        };

        if self.session.set(session).is_err() {
            return Err(SessionError::InvalidState(
                "reader session already started".to_string(),
            ));
        }
        let session = self.session()?;

        info!(
            indexes = ?spec.indexes(),
            batch_size = spec.batch_size(),
            limit = spec.limit(),
            cluster = self.client.name(),
            "Starting read session."
        );

        let worker = FetchWorker::new(FetchWorkerParams {
            client: self.client.clone(),
            spec,
            decoder: self.decoder.clone(),
            buffer: session.buffer.clone(),
            progress: session.progress.clone(),
            status_tx,
            cancel: session.cancel.clone(),
        });
        *lock(&session.handle) = Some(runtime.spawn(worker.run()));

        Ok(())
    }

    /// Removes and returns every record buffered since the last drain, in
    /// cluster order.
    ///
    /// Records are buffered before the terminal status is published, so a
    /// drain issued after `is_session_exhausted` returned true sees the tail.
    pub fn drain(&self) -> Result<Vec<Record>, SessionError> {
        Ok(self.session()?.buffer.drain())
    }

    /// True once the worker will produce no further records.
    pub fn is_session_exhausted(&self) -> bool {
        self.session
            .get()
            .is_some_and(|session| session.status().is_terminal())
    }

    pub fn status(&self) -> SessionStatus {
        self.session
            .get()
            .map_or(SessionStatus::Idle, Session::status)
    }

    /// Reason of a failed session.
    pub fn failure(&self) -> Option<String> {
        match self.status() {
            SessionStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn hits_reported(&self) -> u64 {
        self.session
            .get()
            .map_or(0, |session| session.progress.hits_reported())
    }

    pub fn records_delivered(&self) -> u64 {
        self.session
            .get()
            .map_or(0, |session| session.progress.records_delivered())
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.session
            .get()
            .map(|session| session.progress.snapshot())
            .unwrap_or_default()
    }

    /// Waits until the worker reaches a terminal status.
    pub async fn wait_finished(&self) -> Result<SessionStatus, SessionError> {
        let session = self.session()?;
        let mut status_rx = session.status_rx.clone();

        let finished = status_rx
            .wait_for(SessionStatus::is_terminal)
            .await
            .map(|status| status.clone());

        match finished {
            Ok(status) => Ok(status),
            // The worker is gone without publishing a terminal status.
            Err(_) => {
                let status = session.status();
                if status.is_terminal() {
                    return Ok(status);
                }
                let status =
                    SessionStatus::Failed("fetch worker terminated unexpectedly".to_string());
                session.override_status(status.clone());
                Ok(status)
            }
        }
    }

    /// Stops the session.
    ///
    /// The worker gets `shutdown_grace` to wind down, after which buffered
    /// records stay drainable. Past the grace period the worker is aborted and
    /// the buffer discarded. Stopping an already stopped reader returns the
    /// final status again.
    pub async fn stop(&self) -> Result<SessionStatus, SessionError> {
        let session = self.session()?;
        session.cancel.cancel();

        let Some(mut handle) = lock(&session.handle).take() else {
            return Ok(session.status());
        };

        let grace = self.options.shutdown_grace;
        let status = match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(status)) => {
                session.buffer.close();
                status
            }
            Ok(Err(e)) => {
                error!(error = %e, "Fetch worker terminated abnormally.");
                let status = SessionStatus::Failed(e.to_string());
                session.override_status(status.clone());
                session.buffer.close();
                status
            }
            // Already finished and only releasing the scroll: keep the result.
            Err(_) if session.status().is_terminal() => {
                handle.abort();
                session.buffer.close();
                session.status()
            }
            Err(_) => {
                session.override_status(SessionStatus::Stopped);
                handle.abort();
                let dropped = session.buffer.discard();
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    dropped,
                    "Fetch worker did not stop within the grace period. Aborted."
                );
                SessionStatus::Stopped
            }
        };

        info!(status = %status, "Read session stopped.");
        Ok(status)
    }

    fn session(&self) -> Result<&Session, SessionError> {
        self.session
            .get()
            .ok_or_else(|| SessionError::InvalidState("reader session not started".to_string()))
    }
}

impl Drop for ScrollReader {
    fn drop(&mut self) {
        if let Some(session) = self.session.get() {
            session.cancel.cancel();
        }
    }
}
