use engine_processing::producer::SessionStatus;
use engine_runtime::{error::SessionError, reader::ScrollReader};
use model::records::record::Record;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Stop request for a running read, raised by SIGINT or SIGTERM.
#[derive(Clone, Default)]
pub struct StopRequest {
    token: CancellationToken,
}

impl StopRequest {
    /// Creates a request that is raised by the first SIGINT or SIGTERM.
    pub fn on_signals() -> Self {
        let request = Self::default();
        let token = request.token.clone();

        tokio::spawn(async move {
            tokio::select! {
                signal = wait_for_signal() => {
                    info!(signal, "Signal received. Stopping the read session.");
                    token.cancel();
                }
                _ = token.cancelled() => {}
            }
        });

        request
    }

    pub fn raise(&self) {
        self.token.cancel();
    }

    pub fn is_raised(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn raised(&self) {
        self.token.cancelled().await
    }

    /// Stops the reader if the request was raised and hands back whatever
    /// the reader still holds.
    pub async fn settle(&self, reader: &ScrollReader) -> Result<Vec<Record>, SessionError> {
        if !self.is_raised() {
            return Ok(Vec::new());
        }

        let status = reader.stop().await?;
        let tail = reader.drain()?;
        info!(status = %status, records = tail.len(), "Read session settled after stop request.");
        Ok(tail)
    }

    /// True when the read ended because of this request rather than on its own.
    pub fn interrupted(&self, status: &SessionStatus) -> bool {
        self.is_raised() && *status == SessionStatus::Stopped
    }
}

async fn wait_for_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT.");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
