use crate::error::AdapterError;
use async_trait::async_trait;
use model::pagination::scroll::{ScrollId, ScrollPage, ScrollRequest};
use std::time::Duration;

/// Cluster side of the scroll protocol.
///
/// Calls are issued strictly one after another by a single reader; each
/// continuation depends on the scroll id returned by the previous page.
#[async_trait]
pub trait ScrollClient: Send + Sync {
    /// Runs the search and opens a scroll context, returning the first batch.
    async fn open_scroll(&self, request: &ScrollRequest) -> Result<ScrollPage, AdapterError>;

    /// Fetches the next batch of an open scroll. An empty page means the
    /// result set is used up.
    async fn continue_scroll(
        &self,
        scroll_id: &ScrollId,
        keep_alive: Duration,
    ) -> Result<ScrollPage, AdapterError>;

    /// Releases the server-side scroll context.
    async fn clear_scroll(&self, _scroll_id: &ScrollId) -> Result<(), AdapterError> {
        Ok(())
    }

    /// Short label used in logs.
    fn name(&self) -> &str {
        "cluster"
    }
}
