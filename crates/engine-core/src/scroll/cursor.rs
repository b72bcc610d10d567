use crate::error::ProtocolError;
use connectors::adapter::ScrollClient;
use model::{
    pagination::scroll::{ScrollId, ScrollPage},
    records::hit::Hit,
};
use planner::query::{request::plan_scroll, spec::QuerySpec};
use std::{collections::VecDeque, fmt, sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Uninitialized,
    Active,
    /// The cluster returned an empty batch. Terminal.
    Exhausted,
    /// A scroll call failed. Terminal.
    Failed,
}

impl CursorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CursorState::Exhausted | CursorState::Failed)
    }
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CursorState::Uninitialized => "Uninitialized",
            CursorState::Active => "Active",
            CursorState::Exhausted => "Exhausted",
            CursorState::Failed => "Failed",
        })
    }
}

/// One outstanding scroll over the cluster.
///
/// Hands out hits one at a time and fetches the next batch when the current
/// one is used up. Stops for good once the cluster returns an empty batch,
/// a call fails, or `limit` hits have been delivered.
pub struct ScrollCursor {
    client: Arc<dyn ScrollClient>,
    keep_alive: Duration,
    limit: u64,

    scroll_id: Option<ScrollId>,
    batch: VecDeque<Hit>,
    position: usize,
    state: CursorState,

    total_hits: u64,
    delivered: u64,
    batches_fetched: u64,
    failure: Option<ProtocolError>,
}

impl ScrollCursor {
    fn new(client: Arc<dyn ScrollClient>, keep_alive: Duration, limit: u64) -> Self {
        Self {
            client,
            keep_alive,
            limit,
            scroll_id: None,
            batch: VecDeque::new(),
            position: 0,
            state: CursorState::Uninitialized,
            total_hits: 0,
            delivered: 0,
            batches_fetched: 0,
            failure: None,
        }
    }

    /// Opens the scroll and loads the first batch.
    ///
    /// A zero limit never touches the cluster.
    pub async fn open(
        client: Arc<dyn ScrollClient>,
        spec: &QuerySpec,
    ) -> Result<Self, ProtocolError> {
        let mut cursor = Self::new(client, spec.scroll_timeout(), spec.limit());

        if spec.limit() == 0 {
            info!("Read limit is zero. Skipping scroll.");
            cursor.state = CursorState::Exhausted;
            return Ok(cursor);
        }

        let request = plan_scroll(spec);
        debug!(
            cluster = cursor.client.name(),
            indexes = ?request.indexes,
            size = request.size,
            filter = ?request.filter,
            "Opening scroll."
        );

        let page = cursor
            .client
            .open_scroll(&request)
            .await
            .map_err(|source| ProtocolError::Open {
                indexes: request.indexes.clone(),
                source,
            })?;

        cursor.accept(page);
        info!(
            total_hits = cursor.total_hits,
            first_batch = cursor.batch.len(),
            "Scroll opened."
        );
        Ok(cursor)
    }

    /// Returns the next hit, fetching a new batch if needed.
    ///
    /// Returns `None` once the cursor is exhausted. A failing scroll call moves
    /// the cursor to `Failed`; the error is kept in `failure()`.
    pub async fn advance(&mut self) -> Option<Hit> {
        if self.is_exhausted() {
            return None;
        }

        if self.batch.is_empty() {
            self.fetch_next().await;
            if self.state != CursorState::Active {
                return None;
            }
        }

        let hit = self.batch.pop_front()?;
        self.position += 1;
        self.delivered += 1;
        Some(hit)
    }

    async fn fetch_next(&mut self) {
        let Some(scroll_id) = self.scroll_id.clone() else {
            self.fail(ProtocolError::MissingScrollId);
            return;
        };

        match self.client.continue_scroll(&scroll_id, self.keep_alive).await {
            Ok(page) => {
                self.accept(page);
                debug!(
                    batch_no = self.batches_fetched,
                    hits = self.batch.len(),
                    total_hits = self.total_hits,
                    delivered = self.delivered,
                    "Fetched batch."
                );
            }
            Err(source) => self.fail(ProtocolError::Continue {
                delivered: self.delivered,
                source,
            }),
        }
    }

    fn accept(&mut self, page: ScrollPage) {
        self.batches_fetched += 1;
        self.total_hits = page.total_hits;
        if let Some(scroll_id) = page.scroll_id {
            self.scroll_id = Some(scroll_id);
        }

        self.batch = page.hits.into();
        self.position = 0;
        self.state = if self.batch.is_empty() {
            info!(delivered = self.delivered, "Scroll exhausted.");
            CursorState::Exhausted
        } else {
            CursorState::Active
        };
    }

    fn fail(&mut self, err: ProtocolError) {
        error!(error = %err, delivered = self.delivered, "Unexpected scrolling error.");
        self.state = CursorState::Failed;
        self.batch.clear();
        self.failure = Some(err);
    }

    /// True once the scroll is finished, failed, or the limit is reached.
    pub fn is_exhausted(&self) -> bool {
        self.state.is_terminal() || self.delivered >= self.limit
    }

    /// Releases the server-side scroll context. Failures are only logged.
    pub async fn release(&mut self) {
        let Some(scroll_id) = self.scroll_id.take() else {
            return;
        };

        match self.client.clear_scroll(&scroll_id).await {
            Ok(()) => debug!(scroll_id = %scroll_id, "Scroll context released."),
            Err(e) => warn!(scroll_id = %scroll_id, error = %e, "Failed to release scroll context."),
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn failure(&self) -> Option<&ProtocolError> {
        self.failure.as_ref()
    }

    pub fn scroll_id(&self) -> Option<&ScrollId> {
        self.scroll_id.as_ref()
    }

    /// Position within the current batch.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn batches_fetched(&self) -> u64 {
        self.batches_fetched
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}
