use async_trait::async_trait;
use connectors::{adapter::ScrollClient, error::AdapterError};
use engine_runtime::reader::ScrollReader;
use model::{
    pagination::scroll::{ScrollId, ScrollPage, ScrollRequest},
    records::{hit::Hit, record::Record},
};
use planner::query::spec::QuerySpec;
use serde_json::json;
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const INDEX: &str = "activity";
pub const SCROLL_ID: &str = "c2Nyb2xsLWNvbnRleHQtMQ==";

/// One scripted answer of the mock cluster.
pub enum Step {
    Page(Vec<Hit>),
    Fail(String),
    /// Never answers.
    Hang,
}

/// In-memory scroll cluster answering open/continue calls from a script.
/// Once the script runs out every call returns an empty page.
pub struct MockCluster {
    steps: Mutex<VecDeque<Step>>,
    total_hits: u64,
    opens: AtomicUsize,
    continues: AtomicUsize,
    clears: AtomicUsize,
    requests: Mutex<Vec<ScrollRequest>>,
}

impl MockCluster {
    pub fn scripted(steps: Vec<Step>, total_hits: u64) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            total_hits,
            opens: AtomicUsize::new(0),
            continues: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Pages of the given sizes holding hits `1..=N` in order.
    pub fn with_batches(sizes: &[usize]) -> Arc<Self> {
        let total: usize = sizes.iter().sum();
        Self::scripted(batches(sizes), total as u64)
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn continues(&self) -> usize {
        self.continues.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Open and continue calls together.
    pub fn calls(&self) -> usize {
        self.opens() + self.continues()
    }

    pub fn last_request(&self) -> Option<ScrollRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    async fn next_page(&self) -> Result<ScrollPage, AdapterError> {
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Page(hits)) => Ok(ScrollPage::new(
                Some(ScrollId::new(SCROLL_ID)),
                hits,
                self.total_hits,
            )),
            Some(Step::Fail(reason)) => Err(AdapterError::Generic(reason)),
            Some(Step::Hang) => {
                std::future::pending::<()>().await;
                Err(AdapterError::Generic("unreachable".to_string()))
            }
            None => Ok(ScrollPage::new(
                Some(ScrollId::new(SCROLL_ID)),
                Vec::new(),
                self.total_hits,
            )),
        }
    }
}

#[async_trait]
impl ScrollClient for MockCluster {
    async fn open_scroll(&self, request: &ScrollRequest) -> Result<ScrollPage, AdapterError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.next_page().await
    }

    async fn continue_scroll(
        &self,
        scroll_id: &ScrollId,
        _keep_alive: Duration,
    ) -> Result<ScrollPage, AdapterError> {
        assert_eq!(scroll_id.as_str(), SCROLL_ID);
        self.continues.fetch_add(1, Ordering::SeqCst);
        self.next_page().await
    }

    async fn clear_scroll(&self, _scroll_id: &ScrollId) -> Result<(), AdapterError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn hit(n: usize) -> Hit {
    Hit::new(INDEX, &n.to_string(), json!({ "n": n, "lang": "en" }))
}

/// Page steps of the given sizes, numbering hits from 1.
pub fn batches(sizes: &[usize]) -> Vec<Step> {
    let mut next = 0;
    sizes
        .iter()
        .map(|&size| {
            let hits = (next + 1..=next + size).map(hit).collect();
            next += size;
            Step::Page(hits)
        })
        .collect()
}

pub fn spec(batch: i64, limit: i64) -> QuerySpec {
    QuerySpec::builder()
        .index(INDEX)
        .batch_size(batch)
        .limit(limit)
        .build()
        .unwrap()
}

pub fn ids(records: &[Record]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

pub fn numbered(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    range.map(|n| n.to_string()).collect()
}

/// Drains until the session reports exhaustion and returns everything seen.
pub async fn drain_until_finished(reader: &ScrollReader) -> Vec<Record> {
    let mut all = Vec::new();
    loop {
        let finished = reader.is_session_exhausted();
        all.extend(reader.drain().unwrap());
        if finished {
            return all;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
