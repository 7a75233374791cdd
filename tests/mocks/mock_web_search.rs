use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trip_planner::client::WebSearch;
use trip_planner::error::{ApiError, ApiResult};
use trip_planner::models::SearchHit;

/// Mock web search for testing.
///
/// Returns hits registered for a query substring, and tracks how often each
/// exact query was executed so tests can verify cache behavior.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockWebSearch {
    hits: Arc<Mutex<Vec<(String, Vec<SearchHit>)>>>,
    failing: Arc<Mutex<bool>>,
    delay: Arc<Mutex<Option<Duration>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockWebSearch {
    /// Create a search backend that finds nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `hits` for any query containing `needle` (case-insensitive).
    pub fn add_hits(&self, needle: &str, hits: Vec<SearchHit>) {
        self.hits.lock().unwrap().push((needle.to_lowercase(), hits));
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Sleep before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Times `query` was executed.
    pub fn get_call_count(&self, query: &str) -> usize {
        *self.call_counts.lock().unwrap().get(query).unwrap_or(&0)
    }

    /// Executions across all queries.
    pub fn total_calls(&self) -> usize {
        self.call_counts.lock().unwrap().values().sum()
    }

    fn track_call(&self, query: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(query.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl WebSearch for MockWebSearch {
    async fn search(&self, query: &str, max_results: usize) -> ApiResult<Vec<SearchHit>> {
        self.track_call(query);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.failing.lock().unwrap() {
            return Err(ApiError::RateLimitExceeded);
        }

        let lowered = query.to_lowercase();
        let hits = self
            .hits
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| lowered.contains(needle.as_str()))
            .map(|(_, hits)| hits.iter().take(max_results).cloned().collect())
            .unwrap_or_default();
        Ok(hits)
    }
}
