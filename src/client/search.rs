//! Web search through the DuckDuckGo Instant Answer API.

use super::{build_url, map_error};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{HttpTimer, Metrics};
use crate::models::SearchHit;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Instant Answer response, reduced to the fields we read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,

    #[serde(default)]
    abstract_text: String,

    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,

    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics are either entries or named groups of entries.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    Entry {
        #[serde(rename = "Text", default)]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
}

/// HTTP client for DuckDuckGo search.
#[derive(Clone)]
pub struct DuckDuckGoClient {
    base_url: String,
    agent: Arc<ureq::Agent>,
    metrics: Metrics,
}

impl DuckDuckGoClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Self {
        Self::build(config.search_api_url.clone(), config.search_timeout())
    }

    /// Create a client with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(base_url, Duration::from_secs(10))
    }

    fn build(base_url: String, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Record into a shared collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Search for `query`, returning at most `max_results` hits.
    ///
    /// The abstract (when present) comes first, followed by related topics in
    /// document order, with grouped topics flattened.
    pub fn search(&self, query: &str, max_results: usize) -> ApiResult<Vec<SearchHit>> {
        let timer = HttpTimer::new(self.metrics.clone());
        let url = build_url(
            &self.base_url,
            &format!(
                "/?q={}&format=json&no_html=1&skip_disambig=1",
                urlencoding::encode(query)
            ),
        );

        let response = match self.agent.get(&url).call() {
            Ok(response) => {
                timer.complete();
                response
            }
            Err(e) => {
                timer.complete_with_error();
                let error = map_error(e);
                tracing::warn!(query, "Search failed: {}", error);
                return Err(error);
            }
        };

        let body = response
            .into_string()
            .map_err(|e| ApiError::HttpError(e.to_string()))?;
        let answer: InstantAnswer = serde_json::from_str(&body)?;

        let hits = collect_hits(answer, max_results);
        tracing::debug!(query, hits = hits.len(), "Search completed");
        Ok(hits)
    }
}

fn collect_hits(answer: InstantAnswer, max_results: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    if !answer.abstract_text.is_empty() {
        hits.push(SearchHit::new(
            answer.heading,
            &answer.abstract_text,
            answer.abstract_url,
        ));
    }

    let mut stack: Vec<RelatedTopic> = answer.related_topics.into_iter().rev().collect();
    while let Some(topic) = stack.pop() {
        if hits.len() >= max_results {
            break;
        }
        match topic {
            RelatedTopic::Group { topics } => stack.extend(topics.into_iter().rev()),
            RelatedTopic::Entry { text, first_url } => {
                if text.is_empty() && first_url.is_empty() {
                    continue;
                }
                let title = title_from_url(&first_url);
                let snippet = text
                    .strip_prefix(title.as_str())
                    .map(|rest| rest.trim_start_matches([' ', '-']))
                    .unwrap_or(text.as_str());
                hits.push(SearchHit::new(title, snippet, first_url));
            }
        }
    }

    hits.truncate(max_results);
    hits
}

/// `https://duckduckgo.com/Eiffel_Tower` -> `Eiffel Tower`.
fn title_from_url(url: &str) -> String {
    let segment = url.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    decoded.replace('_', " ")
}

impl std::fmt::Debug for DuckDuckGoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDuckGoClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
