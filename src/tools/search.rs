//! Web and activity search with result caching.
//!
//! Successful web searches and every activity search (including curated
//! fallbacks) are cached; failed web searches are not, so the next request
//! retries upstream.

use crate::cache::{CacheKey, CacheStats, Clock, SharedCache, SystemClock};
use crate::client::WebSearch;
use crate::config::Config;
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::models::{Activity, ActivitySearch, ActivitySection, SearchOutcome};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Activity lines included in a research report.
pub const REPORT_ACTIVITIES: usize = 5;

/// Description characters shown per report line.
pub const REPORT_DESCRIPTION_CHARS: usize = 80;

/// Concurrent searches issued by [`SearchTools::research_activities`].
const MAX_CONCURRENT_SEARCHES: usize = 4;

/// Search tools backed by a [`WebSearch`] implementation.
#[derive(Clone)]
pub struct SearchTools {
    search: Arc<dyn WebSearch>,
    web_cache: SharedCache<CacheKey, SearchOutcome>,
    activity_cache: SharedCache<CacheKey, ActivitySearch>,
    max_results: usize,
    timeout: Duration,
    metrics: Metrics,
}

impl SearchTools {
    /// Create search tools with caches sized from `config`.
    pub fn new(search: Arc<dyn WebSearch>, config: &Config) -> Self {
        Self::with_clock(search, config, Arc::new(SystemClock))
    }

    /// Create search tools whose caches read time from `clock`.
    pub fn with_clock(search: Arc<dyn WebSearch>, config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            search,
            web_cache: SharedCache::with_clock("web_search", config.search_cache(), clock.clone()),
            activity_cache: SharedCache::with_clock("activities", config.search_cache(), clock),
            max_results: config.max_search_results,
            timeout: config.search_timeout(),
            metrics: Metrics::new(),
        }
    }

    /// Record fallback and cache hit/miss counters into a shared collector.
    ///
    /// Each cache still keeps its own counters for [`CacheStats`].
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.web_cache = self.web_cache.with_metrics(metrics.clone());
        self.activity_cache = self.activity_cache.with_metrics(metrics.clone());
        self.metrics = metrics;
        self
    }

    /// Search the web, serving repeated queries from cache.
    ///
    /// Never fails: errors and timeouts produce an unsuccessful outcome
    /// carrying curated fallback activities.
    ///
    /// Queries differing only in case or spacing share an entry, so a cached
    /// outcome echoes the query as it was first requested.
    pub async fn search_web(&self, query: &str, max_results: Option<usize>) -> SearchOutcome {
        let limit = max_results.unwrap_or(self.max_results);
        let key = CacheKey::query(query, limit);

        let result = self
            .web_cache
            .get_or_try_insert_with(key, || async {
                let hits = tokio::time::timeout(self.timeout, self.search.search(query, limit))
                    .await
                    .map_err(|_| ApiError::Timeout)??;
                Ok::<_, ApiError>(SearchOutcome::found(query, hits))
            })
            .await;

        match result {
            Ok((outcome, _)) => outcome,
            Err(e) => {
                tracing::warn!(query, "Web search failed, using fallback: {}", e);
                self.metrics.record_search_fallback();
                SearchOutcome::failed(query, e.to_string(), fallback_activities(query))
            }
        }
    }

    /// Find activities at a destination, optionally of one category.
    ///
    /// Like [`search_web`](Self::search_web), a cached result keeps the
    /// destination spelling of the request that populated it.
    pub async fn search_activities(&self, destination: &str, activity_type: Option<&str>) -> ActivitySearch {
        let activity_type = activity_type.map(str::trim).filter(|t| !t.is_empty());
        let key = CacheKey::activities(destination, activity_type);

        let (result, _) = self
            .activity_cache
            .get_or_insert_with(key, || self.fetch_activities(destination, activity_type))
            .await;
        result
    }

    async fn fetch_activities(&self, destination: &str, activity_type: Option<&str>) -> ActivitySearch {
        let query = match activity_type {
            Some(kind) => format!("{} in {} travel attractions", kind, destination),
            None => format!("top attractions things to do in {} travel guide", destination),
        };
        let kind = activity_type.unwrap_or("general");

        let outcome = self.search_web(&query, None).await;
        let search_successful = outcome.success;

        let mut activities: Vec<Activity> = outcome
            .results
            .into_iter()
            .map(|hit| Activity {
                name: hit.title,
                description: hit.snippet,
                source: Some(hit.url).filter(|url| !url.is_empty()),
                kind: kind.to_string(),
            })
            .collect();

        if activities.is_empty() {
            activities = if outcome.fallback.is_empty() {
                // Search worked but found nothing
                self.metrics.record_search_fallback();
                fallback_activities(&query)
            } else {
                outcome.fallback
            };
        }

        ActivitySearch {
            destination: destination.to_string(),
            activity_type: kind.to_string(),
            activities,
            search_successful,
        }
    }

    /// Research activities for each requested category (or `general` when
    /// none are given) and summarize the top results.
    ///
    /// Categories are searched concurrently; merged activities keep request
    /// order and are de-duplicated by name.
    pub async fn research_activities(&self, destination: &str, activity_types: &[String]) -> ActivitySection {
        let requested: Vec<Option<String>> = if activity_types.is_empty() {
            vec![None]
        } else {
            activity_types.iter().cloned().map(Some).collect()
        };

        let mut searches: Vec<(usize, ActivitySearch)> = stream::iter(requested.into_iter().enumerate())
            .map(|(idx, kind)| async move {
                (idx, self.search_activities(destination, kind.as_deref()).await)
            })
            .buffer_unordered(MAX_CONCURRENT_SEARCHES)
            .collect()
            .await;
        searches.sort_by_key(|(idx, _)| *idx);

        let mut seen = HashSet::new();
        let mut activities = Vec::new();
        let mut kinds = Vec::new();
        let mut search_successful = false;

        for (_, search) in searches {
            search_successful |= search.search_successful;
            kinds.push(search.activity_type);
            for activity in search.activities {
                if seen.insert(activity.name.to_lowercase()) {
                    activities.push(activity);
                }
            }
        }

        let data = ActivitySearch {
            destination: destination.to_string(),
            activity_type: kinds.join(", "),
            activities,
            search_successful,
        };

        ActivitySection {
            research: research_report(destination, &data.activities),
            data,
        }
    }

    /// Stats for the web search cache.
    pub fn web_cache_stats(&self) -> CacheStats {
        self.web_cache.stats()
    }

    /// Stats for the activity search cache.
    pub fn activity_cache_stats(&self) -> CacheStats {
        self.activity_cache.stats()
    }

    /// Drop expired entries from both caches.
    pub fn purge_expired(&self) -> usize {
        self.web_cache.purge_expired() + self.activity_cache.purge_expired()
    }
}

/// Plain-text summary of up to five activities.
pub fn research_report(destination: &str, activities: &[Activity]) -> String {
    if activities.is_empty() {
        return format!("Popular attractions and activities in {}.", destination);
    }

    let lines: Vec<String> = activities
        .iter()
        .take(REPORT_ACTIVITIES)
        .map(|activity| {
            let description: String = activity
                .description
                .chars()
                .take(REPORT_DESCRIPTION_CHARS)
                .collect();
            format!("• {} - {}", activity.name, description)
        })
        .collect();

    format!("Top activities in {}:\n{}", destination, lines.join("\n\n"))
}

/// Curated activities for when search is unavailable.
///
/// Matches a known city anywhere in `query`, otherwise returns generic entries.
pub fn fallback_activities(query: &str) -> Vec<Activity> {
    let query = query.to_lowercase();

    if query.contains("paris") {
        vec![
            Activity::curated("Eiffel Tower", "Iconic iron lattice tower, symbol of Paris", "landmark"),
            Activity::curated("Louvre Museum", "World's largest art museum with Mona Lisa", "museum"),
            Activity::curated("Notre-Dame Cathedral", "Gothic cathedral on Île de la Cité", "landmark"),
            Activity::curated("Seine River Cruise", "Scenic boat tour along the Seine", "activity"),
            Activity::curated("Montmartre", "Artistic hilltop district with Sacré-Cœur", "neighborhood"),
        ]
    } else if query.contains("tokyo") {
        vec![
            Activity::curated("Senso-ji Temple", "Ancient Buddhist temple in Asakusa", "temple"),
            Activity::curated("Tokyo Skytree", "Tallest tower in Japan with observation decks", "landmark"),
            Activity::curated("Shibuya Crossing", "World's busiest pedestrian intersection", "landmark"),
            Activity::curated("Tsukiji Fish Market", "Famous seafood market (outer market)", "market"),
            Activity::curated("Meiji Shrine", "Shinto shrine surrounded by forest", "temple"),
        ]
    } else {
        vec![
            Activity::curated("City Center", "Explore the main city center area", "general"),
            Activity::curated("Local Museum", "Visit the main local museum", "museum"),
            Activity::curated("Historic District", "Walk through historic neighborhoods", "general"),
        ]
    }
}

impl std::fmt::Debug for SearchTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchTools")
            .field("web_cache", &self.web_cache)
            .field("activity_cache", &self.activity_cache)
            .field("max_results", &self.max_results)
            .field("timeout", &self.timeout)
            .finish()
    }
}
