use serde::{Deserialize, Serialize};

/// One web search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,

    /// Body text, at most [`SearchHit::MAX_SNIPPET_CHARS`] characters
    pub snippet: String,

    pub url: String,
}

impl SearchHit {
    pub const MAX_SNIPPET_CHARS: usize = 200;

    /// Build a hit, truncating the snippet on a character boundary.
    pub fn new(title: impl Into<String>, snippet: &str, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.chars().take(Self::MAX_SNIPPET_CHARS).collect(),
            url: url.into(),
        }
    }
}

/// Outcome of a single web search, successful or not.
///
/// Failed searches carry curated `fallback` activities instead of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub success: bool,
    pub query: String,
    pub results: Vec<SearchHit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback: Vec<Activity>,
}

impl SearchOutcome {
    /// Successful search.
    pub fn found(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        Self {
            success: true,
            query: query.into(),
            results,
            error: None,
            fallback: Vec::new(),
        }
    }

    /// Failed search with fallback data.
    pub fn failed(query: impl Into<String>, error: impl Into<String>, fallback: Vec<Activity>) -> Self {
        Self {
            success: false,
            query: query.into(),
            results: Vec::new(),
            error: Some(error.into()),
            fallback,
        }
    }

    /// Number of live results.
    pub fn count(&self) -> usize {
        self.results.len()
    }
}

/// Something to do at a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub description: String,

    /// Source URL for search-derived activities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Category such as "museum" or "landmark"
    #[serde(rename = "type")]
    pub kind: String,
}

impl Activity {
    /// Curated activity without a source URL.
    pub fn curated(name: &str, description: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            source: None,
            kind: kind.to_string(),
        }
    }
}

/// Activities found for a destination and optional category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySearch {
    pub destination: String,
    pub activity_type: String,
    pub activities: Vec<Activity>,

    /// False when `activities` came from curated fallback data
    pub search_successful: bool,
}

impl ActivitySearch {
    /// Number of activities.
    pub fn count(&self) -> usize {
        self.activities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncated_on_char_boundary() {
        let long = "é".repeat(300);
        let hit = SearchHit::new("t", &long, "https://example.com");
        assert_eq!(hit.snippet.chars().count(), SearchHit::MAX_SNIPPET_CHARS);
    }

    #[test]
    fn test_activity_kind_serialized_as_type() {
        let activity = Activity::curated("Louvre Museum", "Art museum", "museum");
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "museum");
        assert!(json.get("source").is_none());
    }

    #[test]
    fn test_failed_outcome_shape() {
        let outcome = SearchOutcome::failed(
            "paris museums",
            "Request timeout",
            vec![Activity::curated("City Center", "Explore", "general")],
        );
        assert!(!outcome.success);
        assert_eq!(outcome.count(), 0);
        assert_eq!(outcome.fallback.len(), 1);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["error"], "Request timeout");
    }
}
