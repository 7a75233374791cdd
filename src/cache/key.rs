//! Request fingerprints.
//!
//! A [`CacheKey`] is built only from normalized parts, so `"Paris "` and
//! `"paris"` always land on the same entry.

use std::borrow::Borrow;
use std::fmt;

/// Lower-case `text`, trim it, and collapse internal whitespace runs to a
/// single space.
///
/// ```
/// use trip_planner::cache::normalize_text;
///
/// assert_eq!(normalize_text("  New   York "), "new york");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A normalized cache key.
///
/// Parts are normalized with [`normalize_text`] and joined with `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from arbitrary parts.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = parts
            .into_iter()
            .map(|part| normalize_text(part.as_ref()))
            .collect();
        Self(parts.join("_"))
    }

    /// Key for a free-text query with a result limit.
    ///
    /// ```
    /// use trip_planner::cache::CacheKey;
    ///
    /// assert_eq!(CacheKey::query(" Eiffel Tower", 2).as_str(), "eiffel tower_2");
    /// ```
    pub fn query(text: &str, limit: usize) -> Self {
        Self::from_parts([text, limit.to_string().as_str()])
    }

    /// Key for a trip plan: place name plus duration in days.
    pub fn trip(destination: &str, days: u32) -> Self {
        Self::from_parts([destination, days.to_string().as_str()])
    }

    /// Key for an activity search, with `general` standing in for no type.
    pub fn activities(destination: &str, activity_type: Option<&str>) -> Self {
        Self::from_parts([
            "activities",
            destination,
            activity_type.unwrap_or("general"),
        ])
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Hash/Eq agree with `str`, so lookups by `&str` are sound.
impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
