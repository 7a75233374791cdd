//! Destination value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

static HAS_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]").expect("Failed to compile letter regex"));

/// Inputs people type into the destination box that are never places.
const NOT_PLACES: &[&str] = &[
    "hello", "hi", "test", "testing", "abc", "xyz", "sample", "example", "demo", "asdf", "qwerty",
    "password", "admin", "user", "name", "word", "paper", "book", "table", "chair", "computer",
    "phone", "car", "house", "dog", "cat", "bird", "tree", "water", "food", "coffee", "bread",
];

/// A validated, trimmed destination name.
///
/// The original casing is kept for display; use
/// [`CacheKey::trip`](crate::cache::CacheKey::trip) to fingerprint it.
///
/// # Example
///
/// ```
/// use trip_planner::domain::Destination;
///
/// let dest = Destination::parse("  Paris ").unwrap();
/// assert_eq!(dest.as_str(), "Paris");
/// assert!(Destination::parse("coffee").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination(String);

impl Destination {
    /// Validate and trim a destination name.
    ///
    /// # Errors
    ///
    /// - `DestinationTooShort` if fewer than two characters remain after trimming
    /// - `NotAPlace` for placeholder words such as "test" or "coffee"
    /// - `DigitsOnly` for inputs like "12 34"
    /// - `NoLetters` when no ASCII letter is present
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if trimmed.chars().count() < 2 {
            return Err(ValidationError::DestinationTooShort);
        }

        if NOT_PLACES.contains(&trimmed.to_lowercase().as_str()) {
            return Err(ValidationError::NotAPlace(trimmed.to_string()));
        }

        let compact: String = trimmed.chars().filter(|c| *c != ' ').collect();
        if !compact.is_empty() && compact.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::DigitsOnly);
        }

        if !HAS_LETTER.is_match(trimmed) {
            return Err(ValidationError::NoLetters);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get the destination as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for Destination {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Destination {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
