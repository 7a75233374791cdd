//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
///
/// The messages are shown to the end user verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Destination is empty or shorter than two characters.
    DestinationTooShort,

    /// Destination is a placeholder or common noun rather than a place.
    NotAPlace(String),

    /// Destination consists only of digits.
    DigitsOnly,

    /// Destination has no ASCII letters at all.
    NoLetters,

    /// Duration outside 1..=30 days.
    InvalidDuration(i64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DestinationTooShort => write!(
                f,
                "Invalid destination. Please provide a valid destination name."
            ),
            Self::NotAPlace(name) => write!(
                f,
                "'{}' is not a valid place name. Please enter a city or destination (e.g., Paris, Tokyo, New York).",
                name
            ),
            Self::DigitsOnly => write!(
                f,
                "Destination cannot be only numbers. Please enter a place name."
            ),
            Self::NoLetters => write!(
                f,
                "Destination must contain letters. Please enter a valid place name."
            ),
            Self::InvalidDuration(_) => {
                write!(f, "Duration must be an integer between 1 and 30 days.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
