//! TripDuration value object.

use super::errors::ValidationError;
use std::fmt;

/// Trip length in days, between [`TripDuration::MIN_DAYS`] and
/// [`TripDuration::MAX_DAYS`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripDuration(u32);

impl TripDuration {
    pub const MIN_DAYS: u32 = 1;
    pub const MAX_DAYS: u32 = 30;

    /// Validate a day count.
    ///
    /// Takes a signed value so that negative input coming from JSON is
    /// reported rather than wrapped.
    pub fn new(days: i64) -> Result<Self, ValidationError> {
        if days < i64::from(Self::MIN_DAYS) || days > i64::from(Self::MAX_DAYS) {
            return Err(ValidationError::InvalidDuration(days));
        }
        Ok(Self(days as u32))
    }

    /// Number of days.
    pub fn days(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TripDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
