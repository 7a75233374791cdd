//! Domain value objects and types.
//!
//! Type-safe wrappers for the two user inputs that drive a plan: the
//! destination and the trip length. Both are validated at construction so
//! nothing downstream (caches included) ever sees rejected input.

pub mod destination;
pub mod duration;
pub mod errors;

pub use destination::Destination;
pub use duration::TripDuration;
pub use errors::ValidationError;
