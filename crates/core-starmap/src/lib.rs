//! Starmap core: identifiers, positions, and jump distances
//!
//! Pure logic with no I/O. The cache and the HTTP layer build on these types:
//!
//! - [`SystemId`] guarantees an identifier is inside the known-space range
//! - [`Coordinates`] is an opaque x/y/z position in meters
//! - [`distance`] computes the straight-line distance in meters and in-game
//!   light-years
//!
//! # Example
//!
//! ```
//! use wizard_core_starmap::{distance, Coordinates, LIGHTYEAR_IN_METERS};
//!
//! let a = Coordinates::new(0.0, 0.0, 0.0);
//! let b = Coordinates::new(LIGHTYEAR_IN_METERS, 0.0, 0.0);
//! assert_eq!(distance(&a, &b).light_years, 1.0);
//! ```

pub mod distance;
pub mod error;
pub mod types;

pub use distance::{distance, Distance, LIGHTYEAR_IN_METERS};
pub use error::{Result, ValidationError};
pub use types::{CachedSystem, Coordinates, SystemId, SystemRecord, MAX_SYSTEM_ID, MIN_SYSTEM_ID};
