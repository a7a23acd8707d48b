//! API endpoints module

pub mod distance;
pub mod index;

pub use distance::{calculate_distance, DistanceResponse, SystemSummary};
pub use index::{index, not_found};
