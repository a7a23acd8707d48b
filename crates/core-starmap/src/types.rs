//! Core data types: system identifiers, positions, and cached records

use crate::error::{Result, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest solar system identifier accepted by the calculator
pub const MIN_SYSTEM_ID: i64 = 30_000_000;

/// Highest solar system identifier accepted by the calculator
pub const MAX_SYSTEM_ID: i64 = 31_000_000;

/// A solar system identifier known to lie in `[MIN_SYSTEM_ID, MAX_SYSTEM_ID]`.
///
/// The only way to obtain one outside of tests is [`SystemId::new`], so every
/// value that reaches the cache or the upstream provider has been range checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SystemId(i64);

impl SystemId {
    /// Validate a raw identifier
    pub fn new(raw: i64) -> Result<Self> {
        Self::for_field("system_id", raw)
    }

    /// Validate a raw identifier, naming `field` in the error on failure
    pub fn for_field(field: &'static str, raw: i64) -> Result<Self> {
        if (MIN_SYSTEM_ID..=MAX_SYSTEM_ID).contains(&raw) {
            Ok(SystemId(raw))
        } else {
            Err(ValidationError::out_of_range(field, raw))
        }
    }

    /// The raw integer value
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for SystemId {
    type Error = ValidationError;

    fn try_from(raw: i64) -> Result<Self> {
        SystemId::new(raw)
    }
}

/// Position of a system in the shared universe frame (meters)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Coordinates { x, y, z }
    }
}

/// Name and position of a system, as returned by the upstream provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemRecord {
    pub system_id: SystemId,
    pub name: String,
    pub position: Coordinates,
}

impl SystemRecord {
    pub fn new(system_id: SystemId, name: impl Into<String>, position: Coordinates) -> Self {
        SystemRecord {
            system_id,
            name: name.into(),
            position,
        }
    }
}

/// A system row held in the local coordinate cache
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedSystem {
    pub system_id: SystemId,
    pub name: String,
    pub position: Coordinates,
    /// First time the row was written
    pub added: DateTime<Utc>,
    /// Most recent write of the row
    pub last_update: DateTime<Utc>,
}

impl From<CachedSystem> for SystemRecord {
    fn from(cached: CachedSystem) -> Self {
        SystemRecord {
            system_id: cached.system_id,
            name: cached.name,
            position: cached.position,
        }
    }
}
