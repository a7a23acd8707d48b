//! System cache: coordinates for EVE Online solar systems
//!
//! A thin read-through layer in front of ESI:
//!
//! - [`SqliteStore`] keeps one row per system that has ever been resolved
//! - [`EsiClient`] fetches names and positions for systems not yet cached
//! - [`CoordinateResolver`] ties the two together behind [`SystemResolver`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use system_cache::{CoordinateResolver, EsiClient, SqliteStore, SystemResolver};
//! use wizard_core_starmap::SystemId;
//!
//! # async fn run() -> system_cache::Result<()> {
//! let store = Arc::new(SqliteStore::open("wizard_calculator.db").await?);
//! let provider = Arc::new(EsiClient::with_defaults()?);
//! let resolver = CoordinateResolver::new(store, provider);
//!
//! let jita = resolver.resolve(SystemId::new(30000142).unwrap()).await?;
//! println!("{} at {:?}", jita.name, jita.position);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod provider;
pub mod resolver;
pub mod store;

pub use error::{CacheError, Result};
pub use provider::{
    CoordinateProvider, EsiClient, DEFAULT_TIMEOUT, ESI_BASE_URL, ESI_COMPATIBILITY_DATE,
    ESI_USER_AGENT,
};
pub use resolver::{CoordinateResolver, SystemResolver};
pub use store::{SqliteStore, SystemStore};
