//! LRC Query Execution Engine
//!
//! Sends descriptors, de-duplicates concurrent identical queries, and merges
//! confirmed responses into the shared [`NormalizedStore`](lrc_store::NormalizedStore).
//!
//! # Core Concepts
//!
//! - [`QueryEngine`]: At most one in-flight request per dedup key; transform
//!   and merge exactly once on success, never on failure
//! - [`Transport`]: The only suspension point; [`HttpTransport`] on reqwest
//! - [`QueryStatus`]: `Idle → InFlight → Succeeded | Failed`
//! - [`CacheConfig`]: TOML-loadable settings
//!
//! # Example
//!
//! ```rust,no_run
//! use lrc_engine::{CacheConfig, HttpTransport, QueryEngine};
//! use lrc_entity::EntityKind;
//! use lrc_query::resource_request;
//! use lrc_store::{shared, NormalizedStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CacheConfig::new().with_base_url("https://learn.example.org");
//! let transport = HttpTransport::from_config(&config)?;
//! let engine = QueryEngine::new(shared(NormalizedStore::new()), Arc::new(transport));
//!
//! engine.query(resource_request(EntityKind::Course, 5)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod engine;
pub mod error;
pub mod transport;

// Re-exports
pub use config::CacheConfig;
pub use engine::{QueryEngine, QueryOutcome, QueryStatus, DEFAULT_STATUS_CAPACITY};
pub use error::{ConfigError, EngineError, TransportError};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running queries
    pub use crate::{CacheConfig, EngineError, QueryEngine, QueryStatus, Transport};
    pub use lrc_query::prelude::*;
    pub use lrc_store::{shared, NormalizedStore, SharedStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
