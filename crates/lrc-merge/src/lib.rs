//! LRC Merge Policies
//!
//! The closed set of pure functions that combine an existing store slot with
//! an incoming patch.
//!
//! # Core Concepts
//!
//! - [`Slot`]: What a named store entry holds (table, ordered ids, or scalar)
//! - [`Table`]: Records keyed by [`lrc_entity::EntityId`]
//! - [`MergePolicy`]: Shallow merge, deep merge, replace, delete-by-id, append
//! - [`deep_merge`] / [`shallow_merge`]: The record-level merge primitives
//!
//! Every policy is total and idempotent: applying the same patch twice leaves
//! the slot identical to applying it once.
//!
//! # Example
//!
//! ```rust
//! use lrc_merge::{MergePolicy, Slot, Table};
//! use serde_json::json;
//!
//! let mut existing = Table::new();
//! existing.insert(1.into(), json!({"id": 1, "title": "Algebra", "meta": {"level": 1}}));
//!
//! let mut patch = Table::new();
//! patch.insert(1.into(), json!({"id": 1, "meta": {"rating": 5}}));
//!
//! let merged = MergePolicy::DeepMerge
//!     .apply(Some(&Slot::Table(existing)), Some(Slot::Table(patch)))
//!     .unwrap();
//!
//! let record = &merged.as_table().unwrap()[&1.into()];
//! assert_eq!(record["title"], "Algebra");
//! assert_eq!(record["meta"], json!({"level": 1, "rating": 5}));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Policy implementations
mod policy;
mod record;
mod slot;

// Re-exports
pub use policy::MergePolicy;
pub use record::{deep_merge, shallow_merge};
pub use slot::{Slot, SlotShape, Table};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
