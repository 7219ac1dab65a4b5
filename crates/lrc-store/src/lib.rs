//! LRC Normalized Store
//!
//! Process-wide table of records, keyed first by table name and then by id.
//! Owns no business logic: it changes only through [`NormalizedStore::apply`],
//! which runs each table's [`MergePolicy`](lrc_merge::MergePolicy).
//!
//! # Overview
//!
//! - **TableName**: Entity tables (`courses`, `userLists`, ...), named lists,
//!   relation tables and cursors
//! - **Patch**: Transform output, one [`Slot`](lrc_merge::Slot) per table
//! - **UpdateMap**: Merge policy per table, fixed by the descriptor
//! - **NormalizedStore**: Slots behind `Arc`, so unchanged tables keep their
//!   identity and memoized selectors skip recomputation
//!
//! # Example
//!
//! ```rust
//! use lrc_entity::{CompositeKey, EntityKind};
//! use lrc_merge::MergePolicy;
//! use lrc_store::{NormalizedStore, Patch, TableName, UpdateMap};
//! use serde_json::json;
//!
//! let mut store = NormalizedStore::new();
//!
//! let patch = Patch::new().with_record(TableName::COURSES, 5, json!({"id": 5, "title": "Algebra"}));
//! let update = UpdateMap::new().with(TableName::COURSES, MergePolicy::DeepMerge);
//! store.apply(patch, &update);
//!
//! let course = store.get(&CompositeKey::new(EntityKind::Course, 5));
//! assert_eq!(course.unwrap()["title"], "Algebra");
//! assert!(store.get(&CompositeKey::new(EntityKind::UserList, 5)).is_none());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod patch;
pub mod store;
pub mod table_name;

// Re-exports
pub use error::StoreError;
pub use patch::{Patch, UpdateMap};
pub use store::{shared, ApplyReport, NormalizedStore, SharedStore};
pub use table_name::TableName;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for store operations
    pub use crate::{NormalizedStore, Patch, SharedStore, TableName, UpdateMap};
    pub use lrc_merge::{MergePolicy, Slot, Table};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
