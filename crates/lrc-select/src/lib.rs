//! LRC Selector Layer
//!
//! Pure, memoized derivations over the [`NormalizedStore`](lrc_store::NormalizedStore).
//!
//! # Core Concepts
//!
//! - [`Selector`]: `store -> Arc<Output>`, recomputed only when an input slot's
//!   `Arc` identity changes ([`Memo`])
//! - [`TableSelector`]: Identity pass-through of one entity table
//! - [`ResourceLookup`]: `(kind, id)` lookup with a moka-backed memo; there is
//!   deliberately no id-only lookup
//! - [`FavoritesSelector`]: The Favorites pseudo-collection, scanned from six
//!   entity tables
//! - [`ListSelector`], [`MyListsSelector`], [`UserListItemsSelector`],
//!   [`SimilarResourcesSelector`], [`PopularContentSelector`]
//!
//! # Example
//!
//! ```rust
//! use lrc_merge::MergePolicy;
//! use lrc_select::{FavoritesSelector, Selector};
//! use lrc_store::{NormalizedStore, Patch, TableName, UpdateMap};
//! use serde_json::json;
//!
//! let mut store = NormalizedStore::new();
//! store.apply(
//!     Patch::new()
//!         .with_record(TableName::COURSES, 1, json!({"id": 1, "is_favorite": true}))
//!         .with_record(TableName::COURSES, 2, json!({"id": 2, "is_favorite": false})),
//!     &UpdateMap::new().with(TableName::COURSES, MergePolicy::DeepMerge),
//! );
//!
//! let favorites = FavoritesSelector::new();
//! assert_eq!(favorites.select(&store).len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod favorites;
mod lists;
mod lookup;
mod memo;
mod relations;
mod selector;

// Re-exports
pub use favorites::{compute_favorites, FavoritesSelector};
pub use lists::{ListSelector, MyListsSelector, ResolvedItem, UserListItemsSelector};
pub use lookup::ResourceLookup;
pub use memo::{Inputs, Memo};
pub use relations::{references_in, PopularContentSelector, SimilarResourcesSelector};
pub use selector::{entity_inputs, resolve_references, Selector, TableSelector};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
