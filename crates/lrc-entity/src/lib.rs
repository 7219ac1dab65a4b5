//! LRC Entity Model
//!
//! Identity primitives shared by every layer of the learning resource cache.
//!
//! # Core Concepts
//!
//! - [`EntityKind`]: Which normalized table a record belongs to
//! - [`EntityId`]: String or integer record id
//! - [`CompositeKey`]: `(kind, id)` pair, required for any cross-kind lookup
//! - [`Reference`]: Minimal `{objectId, objectType}` pointer into the store
//!
//! # Example
//!
//! ```rust
//! use lrc_entity::{EntityKind, Reference};
//! use serde_json::json;
//!
//! let course = json!({"id": 5, "object_type": "course", "title": "Algebra"});
//! let reference = Reference::from_record(&course).unwrap();
//!
//! assert_eq!(reference.object_type, EntityKind::Course);
//! assert_eq!(reference.key().to_string(), "course_5");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod error;
mod id;
mod kind;
mod record;
mod reference;

// Re-exports
pub use error::EntityError;
pub use id::{CompositeKey, EntityId};
pub use kind::EntityKind;
pub use record::{is_favorite, record_id, record_kind, FAVORITE_FIELD};
pub use reference::{ListItem, Reference};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
