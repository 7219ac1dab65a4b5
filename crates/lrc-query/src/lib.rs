//! LRC Query and Mutation Descriptors
//!
//! Declarative request → transform → update triples. Factories fix the
//! endpoint, the response transform and the merge policy per table for every
//! resource family.
//!
//! # Core Concepts
//!
//! - [`QueryDescriptor`]: A read, de-duplicated by [`QueryDescriptor::dedup_key`]
//! - [`MutationDescriptor`]: A write; its transform runs only on confirmed success
//! - [`Transform`]: Pure `Option<&Value> -> Patch`; absent bodies yield empty patches
//! - [`ListDefinition`]: One named list, pairing its query with its selector
//!
//! # Example
//!
//! ```rust
//! use lrc_entity::EntityKind;
//! use lrc_query::{favorite_mutation, Descriptor};
//! use serde_json::json;
//!
//! let course = json!({"id": 5, "title": "Algebra", "is_favorite": false});
//! let mutation = favorite_mutation(EntityKind::Course, &course).unwrap();
//! assert_eq!(mutation.url, "/api/v0/courses/5/favorite/");
//!
//! let patch = mutation.patch_for(None);
//! assert_eq!(patch.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod descriptor;
pub mod error;
pub mod factories;
pub mod transform;

// Re-exports
pub use descriptor::{Descriptor, Method, MutationDescriptor, QueryDescriptor, Transform};
pub use error::QueryError;
pub use factories::*;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building descriptors
    pub use crate::descriptor::{Descriptor, Method, MutationDescriptor, QueryDescriptor};
    pub use crate::factories::ListDefinition;
    pub use crate::QueryError;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
