//! Interaction logging

use crate::descriptor::{Method, MutationDescriptor};
use lrc_entity::CompositeKey;
use serde_json::json;

/// `POST /api/v0/interactions/` recording e.g. a `"view"` of `key`
///
/// Fire-and-forget: no transform and an empty update map.
#[must_use]
pub fn log_interaction_mutation(interaction_type: &str, key: &CompositeKey) -> MutationDescriptor {
    MutationDescriptor::new(Method::Post, "/api/v0/interactions/").with_body(json!({
        "interaction_type": interaction_type,
        "content_type": key.kind.as_str(),
        "content_id": key.id.to_value(),
    }))
}
