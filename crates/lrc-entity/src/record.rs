//! Helpers over raw entity records
//!
//! Records are arbitrary JSON objects. The cache relies on only two fields:
//! `id` and, for polymorphic payloads, `object_type`.

use crate::error::EntityError;
use crate::id::EntityId;
use crate::kind::EntityKind;
use serde_json::Value;

/// Boolean flag read by the favorites projection
pub const FAVORITE_FIELD: &str = "is_favorite";

/// Read the `id` field of a record
///
/// # Errors
/// - `EntityError::NotAnObject` if the record is not an object
/// - `EntityError::MissingId` if `id` is absent or not a string/integer
pub fn record_id(record: &Value) -> Result<EntityId, EntityError> {
    let object = record.as_object().ok_or(EntityError::NotAnObject)?;
    object
        .get("id")
        .and_then(EntityId::from_value)
        .ok_or(EntityError::MissingId)
}

/// Read the `object_type` field of a record
///
/// # Errors
/// - `EntityError::MissingKind` if the field is absent
/// - `EntityError::UnknownKind` if the value names no known kind
pub fn record_kind(record: &Value) -> Result<EntityKind, EntityError> {
    let object = record.as_object().ok_or(EntityError::NotAnObject)?;
    let raw = object
        .get("object_type")
        .and_then(Value::as_str)
        .ok_or(EntityError::MissingKind)?;
    raw.parse()
}

/// `true` only when `is_favorite` is literally `true`
#[inline]
#[must_use]
pub fn is_favorite(record: &Value) -> bool {
    record.get(FAVORITE_FIELD) == Some(&Value::Bool(true))
}
