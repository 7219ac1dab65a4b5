//! Minimal pointers into the normalized store
//!
//! A [`Reference`] stands in for a full record inside ordered or cross-kind
//! collections (list items, popular content), so resource content lives in
//! exactly one table.

use crate::error::EntityError;
use crate::id::{CompositeKey, EntityId};
use crate::kind::EntityKind;
use crate::record::{record_id, record_kind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{objectId, objectType}` pointer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Id of the target record
    pub object_id: EntityId,
    /// Kind of the target record
    pub object_type: EntityKind,
}

impl Reference {
    /// Create new reference
    #[inline]
    #[must_use]
    pub fn new(object_id: impl Into<EntityId>, object_type: EntityKind) -> Self {
        Self {
            object_id: object_id.into(),
            object_type,
        }
    }

    /// Slim a polymorphic record (one carrying `object_type`) down to a reference
    ///
    /// # Errors
    /// Returns error if `id` or `object_type` is missing or invalid
    pub fn from_record(record: &Value) -> Result<Self, EntityError> {
        Ok(Self {
            object_id: record_id(record)?,
            object_type: record_kind(record)?,
        })
    }

    /// Slim a record whose kind is known from context
    ///
    /// An explicit `object_type` on the record still wins.
    ///
    /// # Errors
    /// Returns error if `id` is missing or `object_type` is present but unknown
    pub fn from_record_as(record: &Value, kind: EntityKind) -> Result<Self, EntityError> {
        let object_type = match record_kind(record) {
            Ok(found) => found,
            Err(EntityError::MissingKind) => kind,
            Err(other) => return Err(other),
        };
        Ok(Self {
            object_id: record_id(record)?,
            object_type,
        })
    }

    /// Composite key for store lookups
    #[inline]
    #[must_use]
    pub fn key(&self) -> CompositeKey {
        CompositeKey::new(self.object_type, self.object_id.clone())
    }

    /// JSON form of this reference
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "objectId": self.object_id.to_value(),
            "objectType": self.object_type.as_str(),
        })
    }
}

/// Position-carrying reference stored for each item of an ordered list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Server id of the list item itself
    pub item_id: EntityId,
    /// Sort position within the list
    pub position: i64,
    /// Target resource
    #[serde(flatten)]
    pub reference: Reference,
}

impl ListItem {
    /// Create new list item
    #[inline]
    #[must_use]
    pub fn new(item_id: impl Into<EntityId>, position: i64, reference: Reference) -> Self {
        Self {
            item_id: item_id.into(),
            position,
            reference,
        }
    }

    /// JSON form of this item, as stored in a list's item table
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "itemId": self.item_id.to_value(),
            "position": self.position,
            "objectId": self.reference.object_id.to_value(),
            "objectType": self.reference.object_type.as_str(),
        })
    }
}

impl From<CompositeKey> for Reference {
    fn from(key: CompositeKey) -> Self {
        Self {
            object_id: key.id,
            object_type: key.kind,
        }
    }
}
