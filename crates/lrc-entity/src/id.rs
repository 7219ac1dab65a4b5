//! Record identifiers
//!
//! Provides [`EntityId`] and the [`CompositeKey`] used to disambiguate ids that
//! are shared across entity kinds.

use crate::kind::EntityKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Stable record id, either numeric or textual
///
/// Ordering places all integers (numerically) before all strings, which gives
/// tables a stable iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Integer id (the common case)
    Int(i64),

    /// String id (slugs, relation keys)
    Str(String),
}

impl EntityId {
    /// Read an id from a JSON value
    ///
    /// Accepts integers and strings; anything else yields `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }

    /// Convert back into a JSON value
    #[inline]
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Str(s) => Value::from(s.as_str()),
        }
    }

    /// Integer form, if numeric
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    /// Numeric strings become [`EntityId::Int`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>().map_or_else(|_| Self::Str(s.to_string()), Self::Int))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for EntityId {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// `(kind, id)` pair
///
/// The only supported key for resolving a record when the kind is not implied
/// by the table being read. A course and a user list may both carry id `5`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    /// Entity kind
    pub kind: EntityKind,
    /// Record id within the kind's table
    pub id: EntityId,
}

impl CompositeKey {
    /// Create new composite key
    #[inline]
    #[must_use]
    pub fn new(kind: EntityKind, id: impl Into<EntityId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// String form `"{kind}_{id}"`, used as the row key of relation tables
    #[inline]
    #[must_use]
    pub fn relation_key(&self) -> EntityId {
        EntityId::Str(self.to_string())
    }
}

impl Display for CompositeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.id)
    }
}
