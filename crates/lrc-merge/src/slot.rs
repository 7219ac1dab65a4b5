//! Store slot values
//!
//! Provides [`Slot`], the value held under one table name in the normalized
//! store.

use lrc_entity::EntityId;
use serde_json::Value;
use std::collections::BTreeMap;

/// Records of one table keyed by id
pub type Table = BTreeMap<EntityId, Value>;

/// Contents of one named store entry
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Entity or relation table
    Table(Table),

    /// Ordered id membership of a named list (`newCourses`, ...)
    Ids(Vec<EntityId>),

    /// Single authoritative value (pagination `next` link)
    Scalar(Value),
}

/// Discriminant of a [`Slot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotShape {
    /// [`Slot::Table`]
    Table,
    /// [`Slot::Ids`]
    Ids,
    /// [`Slot::Scalar`]
    Scalar,
}

impl Slot {
    /// Empty table slot
    #[inline]
    #[must_use]
    pub fn empty_table() -> Self {
        Self::Table(Table::new())
    }

    /// Shape of this slot
    #[inline]
    #[must_use]
    pub fn shape(&self) -> SlotShape {
        match self {
            Self::Table(_) => SlotShape::Table,
            Self::Ids(_) => SlotShape::Ids,
            Self::Scalar(_) => SlotShape::Scalar,
        }
    }

    /// Table contents, if a table
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Ordered ids, if an id list
    #[inline]
    #[must_use]
    pub fn as_ids(&self) -> Option<&[EntityId]> {
        match self {
            Self::Ids(ids) => Some(ids),
            _ => None,
        }
    }

    /// Scalar value, if a scalar
    #[inline]
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Number of entries (1 for a scalar)
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Table(table) => table.len(),
            Self::Ids(ids) => ids.len(),
            Self::Scalar(_) => 1,
        }
    }

    /// Whether the slot holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Table(table) => table.is_empty(),
            Self::Ids(ids) => ids.is_empty(),
            Self::Scalar(_) => false,
        }
    }
}

impl From<Table> for Slot {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<Vec<EntityId>> for Slot {
    fn from(ids: Vec<EntityId>) -> Self {
        Self::Ids(ids)
    }
}
