//! Error types for the normalized store

use crate::table_name::TableName;
use lrc_merge::SlotShape;

/// Errors from typed store reads
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Slot exists but holds a different shape than requested
    #[error("table '{table}' holds {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        /// Table read
        table: TableName,
        /// Requested shape
        expected: SlotShape,
        /// Shape found
        actual: SlotShape,
    },
}

impl StoreError {
    /// Create shape mismatch error
    #[inline]
    #[must_use]
    pub fn shape_mismatch(table: TableName, expected: SlotShape, actual: SlotShape) -> Self {
        Self::ShapeMismatch {
            table,
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_display() {
        let err = StoreError::shape_mismatch(TableName::COURSES, SlotShape::Table, SlotShape::Ids);
        assert_eq!(err.to_string(), "table 'courses' holds Ids, expected Table");
    }
}
