//! Error types for descriptor construction

use lrc_entity::EntityError;

/// Errors while building a query or mutation descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Record handed to a factory is unusable
    #[error("invalid record: {0}")]
    Entity(#[from] EntityError),

    /// No built-in list with this name
    #[error("unknown list: '{0}'")]
    UnknownList(String),
}

impl QueryError {
    /// Create unknown list error
    pub fn unknown_list(name: impl Into<String>) -> Self {
        Self::UnknownList(name.into())
    }
}
