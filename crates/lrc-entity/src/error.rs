//! Error types for the entity model

/// Errors raised while interpreting raw entity records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    /// `object_type` value is not a known kind
    #[error("unknown entity kind: '{0}'")]
    UnknownKind(String),

    /// Record has no string or integer `id`
    #[error("record has no usable id field")]
    MissingId,

    /// Record has no `object_type` field
    #[error("record has no object_type field")]
    MissingKind,

    /// Record is not a JSON object
    #[error("record is not a JSON object")]
    NotAnObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_error_display() {
        let err = EntityError::UnknownKind("bootcamp".to_string());
        assert_eq!(err.to_string(), "unknown entity kind: 'bootcamp'");
        assert_eq!(EntityError::MissingId.to_string(), "record has no usable id field");
    }
}
