use thiserror::Error;

/// Errors that can occur when using the collection types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// A record was constructed with the wrong number of values
    #[error("Expected {expected} values, got {actual}")]
    Arity { expected: usize, actual: usize },
    /// The requested record field does not exist
    #[error("Unknown field: {0}")]
    FieldNotFound(String),
    /// A record type was declared with an unusable field name
    #[error("Invalid field name: {0:?}")]
    InvalidField(String),
    /// Pop attempted on an empty deque
    #[error("Pop from an empty deque")]
    EmptyQueue,
    /// A bounded deque was requested with zero capacity
    #[error("Deque capacity must be at least 1")]
    InvalidCapacity,
    /// The requested key was not found
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    /// A chain layer is mutably borrowed elsewhere
    #[error("Layer is already mutably borrowed")]
    LayerBorrowed,
    /// A configuration layer could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml_edit::TomlError> for CollectionError {
    fn from(err: toml_edit::TomlError) -> Self {
        CollectionError::Config(err.to_string())
    }
}
