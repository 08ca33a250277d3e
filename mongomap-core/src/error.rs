//! Error types and result types for mapping layer operations.
//!
//! The layer itself only ever raises [`QueryError`]. Every other variant of [`OdmError`]
//! is produced by a collaborator (a [`Session`](crate::session::Session) or a
//! [`Mapper`](crate::mapper::Mapper)) and is passed through unchanged.

use bson::error::Error as BsonError;
use thiserror::Error;

/// Raised when a typed value is requested from a cursor that has no documents left.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct QueryError {
    message: String,
}

impl QueryError {
    /// Creates a new query error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Returns the message describing this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn no_results() -> Self {
        Self::new("Query returned no results; cannot return the first element.")
    }

    pub(crate) fn exhausted() -> Self {
        Self::new("Query results are empty; cannot return any more results.")
    }
}

/// Represents all errors that can surface through the mapping layer.
#[derive(Error, Debug)]
pub enum OdmError {
    /// A typed value was requested but the cursor had no documents left.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
    /// A mapper could not convert a raw document into the target type.
    #[error("Mapping error: {0}")]
    Mapping(String),
    /// Serialization/deserialization error when converting BSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during session initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// An error occurred in the underlying session or driver.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl OdmError {
    /// Returns `true` if this is the layer's own [`QueryError`].
    pub fn is_query_error(&self) -> bool {
        matches!(self, OdmError::Query(_))
    }
}

/// A specialized `Result` type for mapping layer operations.
pub type OdmResult<T> = Result<T, OdmError>;

impl From<BsonError> for OdmError {
    fn from(err: BsonError) -> Self {
        OdmError::Serialization(err.to_string())
    }
}
