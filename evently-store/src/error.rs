//! Error types for evently-store
//!
//! One enum for everything the entity layer can return, so the route layer
//! can tell bad input apart from missing records and infrastructure
//! outages without string matching.

use std::sync::Arc;

use thiserror::Error;

use crate::connection::ConnectError;
use crate::models::ValidationError;

/// Result type alias for evently-store operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Main error type for entity and connection operations
#[derive(Error, Debug)]
pub enum DataError {
    /// Required connection setting is missing or malformed. Not retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// Opening the database connection failed. The next call retries.
    #[error("failed to connect to the database: {0}")]
    Connection(Arc<sqlx::Error>),

    /// Input failed a field check; nothing was written
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Well-formed reference to a record that does not exist
    #[error("referenced {resource} '{id}' does not exist")]
    Reference { resource: &'static str, id: String },

    /// A downstream check failed for infrastructure reasons
    #[error("failed to validate {check}: {source}")]
    Dependency {
        check: &'static str,
        #[source]
        source: Box<DataError>,
    },

    /// Unique constraint hit at write time
    #[error("{field} '{value}' already exists")]
    Duplicate { field: &'static str, value: String },

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Any other database failure during a read or write
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Coarse classification of a [`DataError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Connection,
    Validation,
    Reference,
    Dependency,
    Duplicate,
    NotFound,
    Database,
}

impl DataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Connection(_) => ErrorKind::Connection,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Reference { .. } => ErrorKind::Reference,
            Self::Dependency { .. } => ErrorKind::Dependency,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Database(_) => ErrorKind::Database,
        }
    }

    /// True when the caller's input is at fault rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::Reference | ErrorKind::Duplicate | ErrorKind::NotFound
        )
    }

    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub(crate) fn dependency(check: &'static str, source: DataError) -> Self {
        Self::Dependency {
            check,
            source: Box::new(source),
        }
    }
}

impl From<ConnectError> for DataError {
    fn from(e: ConnectError) -> Self {
        match e {
            ConnectError::Config(reason) => Self::Config(reason),
            ConnectError::Connect(source) => Self::Connection(source),
            ConnectError::Panicked => Self::Connection(Arc::new(sqlx::Error::WorkerCrashed)),
        }
    }
}
