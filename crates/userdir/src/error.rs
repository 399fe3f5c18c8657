//! Error types for userdir

use thiserror::Error;

/// Result type alias for userdir operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Error types for compilation, persistence and enrichment
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// An update carried no attribute to assign
    #[error("Malformed update: no fields to update for user {id}")]
    MalformedUpdate { id: i32 },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Inference provider error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DirectoryError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a provider error
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    /// Check if this is a malformed update error
    pub fn is_malformed_update(&self) -> bool {
        matches!(self, Self::MalformedUpdate { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error came from the inference provider
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}

impl From<deadpool_postgres::PoolError> for DirectoryError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
