//! Error types for predql

use crate::expr::{Arity, Operator};
use thiserror::Error;

/// Result type alias for predql operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while building or executing statements.
///
/// Build-time variants are returned synchronously by the builder call that
/// caused them. Execution variants come from the backend and are passed
/// through without retries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// `combine` was called without any terms
    #[error("Cannot combine an empty list of expressions")]
    EmptyCombination,

    /// Operator received the wrong number of arguments
    #[error("Operator {operator:?} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        operator: Operator,
        expected: Arity,
        got: usize,
    },

    /// UPDATE compiled without any SET pair
    #[error("UPDATE requires at least one SET clause")]
    MissingSet,

    /// A path refers to an alias the statement is not bound to
    #[error("Alias '{found}' is not bound in this statement (expected '{expected}')")]
    UnboundAlias { expected: String, found: String },

    /// Two different bindings share one alias name
    #[error("Alias '{0}' is already bound to a different entity")]
    DuplicateAlias(String),

    /// Conflicting property-to-field bindings on one alias
    #[error("Conflicting binding: {0}")]
    ConflictingBinding(String),

    /// Property not declared by the entity
    #[error("Unknown property '{property}' on {entity}")]
    UnknownProperty { entity: String, property: String },

    /// Alias or backing name is not a valid identifier
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Statement timeout
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl QueryError {
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

    pub(crate) fn unknown_property(entity: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            entity: entity.into(),
            property: property.into(),
        }
    }

    /// True for errors raised while building a statement, before any I/O.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyCombination
                | Self::ArityMismatch { .. }
                | Self::MissingSet
                | Self::UnboundAlias { .. }
                | Self::DuplicateAlias(_)
                | Self::ConflictingBinding(_)
                | Self::UnknownProperty { .. }
                | Self::InvalidIdentifier(_)
        )
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Parse a tokio_postgres error into a more specific QueryError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for QueryError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
