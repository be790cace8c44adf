//! Error codes carried by every error response.
//!
//! One enum pairs the machine-readable identifier (for clients), the integer
//! code (for logs and dashboards), and the default message, so the three can
//! never drift apart.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error code vocabulary of the API.
///
/// Integer codes are grouped by origin: 1000s are client mistakes, 2000s are
/// database failures, 4000s are file system failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body failed validation rules
    ValidationError,

    /// A path or query parameter that must be numeric was not
    InvalidId,

    /// The request body could not be parsed as JSON
    JsonExtraction,

    /// The addressed resource does not exist
    NotFound,

    /// Malformed in some other way (bad multipart, unknown sort field)
    BadRequest,

    /// The request contradicts existing state, typically a duplicate
    Conflict,

    // Database errors (2000-2999)
    /// A lookup the handler required came back empty
    DatabaseNotFound,

    /// A unique or foreign key constraint rejected the write
    DatabaseConflict,

    /// Any other driver or query failure
    DatabaseError,

    /// No connection could be acquired from the pool
    DatabaseUnavailable,

    // I/O errors (4000s)
    /// File system operation failed
    IoError,
}

impl ErrorCode {
    /// Identifier clients can match on, e.g. `"VALIDATION_ERROR"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::Conflict => "CONFLICT",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseConflict => "DATABASE_CONFLICT",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::IoError => "IO_ERROR",
        }
    }

    /// Integer code for structured logs and monitoring.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::BadRequest => 1005,
            Self::Conflict => 1008,

            Self::DatabaseNotFound => 2001,
            Self::DatabaseConflict => 2002,
            Self::DatabaseError => 2003,
            Self::DatabaseUnavailable => 2004,

            Self::IoError => 4001,
        }
    }

    /// Message used when the caller supplies nothing more specific.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid numeric id",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Malformed request",
            Self::Conflict => "Resource already exists",
            Self::DatabaseNotFound => "Database record not found",
            Self::DatabaseConflict => "Database constraint violated",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseUnavailable => "Database is temporarily unavailable",
            Self::IoError => "I/O error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
