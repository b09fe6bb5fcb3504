//! Error handling for roster queries

use std::io;
use thiserror::Error;

/// Custom error type for roster operations
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Record {record} is missing its {field}")]
    MissingField { field: &'static str, record: String },

    #[error("Invalid student specification '{spec}': {reason}")]
    InvalidRecordSpec { spec: String, reason: String },

    #[error("Invalid school year: {value}")]
    InvalidSchoolYear { value: String },

    #[error("Conflicting options: {message}")]
    ConflictingOptions { message: String },

    #[error("Thread pool error: {message}")]
    ThreadPoolError { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },
}

impl RosterError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RosterError::InvalidRecordSpec { .. }
            | RosterError::InvalidSchoolYear { .. }
            | RosterError::ConflictingOptions { .. }
            | RosterError::ThreadPoolError { .. }
            | RosterError::ParseError { .. } => crate::USAGE_FAILURE,

            _ => crate::EXIT_FAILURE,
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: &'static str, record: &str) -> Self {
        RosterError::MissingField {
            field,
            record: record.to_string(),
        }
    }

    /// Create an invalid record spec error
    pub fn invalid_record_spec(spec: &str, reason: &str) -> Self {
        RosterError::InvalidRecordSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid school year error
    pub fn invalid_school_year(value: &str) -> Self {
        RosterError::InvalidSchoolYear {
            value: value.to_string(),
        }
    }

    /// Create a conflicting options error
    pub fn conflicting_options(message: &str) -> Self {
        RosterError::ConflictingOptions {
            message: message.to_string(),
        }
    }

    /// Create a thread pool error
    pub fn thread_pool_error(message: &str) -> Self {
        RosterError::ThreadPoolError {
            message: message.to_string(),
        }
    }

    /// Create a parse error
    pub fn parse_error(message: &str) -> Self {
        RosterError::ParseError {
            message: message.to_string(),
        }
    }
}

/// Result type for roster operations
pub type RosterResult<T> = Result<T, RosterError>;
