//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
///
/// `BusinessRule` and `Authentication` carry the exact user-facing message and
/// display it verbatim. `Precondition` marks a defect in the caller and is the
/// only fatal kind.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    Authentication(String),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a business rule error
    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    /// Create an authentication error
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a precondition fault
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for input-rejection errors the caller can fix by correcting input
    pub fn is_business_error(&self) -> bool {
        matches!(self, Self::BusinessRule(_) | Self::Authentication(_))
    }

    /// True for programming errors that must not be shown as a business failure
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// Short, data-free name of the error kind (used by the event log)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BusinessRule(_) => "business_rule",
            Self::Authentication(_) => "authentication",
            Self::Precondition(_) => "precondition",
            Self::Database(_) => "database",
            Self::NotFound(_) => "not_found",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result envelope for `--json` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            context: None,
        }
    }

    pub fn ok_with_context(data: T, context: HashMap<String, serde_json::Value>) -> Self {
        Self {
            context: Some(context),
            ..Self::ok(data)
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            error_kind: None,
            context: None,
        }
    }

    /// Failed result that keeps the error kind next to the message
    pub fn from_error(error: &Error) -> Self {
        Self {
            error_kind: Some(error.kind().to_string()),
            ..Self::fail(error.to_string())
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::from_error(&e),
        }
    }
}
