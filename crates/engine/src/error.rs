//! The module contains the errors the engine can throw.
//!
//! Every failure is typed: the server layer relies on the variant to pick
//! the HTTP status and the `type` string of the error body, so the engine
//! never raises a bare/ambiguous failure.

use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// A single invalid field in a create/update payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed payload, with per-field messages.
    #[error("Invalid data")]
    Validation(Vec<FieldError>),
    /// A filter parameter could not be parsed (bad date, non-numeric id).
    #[error("Invalid query params: {0}")]
    MalformedFilter(String),
    /// A `from`/`to` range where `from` is after `to`.
    #[error("Invalid date range: {0}")]
    DateFilter(String),
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Discriminator surfaced in the `type` field of error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::MalformedFilter(_) => "MalformedFilterError",
            Self::DateFilter(_) => "DateFilterError",
            Self::KeyNotFound(_) => "NotFound",
            Self::Forbidden(_) => "Forbidden",
            Self::ExistingKey(_) => "Conflict",
            Self::Database(_) => "DatabaseError",
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::MalformedFilter(a), Self::MalformedFilter(b)) => a == b,
            (Self::DateFilter(a), Self::DateFilter(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
