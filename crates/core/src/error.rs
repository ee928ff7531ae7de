// Central Error Type for the Queue Engine

use thiserror::Error;

use crate::domain::{DomainError, TicketId};

/// Application-level error type
///
/// Every variant is recoverable at the request boundary; a failed operation
/// leaves the unit state exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Unit not found: {0}")]
    UnitNotFound(String),

    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Caller-visible failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnitNotFound,
    TicketNotFound,
    InvalidRequest,
    InvalidTransition,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnitNotFound => "unit_not_found",
            ErrorKind::TicketNotFound => "ticket_not_found",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::Config => "config",
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::UnitNotFound(_) => ErrorKind::UnitNotFound,
            AppError::TicketNotFound(_) => ErrorKind::TicketNotFound,
            AppError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            AppError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            AppError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::TicketNotFound(id) => AppError::TicketNotFound(id),
            DomainError::ValidationError(msg) => AppError::InvalidRequest(msg),
            transition @ DomainError::InvalidTransition { .. } => {
                AppError::InvalidTransition(transition.to_string())
            }
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
