//! RPC Error Types
//!
//! Maps engine errors to JSON-RPC error codes. The error `data` carries the
//! machine-readable kind (`ticket_not_found`, `invalid_transition`, ...).

use jsonrpsee::types::ErrorObjectOwned;
use serde::Serialize;
use walkin_core::error::{AppError, ErrorKind};

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[derive(Debug, Serialize)]
struct ErrorData {
    kind: &'static str,
}

pub fn code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidRequest => code::VALIDATION_ERROR,
        ErrorKind::UnitNotFound | ErrorKind::TicketNotFound => code::NOT_FOUND,
        ErrorKind::InvalidTransition => code::CONFLICT,
        ErrorKind::Config => code::INTERNAL_ERROR,
    }
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let kind = err.kind();
    ErrorObjectOwned::owned(
        code_for(kind),
        err.to_string(),
        Some(ErrorData {
            kind: kind.as_str(),
        }),
    )
}
