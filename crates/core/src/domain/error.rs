// Domain Error Types

use thiserror::Error;

use crate::domain::ticket::{TicketAction, TicketId, TicketStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid ticket transition: cannot {action} ticket {ticket_id} while it is {from}")]
    InvalidTransition {
        ticket_id: TicketId,
        from: TicketStatus,
        action: TicketAction,
    },

    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketId),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
