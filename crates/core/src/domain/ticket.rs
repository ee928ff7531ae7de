// Ticket Domain Model and Status State Machine

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Internal sequence number, unique per unit
pub type TicketId = u64;

/// Ticket status
///
/// `Waiting` is initial. `Served` and `Absent` are terminal.
/// `InService` and `OnHold` move back and forth through hold/resume/call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Waiting,
    InService,
    OnHold,
    Served,
    Absent,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::InService => "in_service",
            TicketStatus::OnHold => "on_hold",
            TicketStatus::Served => "served",
            TicketStatus::Absent => "absent",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Served | TicketStatus::Absent)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff action applied to a single ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    Call,
    Served,
    Absent,
    Hold,
    Resume,
}

impl TicketAction {
    pub const ALL: [TicketAction; 5] = [
        TicketAction::Call,
        TicketAction::Served,
        TicketAction::Absent,
        TicketAction::Hold,
        TicketAction::Resume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketAction::Call => "call",
            TicketAction::Served => "served",
            TicketAction::Absent => "absent",
            TicketAction::Hold => "hold",
            TicketAction::Resume => "resume",
        }
    }

    /// Transition table. Returns `None` when the guard rejects `from`.
    ///
    /// | action | allowed from            | result       |
    /// |--------|-------------------------|--------------|
    /// | call   | waiting, on_hold        | in_service   |
    /// | served | in_service, waiting     | served       |
    /// | absent | any non-terminal        | absent       |
    /// | hold   | in_service, waiting     | on_hold      |
    /// | resume | on_hold                 | waiting      |
    pub fn target(&self, from: TicketStatus) -> Option<TicketStatus> {
        use TicketStatus::*;

        match (self, from) {
            (TicketAction::Call, Waiting | OnHold) => Some(InService),
            (TicketAction::Served, InService | Waiting) => Some(Served),
            (TicketAction::Absent, status) if !status.is_terminal() => Some(Absent),
            (TicketAction::Hold, InService | Waiting) => Some(OnHold),
            // Resumed tickets go back to the pool and must be called again
            (TicketAction::Resume, OnHold) => Some(Waiting),
            _ => None,
        }
    }
}

impl std::fmt::Display for TicketAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        TicketAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| {
                DomainError::ValidationError(format!(
                    "unknown ticket action '{}' (expected one of: call, served, absent, hold, resume)",
                    s
                ))
            })
    }
}

/// Ticket Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub visible_number: String,
    pub service: String,

    // Opaque to the engine
    pub requester_name: Option<String>,
    pub requester_contact: Option<String>,

    pub priority: bool,
    pub priority_kind: Option<String>,
    pub status: TicketStatus,

    pub created_at: i64, // epoch ms

    // Table mode
    pub group_size: Option<u32>,
    pub assigned_resource: Option<String>,
}

impl Ticket {
    /// Create a waiting ticket
    ///
    /// `id` and `visible_number` come from the sequencer and are never changed afterwards.
    pub fn new(
        id: TicketId,
        visible_number: impl Into<String>,
        service: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            visible_number: visible_number.into(),
            service: service.into(),
            requester_name: None,
            requester_contact: None,
            priority: false,
            priority_kind: None,
            status: TicketStatus::Waiting,
            created_at,
            group_size: None,
            assigned_resource: None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == TicketStatus::Waiting
    }

    /// Check the guard for `action` without mutating
    pub fn check(&self, action: TicketAction) -> Result<TicketStatus> {
        action
            .target(self.status)
            .ok_or(DomainError::InvalidTransition {
                ticket_id: self.id,
                from: self.status,
                action,
            })
    }

    /// Apply `action`, leaving the ticket unchanged on failure
    pub fn apply(&mut self, action: TicketAction) -> Result<TicketStatus> {
        let next = self.check(action)?;
        self.status = next;
        Ok(next)
    }
}
