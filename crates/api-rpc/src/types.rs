//! RPC Request/Response Types
//!
//! Params are deserialized by `jsonrpsee` and then checked by `validate()`,
//! which turns them into engine requests. Nothing unvalidated reaches the engine.

use serde::{Deserialize, Serialize};
use walkin_core::application::{CallOutcome, IssueRequest, RegisterTableRequest};
use walkin_core::domain::{
    CallEvent, CollapsedStats, QueueStats, Table, TableId, Ticket, TicketAction, TicketId,
    UnitConfig,
};
use walkin_core::error::{AppError, Result};

const MAX_UNIT_ID_LEN: usize = 64;
const MAX_TEXT_LEN: usize = 200;

/// Unit ids are slugs: ASCII alphanumerics, '-' and '_'
pub fn validate_unit_id(unit_id: &str) -> Result<String> {
    let unit_id = unit_id.trim();

    if unit_id.is_empty() {
        return Err(AppError::InvalidRequest("unit_id cannot be empty".to_string()));
    }
    if unit_id.len() > MAX_UNIT_ID_LEN {
        return Err(AppError::InvalidRequest(format!(
            "unit_id too long (max {} characters)",
            MAX_UNIT_ID_LEN
        )));
    }
    if !unit_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::InvalidRequest(
            "unit_id must be alphanumeric with '-' or '_'".to_string(),
        ));
    }

    Ok(unit_id.to_string())
}

fn validate_text(field: &str, value: Option<String>) -> Result<Option<String>> {
    match value {
        Some(v) if v.chars().count() > MAX_TEXT_LEN => Err(AppError::InvalidRequest(format!(
            "{} too long (max {} characters)",
            field, MAX_TEXT_LEN
        ))),
        other => Ok(other),
    }
}

/// Params shared by methods that only name a unit
#[derive(Debug, Deserialize)]
pub struct UnitParams {
    pub unit_id: String,
}

/// system.health.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub configured_units: usize,
    pub active_units: usize,
}

/// unit.info.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitInfoResponse {
    pub unit: UnitConfig,
}

/// queue.issue.v1
#[derive(Debug, Deserialize)]
pub struct IssueParams {
    pub unit_id: String,
    pub service: Option<String>,
    #[serde(default)]
    pub requester_name: Option<String>,
    #[serde(default)]
    pub requester_contact: Option<String>,
    #[serde(default)]
    pub priority: bool,
    #[serde(default)]
    pub priority_kind: Option<String>,
    #[serde(default)]
    pub group_size: Option<u32>,
}

impl IssueParams {
    pub fn validate(self) -> Result<(String, IssueRequest)> {
        let unit_id = validate_unit_id(&self.unit_id)?;

        let service = self
            .service
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::InvalidRequest("service is required".to_string()))?;

        let req = IssueRequest {
            service,
            requester_name: validate_text("requester_name", self.requester_name)?,
            requester_contact: validate_text("requester_contact", self.requester_contact)?,
            priority: self.priority,
            priority_kind: validate_text("priority_kind", self.priority_kind)?,
            group_size: self.group_size,
        };

        Ok((unit_id, req))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueResponse {
    pub unit_id: String,
    pub ticket: Ticket,
    pub position: usize,
}

/// queue.list.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueListResponse {
    pub unit_id: String,
    pub tickets: Vec<Ticket>,
    pub stats: QueueStats,
    pub summary: CollapsedStats,
    pub recent_calls: Vec<CallEvent>,
}

/// queue.call_next.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallNextResponse {
    pub unit_id: String,
    #[serde(flatten)]
    pub outcome: CallOutcome,
}

/// ticket.transition.v1
#[derive(Debug, Deserialize)]
pub struct TransitionParams {
    pub unit_id: String,
    pub ticket_id: TicketId,
    pub action: String,
}

impl TransitionParams {
    pub fn validate(self) -> Result<(String, TicketId, TicketAction)> {
        let unit_id = validate_unit_id(&self.unit_id)?;
        let action = self.action.trim().parse::<TicketAction>()?;
        Ok((unit_id, self.ticket_id, action))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketResponse {
    pub unit_id: String,
    pub ticket: Ticket,
}

/// tables.register.v1
#[derive(Debug, Deserialize)]
pub struct RegisterTableParams {
    pub unit_id: String,
    pub seats: u32,
    #[serde(default)]
    pub note: Option<String>,
}

impl RegisterTableParams {
    pub fn validate(self) -> Result<(String, RegisterTableRequest)> {
        let unit_id = validate_unit_id(&self.unit_id)?;
        if self.seats == 0 {
            return Err(AppError::InvalidRequest("seats must be greater than zero".to_string()));
        }
        let note = validate_text("note", self.note)?;
        Ok((unit_id, RegisterTableRequest { seats: self.seats, note }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableResponse {
    pub unit_id: String,
    pub table: Table,
}

/// tables.list.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableListResponse {
    pub unit_id: String,
    pub tables: Vec<Table>,
}

/// tables.assign.v1
#[derive(Debug, Deserialize)]
pub struct AssignTableParams {
    pub unit_id: String,
    pub table_id: TableId,
    pub ticket_id: TicketId,
}

impl AssignTableParams {
    pub fn validate(self) -> Result<(String, TableId, TicketId)> {
        let unit_id = validate_unit_id(&self.unit_id)?;
        Ok((unit_id, self.table_id, self.ticket_id))
    }
}
