// Issue Ticket Use Case - request validation and ticket construction

use serde::{Deserialize, Serialize};

use crate::domain::{sequencer, QueueStore, Ticket, UnitConfig};
use crate::error::{AppError, Result};

/// Issuance request (validated before it reaches the store)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueRequest {
    /// Service id when the unit has a catalog, free label otherwise
    pub service: String,

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

impl IssueRequest {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Default::default()
        }
    }
}

/// Result of issuing a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueOutcome {
    pub ticket: Ticket,
    /// Waiting tickets in the unit, the new one included
    pub position: usize,
}

/// Validate `req` against `unit` and return the service label to store
pub fn validate_request(req: &IssueRequest, unit: &UnitConfig) -> Result<String> {
    if !unit.accepts_tickets() {
        return Err(AppError::InvalidRequest(format!(
            "unit '{}' is not accepting tickets",
            unit.id
        )));
    }

    let service = req.service.trim();
    if service.is_empty() {
        return Err(AppError::InvalidRequest("service is required".to_string()));
    }

    if req.priority && !unit.priority_eligible {
        return Err(AppError::InvalidRequest(format!(
            "unit '{}' does not offer priority service",
            unit.id
        )));
    }

    if req.group_size == Some(0) {
        return Err(AppError::InvalidRequest("group_size must be greater than zero".to_string()));
    }

    if unit.has_catalog() {
        return unit
            .find_service(service)
            .map(|def| def.name.clone())
            .ok_or_else(|| {
                AppError::InvalidRequest(format!(
                    "service '{}' is not available at unit '{}'",
                    service, unit.id
                ))
            });
    }

    Ok(service.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Execute the issue use case against a unit's store
///
/// Validation runs first, so a rejected request never advances the counter.
pub fn execute(
    store: &mut QueueStore,
    unit: &UnitConfig,
    now_millis: i64,
    req: IssueRequest,
) -> Result<IssueOutcome> {
    let service = validate_request(&req, unit)?;

    let (id, visible_number) = sequencer::next_ticket(store, unit, req.group_size);

    let mut ticket = Ticket::new(id, visible_number, service, now_millis);
    ticket.requester_name = non_blank(req.requester_name);
    ticket.requester_contact = non_blank(req.requester_contact);
    ticket.priority = req.priority;
    ticket.priority_kind = if req.priority {
        non_blank(req.priority_kind)
    } else {
        None
    };
    ticket.group_size = req.group_size;

    let ticket = store.push_ticket(ticket).clone();
    let position = store.waiting_count();

    Ok(IssueOutcome { ticket, position })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Availability, ServiceDef};

    fn clinic() -> UnitConfig {
        let mut config = UnitConfig::fallback("pb-carolina");
        config.priority_eligible = true;
        config.services = vec![ServiceDef {
            id: "medico".to_string(),
            name: "Medical care".to_string(),
        }];
        config
    }

    #[test]
    fn test_validate_empty_service() {
        let req = IssueRequest::new("   ");
        let err = validate_request(&req, &UnitConfig::fallback("desk")).unwrap_err();
        assert!(err.to_string().contains("service is required"));
    }

    #[test]
    fn test_validate_catalog_resolves_name() {
        let req = IssueRequest::new("medico");
        assert_eq!(validate_request(&req, &clinic()).unwrap(), "Medical care");
    }

    #[test]
    fn test_validate_unknown_catalog_service() {
        let req = IssueRequest::new("dentist");
        let err = validate_request(&req, &clinic()).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn test_validate_free_label_without_catalog() {
        let req = IssueRequest::new(" General ");
        let label = validate_request(&req, &UnitConfig::fallback("desk")).unwrap();
        assert_eq!(label, "General");
    }

    #[test]
    fn test_validate_priority_requires_eligibility() {
        let mut req = IssueRequest::new("General");
        req.priority = true;
        let err = validate_request(&req, &UnitConfig::fallback("desk")).unwrap_err();
        assert!(err.to_string().contains("priority"));
    }

    #[test]
    fn test_validate_suspended_unit() {
        let mut unit = UnitConfig::fallback("desk");
        unit.availability = Availability::Suspended;
        let err = validate_request(&IssueRequest::new("General"), &unit).unwrap_err();
        assert!(err.to_string().contains("not accepting"));
    }

    #[test]
    fn test_validate_zero_group_size() {
        let mut req = IssueRequest::new("Dinner");
        req.group_size = Some(0);
        assert!(validate_request(&req, &UnitConfig::fallback("desk")).is_err());
    }

    #[test]
    fn test_rejected_request_does_not_advance_counter() {
        let mut store = QueueStore::new();
        let result = execute(&mut store, &clinic(), 1000, IssueRequest::new("dentist"));
        assert!(result.is_err());
        assert_eq!(store.counter(), 0);
        assert!(store.tickets().is_empty());
    }

    #[test]
    fn test_execute_fills_ticket() {
        let mut store = QueueStore::new();
        let req = IssueRequest {
            service: "medico".to_string(),
            requester_name: Some("Ana".to_string()),
            requester_contact: Some("  ".to_string()),
            priority: true,
            priority_kind: Some("elderly".to_string()),
            group_size: None,
        };

        let outcome = execute(&mut store, &clinic(), 5000, req).unwrap();
        assert_eq!(outcome.position, 1);
        assert_eq!(outcome.ticket.id, 1);
        assert_eq!(outcome.ticket.visible_number, "A001");
        assert_eq!(outcome.ticket.service, "Medical care");
        assert_eq!(outcome.ticket.requester_name.as_deref(), Some("Ana"));
        assert!(outcome.ticket.requester_contact.is_none());
        assert_eq!(outcome.ticket.priority_kind.as_deref(), Some("elderly"));
        assert_eq!(outcome.ticket.created_at, 5000);
    }

    #[test]
    fn test_priority_kind_dropped_without_priority() {
        let mut store = QueueStore::new();
        let mut req = IssueRequest::new("medico");
        req.priority_kind = Some("elderly".to_string());

        let outcome = execute(&mut store, &clinic(), 5000, req).unwrap();
        assert!(outcome.ticket.priority_kind.is_none());
    }
}
