// Queue Engine - per-unit handles and the operations staff and visitors invoke

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::application::issue::{self, IssueOutcome, IssueRequest};
use crate::application::registry::UnitRegistry;
use crate::domain::{
    InterleaveBasis, QueueSnapshot, QueueStore, Table, TableBoard, TableId, Ticket, TicketAction,
    TicketId, UnitConfig, UnitId,
};
use crate::error::{AppError, Result};
use crate::port::TimeProvider;

/// Outcome of "call next"; an empty queue is a valid result, not an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CallOutcome {
    Called { ticket: Ticket },
    Empty,
}

/// Free-table registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTableRequest {
    pub seats: u32,
    #[serde(default)]
    pub note: Option<String>,
}

/// Engine options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    #[serde(default)]
    pub interleave_basis: InterleaveBasis,
}

struct UnitState {
    queue: QueueStore,
    tables: TableBoard,
}

/// One unit's queue
///
/// Mutations take the write lock for their whole duration, so they are
/// atomic with respect to each other and to snapshots. Units never share a lock.
pub struct UnitHandle {
    config: UnitConfig,
    time_provider: Arc<dyn TimeProvider>,
    options: EngineOptions,
    state: RwLock<UnitState>,
}

impl UnitHandle {
    fn new(
        config: UnitConfig,
        time_provider: Arc<dyn TimeProvider>,
        options: EngineOptions,
    ) -> Self {
        Self {
            config,
            time_provider,
            options,
            state: RwLock::new(UnitState {
                queue: QueueStore::new(),
                tables: TableBoard::new(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// Issue a new ticket
    pub async fn issue_ticket(&self, req: IssueRequest) -> Result<IssueOutcome> {
        let now = self.time_provider.now_millis();
        let mut state = self.state.write().await;

        let outcome = issue::execute(&mut state.queue, &self.config, now, req).map_err(|e| {
            warn!(unit_id = %self.config.id, error = %e, "Ticket issuance rejected");
            e
        })?;

        info!(
            unit_id = %self.config.id,
            ticket_id = outcome.ticket.id,
            visible_number = %outcome.ticket.visible_number,
            priority = outcome.ticket.priority,
            position = outcome.position,
            "Ticket issued"
        );

        Ok(outcome)
    }

    /// Tickets, stats and recent calls
    pub async fn snapshot(&self) -> QueueSnapshot {
        self.state.read().await.queue.snapshot()
    }

    /// Call the next waiting ticket under the priority interleave
    pub async fn call_next(&self) -> CallOutcome {
        let clock = self.time_provider.clock_label();
        let mut state = self.state.write().await;

        match state.queue.call_next(
            self.config.priority_eligible,
            self.options.interleave_basis,
            &clock,
        ) {
            Some(ticket) => {
                info!(
                    unit_id = %self.config.id,
                    ticket_id = ticket.id,
                    visible_number = %ticket.visible_number,
                    priority = ticket.priority,
                    "Next ticket called"
                );
                CallOutcome::Called {
                    ticket: ticket.clone(),
                }
            }
            None => {
                debug!(unit_id = %self.config.id, "Call next: queue empty");
                CallOutcome::Empty
            }
        }
    }

    /// Apply a staff action to one ticket
    pub async fn transition(&self, ticket_id: TicketId, action: TicketAction) -> Result<Ticket> {
        let clock = self.time_provider.clock_label();
        let mut state = self.state.write().await;

        match state.queue.transition(ticket_id, action, &clock) {
            Ok(ticket) => {
                info!(
                    unit_id = %self.config.id,
                    ticket_id,
                    action = %action,
                    status = %ticket.status,
                    "Ticket transitioned"
                );
                Ok(ticket.clone())
            }
            Err(e) => {
                warn!(
                    unit_id = %self.config.id,
                    ticket_id,
                    action = %action,
                    error = %e,
                    "Ticket transition rejected"
                );
                Err(e.into())
            }
        }
    }

    fn ensure_table_mode(&self) -> Result<()> {
        if self.config.table_mode {
            Ok(())
        } else {
            Err(AppError::InvalidRequest(format!(
                "unit '{}' does not use table mode",
                self.config.id
            )))
        }
    }

    /// Register a free table
    pub async fn register_table(&self, req: RegisterTableRequest) -> Result<Table> {
        self.ensure_table_mode()?;
        let now = self.time_provider.now_millis();
        let mut state = self.state.write().await;

        let table = state.tables.register(req.seats, req.note, now)?;
        info!(
            unit_id = %self.config.id,
            table_id = table.id,
            seats = table.seats,
            "Table registered"
        );
        Ok(table)
    }

    /// Free tables in registration order
    pub async fn list_tables(&self) -> Result<Vec<Table>> {
        self.ensure_table_mode()?;
        Ok(self.state.read().await.tables.free_tables().to_vec())
    }

    /// Give a free table to a ticket and call it
    ///
    /// All-or-nothing: on any failure neither the table nor the ticket changes.
    pub async fn assign_table(&self, table_id: TableId, ticket_id: TicketId) -> Result<Ticket> {
        self.ensure_table_mode()?;
        let clock = self.time_provider.clock_label();
        let mut state = self.state.write().await;

        let label = state
            .tables
            .find(table_id)
            .map(Table::label)
            .ok_or_else(|| {
                AppError::InvalidRequest(format!("table {} is not available", table_id))
            })?;

        let ticket = state.queue.call_with_resource(ticket_id, label, &clock)?.clone();
        state.tables.take(table_id);

        info!(
            unit_id = %self.config.id,
            table_id,
            ticket_id,
            visible_number = %ticket.visible_number,
            "Table assigned"
        );
        Ok(ticket)
    }

    /// Copy of the store for an external persistence collaborator
    pub async fn export(&self) -> QueueStore {
        self.state.read().await.queue.clone()
    }
}

/// Process-wide map of units, constructed by the host at startup
pub struct QueueEngine {
    registry: Arc<UnitRegistry>,
    time_provider: Arc<dyn TimeProvider>,
    options: EngineOptions,
    units: RwLock<HashMap<UnitId, Arc<UnitHandle>>>,
}

impl QueueEngine {
    pub fn new(
        registry: Arc<UnitRegistry>,
        time_provider: Arc<dyn TimeProvider>,
        options: EngineOptions,
    ) -> Self {
        Self {
            registry,
            time_provider,
            options,
            units: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// Handle for `unit_id`, created on first reference (idempotent)
    pub async fn get_or_create_unit(&self, unit_id: &str) -> Arc<UnitHandle> {
        if let Some(handle) = self.units.read().await.get(unit_id) {
            return handle.clone();
        }

        let mut units = self.units.write().await;
        units
            .entry(unit_id.to_string())
            .or_insert_with(|| {
                let config = self.registry.resolve(unit_id);
                info!(
                    unit_id = %unit_id,
                    configured = self.registry.is_configured(unit_id),
                    prefix = %config.prefix,
                    "Unit queue created"
                );
                Arc::new(UnitHandle::new(
                    config,
                    self.time_provider.clone(),
                    self.options,
                ))
            })
            .clone()
    }

    /// Strict unit information (unknown units are an error)
    pub fn unit_info(&self, unit_id: &str) -> Result<UnitConfig> {
        self.registry.lookup(unit_id).cloned()
    }

    /// Store of an existing unit, without creating one
    pub async fn export_unit(&self, unit_id: &str) -> Result<QueueStore> {
        let handle = self
            .units
            .read()
            .await
            .get(unit_id)
            .cloned()
            .ok_or_else(|| AppError::UnitNotFound(unit_id.to_string()))?;

        Ok(handle.export().await)
    }

    /// Units that have been referenced so far
    pub async fn active_units(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self.units.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CallKind, TicketStatus, RECENT_CALLS_CAPACITY};
    use crate::port::time_provider::MockTimeProvider;
    use crate::port::FixedTimeProvider;

    fn clinic() -> UnitConfig {
        let mut config = UnitConfig::fallback("pb-carolina");
        config.offset = 1;
        config.priority_eligible = true;
        config
    }

    fn restaurant() -> UnitConfig {
        let mut config = UnitConfig::fallback("restaurante-teste");
        config.prefix = "R".to_string();
        config.offset = 50;
        config.table_mode = true;
        config
    }

    fn engine_with(options: EngineOptions) -> QueueEngine {
        let registry = UnitRegistry::new(vec![clinic(), restaurant()]).unwrap();
        QueueEngine::new(
            Arc::new(registry),
            Arc::new(FixedTimeProvider::new(36_000_000)),
            options,
        )
    }

    fn engine() -> QueueEngine {
        engine_with(EngineOptions::default())
    }

    fn priority(service: &str) -> IssueRequest {
        let mut req = IssueRequest::new(service);
        req.priority = true;
        req
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let engine = engine();
        let first = engine.get_or_create_unit("pb-carolina").await;
        let second = engine.get_or_create_unit("pb-carolina").await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.active_units().await, vec!["pb-carolina".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_unit_uses_default_config() {
        let engine = engine();
        let unit = engine.get_or_create_unit("never-configured").await;
        assert_eq!(unit.config().prefix, "A");
        assert_eq!(unit.config().offset, 0);

        let outcome = unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        assert_eq!(outcome.ticket.visible_number, "A001");
    }

    #[tokio::test]
    async fn test_sequential_issue_is_strictly_increasing() {
        let engine = engine();
        let unit = engine.get_or_create_unit("restaurante-teste").await;

        let mut last_id = 0;
        let mut numbers = std::collections::HashSet::new();
        for _ in 0..25 {
            let outcome = unit.issue_ticket(IssueRequest::new("Dinner")).await.unwrap();
            assert!(outcome.ticket.id > last_id);
            last_id = outcome.ticket.id;
            assert!(numbers.insert(outcome.ticket.visible_number));
        }
    }

    #[tokio::test]
    async fn test_priority_interleave() {
        let engine = engine();
        let unit = engine.get_or_create_unit("pb-carolina").await;

        unit.issue_ticket(priority("General")).await.unwrap();
        for _ in 0..5 {
            unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        }

        let mut called = Vec::new();
        for _ in 0..4 {
            match unit.call_next().await {
                CallOutcome::Called { ticket } => called.push((ticket.id, ticket.priority)),
                CallOutcome::Empty => panic!("queue should not be empty"),
            }
        }

        assert_eq!(called, vec![(1, true), (2, false), (3, false), (4, false)]);
    }

    #[tokio::test]
    async fn test_priority_every_third_call() {
        let engine = engine();
        let unit = engine.get_or_create_unit("pb-carolina").await;

        for _ in 0..4 {
            unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        }
        for _ in 0..2 {
            unit.issue_ticket(priority("General")).await.unwrap();
        }

        let mut order = Vec::new();
        for _ in 0..6 {
            if let CallOutcome::Called { ticket } = unit.call_next().await {
                order.push(ticket.visible_number);
            }
        }

        // log sizes 0..5 -> priority at 0 and 3
        assert_eq!(order, vec!["A005", "A001", "A002", "A006", "A003", "A004"]);
    }

    #[tokio::test]
    async fn test_bounded_window_saturates_cadence() {
        let engine = engine();
        let unit = engine.get_or_create_unit("pb-carolina").await;

        for _ in 0..12 {
            unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        }
        for _ in 0..10 {
            unit.call_next().await;
        }
        unit.issue_ticket(priority("General")).await.unwrap();

        // log is full (10 % 3 == 1): standard ticket goes first
        match unit.call_next().await {
            CallOutcome::Called { ticket } => assert!(!ticket.priority),
            CallOutcome::Empty => panic!("queue should not be empty"),
        }
        // still 10 entries: never lands on a multiple of 3 again
        match unit.call_next().await {
            CallOutcome::Called { ticket } => assert!(!ticket.priority),
            CallOutcome::Empty => panic!("queue should not be empty"),
        }
    }

    #[tokio::test]
    async fn test_lifetime_basis_keeps_cadence() {
        let engine = engine_with(EngineOptions {
            interleave_basis: InterleaveBasis::Lifetime,
        });
        let unit = engine.get_or_create_unit("pb-carolina").await;

        for _ in 0..14 {
            unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        }
        for _ in 0..11 {
            unit.call_next().await;
        }
        unit.issue_ticket(priority("General")).await.unwrap();

        // lifetime 11 -> standard, lifetime 12 -> priority
        match unit.call_next().await {
            CallOutcome::Called { ticket } => assert!(!ticket.priority),
            CallOutcome::Empty => panic!("queue should not be empty"),
        }
        match unit.call_next().await {
            CallOutcome::Called { ticket } => assert!(ticket.priority),
            CallOutcome::Empty => panic!("queue should not be empty"),
        }
    }

    #[tokio::test]
    async fn test_call_next_empty() {
        let engine = engine();
        let unit = engine.get_or_create_unit("pb-carolina").await;
        assert_eq!(unit.call_next().await, CallOutcome::Empty);
        assert!(unit.snapshot().await.recent_calls.is_empty());
    }

    #[tokio::test]
    async fn test_resumed_ticket_must_be_called_again() {
        let engine = engine();
        let unit = engine.get_or_create_unit("pb-carolina").await;
        unit.issue_ticket(IssueRequest::new("General")).await.unwrap();

        unit.transition(1, TicketAction::Call).await.unwrap();
        unit.transition(1, TicketAction::Hold).await.unwrap();
        let resumed = unit.transition(1, TicketAction::Resume).await.unwrap();
        assert_eq!(resumed.status, TicketStatus::Waiting);

        match unit.call_next().await {
            CallOutcome::Called { ticket } => assert_eq!(ticket.id, 1),
            CallOutcome::Empty => panic!("resumed ticket should be callable"),
        }
    }

    #[tokio::test]
    async fn test_invalid_transition_reported() {
        let engine = engine();
        let unit = engine.get_or_create_unit("pb-carolina").await;
        unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        let before = unit.snapshot().await;

        let err = unit.transition(1, TicketAction::Resume).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        assert_eq!(unit.snapshot().await, before);

        let err = unit.transition(99, TicketAction::Call).await.unwrap_err();
        assert_eq!(err, AppError::TicketNotFound(99));
    }

    #[tokio::test]
    async fn test_recent_calls_are_bounded_and_newest_first() {
        let engine = engine();
        let unit = engine.get_or_create_unit("pb-carolina").await;

        for _ in 0..13 {
            unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        }
        for id in 1..=13 {
            unit.transition(id, TicketAction::Call).await.unwrap();
        }

        let snapshot = unit.snapshot().await;
        assert_eq!(snapshot.recent_calls.len(), RECENT_CALLS_CAPACITY);
        assert_eq!(snapshot.recent_calls[0].visible_number, "A013");
        assert_eq!(snapshot.recent_calls[9].visible_number, "A004");
        assert!(snapshot.recent_calls.iter().all(|e| e.kind == CallKind::Manual));
        assert_eq!(snapshot.recent_calls[0].time_of_day, "10:00");
    }

    #[tokio::test]
    async fn test_table_assignment() {
        let engine = engine();
        let unit = engine.get_or_create_unit("restaurante-teste").await;

        let mut req = IssueRequest::new("Dinner");
        req.group_size = Some(4);
        let issued = unit.issue_ticket(req).await.unwrap();
        assert_eq!(issued.ticket.visible_number, "4R050");

        let table = unit
            .register_table(RegisterTableRequest { seats: 4, note: None })
            .await
            .unwrap();

        let ticket = unit.assign_table(table.id, issued.ticket.id).await.unwrap();
        assert_eq!(ticket.status, TicketStatus::InService);
        assert_eq!(ticket.assigned_resource.as_deref(), Some("Table 1 (4 seats)"));
        assert!(unit.list_tables().await.unwrap().is_empty());

        let snapshot = unit.snapshot().await;
        assert_eq!(snapshot.recent_calls[0].resource.as_deref(), Some("Table 1 (4 seats)"));
    }

    #[tokio::test]
    async fn test_failed_table_assignment_keeps_table_free() {
        let engine = engine();
        let unit = engine.get_or_create_unit("restaurante-teste").await;
        unit.issue_ticket(IssueRequest::new("Dinner")).await.unwrap();
        unit.transition(1, TicketAction::Served).await.unwrap();
        unit.register_table(RegisterTableRequest { seats: 2, note: None })
            .await
            .unwrap();

        let err = unit.assign_table(1, 1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        assert_eq!(unit.list_tables().await.unwrap().len(), 1);

        let err = unit.assign_table(7, 1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_table_assignment_to_unknown_ticket_keeps_table_free() {
        let engine = engine();
        let unit = engine.get_or_create_unit("restaurante-teste").await;
        unit.register_table(RegisterTableRequest { seats: 4, note: None })
            .await
            .unwrap();

        let err = unit.assign_table(1, 42).await.unwrap_err();
        assert!(matches!(err, AppError::TicketNotFound(42)));
        assert_eq!(unit.list_tables().await.unwrap().len(), 1);
        assert!(unit.snapshot().await.recent_calls.is_empty());
    }

    #[tokio::test]
    async fn test_tables_require_table_mode() {
        let engine = engine();
        let unit = engine.get_or_create_unit("pb-carolina").await;
        let err = unit
            .register_table(RegisterTableRequest { seats: 2, note: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_unit_info_is_strict() {
        let engine = engine();
        assert!(engine.unit_info("pb-carolina").is_ok());
        assert_eq!(
            engine.unit_info("never-configured").unwrap_err(),
            AppError::UnitNotFound("never-configured".to_string())
        );
    }

    #[tokio::test]
    async fn test_export_unit() {
        let engine = engine();
        assert!(engine.export_unit("pb-carolina").await.is_err());

        let unit = engine.get_or_create_unit("pb-carolina").await;
        unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        unit.call_next().await;

        let store = engine.export_unit("pb-carolina").await.unwrap();
        assert_eq!(store.counter(), 1);
        assert_eq!(store.recent_calls().len(), 1);
        assert_eq!(store.lifetime_calls(), 1);
    }

    #[tokio::test]
    async fn test_clock_is_injected() {
        let mut clock = MockTimeProvider::new();
        clock.expect_now_millis().return_const(42_i64);
        clock
            .expect_clock_label()
            .returning(|| "07:30".to_string());

        let engine = QueueEngine::new(
            Arc::new(UnitRegistry::empty()),
            Arc::new(clock),
            EngineOptions::default(),
        );
        let unit = engine.get_or_create_unit("desk").await;

        let outcome = unit.issue_ticket(IssueRequest::new("General")).await.unwrap();
        assert_eq!(outcome.ticket.created_at, 42);

        unit.call_next().await;
        assert_eq!(unit.snapshot().await.recent_calls[0].time_of_day, "07:30");
    }
}
