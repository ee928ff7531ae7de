// Queue Store - per-unit aggregate of tickets and recent calls

use serde::{Deserialize, Serialize};

use crate::domain::call::{CallEvent, CallKind, RecentCalls};
use crate::domain::error::{DomainError, Result};
use crate::domain::selector::{self, InterleaveBasis};
use crate::domain::ticket::{Ticket, TicketAction, TicketId, TicketStatus};

/// Ticket counts by status, computed on demand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total: usize,
    pub waiting: usize,
    pub in_service: usize,
    pub on_hold: usize,
    pub served: usize,
    pub absent: usize,
}

/// Two-bucket view used by displays: everything not finished counts as active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedStats {
    pub total: usize,
    pub active: usize,
    pub served: usize,
    pub absent: usize,
}

impl QueueStats {
    pub fn collapsed(&self) -> CollapsedStats {
        CollapsedStats {
            total: self.total,
            active: self.waiting + self.in_service + self.on_hold,
            served: self.served,
            absent: self.absent,
        }
    }
}

/// Read model returned by "list queue"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub tickets: Vec<Ticket>,
    pub stats: QueueStats,
    pub summary: CollapsedStats,
    pub recent_calls: Vec<CallEvent>,
}

/// Per-unit queue state
///
/// Tickets stay in creation order and are never removed or reordered; call
/// order is computed on read by the selector. All fields serialize verbatim so
/// a persistence collaborator can replay them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStore {
    counter: u64,
    tickets: Vec<Ticket>,
    recent_calls: RecentCalls,
    #[serde(default)]
    lifetime_calls: u64,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn recent_calls(&self) -> &RecentCalls {
        &self.recent_calls
    }

    pub fn lifetime_calls(&self) -> u64 {
        self.lifetime_calls
    }

    pub(crate) fn advance_counter(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }

    pub(crate) fn push_ticket(&mut self, ticket: Ticket) -> &Ticket {
        self.tickets.push(ticket);
        &self.tickets[self.tickets.len() - 1]
    }

    /// Record a call at the head of the recent-calls log
    pub fn append_call_event(&mut self, event: CallEvent) {
        self.recent_calls.push(event);
        self.lifetime_calls += 1;
    }

    /// Count fed to the priority interleave
    pub fn call_count(&self, basis: InterleaveBasis) -> u64 {
        match basis {
            InterleaveBasis::RecentWindow => self.recent_calls.len() as u64,
            InterleaveBasis::Lifetime => self.lifetime_calls,
        }
    }

    fn position(&self, id: TicketId) -> Result<usize> {
        self.tickets
            .iter()
            .position(|ticket| ticket.id == id)
            .ok_or(DomainError::TicketNotFound(id))
    }

    /// Apply a staff action. Calls are logged as manual.
    pub fn transition(
        &mut self,
        id: TicketId,
        action: TicketAction,
        time_of_day: &str,
    ) -> Result<&Ticket> {
        let idx = self.position(id)?;
        self.tickets[idx].apply(action)?;

        if action == TicketAction::Call {
            let event = CallEvent::for_ticket(&self.tickets[idx], CallKind::Manual, time_of_day);
            self.append_call_event(event);
        }

        Ok(&self.tickets[idx])
    }

    /// Call a ticket and record the resource it was given (table assignment)
    pub fn call_with_resource(
        &mut self,
        id: TicketId,
        resource: String,
        time_of_day: &str,
    ) -> Result<&Ticket> {
        let idx = self.position(id)?;
        self.tickets[idx].check(TicketAction::Call)?;

        let ticket = &mut self.tickets[idx];
        ticket.assigned_resource = Some(resource);
        ticket.apply(TicketAction::Call)?;

        let event = CallEvent::for_ticket(&self.tickets[idx], CallKind::Manual, time_of_day);
        self.append_call_event(event);
        Ok(&self.tickets[idx])
    }

    /// Select, call and log the next waiting ticket; `None` when the queue is empty
    pub fn call_next(
        &mut self,
        priority_eligible: bool,
        basis: InterleaveBasis,
        time_of_day: &str,
    ) -> Option<&Ticket> {
        let call_count = self.call_count(basis);
        let idx = selector::select_next(&self.tickets, priority_eligible, call_count)?;

        // Selector only returns waiting tickets
        self.tickets[idx].apply(TicketAction::Call).ok()?;
        let event = CallEvent::for_ticket(&self.tickets[idx], CallKind::Auto, time_of_day);
        self.append_call_event(event);

        Some(&self.tickets[idx])
    }

    pub fn waiting_count(&self) -> usize {
        self.tickets.iter().filter(|t| t.is_waiting()).count()
    }

    pub fn stats(&self) -> QueueStats {
        let mut stats = QueueStats {
            total: self.tickets.len(),
            ..Default::default()
        };

        for ticket in &self.tickets {
            match ticket.status {
                TicketStatus::Waiting => stats.waiting += 1,
                TicketStatus::InService => stats.in_service += 1,
                TicketStatus::OnHold => stats.on_hold += 1,
                TicketStatus::Served => stats.served += 1,
                TicketStatus::Absent => stats.absent += 1,
            }
        }

        stats
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let stats = self.stats();
        QueueSnapshot {
            tickets: self.tickets.clone(),
            stats,
            summary: stats.collapsed(),
            recent_calls: self.recent_calls.to_vec(),
        }
    }
}
