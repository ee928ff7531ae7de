// Call Events and the bounded recent-calls log

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;

/// Number of call events kept per unit
pub const RECENT_CALLS_CAPACITY: usize = 10;

/// How a ticket was called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    /// Picked by "call next"
    Auto,
    /// Called explicitly by staff
    Manual,
}

/// Audit record of one call action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEvent {
    pub visible_number: String,
    pub service: String,
    pub time_of_day: String, // HH:MM
    pub kind: CallKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl CallEvent {
    pub fn for_ticket(ticket: &Ticket, kind: CallKind, time_of_day: impl Into<String>) -> Self {
        Self {
            visible_number: ticket.visible_number.clone(),
            service: ticket.service.clone(),
            time_of_day: time_of_day.into(),
            kind,
            resource: ticket.assigned_resource.clone(),
        }
    }
}

/// Most-recent-first ring of call events, never longer than `RECENT_CALLS_CAPACITY`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentCalls {
    entries: VecDeque<CallEvent>,
}

impl RecentCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the head, evicting the oldest entry on overflow
    pub fn push(&mut self, event: CallEvent) {
        self.entries.push_front(event);
        self.entries.truncate(RECENT_CALLS_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&CallEvent> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CallEvent> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<CallEvent> {
        self.entries.iter().cloned().collect()
    }
}
