// Call Selector - which waiting ticket "call next" picks

use serde::{Deserialize, Serialize};

use crate::domain::ticket::Ticket;

/// One call in every `PRIORITY_CADENCE` goes to the priority line first
pub const PRIORITY_CADENCE: u64 = 3;

/// Which call count drives the priority interleave
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterleaveBasis {
    /// Length of the recent-calls log. It saturates at the log capacity, so
    /// once ten calls exist the cadence stays on the same phase.
    #[default]
    RecentWindow,
    /// Every call the unit has made since it was created
    Lifetime,
}

/// Pick the index of the next ticket to call, or `None` when nobody is waiting
///
/// Waiting tickets are split into a priority line and a standard line, both in
/// creation order. When `call_count % 3 == 0` the oldest priority ticket wins;
/// otherwise the oldest standard ticket, falling back to priority. Units that
/// are not priority-eligible are served in plain creation order.
pub fn select_next(tickets: &[Ticket], priority_eligible: bool, call_count: u64) -> Option<usize> {
    if !priority_eligible {
        return tickets.iter().position(Ticket::is_waiting);
    }

    let mut oldest_priority = None;
    let mut oldest_standard = None;

    for (idx, ticket) in tickets.iter().enumerate().filter(|(_, t)| t.is_waiting()) {
        if ticket.priority {
            oldest_priority.get_or_insert(idx);
        } else {
            oldest_standard.get_or_insert(idx);
        }

        if oldest_priority.is_some() && oldest_standard.is_some() {
            break;
        }
    }

    if call_count % PRIORITY_CADENCE == 0 {
        if let Some(idx) = oldest_priority {
            return Some(idx);
        }
    }

    oldest_standard.or(oldest_priority)
}
