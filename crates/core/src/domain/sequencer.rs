// Ticket Sequencer - internal ids and visible numbers

use crate::domain::queue::QueueStore;
use crate::domain::ticket::TicketId;
use crate::domain::unit::UnitConfig;

/// Render the visible number for sequence `seq`
///
/// `{prefix}{NNN}` where NNN is `offset + seq - 1` padded to three digits.
/// Table-mode units with a party size render `{size}{prefix}{NNN}`.
/// An offset of 0 numbers from 1, same as an offset of 1.
pub fn visible_number(unit: &UnitConfig, seq: TicketId, group_size: Option<u32>) -> String {
    let first = u64::from(unit.offset.max(1));
    let value = first + seq.saturating_sub(1);

    match group_size {
        Some(size) if unit.table_mode && size > 0 => {
            format!("{}{}{:03}", size, unit.prefix, value)
        }
        _ => format!("{}{:03}", unit.prefix, value),
    }
}

/// Advance the unit counter and derive the new ticket's id and visible number
pub fn next_ticket(
    store: &mut QueueStore,
    unit: &UnitConfig,
    group_size: Option<u32>,
) -> (TicketId, String) {
    let seq = store.advance_counter();
    (seq, visible_number(unit, seq, group_size))
}
