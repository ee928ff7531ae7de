// Domain Layer - Pure queue logic and entities

pub mod call;
pub mod error;
pub mod queue;
pub mod selector;
pub mod sequencer;
pub mod table;
pub mod ticket;
pub mod unit;

// Re-exports
pub use call::{CallEvent, CallKind, RecentCalls, RECENT_CALLS_CAPACITY};
pub use error::DomainError;
pub use queue::{CollapsedStats, QueueSnapshot, QueueStats, QueueStore};
pub use selector::InterleaveBasis;
pub use table::{Table, TableBoard, TableId};
pub use ticket::{Ticket, TicketAction, TicketId, TicketStatus};
pub use unit::{Availability, Segment, ServiceDef, UnitConfig, UnitId};
