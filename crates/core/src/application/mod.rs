// Application Layer - Use Cases and the Queue Engine

pub mod engine;
pub mod issue;
pub mod registry;

// Re-exports
pub use engine::{CallOutcome, EngineOptions, QueueEngine, RegisterTableRequest, UnitHandle};
pub use issue::{IssueOutcome, IssueRequest};
pub use registry::UnitRegistry;
