// Walkin Core - Queue Engine Domain Logic & Ports
// NO transport or persistence dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{QueueEngine, UnitHandle, UnitRegistry};
pub use error::{AppError, ErrorKind, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
