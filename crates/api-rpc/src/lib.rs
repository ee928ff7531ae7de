//! JSON-RPC API Layer
//!
//! Exposes the queue engine as JSON-RPC 2.0 methods named `<area>.<verb>.v1`.
//! Request bodies are validated here, once, before they reach the engine.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
