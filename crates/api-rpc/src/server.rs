//! JSON-RPC Server
//!
//! Serves the queue methods over HTTP on a local TCP address.

use crate::error::to_rpc_error;
use crate::handler::RpcHandler;
use crate::types::{
    AssignTableParams, IssueParams, RegisterTableParams, TransitionParams, UnitParams,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::{ErrorObjectOwned, Params};
use jsonrpsee::RpcModule;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use walkin_core::{AppError, QueueEngine};

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

/// Deserialize params, reporting shape or type errors as `invalid_request`
fn parse_params<P: DeserializeOwned>(params: Params<'_>) -> Result<P, ErrorObjectOwned> {
    params.parse().map_err(|e: ErrorObjectOwned| {
        let detail = e
            .data()
            .and_then(|data| serde_json::from_str::<String>(data.get()).ok())
            .unwrap_or_else(|| e.message().to_string());
        to_rpc_error(AppError::InvalidRequest(detail))
    })
}

/// Register a method whose named params deserialize into `P`
fn register_method<P, R, F, Fut>(
    module: &mut RpcModule<()>,
    name: &'static str,
    handler: &Arc<RpcHandler>,
    call: F,
) -> Result<(), String>
where
    P: DeserializeOwned + Send + 'static,
    R: Serialize + Clone + Send + 'static,
    F: Fn(Arc<RpcHandler>, P) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ErrorObjectOwned>> + Send + 'static,
{
    let handler = handler.clone();
    module
        .register_async_method(name, move |params, _, _| {
            let handler = handler.clone();
            let call = call.clone();
            async move {
                let req: P = parse_params(params)?;
                call(handler, req).await
            }
        })
        .map_err(|e| e.to_string())?;
    Ok(())
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, engine: Arc<QueueEngine>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(engine)),
        }
    }

    /// Build the method table
    pub fn module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("system.health.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.health().await }
            })
            .map_err(|e| e.to_string())?;

        register_method(
            &mut module,
            "unit.info.v1",
            &self.handler,
            |h, p: UnitParams| async move { h.unit_info(p).await },
        )?;
        register_method(
            &mut module,
            "queue.issue.v1",
            &self.handler,
            |h, p: IssueParams| async move { h.issue(p).await },
        )?;
        register_method(
            &mut module,
            "queue.list.v1",
            &self.handler,
            |h, p: UnitParams| async move { h.list(p).await },
        )?;
        register_method(
            &mut module,
            "queue.call_next.v1",
            &self.handler,
            |h, p: UnitParams| async move { h.call_next(p).await },
        )?;
        register_method(
            &mut module,
            "ticket.transition.v1",
            &self.handler,
            |h, p: TransitionParams| async move { h.transition(p).await },
        )?;
        register_method(
            &mut module,
            "tables.register.v1",
            &self.handler,
            |h, p: RegisterTableParams| async move { h.register_table(p).await },
        )?;
        register_method(
            &mut module,
            "tables.list.v1",
            &self.handler,
            |h, p: UnitParams| async move { h.list_tables(p).await },
        )?;
        register_method(
            &mut module,
            "tables.assign.v1",
            &self.handler,
            |h, p: AssignTableParams| async move { h.assign_table(p).await },
        )?;

        Ok(module)
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address (useful with port 0) and the stop handle.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let module = self.module()?;
        let handle = server.start(module);

        info!(addr = %local_addr, "JSON-RPC server started successfully");
        Ok((local_addr, handle))
    }
}
