//! RPC Method Handlers
//!
//! One method per engine operation. Each call runs inside a span carrying a
//! fresh request id.

use crate::error::to_rpc_error;
use crate::types::{
    validate_unit_id, AssignTableParams, CallNextResponse, HealthResponse, IssueParams,
    IssueResponse, QueueListResponse, RegisterTableParams, TableListResponse, TableResponse,
    TicketResponse, TransitionParams, UnitInfoResponse, UnitParams,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::{info_span, Instrument, Span};
use walkin_core::QueueEngine;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

fn request_span(method: &'static str) -> Span {
    info_span!("rpc", method, request_id = %uuid::Uuid::new_v4())
}

/// RPC Handler with injected engine
pub struct RpcHandler {
    engine: Arc<QueueEngine>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(engine: Arc<QueueEngine>) -> Self {
        Self {
            engine,
            start_time: std::time::Instant::now(),
        }
    }

    /// system.health.v1
    pub async fn health(&self) -> RpcResult<HealthResponse> {
        Ok(HealthResponse {
            status: "ok".to_string(),
            version: walkin_core::VERSION.to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            configured_units: self.engine.registry().len(),
            active_units: self.engine.active_units().await.len(),
        })
    }

    /// unit.info.v1
    pub async fn unit_info(&self, params: UnitParams) -> RpcResult<UnitInfoResponse> {
        async {
            let unit_id = validate_unit_id(&params.unit_id).map_err(to_rpc_error)?;
            let unit = self.engine.unit_info(&unit_id).map_err(to_rpc_error)?;
            Ok(UnitInfoResponse { unit })
        }
        .instrument(request_span("unit.info.v1"))
        .await
    }

    /// queue.issue.v1
    pub async fn issue(&self, params: IssueParams) -> RpcResult<IssueResponse> {
        async {
            let (unit_id, req) = params.validate().map_err(to_rpc_error)?;
            let unit = self.engine.get_or_create_unit(&unit_id).await;
            let outcome = unit.issue_ticket(req).await.map_err(to_rpc_error)?;

            Ok(IssueResponse {
                unit_id,
                ticket: outcome.ticket,
                position: outcome.position,
            })
        }
        .instrument(request_span("queue.issue.v1"))
        .await
    }

    /// queue.list.v1
    pub async fn list(&self, params: UnitParams) -> RpcResult<QueueListResponse> {
        async {
            let unit_id = validate_unit_id(&params.unit_id).map_err(to_rpc_error)?;
            let snapshot = self.engine.get_or_create_unit(&unit_id).await.snapshot().await;

            Ok(QueueListResponse {
                unit_id,
                tickets: snapshot.tickets,
                stats: snapshot.stats,
                summary: snapshot.summary,
                recent_calls: snapshot.recent_calls,
            })
        }
        .instrument(request_span("queue.list.v1"))
        .await
    }

    /// queue.call_next.v1
    pub async fn call_next(&self, params: UnitParams) -> RpcResult<CallNextResponse> {
        async {
            let unit_id = validate_unit_id(&params.unit_id).map_err(to_rpc_error)?;
            let outcome = self.engine.get_or_create_unit(&unit_id).await.call_next().await;
            Ok(CallNextResponse { unit_id, outcome })
        }
        .instrument(request_span("queue.call_next.v1"))
        .await
    }

    /// ticket.transition.v1
    pub async fn transition(&self, params: TransitionParams) -> RpcResult<TicketResponse> {
        async {
            let (unit_id, ticket_id, action) = params.validate().map_err(to_rpc_error)?;
            let ticket = self
                .engine
                .get_or_create_unit(&unit_id)
                .await
                .transition(ticket_id, action)
                .await
                .map_err(to_rpc_error)?;

            Ok(TicketResponse { unit_id, ticket })
        }
        .instrument(request_span("ticket.transition.v1"))
        .await
    }

    /// tables.register.v1
    pub async fn register_table(&self, params: RegisterTableParams) -> RpcResult<TableResponse> {
        async {
            let (unit_id, req) = params.validate().map_err(to_rpc_error)?;
            let table = self
                .engine
                .get_or_create_unit(&unit_id)
                .await
                .register_table(req)
                .await
                .map_err(to_rpc_error)?;

            Ok(TableResponse { unit_id, table })
        }
        .instrument(request_span("tables.register.v1"))
        .await
    }

    /// tables.list.v1
    pub async fn list_tables(&self, params: UnitParams) -> RpcResult<TableListResponse> {
        async {
            let unit_id = validate_unit_id(&params.unit_id).map_err(to_rpc_error)?;
            let tables = self
                .engine
                .get_or_create_unit(&unit_id)
                .await
                .list_tables()
                .await
                .map_err(to_rpc_error)?;

            Ok(TableListResponse { unit_id, tables })
        }
        .instrument(request_span("tables.list.v1"))
        .await
    }

    /// tables.assign.v1
    pub async fn assign_table(&self, params: AssignTableParams) -> RpcResult<TicketResponse> {
        async {
            let (unit_id, table_id, ticket_id) = params.validate().map_err(to_rpc_error)?;
            let ticket = self
                .engine
                .get_or_create_unit(&unit_id)
                .await
                .assign_table(table_id, ticket_id)
                .await
                .map_err(to_rpc_error)?;

            Ok(TicketResponse { unit_id, ticket })
        }
        .instrument(request_span("tables.assign.v1"))
        .await
    }
}
