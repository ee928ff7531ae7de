//! Shared fixtures: the two reference units and a fixed 10:00 clock

#![allow(dead_code)]

use std::sync::Arc;

use walkin_api_rpc::types::{IssueParams, TransitionParams, UnitParams};
use walkin_api_rpc::RpcHandler;
use walkin_core::application::EngineOptions;
use walkin_core::domain::{ServiceDef, Segment, UnitConfig};
use walkin_core::port::FixedTimeProvider;
use walkin_core::{QueueEngine, UnitRegistry};

pub const CLINIC: &str = "pb-carolina";
pub const RESTAURANT: &str = "restaurante-teste";

/// 10:00 UTC
pub const TEN_AM_MILLIS: i64 = 36_000_000;

pub fn clinic() -> UnitConfig {
    let mut config = UnitConfig::fallback(CLINIC);
    config.name = "UBS PB Carolina".to_string();
    config.segment = Segment::Health;
    config.offset = 1;
    config.priority_eligible = true;
    config.services = vec![
        ServiceDef {
            id: "medico".to_string(),
            name: "Medical care".to_string(),
        },
        ServiceDef {
            id: "vacina".to_string(),
            name: "Vaccination".to_string(),
        },
    ];
    config
}

pub fn restaurant() -> UnitConfig {
    let mut config = UnitConfig::fallback(RESTAURANT);
    config.name = "Restaurante Teste".to_string();
    config.prefix = "R".to_string();
    config.offset = 50;
    config.table_mode = true;
    config
}

pub fn engine_with(options: EngineOptions) -> Arc<QueueEngine> {
    let registry = UnitRegistry::new(vec![clinic(), restaurant()]).unwrap();
    Arc::new(QueueEngine::new(
        Arc::new(registry),
        Arc::new(FixedTimeProvider::new(TEN_AM_MILLIS)),
        options,
    ))
}

pub fn engine() -> Arc<QueueEngine> {
    engine_with(EngineOptions::default())
}

pub fn handler() -> RpcHandler {
    RpcHandler::new(engine())
}

pub fn unit(unit_id: &str) -> UnitParams {
    UnitParams {
        unit_id: unit_id.to_string(),
    }
}

pub fn issue(unit_id: &str, service: &str) -> IssueParams {
    IssueParams {
        unit_id: unit_id.to_string(),
        service: Some(service.to_string()),
        requester_name: None,
        requester_contact: None,
        priority: false,
        priority_kind: None,
        group_size: None,
    }
}

pub fn issue_priority(unit_id: &str, service: &str, kind: &str) -> IssueParams {
    IssueParams {
        priority: true,
        priority_kind: Some(kind.to_string()),
        ..issue(unit_id, service)
    }
}

pub fn transition(unit_id: &str, ticket_id: u64, action: &str) -> TransitionParams {
    TransitionParams {
        unit_id: unit_id.to_string(),
        ticket_id,
        action: action.to_string(),
    }
}
