//! Daemon configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `WALKIN_*` environment variables (`__` separates nested keys,
//! e.g. `WALKIN_RPC__PORT=9700`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use walkin_api_rpc::server::{RpcServerConfig, DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use walkin_core::application::EngineOptions;
use walkin_core::domain::UnitConfig;
use walkin_core::UnitRegistry;

const CONFIG_FILE_NAME: &str = "walkin.toml";
const ENV_PREFIX: &str = "WALKIN";

#[derive(Debug, Clone, Deserialize)]
pub struct RpcSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSettings {
    #[serde(default)]
    pub format: LogFormat,
    /// Directory for daily rolling log files; stdout when unset
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub rpc: RpcSettings,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub queue: EngineOptions,
    #[serde(default)]
    pub units: Vec<UnitConfig>,
}

/// Config file location: `WALKIN_CONFIG`, else the platform config dir
pub fn config_path() -> Option<PathBuf> {
    resolve_config_path(std::env::var("WALKIN_CONFIG").ok())
}

fn resolve_config_path(explicit: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(shellexpand::tilde(&path).into_owned()));
    }

    directories::ProjectDirs::from("", "", "walkin")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("rpc.host", DEFAULT_RPC_HOST)?
        .set_default("rpc.port", i64::from(DEFAULT_RPC_PORT))?)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load defaults < file (if present) < environment
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<PathBuf>, env: Environment) -> Result<Self> {
        let mut builder = defaults()?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn rpc_config(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc.host.clone(),
            port: self.rpc.port,
        }
    }

    pub fn registry(&self) -> Result<UnitRegistry> {
        UnitRegistry::new(self.units.clone()).context("Invalid unit configuration")
    }
}
