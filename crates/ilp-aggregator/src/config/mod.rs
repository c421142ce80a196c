//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use ilp_core::error::{IlpError, Result};

pub use schema::{MetricsSection, ServiceConfig, ServiceSection, SinkSection};

/// Env var naming the config file; falls back to `ilp.yaml`.
pub const CONFIG_ENV: &str = "ILP_CONFIG";

pub fn load_from_env() -> Result<ServiceConfig> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "ilp.yaml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| IlpError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| IlpError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
