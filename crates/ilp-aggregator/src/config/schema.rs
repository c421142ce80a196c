use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use ilp_core::aggregate::DEFAULT_PENALTY_FACTOR;
use ilp_core::error::{IlpError, Result};
use ilp_core::store::CounterSeed;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub sink: SinkSection,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(IlpError::UnsupportedVersion);
        }

        self.service.validate()?;
        self.metrics.validate()?;
        self.sink.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServiceSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            IlpError::BadRequest(format!("service.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Multiplier on fatigue locks when deriving `checks_passed`.
    #[serde(default = "default_penalty_factor")]
    pub penalty_factor: u64,

    /// Initial counters (externally loaded values).
    #[serde(default)]
    pub seed: CounterSeed,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            penalty_factor: default_penalty_factor(),
            seed: CounterSeed::default(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.penalty_factor > 1000 {
            return Err(IlpError::BadRequest(
                "metrics.penalty_factor must be between 0 and 1000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkSection {
    #[serde(default = "default_publish_timeout_ms")]
    pub publish_timeout_ms: u64,
}

impl Default for SinkSection {
    fn default() -> Self {
        Self {
            publish_timeout_ms: default_publish_timeout_ms(),
        }
    }
}

impl SinkSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=5000).contains(&self.publish_timeout_ms) {
            return Err(IlpError::BadRequest(
                "sink.publish_timeout_ms must be between 1 and 5000".into(),
            ));
        }
        Ok(())
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_penalty_factor() -> u64 {
    DEFAULT_PENALTY_FACTOR
}
fn default_publish_timeout_ms() -> u64 {
    50
}
