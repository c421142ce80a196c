//! Downstream notification target (billing and friends).
//!
//! The pipeline treats every sink as best-effort: publish is bounded by a
//! timeout and failures are logged, never returned to the submitter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use ilp_core::record::ValidRecord;

/// Event emitted once per accepted transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionEvent {
    pub sequence: u64,
    pub agent_id: String,
    pub value_ghs: f64,
    pub metadata: BTreeMap<String, Value>,
    pub received_at_ms: u64,
}

impl TransactionEvent {
    pub fn new(sequence: u64, record: &ValidRecord, received_at_ms: u64) -> Self {
        Self {
            sequence,
            agent_id: record.agent_id().to_string(),
            value_ghs: record.value_ghs(),
            metadata: record.metadata().clone(),
            received_at_ms,
        }
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),
    #[error("sink rejected event: {0}")]
    Rejected(String),
}

pub type SinkResult = std::result::Result<(), SinkError>;

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Short name used in logs and metric labels.
    fn name(&self) -> &'static str;
    async fn publish(&self, event: &TransactionEvent) -> SinkResult;
}

/// Writes events to the tracing pipeline only. Default when no downstream is wired.
#[derive(Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn publish(&self, event: &TransactionEvent) -> SinkResult {
        tracing::debug!(
            sequence = event.sequence,
            agent_id = %event.agent_id,
            value_ghs = event.value_ghs,
            "transaction event"
        );
        Ok(())
    }
}
