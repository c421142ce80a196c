//! Shared fixtures: seeded state and test sinks.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use ilp_aggregator::app_state::AppState;
use ilp_aggregator::config;
use ilp_aggregator::sink::{EventSink, SinkError, SinkResult, TransactionEvent};

pub const SEEDED: &str = r#"
version: 1
metrics:
  seed:
    transactions_processed: 1548290
    fatigue_locks: 987
sink:
  publish_timeout_ms: 50
"#;

pub fn state_with(sink: Arc<dyn EventSink>) -> AppState {
    let cfg = config::load_from_str(SEEDED).unwrap();
    AppState::with_sink(cfg, sink).unwrap()
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<TransactionEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<TransactionEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn publish(&self, event: &TransactionEvent) -> SinkResult {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub struct FailingSink;

#[async_trait]
impl EventSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn publish(&self, _event: &TransactionEvent) -> SinkResult {
        Err(SinkError::Unavailable("billing down".into()))
    }
}

pub struct SlowSink(pub Duration);

#[async_trait]
impl EventSink for SlowSink {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn publish(&self, _event: &TransactionEvent) -> SinkResult {
        tokio::time::sleep(self.0).await;
        Ok(())
    }
}
