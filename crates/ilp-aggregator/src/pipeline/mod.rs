//! Transaction ingestion: validate, count, notify downstream.
//!
//! Per accepted submission: exactly one `transactions_processed` increment and
//! at most one sink publish attempt. Rejections touch neither. The publish is
//! awaited under `publish_timeout` and any failure is logged and counted, so
//! a slow or dead downstream never fails or stalls a submission beyond that
//! bound.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use ilp_core::error::IngestionError;
use ilp_core::record::{RawTransaction, TransactionRecord, ValidRecord};
use ilp_core::store::{CounterKind, MetricsStore};
use ilp_core::validate::TransactionValidator;

use crate::obs::ServiceMetrics;
use crate::sink::{EventSink, TransactionEvent};

/// Returned for every accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub accepted: bool,
    /// Post-increment `transactions_processed`.
    pub sequence: u64,
}

/// Operational events reported by terminals alongside transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    FatigueLock,
    Mismatch,
    CameraFailure,
}

impl SignalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::FatigueLock => "fatigue_lock",
            SignalKind::Mismatch => "mismatch",
            SignalKind::CameraFailure => "camera_failure",
        }
    }

    pub fn counter(self) -> CounterKind {
        match self {
            SignalKind::FatigueLock => CounterKind::FatigueLocks,
            SignalKind::Mismatch => CounterKind::MismatchCount,
            SignalKind::CameraFailure => CounterKind::CameraFailureCount,
        }
    }
}

pub struct IngestionPipeline {
    validator: TransactionValidator,
    store: Arc<MetricsStore>,
    sink: Arc<dyn EventSink>,
    publish_timeout: Duration,
    metrics: Arc<ServiceMetrics>,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<MetricsStore>,
        sink: Arc<dyn EventSink>,
        publish_timeout: Duration,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            validator: TransactionValidator::new(),
            store,
            sink,
            publish_timeout,
            metrics,
        }
    }

    /// Submit a wire record from a terminal.
    pub async fn submit(&self, raw: RawTransaction) -> Result<Acknowledgement, IngestionError> {
        let started = Instant::now();
        let res = self.validator.validate(raw);
        self.finish(res, started).await
    }

    /// Submit an already-typed record.
    pub async fn submit_record(
        &self,
        record: TransactionRecord,
    ) -> Result<Acknowledgement, IngestionError> {
        let started = Instant::now();
        let res = self.validator.check(record);
        self.finish(res, started).await
    }

    /// Count an operational signal; returns the counter's new total.
    pub fn record_signal(&self, kind: SignalKind) -> u64 {
        let total = self.store.increment(kind.counter());
        self.metrics.signals.inc(&[("kind", kind.as_str())]);
        tracing::info!(signal = kind.as_str(), total, "operational signal recorded");
        total
    }

    async fn finish(
        &self,
        res: Result<ValidRecord, ilp_core::ValidationError>,
        started: Instant,
    ) -> Result<Acknowledgement, IngestionError> {
        let record = match res {
            Ok(r) => r,
            Err(e) => {
                let code = e.client_code().as_str();
                self.metrics.submissions.inc(&[("outcome", "rejected")]);
                self.metrics.rejections.inc(&[("code", code)]);
                self.metrics
                    .submit_duration
                    .observe(&[("outcome", "rejected")], started.elapsed());
                tracing::warn!(code, reason = %e, "transaction rejected");
                return Err(IngestionError::Rejected(e));
            }
        };

        let sequence = self.store.increment_transactions();
        tracing::info!(
            agent_id = %record.agent_id(),
            value_ghs = record.value_ghs(),
            sequence,
            "transaction recorded"
        );

        let event = TransactionEvent::new(sequence, &record, now_millis());
        self.publish(&event).await;

        self.metrics.submissions.inc(&[("outcome", "accepted")]);
        self.metrics
            .submit_duration
            .observe(&[("outcome", "accepted")], started.elapsed());

        Ok(Acknowledgement {
            accepted: true,
            sequence,
        })
    }

    async fn publish(&self, event: &TransactionEvent) {
        let sink = self.sink.name();
        match timeout(self.publish_timeout, self.sink.publish(event)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.metrics.sink_failures.inc(&[("sink", sink), ("kind", "error")]);
                tracing::warn!(sink, sequence = event.sequence, error = %e, "event publish failed");
            }
            Err(_) => {
                self.metrics.sink_failures.inc(&[("sink", sink), ("kind", "timeout")]);
                tracing::warn!(
                    sink,
                    sequence = event.sequence,
                    timeout_ms = self.publish_timeout.as_millis() as u64,
                    "event publish abandoned"
                );
            }
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
