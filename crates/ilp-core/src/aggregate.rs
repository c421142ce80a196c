//! Derived operational metrics, projected from counter snapshots.
//!
//! Derivation rules:
//! - `checks_passed = transactions_processed - fatigue_locks * penalty_factor`,
//!   clamped at zero.
//! - `mismatch_rate` / `camera_failure_rate` = count / transactions_processed,
//!   zero when nothing has been processed, capped at 1.
//!
//! The penalty factor (default 5) is carried over as a business rule with no
//! documented derivation; it stays configurable rather than hardcoded.

use std::sync::Arc;

use serde::Serialize;

use crate::store::{CounterSnapshot, MetricsStore};

pub const DEFAULT_PENALTY_FACTOR: u64 = 5;

/// Point-in-time metrics: raw counters plus everything derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub transactions_processed: u64,
    pub fatigue_locks: u64,
    pub checks_passed: u64,
    pub mismatch_count: u64,
    pub mismatch_rate: f64,
    pub camera_failure_count: u64,
    pub camera_failure_rate: f64,
}

impl MetricsSnapshot {
    pub fn derive(raw: CounterSnapshot, penalty_factor: u64) -> Self {
        let processed = raw.transactions_processed;
        let penalty = raw.fatigue_locks.saturating_mul(penalty_factor);

        Self {
            transactions_processed: processed,
            fatigue_locks: raw.fatigue_locks,
            checks_passed: processed.saturating_sub(penalty),
            mismatch_count: raw.mismatch_count,
            mismatch_rate: rate(raw.mismatch_count, processed),
            camera_failure_count: raw.camera_failure_count,
            camera_failure_rate: rate(raw.camera_failure_count, processed),
        }
    }

    /// Dashboard-facing projection.
    pub fn view(&self) -> OperationalMetricsView {
        OperationalMetricsView {
            transactions_processed: self.transactions_processed,
            checks_passed: self.checks_passed,
            mismatch_rate: self.mismatch_rate,
            fatigue_locks: self.fatigue_locks,
            camera_failure_rate: self.camera_failure_rate,
        }
    }
}

/// The read-endpoint payload: exactly these five keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperationalMetricsView {
    pub transactions_processed: u64,
    pub checks_passed: u64,
    pub mismatch_rate: f64,
    pub fatigue_locks: u64,
    pub camera_failure_rate: f64,
}

// Counters are read independently, so a count can briefly run ahead of the
// denominator; the cap keeps the rate inside [0, 1].
fn rate(count: u64, processed: u64) -> f64 {
    if processed == 0 {
        return 0.0;
    }
    (count as f64 / processed as f64).min(1.0)
}

/// Read-only projection over a shared `MetricsStore`.
#[derive(Clone)]
pub struct MetricsAggregator {
    store: Arc<MetricsStore>,
    penalty_factor: u64,
}

impl MetricsAggregator {
    pub fn new(store: Arc<MetricsStore>, penalty_factor: u64) -> Self {
        Self {
            store,
            penalty_factor,
        }
    }

    pub fn penalty_factor(&self) -> u64 {
        self.penalty_factor
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::derive(self.store.snapshot(), self.penalty_factor)
    }

    pub fn compute_operational_metrics(&self) -> OperationalMetricsView {
        self.snapshot().view()
    }
}
