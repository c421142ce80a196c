//! Process-wide raw counters.
//!
//! Each counter is an independent `AtomicU64`, so increments never lose
//! updates and never contend with each other. `snapshot` loads the four
//! counters one by one: every value is untorn, but the snapshot as a whole is
//! not linearizable across counters. Dashboard readers tolerate that.
//!
//! Durability is delegated to an optional `CounterBackend`. Backend failures
//! are logged and counted; the in-memory totals stay authoritative.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StoreUnavailable;

/// Which raw counter an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    TransactionsProcessed,
    FatigueLocks,
    MismatchCount,
    CameraFailureCount,
}

impl CounterKind {
    pub const ALL: [CounterKind; 4] = [
        CounterKind::TransactionsProcessed,
        CounterKind::FatigueLocks,
        CounterKind::MismatchCount,
        CounterKind::CameraFailureCount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CounterKind::TransactionsProcessed => "transactions_processed",
            CounterKind::FatigueLocks => "fatigue_locks",
            CounterKind::MismatchCount => "mismatch_count",
            CounterKind::CameraFailureCount => "camera_failure_count",
        }
    }
}

/// Initial counter values, zero or loaded from outside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterSeed {
    #[serde(default)]
    pub transactions_processed: u64,
    #[serde(default)]
    pub fatigue_locks: u64,
    #[serde(default)]
    pub mismatch_count: u64,
    #[serde(default)]
    pub camera_failure_count: u64,
}

/// Raw counter values read at (roughly) one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub transactions_processed: u64,
    pub fatigue_locks: u64,
    pub mismatch_count: u64,
    pub camera_failure_count: u64,
}

impl CounterSnapshot {
    pub fn get(&self, kind: CounterKind) -> u64 {
        match kind {
            CounterKind::TransactionsProcessed => self.transactions_processed,
            CounterKind::FatigueLocks => self.fatigue_locks,
            CounterKind::MismatchCount => self.mismatch_count,
            CounterKind::CameraFailureCount => self.camera_failure_count,
        }
    }
}

/// Persistence collaborator for counter durability. Best-effort only.
pub trait CounterBackend: Send + Sync {
    /// Record the new total of one counter.
    fn persist(&self, kind: CounterKind, total: u64) -> Result<(), StoreUnavailable>;
}

/// Shared, internally synchronized counter store. Construct once, share via `Arc`.
pub struct MetricsStore {
    transactions_processed: AtomicU64,
    fatigue_locks: AtomicU64,
    mismatch_count: AtomicU64,
    camera_failure_count: AtomicU64,
    persist_failures: AtomicU64,
    backend: Option<Arc<dyn CounterBackend>>,
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new(CounterSeed::default())
    }
}

impl MetricsStore {
    pub fn new(seed: CounterSeed) -> Self {
        Self {
            transactions_processed: AtomicU64::new(seed.transactions_processed),
            fatigue_locks: AtomicU64::new(seed.fatigue_locks),
            mismatch_count: AtomicU64::new(seed.mismatch_count),
            camera_failure_count: AtomicU64::new(seed.camera_failure_count),
            persist_failures: AtomicU64::new(0),
            backend: None,
        }
    }

    /// Attach a persistence collaborator.
    pub fn with_backend(mut self, backend: Arc<dyn CounterBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn increment_transactions(&self) -> u64 {
        self.increment(CounterKind::TransactionsProcessed)
    }

    pub fn increment_fatigue_lock(&self) -> u64 {
        self.increment(CounterKind::FatigueLocks)
    }

    pub fn increment_mismatch(&self) -> u64 {
        self.increment(CounterKind::MismatchCount)
    }

    pub fn increment_camera_failure(&self) -> u64 {
        self.increment(CounterKind::CameraFailureCount)
    }

    /// Atomically add one to `kind` and return the new total. Never fails.
    ///
    /// Counters saturate at `u64::MAX` so they never go backwards.
    pub fn increment(&self, kind: CounterKind) -> u64 {
        let total = match self
            .counter(kind)
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_add(1))
        {
            Ok(prev) => prev + 1,
            Err(max) => {
                tracing::warn!(counter = kind.as_str(), total = max, "counter saturated");
                max
            }
        };

        if let Some(backend) = &self.backend {
            if let Err(e) = backend.persist(kind, total) {
                self.persist_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(counter = kind.as_str(), total, error = %e, "counter persistence degraded; continuing in memory");
            }
        }
        total
    }

    pub fn get(&self, kind: CounterKind) -> u64 {
        self.counter(kind).load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            transactions_processed: self.get(CounterKind::TransactionsProcessed),
            fatigue_locks: self.get(CounterKind::FatigueLocks),
            mismatch_count: self.get(CounterKind::MismatchCount),
            camera_failure_count: self.get(CounterKind::CameraFailureCount),
        }
    }

    /// Number of backend writes that failed since start.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::Relaxed)
    }

    fn counter(&self, kind: CounterKind) -> &AtomicU64 {
        match kind {
            CounterKind::TransactionsProcessed => &self.transactions_processed,
            CounterKind::FatigueLocks => &self.fatigue_locks,
            CounterKind::MismatchCount => &self.mismatch_count,
            CounterKind::CameraFailureCount => &self.camera_failure_count,
        }
    }
}
