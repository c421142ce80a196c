//! ILP core: transaction records, validation, counters, and derived metrics.
//!
//! This crate holds the domain contracts shared by the aggregator service and
//! its tests. It carries no transport or runtime dependencies so the counters
//! and derivation rules can be exercised from plain threads as well as from an
//! async service.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed transactions surface as `ValidationError` and persistence
//! trouble as `StoreUnavailable`, so a bad terminal payload never takes the
//! process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod aggregate;
pub mod error;
pub mod record;
pub mod store;
pub mod validate;

/// Shared result type.
pub use error::{IlpError, IngestionError, Result, StoreUnavailable, ValidationError};

pub use aggregate::{MetricsAggregator, MetricsSnapshot, OperationalMetricsView, DEFAULT_PENALTY_FACTOR};
pub use record::{RawTransaction, TransactionRecord, ValidRecord};
pub use store::{CounterBackend, CounterKind, CounterSeed, CounterSnapshot, MetricsStore};
pub use validate::TransactionValidator;
