//! In-process service self-metrics.
//!
//! Counters and histograms are atomics behind `DashMap` label keys, rendered
//! in Prometheus text format by the `/metrics` handler.

pub mod metrics;

pub use metrics::{CounterVec, HistogramVec, ServiceMetrics};
