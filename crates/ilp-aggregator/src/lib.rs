//! ILP aggregator library entry.
//!
//! Wires the counter store, ingestion pipeline, event sink, and derived
//! metrics into an axum service. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod http;
pub mod obs;
pub mod ops;
pub mod pipeline;
pub mod router;
pub mod sink;
