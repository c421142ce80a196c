//! Shared application state for the ILP aggregator.
//!
//! One `MetricsStore` is built at startup and injected into both the
//! ingestion pipeline and the aggregator; handlers only ever see it through
//! those two components.

use std::sync::Arc;

use ilp_core::aggregate::MetricsAggregator;
use ilp_core::error::Result;
use ilp_core::store::{CounterKind, MetricsStore};

use crate::config::ServiceConfig;
use crate::obs::ServiceMetrics;
use crate::pipeline::IngestionPipeline;
use crate::sink::{EventSink, LogSink};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    store: Arc<MetricsStore>,
    pipeline: IngestionPipeline,
    aggregator: MetricsAggregator,
    metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Build state with the default log-only sink.
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        Self::with_sink(cfg, Arc::new(LogSink::new()))
    }

    pub fn with_sink(cfg: ServiceConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let store = Arc::new(MetricsStore::new(cfg.metrics.seed));
        Self::with_parts(cfg, store, sink)
    }

    /// Build state around an externally constructed store (e.g. one with a persistence backend).
    pub fn with_parts(
        cfg: ServiceConfig,
        store: Arc<MetricsStore>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        cfg.validate()?;

        let metrics = Arc::new(ServiceMetrics::default());
        let pipeline = IngestionPipeline::new(
            Arc::clone(&store),
            sink,
            cfg.sink.publish_timeout(),
            Arc::clone(&metrics),
        );
        let aggregator = MetricsAggregator::new(Arc::clone(&store), cfg.metrics.penalty_factor);

        tracing::info!(
            transactions_processed = cfg.metrics.seed.transactions_processed,
            fatigue_locks = cfg.metrics.seed.fatigue_locks,
            penalty_factor = aggregator.penalty_factor(),
            "metrics store initialized"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                store,
                pipeline,
                aggregator,
                metrics,
            }),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn pipeline(&self) -> &IngestionPipeline {
        &self.inner.pipeline
    }

    pub fn aggregator(&self) -> &MetricsAggregator {
        &self.inner.aggregator
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    /// Raw counters and store health, appended to the `/metrics` output.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let snap = self.inner.store.snapshot();
        let mut extra: Vec<(&'static str, u64)> = CounterKind::ALL
            .iter()
            .map(|k| (prom_name(*k), snap.get(*k)))
            .collect();
        extra.push(("ilp_store_persist_failures", self.inner.store.persist_failures()));
        extra
    }
}

fn prom_name(kind: CounterKind) -> &'static str {
    match kind {
        CounterKind::TransactionsProcessed => "ilp_transactions_processed",
        CounterKind::FatigueLocks => "ilp_fatigue_locks",
        CounterKind::MismatchCount => "ilp_mismatch_count",
        CounterKind::CameraFailureCount => "ilp_camera_failure_count",
    }
}
