/*!
Observability infrastructure for the MyFit store.

This module provides:
- Structured logging and tracing setup
- Prometheus counters for store reads and writes (`metrics` feature)
*/

#[cfg(feature = "metrics")]
use prometheus::{Counter, Encoder, Histogram, Registry, TextEncoder};
#[cfg(feature = "metrics")]
use std::sync::OnceLock;
use tracing::subscriber::set_global_default;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry as TracingRegistry};

use crate::{Result, StoreError};

/// Filter directive applied when `RUST_LOG` is unset
pub const DEFAULT_LOG_DIRECTIVE: &str = "myfit=info";

#[cfg(feature = "metrics")]
static METRICS: OnceLock<StoreMetrics> = OnceLock::new();

/// Metrics collection for store operations
#[cfg(feature = "metrics")]
#[derive(Debug)]
pub struct StoreMetrics {
    pub reads_total: Counter,
    pub read_fallbacks_total: Counter,
    pub writes_total: Counter,
    pub write_failures_total: Counter,
    pub collection_size_bytes: Histogram,

    registry: Registry,
}

#[cfg(feature = "metrics")]
impl StoreMetrics {
    fn new() -> Result<Self> {
        let registry = Registry::new();

        let counter = |name: &str, help: &str| -> Result<Counter> {
            let counter = Counter::new(name, help).map_err(|e| {
                StoreError::storage(format!("Failed to create {name} metric: {e}"))
            })?;
            registry
                .register(Box::new(counter.clone()))
                .map_err(|e| StoreError::storage(format!("Failed to register {name}: {e}")))?;
            Ok(counter)
        };

        let reads_total = counter("myfit_store_reads_total", "Collection reads")?;
        let read_fallbacks_total = counter(
            "myfit_store_read_fallbacks_total",
            "Collection reads that fell back to the default value",
        )?;
        let writes_total = counter("myfit_store_writes_total", "Collection writes")?;
        let write_failures_total = counter(
            "myfit_store_write_failures_total",
            "Collection writes that did not persist",
        )?;

        let collection_size_bytes = Histogram::with_opts(prometheus::HistogramOpts::new(
            "myfit_collection_size_bytes",
            "Size of persisted collections in bytes",
        ))
        .map_err(|e| {
            StoreError::storage(format!("Failed to create collection_size_bytes metric: {e}"))
        })?;
        registry
            .register(Box::new(collection_size_bytes.clone()))
            .map_err(|e| {
                StoreError::storage(format!("Failed to register collection_size_bytes: {e}"))
            })?;

        Ok(Self {
            reads_total,
            read_fallbacks_total,
            writes_total,
            write_failures_total,
            collection_size_bytes,
            registry,
        })
    }

    /// Get or initialize global metrics instance
    pub fn global() -> &'static StoreMetrics {
        METRICS.get_or_init(|| Self::new().expect("Failed to initialize MyFit metrics"))
    }

    pub fn record_read(&self) {
        self.reads_total.inc();
    }

    pub fn record_read_fallback(&self) {
        self.read_fallbacks_total.inc();
    }

    pub fn record_write(&self) {
        self.writes_total.inc();
    }

    pub fn record_write_failure(&self) {
        self.write_failures_total.inc();
    }

    pub fn record_collection_size(&self, size_bytes: usize) {
        self.collection_size_bytes.observe(size_bytes as f64);
    }

    /// Gather metrics in Prometheus text format
    pub fn gather_metrics(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| StoreError::storage(format!("Failed to encode metrics: {e}")))?;

        String::from_utf8(buffer)
            .map_err(|e| StoreError::storage(format!("Failed to convert metrics to string: {e}")))
    }
}

/// Build the log filter from `RUST_LOG`, or `default_directive` when it is unset or invalid
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize the global tracing subscriber
///
/// Log lines go to stderr so that command output on stdout stays clean.
///
/// # Arguments
/// * `json` - Emit JSON lines instead of human-readable output
/// * `default_directive` - Filter used when `RUST_LOG` is unset
///
/// # Errors
/// Fails if a global subscriber is already installed
pub fn init_observability(json: bool, default_directive: &str) -> Result<()> {
    #[cfg(feature = "metrics")]
    StoreMetrics::global();

    let filter = env_filter(default_directive);

    let result = if json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(false)
            .with_writer(std::io::stderr);
        set_global_default(TracingRegistry::default().with(filter).with(fmt_layer))
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        set_global_default(TracingRegistry::default().with(filter).with(fmt_layer))
    };

    result.map_err(|e| {
        StoreError::storage(format!("Failed to set global tracing subscriber: {e}"))
    })?;

    tracing::debug!("MyFit observability initialized");
    Ok(())
}

/// Initialize observability with default settings
pub fn init_default_observability() -> Result<()> {
    init_observability(false, DEFAULT_LOG_DIRECTIVE)
}
