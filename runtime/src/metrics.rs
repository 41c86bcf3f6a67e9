//! Prometheus metrics for observability and monitoring.
//!
//! The store records through the `metrics` facade. Nothing is exported
//! unless a recorder is installed; [`MetricsRecorder`] installs a Prometheus
//! recorder whose output can be rendered on demand (no HTTP listener).
//!
//! # Example
//!
//! ```rust,no_run
//! use rxtodo_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.install()?;
//!
//! // ... dispatch some actions ...
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Global Prometheus recorder with on-demand rendering.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that is not yet installed.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Build the Prometheus recorder and install it as the global recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the exporter cannot be built, or if another
    /// global recorder is already installed.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = builder()?;
        let handle = builder
            .install_recorder()
            .map_err(|e| MetricsError::Install(e.to_string()))?;

        tracing::info!("Prometheus metrics recorder installed");
        self.handle = Some(handle);
        Ok(())
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus text format.
    ///
    /// Returns `None` if the recorder hasn't been installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("installed", &self.handle.is_some())
            .finish()
    }
}

/// Prometheus builder with histogram buckets suited to in-memory reducers.
fn builder() -> Result<PrometheusBuilder, MetricsError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[
                0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01,
            ],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "store_actions_total",
        "Total number of actions reduced by the store, labelled by action"
    );
    describe_histogram!(
        "store_reducer_duration_seconds",
        "Time taken to reduce one action"
    );
    describe_counter!(
        "store_listeners_notified_total",
        "Total number of listener invocations"
    );
    describe_gauge!(
        "store_dispatch_queue_depth",
        "Actions waiting behind the one currently being reduced"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record one reduced action.
    pub fn record_action(action: &'static str, duration: Duration) {
        counter!("store_actions_total", "action" => action).increment(1);
        histogram!("store_reducer_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record listener invocations for one published state.
    pub fn record_notified(listeners: usize) {
        counter!("store_listeners_notified_total").increment(listeners as u64);
    }

    /// Record the dispatch queue depth.
    // Precision loss acceptable for metrics (queue depth < 2^52)
    #[allow(clippy::cast_precision_loss)]
    pub fn record_queue_depth(depth: usize) {
        gauge!("store_dispatch_queue_depth").set(depth as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_not_installed_renders_nothing() {
        let recorder = MetricsRecorder::new();
        assert!(recorder.handle().is_none());
        assert!(recorder.render().is_none());
    }

    #[test]
    fn test_store_metrics_render() {
        let recorder = builder().map(PrometheusBuilder::build_recorder);
        let Ok(recorder) = recorder else {
            return;
        };
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            StoreMetrics::record_action("AddTodo", Duration::from_micros(3));
            StoreMetrics::record_action("AddTodo", Duration::from_micros(4));
            StoreMetrics::record_action("ToggleTodo", Duration::from_micros(2));
            StoreMetrics::record_notified(2);
            StoreMetrics::record_queue_depth(1);
        });

        let rendered = handle.render();
        assert!(rendered.contains("store_actions_total{action=\"AddTodo\"} 2"));
        assert!(rendered.contains("store_actions_total{action=\"ToggleTodo\"} 1"));
        assert!(rendered.contains("store_listeners_notified_total 2"));
        assert!(rendered.contains("store_reducer_duration_seconds"));
        assert!(rendered.contains("store_dispatch_queue_depth 1"));
    }
}
