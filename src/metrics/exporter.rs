use crate::metrics::collector::HttpMetrics;
use crate::Result;
use prometheus::{Encoder, TextEncoder};

/// Renders a [`HttpMetrics`] registry in the Prometheus text format
pub struct PrometheusExporter<'a> {
    metrics: &'a HttpMetrics,
}

impl<'a> PrometheusExporter<'a> {
    pub fn new(metrics: &'a HttpMetrics) -> Self {
        Self { metrics }
    }

    pub fn content_type() -> &'static str {
        prometheus::TEXT_FORMAT
    }

    pub fn format_current_metrics(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.metrics.registry().gather();
        Ok(encoder.encode_to_string(&families)?)
    }
}
