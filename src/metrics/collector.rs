use crate::Result;
use prometheus::proto::Metric;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry};
use std::sync::Arc;

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// HTTP request metrics shared by every request handler
///
/// Cloning is cheap; all clones update the same registry.
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Arc<Registry>,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
    inflight_requests: IntGaugeVec,
}

impl HttpMetrics {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "route", "status"],
        )?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?;

        let inflight_requests = IntGaugeVec::new(
            Opts::new(
                "http_inflight_requests",
                "Number of HTTP requests currently being processed",
            ),
            &["route"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(inflight_requests.clone()))?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
            inflight_requests,
        })
    }

    pub fn request_started(&self, route: &str) {
        self.inflight_requests.with_label_values(&[route]).inc();
    }

    /// Close out a request started with [`HttpMetrics::request_started`]
    pub fn request_finished(&self, method: &str, route: &str, status: u16, seconds: f64) {
        self.inflight_requests.with_label_values(&[route]).dec();

        let status = status.to_string();
        self.requests_total
            .with_label_values(&[method, route, status.as_str()])
            .inc();
        self.request_duration
            .with_label_values(&[method, route])
            .observe(seconds);
    }

    /// Current value of a series, 0 if it was never touched. Reading never
    /// creates the series.
    pub fn requests_total(&self, method: &str, route: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.sample(
            "http_requests_total",
            &[("method", method), ("route", route), ("status", status.as_str())],
        )
        .map(|m| m.get_counter().value() as u64)
        .unwrap_or(0)
    }

    pub fn inflight(&self, route: &str) -> i64 {
        self.sample("http_inflight_requests", &[("route", route)])
            .map(|m| m.get_gauge().value() as i64)
            .unwrap_or(0)
    }

    fn sample(&self, family: &str, labels: &[(&str, &str)]) -> Option<Metric> {
        self.registry
            .gather()
            .into_iter()
            .find(|f| f.name() == family)?
            .take_metric()
            .into_iter()
            .find(|m| {
                let pairs = m.get_label();
                pairs.len() == labels.len()
                    && labels.iter().all(|(name, value)| {
                        pairs
                            .iter()
                            .any(|p| p.name() == *name && p.value() == *value)
                    })
            })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
