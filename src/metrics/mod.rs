pub mod collector;
pub mod exporter;
pub mod middleware;

pub use collector::HttpMetrics;
pub use exporter::PrometheusExporter;
pub use middleware::{normalize_route, track_http_metrics};
