use crate::metrics::collector::HttpMetrics;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

const ITEM_ROUTE_PREFIX: &str = "/api/items/";
const ITEM_ROUTE_TEMPLATE: &str = "/api/items/{id}";

/// Collapse item ids so `/api/items/1` and `/api/items/2` share one label
pub fn normalize_route(path: &str) -> &str {
    match path.strip_prefix(ITEM_ROUTE_PREFIX) {
        Some(rest) if !rest.contains('/') => ITEM_ROUTE_TEMPLATE,
        _ => path,
    }
}

pub async fn track_http_metrics(
    State(metrics): State<HttpMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().as_str().to_owned();
    let route = normalize_route(request.uri().path()).to_owned();

    metrics.request_started(&route);
    let start = Instant::now();

    // A panic counts as a 500, then keeps unwinding to CatchPanicLayer.
    let outcome = AssertUnwindSafe(next.run(request)).catch_unwind().await;

    let status = match &outcome {
        Ok(response) => response.status().as_u16(),
        Err(_) => 500,
    };
    metrics.request_finished(&method, &route, status, start.elapsed().as_secs_f64());

    match outcome {
        Ok(response) => response,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
