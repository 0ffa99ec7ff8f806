//! Prometheus metrics
//!
//! The recorder is installed once per process; `/metrics` renders whatever
//! has been recorded so far.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use erp_calc_core::EstimateResult;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::time::Duration;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder; `None` if another recorder is in place
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
        .map_err(|e| tracing::warn!(error = %e, "Failed to install Prometheus recorder"))
        .ok()
        .cloned()
}

pub async fn metrics_handler() -> impl IntoResponse {
    match HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics are disabled".to_string(),
        ),
    }
}

/// Count one computed estimate and its advisories
pub fn record_estimate(route: &'static str, elapsed: Duration, result: &EstimateResult) {
    metrics::counter!(
        "erp_calc_estimates_total",
        "route" => route,
        "tier" => result.tier.as_str()
    )
    .increment(1);
    metrics::histogram!("erp_calc_estimate_duration_seconds", "route" => route)
        .record(elapsed.as_secs_f64());

    for warning in &result.warnings {
        metrics::counter!("erp_calc_warnings_total", "code" => warning.code.as_str()).increment(1);
    }
}

pub fn record_error(kind: &'static str) {
    metrics::counter!("erp_calc_errors_total", "kind" => kind).increment(1);
}
