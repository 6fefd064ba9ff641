// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics for the COSI control-plane.
//!
//! Metrics use the namespace prefix `cosi_objectstorage_k8s_io_` (prometheus-safe
//! version of "objectstorage.k8s.io") and are exposed via the `/metrics` endpoint
//! served by each agent binary.

use crate::constants::{METRICS_SERVER_BIND_ADDRESS, METRICS_SERVER_PATH, METRICS_SERVER_PORT};
use axum::{routing::get, Router};
use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{error, info};

/// Namespace prefix for all COSI metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "cosi_objectstorage_k8s_io";

/// Global Prometheus metrics registry.
///
/// All metrics are registered in this registry and exposed via the `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Total number of reconciliations by resource type and outcome
///
/// Labels:
/// - `resource_type`: Kind of resource (e.g., `BucketClaim`, `Bucket`)
/// - `status`: Outcome (`success`, `error`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of reconciliations by resource type and status",
    );
    let counter = CounterVec::new(opts, &["resource_type", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliations in seconds
///
/// Labels:
/// - `resource_type`: Kind of resource
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciliations in seconds by resource type",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["resource_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Total number of driver RPC calls by method and outcome
///
/// Labels:
/// - `method`: RPC method name (e.g., `DriverCreateBucket`)
/// - `status`: Outcome (`success`, `error`)
pub static DRIVER_RPC_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_driver_rpc_total"),
        "Total number of driver RPC calls by method and status",
    );
    let counter = CounterVec::new(opts, &["method", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Record a successful reconciliation.
pub fn record_reconciliation_success(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "success"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a failed reconciliation.
pub fn record_reconciliation_error(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "error"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a driver RPC call outcome.
pub fn record_driver_rpc(method: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    DRIVER_RPC_TOTAL.with_label_values(&[method, status]).inc();
}

/// Gather and encode all metrics in Prometheus text format.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

/// Start the Prometheus metrics HTTP server.
///
/// Serves metrics on the configured port and path (default: 0.0.0.0:8080/metrics).
pub fn start_metrics_server() -> tokio::task::JoinHandle<()> {
    info!(
        bind_address = METRICS_SERVER_BIND_ADDRESS,
        port = METRICS_SERVER_PORT,
        path = METRICS_SERVER_PATH,
        "starting Prometheus metrics HTTP server"
    );

    tokio::spawn(async move {
        async fn metrics_handler() -> String {
            match gather_metrics() {
                Ok(metrics_text) => metrics_text,
                Err(err) => {
                    error!("failed to gather metrics: {err}");
                    String::from("# Error gathering metrics\n")
                }
            }
        }

        let app = Router::new().route(METRICS_SERVER_PATH, get(metrics_handler));

        let bind_addr = format!("{METRICS_SERVER_BIND_ADDRESS}:{METRICS_SERVER_PORT}");
        let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
            Ok(listener) => listener,
            Err(err) => {
                error!("failed to bind metrics server to {bind_addr}: {err}");
                return;
            }
        };

        info!("metrics server listening on http://{bind_addr}{METRICS_SERVER_PATH}");

        if let Err(err) = axum::serve(listener, app).await {
            error!("metrics server error: {err}");
        }
    })
}
