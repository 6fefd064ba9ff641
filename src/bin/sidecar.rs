// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! COSI Sidecar: the per-driver agent that materializes backend buckets through the
//! paired driver's gRPC endpoint.

use anyhow::Result;
use cosi_operator::constants::TOKIO_WORKER_THREADS;
use cosi_operator::crd::Bucket;
use cosi_operator::metrics::start_metrics_server;
use cosi_operator::predicate::{
    all_of, any_create, any_delete, any_generic, any_of, driver_name_matches,
    generation_changed_in_update_only, protection_finalizer_removed,
};
use cosi_operator::reconcilers::BucketReconciler;
use cosi_operator::rpc::{connect_rpc_and_get_driver_info, rpc_endpoint_from_env};
use cosi_operator::runner::run_controller;
use cosi_operator::telemetry;
use kube::runtime::watcher;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("cosi-sidecar")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    telemetry::initialize_logging("cosi-sidecar");

    let rpc_endpoint = rpc_endpoint_from_env();
    info!(rpc_endpoint, "connecting to driver");
    let driver = Arc::new(connect_rpc_and_get_driver_info(&rpc_endpoint).await?);
    info!(driver_name = driver.name(), "connected to driver");

    let client = Client::try_default().await?;
    let _metrics_server = start_metrics_server();

    // Only opt in to reconciles with a matching driver name. Within that, this is the
    // primary Bucket controller and should reconcile ALL Create/Delete/Generic events,
    // plus the desired Update events.
    let bucket_filter = all_of(vec![
        driver_name_matches(driver.name()),
        any_of(vec![
            any_create(),
            any_delete(),
            any_generic(),
            generation_changed_in_update_only(), // reconcile spec changes
            protection_finalizer_removed(),      // re-add protection finalizer if removed
        ]),
    ]);
    let bucket_reconciler = BucketReconciler::new(client.clone(), Arc::clone(&driver));
    let buckets = tokio::spawn(run_controller(
        Api::<Bucket>::all(client.clone()),
        watcher::Config::default(),
        bucket_filter,
        move |bucket: Arc<Bucket>| {
            let reconciler = bucket_reconciler.clone();
            async move { reconciler.reconcile(&bucket.name_any()).await }
        },
    ));

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, stopping controllers");
    buckets.abort();

    Ok(())
}
