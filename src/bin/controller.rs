// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! COSI Controller: the cluster-wide agent that owns user-facing coordination and
//! validation for BucketClaims and BucketAccesses.

use anyhow::Result;
use cosi_operator::constants::TOKIO_WORKER_THREADS;
use cosi_operator::crd::{BucketAccess, BucketClaim};
use cosi_operator::metrics::start_metrics_server;
use cosi_operator::predicate::{
    all_of, any_create, any_delete, any_generic, any_of, bucket_access_handoff_occurred,
    bucket_access_managed_by_controller_predicate, generation_changed_in_update_only,
    protection_finalizer_removed,
};
use cosi_operator::reconcilers::{BucketAccessReconciler, BucketClaimReconciler};
use cosi_operator::runner::{object_key, run_controller};
use cosi_operator::telemetry;
use kube::runtime::watcher;
use kube::{Api, Client};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("cosi-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    telemetry::initialize_logging("cosi-controller");

    let client = Client::try_default().await?;
    let _metrics_server = start_metrics_server();

    // This is the only BucketClaim controller; reconcile ALL Create/Delete/Generic
    // events, then opt in to the desired Update events.
    let claim_filter = any_of(vec![
        any_create(),
        any_delete(),
        any_generic(),
        generation_changed_in_update_only(), // reconcile spec changes
        protection_finalizer_removed(),      // re-add protection finalizer if removed
    ]);
    let claim_reconciler = BucketClaimReconciler::new(client.clone());
    let claims = tokio::spawn(run_controller(
        Api::<BucketClaim>::all(client.clone()),
        watcher::Config::default(),
        claim_filter,
        move |claim: Arc<BucketClaim>| {
            let reconciler = claim_reconciler.clone();
            async move {
                let (namespace, name) = object_key(claim.as_ref());
                reconciler.reconcile(&namespace, &name).await
            }
        },
    ));

    // Only opt in to BucketAccess reconciles managed by the Controller. Within that,
    // reconcile all Create/Delete/Generic events plus handoff changes (so the
    // Controller re-enters if the Sidecar hands back) and finalizer removal.
    let access_filter = all_of(vec![
        bucket_access_managed_by_controller_predicate(),
        any_of(vec![
            any_create(),
            any_delete(),
            any_generic(),
            bucket_access_handoff_occurred(),
            protection_finalizer_removed(),
        ]),
    ]);
    let access_reconciler = BucketAccessReconciler::new(client.clone());
    let accesses = tokio::spawn(run_controller(
        Api::<BucketAccess>::all(client.clone()),
        watcher::Config::default(),
        access_filter,
        move |access: Arc<BucketAccess>| {
            let reconciler = access_reconciler.clone();
            async move {
                let (namespace, name) = object_key(access.as_ref());
                reconciler.reconcile(&namespace, &name).await
            }
        },
    ));

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, stopping controllers");
    claims.abort();
    accesses.abort();

    Ok(())
}
