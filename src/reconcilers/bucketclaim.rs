// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! BucketClaim reconciliation (Controller).
//!
//! Translates a claim into a cluster-scoped intermediate Bucket, binds the claim to the
//! Bucket by name, and surfaces errors into the claim status.

use crate::crd::{
    Bucket, BucketClaim, BucketClaimReference, BucketClass, BucketSpec, TimestampedError,
};
use crate::errors::{ReconcileError, Result};
use crate::reconcilers::finalizers::{ensure_protection_finalizer, remove_protection_finalizer};
use crate::reconcilers::{is_already_exists, is_not_found, replace_status};
use anyhow::anyhow;
use kube::api::{ObjectMeta, PostParams};
use kube::{Api, Client, ResourceExt};
use tracing::{debug, error, info};

/// Reconciles `BucketClaim` objects.
#[derive(Clone)]
pub struct BucketClaimReconciler {
    client: Client,
}

impl BucketClaimReconciler {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Reconcile a single claim, moving the current state of the cluster closer to the
    /// desired state. Any reconcile error is recorded as a timestamped error in the
    /// claim status before it is returned.
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<()> {
        let api: Api<BucketClaim> = Api::namespaced(self.client.clone(), namespace);

        let mut claim = match api.get(name).await {
            Ok(claim) => claim,
            Err(err) if is_not_found(&err) => {
                debug!(namespace, name, "not reconciling nonexistent BucketClaim");
                return Ok(());
            }
            Err(err) => {
                // no resource to add status to or report an event for
                error!(namespace, name, error = %err, "failed to get BucketClaim");
                return Err(err.into());
            }
        };

        if let Err(err) = self.reconcile_claim(&api, &mut claim).await {
            // Record any error as a timestamped error in the status.
            claim.status.get_or_insert_with(Default::default).error =
                Some(TimestampedError::new(&format!("{err:#}")));
            if let Err(update_err) = replace_status(&api, &claim).await {
                error!(
                    namespace, name,
                    error = %err, update_error = %update_err,
                    "failed to update BucketClaim status after reconcile error"
                );
                // If the status update fails, retry the original error regardless of its
                // flavor. The reconcile needs to run again to make sure the status is
                // eventually updated.
                return Err(ReconcileError::retryable(anyhow!("{err:#}")));
            }
            return Err(err);
        }

        // On success, clear any errors in the status.
        let has_error = claim.status.as_ref().is_some_and(|s| s.error.is_some());
        if has_error && claim.metadata.deletion_timestamp.is_some() {
            if let Some(status) = claim.status.as_mut() {
                status.error = None;
            }
            if let Err(err) = replace_status(&api, &claim).await {
                error!(
                    namespace, name, error = %err,
                    "failed to update BucketClaim status after reconcile success"
                );
                // Retry the reconcile so status can be updated eventually.
                return Err(ReconcileError::retryable(err));
            }
        }

        Ok(())
    }

    async fn reconcile_claim(&self, api: &Api<BucketClaim>, claim: &mut BucketClaim) -> Result<()> {
        let namespace = claim.namespace().unwrap_or_default();
        let name = claim.name_any();

        let bucket_name = determine_bucket_name(claim).map_err(|err| {
            // It is best to not apply a missing finalizer when boundBucketName is
            // degraded (err returned here). When degraded, the user needs to delete and
            // re-create the BucketClaim to fix the degradation, which requires the
            // finalizer be absent.
            error!(namespace, name, error = %err, "failed to determine Bucket name for claim");
            ReconcileError::non_retryable(err)
        })?;

        if claim
            .spec
            .existing_bucket_name
            .as_deref()
            .is_some_and(|n| !n.is_empty())
        {
            return Err(ReconcileError::non_retryable(anyhow!(
                "static provisioning is not yet supported"
            ))); // TODO: static provisioning
        }

        if claim.metadata.deletion_timestamp.is_some() {
            debug!(namespace, name, "beginning BucketClaim deletion cleanup");

            // TODO: deletion logic

            *claim = remove_protection_finalizer(&self.client, claim)
                .await
                .map_err(|err| {
                    error!(namespace, name, error = %err, "failed to remove finalizer");
                    ReconcileError::retryable(err.context("failed to remove finalizer"))
                })?;

            return Err(ReconcileError::non_retryable(anyhow!(
                "deletion is not yet implemented"
            ))); // TODO: deletion logic
        }

        debug!(namespace, name, bucket_name, "reconciling BucketClaim");

        *claim = ensure_protection_finalizer(&self.client, claim)
            .await
            .map_err(|err| {
                error!(namespace, name, error = %err, "failed to add protection finalizer");
                ReconcileError::retryable(err.context("failed to add protection finalizer"))
            })?;

        let bound_name_empty = claim
            .status
            .as_ref()
            .map_or(true, |s| s.bound_bucket_name.is_empty());
        if bound_name_empty {
            info!(namespace, name, bucket_name, "binding BucketClaim to Bucket");
            claim
                .status
                .get_or_insert_with(Default::default)
                .bound_bucket_name = bucket_name.clone();
            *claim = replace_status(api, claim).await.map_err(|err| {
                error!(namespace, name, error = %err, "failed to bind BucketClaim to Bucket");
                ReconcileError::retryable(err.context("failed to bind BucketClaim to Bucket"))
            })?;
        }

        let buckets: Api<Bucket> = Api::all(self.client.clone());
        match buckets.get(&bucket_name).await {
            Ok(_bucket) => {
                // TODO: static provisioning: verify that the bucket got matches this claim
            }
            Err(err) if is_not_found(&err) => {
                // TODO: static provisioning: don't do this
                info!(namespace, name, bucket_name, "creating intermediate Bucket");
                create_intermediate_bucket(&self.client, claim, &bucket_name).await?;
            }
            Err(err) => {
                error!(namespace, name, error = %err, "failed to determine if Bucket exists");
                return Err(err.into());
            }
        }

        // TODO: wait for the intermediate Bucket to be reconciled by the Sidecar, then
        // copy Bucket status items to BucketClaim status as needed. Importantly:
        //  1. supported protocols
        //  2. readyToUse

        Ok(())
    }
}

/// Determine the bucket name that should go with the claim. No errors can be retried.
fn determine_bucket_name(claim: &BucketClaim) -> anyhow::Result<String> {
    let name = match claim.spec.existing_bucket_name.as_deref() {
        // Case: Static provisioning
        Some(existing) if !existing.is_empty() => existing.to_string(),
        // Case: Dynamic provisioning
        // DO NOT CHANGE UNLESS ABSOLUTELY NECESSARY.
        // boundBucketName could become the source of truth to technically allow changing
        // this. However, keeping this consistent will make it possible to recover from
        // loss of binding info due to unexpected system issues without having to perform
        // deeper system inspection.
        _ => format!("bc-{}", claim.uid().unwrap_or_default()),
    };

    if name == "bc-" || name.is_empty() {
        // catch internal malformed-object cases
        return Err(anyhow!("internal error: determined bucket name is empty"));
    }

    // Bound name should match whatever was determined above. Divergence shouldn't happen
    // normally. In case of a disaster that lost original objects, the user may re-create
    // them, possibly with mistakes. In such a case, COSI can't be certain which name is
    // correct.
    let bound = claim
        .status
        .as_ref()
        .map(|s| s.bound_bucket_name.as_str())
        .unwrap_or_default();
    if !bound.is_empty() && bound != name {
        return Err(anyhow!(
            "unrecoverable degradation: boundBucketName {bound:?} does not match determined name {name:?}"
        ));
    }

    Ok(name)
}

/// Create the intermediate Bucket for a dynamically-provisioned claim.
async fn create_intermediate_bucket(
    client: &Client,
    claim: &BucketClaim,
    bucket_name: &str,
) -> Result<Bucket> {
    let namespace = claim.namespace().unwrap_or_default();
    let name = claim.name_any();

    let class_name = claim
        .spec
        .bucket_class_name
        .as_deref()
        .unwrap_or_default();
    if class_name.is_empty() {
        error!(namespace, name, "BucketClaim cannot have empty bucketClassName");
        return Err(ReconcileError::non_retryable(anyhow!(
            "BucketClaim cannot have empty bucketClassName"
        )));
    }

    let classes: Api<BucketClass> = Api::all(client.clone());
    let class = match classes.get(class_name).await {
        Ok(class) => class,
        Err(err) if is_not_found(&err) => {
            // For now, return an error and allow the runner to exponential backoff until
            // the BucketClass exists.
            // TODO: optimize this by adding a BucketClass reconciler that enqueues
            // requests for BucketClaims that reference the class and don't yet have a
            // bound Bucket.
            error!(namespace, name, class_name, error = %err, "BucketClass not found");
            return Err(err.into());
        }
        Err(err) => {
            error!(namespace, name, class_name, error = %err, "failed to get BucketClass");
            return Err(err.into());
        }
    };

    debug!(namespace, name, class_name, "using BucketClass for intermediate Bucket");

    let bucket = generate_intermediate_bucket(claim, &class, bucket_name);

    let buckets: Api<Bucket> = Api::all(client.clone());
    match buckets.create(&PostParams::default(), &bucket).await {
        Ok(created) => Ok(created),
        Err(err) if is_already_exists(&err) => {
            // Unlikely race condition. Error to allow the next reconcile to attempt to
            // recover.
            error!(namespace, name, bucket_name, error = %err, "intermediate Bucket already exists");
            Err(err.into())
        }
        Err(err) => {
            error!(namespace, name, bucket_name, error = %err, "failed to create intermediate Bucket");
            Err(ReconcileError::retryable(
                anyhow::Error::from(err).context("failed to create intermediate Bucket"),
            ))
        }
    }
}

/// Build the intermediate Bucket object for a claim from its class.
fn generate_intermediate_bucket(
    claim: &BucketClaim,
    class: &BucketClass,
    bucket_name: &str,
) -> Bucket {
    Bucket {
        metadata: ObjectMeta {
            name: Some(bucket_name.to_string()),
            // Do not pre-apply the protection finalizer here. The Sidecar is responsible
            // for the Bucket finalizer. If the Sidecar (driver) isn't running or the
            // driver name is incorrect, the user needs to be able to delete the claim,
            // and COSI needs to delete the intermediate Bucket which hasn't had any
            // backend resources created for it.
            finalizers: None, /* PURPOSEFULLY EMPTY */
            ..ObjectMeta::default()
        },
        spec: BucketSpec {
            driver_name: class.spec.driver_name.clone(),
            deletion_policy: class.spec.deletion_policy,
            parameters: class.spec.parameters.clone(),
            protocols: claim.spec.protocols.clone(),
            bucket_claim_ref: BucketClaimReference {
                name: claim.name_any(),
                namespace: claim.namespace().unwrap_or_default(),
                uid: claim.uid().unwrap_or_default(),
            },
            existing_bucket_id: None,
        },
        status: None,
    }
}

#[cfg(test)]
#[path = "bucketclaim_tests.rs"]
mod bucketclaim_tests;
