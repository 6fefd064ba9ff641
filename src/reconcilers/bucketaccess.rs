// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! BucketAccess reconciliation (Controller).
//!
//! Validates an access request against its class and referenced claims, protects those
//! claims from accidental deletion, then hands the access off to the Sidecar by
//! recording class metadata into status. After the handoff status write, the Sidecar
//! owns the record and the Controller must not touch it again; see the `handoff` module.

use crate::constants::HAS_BUCKET_ACCESS_REFERENCES_ANNOTATION;
use crate::crd::{
    AccessedBucket, BucketAccess, BucketAccessAuthenticationType, BucketAccessClass,
    BucketAccessClassSpec, BucketAccessSpec, BucketAccessStatus, BucketClaim, BucketClaimAccess,
    TimestampedError,
};
use crate::errors::{ReconcileError, Result};
use crate::handoff::bucket_access_managed_by_sidecar;
use crate::reconcilers::finalizers::{ensure_protection_finalizer, remove_protection_finalizer};
use crate::reconcilers::{is_not_found, replace_status};
use anyhow::anyhow;
use kube::api::PostParams;
use kube::{Api, Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// Reconciles `BucketAccess` objects while they are Controller-managed.
#[derive(Clone)]
pub struct BucketAccessReconciler {
    client: Client,
}

impl BucketAccessReconciler {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Reconcile a single access. Any reconcile error is recorded as a timestamped error
    /// in the access status, prefixed to indicate it came from the Controller, before it
    /// is returned.
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<()> {
        let api: Api<BucketAccess> = Api::namespaced(self.client.clone(), namespace);

        let mut access = match api.get(name).await {
            Ok(access) => access,
            Err(err) if is_not_found(&err) => {
                debug!(namespace, name, "not reconciling nonexistent BucketAccess");
                return Ok(());
            }
            Err(err) => {
                // no resource to add status to or report an event for
                error!(namespace, name, error = %err, "failed to get BucketAccess");
                return Err(err.into());
            }
        };

        if bucket_access_managed_by_sidecar(&access) {
            debug!(
                namespace, name,
                "not reconciling BucketAccess that should be managed by sidecar"
            );
            return Ok(());
        }

        if let Err(err) = self.reconcile_access(&api, &mut access).await {
            // Because the BucketAccess status could be managed by either Sidecar or
            // Controller, indicate that this error is coming from the Controller.
            let err = err.context("COSI Controller error");

            // Record any error as a timestamped error in the status.
            access.status.get_or_insert_with(Default::default).error =
                Some(TimestampedError::new(&format!("{err:#}")));
            if let Err(update_err) = replace_status(&api, &access).await {
                error!(
                    namespace, name,
                    error = %err, update_error = %update_err,
                    "failed to update BucketAccess status after reconcile error"
                );
                // If the status update fails, retry the original error regardless of its
                // flavor. The reconcile needs to run again to make sure the status is
                // eventually updated.
                return Err(ReconcileError::retryable(anyhow!("{err:#}")));
            }
            return Err(err);
        }

        // NOTE: Do not clear the error in the status on success. Success indicates 1 of
        // 2 things:
        //   1. BucketAccess was initialized successfully, and it's now owned by the
        //      Sidecar
        //   2. BucketAccess deletion cleanup was just finished, and no status update is
        //      needed

        Ok(())
    }

    async fn reconcile_access(
        &self,
        api: &Api<BucketAccess>,
        access: &mut BucketAccess,
    ) -> Result<()> {
        let namespace = access.namespace().unwrap_or_default();
        let name = access.name_any();

        if access.metadata.deletion_timestamp.is_some() {
            debug!(namespace, name, "beginning BucketAccess deletion cleanup");

            // TODO: deletion logic

            *access = remove_protection_finalizer(&self.client, access)
                .await
                .map_err(|err| {
                    error!(namespace, name, error = %err, "failed to remove finalizer");
                    ReconcileError::retryable(err.context("failed to remove finalizer"))
                })?;

            return Err(ReconcileError::non_retryable(anyhow!(
                "deletion is not yet implemented"
            ))); // TODO: deletion logic
        }

        let status = access.status.clone().unwrap_or_default();
        let need_init = needs_controller_initialization(&status).map_err(|err| {
            error!(namespace, name, error = %err, "processed a degraded BucketAccess");
            ReconcileError::non_retryable(err.context("processed a degraded BucketAccess"))
        })?;
        if !need_init {
            // BucketAccessClass info should only be copied to the BucketAccess status
            // once, upon initial provisioning. After the info is copied, make no attempt
            // to fill in any missing or lost info because we don't know whether the
            // current Class is compatible with the info from the existing (old) Class
            // info. If we reach this condition, something is systemically wrong. The
            // Sidecar should have ownership, but we determined otherwise, and the
            // Sidecar will likely also determine us to be the owner.
            error!(
                namespace, name,
                "processed a BucketAccess that should be managed by COSI Sidecar"
            );
            return Err(ReconcileError::non_retryable(anyhow!(
                "processed a BucketAccess that should be managed by COSI Sidecar"
            )));
        }

        let class_name = access.spec.bucket_access_class_name.clone();
        debug!(namespace, name, class_name, "initializing BucketAccess");

        *access = ensure_protection_finalizer(&self.client, access)
            .await
            .map_err(|err| {
                error!(namespace, name, error = %err, "failed to add protection finalizer");
                ReconcileError::retryable(err.context("failed to add protection finalizer"))
            })?;

        let claims_by_name = self
            .get_all_bucket_claims(&namespace, &access.spec.bucket_claims)
            .await
            .map_err(|err| {
                error!(namespace, name, error = %err, "failed to get all referenced BucketClaims");
                err
            })?;

        // Mark as many referenced BucketClaims as possible as soon as possible in the
        // reconcile. This ensures that BucketClaims are marked to protect their data
        // from deletion quickly.
        self.mark_all_bucket_claims_as_accessed(&namespace, &claims_by_name)
            .await
            .map_err(|err| {
                error!(namespace, name, error = %err, "failed to mark all referenced BucketClaims");
                err
            })?;

        let classes: Api<BucketAccessClass> = Api::all(self.client.clone());
        let class = match classes.get(&class_name).await {
            Ok(class) => class,
            Err(err) if is_not_found(&err) => {
                // For now, return an error and allow the runner to exponential backoff
                // until the access class exists.
                // TODO: optimize this by adding an access class reconciler that enqueues
                // requests for BucketAccesses that reference the class and aren't yet
                // passed to the sidecar.
                error!(namespace, name, class_name, error = %err, "BucketAccessClass not found");
                return Err(err.into());
            }
            Err(err) => {
                error!(namespace, name, class_name, error = %err, "failed to get BucketAccessClass");
                return Err(err.into());
            }
        };

        if let Err(err) = validate_access_against_class(&class.spec, &access.spec) {
            error!(namespace, name, error = %err, "BucketAccess failed featureOptions validation");
            return Err(ReconcileError::non_retryable(err));
        }

        let blockers = cannot_access_bucket_claims(&claims_by_name, &access.spec);
        if !blockers.is_empty() {
            error!(
                namespace, name, ?blockers,
                "access cannot be provisioned for one or more BucketClaims"
            );
            return Err(ReconcileError::non_retryable(anyhow!(
                "access cannot be provisioned for one or more BucketClaims: {blockers:?}"
            )));
        }

        let waitlist = waiting_on_bucket_claims(&claims_by_name);
        if !waitlist.is_empty() {
            info!(namespace, name, ?waitlist, "waiting for prerequisites before provisioning access");
            // Return an error and allow the runner to exponential backoff until we are
            // done waiting on the resources.
            // TODO: optimize this by enqueuing requests for referenced BucketClaims when
            // they finish provisioning.
            return Err(ReconcileError::retryable(anyhow!(
                "waiting for prerequisites before provisioning access: {waitlist:?}"
            )));
        }

        let accessed_buckets = generate_accessed_buckets(&access.spec.bucket_claims, &claims_by_name)
            .map_err(|err| {
                error!(namespace, name, error = %err, "waiting for BucketClaims to finish provisioning");
                ReconcileError::retryable(
                    err.context("waiting for BucketClaims to finish provisioning"),
                )
            })?;

        // After this status update, resource management is handed off to the Sidecar.
        let status = access.status.get_or_insert_with(Default::default);
        status.accessed_buckets = accessed_buckets;
        status.driver_name = class.spec.driver_name.clone();
        status.authentication_type = Some(class.spec.authentication_type);
        status.parameters = class.spec.parameters.clone();
        status.error = None;
        replace_status(api, access).await.map_err(|err| {
            error!(
                namespace, name, error = %err,
                "failed to update BucketAccess status after successful initialization"
            );
            ReconcileError::retryable(err)
        })?;

        Ok(())
    }

    /// Get all BucketClaims that this BucketAccess references.
    ///
    /// If any claims don't exist, assume they don't exist YET; mark them `None` in the
    /// resulting map without treating nonexistence as an error. When no error is
    /// returned, the output map has an entry for every given `BucketClaimAccess`.
    async fn get_all_bucket_claims(
        &self,
        namespace: &str,
        claim_accesses: &[BucketClaimAccess],
    ) -> Result<BTreeMap<String, Option<BucketClaim>>> {
        let api: Api<BucketClaim> = Api::namespaced(self.client.clone(), namespace);

        let mut claims = BTreeMap::new();
        let mut errs = Vec::new();

        for claim_ref in claim_accesses {
            if claims.contains_key(&claim_ref.bucket_claim_name) {
                // CEL validation rules prevent this case at admission, but no duplicates
                // is critical to access initialization, so double check it.
                return Err(ReconcileError::non_retryable(anyhow!(
                    "BucketClaim {:?} is referenced more than once",
                    claim_ref.bucket_claim_name
                )));
            }

            match api.get(&claim_ref.bucket_claim_name).await {
                Ok(claim) => {
                    claims.insert(claim_ref.bucket_claim_name.clone(), Some(claim));
                }
                Err(err) if is_not_found(&err) => {
                    // BucketClaim doesn't exist (yet)
                    claims.insert(claim_ref.bucket_claim_name.clone(), None);
                }
                Err(err) => {
                    // Unspecified API server error that probably resolves after
                    // exponential backoff
                    errs.push(format!("{err}"));
                }
            }
        }

        if !errs.is_empty() {
            return Err(ReconcileError::retryable(anyhow!(
                "could not get one or more BucketClaims: {errs:?}"
            )));
        }

        if claims.len() != claim_accesses.len() {
            // Should never happen, but double check because the 1:1 requirement is
            // critical.
            return Err(ReconcileError::retryable(anyhow!(
                "did not get one or more BucketClaims, but no errors observed"
            )));
        }

        Ok(claims)
    }

    /// Mark all resolved BucketClaims as having a BucketAccess reference.
    async fn mark_all_bucket_claims_as_accessed(
        &self,
        namespace: &str,
        claims_by_name: &BTreeMap<String, Option<BucketClaim>>,
    ) -> Result<()> {
        let api: Api<BucketClaim> = Api::namespaced(self.client.clone(), namespace);

        let mut errs = Vec::new();
        for claim in claims_by_name.values().flatten() {
            let already_marked = claim
                .metadata
                .annotations
                .as_ref()
                .is_some_and(|a| a.contains_key(HAS_BUCKET_ACCESS_REFERENCES_ANNOTATION));
            if already_marked {
                continue;
            }

            // Race condition: this will still attempt to apply the annotation even when
            // the deletion timestamp is set. This may interrupt an in-progress
            // BucketClaim deletion before the point of no return, preserving data, or it
            // may be too late. The BucketClaim deletion logic must handle the unexpected
            // appearance of this annotation at any point.
            let mut marked = claim.clone();
            marked
                .metadata
                .annotations
                .get_or_insert_with(BTreeMap::new)
                .insert(HAS_BUCKET_ACCESS_REFERENCES_ANNOTATION.to_string(), String::new());
            if let Err(err) = api
                .replace(&marked.name_any(), &PostParams::default(), &marked)
                .await
            {
                errs.push(format!("{err}"));
            }
        }

        if !errs.is_empty() {
            return Err(ReconcileError::retryable(anyhow!(
                "failed to mark one or more BucketClaims as having a BucketAccess reference: {errs:?}"
            )));
        }

        Ok(())
    }
}

/// Return true if the Controller needs to initialize the BucketAccess with BucketClaim
/// and BucketAccessClass info. Return false if required info is set.
/// Return an error if any required info is only partially set. This indicates some sort
/// of degradation or bug.
fn needs_controller_initialization(status: &BucketAccessStatus) -> anyhow::Result<bool> {
    let required_fields = [
        ("status.accessedBuckets", !status.accessed_buckets.is_empty()),
        ("status.driverName", !status.driver_name.is_empty()),
        (
            "status.authenticationType",
            status.authentication_type.is_some(),
        ),
    ];

    let num_set = required_fields.iter().filter(|(_, is_set)| *is_set).count();

    if num_set == 0 {
        return Ok(true);
    }

    if num_set == required_fields.len() {
        return Ok(false);
    }

    Err(anyhow!(
        "required Controller-managed fields are only partially set: {required_fields:?}"
    ))
}

/// Return an error if the BucketAccess doesn't meet BucketAccessClass requirements.
fn validate_access_against_class(
    class: &BucketAccessClassSpec,
    access: &BucketAccessSpec,
) -> anyhow::Result<()> {
    let mut errs = Vec::new();

    let need_service_account =
        class.authentication_type == BucketAccessAuthenticationType::ServiceAccount;
    let service_account_empty = access
        .service_account_name
        .as_deref()
        .map_or(true, str::is_empty);
    if need_service_account && service_account_empty {
        errs.push("serviceAccountName must be specified".to_string());
    }

    if class.feature_options.disallow_multi_bucket_access && access.bucket_claims.len() > 1 {
        errs.push("multi-bucket access is disallowed".to_string());
    }

    for claim_ref in &access.bucket_claims {
        if class
            .feature_options
            .disallowed_bucket_access_modes
            .contains(&claim_ref.access_mode)
        {
            errs.push(format!(
                "accessMode {:?} requested for BucketClaim {:?} is disallowed",
                claim_ref.access_mode.to_string(),
                claim_ref.bucket_claim_name
            ));
        }
    }

    if !errs.is_empty() {
        return Err(anyhow!(
            "one or more features are disallowed by the BucketAccessClass: {errs:?}"
        ));
    }
    Ok(())
}

/// Ensure that all BucketClaims can request the access to be provisioned without known
/// errors. Return a list of messages that explain what is blocking provisioning.
fn cannot_access_bucket_claims(
    claims_by_name: &BTreeMap<String, Option<BucketClaim>>,
    spec: &BucketAccessSpec,
) -> Vec<String> {
    let mut blockers = Vec::new();
    for (name, claim) in claims_by_name {
        let Some(claim) = claim else {
            continue;
        };
        if claim.metadata.deletion_timestamp.is_some() {
            // The BucketClaim might not delete while this BucketAccess exists, and the
            // BucketAccess can't proceed for the in-deletion BucketClaim. Because this
            // is a data safety race, rely on the user to resolve it as they desire.
            blockers.push(format!(
                "stuck: data integrity for deleting BucketClaim {name:?} is not guaranteed"
            ));
        }
        let protocols = claim
            .status
            .as_ref()
            .map(|s| s.protocols.as_slice())
            .unwrap_or_default();
        if !protocols.is_empty() && !protocols.contains(&spec.protocol) {
            blockers.push(format!(
                "BucketClaim {name:?} does not support protocol {:?}",
                spec.protocol.to_string()
            ));
        }
    }
    blockers
}

/// Ensure that all BucketClaims are provisioned enough to continue with access
/// initialization. Return a list of messages that explain what needs to be waited on.
fn waiting_on_bucket_claims(claims_by_name: &BTreeMap<String, Option<BucketClaim>>) -> Vec<String> {
    let mut wait_msgs = Vec::new();
    for (name, claim) in claims_by_name {
        let Some(claim) = claim else {
            wait_msgs.push(format!("BucketClaim {name:?} does not (yet?) exist"));
            continue;
        };
        let still_provisioning = claim.status.as_ref().map_or(true, |s| {
            s.bound_bucket_name.is_empty() || s.protocols.is_empty()
        });
        if still_provisioning {
            wait_msgs.push(format!("BucketClaim {name:?} is still provisioning"));
        }
    }
    wait_msgs
}

/// Generate the accessedBuckets status list for the BucketAccess.
///
/// The ordering of accessedBuckets in the status matches the ordering of bucketClaims in
/// the spec, which helps human readability.
fn generate_accessed_buckets(
    claim_accesses: &[BucketClaimAccess],
    claims_by_name: &BTreeMap<String, Option<BucketClaim>>,
) -> anyhow::Result<Vec<AccessedBucket>> {
    let mut accessed_buckets = Vec::with_capacity(claim_accesses.len());
    let mut unbound = Vec::new();

    for claim_ref in claim_accesses {
        let claim = match claims_by_name.get(&claim_ref.bucket_claim_name) {
            Some(Some(claim)) => claim,
            _ => {
                // Unexpected during runtime because get_all_bucket_claims() requires
                // that all input claim references be represented in the map.
                return Err(anyhow!(
                    "missing expected BucketClaim internally {:?}",
                    claim_ref.bucket_claim_name
                ));
            }
        };

        let bound_name = claim
            .status
            .as_ref()
            .map(|s| s.bound_bucket_name.as_str())
            .unwrap_or_default();
        if bound_name.is_empty() {
            unbound.push(claim_ref.bucket_claim_name.clone());
            continue;
        }

        accessed_buckets.push(AccessedBucket {
            bucket_name: bound_name.to_string(),
            bucket_claim_name: claim.name_any(),
        });
    }

    if !unbound.is_empty() {
        return Err(anyhow!(
            "one or more BucketClaims are still unbound to a Bucket: {unbound:?}"
        ));
    }

    Ok(accessed_buckets)
}

#[cfg(test)]
#[path = "bucketaccess_tests.rs"]
mod bucketaccess_tests;
