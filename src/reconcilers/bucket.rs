// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Bucket reconciliation (Sidecar).
//!
//! Materializes backend buckets for dynamically-provisioned Buckets by calling the
//! paired driver's CreateBucket RPC, then records the resulting bucket ID and
//! per-protocol connection info in Bucket status.

use crate::crd::{Bucket, BucketClaimReference, BucketStatus, ObjectProtocol, TimestampedError};
use crate::errors::{ReconcileError, Result};
use crate::proto;
use crate::protocol::{
    object_protocol_api_to_rpc, AzureBucketInfoTranslator, GcsBucketInfoTranslator,
    RpcApiTranslator, S3BucketInfoTranslator,
};
use crate::reconcilers::driver::{rpc_error_is_retryable, DriverInfo};
use crate::reconcilers::finalizers::{
    ensure_cluster_protection_finalizer, remove_cluster_protection_finalizer,
};
use crate::reconcilers::{is_not_found, replace_status};
use anyhow::anyhow;
use kube::{Api, Client, ResourceExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Reconciles `Bucket` objects whose driver name matches the paired driver.
#[derive(Clone)]
pub struct BucketReconciler {
    client: Client,
    driver: Arc<DriverInfo>,
}

impl BucketReconciler {
    #[must_use]
    pub fn new(client: Client, driver: Arc<DriverInfo>) -> Self {
        Self { client, driver }
    }

    /// Reconcile a single Bucket. Any reconcile error is recorded as a timestamped error
    /// in the Bucket status before it is returned.
    pub async fn reconcile(&self, name: &str) -> Result<()> {
        let api: Api<Bucket> = Api::all(self.client.clone());

        let mut bucket = match api.get(name).await {
            Ok(bucket) => bucket,
            Err(err) if is_not_found(&err) => {
                debug!(name, "not reconciling nonexistent Bucket");
                return Ok(());
            }
            Err(err) => {
                // no resource to add status to or report an event for
                error!(name, error = %err, "failed to get Bucket");
                return Err(err.into());
            }
        };

        if let Err(err) = self.reconcile_bucket(&api, &mut bucket).await {
            // Record any error as a timestamped error in the status.
            bucket.status.get_or_insert_with(Default::default).error =
                Some(TimestampedError::new(&format!("{err:#}")));
            if let Err(update_err) = replace_status(&api, &bucket).await {
                error!(
                    name,
                    error = %err, update_error = %update_err,
                    "failed to update Bucket status after reconcile error"
                );
                // If the status update fails, retry the original error regardless of its
                // flavor. The reconcile needs to run again to make sure the status is
                // eventually updated.
                return Err(ReconcileError::retryable(anyhow!("{err:#}")));
            }
            return Err(err);
        }

        // On success, clear any errors in the status.
        let has_error = bucket.status.as_ref().is_some_and(|s| s.error.is_some());
        if has_error && bucket.metadata.deletion_timestamp.is_some() {
            if let Some(status) = bucket.status.as_mut() {
                status.error = None;
            }
            if let Err(err) = replace_status(&api, &bucket).await {
                error!(name, error = %err, "failed to update Bucket status after reconcile success");
                // Retry the reconcile so status can be updated eventually.
                return Err(ReconcileError::retryable(err));
            }
        }

        Ok(())
    }

    async fn reconcile_bucket(&self, api: &Api<Bucket>, bucket: &mut Bucket) -> Result<()> {
        let name = bucket.name_any();
        let driver_name = self.driver.name();

        if bucket.spec.driver_name != driver_name {
            // The event filter already enforces driver-name matching; keep this check to
            // help debug any issues that might arise with predicate logic.
            info!(
                name, driver_name,
                bucket_driver_name = %bucket.spec.driver_name,
                "not reconciling bucket with non-matching driver name"
            );
            return Ok(());
        }

        if bucket.metadata.deletion_timestamp.is_some() {
            debug!(name, driver_name, "beginning Bucket deletion cleanup");

            // TODO: deletion logic

            *bucket = remove_cluster_protection_finalizer(&self.client, bucket)
                .await
                .map_err(|err| {
                    error!(name, error = %err, "failed to remove finalizer");
                    ReconcileError::retryable(err.context("failed to remove finalizer"))
                })?;

            return Err(ReconcileError::non_retryable(anyhow!(
                "deletion is not yet implemented"
            ))); // TODO: deletion logic
        }

        let required_protocols = bucket.spec.protocols.as_deref().unwrap_or_default();

        if let Err(err) = validate_driver_supports_protocols(&self.driver, required_protocols) {
            error!(name, driver_name, error = %err, "protocol(s) are unsupported");
            return Err(ReconcileError::non_retryable(err));
        }

        if bucket
            .spec
            .existing_bucket_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
        {
            return Err(ReconcileError::non_retryable(anyhow!(
                "static provisioning is not yet supported"
            ))); // TODO: static provisioning
        }

        debug!(name, driver_name, provisioning_strategy = "dynamic", "reconciling Bucket");

        *bucket = ensure_cluster_protection_finalizer(&self.client, bucket)
            .await
            .map_err(|err| {
                error!(name, error = %err, "failed to add protection finalizer");
                ReconcileError::retryable(err.context("failed to add protection finalizer"))
            })?;

        let rpc_protocols = rpc_protocols_from_api_list(bucket.spec.protocols.as_deref());
        let provisioned = dynamic_provision(
            &self.driver,
            DynamicProvisionParams {
                bucket_name: &name,
                required_protocols: &rpc_protocols,
                parameters: bucket.spec.parameters.as_ref(),
                claim_ref: &bucket.spec.bucket_claim_ref,
            },
        )
        .await?;

        // final validation and status updates are the same for dynamic and static
        // provisioning

        if provisioned.supported_protocols.is_empty() {
            error!(name, "created bucket supports no protocols");
            return Err(ReconcileError::non_retryable(anyhow!(
                "created bucket supports no protocols"
            )));
        }

        if let Err(err) = validate_bucket_supports_protocols(
            &provisioned.supported_protocols,
            bucket.spec.protocols.as_deref().unwrap_or_default(),
        ) {
            error!(name, error = %err, "bucket required protocols missing");
            return Err(ReconcileError::non_retryable(
                err.context("bucket required protocols missing"),
            ));
        }

        bucket.status = Some(BucketStatus {
            ready_to_use: true,
            bucket_id: provisioned.bucket_id,
            protocols: provisioned.supported_protocols,
            bucket_info: Some(provisioned.all_protocol_bucket_info),
            error: None,
        });
        replace_status(api, bucket).await.map_err(|err| {
            error!(name, error = %err, "failed to update Bucket status after successful bucket creation");
            ReconcileError::retryable(
                err.context("failed to update Bucket status after successful bucket creation"),
            )
        })?;

        Ok(())
    }
}

/// Details about a provisioned bucket, for both dynamic and static provisioning.
#[derive(Debug, Clone, PartialEq)]
struct ProvisionedBucketDetails {
    bucket_id: String,
    supported_protocols: Vec<ObjectProtocol>,
    all_protocol_bucket_info: BTreeMap<String, String>,
}

/// Parameters for the dynamic provisioning workflow.
struct DynamicProvisionParams<'a> {
    bucket_name: &'a str,
    required_protocols: &'a [proto::ObjectProtocol],
    parameters: Option<&'a BTreeMap<String, String>>,
    claim_ref: &'a BucketClaimReference,
}

async fn dynamic_provision(
    driver: &DriverInfo,
    params: DynamicProvisionParams<'_>,
) -> Result<ProvisionedBucketDetails> {
    let claim_ref = params.claim_ref;
    if claim_ref.name.is_empty() || claim_ref.namespace.is_empty() || claim_ref.uid.is_empty() {
        // likely a malformed bucket intended for static provisioning (possible COSI
        // controller bug)
        error!(
            bucket_name = params.bucket_name,
            ?claim_ref,
            "all bucketClaimRef fields must be set for dynamic provisioning"
        );
        return Err(ReconcileError::non_retryable(anyhow!(
            "all bucketClaimRef fields must be set for dynamic provisioning: {claim_ref:?}"
        )));
    }

    let request = proto::DriverCreateBucketRequest {
        name: params.bucket_name.to_string(),
        protocols: params.required_protocols.to_vec(),
        parameters: params
            .parameters
            .map(|p| p.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default(),
    };

    let rpc_result = driver.provisioner_client().driver_create_bucket(request).await;
    crate::metrics::record_driver_rpc("DriverCreateBucket", rpc_result.is_ok());
    let response = match rpc_result {
        Ok(response) => response.into_inner(),
        Err(status) => {
            error!(
                bucket_name = params.bucket_name,
                code = ?status.code(),
                error = %status,
                "DriverCreateBucket error"
            );
            let err = anyhow!("DriverCreateBucket error: {status}");
            if rpc_error_is_retryable(status.code()) {
                return Err(ReconcileError::retryable(err));
            }
            return Err(ReconcileError::non_retryable(err));
        }
    };

    if response.bucket_id.is_empty() {
        error!(bucket_name = params.bucket_name, "created bucket ID missing");
        // driver behavior is unlikely to change if the request is retried
        return Err(ReconcileError::non_retryable(anyhow!(
            "created bucket ID missing"
        )));
    }

    let Some(protocol_response) = response.protocols else {
        error!(bucket_name = params.bucket_name, "created bucket protocol response missing");
        return Err(ReconcileError::non_retryable(anyhow!(
            "created bucket protocol response missing"
        )));
    };

    let (supported_protocols, all_bucket_info) = parse_protocol_bucket_info(&protocol_response);

    Ok(ProvisionedBucketDetails {
        bucket_id: response.bucket_id,
        supported_protocols,
        all_protocol_bucket_info: all_bucket_info,
    })
}

/// Parse the driver's per-protocol bucket info into the supported-protocols list and the
/// flat user-facing `COSI_<PROTOCOL>_<KEY>` info map.
fn parse_protocol_bucket_info(
    info: &proto::ObjectProtocolAndBucketInfo,
) -> (Vec<ObjectProtocol>, BTreeMap<String, String>) {
    let mut supported_protocols = Vec::new();
    let mut all_protocol_bucket_info = BTreeMap::new();

    let mut merge = |vars: Option<BTreeMap<crate::protocol::BucketInfoVar, String>>| {
        for (var, value) in vars.unwrap_or_default() {
            all_protocol_bucket_info.insert(var.as_str().to_string(), value);
        }
    };

    if info.s3.is_some() {
        supported_protocols.push(ObjectProtocol::S3);
        merge(S3BucketInfoTranslator::rpc_to_api(info.s3.as_ref()));
    }

    if info.azure.is_some() {
        supported_protocols.push(ObjectProtocol::Azure);
        merge(AzureBucketInfoTranslator::rpc_to_api(info.azure.as_ref()));
    }

    if info.gcs.is_some() {
        supported_protocols.push(ObjectProtocol::GCS);
        merge(GcsBucketInfoTranslator::rpc_to_api(info.gcs.as_ref()));
    }

    (supported_protocols, all_protocol_bucket_info)
}

/// Convert an API protocol list into RPC protocol messages.
fn rpc_protocols_from_api_list(api_list: Option<&[ObjectProtocol]>) -> Vec<proto::ObjectProtocol> {
    api_list
        .unwrap_or_default()
        .iter()
        .map(|api_protocol| proto::ObjectProtocol {
            r#type: object_protocol_api_to_rpc(*api_protocol) as i32,
        })
        .collect()
}

/// Validate that the required protocols (if given) are supported by the driver.
fn validate_driver_supports_protocols(
    driver: &DriverInfo,
    required: &[ObjectProtocol],
) -> anyhow::Result<()> {
    let unsupported: Vec<String> = required
        .iter()
        .filter(|protocol| !driver.supports_protocol(**protocol))
        .map(ToString::to_string)
        .collect();

    if !unsupported.is_empty() {
        return Err(anyhow!(
            "driver {:?} does not support protocols: {unsupported:?}",
            driver.name()
        ));
    }
    Ok(())
}

/// Validate the required protocols (if given) are in the supported list from bucket
/// provisioning results.
fn validate_bucket_supports_protocols(
    supported: &[ObjectProtocol],
    required: &[ObjectProtocol],
) -> anyhow::Result<()> {
    let unsupported: Vec<String> = required
        .iter()
        .filter(|required| !supported.contains(*required))
        .map(ToString::to_string)
        .collect();
    if !unsupported.is_empty() {
        return Err(anyhow!(
            "required protocols are not supported: {unsupported:?}"
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "bucket_tests.rs"]
mod bucket_tests;
