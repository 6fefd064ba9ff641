//! Reconciliation logic for each COSI resource type.
//!
//! The Controller runs [`bucketclaim::BucketClaimReconciler`] and
//! [`bucketaccess::BucketAccessReconciler`]; a Sidecar runs
//! [`bucket::BucketReconciler`] against its paired driver.

pub mod bucket;
pub mod bucketaccess;
pub mod bucketclaim;
pub mod driver;
pub mod finalizers;

#[cfg(test)]
pub(crate) mod testutil;

pub use bucket::BucketReconciler;
pub use bucketaccess::BucketAccessReconciler;
pub use bucketclaim::BucketClaimReconciler;
pub use driver::DriverInfo;

use kube::api::PostParams;
use kube::{Api, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// True if the API error is a 404 Not Found.
pub(crate) fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(api_err) if api_err.code == 404)
}

/// True if the API error is a 409 AlreadyExists conflict from a create call.
pub(crate) fn is_already_exists(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(api_err) if api_err.code == 409 && api_err.reason == "AlreadyExists")
}

/// Replace a resource's status subresource with the status carried by `obj`.
///
/// A full replace keeps the API server's optimistic concurrency in effect: a stale
/// `resourceVersion` surfaces as a conflict, which the error taxonomy treats as
/// retryable.
pub(crate) async fn replace_status<K>(api: &Api<K>, obj: &K) -> anyhow::Result<K>
where
    K: Resource + ResourceExt + Serialize + DeserializeOwned + Clone + std::fmt::Debug,
{
    let data = serde_json::to_vec(obj)?;
    let updated = api
        .replace_status(&obj.name_any(), &PostParams::default(), data)
        .await?;
    Ok(updated)
}
