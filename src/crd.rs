// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Custom Resource Definitions (CRDs) for object storage provisioning.
//!
//! This module defines the Kubernetes resources that make up the COSI user-facing API.
//!
//! # Resource Types
//!
//! ## Admin-authored templates (cluster-scoped)
//!
//! - [`BucketClass`] - Template for dynamic bucket provisioning
//! - [`BucketAccessClass`] - Template for access provisioning
//!
//! ## User requests (namespaced)
//!
//! - [`BucketClaim`] - Request for a new or existing bucket
//! - [`BucketAccess`] - Request for credentials granting access to one or more claims
//!
//! ## Intermediate records (cluster-scoped)
//!
//! - [`Bucket`] - Represents a provisioned backend bucket; created by the Controller
//!   from a `BucketClaim` and filled in by the Sidecar after driver provisioning
//!
//! # Ownership
//!
//! Resource `spec` fields are written by users only. Status, finalizers, and annotations
//! are written by whichever agent (Controller or Sidecar) currently owns the record; see
//! the `handoff` module for how ownership of a `BucketAccess` is decided.

use chrono::Utc;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An object store protocol that buckets and accesses can be provisioned for.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum ObjectProtocol {
    /// Amazon S3 (and S3-compatible) object protocol
    S3,
    /// Azure Blob object protocol
    Azure,
    /// Google Cloud Storage object protocol
    GCS,
}

impl fmt::Display for ObjectProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectProtocol::S3 => write!(f, "S3"),
            ObjectProtocol::Azure => write!(f, "Azure"),
            ObjectProtocol::GCS => write!(f, "GCS"),
        }
    }
}

/// Configures COSI's behavior when a `Bucket` resource is deleted.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum BucketDeletionPolicy {
    /// Keep both the Bucket object and the backend bucket.
    Retain,
    /// Delete both the Bucket object and the backend bucket.
    Delete,
}

/// Authentication mechanism used for provisioning bucket access.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum BucketAccessAuthenticationType {
    /// The driver should generate a protocol-appropriate access key that clients can use
    /// to authenticate to the backend object store.
    Key,
    /// The driver should configure the system such that Pods using the given
    /// ServiceAccount authenticate to the backend object store automatically.
    ServiceAccount,
}

impl fmt::Display for BucketAccessAuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketAccessAuthenticationType::Key => write!(f, "Key"),
            BucketAccessAuthenticationType::ServiceAccount => write!(f, "ServiceAccount"),
        }
    }
}

/// Read/Write mode an access should have for a bucket.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum BucketAccessMode {
    /// Read-write access
    ReadWrite,
    /// Read-only access
    ReadOnly,
    /// Write-only access
    WriteOnly,
}

impl fmt::Display for BucketAccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketAccessMode::ReadWrite => write!(f, "ReadWrite"),
            BucketAccessMode::ReadOnly => write!(f, "ReadOnly"),
            BucketAccessMode::WriteOnly => write!(f, "WriteOnly"),
        }
    }
}

/// An error message with the timestamp at which it was encountered.
///
/// Recorded in a resource's status whenever reconciliation fails. The message is also
/// logged, so it must never contain sensitive information such as credentials.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimestampedError {
    /// RFC3339 timestamp when the error was encountered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// A string detailing the encountered error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TimestampedError {
    /// Create a `TimestampedError` with the current time and the given message.
    /// The message field is `None` for an empty input.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let message = if message.is_empty() {
            None
        } else {
            Some(message.to_string())
        };
        TimestampedError {
            time: Some(Utc::now().to_rfc3339()),
            message,
        }
    }
}

// ============================================================================
// BucketClass
// ============================================================================

/// `BucketClass` defines a named "class" of object storage buckets.
///
/// Different classes might map to different object storage protocols, quality-of-service
/// levels, backup policies, or any other arbitrary configuration determined by storage
/// administrators. The name of a `BucketClass` object is significant, and is how users
/// request a particular class. The spec is entirely immutable after creation.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "objectstorage.k8s.io",
    version = "v1alpha2",
    kind = "BucketClass",
    plural = "bucketclasses"
)]
#[serde(rename_all = "camelCase")]
pub struct BucketClassSpec {
    /// Name of the driver that fulfills requests for this BucketClass.
    pub driver_name: String,

    /// Determines whether a Bucket created through the BucketClass should be deleted when
    /// its bound BucketClaim is deleted.
    pub deletion_policy: BucketDeletionPolicy,

    /// Opaque map of driver-specific configuration items passed to the driver that
    /// fulfills requests for this BucketClass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,
}

// ============================================================================
// BucketAccessClass
// ============================================================================

/// `BucketAccessClass` defines a named "class" of bucket access provisioning behavior.
///
/// Carries the driver name, authentication type, and opaque driver parameters copied into
/// every `BucketAccess` provisioned through it. The spec is entirely immutable.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "objectstorage.k8s.io",
    version = "v1alpha2",
    kind = "BucketAccessClass",
    plural = "bucketaccessclasses"
)]
#[serde(rename_all = "camelCase")]
pub struct BucketAccessClassSpec {
    /// Name of the driver that fulfills requests for this BucketAccessClass.
    pub driver_name: String,

    /// Which authentication mechanism is used for bucket access.
    pub authentication_type: BucketAccessAuthenticationType,

    /// Opaque map of driver-specific configuration items passed to the driver that
    /// fulfills requests for this BucketAccessClass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,

    /// Adjusts various COSI access provisioning behaviors.
    #[serde(default)]
    pub feature_options: BucketAccessFeatureOptions,
}

/// Feature options that adjust COSI access provisioning behaviors.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketAccessFeatureOptions {
    /// Disallowed Read/Write access modes. A BucketAccess using this class will not be
    /// allowed to request access to a BucketClaim with any access mode listed here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disallowed_bucket_access_modes: Vec<BucketAccessMode>,

    /// Disables the ability for a BucketAccess to reference multiple BucketClaims.
    #[serde(default)]
    pub disallow_multi_bucket_access: bool,
}

// ============================================================================
// BucketClaim
// ============================================================================

/// `BucketClaim` is a namespaced user request for a bucket.
///
/// Exactly one of `bucketClassName` (dynamic provisioning) or `existingBucketName`
/// (static provisioning) must be set.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "objectstorage.k8s.io",
    version = "v1alpha2",
    kind = "BucketClaim",
    plural = "bucketclaims",
    namespaced,
    status = "BucketClaimStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BucketClaimSpec {
    /// Selects the BucketClass for provisioning the BucketClaim.
    /// Used only for dynamic provisioning; mutually exclusive with `existingBucketName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_class_name: Option<String>,

    /// Object storage protocols that the provisioned Bucket must support.
    /// If specified, COSI verifies that each item is advertised as supported by the driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<ObjectProtocol>>,

    /// Name of an existing Bucket resource that this BucketClaim should bind to.
    /// Used only for static provisioning; mutually exclusive with `bucketClassName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_bucket_name: Option<String>,
}

/// Observed state of a `BucketClaim`.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketClaimStatus {
    /// Name of the Bucket this BucketClaim is bound to. Immutable once set.
    #[serde(default)]
    pub bound_bucket_name: String,

    /// Indicates that the bucket is ready for consumption by workloads.
    #[serde(default)]
    pub ready_to_use: bool,

    /// The set of protocols the bound Bucket reports to support. BucketAccesses can
    /// request access to this BucketClaim using any of the protocols reported here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<ObjectProtocol>,

    /// The most recent error message, with a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TimestampedError>,
}

// ============================================================================
// Bucket
// ============================================================================

/// `Bucket` is the cluster-scoped record representing a provisioned backend bucket.
///
/// Created by the Controller as an intermediate record when a `BucketClaim` is
/// dynamically provisioned, then filled in by the Sidecar whose driver name matches.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "objectstorage.k8s.io",
    version = "v1alpha2",
    kind = "Bucket",
    plural = "buckets",
    status = "BucketStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BucketSpec {
    /// Name of the driver that fulfills requests for this Bucket. Immutable.
    pub driver_name: String,

    /// Determines whether the backend bucket is kept or deleted along with this record.
    /// Mutable so that Admins can change the policy after creation.
    pub deletion_policy: BucketDeletionPolicy,

    /// Opaque map of driver-specific configuration items passed to the driver that
    /// fulfills requests for this Bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,

    /// Object store protocols that the provisioned Bucket must support.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocols: Option<Vec<ObjectProtocol>>,

    /// References the BucketClaim that resulted in the creation of this Bucket.
    /// For statically-provisioned buckets, names the BucketClaim allowed to bind to it.
    #[serde(rename = "bucketClaim")]
    pub bucket_claim_ref: BucketClaimReference,

    /// The unique identifier for an existing backend bucket known to the driver.
    /// Set only for static provisioning; empty for dynamically provisioned Buckets.
    #[serde(
        rename = "existingBucketID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub existing_bucket_id: Option<String>,
}

/// A reference to a `BucketClaim` object.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketClaimReference {
    /// Name of the BucketClaim being referenced.
    pub name: String,

    /// Namespace of the BucketClaim being referenced.
    #[serde(default)]
    pub namespace: String,

    /// UID of the BucketClaim being referenced.
    #[serde(default)]
    pub uid: String,
}

/// Observed state of a `Bucket`.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketStatus {
    /// Indicates that the bucket is ready for consumption by workloads.
    #[serde(default)]
    pub ready_to_use: bool,

    /// The unique identifier for the backend bucket known to the driver.
    /// Immutable once set.
    #[serde(rename = "bucketID", default)]
    pub bucket_id: String,

    /// The set of protocols the Bucket reports to support.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<ObjectProtocol>,

    /// Bucket info reported by the driver, rendered in the `COSI_<PROTOCOL>_<KEY>` format
    /// used for the BucketAccess Secret, e.g. `COSI_S3_ENDPOINT`,
    /// `COSI_AZURE_STORAGE_ACCOUNT`. Must not contain any sensitive information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_info: Option<BTreeMap<String, String>>,

    /// The most recent error message, with a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TimestampedError>,
}

// ============================================================================
// BucketAccess
// ============================================================================

/// `BucketAccess` is a namespaced user request for credentials granting access to one or
/// more `BucketClaim`s.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "objectstorage.k8s.io",
    version = "v1alpha2",
    kind = "BucketAccess",
    plural = "bucketaccesses",
    namespaced,
    status = "BucketAccessStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BucketAccessSpec {
    /// BucketClaims the provisioned access must have permissions for, with
    /// per-BucketClaim access parameters. At least one BucketClaim must be referenced,
    /// and multiple references to the same BucketClaim are not permitted.
    pub bucket_claims: Vec<BucketClaimAccess>,

    /// Selects the BucketAccessClass for provisioning the access.
    pub bucket_access_class_name: String,

    /// The object storage protocol that the provisioned access must use.
    pub protocol: ObjectProtocol,

    /// Name of the Kubernetes ServiceAccount that user application Pods intend to use for
    /// access to referenced BucketClaims. Ignored for `Key` authentication; required for
    /// `ServiceAccount` authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
}

/// Selects a `BucketClaim` for access and defines access parameters for the
/// corresponding bucket.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketClaimAccess {
    /// Name of a BucketClaim the access should have permissions for.
    /// Must be in the same Namespace as the BucketAccess.
    pub bucket_claim_name: String,

    /// The Read/Write access mode that the access should have for the bucket.
    pub access_mode: BucketAccessMode,

    /// Name of a Kubernetes Secret that COSI should create and populate with bucket info
    /// and access credentials. Created in the same Namespace as the BucketAccess and
    /// deleted when the BucketAccess is deleted and deprovisioned.
    pub access_secret_name: String,
}

/// Identifies a `Bucket` and correlates it to a `BucketClaimAccess` from the spec.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessedBucket {
    /// Name of a Bucket the access should have permissions for.
    pub bucket_name: String,

    /// Matches a `BucketClaimAccess`'s `bucketClaimName` from the spec.
    pub bucket_claim_name: String,
}

/// Observed state of a `BucketAccess`.
///
/// The Controller populates `accessedBuckets`, `driverName`, `authenticationType`, and
/// `parameters` exactly once at handoff; the Sidecar fills in the rest during access
/// provisioning. `driverName` presence is the single bit that decides which agent owns
/// the record.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketAccessStatus {
    /// Indicates that the BucketAccess is ready for consumption by workloads.
    #[serde(default)]
    pub ready_to_use: bool,

    /// The unique identifier for the backend access known to the driver.
    /// Populated by the Sidecar once access has been successfully granted.
    #[serde(rename = "accountID", default)]
    pub account_id: String,

    /// Buckets the provisioned access must have permissions for, in the same order as the
    /// referenced BucketClaims in the spec. Populated by the Controller.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accessed_buckets: Vec<AccessedBucket>,

    /// Copy of the BucketAccessClass driver name from the time of provisioning.
    /// Populated by the Controller; immutable once set.
    #[serde(default)]
    pub driver_name: String,

    /// Copy of the BucketAccessClass authentication type from the time of provisioning.
    /// Populated by the Controller; immutable once set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<BucketAccessAuthenticationType>,

    /// Copy of the BucketAccessClass parameters from the time of provisioning.
    /// Populated by the Controller; immutable once set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, String>>,

    /// The most recent error message, with a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TimestampedError>,
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
