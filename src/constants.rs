// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Global constants for the COSI control-plane.
//!
//! This module contains the numeric and string constants used throughout the codebase.
//! The finalizer and annotation strings are API contract: they are shared between the
//! Controller and every Sidecar, and changing them breaks version-skew compatibility.

// ============================================================================
// API Constants
// ============================================================================

/// API group for all COSI resources
pub const API_GROUP: &str = "objectstorage.k8s.io";

/// API version for all COSI resources
pub const API_VERSION: &str = "v1alpha2";

/// Kind name for `Bucket` resource
pub const KIND_BUCKET: &str = "Bucket";

/// Kind name for `BucketClaim` resource
pub const KIND_BUCKET_CLAIM: &str = "BucketClaim";

/// Kind name for `BucketAccess` resource
pub const KIND_BUCKET_ACCESS: &str = "BucketAccess";

/// Kind name for `BucketClass` resource
pub const KIND_BUCKET_CLASS: &str = "BucketClass";

/// Kind name for `BucketAccessClass` resource
pub const KIND_BUCKET_ACCESS_CLASS: &str = "BucketAccessClass";

// ============================================================================
// Finalizers
// ============================================================================

/// Applied to a COSI resource to protect it from deletion while COSI processes deletion of
/// the resource's intermediate and backend counterparts.
pub const PROTECTION_FINALIZER: &str = "objectstorage.k8s.io/protection";

// ============================================================================
// Annotations
// ============================================================================

/// Applied by the Controller to a `BucketClaim` when a `BucketAccess` referencing the claim
/// is created. The annotation remains for as long as any `BucketAccess` references the
/// claim and is removed once the last referencing `BucketAccess` is deleted.
pub const HAS_BUCKET_ACCESS_REFERENCES_ANNOTATION: &str =
    "objectstorage.k8s.io/has-bucketaccess-references";

/// Applied by a Sidecar to a managed `BucketAccess` during deletion, after the driver has
/// finished backend deletion actions. Setting the annotation hands final deletion cleanup
/// back to the Controller.
pub const SIDECAR_CLEANUP_FINISHED_ANNOTATION: &str =
    "objectstorage.k8s.io/sidecar-cleanup-finished";

/// Can be applied to a `BucketAccess` by the Controller to reclaim management of a resource
/// that would otherwise be managed by a Sidecar. Intended for rectifying provisioning bugs
/// with a newer Controller; remove the annotation to restore normal Sidecar handoff.
pub const CONTROLLER_MANAGEMENT_OVERRIDE_ANNOTATION: &str =
    "objectstorage.k8s.io/controller-management-override";

// ============================================================================
// Sidecar RPC Constants
// ============================================================================

/// Default driver RPC endpoint unix socket location
pub const RPC_ENDPOINT_DEFAULT: &str = "unix:///var/lib/cosi/cosi.sock";

/// Environment variable that overrides the driver RPC endpoint location
pub const RPC_ENDPOINT_ENV_VAR: &str = "COSI_ENDPOINT";

/// Overall timeout for RPC connection establishment plus driver info retrieval (120 seconds)
pub const RPC_BOOTSTRAP_TIMEOUT_SECS: u64 = 120;

/// Base delay between RPC connection attempts. The max delay is the same because the driver
/// socket is local, never reached over a network.
pub const RPC_CONNECT_DELAY_SECS: u64 = 1;

// ============================================================================
// Reconcile Retry Constants
// ============================================================================

/// Maximum total time to spend retrying a retryable reconcile error (5 minutes)
pub const RETRY_MAX_ELAPSED_TIME_SECS: u64 = 300;

/// Initial retry interval (100ms)
pub const RETRY_INITIAL_INTERVAL_MILLIS: u64 = 100;

/// Maximum interval between retries (30 seconds)
pub const RETRY_MAX_INTERVAL_SECS: u64 = 30;

/// Backoff multiplier (exponential growth factor)
pub const RETRY_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Randomization factor to prevent thundering herd (±10%)
pub const RETRY_RANDOMIZATION_FACTOR: f64 = 0.1;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Port for Prometheus metrics HTTP server
pub const METRICS_SERVER_PORT: u16 = 8080;

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Bind address for metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for the Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
