// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Ownership handoff arbitration between Controller and Sidecar.
//!
//! The Controller and any given Sidecar must avoid managing the same `BucketAccess`
//! resource at the same time, which would cause them to race with each other and produce
//! update conflicts. Instances where a resource has no manager MUST be avoided without
//! exception.
//!
//! Version skew between Controller and Sidecar should be assumed. To keep skew issues
//! minimal, avoid updating this logic unless absolutely critical. If updates are made,
//! carefully consider all version skew cases:
//!
//! 1. Sidecar version low, Controller version low
//! 2. Sidecar version low, Controller version high
//! 3. Sidecar version high, Controller version low
//! 4. Sidecar version high, Controller version high

use crate::constants::{
    CONTROLLER_MANAGEMENT_OVERRIDE_ANNOTATION, SIDECAR_CLEANUP_FINISHED_ANNOTATION,
};
use crate::crd::BucketAccess;

/// Returns true if a `BucketAccess` should be managed by the Sidecar.
/// A false return value indicates that it should be managed by the Controller instead.
#[must_use]
pub fn bucket_access_managed_by_sidecar(access: &BucketAccess) -> bool {
    let annotations = access.metadata.annotations.as_ref();
    let has_annotation =
        |key: &str| annotations.is_some_and(|a| a.contains_key(key));

    // Allow a future-compatible mechanism by which the Controller can override the normal
    // BucketAccess management handoff logic in order to resolve a bug.
    // Instances where this is utilized should be infrequent -- ideally, never used.
    if has_annotation(CONTROLLER_MANAGEMENT_OVERRIDE_ANNOTATION) {
        return false;
    }

    // During provisioning, there are several status fields that the Controller needs to
    // set before the Sidecar can provision an access. However, tying this function's
    // logic to ALL of the status items could make long-term Controller-Sidecar handoff
    // logic fragile. More logic means more risk of unmanaged resources and more
    // difficulty reasoning about how changes will impact ownership during version skew.
    // Minimize risk by relying on a single determining status field.
    let driver_name_set = access
        .status
        .as_ref()
        .is_some_and(|s| !s.driver_name.is_empty());
    if !driver_name_set {
        return false;
    }

    // During deletion, as long as the access was handed off to the Sidecar at some point,
    // the Sidecar must first clean up the backend bucket, then hand back final deletion
    // to the Controller by setting an annotation.
    if access.metadata.deletion_timestamp.is_some() {
        return !has_annotation(SIDECAR_CLEANUP_FINISHED_ANNOTATION);
    }

    true
}

#[cfg(test)]
#[path = "handoff_tests.rs"]
mod handoff_tests;
