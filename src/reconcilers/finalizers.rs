// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Protection finalizer management for COSI resources.
//!
//! Every reconciled resource that still has a live dependency carries the protection
//! finalizer. Reconcilers must tolerate the finalizer being absent on arrival and
//! re-add it, unless the object is being deleted; removing it is the final act of
//! deletion reconciliation.
//!
//! Finalizer edits are full resource updates (never status writes), so a concurrent
//! writer surfaces as a retryable conflict rather than a silent overwrite.

use crate::constants::PROTECTION_FINALIZER;
use anyhow::Result;
use kube::api::PostParams;
use kube::core::{ClusterResourceScope, NamespaceResourceScope};
use kube::{Api, Client, Resource, ResourceExt};
use serde::Serialize;
use tracing::info;

fn has_protection_finalizer(finalizers: Option<&Vec<String>>) -> bool {
    finalizers.is_some_and(|f| f.iter().any(|x| x == PROTECTION_FINALIZER))
}

/// Add the protection finalizer to a namespaced resource if not already present.
///
/// Idempotent. Returns the resource as stored on the server after the update, so the
/// caller can continue with a current `resourceVersion`.
pub async fn ensure_protection_finalizer<T>(client: &Client, resource: &T) -> Result<T>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + Serialize
        + for<'de> serde::Deserialize<'de>,
{
    if has_protection_finalizer(resource.meta().finalizers.as_ref()) {
        return Ok(resource.clone());
    }

    let namespace = resource.namespace().unwrap_or_default();
    let name = resource.name_any();

    info!(
        kind = %T::kind(&()),
        namespace = %namespace,
        name = %name,
        "adding protection finalizer"
    );

    let mut updated = resource.clone();
    updated
        .meta_mut()
        .finalizers
        .get_or_insert_with(Vec::new)
        .push(PROTECTION_FINALIZER.to_string());

    let api: Api<T> = Api::namespaced(client.clone(), &namespace);
    let stored = api.replace(&name, &PostParams::default(), &updated).await?;
    Ok(stored)
}

/// Remove the protection finalizer from a namespaced resource if present.
///
/// Idempotent. Returns the resource as stored on the server after the update.
pub async fn remove_protection_finalizer<T>(client: &Client, resource: &T) -> Result<T>
where
    T: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + Serialize
        + for<'de> serde::Deserialize<'de>,
{
    if !has_protection_finalizer(resource.meta().finalizers.as_ref()) {
        return Ok(resource.clone());
    }

    let namespace = resource.namespace().unwrap_or_default();
    let name = resource.name_any();

    info!(
        kind = %T::kind(&()),
        namespace = %namespace,
        name = %name,
        "removing protection finalizer"
    );

    let mut updated = resource.clone();
    if let Some(finalizers) = updated.meta_mut().finalizers.as_mut() {
        finalizers.retain(|f| f != PROTECTION_FINALIZER);
    }

    let api: Api<T> = Api::namespaced(client.clone(), &namespace);
    let stored = api.replace(&name, &PostParams::default(), &updated).await?;
    Ok(stored)
}

/// Add the protection finalizer to a cluster-scoped resource if not already present.
///
/// Idempotent. Returns the resource as stored on the server after the update.
pub async fn ensure_cluster_protection_finalizer<T>(client: &Client, resource: &T) -> Result<T>
where
    T: Resource<DynamicType = (), Scope = ClusterResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + Serialize
        + for<'de> serde::Deserialize<'de>,
{
    if has_protection_finalizer(resource.meta().finalizers.as_ref()) {
        return Ok(resource.clone());
    }

    let name = resource.name_any();

    info!(kind = %T::kind(&()), name = %name, "adding protection finalizer");

    let mut updated = resource.clone();
    updated
        .meta_mut()
        .finalizers
        .get_or_insert_with(Vec::new)
        .push(PROTECTION_FINALIZER.to_string());

    let api: Api<T> = Api::all(client.clone());
    let stored = api.replace(&name, &PostParams::default(), &updated).await?;
    Ok(stored)
}

/// Remove the protection finalizer from a cluster-scoped resource if present.
///
/// Idempotent. Returns the resource as stored on the server after the update.
pub async fn remove_cluster_protection_finalizer<T>(client: &Client, resource: &T) -> Result<T>
where
    T: Resource<DynamicType = (), Scope = ClusterResourceScope>
        + ResourceExt
        + Clone
        + std::fmt::Debug
        + Serialize
        + for<'de> serde::Deserialize<'de>,
{
    if !has_protection_finalizer(resource.meta().finalizers.as_ref()) {
        return Ok(resource.clone());
    }

    let name = resource.name_any();

    info!(kind = %T::kind(&()), name = %name, "removing protection finalizer");

    let mut updated = resource.clone();
    if let Some(finalizers) = updated.meta_mut().finalizers.as_mut() {
        finalizers.retain(|f| f != PROTECTION_FINALIZER);
    }

    let api: Api<T> = Api::all(client.clone());
    let stored = api.replace(&name, &PostParams::default(), &updated).await?;
    Ok(stored)
}

#[cfg(test)]
#[path = "finalizers_tests.rs"]
mod finalizers_tests;
