// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Event-filter predicates that gate reconciliation.
//!
//! The split Controller/Sidecar architecture means many reconcile filter behaviors are
//! reused between components, where composition of smaller, individual behaviors is
//! helpful. A predicate here is a pure function from a [`ResourceEvent`] to a bool,
//! composed with [`any_of`] and [`all_of`]. The watch layer (see the `runner` module)
//! classifies raw watch events into `ResourceEvent`s, pairing each update with the
//! previously observed object state, and enqueues a reconcile only when the composed
//! predicate passes.

use crate::constants::PROTECTION_FINALIZER;
use crate::crd::{Bucket, BucketAccess, BucketClaim};
use crate::handoff::bucket_access_managed_by_sidecar;
use kube::Resource;
use std::sync::Arc;
use tracing::info;

/// A resource event observed from a watch stream.
///
/// Update events carry both the previously observed and the new object state, which is
/// what most of the interesting predicates need.
#[derive(Clone, Debug)]
pub enum ResourceEvent<K> {
    /// The object was first observed.
    Created(Arc<K>),
    /// The object changed between two observations.
    Updated { old: Arc<K>, new: Arc<K> },
    /// The object was deleted.
    Deleted(Arc<K>),
    /// A re-observation with no known prior state, e.g. after a watch restart.
    Generic(Arc<K>),
}

impl<K> ResourceEvent<K> {
    /// The event's subject object. For updates, the new state.
    #[must_use]
    pub fn object(&self) -> &K {
        match self {
            ResourceEvent::Created(obj)
            | ResourceEvent::Deleted(obj)
            | ResourceEvent::Generic(obj) => obj,
            ResourceEvent::Updated { new, .. } => new,
        }
    }

    /// Shared handle to the event's subject object. For updates, the new state.
    #[must_use]
    pub fn object_owned(&self) -> Arc<K> {
        match self {
            ResourceEvent::Created(obj)
            | ResourceEvent::Deleted(obj)
            | ResourceEvent::Generic(obj) => Arc::clone(obj),
            ResourceEvent::Updated { new, .. } => Arc::clone(new),
        }
    }
}

/// A composable event filter.
pub type EventPredicate<K> = Arc<dyn Fn(&ResourceEvent<K>) -> bool + Send + Sync>;

/// Passes if any of the given predicates pass.
#[must_use]
pub fn any_of<K: 'static>(predicates: Vec<EventPredicate<K>>) -> EventPredicate<K> {
    Arc::new(move |event| predicates.iter().any(|p| p(event)))
}

/// Passes only if all of the given predicates pass.
#[must_use]
pub fn all_of<K: 'static>(predicates: Vec<EventPredicate<K>>) -> EventPredicate<K> {
    Arc::new(move |event| predicates.iter().all(|p| p(event)))
}

/// Enqueues a reconcile for any Create event, and for no other event kind.
#[must_use]
pub fn any_create<K: 'static>() -> EventPredicate<K> {
    Arc::new(|event| matches!(event, ResourceEvent::Created(_)))
}

/// Enqueues a reconcile for any Delete event, and for no other event kind.
#[must_use]
pub fn any_delete<K: 'static>() -> EventPredicate<K> {
    Arc::new(|event| matches!(event, ResourceEvent::Deleted(_)))
}

/// Enqueues a reconcile for any Generic event, and for no other event kind.
#[must_use]
pub fn any_generic<K: 'static>() -> EventPredicate<K> {
    Arc::new(|event| matches!(event, ResourceEvent::Generic(_)))
}

/// Enqueues a reconcile for Update events where the generation changes. For most
/// resources, a generation change means that the resource `spec` has changed, ignoring
/// metadata and status changes.
///
/// The predicate does not enqueue requests for any Create/Delete/Generic events. This
/// ensures that other predicates can effectively filter out undesired non-Update events,
/// unlike the usual generation-changed predicate which passes those event kinds through.
#[must_use]
pub fn generation_changed_in_update_only<K>() -> EventPredicate<K>
where
    K: Resource + 'static,
{
    Arc::new(|event| {
        let ResourceEvent::Updated { old, new } = event else {
            return false;
        };
        old.meta().generation != new.meta().generation
    })
}

/// Enqueues a reconcile for Update events where the protection finalizer has been
/// removed while the object is not being deleted. This ensures that reconcilers always
/// get a chance to re-apply the protection finalizer when it's needed.
///
/// The predicate does not enqueue requests for any Create/Delete/Generic events.
#[must_use]
pub fn protection_finalizer_removed<K>() -> EventPredicate<K>
where
    K: Resource<DynamicType = ()> + 'static,
{
    Arc::new(|event| {
        let ResourceEvent::Updated { old, new } = event else {
            return false;
        };

        if new.meta().deletion_timestamp.is_some() {
            return false; // don't care if protection finalizer is missing when obj is deleting
        }

        let has_finalizer = |obj: &K| {
            obj.meta()
                .finalizers
                .as_ref()
                .is_some_and(|f| f.iter().any(|x| x == PROTECTION_FINALIZER))
        };

        if has_finalizer(old) && !has_finalizer(new) {
            info!(
                kind = %K::kind(&()),
                namespace = new.meta().namespace.as_deref().unwrap_or_default(),
                name = new.meta().name.as_deref().unwrap_or_default(),
                "protection finalizer was removed from resource"
            );
            return true;
        }

        false
    })
}

/// Narrows a watched object to a `BucketAccess` when it is one.
///
/// The ownership predicates below must return false for objects of any other kind, so
/// narrowing failure is represented as `None` rather than a panic or a skipped check.
pub trait MaybeBucketAccess {
    /// The object as a `BucketAccess`, if it is one.
    fn as_bucket_access(&self) -> Option<&BucketAccess>;
}

impl MaybeBucketAccess for BucketAccess {
    fn as_bucket_access(&self) -> Option<&BucketAccess> {
        Some(self)
    }
}

impl MaybeBucketAccess for Bucket {
    fn as_bucket_access(&self) -> Option<&BucketAccess> {
        None
    }
}

impl MaybeBucketAccess for BucketClaim {
    fn as_bucket_access(&self) -> Option<&BucketAccess> {
        None
    }
}

/// Enqueues a BucketAccess reconcile for Update events where the managing component of
/// the BucketAccess changes, indicating that handoff between Controller and Sidecar has
/// occurred in either direction.
///
/// The predicate does not enqueue requests for any Create/Delete/Generic events.
#[must_use]
pub fn bucket_access_handoff_occurred<K>() -> EventPredicate<K>
where
    K: MaybeBucketAccess + 'static,
{
    Arc::new(|event| {
        let ResourceEvent::Updated { old, new } = event else {
            return false;
        };
        let (Some(old_access), Some(new_access)) =
            (old.as_bucket_access(), new.as_bucket_access())
        else {
            return false; // not a BucketAccess, so don't manage it
        };

        let old_is_sidecar = bucket_access_managed_by_sidecar(old_access);
        let new_is_sidecar = bucket_access_managed_by_sidecar(new_access);
        if old_is_sidecar != new_is_sidecar {
            let component_name = |is_sidecar: bool| {
                if is_sidecar {
                    "sidecar"
                } else {
                    "controller"
                }
            };
            info!(
                namespace = new_access.metadata.namespace.as_deref().unwrap_or_default(),
                name = new_access.metadata.name.as_deref().unwrap_or_default(),
                old_managed_by = component_name(old_is_sidecar),
                new_managed_by = component_name(new_is_sidecar),
                "BucketAccess management handoff occurred"
            );
            return true;
        }
        false
    })
}

/// Enqueues a BucketAccess reconcile for any event if (and only if) the BucketAccess
/// should be managed by the Sidecar.
#[must_use]
pub fn bucket_access_managed_by_sidecar_predicate<K>() -> EventPredicate<K>
where
    K: MaybeBucketAccess + 'static,
{
    Arc::new(|event| {
        event
            .object()
            .as_bucket_access()
            .is_some_and(bucket_access_managed_by_sidecar)
    })
}

/// Enqueues a BucketAccess reconcile for any event if (and only if) the BucketAccess
/// should be managed by the Controller.
#[must_use]
pub fn bucket_access_managed_by_controller_predicate<K>() -> EventPredicate<K>
where
    K: MaybeBucketAccess + 'static,
{
    // Note: cannot simply negate bucket_access_managed_by_sidecar_predicate() because
    // any failed type narrowing must return false for both Sidecar and Controller.
    Arc::new(|event| {
        event
            .object()
            .as_bucket_access()
            .is_some_and(|access| !bucket_access_managed_by_sidecar(access))
    })
}

/// Enqueues a reconcile for any event of any kind if (and only if) the driver name of
/// the Bucket matches the given driver name.
#[must_use]
pub fn driver_name_matches(driver_name: &str) -> EventPredicate<Bucket> {
    let driver_name = driver_name.to_string();
    Arc::new(move |event| event.object().spec.driver_name == driver_name)
}

#[cfg(test)]
#[path = "predicate_tests.rs"]
mod predicate_tests;
