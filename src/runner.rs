// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Watch-stream wiring for the reconcilers.
//!
//! Each controller consumes a single watch stream for its resource kind. Raw watch
//! events carry only the new object state, so the [`EventClassifier`] keeps the last
//! observed object per key (the reflector-store pattern) and pairs updates with their
//! prior state, producing the [`ResourceEvent`]s that event-filter predicates operate
//! on. Events that pass the filter are reconciled in place, with retryable errors
//! retried under exponential backoff.
//!
//! Processing each controller's stream sequentially guarantees at most one in-flight
//! reconcile per (kind, namespace/name) key. Separate controllers run in parallel
//! tasks; cross-resource ordering is only ever implicit through the record store.

use crate::errors::ReconcileError;
use crate::metrics;
use crate::predicate::{EventPredicate, ResourceEvent};
use crate::retry::retry_reconcile;
use futures::StreamExt;
use kube::runtime::watcher;
use kube::{Api, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Classifies raw watch events into [`ResourceEvent`]s by remembering the last observed
/// state of every object.
pub struct EventClassifier<K> {
    store: HashMap<String, Arc<K>>,
    /// Keys seen during an in-progress re-list; objects absent at the end of the
    /// re-list are synthesized into Deleted events.
    relist_seen: Option<HashSet<String>>,
}

impl<K: Resource> EventClassifier<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            relist_seen: None,
        }
    }

    fn key(obj: &K) -> String {
        let name = obj.meta().name.clone().unwrap_or_default();
        match obj.meta().namespace.as_deref() {
            Some(namespace) => format!("{namespace}/{name}"),
            None => name,
        }
    }

    /// Fold one raw watch event into the store and return the classified events to
    /// filter and reconcile.
    pub fn classify(&mut self, event: watcher::Event<K>) -> Vec<ResourceEvent<K>> {
        match event {
            watcher::Event::Apply(obj) => {
                let obj = Arc::new(obj);
                let key = Self::key(&obj);
                match self.store.insert(key, Arc::clone(&obj)) {
                    Some(old) => vec![ResourceEvent::Updated { old, new: obj }],
                    None => vec![ResourceEvent::Created(obj)],
                }
            }
            watcher::Event::Delete(obj) => {
                let obj = Arc::new(obj);
                self.store.remove(&Self::key(&obj));
                vec![ResourceEvent::Deleted(obj)]
            }
            watcher::Event::Init => {
                self.relist_seen = Some(HashSet::new());
                vec![]
            }
            watcher::Event::InitApply(obj) => {
                let obj = Arc::new(obj);
                let key = Self::key(&obj);
                if let Some(seen) = self.relist_seen.as_mut() {
                    seen.insert(key.clone());
                }
                match self.store.insert(key, Arc::clone(&obj)) {
                    // Re-observed with known prior state: classify by actual change.
                    Some(old) => vec![ResourceEvent::Updated { old, new: obj }],
                    // No prior state known, e.g. first list or a watch restart that
                    // outlived this process's memory of the object.
                    None => vec![ResourceEvent::Generic(obj)],
                }
            }
            watcher::Event::InitDone => {
                let Some(seen) = self.relist_seen.take() else {
                    return vec![];
                };
                // Objects that vanished while the watch was disconnected.
                let vanished: Vec<String> = self
                    .store
                    .keys()
                    .filter(|key| !seen.contains(*key))
                    .cloned()
                    .collect();
                vanished
                    .into_iter()
                    .filter_map(|key| self.store.remove(&key))
                    .map(ResourceEvent::Deleted)
                    .collect()
            }
        }
    }
}

impl<K: Resource> Default for EventClassifier<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one controller: watch the resource kind, classify and filter events, and
/// reconcile whatever passes the filter. Runs until the process exits.
pub async fn run_controller<K, F, Fut>(
    api: Api<K>,
    watcher_config: watcher::Config,
    filter: EventPredicate<K>,
    reconcile: F,
) where
    K: Resource<DynamicType = ()>
        + Clone
        + DeserializeOwned
        + std::fmt::Debug
        + Send
        + Sync
        + 'static,
    F: Fn(Arc<K>) -> Fut + Send,
    Fut: Future<Output = Result<(), ReconcileError>> + Send,
{
    let kind = K::kind(&()).to_string();
    let mut classifier = EventClassifier::new();
    let mut stream = watcher(api, watcher_config).boxed();

    info!(kind, "starting controller watch loop");

    while let Some(item) = stream.next().await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                // the watcher re-establishes itself; log and keep consuming
                warn!(kind, error = %err, "watch stream error");
                continue;
            }
        };

        for resource_event in classifier.classify(event) {
            if !filter(&resource_event) {
                continue;
            }

            let obj = resource_event.object_owned();
            let start = Instant::now();
            let result = retry_reconcile(|| reconcile(Arc::clone(&obj)), &kind).await;
            match result {
                Ok(()) => metrics::record_reconciliation_success(&kind, start.elapsed()),
                Err(_) => metrics::record_reconciliation_error(&kind, start.elapsed()),
            }
        }
    }

    warn!(kind, "controller watch loop ended");
}

/// Namespace/name key helper for reconcilers that take keys rather than objects.
pub fn object_key<K: Resource>(obj: &K) -> (String, String) {
    (obj.namespace().unwrap_or_default(), obj.name_any())
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
