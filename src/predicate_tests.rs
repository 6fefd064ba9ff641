// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for `predicate.rs`

#[cfg(test)]
mod tests {
    use crate::constants::PROTECTION_FINALIZER;
    use crate::crd::{
        Bucket, BucketAccess, BucketAccessSpec, BucketAccessStatus, BucketClaim, BucketClaimSpec,
        BucketClaimReference, BucketDeletionPolicy, BucketSpec, ObjectProtocol,
    };
    use crate::predicate::{
        all_of, any_create, any_delete, any_generic, any_of, bucket_access_handoff_occurred,
        bucket_access_managed_by_controller_predicate, bucket_access_managed_by_sidecar_predicate,
        driver_name_matches, generation_changed_in_update_only, protection_finalizer_removed,
        MaybeBucketAccess, ResourceEvent,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
    use k8s_openapi::chrono::Utc;
    use kube::api::ObjectMeta;
    use std::sync::Arc;

    fn claim(generation: i64, finalizers: Vec<String>, deleting: bool) -> BucketClaim {
        BucketClaim {
            metadata: ObjectMeta {
                name: Some("my-bucket".to_string()),
                namespace: Some("my-ns".to_string()),
                generation: Some(generation),
                finalizers: Some(finalizers),
                deletion_timestamp: deleting.then(|| Time(Utc::now())),
                ..ObjectMeta::default()
            },
            spec: BucketClaimSpec {
                bucket_class_name: Some("s3-class".to_string()),
                protocols: Some(vec![ObjectProtocol::S3]),
                existing_bucket_name: None,
            },
            status: None,
        }
    }

    fn access(driver_name: &str) -> BucketAccess {
        BucketAccess {
            metadata: ObjectMeta {
                name: Some("my-access".to_string()),
                namespace: Some("my-ns".to_string()),
                ..ObjectMeta::default()
            },
            spec: BucketAccessSpec {
                bucket_claims: vec![],
                bucket_access_class_name: "s3-class".to_string(),
                protocol: ObjectProtocol::S3,
                service_account_name: None,
            },
            status: Some(BucketAccessStatus {
                driver_name: driver_name.to_string(),
                ..BucketAccessStatus::default()
            }),
        }
    }

    fn bucket(driver_name: &str) -> Bucket {
        Bucket {
            metadata: ObjectMeta {
                name: Some("bc-qwerty".to_string()),
                ..ObjectMeta::default()
            },
            spec: BucketSpec {
                driver_name: driver_name.to_string(),
                deletion_policy: BucketDeletionPolicy::Delete,
                parameters: None,
                protocols: Some(vec![ObjectProtocol::S3]),
                bucket_claim_ref: BucketClaimReference::default(),
                existing_bucket_id: None,
            },
            status: None,
        }
    }

    fn created<K>(obj: K) -> ResourceEvent<K> {
        ResourceEvent::Created(Arc::new(obj))
    }

    fn updated<K>(old: K, new: K) -> ResourceEvent<K> {
        ResourceEvent::Updated {
            old: Arc::new(old),
            new: Arc::new(new),
        }
    }

    #[test]
    fn test_event_kind_predicates() {
        let c = claim(1, vec![], false);

        assert!(any_create::<BucketClaim>()(&created(c.clone())));
        assert!(!any_create::<BucketClaim>()(&updated(c.clone(), c.clone())));

        assert!(any_delete::<BucketClaim>()(&ResourceEvent::Deleted(
            Arc::new(c.clone())
        )));
        assert!(!any_delete::<BucketClaim>()(&created(c.clone())));

        assert!(any_generic::<BucketClaim>()(&ResourceEvent::Generic(
            Arc::new(c.clone())
        )));
        assert!(!any_generic::<BucketClaim>()(&created(c)));
    }

    #[test]
    fn test_generation_changed_in_update_only() {
        let pred = generation_changed_in_update_only::<BucketClaim>();

        assert!(pred(&updated(claim(1, vec![], false), claim(2, vec![], false))));
        assert!(!pred(&updated(claim(2, vec![], false), claim(2, vec![], false))));

        // unlike the usual generation-changed predicate, non-Update events never pass
        assert!(!pred(&created(claim(1, vec![], false))));
        assert!(!pred(&ResourceEvent::Deleted(Arc::new(claim(1, vec![], false)))));
    }

    #[test]
    fn test_protection_finalizer_removed() {
        let pred = protection_finalizer_removed::<BucketClaim>();
        let with = vec![PROTECTION_FINALIZER.to_string()];

        // removed outside deletion: pass
        assert!(pred(&updated(
            claim(1, with.clone(), false),
            claim(1, vec![], false)
        )));

        // removed while deleting: no pass
        assert!(!pred(&updated(
            claim(1, with.clone(), true),
            claim(1, vec![], true)
        )));

        // added: no pass
        assert!(!pred(&updated(
            claim(1, vec![], false),
            claim(1, with.clone(), false)
        )));

        // unrelated finalizer removed: no pass
        assert!(!pred(&updated(
            claim(1, vec!["other/finalizer".to_string()], false),
            claim(1, vec![], false)
        )));

        // non-update events: no pass
        assert!(!pred(&created(claim(1, with, false))));
    }

    #[test]
    fn test_handoff_occurred() {
        let pred = bucket_access_handoff_occurred::<BucketAccess>();

        // controller -> sidecar
        assert!(pred(&updated(access(""), access("cosi.s3.internal"))));
        // no ownership change
        assert!(!pred(&updated(
            access("cosi.s3.internal"),
            access("cosi.s3.internal")
        )));
        assert!(!pred(&updated(access(""), access(""))));
        // non-update events never pass
        assert!(!pred(&created(access("cosi.s3.internal"))));
    }

    #[test]
    fn test_handoff_occurred_narrows_type() {
        let pred = bucket_access_handoff_occurred::<Bucket>();
        assert!(!pred(&updated(bucket("a"), bucket("b"))));
    }

    #[test]
    fn test_ownership_predicates_are_exclusive_for_bucket_access() {
        let sidecar = bucket_access_managed_by_sidecar_predicate::<BucketAccess>();
        let controller = bucket_access_managed_by_controller_predicate::<BucketAccess>();

        let handed_off = created(access("cosi.s3.internal"));
        assert!(sidecar(&handed_off));
        assert!(!controller(&handed_off));

        let uninitialized = created(access(""));
        assert!(!sidecar(&uninitialized));
        assert!(controller(&uninitialized));
    }

    #[test]
    fn test_ownership_predicates_both_false_for_other_kinds() {
        // A failed type narrowing must make BOTH predicates false; the controller
        // predicate is not the logical negation of the sidecar predicate.
        let sidecar = bucket_access_managed_by_sidecar_predicate::<Bucket>();
        let controller = bucket_access_managed_by_controller_predicate::<Bucket>();

        let event = created(bucket("cosi.s3.internal"));
        assert!(!sidecar(&event));
        assert!(!controller(&event));
    }

    #[test]
    fn test_maybe_bucket_access_narrowing() {
        assert!(access("").as_bucket_access().is_some());
        assert!(bucket("d").as_bucket_access().is_none());
        assert!(claim(1, vec![], false).as_bucket_access().is_none());
    }

    #[test]
    fn test_driver_name_matches() {
        let pred = driver_name_matches("cosi.s3.internal");
        assert!(pred(&created(bucket("cosi.s3.internal"))));
        assert!(!pred(&created(bucket("other.driver.io"))));
    }

    #[test]
    fn test_bucket_access_controller_filter_composition() {
        // The composed Controller-side BucketAccess filter: managed by controller AND
        // (create OR delete OR generic OR handoff occurred OR finalizer removed).
        let filter = all_of(vec![
            bucket_access_managed_by_controller_predicate::<BucketAccess>(),
            any_of(vec![
                any_create(),
                any_delete(),
                any_generic(),
                bucket_access_handoff_occurred(),
                protection_finalizer_removed(),
            ]),
        ]);

        // new, uninitialized access: reconcile
        assert!(filter(&created(access(""))));

        // sidecar-owned access created: no reconcile
        assert!(!filter(&created(access("cosi.s3.internal"))));

        // handoff back to controller (override path would flip ownership); here the
        // update clears nothing so ownership stays with the sidecar and nothing passes
        assert!(!filter(&updated(
            access("cosi.s3.internal"),
            access("cosi.s3.internal")
        )));

        // status-only update while controller-owned: no reconcile
        assert!(!filter(&updated(access(""), access(""))));
    }
}
