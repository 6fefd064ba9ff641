// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for `bucketclaim.rs`

#[cfg(test)]
mod tests {
    use super::super::{determine_bucket_name, generate_intermediate_bucket};
    use crate::crd::{
        BucketClaim, BucketClaimSpec, BucketClaimStatus, BucketClass, BucketClassSpec,
        BucketDeletionPolicy, ObjectProtocol,
    };
    use kube::api::ObjectMeta;
    use std::collections::BTreeMap;

    fn claim(uid: &str, bound_bucket_name: &str, existing_bucket_name: Option<&str>) -> BucketClaim {
        BucketClaim {
            metadata: ObjectMeta {
                name: Some("my-bucket".to_string()),
                namespace: Some("my-ns".to_string()),
                uid: Some(uid.to_string()),
                ..ObjectMeta::default()
            },
            spec: BucketClaimSpec {
                bucket_class_name: existing_bucket_name
                    .is_none()
                    .then(|| "s3-class".to_string()),
                protocols: Some(vec![ObjectProtocol::S3]),
                existing_bucket_name: existing_bucket_name.map(String::from),
            },
            status: (!bound_bucket_name.is_empty()).then(|| BucketClaimStatus {
                bound_bucket_name: bound_bucket_name.to_string(),
                ..BucketClaimStatus::default()
            }),
        }
    }

    fn class() -> BucketClass {
        BucketClass {
            metadata: ObjectMeta {
                name: Some("s3-class".to_string()),
                ..ObjectMeta::default()
            },
            spec: BucketClassSpec {
                driver_name: "cosi.s3.internal".to_string(),
                deletion_policy: BucketDeletionPolicy::Delete,
                parameters: Some(BTreeMap::from([
                    ("maxSize".to_string(), "100Gi".to_string()),
                    ("maxIops".to_string(), "10".to_string()),
                ])),
            },
        }
    }

    #[test]
    fn test_determine_bucket_name_dynamic() {
        let name = determine_bucket_name(&claim("qwerty", "", None)).unwrap();
        assert_eq!(name, "bc-qwerty");
    }

    #[test]
    fn test_determine_bucket_name_dynamic_already_bound() {
        let name = determine_bucket_name(&claim("qwerty", "bc-qwerty", None)).unwrap();
        assert_eq!(name, "bc-qwerty");
    }

    #[test]
    fn test_determine_bucket_name_static() {
        let name =
            determine_bucket_name(&claim("qwerty", "", Some("admin-made-bucket"))).unwrap();
        assert_eq!(name, "admin-made-bucket");
    }

    #[test]
    fn test_determine_bucket_name_degraded_binding() {
        // A bound name diverging from the derived name is an unrecoverable degradation;
        // only the user can resolve it by deleting and re-creating the claim.
        let err =
            determine_bucket_name(&claim("qwerty", "something-unexpected", None)).unwrap_err();
        assert!(err.to_string().contains("unrecoverable degradation"));
        assert!(err.to_string().contains("something-unexpected"));
        assert!(err.to_string().contains("bc-qwerty"));
    }

    #[test]
    fn test_determine_bucket_name_missing_uid() {
        let mut malformed = claim("", "", None);
        malformed.metadata.uid = None;
        let err = determine_bucket_name(&malformed).unwrap_err();
        assert!(err.to_string().contains("internal error"));
    }

    #[test]
    fn test_generate_intermediate_bucket() {
        let claim = claim("qwerty", "", None);
        let bucket = generate_intermediate_bucket(&claim, &class(), "bc-qwerty");

        assert_eq!(bucket.metadata.name.as_deref(), Some("bc-qwerty"));
        assert_eq!(bucket.spec.driver_name, "cosi.s3.internal");
        assert_eq!(bucket.spec.deletion_policy, BucketDeletionPolicy::Delete);
        assert_eq!(
            bucket.spec.parameters.as_ref().unwrap()["maxSize"],
            "100Gi"
        );
        assert_eq!(bucket.spec.protocols, Some(vec![ObjectProtocol::S3]));
        assert_eq!(bucket.spec.bucket_claim_ref.name, "my-bucket");
        assert_eq!(bucket.spec.bucket_claim_ref.namespace, "my-ns");
        assert_eq!(bucket.spec.bucket_claim_ref.uid, "qwerty");
        assert!(bucket.spec.existing_bucket_id.is_none());
        assert!(bucket.status.is_none());
    }

    #[test]
    fn test_generate_intermediate_bucket_has_no_finalizers() {
        // The Sidecar is responsible for the Bucket finalizer. If the Sidecar (driver)
        // isn't running or the driver name is incorrect, the user must still be able to
        // delete the claim and its never-provisioned intermediate Bucket.
        let claim = claim("qwerty", "", None);
        let bucket = generate_intermediate_bucket(&claim, &class(), "bc-qwerty");
        assert!(bucket.metadata.finalizers.is_none());
    }
}
