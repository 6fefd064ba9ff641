// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for `crd.rs`

#[cfg(test)]
mod tests {
    use crate::crd::{
        AccessedBucket, Bucket, BucketAccessAuthenticationType, BucketAccessMode,
        BucketClaimReference, BucketDeletionPolicy, BucketSpec, BucketStatus, ObjectProtocol,
        TimestampedError,
    };
    use kube::Resource;
    use std::collections::BTreeMap;

    #[test]
    fn test_object_protocol_wire_names() {
        assert_eq!(
            serde_json::to_string(&ObjectProtocol::S3).unwrap(),
            "\"S3\""
        );
        assert_eq!(
            serde_json::to_string(&ObjectProtocol::Azure).unwrap(),
            "\"Azure\""
        );
        assert_eq!(
            serde_json::to_string(&ObjectProtocol::GCS).unwrap(),
            "\"GCS\""
        );
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&BucketDeletionPolicy::Retain).unwrap(),
            "\"Retain\""
        );
        assert_eq!(
            serde_json::to_string(&BucketAccessAuthenticationType::ServiceAccount).unwrap(),
            "\"ServiceAccount\""
        );
        assert_eq!(
            serde_json::to_string(&BucketAccessMode::ReadWrite).unwrap(),
            "\"ReadWrite\""
        );
    }

    #[test]
    fn test_bucket_spec_serializes_camel_case() {
        let spec = BucketSpec {
            driver_name: "cosi.s3.internal".to_string(),
            deletion_policy: BucketDeletionPolicy::Delete,
            parameters: Some(BTreeMap::from([(
                "maxSize".to_string(),
                "100Gi".to_string(),
            )])),
            protocols: Some(vec![ObjectProtocol::S3]),
            bucket_claim_ref: BucketClaimReference {
                name: "my-bucket".to_string(),
                namespace: "my-ns".to_string(),
                uid: "qwerty".to_string(),
            },
            existing_bucket_id: None,
        };

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["driverName"], "cosi.s3.internal");
        assert_eq!(json["deletionPolicy"], "Delete");
        assert_eq!(json["bucketClaim"]["name"], "my-bucket");
        assert_eq!(json["bucketClaim"]["namespace"], "my-ns");
        assert_eq!(json["bucketClaim"]["uid"], "qwerty");
        assert!(json.get("existingBucketID").is_none());
    }

    #[test]
    fn test_bucket_status_id_field_name() {
        let status = BucketStatus {
            ready_to_use: true,
            bucket_id: "cosi-bc-qwerty".to_string(),
            protocols: vec![ObjectProtocol::S3],
            bucket_info: None,
            error: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["bucketID"], "cosi-bc-qwerty");
        assert!(json.get("bucketId").is_none());
    }

    #[test]
    fn test_bucket_group_version_kind() {
        let dyntype = ();
        assert_eq!(Bucket::kind(&dyntype), "Bucket");
        assert_eq!(Bucket::group(&dyntype), "objectstorage.k8s.io");
        assert_eq!(Bucket::version(&dyntype), "v1alpha2");
    }

    #[test]
    fn test_timestamped_error_empty_message_is_none() {
        let err = TimestampedError::new("");
        assert!(err.message.is_none());
        assert!(err.time.is_some());
    }

    #[test]
    fn test_timestamped_error_records_message() {
        let err = TimestampedError::new("provisioning failed");
        assert_eq!(err.message.as_deref(), Some("provisioning failed"));
    }

    #[test]
    fn test_accessed_bucket_round_trip() {
        let ab = AccessedBucket {
            bucket_name: "bc-qwerty".to_string(),
            bucket_claim_name: "readwrite-bucket".to_string(),
        };
        let json = serde_json::to_string(&ab).unwrap();
        assert!(json.contains("\"bucketName\":\"bc-qwerty\""));
        assert!(json.contains("\"bucketClaimName\":\"readwrite-bucket\""));
        let back: AccessedBucket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ab);
    }
}
