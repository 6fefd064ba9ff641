// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for `bucket.rs`

#[cfg(test)]
mod tests {
    use super::super::{
        dynamic_provision, parse_protocol_bucket_info, rpc_protocols_from_api_list,
        validate_bucket_supports_protocols, validate_driver_supports_protocols,
        DynamicProvisionParams,
    };
    use crate::crd::{BucketClaimReference, ObjectProtocol};
    use crate::proto;
    use crate::reconcilers::driver::{validate_driver_info, DriverInfo};
    use crate::reconcilers::testutil::{
        client_channel, serve_fake_driver, valid_driver_info_response, FakeDriver, FakeIdentity,
        FakeProvisioner,
    };
    use std::collections::BTreeMap;
    use tonic::transport::Endpoint;
    use tonic::Status;

    fn s3_protocol_response() -> proto::ObjectProtocolAndBucketInfo {
        proto::ObjectProtocolAndBucketInfo {
            s3: Some(proto::S3BucketInfo {
                bucket_id: "corp-cosi-bc-qwerty".to_string(),
                endpoint: "s3.corp.net".to_string(),
                region: "us-east-1".to_string(),
                addressing_style: Some(proto::S3AddressingStyle {
                    style: proto::s3_addressing_style::Style::Path as i32,
                }),
            }),
            azure: None,
            gcs: None,
        }
    }

    fn claim_ref() -> BucketClaimReference {
        BucketClaimReference {
            name: "my-bucket".to_string(),
            namespace: "my-ns".to_string(),
            uid: "qwerty".to_string(),
        }
    }

    fn lazy_driver(protocols: &[proto::object_protocol::Type]) -> DriverInfo {
        let response = proto::DriverGetInfoResponse {
            name: "cosi.s3.internal".to_string(),
            supported_protocols: protocols
                .iter()
                .map(|p| proto::ObjectProtocol { r#type: *p as i32 })
                .collect(),
        };
        let channel = Endpoint::from_static("http://[::]:50051").connect_lazy();
        validate_driver_info(&response, channel).unwrap()
    }

    /// Boot a fake driver whose CreateBucket replays the given result, and return a
    /// DriverInfo wired to it.
    async fn driver_with_create_result(
        result: Result<proto::DriverCreateBucketResponse, Status>,
    ) -> (FakeDriver, DriverInfo) {
        let fake = serve_fake_driver(
            FakeIdentity {
                response: valid_driver_info_response(),
            },
            FakeProvisioner {
                create_bucket_result: result,
            },
        )
        .await;
        let channel = client_channel(&fake.socket_uri).await;
        let info = validate_driver_info(&valid_driver_info_response(), channel).unwrap();
        (fake, info)
    }

    #[test]
    fn test_parse_protocol_bucket_info_s3() {
        let (protocols, info) = parse_protocol_bucket_info(&s3_protocol_response());
        assert_eq!(protocols, vec![ObjectProtocol::S3]);
        assert_eq!(info["COSI_S3_BUCKET_ID"], "corp-cosi-bc-qwerty");
        assert_eq!(info["COSI_S3_ENDPOINT"], "s3.corp.net");
        assert_eq!(info["COSI_S3_REGION"], "us-east-1");
        assert_eq!(info["COSI_S3_ADDRESSING_STYLE"], "path");
        for key in info.keys() {
            assert!(key.starts_with("COSI_S3_"));
        }
    }

    #[test]
    fn test_parse_protocol_bucket_info_multi_protocol() {
        let response = proto::ObjectProtocolAndBucketInfo {
            azure: Some(proto::AzureBucketInfo {
                storage_account: "corpstorage".to_string(),
            }),
            gcs: Some(proto::GcsBucketInfo {
                project_id: "corp-project".to_string(),
                bucket_name: "corp-bucket".to_string(),
            }),
            ..s3_protocol_response()
        };
        let (protocols, info) = parse_protocol_bucket_info(&response);
        assert_eq!(
            protocols,
            vec![ObjectProtocol::S3, ObjectProtocol::Azure, ObjectProtocol::GCS]
        );
        assert_eq!(info["COSI_AZURE_STORAGE_ACCOUNT"], "corpstorage");
        assert_eq!(info["COSI_GCS_PROJECT_ID"], "corp-project");
        assert_eq!(info["COSI_GCS_BUCKET_NAME"], "corp-bucket");
    }

    #[test]
    fn test_parse_protocol_bucket_info_empty() {
        let (protocols, info) =
            parse_protocol_bucket_info(&proto::ObjectProtocolAndBucketInfo::default());
        assert!(protocols.is_empty());
        assert!(info.is_empty());
    }

    #[test]
    fn test_rpc_protocols_from_api_list() {
        let rpc = rpc_protocols_from_api_list(Some(&[ObjectProtocol::S3, ObjectProtocol::GCS]));
        assert_eq!(
            rpc.iter().map(|p| p.r#type).collect::<Vec<_>>(),
            vec![
                proto::object_protocol::Type::S3 as i32,
                proto::object_protocol::Type::Gcs as i32
            ]
        );

        assert!(rpc_protocols_from_api_list(None).is_empty());
    }

    #[tokio::test]
    async fn test_validate_driver_supports_protocols() {
        let driver = lazy_driver(&[proto::object_protocol::Type::S3]);

        assert!(validate_driver_supports_protocols(&driver, &[ObjectProtocol::S3]).is_ok());

        // empty requirement list is always satisfied
        assert!(validate_driver_supports_protocols(&driver, &[]).is_ok());

        let err = validate_driver_supports_protocols(&driver, &[ObjectProtocol::Azure])
            .unwrap_err();
        assert!(err.to_string().contains("Azure"));
        assert!(err.to_string().contains("cosi.s3.internal"));
    }

    #[test]
    fn test_validate_bucket_supports_protocols() {
        let supported = vec![ObjectProtocol::S3, ObjectProtocol::Azure];

        assert!(validate_bucket_supports_protocols(&supported, &[ObjectProtocol::S3]).is_ok());
        assert!(validate_bucket_supports_protocols(&supported, &[]).is_ok());

        let err = validate_bucket_supports_protocols(&supported, &[ObjectProtocol::GCS])
            .unwrap_err();
        assert!(err.to_string().contains("GCS"));
    }

    #[tokio::test]
    async fn test_dynamic_provision_happy_path() {
        let (_fake, driver) = driver_with_create_result(Ok(proto::DriverCreateBucketResponse {
            bucket_id: "cosi-bc-qwerty".to_string(),
            protocols: Some(s3_protocol_response()),
        }))
        .await;

        let details = dynamic_provision(
            &driver,
            DynamicProvisionParams {
                bucket_name: "bc-qwerty",
                required_protocols: &rpc_protocols_from_api_list(Some(&[ObjectProtocol::S3])),
                parameters: Some(&BTreeMap::from([(
                    "maxSize".to_string(),
                    "10Gi".to_string(),
                )])),
                claim_ref: &claim_ref(),
            },
        )
        .await
        .unwrap();

        assert_eq!(details.bucket_id, "cosi-bc-qwerty");
        assert_eq!(details.supported_protocols, vec![ObjectProtocol::S3]);
        assert_eq!(
            details.all_protocol_bucket_info["COSI_S3_BUCKET_ID"],
            "corp-cosi-bc-qwerty"
        );
    }

    #[tokio::test]
    async fn test_dynamic_provision_requires_full_claim_ref() {
        // A partially-populated claim ref is a controller bug signal; no RPC is made.
        let (_fake, driver) = driver_with_create_result(Ok(Default::default())).await;

        let incomplete = BucketClaimReference {
            uid: String::new(),
            ..claim_ref()
        };
        let err = dynamic_provision(
            &driver,
            DynamicProvisionParams {
                bucket_name: "bc-qwerty",
                required_protocols: &[],
                parameters: None,
                claim_ref: &incomplete,
            },
        )
        .await
        .unwrap_err();

        assert!(!err.is_retryable());
        assert!(err.to_string().contains("bucketClaimRef"));
    }

    #[tokio::test]
    async fn test_dynamic_provision_classifies_rpc_errors() {
        let (_fake, driver) =
            driver_with_create_result(Err(Status::invalid_argument("bad params"))).await;
        let err = dynamic_provision(
            &driver,
            DynamicProvisionParams {
                bucket_name: "bc-qwerty",
                required_protocols: &[],
                parameters: None,
                claim_ref: &claim_ref(),
            },
        )
        .await
        .unwrap_err();
        assert!(!err.is_retryable());

        let (_fake, driver) =
            driver_with_create_result(Err(Status::internal("backend exploded"))).await;
        let err = dynamic_provision(
            &driver,
            DynamicProvisionParams {
                bucket_name: "bc-qwerty",
                required_protocols: &[],
                parameters: None,
                claim_ref: &claim_ref(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_dynamic_provision_rejects_empty_bucket_id() {
        let (_fake, driver) = driver_with_create_result(Ok(proto::DriverCreateBucketResponse {
            bucket_id: String::new(),
            protocols: Some(s3_protocol_response()),
        }))
        .await;

        let err = dynamic_provision(
            &driver,
            DynamicProvisionParams {
                bucket_name: "bc-qwerty",
                required_protocols: &[],
                parameters: None,
                claim_ref: &claim_ref(),
            },
        )
        .await
        .unwrap_err();

        assert!(!err.is_retryable());
        assert!(err.to_string().contains("bucket ID missing"));
    }

    #[tokio::test]
    async fn test_dynamic_provision_rejects_missing_protocol_info() {
        let (_fake, driver) = driver_with_create_result(Ok(proto::DriverCreateBucketResponse {
            bucket_id: "cosi-bc-qwerty".to_string(),
            protocols: None,
        }))
        .await;

        let err = dynamic_provision(
            &driver,
            DynamicProvisionParams {
                bucket_name: "bc-qwerty",
                required_protocols: &[],
                parameters: None,
                claim_ref: &claim_ref(),
            },
        )
        .await
        .unwrap_err();

        assert!(!err.is_retryable());
        assert!(err.to_string().contains("protocol response missing"));
    }
}
