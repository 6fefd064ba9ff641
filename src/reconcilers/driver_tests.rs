// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for `driver.rs`

#[cfg(test)]
mod tests {
    use super::super::{rpc_error_is_retryable, validate_driver_info, DriverInfo};
    use crate::crd::ObjectProtocol;
    use crate::proto;
    use tonic::transport::Endpoint;

    fn lazy_driver_info(name: &str, protocols: &[proto::object_protocol::Type]) -> DriverInfo {
        let response = proto::DriverGetInfoResponse {
            name: name.to_string(),
            supported_protocols: protocols
                .iter()
                .map(|p| proto::ObjectProtocol { r#type: *p as i32 })
                .collect(),
        };
        // connect_lazy never dials; good enough for validation-only tests
        let channel = Endpoint::from_static("http://[::]:50051").connect_lazy();
        validate_driver_info(&response, channel).unwrap()
    }

    fn validate_name_only(name: &str) -> anyhow::Result<DriverInfo> {
        let response = proto::DriverGetInfoResponse {
            name: name.to_string(),
            supported_protocols: vec![proto::ObjectProtocol {
                r#type: proto::object_protocol::Type::S3 as i32,
            }],
        };
        let channel = Endpoint::from_static("http://[::]:50051").connect_lazy();
        validate_driver_info(&response, channel)
    }

    #[tokio::test]
    async fn test_valid_driver_names() {
        for name in [
            "cosi.s3.internal",
            "driver",
            "a",
            "my-driver.example-vendor.io",
            "driver1.v2",
        ] {
            assert!(validate_name_only(name).is_ok(), "name: {name}");
        }
    }

    #[tokio::test]
    async fn test_invalid_driver_names() {
        for name in [
            "",
            "Cosi.S3.Internal", // uppercase
            "3driver",          // leading digit
            "driver-",          // trailing dash
            "a..b",             // empty label
            ".driver",          // leading dot
            "under_score",      // invalid char
            // 64 chars total
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        ] {
            let err = validate_name_only(name).unwrap_err();
            assert!(
                err.to_string().contains("driver name is invalid"),
                "name: {name}, err: {err:#}"
            );
        }
    }

    #[tokio::test]
    async fn test_protocol_list_must_be_non_empty() {
        let response = proto::DriverGetInfoResponse {
            name: "cosi.s3.internal".to_string(),
            supported_protocols: vec![],
        };
        let channel = Endpoint::from_static("http://[::]:50051").connect_lazy();
        let err = validate_driver_info(&response, channel).unwrap_err();
        assert!(format!("{err:#}").contains("at least one object protocol"));
    }

    #[tokio::test]
    async fn test_protocol_list_rejects_unknown() {
        let response = proto::DriverGetInfoResponse {
            name: "cosi.s3.internal".to_string(),
            supported_protocols: vec![proto::ObjectProtocol {
                r#type: proto::object_protocol::Type::Unknown as i32,
            }],
        };
        let channel = Endpoint::from_static("http://[::]:50051").connect_lazy();
        let err = validate_driver_info(&response, channel).unwrap_err();
        assert!(format!("{err:#}").contains("unknown"));
    }

    #[tokio::test]
    async fn test_protocol_list_rejects_duplicates() {
        let response = proto::DriverGetInfoResponse {
            name: "cosi.s3.internal".to_string(),
            supported_protocols: vec![
                proto::ObjectProtocol {
                    r#type: proto::object_protocol::Type::S3 as i32,
                },
                proto::ObjectProtocol {
                    r#type: proto::object_protocol::Type::Azure as i32,
                },
                proto::ObjectProtocol {
                    r#type: proto::object_protocol::Type::S3 as i32,
                },
            ],
        };
        let channel = Endpoint::from_static("http://[::]:50051").connect_lazy();
        let err = validate_driver_info(&response, channel).unwrap_err();
        assert!(format!("{err:#}").contains("repeated"));
    }

    #[tokio::test]
    async fn test_supports_protocol() {
        let info = lazy_driver_info(
            "cosi.s3.internal",
            &[
                proto::object_protocol::Type::S3,
                proto::object_protocol::Type::Gcs,
            ],
        );
        assert_eq!(info.name(), "cosi.s3.internal");
        assert!(info.supports_protocol(ObjectProtocol::S3));
        assert!(info.supports_protocol(ObjectProtocol::GCS));
        assert!(!info.supports_protocol(ObjectProtocol::Azure));
    }

    #[test]
    fn test_rpc_error_is_retryable_baseline() {
        // the baseline error scheme, fully and explicitly codified
        let cases = [
            (tonic::Code::InvalidArgument, false),
            (tonic::Code::PermissionDenied, true),
            (tonic::Code::AlreadyExists, false),
            (tonic::Code::Aborted, true),
            (tonic::Code::Unimplemented, false),
            (tonic::Code::Unauthenticated, true),
            // anything else is retryable
            (tonic::Code::Internal, true),
            (tonic::Code::Unavailable, true),
            (tonic::Code::DeadlineExceeded, true),
            (tonic::Code::Unknown, true),
        ];
        for (code, want) in cases {
            assert_eq!(rpc_error_is_retryable(code), want, "code: {code:?}");
        }
    }
}
