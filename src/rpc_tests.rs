// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for `rpc.rs`

#[cfg(test)]
mod tests {
    use crate::crd::ObjectProtocol;
    use crate::proto;
    use crate::reconcilers::testutil::{
        serve_fake_driver, valid_driver_info_response, FakeIdentity, FakeProvisioner,
    };
    use crate::rpc::{
        connect_rpc_and_get_driver_info, connect_rpc_and_get_driver_info_with_timeout,
    };
    use std::time::Duration;
    use tonic::Status;

    fn unimplemented_provisioner() -> FakeProvisioner {
        FakeProvisioner {
            create_bucket_result: Err(Status::unimplemented("unused in this test")),
        }
    }

    #[tokio::test]
    async fn test_rejects_non_unix_endpoint() {
        let err = connect_rpc_and_get_driver_info("tcp://localhost:9000/cosi.sock")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("prefix 'unix://'"));
    }

    #[tokio::test]
    async fn test_rejects_endpoint_without_sock_extension() {
        let err = connect_rpc_and_get_driver_info("unix:///var/lib/cosi/cosi.socket")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("extension '.sock'"));
    }

    #[tokio::test]
    async fn test_times_out_when_socket_never_appears() {
        let err = connect_rpc_and_get_driver_info_with_timeout(
            "unix:///tmp/nonexistent-cosi-test-dir/cosi.sock",
            Duration::from_millis(250),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_bootstrap_happy_path() {
        let driver = serve_fake_driver(
            FakeIdentity {
                response: valid_driver_info_response(),
            },
            unimplemented_provisioner(),
        )
        .await;

        let info = connect_rpc_and_get_driver_info_with_timeout(
            &driver.socket_uri,
            Duration::from_secs(10),
        )
        .await
        .unwrap();

        assert_eq!(info.name(), "cosi.s3.internal");
        assert!(info.supports_protocol(ObjectProtocol::S3));
        assert!(!info.supports_protocol(ObjectProtocol::Azure));
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_invalid_driver_name() {
        let driver = serve_fake_driver(
            FakeIdentity {
                response: proto::DriverGetInfoResponse {
                    name: "Not-A-Valid-Name!".to_string(),
                    ..valid_driver_info_response()
                },
            },
            unimplemented_provisioner(),
        )
        .await;

        let err = connect_rpc_and_get_driver_info_with_timeout(
            &driver.socket_uri,
            Duration::from_secs(10),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("driver info is invalid"));
        assert!(format!("{err:#}").contains("driver name"));
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_empty_protocol_list() {
        let driver = serve_fake_driver(
            FakeIdentity {
                response: proto::DriverGetInfoResponse {
                    supported_protocols: vec![],
                    ..valid_driver_info_response()
                },
            },
            unimplemented_provisioner(),
        )
        .await;

        let err = connect_rpc_and_get_driver_info_with_timeout(
            &driver.socket_uri,
            Duration::from_secs(10),
        )
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("at least one object protocol"));
    }
}
