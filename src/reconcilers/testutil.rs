// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Fake driver RPC server for unit testing.
//!
//! It is better to create a realistic server for testing rather than stubbing out fake
//! client calls so that RPC over-the-wire serialization effects are fully accounted for
//! in unit tests.

use crate::proto;
use crate::proto::identity_server::{Identity, IdentityServer};
use crate::proto::provisioner_server::{Provisioner, ProvisionerServer};
use hyper_util::rt::TokioIo;
use tempfile::TempDir;
use tokio::net::{UnixListener, UnixStream};
use tokio_stream::wrappers::UnixListenerStream;
use tonic::transport::{Channel, Endpoint, Server, Uri};
use tonic::{Request, Response, Status};
use tower::service_fn;

/// Identity service that reports a fixed driver info response.
pub(crate) struct FakeIdentity {
    pub response: proto::DriverGetInfoResponse,
}

#[tonic::async_trait]
impl Identity for FakeIdentity {
    async fn driver_get_info(
        &self,
        _request: Request<proto::DriverGetInfoRequest>,
    ) -> Result<Response<proto::DriverGetInfoResponse>, Status> {
        Ok(Response::new(self.response.clone()))
    }
}

/// Provisioner service that replays a fixed CreateBucket result and rejects all other
/// calls as unimplemented.
pub(crate) struct FakeProvisioner {
    pub create_bucket_result: Result<proto::DriverCreateBucketResponse, Status>,
}

#[tonic::async_trait]
impl Provisioner for FakeProvisioner {
    async fn driver_create_bucket(
        &self,
        _request: Request<proto::DriverCreateBucketRequest>,
    ) -> Result<Response<proto::DriverCreateBucketResponse>, Status> {
        self.create_bucket_result.clone().map(Response::new)
    }

    async fn driver_delete_bucket(
        &self,
        _request: Request<proto::DriverDeleteBucketRequest>,
    ) -> Result<Response<proto::DriverDeleteBucketResponse>, Status> {
        Err(Status::unimplemented("not implemented by fake driver"))
    }

    async fn driver_grant_bucket_access(
        &self,
        _request: Request<proto::DriverGrantBucketAccessRequest>,
    ) -> Result<Response<proto::DriverGrantBucketAccessResponse>, Status> {
        Err(Status::unimplemented("not implemented by fake driver"))
    }

    async fn driver_revoke_bucket_access(
        &self,
        _request: Request<proto::DriverRevokeBucketAccessRequest>,
    ) -> Result<Response<proto::DriverRevokeBucketAccessResponse>, Status> {
        Err(Status::unimplemented("not implemented by fake driver"))
    }
}

/// A running fake driver. The temp socket directory and the server task live as long as
/// this guard; drop it to stop the server and clean up.
pub(crate) struct FakeDriver {
    pub socket_uri: String,
    _tmp_dir: TempDir,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for FakeDriver {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Bootstrap a fake driver serving the given Identity and Provisioner implementations
/// on a unix socket in a fresh temp directory.
pub(crate) async fn serve_fake_driver(
    identity: FakeIdentity,
    provisioner: FakeProvisioner,
) -> FakeDriver {
    // unix socket paths have a ~100 char limit, so keep the tmpdir location short
    let tmp_dir = tempfile::Builder::new()
        .prefix("cosi-test")
        .tempdir_in("/tmp")
        .expect("failed to create temp socket dir");
    let socket_path = tmp_dir.path().join("cosi.sock");
    let socket_uri = format!("unix://{}", socket_path.display());

    let listener = UnixListener::bind(&socket_path).expect("failed to bind test unix socket");
    let incoming = UnixListenerStream::new(listener);

    let server = tokio::spawn(async move {
        Server::builder()
            .add_service(IdentityServer::new(identity))
            .add_service(ProvisionerServer::new(provisioner))
            .serve_with_incoming(incoming)
            .await
            .expect("fake driver server failed");
    });

    FakeDriver {
        socket_uri,
        _tmp_dir: tmp_dir,
        server,
    }
}

/// A simple RPC client connection for unit testing.
pub(crate) async fn client_channel(socket_uri: &str) -> Channel {
    let socket_path = socket_uri
        .strip_prefix("unix://")
        .expect("test socket URI must begin unix://")
        .to_string();
    // the URI is ignored; the connector dials the unix socket directly
    Endpoint::try_from("http://[::]:50051")
        .expect("static endpoint must parse")
        .connect_with_connector(service_fn(move |_: Uri| {
            let socket_path = socket_path.clone();
            async move {
                Ok::<_, std::io::Error>(TokioIo::new(UnixStream::connect(socket_path).await?))
            }
        }))
        .await
        .expect("failed to connect to fake driver")
}

/// A driver info response with a valid name and protocol list.
pub(crate) fn valid_driver_info_response() -> proto::DriverGetInfoResponse {
    proto::DriverGetInfoResponse {
        name: "cosi.s3.internal".to_string(),
        supported_protocols: vec![proto::ObjectProtocol {
            r#type: proto::object_protocol::Type::S3 as i32,
        }],
    }
}
