// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Driver RPC bootstrap for the Sidecar.
//!
//! Connects to the paired driver's gRPC endpoint over a local unix socket, retrieves
//! and validates the driver's identity, and returns the [`DriverInfo`] shared by all
//! Sidecar reconcilers. The connection is plaintext: the endpoint is restricted to unix
//! sockets, so no TLS is involved, and credential handling lives outside this layer.
//!
//! The returned connection is a single long-lived channel reused by all reconciles for
//! the process lifetime; the transport reconnects on failure.

use crate::constants::{
    RPC_BOOTSTRAP_TIMEOUT_SECS, RPC_CONNECT_DELAY_SECS, RPC_ENDPOINT_DEFAULT,
    RPC_ENDPOINT_ENV_VAR,
};
use crate::proto;
use crate::proto::identity_client::IdentityClient;
use crate::reconcilers::driver::{validate_driver_info, DriverInfo};
use anyhow::{anyhow, bail, Result};
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tokio::net::UnixStream;
use tonic::transport::{Channel, Endpoint, Uri};
use tower::service_fn;
use tracing::debug;

/// The driver RPC endpoint to use: the `COSI_ENDPOINT` environment variable when set,
/// the default unix socket location otherwise.
#[must_use]
pub fn rpc_endpoint_from_env() -> String {
    std::env::var(RPC_ENDPOINT_ENV_VAR).unwrap_or_else(|_| RPC_ENDPOINT_DEFAULT.to_string())
}

/// Connect to the driver RPC endpoint and retrieve validated driver info.
///
/// Enforces an overall 120-second timeout on connection establishment plus
/// `DriverGetInfo` retrieval.
pub async fn connect_rpc_and_get_driver_info(rpc_endpoint: &str) -> Result<DriverInfo> {
    connect_rpc_and_get_driver_info_with_timeout(
        rpc_endpoint,
        Duration::from_secs(RPC_BOOTSTRAP_TIMEOUT_SECS),
    )
    .await
}

pub(crate) async fn connect_rpc_and_get_driver_info_with_timeout(
    rpc_endpoint: &str,
    timeout: Duration,
) -> Result<DriverInfo> {
    if !rpc_endpoint.starts_with("unix://") {
        bail!("rpc endpoint must be a unix socket with prefix 'unix://': {rpc_endpoint}");
    }
    if !rpc_endpoint.ends_with(".sock") {
        bail!("rpc endpoint must be a unix socket with extension '.sock': {rpc_endpoint}");
    }

    let bootstrap = async {
        let channel = connect_rpc(rpc_endpoint)
            .await
            .map_err(|err| anyhow!("unable to connect to RPC endpoint {rpc_endpoint:?}: {err:#}"))?;

        let mut identity = IdentityClient::new(channel.clone());
        let response = identity
            .driver_get_info(proto::DriverGetInfoRequest {})
            .await
            .map_err(|status| anyhow!("unable to get driver info: {status}"))?;

        validate_driver_info(&response.into_inner(), channel)
            .map_err(|err| anyhow!("driver info is invalid: {err:#}"))
    };

    tokio::time::timeout(timeout, bootstrap)
        .await
        .map_err(|_| anyhow!("timed out waiting for RPC connection and driver info"))?
}

/// Establish the gRPC channel over the unix socket, retrying until the enclosing
/// bootstrap timeout cancels the attempt. The retry delay is constant: the socket is
/// local, so there is no network to back off from.
async fn connect_rpc(rpc_endpoint: &str) -> Result<Channel> {
    let socket_path = rpc_endpoint
        .strip_prefix("unix://")
        .unwrap_or(rpc_endpoint)
        .to_string();

    loop {
        let socket_path = socket_path.clone();
        // The endpoint URI is a placeholder; the connector dials the unix socket.
        let attempt = Endpoint::try_from("http://[::]:50051")?
            .connect_with_connector(service_fn(move |_: Uri| {
                let socket_path = socket_path.clone();
                async move {
                    Ok::<_, std::io::Error>(TokioIo::new(UnixStream::connect(socket_path).await?))
                }
            }))
            .await;

        match attempt {
            Ok(channel) => return Ok(channel),
            Err(err) => {
                debug!(rpc_endpoint, error = %err, "RPC connection attempt failed");
                tokio::time::sleep(Duration::from_secs(RPC_CONNECT_DELAY_SECS)).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod rpc_tests;
