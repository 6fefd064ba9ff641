// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Driver identity handling for the Sidecar.
//!
//! After the RPC bootstrap retrieves `DriverGetInfo`, the reported name and protocol
//! list are validated once and cached in a [`DriverInfo`] shared by all reconcilers for
//! the lifetime of the process.

use crate::crd::ObjectProtocol;
use crate::proto;
use crate::proto::provisioner_client::ProvisionerClient;
use crate::protocol::object_protocol_rpc_to_api;
use anyhow::{anyhow, Result};
use tonic::transport::Channel;

/// Critical info about the paired driver, needed by all Sidecar reconcilers.
#[derive(Clone, Debug)]
pub struct DriverInfo {
    name: String,
    supported_protocols: Vec<ObjectProtocol>,

    provisioner_client: ProvisionerClient<Channel>,
}

impl DriverInfo {
    /// The validated name of the driver.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the driver supports the given protocol.
    #[must_use]
    pub fn supports_protocol(&self, protocol: ObjectProtocol) -> bool {
        self.supported_protocols.contains(&protocol)
    }

    /// A handle to the driver's Provisioner service. Clones share the underlying
    /// connection.
    #[must_use]
    pub fn provisioner_client(&self) -> ProvisionerClient<Channel> {
        self.provisioner_client.clone()
    }
}

/// Parse and validate the driver's reported info and return the struct reconcilers need
/// to work with the driver.
pub fn validate_driver_info(
    driver_reported_info: &proto::DriverGetInfoResponse,
    channel: Channel,
) -> Result<DriverInfo> {
    validate_driver_name(&driver_reported_info.name)
        .map_err(|err| anyhow!("driver name is invalid: {err:#}"))?;

    let parsed_protocols = validate_and_parse_protocols(&driver_reported_info.supported_protocols)
        .map_err(|err| anyhow!("supported protocols list is invalid: {err:#}"))?;

    Ok(DriverInfo {
        name: driver_reported_info.name.clone(),
        supported_protocols: parsed_protocols,

        provisioner_client: ProvisionerClient::new(channel),
    })
}

/// Validate that the driver name matches requirements: a series of valid RFC-1035
/// labels, optionally separated by dots, with a total length of 63 characters or less.
fn validate_driver_name(name: &str) -> Result<()> {
    let mut all_errs = Vec::new();

    if name.len() > 63 {
        all_errs.push(format!(
            "must be no more than 63 characters: length={}",
            name.len()
        ));
    }

    for label in name.split('.') {
        if !is_rfc1035_label(label) {
            all_errs.push(format!("{label:?} is not a valid RFC-1035 label"));
        }
    }

    if !all_errs.is_empty() {
        return Err(anyhow!("driver name {name:?} is invalid: {all_errs:?}"));
    }
    Ok(())
}

/// An RFC-1035 label starts with a lowercase letter, ends with a lowercase alphanumeric
/// character, and contains only lowercase alphanumeric characters and dashes between.
fn is_rfc1035_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false; // empty
    };
    if label.len() > 63 {
        return false;
    }
    first.is_ascii_lowercase()
        && (last.is_ascii_lowercase() || last.is_ascii_digit())
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

/// Parse the driver's reported object protocols into their API-domain form, which all
/// later support checks compare against. The list must be non-empty, must not contain
/// UNKNOWN, and must not repeat a value.
fn validate_and_parse_protocols(
    object_protocols: &[proto::ObjectProtocol],
) -> Result<Vec<ObjectProtocol>> {
    if object_protocols.is_empty() {
        return Err(anyhow!("at least one object protocol must be supported"));
    }

    let mut out = Vec::with_capacity(object_protocols.len());

    for object_protocol in object_protocols {
        let rpc_type = proto::object_protocol::Type::try_from(object_protocol.r#type)
            .unwrap_or(proto::object_protocol::Type::Unknown);
        // UNKNOWN has no API counterpart and is rejected by the translation
        let protocol = object_protocol_rpc_to_api(rpc_type)?;
        if out.contains(&protocol) {
            return Err(anyhow!("object protocol {protocol:?} is repeated"));
        }
        out.push(protocol);
    }

    Ok(out)
}

/// Determine whether an error is retryable (true) based on the documented baseline RPC
/// error scheme. The baseline scheme is fully and explicitly codified here; a code that
/// isn't codified is assumed to be retryable. RPC commands with unique error code
/// behaviors should check those before falling back to this baseline.
#[must_use]
pub fn rpc_error_is_retryable(code: tonic::Code) -> bool {
    match code {
        tonic::Code::InvalidArgument => false,
        tonic::Code::PermissionDenied => true,
        tonic::Code::AlreadyExists => false,
        tonic::Code::Aborted => true,
        tonic::Code::Unimplemented => false,
        tonic::Code::Unauthenticated => true,
        _ => true,
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod driver_tests;
