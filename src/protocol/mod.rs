// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Translation between the driver RPC domain and the Kubernetes API user domain.
//!
//! Drivers report per-protocol bucket info and credentials as protobuf structs. Users
//! consume the same data as flat `COSI_*` key/value maps embedded in Bucket status and
//! BucketAccess Secrets. Each supported protocol (S3, Azure Blob, GCS) has a pair of
//! translators implementing [`RpcApiTranslator`]: one for bucket connection info and one
//! for access credentials.
//!
//! # Variable naming contract
//!
//! Every API variable is an uppercase string beginning with `COSI_`. Protocol-specific
//! variables include the protocol name after the prefix, e.g. `COSI_S3_ENDPOINT`,
//! `COSI_AZURE_STORAGE_ACCOUNT`. These strings are user-facing contract and must never
//! change for an existing variable.

pub mod azure;
pub mod gcs;
pub mod s3;

pub use azure::{AzureBucketInfoTranslator, AzureCredentialTranslator};
pub use gcs::{GcsBucketInfoTranslator, GcsCredentialTranslator};
pub use s3::{S3BucketInfoTranslator, S3CredentialTranslator};

use crate::crd::{BucketAccessAuthenticationType, ObjectProtocol};
use crate::proto;
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::fmt;

/// A user-facing bucket connection info variable.
///
/// Rendered into `Bucket.status.bucketInfo` and BucketAccess Secrets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketInfoVar {
    /// `COSI_S3_BUCKET_ID`
    S3BucketId,
    /// `COSI_S3_ENDPOINT`
    S3Endpoint,
    /// `COSI_S3_REGION`
    S3Region,
    /// `COSI_S3_ADDRESSING_STYLE`; one of `path` or `virtual`
    S3AddressingStyle,
    /// `COSI_AZURE_STORAGE_ACCOUNT`
    AzureStorageAccount,
    /// `COSI_GCS_PROJECT_ID`
    GcsProjectId,
    /// `COSI_GCS_BUCKET_NAME`
    GcsBucketName,
}

impl BucketInfoVar {
    /// The user-facing variable name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketInfoVar::S3BucketId => "COSI_S3_BUCKET_ID",
            BucketInfoVar::S3Endpoint => "COSI_S3_ENDPOINT",
            BucketInfoVar::S3Region => "COSI_S3_REGION",
            BucketInfoVar::S3AddressingStyle => "COSI_S3_ADDRESSING_STYLE",
            BucketInfoVar::AzureStorageAccount => "COSI_AZURE_STORAGE_ACCOUNT",
            BucketInfoVar::GcsProjectId => "COSI_GCS_PROJECT_ID",
            BucketInfoVar::GcsBucketName => "COSI_GCS_BUCKET_NAME",
        }
    }
}

impl fmt::Display for BucketInfoVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-facing access credential variable.
///
/// Rendered into BucketAccess Secrets only; never stored in resource status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CredentialVar {
    /// `COSI_PROTOCOL`; the protocol the credentials apply to (required)
    Protocol,
    /// `COSI_CERTIFICATE_AUTHORITY`; PEM bundle for endpoint verification (optional)
    CertificateAuthority,
    /// `COSI_S3_ACCESS_KEY_ID`
    S3AccessKeyId,
    /// `COSI_S3_ACCESS_SECRET_KEY`
    S3AccessSecretKey,
    /// `COSI_AZURE_ACCESS_TOKEN`; shared access signature URI plus token
    AzureAccessToken,
    /// `COSI_AZURE_EXPIRY_TIMESTAMP`; ISO-8601 token expiry (optional)
    AzureExpiryTimestamp,
    /// `COSI_GCS_ACCESS_ID`
    GcsAccessId,
    /// `COSI_GCS_ACCESS_SECRET`
    GcsAccessSecret,
    /// `COSI_GCS_PRIVATE_KEY_NAME`
    GcsPrivateKeyName,
    /// `COSI_GCS_SERVICE_ACCOUNT`
    GcsServiceAccount,
}

impl CredentialVar {
    /// The user-facing variable name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialVar::Protocol => "COSI_PROTOCOL",
            CredentialVar::CertificateAuthority => "COSI_CERTIFICATE_AUTHORITY",
            CredentialVar::S3AccessKeyId => "COSI_S3_ACCESS_KEY_ID",
            CredentialVar::S3AccessSecretKey => "COSI_S3_ACCESS_SECRET_KEY",
            CredentialVar::AzureAccessToken => "COSI_AZURE_ACCESS_TOKEN",
            CredentialVar::AzureExpiryTimestamp => "COSI_AZURE_EXPIRY_TIMESTAMP",
            CredentialVar::GcsAccessId => "COSI_GCS_ACCESS_ID",
            CredentialVar::GcsAccessSecret => "COSI_GCS_ACCESS_SECRET",
            CredentialVar::GcsPrivateKeyName => "COSI_GCS_PRIVATE_KEY_NAME",
            CredentialVar::GcsServiceAccount => "COSI_GCS_SERVICE_ACCOUNT",
        }
    }
}

impl fmt::Display for CredentialVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translates one protocol's info between the RPC driver domain and the API user domain.
///
/// Implementations exist per (protocol, info kind) pair; callers dispatch statically by
/// protocol identity. There is no runtime plugin loader.
pub trait RpcApiTranslator {
    /// The RPC-domain protobuf struct.
    type Rpc;
    /// The API-domain variable key type.
    type Var: Copy + Ord + fmt::Display;

    /// Translate info from RPC to API with no validation.
    ///
    /// `None` input means the protocol is unsupported and MUST produce `None` output.
    /// Otherwise, every API var for the protocol MUST be present in the result, using an
    /// empty string value for fields the RPC left unset.
    fn rpc_to_api(rpc: Option<&Self::Rpc>) -> Option<BTreeMap<Self::Var, String>>;

    /// Translate info from API to RPC with no validation.
    ///
    /// An empty map is assumed to mean the protocol is not supported, and the result
    /// MUST be `None`.
    fn api_to_rpc(vars: &BTreeMap<Self::Var, String>) -> Option<Self::Rpc>;

    /// Check that user-domain API fields meet requirements and expectations.
    fn validate(
        vars: &BTreeMap<Self::Var, String>,
        auth_type: BucketAccessAuthenticationType,
    ) -> Result<()>;
}

/// Translate an object protocol from RPC to API. The RPC `UNKNOWN` value has no API
/// counterpart and is an error.
pub fn object_protocol_rpc_to_api(rpc: proto::object_protocol::Type) -> Result<ObjectProtocol> {
    match rpc {
        proto::object_protocol::Type::S3 => Ok(ObjectProtocol::S3),
        proto::object_protocol::Type::Azure => Ok(ObjectProtocol::Azure),
        proto::object_protocol::Type::Gcs => Ok(ObjectProtocol::GCS),
        proto::object_protocol::Type::Unknown => {
            Err(anyhow!("unknown driver protocol {:?}", rpc.as_str_name()))
        }
    }
}

/// Translate an object protocol from API to RPC.
#[must_use]
pub fn object_protocol_api_to_rpc(api: ObjectProtocol) -> proto::object_protocol::Type {
    match api {
        ObjectProtocol::S3 => proto::object_protocol::Type::S3,
        ObjectProtocol::Azure => proto::object_protocol::Type::Azure,
        ObjectProtocol::GCS => proto::object_protocol::Type::Gcs,
    }
}
