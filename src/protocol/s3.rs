// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! S3 protocol translators.

use crate::crd::BucketAccessAuthenticationType;
use crate::proto;
use crate::protocol::{BucketInfoVar, CredentialVar, RpcApiTranslator};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// The `path` S3 addressing style.
pub const S3_ADDRESSING_STYLE_PATH: &str = "path";

/// The `virtual` S3 addressing style.
pub const S3_ADDRESSING_STYLE_VIRTUAL: &str = "virtual";

const VALID_S3_ADDRESSING_STYLES: [&str; 2] =
    [S3_ADDRESSING_STYLE_PATH, S3_ADDRESSING_STYLE_VIRTUAL];

/// Translates S3 bucket connection info.
pub struct S3BucketInfoTranslator;

impl RpcApiTranslator for S3BucketInfoTranslator {
    type Rpc = proto::S3BucketInfo;
    type Var = BucketInfoVar;

    fn rpc_to_api(rpc: Option<&Self::Rpc>) -> Option<BTreeMap<BucketInfoVar, String>> {
        let b = rpc?;

        let mut out = BTreeMap::from([
            (BucketInfoVar::S3BucketId, b.bucket_id.clone()),
            (BucketInfoVar::S3Endpoint, b.endpoint.clone()),
            (BucketInfoVar::S3Region, b.region.clone()),
            // set below if possible
            (BucketInfoVar::S3AddressingStyle, String::new()),
        ]);

        if let Some(addressing_style) = &b.addressing_style {
            match proto::s3_addressing_style::Style::try_from(addressing_style.style) {
                Ok(proto::s3_addressing_style::Style::Path) => {
                    out.insert(
                        BucketInfoVar::S3AddressingStyle,
                        S3_ADDRESSING_STYLE_PATH.to_string(),
                    );
                }
                Ok(proto::s3_addressing_style::Style::Virtual) => {
                    out.insert(
                        BucketInfoVar::S3AddressingStyle,
                        S3_ADDRESSING_STYLE_VIRTUAL.to_string(),
                    );
                }
                _ => {}
            }
        }

        Some(out)
    }

    fn api_to_rpc(vars: &BTreeMap<BucketInfoVar, String>) -> Option<Self::Rpc> {
        if vars.is_empty() {
            return None;
        }

        let var = |v: BucketInfoVar| vars.get(&v).cloned().unwrap_or_default();

        let style = match var(BucketInfoVar::S3AddressingStyle).as_str() {
            S3_ADDRESSING_STYLE_PATH => proto::s3_addressing_style::Style::Path,
            S3_ADDRESSING_STYLE_VIRTUAL => proto::s3_addressing_style::Style::Virtual,
            _ => proto::s3_addressing_style::Style::Unknown,
        };

        Some(proto::S3BucketInfo {
            bucket_id: var(BucketInfoVar::S3BucketId),
            endpoint: var(BucketInfoVar::S3Endpoint),
            region: var(BucketInfoVar::S3Region),
            addressing_style: Some(proto::S3AddressingStyle {
                style: style as i32,
            }),
        })
    }

    fn validate(
        vars: &BTreeMap<BucketInfoVar, String>,
        _auth_type: BucketAccessAuthenticationType,
    ) -> Result<()> {
        let mut errs = Vec::new();

        let var = |v: BucketInfoVar| vars.get(&v).map(String::as_str).unwrap_or_default();

        if var(BucketInfoVar::S3BucketId).is_empty() {
            errs.push("S3 bucket ID cannot be unset".to_string());
        }

        if var(BucketInfoVar::S3Endpoint).is_empty() {
            errs.push("S3 endpoint cannot be unset".to_string());
        }

        if var(BucketInfoVar::S3Region).is_empty() {
            errs.push("S3 region cannot be unset".to_string());
        }

        let style = var(BucketInfoVar::S3AddressingStyle);
        if !VALID_S3_ADDRESSING_STYLES.contains(&style) {
            errs.push(format!(
                "S3 addressing style {:?} must be one of {:?}",
                style, VALID_S3_ADDRESSING_STYLES
            ));
        }

        if !errs.is_empty() {
            return Err(anyhow!("S3 bucket info is invalid: {:?}", errs));
        }
        Ok(())
    }
}

/// Translates S3 access credentials.
pub struct S3CredentialTranslator;

impl RpcApiTranslator for S3CredentialTranslator {
    type Rpc = proto::S3CredentialInfo;
    type Var = CredentialVar;

    fn rpc_to_api(rpc: Option<&Self::Rpc>) -> Option<BTreeMap<CredentialVar, String>> {
        let c = rpc?;

        Some(BTreeMap::from([
            (CredentialVar::S3AccessKeyId, c.access_key_id.clone()),
            (
                CredentialVar::S3AccessSecretKey,
                c.access_secret_key.clone(),
            ),
        ]))
    }

    fn api_to_rpc(vars: &BTreeMap<CredentialVar, String>) -> Option<Self::Rpc> {
        if vars.is_empty() {
            return None;
        }

        let var = |v: CredentialVar| vars.get(&v).cloned().unwrap_or_default();

        Some(proto::S3CredentialInfo {
            access_key_id: var(CredentialVar::S3AccessKeyId),
            access_secret_key: var(CredentialVar::S3AccessSecretKey),
        })
    }

    fn validate(
        vars: &BTreeMap<CredentialVar, String>,
        auth_type: BucketAccessAuthenticationType,
    ) -> Result<()> {
        // credentials are only required when authentication type is "Key"
        if auth_type != BucketAccessAuthenticationType::Key {
            return Ok(());
        }

        let mut errs = Vec::new();

        let var = |v: CredentialVar| vars.get(&v).map(String::as_str).unwrap_or_default();

        if var(CredentialVar::S3AccessKeyId).is_empty() {
            errs.push("S3 access key ID cannot be unset".to_string());
        }

        if var(CredentialVar::S3AccessSecretKey).is_empty() {
            errs.push("S3 access secret key cannot be unset".to_string());
        }

        if !errs.is_empty() {
            return Err(anyhow!("S3 credential info is invalid: {:?}", errs));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "s3_tests.rs"]
mod s3_tests;
