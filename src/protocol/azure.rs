// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Azure Blob protocol translators.

use crate::crd::BucketAccessAuthenticationType;
use crate::proto;
use crate::protocol::{BucketInfoVar, CredentialVar, RpcApiTranslator};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// Translates Azure container connection info.
pub struct AzureBucketInfoTranslator;

impl RpcApiTranslator for AzureBucketInfoTranslator {
    type Rpc = proto::AzureBucketInfo;
    type Var = BucketInfoVar;

    fn rpc_to_api(rpc: Option<&Self::Rpc>) -> Option<BTreeMap<BucketInfoVar, String>> {
        let b = rpc?;

        Some(BTreeMap::from([(
            BucketInfoVar::AzureStorageAccount,
            b.storage_account.clone(),
        )]))
    }

    fn api_to_rpc(vars: &BTreeMap<BucketInfoVar, String>) -> Option<Self::Rpc> {
        if vars.is_empty() {
            return None;
        }

        Some(proto::AzureBucketInfo {
            storage_account: vars
                .get(&BucketInfoVar::AzureStorageAccount)
                .cloned()
                .unwrap_or_default(),
        })
    }

    fn validate(
        vars: &BTreeMap<BucketInfoVar, String>,
        _auth_type: BucketAccessAuthenticationType,
    ) -> Result<()> {
        let mut errs = Vec::new();

        let storage_account = vars
            .get(&BucketInfoVar::AzureStorageAccount)
            .map(String::as_str)
            .unwrap_or_default();
        if storage_account.is_empty() {
            errs.push("azure storage account cannot be unset".to_string());
        }

        if !errs.is_empty() {
            return Err(anyhow!("azure bucket info is invalid: {:?}", errs));
        }
        Ok(())
    }
}

/// Translates Azure access credentials.
pub struct AzureCredentialTranslator;

impl RpcApiTranslator for AzureCredentialTranslator {
    type Rpc = proto::AzureCredentialInfo;
    type Var = CredentialVar;

    fn rpc_to_api(rpc: Option<&Self::Rpc>) -> Option<BTreeMap<CredentialVar, String>> {
        let c = rpc?;

        Some(BTreeMap::from([
            (CredentialVar::AzureAccessToken, c.access_token.clone()),
            (
                CredentialVar::AzureExpiryTimestamp,
                c.expiry_timestamp.clone(),
            ),
        ]))
    }

    fn api_to_rpc(vars: &BTreeMap<CredentialVar, String>) -> Option<Self::Rpc> {
        if vars.is_empty() {
            return None;
        }

        let var = |v: CredentialVar| vars.get(&v).cloned().unwrap_or_default();

        Some(proto::AzureCredentialInfo {
            access_token: var(CredentialVar::AzureAccessToken),
            expiry_timestamp: var(CredentialVar::AzureExpiryTimestamp),
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

        let access_token = vars
            .get(&CredentialVar::AzureAccessToken)
            .map(String::as_str)
            .unwrap_or_default();
        if access_token.is_empty() {
            errs.push("azure access token cannot be unset".to_string());
        }

        if !errs.is_empty() {
            return Err(anyhow!("azure credential info is invalid: {:?}", errs));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "azure_tests.rs"]
mod azure_tests;
