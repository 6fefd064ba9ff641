// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Google Cloud Storage protocol translators.

use crate::crd::BucketAccessAuthenticationType;
use crate::proto;
use crate::protocol::{BucketInfoVar, CredentialVar, RpcApiTranslator};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// Translates GCS bucket connection info.
pub struct GcsBucketInfoTranslator;

impl RpcApiTranslator for GcsBucketInfoTranslator {
    type Rpc = proto::GcsBucketInfo;
    type Var = BucketInfoVar;

    fn rpc_to_api(rpc: Option<&Self::Rpc>) -> Option<BTreeMap<BucketInfoVar, String>> {
        let b = rpc?;

        Some(BTreeMap::from([
            (BucketInfoVar::GcsProjectId, b.project_id.clone()),
            (BucketInfoVar::GcsBucketName, b.bucket_name.clone()),
        ]))
    }

    fn api_to_rpc(vars: &BTreeMap<BucketInfoVar, String>) -> Option<Self::Rpc> {
        if vars.is_empty() {
            return None;
        }

        let var = |v: BucketInfoVar| vars.get(&v).cloned().unwrap_or_default();

        Some(proto::GcsBucketInfo {
            project_id: var(BucketInfoVar::GcsProjectId),
            bucket_name: var(BucketInfoVar::GcsBucketName),
        })
    }

    fn validate(
        vars: &BTreeMap<BucketInfoVar, String>,
        _auth_type: BucketAccessAuthenticationType,
    ) -> Result<()> {
        let mut errs = Vec::new();

        let var = |v: BucketInfoVar| vars.get(&v).map(String::as_str).unwrap_or_default();

        if var(BucketInfoVar::GcsBucketName).is_empty() {
            errs.push("GCS bucket name cannot be unset".to_string());
        }

        if var(BucketInfoVar::GcsProjectId).is_empty() {
            errs.push("GCS project ID cannot be unset".to_string());
        }

        if !errs.is_empty() {
            return Err(anyhow!("GCS bucket info is invalid: {:?}", errs));
        }
        Ok(())
    }
}

/// Translates GCS access credentials.
pub struct GcsCredentialTranslator;

impl RpcApiTranslator for GcsCredentialTranslator {
    type Rpc = proto::GcsCredentialInfo;
    type Var = CredentialVar;

    fn rpc_to_api(rpc: Option<&Self::Rpc>) -> Option<BTreeMap<CredentialVar, String>> {
        let c = rpc?;

        Some(BTreeMap::from([
            (CredentialVar::GcsAccessId, c.access_id.clone()),
            (CredentialVar::GcsAccessSecret, c.access_secret.clone()),
            (
                CredentialVar::GcsPrivateKeyName,
                c.private_key_name.clone(),
            ),
            (
                CredentialVar::GcsServiceAccount,
                c.service_account.clone(),
            ),
        ]))
    }

    fn api_to_rpc(vars: &BTreeMap<CredentialVar, String>) -> Option<Self::Rpc> {
        if vars.is_empty() {
            return None;
        }

        let var = |v: CredentialVar| vars.get(&v).cloned().unwrap_or_default();

        Some(proto::GcsCredentialInfo {
            access_id: var(CredentialVar::GcsAccessId),
            access_secret: var(CredentialVar::GcsAccessSecret),
            private_key_name: var(CredentialVar::GcsPrivateKeyName),
            service_account: var(CredentialVar::GcsServiceAccount),
        })
    }

    fn validate(
        vars: &BTreeMap<CredentialVar, String>,
        auth_type: BucketAccessAuthenticationType,
    ) -> Result<()> {
        let mut errs = Vec::new();

        let var = |v: CredentialVar| vars.get(&v).map(String::as_str).unwrap_or_default();

        match auth_type {
            BucketAccessAuthenticationType::Key => {
                if var(CredentialVar::GcsAccessId).is_empty() {
                    errs.push("GCS access ID cannot be unset".to_string());
                }

                if var(CredentialVar::GcsAccessSecret).is_empty() {
                    errs.push("GCS access secret cannot be unset".to_string());
                }
            }
            BucketAccessAuthenticationType::ServiceAccount => {
                if var(CredentialVar::GcsPrivateKeyName).is_empty() {
                    errs.push("GCS private key name cannot be unset".to_string());
                }

                if var(CredentialVar::GcsServiceAccount).is_empty() {
                    errs.push("GCS service account cannot be unset".to_string());
                }
            }
        }

        if !errs.is_empty() {
            return Err(anyhow!("GCS credential info is invalid: {:?}", errs));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "gcs_tests.rs"]
mod gcs_tests;
