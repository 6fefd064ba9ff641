// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! Unit tests for `s3.rs`

#[cfg(test)]
mod tests {
    use crate::crd::BucketAccessAuthenticationType;
    use crate::proto;
    use crate::protocol::{
        BucketInfoVar, CredentialVar, RpcApiTranslator, S3BucketInfoTranslator,
        S3CredentialTranslator,
    };
    use std::collections::BTreeMap;

    fn bucket_info_vars(
        id: &str,
        endpoint: &str,
        region: &str,
        style: &str,
    ) -> BTreeMap<BucketInfoVar, String> {
        BTreeMap::from([
            (BucketInfoVar::S3BucketId, id.to_string()),
            (BucketInfoVar::S3Endpoint, endpoint.to_string()),
            (BucketInfoVar::S3Region, region.to_string()),
            (BucketInfoVar::S3AddressingStyle, style.to_string()),
        ])
    }

    #[test]
    fn test_bucket_info_empty_api_map_is_none() {
        assert!(S3BucketInfoTranslator::api_to_rpc(&BTreeMap::new()).is_none());
        assert!(S3BucketInfoTranslator::rpc_to_api(None).is_none());
    }

    #[test]
    fn test_bucket_info_round_trip_from_api() {
        // Round trips starting from the API map must reproduce the input exactly.
        let cases = [
            bucket_info_vars("bc-qwerty", "s3.corp.net", "us-west-1", "path"),
            bucket_info_vars("bc-asdfgh", "object.s3.com", "us-east-1", ""),
            // not valid for bucket access, but fine for Bucket status
            bucket_info_vars("", "", "", ""),
        ];

        for vars in cases {
            let rpc = S3BucketInfoTranslator::api_to_rpc(&vars).unwrap();
            let api = S3BucketInfoTranslator::rpc_to_api(Some(&rpc)).unwrap();
            assert_eq!(api, vars);
        }
    }

    #[test]
    fn test_bucket_info_api_to_rpc_styles() {
        let rpc =
            S3BucketInfoTranslator::api_to_rpc(&bucket_info_vars("b", "e", "r", "path")).unwrap();
        assert_eq!(
            rpc.addressing_style.unwrap().style,
            proto::s3_addressing_style::Style::Path as i32
        );

        let rpc = S3BucketInfoTranslator::api_to_rpc(&bucket_info_vars("b", "e", "r", "virtual"))
            .unwrap();
        assert_eq!(
            rpc.addressing_style.unwrap().style,
            proto::s3_addressing_style::Style::Virtual as i32
        );

        let rpc =
            S3BucketInfoTranslator::api_to_rpc(&bucket_info_vars("b", "e", "r", "")).unwrap();
        assert_eq!(
            rpc.addressing_style.unwrap().style,
            proto::s3_addressing_style::Style::Unknown as i32
        );
    }

    #[test]
    fn test_bucket_info_rpc_to_api_fills_all_vars() {
        // An empty RPC struct must still yield every API var, each with an empty value.
        let api = S3BucketInfoTranslator::rpc_to_api(Some(&proto::S3BucketInfo::default()))
            .unwrap();
        assert_eq!(api, bucket_info_vars("", "", "", ""));
    }

    #[test]
    fn test_bucket_info_rpc_to_api_missing_addressing_style() {
        // A nil addressing style and an explicit UNKNOWN both map to the empty string.
        let rpc = proto::S3BucketInfo {
            bucket_id: "bc-qwerty".to_string(),
            endpoint: "s3.corp.net".to_string(),
            region: "us-west-1".to_string(),
            addressing_style: None,
        };
        let api = S3BucketInfoTranslator::rpc_to_api(Some(&rpc)).unwrap();
        assert_eq!(api[&BucketInfoVar::S3AddressingStyle], "");

        let rpc = proto::S3BucketInfo {
            addressing_style: Some(proto::S3AddressingStyle::default()),
            ..rpc
        };
        let api = S3BucketInfoTranslator::rpc_to_api(Some(&rpc)).unwrap();
        assert_eq!(api[&BucketInfoVar::S3AddressingStyle], "");
    }

    #[test]
    fn test_bucket_info_vars_have_s3_prefix() {
        let api = S3BucketInfoTranslator::rpc_to_api(Some(&proto::S3BucketInfo::default()))
            .unwrap();
        for key in api.keys() {
            assert!(key.as_str().starts_with("COSI_S3_"));
        }
    }

    #[test]
    fn test_bucket_info_validate() {
        let good = bucket_info_vars("bc-qwerty", "s3.corp.net", "us-west-1", "path");
        assert!(
            S3BucketInfoTranslator::validate(&good, BucketAccessAuthenticationType::Key).is_ok()
        );

        let bad_style = bucket_info_vars("bc-qwerty", "s3.corp.net", "us-west-1", "dns");
        let err = S3BucketInfoTranslator::validate(&bad_style, BucketAccessAuthenticationType::Key)
            .unwrap_err();
        assert!(err.to_string().contains("addressing style"));

        let missing = bucket_info_vars("", "s3.corp.net", "us-west-1", "virtual");
        let err = S3BucketInfoTranslator::validate(&missing, BucketAccessAuthenticationType::Key)
            .unwrap_err();
        assert!(err.to_string().contains("bucket ID"));
    }

    fn credential_vars(key_id: &str, secret: &str) -> BTreeMap<CredentialVar, String> {
        BTreeMap::from([
            (CredentialVar::S3AccessKeyId, key_id.to_string()),
            (CredentialVar::S3AccessSecretKey, secret.to_string()),
        ])
    }

    #[test]
    fn test_credential_round_trip_from_api() {
        let cases = [
            credential_vars("FAKEACCESSKEY", "FAKESECRETKEY"),
            credential_vars("", ""),
        ];
        for vars in cases {
            let rpc = S3CredentialTranslator::api_to_rpc(&vars).unwrap();
            let api = S3CredentialTranslator::rpc_to_api(Some(&rpc)).unwrap();
            assert_eq!(api, vars);
        }

        assert!(S3CredentialTranslator::api_to_rpc(&BTreeMap::new()).is_none());
        assert!(S3CredentialTranslator::rpc_to_api(None).is_none());
    }

    #[test]
    fn test_credential_vars_have_s3_prefix() {
        let api = S3CredentialTranslator::rpc_to_api(Some(&proto::S3CredentialInfo::default()))
            .unwrap();
        for key in api.keys() {
            assert!(key.as_str().starts_with("COSI_S3_"));
        }
    }

    #[test]
    fn test_credential_validate_key_auth() {
        let good = credential_vars("FAKEACCESSKEY", "FAKESECRETKEY");
        assert!(
            S3CredentialTranslator::validate(&good, BucketAccessAuthenticationType::Key).is_ok()
        );

        let missing_secret = credential_vars("FAKEACCESSKEY", "");
        let err = S3CredentialTranslator::validate(
            &missing_secret,
            BucketAccessAuthenticationType::Key,
        )
        .unwrap_err();
        assert!(err.to_string().contains("secret key"));
    }

    #[test]
    fn test_credential_validate_skipped_for_service_account_auth() {
        // Key credentials are not required for ServiceAccount authentication.
        let empty = credential_vars("", "");
        assert!(S3CredentialTranslator::validate(
            &empty,
            BucketAccessAuthenticationType::ServiceAccount
        )
        .is_ok());
    }
}
