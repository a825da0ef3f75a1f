//! Typed view of the secret bundle
//!
//! The deployment configuration names the keys, the secret bundle holds the
//! values. [`TransferTargets::from_bundle`] dereferences every required key up
//! front so a missing or malformed value stops the run before any external
//! command is invoked.

use crate::config::SecretKeyNames;
use crate::domain::{DatasetId, Result, SecretBundle, StorageScheme, StorageUri, TransferError};

/// Values the pipeline reads from the secret bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTargets {
    /// Source dataset (`project:dataset`)
    pub dataset: DatasetId,

    /// Staging root the export writes under
    pub staging_root: StorageUri,

    /// Durable bucket the staging root is mirrored into
    pub durable_root: StorageUri,

    /// Key holding the base64 credential document
    pub credentials_key: String,
}

impl TransferTargets {
    /// Resolves all required keys from the bundle
    ///
    /// # Errors
    ///
    /// - [`TransferError::MissingConfigurationKey`] for the first absent key
    /// - [`TransferError::Configuration`] if the dataset ID is malformed
    /// - [`TransferError::InvalidStorageUri`] if a bucket path is malformed
    pub fn from_bundle(bundle: &SecretBundle, keys: &SecretKeyNames) -> Result<Self> {
        let dataset_raw = bundle.get(&keys.dataset_id)?;
        let export_raw = bundle.get(&keys.export_uri)?;
        let transfer_raw = bundle.get(&keys.transfer_uri)?;
        if !bundle.contains_key(&keys.base64_credentials) {
            return Err(TransferError::MissingConfigurationKey {
                key: keys.base64_credentials.clone(),
            });
        }

        let dataset = DatasetId::new(dataset_raw).map_err(|e| {
            TransferError::Configuration(format!("value of '{}': {e}", keys.dataset_id))
        })?;
        let staging_root = StorageUri::new(StorageScheme::Gcs, export_raw).map_err(|e| {
            TransferError::InvalidStorageUri(format!("value of '{}': {e}", keys.export_uri))
        })?;
        let durable_root = StorageUri::new(StorageScheme::S3, transfer_raw).map_err(|e| {
            TransferError::InvalidStorageUri(format!("value of '{}': {e}", keys.transfer_uri))
        })?;

        Ok(Self {
            dataset,
            staging_root,
            durable_root,
            credentials_key: keys.base64_credentials.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SecretKeyNames {
        SecretKeyNames {
            dataset_id: "DATASET".to_string(),
            base64_credentials: "CREDS".to_string(),
            export_uri: "EXPORT".to_string(),
            transfer_uri: "TRANSFER".to_string(),
        }
    }

    fn full_bundle() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATASET", "proj:analytics_1"),
            ("CREDS", "e30="),
            ("EXPORT", "staging-bucket/ga4"),
            ("TRANSFER", "archive-bucket/ga4"),
        ]
    }

    #[test]
    fn test_resolves_all_targets() {
        let bundle: SecretBundle = full_bundle().into_iter().collect();
        let targets = TransferTargets::from_bundle(&bundle, &keys()).unwrap();
        assert_eq!(targets.dataset.project_id(), "proj");
        assert_eq!(targets.staging_root.as_str(), "gs://staging-bucket/ga4");
        assert_eq!(targets.durable_root.as_str(), "s3://archive-bucket/ga4");
        assert_eq!(targets.credentials_key, "CREDS");
    }

    #[test]
    fn test_each_missing_key_is_reported() {
        for missing in ["DATASET", "CREDS", "EXPORT", "TRANSFER"] {
            let bundle: SecretBundle = full_bundle()
                .into_iter()
                .filter(|(k, _)| *k != missing)
                .collect();
            match TransferTargets::from_bundle(&bundle, &keys()) {
                Err(TransferError::MissingConfigurationKey { key }) => assert_eq!(key, missing),
                other => panic!("expected missing {missing}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_bucket_path() {
        let bundle: SecretBundle = full_bundle()
            .into_iter()
            .map(|(k, v)| if k == "TRANSFER" { (k, "bad path") } else { (k, v) })
            .collect();
        let err = TransferTargets::from_bundle(&bundle, &keys()).unwrap_err();
        assert!(matches!(err, TransferError::InvalidStorageUri(_)));
    }
}
