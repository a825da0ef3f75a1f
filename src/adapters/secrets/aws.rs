//! AWS Secrets Manager implementation of [`SecretStore`]

use super::traits::SecretStore;
use crate::config::Identity;
use crate::domain::{Result, TransferError};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;

/// Secrets Manager client scoped to one region and identity
#[derive(Debug, Clone)]
pub struct AwsSecretsManager {
    client: Client,
    region: String,
}

impl AwsSecretsManager {
    /// Opens a session for `region`
    ///
    /// [`Identity::Ambient`] uses the default credential chain (instance or
    /// task role inside a batch job); [`Identity::Profile`] uses the named
    /// profile from the shared AWS config files.
    pub async fn connect(region: &str, identity: &Identity) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

        match identity {
            Identity::Profile(profile) => {
                tracing::info!(region = %region, profile = %profile, "Using named AWS profile");
                loader = loader.profile_name(profile);
            }
            Identity::Ambient => {
                tracing::info!(region = %region, "Using ambient AWS identity");
            }
        }

        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
            region: region.to_string(),
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManager {
    async fn fetch_secret_string(&self, secret_name: &str) -> Result<String> {
        tracing::debug!(secret_name = %secret_name, region = %self.region, "Fetching secret");

        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_name)
            .send()
            .await
            .map_err(|e| TransferError::SecretAccess {
                secret_name: secret_name.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        output.secret_string().map(str::to_string).ok_or_else(|| {
            TransferError::SecretFormat(format!(
                "secret '{secret_name}' has no string payload (binary secrets are not supported)"
            ))
        })
    }
}
