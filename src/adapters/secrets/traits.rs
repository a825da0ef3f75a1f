//! Secret store abstraction

use crate::config::secret_string;
use crate::domain::{Result, SecretBundle};
use async_trait::async_trait;
use secrecy::ExposeSecret;

/// Read access to a named secret store entry
///
/// Implementations are scoped to one region and identity when constructed.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetches the string payload of a secret entry
    ///
    /// # Errors
    ///
    /// - [`crate::domain::TransferError::SecretAccess`] on transport or authorization failure
    /// - [`crate::domain::TransferError::SecretFormat`] if the entry has no string payload
    async fn fetch_secret_string(&self, secret_name: &str) -> Result<String>;

    /// Fetches an entry and parses it into a [`SecretBundle`]
    ///
    /// # Errors
    ///
    /// As [`SecretStore::fetch_secret_string`], plus
    /// [`crate::domain::TransferError::SecretFormat`] if the payload is not a JSON object.
    async fn resolve(&self, secret_name: &str) -> Result<SecretBundle> {
        let payload = secret_string(self.fetch_secret_string(secret_name).await?);
        let bundle = SecretBundle::from_json(payload.expose_secret().as_str())?;

        tracing::info!(
            secret_name = %secret_name,
            keys = bundle.len(),
            "Secret bundle retrieved"
        );

        Ok(bundle)
    }
}
