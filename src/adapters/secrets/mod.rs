//! Secret store integration
//!
//! - [`traits`] - [`SecretStore`] seam; `resolve` turns an entry into a [`crate::domain::SecretBundle`]
//! - [`aws`] - AWS Secrets Manager implementation

pub mod aws;
pub mod traits;

pub use aws::AwsSecretsManager;
pub use traits::SecretStore;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Result, TransferError};
    use async_trait::async_trait;

    struct StaticStore(std::result::Result<String, String>);

    #[async_trait]
    impl SecretStore for StaticStore {
        async fn fetch_secret_string(&self, secret_name: &str) -> Result<String> {
            self.0.clone().map_err(|message| TransferError::SecretAccess {
                secret_name: secret_name.to_string(),
                message,
            })
        }
    }

    #[tokio::test]
    async fn test_resolve_parses_bundle() {
        let store = StaticStore(Ok(r#"{"DATASET": "p:d"}"#.to_string()));
        let bundle = store.resolve("ga4/transfer").await.unwrap();
        assert_eq!(bundle.get("DATASET").unwrap(), "p:d");
    }

    #[tokio::test]
    async fn test_resolve_propagates_access_error() {
        let store = StaticStore(Err("AccessDeniedException".to_string()));
        let err = store.resolve("ga4/transfer").await.unwrap_err();
        match err {
            TransferError::SecretAccess {
                secret_name,
                message,
            } => {
                assert_eq!(secret_name, "ga4/transfer");
                assert!(message.contains("AccessDenied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_non_json_payload() {
        let store = StaticStore(Ok("plain text".to_string()));
        let err = store.resolve("ga4/transfer").await.unwrap_err();
        assert!(matches!(err, TransferError::SecretFormat(_)));
    }
}
