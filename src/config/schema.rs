//! Configuration schema types
//!
//! This module defines the configuration structure for the transfer job.
//! Every section has defaults so the job can run from environment variables
//! alone; a TOML file is optional.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (`.env` files are loaded)
    #[default]
    Development,
    /// Managed batch execution
    Production,
}

impl Environment {
    /// Parses the value of the `ENV` variable
    pub fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

/// Identity used to open the secret store session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Implicit execution-environment credentials
    Ambient,
    /// Named profile from the shared credentials/config files
    Profile(String),
}

/// Main transfer configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Secret store settings
    #[serde(default)]
    pub aws: AwsConfig,

    /// Warehouse and tool settings
    #[serde(default)]
    pub gcp: GcpConfig,

    /// Key names to look up inside the secret bundle
    #[serde(default)]
    pub secret_keys: SecretKeyNames,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TransferConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.aws.validate()?;
        self.gcp.validate()?;
        self.secret_keys.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Runtime environment
    #[serde(default)]
    pub environment: Environment,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            environment: Environment::default(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Secret store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region of the secret store
    #[serde(default)]
    pub region: String,

    /// Secret entry name
    #[serde(default)]
    pub secret_name: String,

    /// Named identity profile for local runs
    #[serde(default)]
    pub profile_name: Option<String>,

    /// Set when running inside a managed batch job
    #[serde(default)]
    pub batch_job_id: Option<String>,
}

impl AwsConfig {
    /// Selects the identity for the secret store session
    ///
    /// A batch job always uses the ambient identity, even when a profile name
    /// is configured. Outside a batch job a non-empty profile name wins.
    pub fn identity(&self) -> Identity {
        if self.batch_job_id.is_some() {
            return Identity::Ambient;
        }
        match self.profile_name.as_deref().map(str::trim) {
            Some(profile) if !profile.is_empty() => Identity::Profile(profile.to_string()),
            _ => Identity::Ambient,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.region.trim().is_empty() {
            return Err("aws.region cannot be empty (set AWS_REGION)".to_string());
        }
        if self.secret_name.trim().is_empty() {
            return Err(
                "aws.secret_name cannot be empty (set AWS_SECRETS_MANAGER_NAME)".to_string(),
            );
        }
        Ok(())
    }
}

/// Warehouse and tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpConfig {
    /// Location passed to the warehouse export
    #[serde(default)]
    pub region: String,

    /// Where the credential document is written
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// Directory appended to the tool search path
    #[serde(default = "default_sdk_bin_dir")]
    pub sdk_bin_dir: PathBuf,

    /// Leave the credential file on disk after the run
    #[serde(default)]
    pub keep_credentials: bool,
}

impl Default for GcpConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            credentials_path: default_credentials_path(),
            sdk_bin_dir: default_sdk_bin_dir(),
            keep_credentials: false,
        }
    }
}

impl GcpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.region.trim().is_empty() {
            return Err("gcp.region cannot be empty (set GCS_REGION_NAME)".to_string());
        }
        if !self.credentials_path.is_absolute() {
            return Err(format!(
                "gcp.credentials_path must be absolute, got: {}",
                self.credentials_path.display()
            ));
        }
        Ok(())
    }
}

/// Names of the keys inside the secret bundle
///
/// The deployment configuration names the keys; the secret store holds the
/// values. Keeping both sides separate lets either change independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretKeyNames {
    /// Key holding the `project:dataset` identifier
    #[serde(default)]
    pub dataset_id: String,

    /// Key holding the base64-encoded service account document
    #[serde(default)]
    pub base64_credentials: String,

    /// Key holding the staging bucket path
    #[serde(default)]
    pub export_uri: String,

    /// Key holding the durable bucket path
    #[serde(default)]
    pub transfer_uri: String,
}

impl SecretKeyNames {
    fn validate(&self) -> Result<(), String> {
        let required = [
            (
                &self.dataset_id,
                "secret_keys.dataset_id",
                "AWS_SECRETS_MANAGER_BIGQUERY_DATASET_ID",
            ),
            (
                &self.base64_credentials,
                "secret_keys.base64_credentials",
                "AWS_SECRETS_MANAGER_BASE64_ENCODED_KEY_NAME",
            ),
            (
                &self.export_uri,
                "secret_keys.export_uri",
                "AWS_SECRETS_MANAGER_GCS_EXPORT_URI",
            ),
            (
                &self.transfer_uri,
                "secret_keys.transfer_uri",
                "AWS_SECRETS_MANAGER_S3_TRANSFER_URI",
            ),
        ];

        for (value, field, var) in required {
            if value.trim().is_empty() {
                return Err(format!("{field} cannot be empty (set {var})"));
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Log file directory
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("/tmp/credentials.json")
}

fn default_sdk_bin_dir() -> PathBuf {
    PathBuf::from("/google-cloud-sdk/bin")
}

fn default_log_path() -> String {
    "/var/log/ga4-transfer".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> TransferConfig {
        TransferConfig {
            aws: AwsConfig {
                region: "ap-northeast-1".to_string(),
                secret_name: "ga4/transfer".to_string(),
                profile_name: None,
                batch_job_id: None,
            },
            gcp: GcpConfig {
                region: "asia-northeast1".to_string(),
                ..GcpConfig::default()
            },
            secret_keys: SecretKeyNames {
                dataset_id: "DATASET".to_string(),
                base64_credentials: "CREDS".to_string(),
                export_uri: "EXPORT".to_string(),
                transfer_uri: "TRANSFER".to_string(),
            },
            ..TransferConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_config_is_incomplete() {
        let err = TransferConfig::default().validate().unwrap_err();
        assert!(err.contains("AWS_REGION"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_secret_key_name() {
        let mut config = valid_config();
        config.secret_keys.transfer_uri = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("AWS_SECRETS_MANAGER_S3_TRANSFER_URI"));
    }

    #[test]
    fn test_relative_credentials_path_rejected() {
        let mut config = valid_config();
        config.gcp.credentials_path = PathBuf::from("credentials.json");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_identity_profile_outside_batch() {
        let aws = AwsConfig {
            profile_name: Some("dev".to_string()),
            ..AwsConfig::default()
        };
        assert_eq!(aws.identity(), Identity::Profile("dev".to_string()));
    }

    #[test]
    fn test_identity_ambient_inside_batch() {
        let aws = AwsConfig {
            profile_name: Some("dev".to_string()),
            batch_job_id: Some("job-1".to_string()),
            ..AwsConfig::default()
        };
        assert_eq!(aws.identity(), Identity::Ambient);
    }

    #[test]
    fn test_identity_ambient_for_empty_profile() {
        let aws = AwsConfig {
            profile_name: Some(String::new()),
            ..AwsConfig::default()
        };
        assert_eq!(aws.identity(), Identity::Ambient);
    }

    #[test]
    fn test_environment_from_env_value() {
        assert_eq!(
            Environment::from_env_value("production"),
            Environment::Production
        );
        assert_eq!(
            Environment::from_env_value("staging"),
            Environment::Development
        );
    }
}
