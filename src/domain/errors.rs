//! Domain error types
//!
//! This module defines the error hierarchy for the transfer job.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main transfer error type
///
/// Every component returns this type. All variants are fatal to the run;
/// retries are left to the scheduler that launched the job.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operator-supplied date is not `YYYY-MM-DD`
    #[error("Invalid date format: '{input}' (expected YYYY-MM-DD)")]
    InvalidDateFormat { input: String },

    /// Secret store could not be reached or refused the request
    #[error("Failed to access secret '{secret_name}': {message}")]
    SecretAccess {
        secret_name: String,
        message: String,
    },

    /// Secret payload is not a JSON object
    #[error("Secret payload is not a valid JSON object: {0}")]
    SecretFormat(String),

    /// A key named by the deployment configuration is absent from the secret bundle
    #[error("Missing configuration key in secret bundle: {key}")]
    MissingConfigurationKey { key: String },

    /// Credential value is not valid base64 or not UTF-8
    #[error("Invalid credential encoding: {0}")]
    InvalidCredentialEncoding(String),

    /// Decoded credential is not a JSON document
    #[error("Invalid credential format: {0}")]
    InvalidCredentialFormat(String),

    /// Bucket path from the secret bundle cannot form a storage URI
    #[error("Invalid storage URI: {0}")]
    InvalidStorageUri(String),

    /// External tool could not be started at all
    #[error("Failed to launch '{program}': {message}")]
    CommandLaunch { program: String, message: String },

    /// External tool exited with a non-zero status
    #[error("Command '{command}' failed with exit status {}: {stderr}", display_status(.exit_status))]
    ExternalCommandFailed {
        command: String,
        exit_status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl TransferError {
    /// Process exit code reported when this error terminates the run
    pub fn exit_code(&self) -> i32 {
        match self {
            TransferError::Configuration(_) | TransferError::InvalidDateFormat { .. } => 2,
            TransferError::SecretAccess { .. } => 4,
            TransferError::ExternalCommandFailed {
                exit_status: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        TransferError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TransferError {
    fn from(err: toml::de::Error) -> Self {
        TransferError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_display() {
        let err = TransferError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_command_failed_display_includes_status_and_stderr() {
        let err = TransferError::ExternalCommandFailed {
            command: "bq extract".to_string(),
            exit_status: Some(3),
            stdout: String::new(),
            stderr: "access denied".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status 3"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            TransferError::InvalidDateFormat {
                input: "x".to_string()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            TransferError::SecretAccess {
                secret_name: "s".to_string(),
                message: "denied".to_string()
            }
            .exit_code(),
            4
        );
        assert_eq!(
            TransferError::MissingConfigurationKey {
                key: "k".to_string()
            }
            .exit_code(),
            5
        );
    }

    #[test]
    fn test_command_exit_status_is_propagated() {
        let err = TransferError::ExternalCommandFailed {
            command: "gcloud".to_string(),
            exit_status: Some(17),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.exit_code(), 17);

        let killed = TransferError::ExternalCommandFailed {
            command: "gcloud".to_string(),
            exit_status: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(killed.exit_code(), 5);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: TransferError = io_err.into();
        assert!(matches!(err, TransferError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: TransferError = toml_err.into();
        assert!(matches!(err, TransferError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_transfer_error_implements_std_error() {
        let err = TransferError::SecretFormat("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
