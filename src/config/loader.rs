//! Configuration loader with TOML parsing and environment variable overrides
//!
//! The loader never reads the process environment itself. Callers pass the
//! snapshot taken once at startup, which keeps loading deterministic in tests.

use super::schema::{Environment, TransferConfig};
use crate::domain::errors::TransferError;
use crate::domain::result::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from an optional TOML file plus environment overrides
///
/// This function:
/// 1. Reads the TOML file, if one is given
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TransferConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`TransferError::Configuration`] if:
/// - The file cannot be read or parsed
/// - A substituted environment variable is not set
/// - Validation fails
///
/// # Examples
///
/// ```no_run
/// use ga4_transfer::config::load_config;
/// use std::collections::HashMap;
///
/// let env: HashMap<String, String> = std::env::vars().collect();
/// let config = load_config(None, &env).expect("Failed to load config");
/// ```
pub fn load_config(path: Option<&Path>, env: &HashMap<String, String>) -> Result<TransferConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path, env)?,
        None => TransferConfig::default(),
    };

    apply_env_overrides(&mut config, env)?;

    config.validate().map_err(|e| {
        TransferError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn read_config_file(path: &Path, env: &HashMap<String, String>) -> Result<TransferConfig> {
    if !path.exists() {
        return Err(TransferError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TransferError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents, env)?;

    Ok(toml::from_str(&contents)?)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str, env: &HashMap<String, String>) -> Result<String> {
    let re = placeholder_regex();
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed_line = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match env.get(var_name) {
                Some(value) => value.clone(),
                None => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TransferError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn non_empty<'a>(env: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    env.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(TransferError::Configuration(format!(
            "{name} must be a boolean, got: {other}"
        ))),
    }
}

/// Applies environment variable overrides
///
/// Deployment variables keep the names the batch job definition already
/// uses; job-local settings use the `GA4_TRANSFER_` prefix.
fn apply_env_overrides(config: &mut TransferConfig, env: &HashMap<String, String>) -> Result<()> {
    // Application overrides
    if let Some(val) = non_empty(env, "ENV") {
        config.application.environment = Environment::from_env_value(val);
    }
    if let Some(val) = non_empty(env, "GA4_TRANSFER_LOG_LEVEL") {
        config.application.log_level = val.to_string();
    }

    // Secret store overrides
    if let Some(val) = non_empty(env, "AWS_REGION") {
        config.aws.region = val.to_string();
    }
    if let Some(val) = non_empty(env, "AWS_SECRETS_MANAGER_NAME") {
        config.aws.secret_name = val.to_string();
    }
    if let Some(val) = non_empty(env, "AWS_PROFILE_NAME") {
        config.aws.profile_name = Some(val.to_string());
    }
    // Presence alone marks a batch job, even when empty
    if let Some(val) = env.get("AWS_BATCH_JOB_ID") {
        config.aws.batch_job_id = Some(val.clone());
    }

    // Warehouse overrides
    if let Some(val) = non_empty(env, "GCS_REGION_NAME") {
        config.gcp.region = val.to_string();
    }
    if let Some(val) = non_empty(env, "GA4_TRANSFER_CREDENTIALS_PATH") {
        config.gcp.credentials_path = val.into();
    }
    if let Some(val) = non_empty(env, "GA4_TRANSFER_SDK_BIN_DIR") {
        config.gcp.sdk_bin_dir = val.into();
    }
    if let Some(val) = non_empty(env, "GA4_TRANSFER_KEEP_CREDENTIALS") {
        config.gcp.keep_credentials = parse_bool("GA4_TRANSFER_KEEP_CREDENTIALS", val)?;
    }

    // Secret key name overrides
    if let Some(val) = non_empty(env, "AWS_SECRETS_MANAGER_BIGQUERY_DATASET_ID") {
        config.secret_keys.dataset_id = val.to_string();
    }
    if let Some(val) = non_empty(env, "AWS_SECRETS_MANAGER_BASE64_ENCODED_KEY_NAME") {
        config.secret_keys.base64_credentials = val.to_string();
    }
    if let Some(val) = non_empty(env, "AWS_SECRETS_MANAGER_GCS_EXPORT_URI") {
        config.secret_keys.export_uri = val.to_string();
    }
    if let Some(val) = non_empty(env, "AWS_SECRETS_MANAGER_S3_TRANSFER_URI") {
        config.secret_keys.transfer_uri = val.to_string();
    }

    // Logging overrides
    if let Some(val) = non_empty(env, "GA4_TRANSFER_LOG_DIR") {
        config.logging.local_enabled = true;
        config.logging.local_path = val.to_string();
    }
    if let Some(val) = non_empty(env, "GA4_TRANSFER_LOG_ROTATION") {
        config.logging.local_rotation = val.to_string();
    }

    Ok(())
}
