//! Execution context for external tool invocations
//!
//! Built once at startup from the process environment snapshot plus the
//! variables the pipeline injects, then passed immutably to every command.

use crate::config::{Identity, TransferConfig};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Points Google client libraries and tools at the credential document
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

#[cfg(windows)]
const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_SEPARATOR: char = ':';

/// Environment handed to every external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    vars: BTreeMap<String, String>,
}

impl ExecutionContext {
    /// Builds the context from an environment snapshot
    ///
    /// Injects:
    /// - `GOOGLE_APPLICATION_CREDENTIALS` set to the credential file path
    /// - the SDK bin directory appended to `PATH`
    /// - `AWS_PROFILE` when a named profile is in use
    pub fn new(snapshot: &HashMap<String, String>, config: &TransferConfig) -> Self {
        let mut vars: BTreeMap<String, String> = snapshot
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        vars.insert(
            CREDENTIALS_ENV.to_string(),
            config.gcp.credentials_path.to_string_lossy().into_owned(),
        );

        let path = append_search_path(vars.get("PATH").map(String::as_str), &config.gcp.sdk_bin_dir);
        vars.insert("PATH".to_string(), path);

        if let Identity::Profile(profile) = config.aws.identity() {
            vars.insert("AWS_PROFILE".to_string(), profile);
        }

        Self { vars }
    }

    /// Looks up a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Iterates over all variables in key order
    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn append_search_path(current: Option<&str>, dir: &Path) -> String {
    let dir = dir.to_string_lossy();
    match current {
        None | Some("") => dir.into_owned(),
        Some(current) if current.split(PATH_SEPARATOR).any(|entry| entry == dir) => {
            current.to_string()
        }
        Some(current) => format!("{current}{PATH_SEPARATOR}{dir}"),
    }
}
