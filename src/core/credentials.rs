//! Credential materialization
//!
//! The secret bundle carries the warehouse service-account document as a
//! base64 string. This module decodes it, checks that it is JSON, and writes
//! it back out pretty-printed to the path the tools read credentials from.
//!
//! The written file is owner read/write only and is removed when the returned
//! [`CredentialFile`] guard is dropped, unless the guard was told to keep it.

use crate::domain::{Result, SecretBundle, TransferError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Credential document on disk
///
/// Removing the file is best effort; failures are logged, not returned.
#[derive(Debug)]
pub struct CredentialFile {
    path: PathBuf,
    keep: bool,
}

impl CredentialFile {
    /// Path of the written document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leave the file on disk when the guard is dropped
    pub fn keep_on_drop(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }
}

impl Drop for CredentialFile {
    fn drop(&mut self) {
        if self.keep {
            tracing::debug!(path = %self.path.display(), "Keeping credential file");
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed credential file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove credential file"
            ),
        }
    }
}

/// Decodes a base64 credential value into a JSON document
///
/// ASCII whitespace inside the encoded value (line wrapping) is ignored.
///
/// # Errors
///
/// - [`TransferError::InvalidCredentialEncoding`] if the value is not base64 or not UTF-8
/// - [`TransferError::InvalidCredentialFormat`] if the decoded text is not JSON
pub fn decode_credential(encoded: &str) -> Result<serde_json::Value> {
    let compact: Zeroizing<String> = Zeroizing::new(
        encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect(),
    );

    let bytes = Zeroizing::new(
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| TransferError::InvalidCredentialEncoding(e.to_string()))?,
    );

    let text = std::str::from_utf8(&bytes).map_err(|e| {
        TransferError::InvalidCredentialEncoding(format!("decoded value is not UTF-8: {e}"))
    })?;

    serde_json::from_str(text).map_err(|e| TransferError::InvalidCredentialFormat(e.to_string()))
}

/// Materializes the credential document from the secret bundle
///
/// Looks up `key_name` in `bundle`, decodes and validates the value, and
/// writes it as indented UTF-8 JSON to `destination`, replacing any existing
/// file.
///
/// # Errors
///
/// - [`TransferError::MissingConfigurationKey`] if `key_name` is absent
/// - [`TransferError::InvalidCredentialEncoding`] / [`TransferError::InvalidCredentialFormat`]
///   if the value cannot be decoded
/// - [`TransferError::Io`] if the file cannot be written
pub fn materialize(
    bundle: &SecretBundle,
    key_name: &str,
    destination: &Path,
) -> Result<CredentialFile> {
    let encoded = bundle.get(key_name)?;
    let document = decode_credential(encoded)?;

    let rendered = Zeroizing::new(
        serde_json::to_string_pretty(&document)
            .map_err(|e| TransferError::InvalidCredentialFormat(e.to_string()))?,
    );

    write_owner_only(destination, rendered.as_bytes()).map_err(|e| {
        TransferError::Io(format!(
            "Failed to write credential file {}: {}",
            destination.display(),
            e
        ))
    })?;

    tracing::info!(path = %destination.display(), "Credential file written");

    Ok(CredentialFile {
        path: destination.to_path_buf(),
        keep: false,
    })
}

fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    // Unlink first so a planted symlink is replaced rather than followed
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bundle_with(key: &str, value: &str) -> SecretBundle {
        [(key, value)].into_iter().collect()
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let bundle = bundle_with("CREDS", &STANDARD.encode(r#"{"a":1}"#));

        let file = materialize(&bundle, "CREDS", &path).unwrap();
        assert_eq!(file.path(), path.as_path());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_output_is_indented_and_keeps_unicode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let bundle = bundle_with(
            "CREDS",
            &STANDARD.encode(r#"{"type":"service_account","name":"東京"}"#),
        );

        let _file = materialize(&bundle, "CREDS", &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"type\": \"service_account\""));
        assert!(text.contains("東京"));
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "stale contents that are longer than the new document").unwrap();

        let bundle = bundle_with("CREDS", &STANDARD.encode("{}"));
        let _file = materialize(&bundle, "CREDS", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let bundle = bundle_with("CREDS", &STANDARD.encode("{}"));
        let _file = materialize(&bundle, "CREDS", &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_at_destination_is_replaced_not_followed() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("victim.txt");
        let path = dir.path().join("credentials.json");
        fs::write(&target, "original").unwrap();
        std::os::unix::fs::symlink(&target, &path).unwrap();

        let bundle = bundle_with("CREDS", &STANDARD.encode(r#"{"private_key":"x"}"#));
        let file = materialize(&bundle, "CREDS", &path).unwrap();

        assert!(!fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");

        drop(file);
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn test_guard_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let bundle = bundle_with("CREDS", &STANDARD.encode("{}"));

        let file = materialize(&bundle, "CREDS", &path).unwrap();
        assert!(path.exists());
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_guard_can_keep_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let bundle = bundle_with("CREDS", &STANDARD.encode("{}"));

        let file = materialize(&bundle, "CREDS", &path)
            .unwrap()
            .keep_on_drop(true);
        drop(file);
        assert!(path.exists());
    }

    #[test]
    fn test_missing_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let bundle = bundle_with("OTHER", "e30=");

        let err = materialize(&bundle, "CREDS", &path).unwrap_err();
        assert!(matches!(err, TransferError::MissingConfigurationKey { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_credential("not base64!!").unwrap_err();
        assert!(matches!(err, TransferError::InvalidCredentialEncoding(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = decode_credential(&STANDARD.encode([0xffu8, 0xfe, 0xfd])).unwrap_err();
        assert!(matches!(err, TransferError::InvalidCredentialEncoding(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = decode_credential(&STANDARD.encode("not json")).unwrap_err();
        assert!(matches!(err, TransferError::InvalidCredentialFormat(_)));
    }

    #[test]
    fn test_wrapped_base64_is_accepted() {
        let encoded = STANDARD.encode(r#"{"client_email":"svc@example.iam"}"#);
        let (head, tail) = encoded.split_at(10);
        let wrapped = format!("{head}\n{tail}\n");
        let document = decode_credential(&wrapped).unwrap();
        assert_eq!(document["client_email"], "svc@example.iam");
    }
}
