//! Secret bundle
//!
//! The decoded JSON configuration/secret payload fetched from the secret store.
//! Values are held as [`SecretString`]s so they are redacted from debug output
//! and zeroized on drop.

use crate::config::{secret_string, SecretString, SecretText};
use crate::domain::errors::TransferError;
use crate::domain::Result;
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;
use std::fmt;

/// Flat mapping from configuration-key names to string values
#[derive(Clone, Default)]
pub struct SecretBundle {
    entries: HashMap<String, SecretString>,
}

impl SecretBundle {
    /// Parses a secret store payload
    ///
    /// The payload must be a JSON object. String values are taken as-is; any
    /// other JSON value is kept in its serialized form.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::SecretFormat`] if the payload is not a JSON object.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| TransferError::SecretFormat(e.to_string()))?;

        let serde_json::Value::Object(map) = value else {
            return Err(TransferError::SecretFormat(
                "expected a JSON object at the top level".to_string(),
            ));
        };

        let entries = map
            .into_iter()
            .map(|(key, value)| (key, Secret::new(SecretText::from(value))))
            .collect();

        Ok(Self { entries })
    }

    /// Looks up a value by key name
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::MissingConfigurationKey`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(|value| value.expose_secret().as_str())
            .ok_or_else(|| TransferError::MissingConfigurationKey {
                key: key.to_string(),
            })
    }

    /// Returns true if the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the bundle has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("SecretBundle").field("keys", &keys).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), secret_string(v.into())))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_object() {
        let bundle = SecretBundle::from_json(r#"{"dataset": "p:d", "port": 5432}"#).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.get("dataset").unwrap(), "p:d");
        assert_eq!(bundle.get("port").unwrap(), "5432");
    }

    #[test]
    fn test_from_json_not_json() {
        let result = SecretBundle::from_json("not json");
        assert!(matches!(result, Err(TransferError::SecretFormat(_))));
    }

    #[test]
    fn test_from_json_not_object() {
        let result = SecretBundle::from_json(r#"["a", "b"]"#);
        assert!(matches!(result, Err(TransferError::SecretFormat(_))));
    }

    #[test]
    fn test_missing_key() {
        let bundle: SecretBundle = [("a", "1")].into_iter().collect();
        match bundle.get("b") {
            Err(TransferError::MissingConfigurationKey { key }) => assert_eq!(key, "b"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_debug_does_not_expose_values() {
        let bundle: SecretBundle = [("credential", "super-secret-value")].into_iter().collect();
        let debug = format!("{bundle:?}");
        assert!(debug.contains("credential"));
        assert!(!debug.contains("super-secret-value"));
    }
}
