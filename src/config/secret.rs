//! In-memory protection for secret bundle values
//!
//! Every value read from the secret store, and the payload it arrived in, is
//! held as a [`SecretString`]: zeroed on drop, redacted in `Debug`, readable
//! only through `expose_secret()`.
//!
//! ```rust
//! use ga4_transfer::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("eyJ0eXBlIjoic2VydmljZV9hY2NvdW50In0=".to_string());
//! assert!(key.expose_secret().as_str().starts_with("eyJ0"));
//! assert!(!format!("{key:?}").contains("eyJ0"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Text of a single secret value
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretText(String);

impl SecretText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl CloneableSecret for SecretText {}
impl DebugSecret for SecretText {}

impl From<String> for SecretText {
    fn from(s: String) -> Self {
        SecretText(s)
    }
}

/// JSON strings keep their content; any other value keeps its serialized form
impl From<serde_json::Value> for SecretText {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => SecretText(s),
            other => SecretText(other.to_string()),
        }
    }
}

impl AsRef<str> for SecretText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Redacted, zeroizing string
pub type SecretString = Secret<SecretText>;

#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretText::from(value))
}
