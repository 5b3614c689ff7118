//! Session key value object

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Internal identifier of a session.
///
/// Derived from the caller-supplied session id with a one-way hash, so raw
/// caller ids never reach the registry map or the storage backend. The same
/// caller id always yields the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Hash a caller-supplied id into a key (lowercase SHA-256 hex).
    pub fn derive(id: &str) -> Self {
        let digest = Sha256::digest(id.as_bytes());
        Self(format!("{:x}", digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
