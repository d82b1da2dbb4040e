use crate::error::{MockError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Directories created by the overflow policy start with this character, so
/// identities may not.
pub const SHARD_PREFIX: char = '~';

/// Joins service and identity in a mock's file name.
pub const KEY_DELIMITER: char = '_';

/// Addresses one stored mock: a service response recorded for one identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MockKey {
    pub service: String,
    pub identity: String,
}

impl MockKey {
    pub fn new(service: impl Into<String>, identity: impl Into<String>) -> Result<Self> {
        let key = Self {
            service: service.into(),
            identity: identity.into(),
        };
        validate_component("service", &key.service)?;
        validate_component("identity", &key.identity)?;
        if key.identity.starts_with(SHARD_PREFIX) {
            return Err(MockError::InvalidKey(format!(
                "identity '{}' may not start with '{}'",
                key.identity, SHARD_PREFIX
            )));
        }
        Ok(key)
    }

    /// `<service>_<identity><suffix>`
    pub fn file_name(&self, suffix: &str) -> String {
        format!(
            "{}{}{}{}",
            self.service, KEY_DELIMITER, self.identity, suffix
        )
    }

    /// Recovers a key from a stored file name, given the identity directory it
    /// was found in. Returns `None` for files that don't follow the naming scheme.
    pub fn from_file_name(file_name: &str, identity: &str, suffix: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(suffix)?;
        let service = stem
            .strip_suffix(identity)?
            .strip_suffix(KEY_DELIMITER)?;
        Self::new(service, identity).ok()
    }
}

impl std::fmt::Display for MockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.service, self.identity)
    }
}

fn validate_component(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(MockError::InvalidKey(format!("{} must not be empty", what)));
    }
    if value == "." || value == ".." {
        return Err(MockError::InvalidKey(format!(
            "{} '{}' is not a valid name",
            what, value
        )));
    }
    if value.contains(['/', '\\']) {
        return Err(MockError::InvalidKey(format!(
            "{} '{}' must not contain path separators",
            what, value
        )));
    }
    Ok(())
}

/// A stored mock, as reported by listing.
#[derive(Debug, Clone, Serialize)]
pub struct MockEntry {
    pub key: MockKey,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Which branch of `get` produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
    Exact,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub payload: Vec<u8>,
    pub path: PathBuf,
    pub source: LookupSource,
}

/// Fan-out of the storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootStatus {
    pub root: PathBuf,
    pub sub_dirs: usize,
    pub max_entries: usize,
    pub at_capacity: bool,
}

/// A payload made safe for JSON output.
///
/// UTF-8 payloads are carried as text. Anything else is base64, so the
/// original bytes can always be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedPayload {
    pub encoding: PayloadEncoding,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadEncoding {
    Utf8,
    Base64,
}

impl EncodedPayload {
    pub fn new(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self {
                encoding: PayloadEncoding::Utf8,
                data: text.to_string(),
            },
            Err(_) => Self {
                encoding: PayloadEncoding::Base64,
                data: BASE64.encode(bytes),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_joins_with_delimiter_and_suffix() {
        let key = MockKey::new("login", "u1").unwrap();
        assert_eq!(key.file_name(".json"), "login_u1.json");
    }

    #[test]
    fn rejects_empty_and_path_like_components() {
        assert!(MockKey::new("", "u1").is_err());
        assert!(MockKey::new("login", "").is_err());
        assert!(MockKey::new("a/b", "u1").is_err());
        assert!(MockKey::new("login", "..").is_err());
        assert!(MockKey::new("login", "u\\1").is_err());
    }

    #[test]
    fn rejects_identity_with_shard_prefix() {
        let err = MockKey::new("login", "~ab").unwrap_err();
        assert!(matches!(err, MockError::InvalidKey(_)));
        // services are never directory names, so the prefix is fine there
        assert!(MockKey::new("~login", "u1").is_ok());
    }

    #[test]
    fn recovers_key_from_file_name() {
        let key = MockKey::from_file_name("get_orders_u_7.json", "u_7", ".json").unwrap();
        assert_eq!(key.service, "get_orders");
        assert_eq!(key.identity, "u_7");
    }

    #[test]
    fn foreign_file_names_are_not_keys() {
        assert!(MockKey::from_file_name("notes.txt", "u1", ".json").is_none());
        assert!(MockKey::from_file_name("login_u2.json", "u1", ".json").is_none());
        assert!(MockKey::from_file_name("_u1.json", "u1", ".json").is_none());
    }

    #[test]
    fn text_payload_is_encoded_as_utf8() {
        let encoded = EncodedPayload::new("{\"name\":\"Zoë\"}".as_bytes());
        assert_eq!(encoded.encoding, PayloadEncoding::Utf8);
        assert_eq!(encoded.data, "{\"name\":\"Zoë\"}");
    }

    #[test]
    fn binary_payload_is_encoded_as_base64() {
        let encoded = EncodedPayload::new(&[0xff, 0xfe, 0x00]);
        assert_eq!(encoded.encoding, PayloadEncoding::Base64);
        assert_eq!(encoded.data, "//4A");
        assert_eq!(BASE64.decode(&encoded.data).unwrap(), vec![0xff, 0xfe, 0x00]);
    }
}
