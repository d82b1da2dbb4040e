//! # Configuration
//!
//! The store is configured from a properties file. A [`StoreConfig`] is loaded
//! once at startup and handed to [`crate::store::mock_store::MockStore`] by value;
//! there is no process-wide configuration. Loading twice simply yields two
//! independent values.
//!
//! ## Locations
//!
//! | Source | File read |
//! |--------|-----------|
//! | [`ConfigSource::Default`] | `./mockConfig.properties` |
//! | [`ConfigSource::Dir`] | `<dir>/mockConfig.properties` |
//! | [`ConfigSource::Named`] | `<dir>/<name>.properties` |
//! | [`ConfigSource::File`] | the given path |
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `mockFolderPath` | (required) | Root directory of the mock tree |
//! | `mockFolderMaxEntries` | `5` | Sub-directories per level before sharding |
//! | `fileExtension` | `.json` | Suffix of stored mock files |
//! | `fallbackOnMissingIdentity` | `true` | Search by service when the identity has no directory |

use crate::error::{MockError, Result};
use crate::properties::Properties;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "mockConfig";
pub const DEFAULT_MAX_ENTRIES: usize = 5;
pub const DEFAULT_FILE_SUFFIX: &str = ".json";

pub const KEY_FOLDER_PATH: &str = "mockFolderPath";
pub const KEY_MAX_ENTRIES: &str = "mockFolderMaxEntries";
pub const KEY_FILE_EXTENSION: &str = "fileExtension";
pub const KEY_FALLBACK_ON_MISSING_IDENTITY: &str = "fallbackOnMissingIdentity";

const KNOWN_KEYS: [&str; 4] = [
    KEY_FOLDER_PATH,
    KEY_MAX_ENTRIES,
    KEY_FILE_EXTENSION,
    KEY_FALLBACK_ON_MISSING_IDENTITY,
];

/// Where to read the configuration from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `mockConfig.properties` in the working directory.
    Default,
    /// `mockConfig.properties` in the given directory.
    Dir(PathBuf),
    /// `<name>.properties` in the given directory.
    Named { name: String, dir: PathBuf },
    /// An explicit file path.
    File(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> PathBuf {
        let default_file = format!("{}.properties", DEFAULT_CONFIG_NAME);
        match self {
            ConfigSource::Default => PathBuf::from(default_file),
            ConfigSource::Dir(dir) => dir.join(default_file),
            ConfigSource::Named { name, dir } => dir.join(format!("{}.properties", name)),
            ConfigSource::File(path) => path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreConfig {
    pub root_path: PathBuf,
    pub max_entries_per_dir: usize,
    pub file_suffix: String,
    pub fallback_on_missing_identity: bool,
}

impl StoreConfig {
    /// A config rooted at `root_path` with every optional setting at its default.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            max_entries_per_dir: DEFAULT_MAX_ENTRIES,
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            fallback_on_missing_identity: true,
        }
    }

    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries_per_dir = max.max(1);
        self
    }

    pub fn with_file_suffix(mut self, suffix: &str) -> Self {
        self.file_suffix = normalize_suffix(suffix);
        self
    }

    pub fn with_fallback_on_missing_identity(mut self, enabled: bool) -> Self {
        self.fallback_on_missing_identity = enabled;
        self
    }

    pub fn load(source: &ConfigSource) -> Result<Self> {
        Self::load_file(&source.path())
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let props = read_properties(path)?;
        Self::build(path, &props)
    }

    /// Load with `mockFolderPath` replaced by `root`, when given.
    ///
    /// With a root override the default source is optional: if
    /// `./mockConfig.properties` does not exist, every other setting takes its
    /// default. Explicitly named sources must still exist.
    pub fn load_with_root(source: &ConfigSource, root: Option<&Path>) -> Result<Self> {
        let path = source.path();
        let Some(root) = root else {
            return Self::load_file(&path);
        };

        let mut props = if *source == ConfigSource::Default && !path.exists() {
            Properties::default()
        } else {
            read_properties(&path)?
        };
        props.set(KEY_FOLDER_PATH, root.to_string_lossy());
        Self::build(&path, &props)
    }

    fn build(path: &Path, props: &Properties) -> Result<Self> {
        let config = Self::from_properties(props).map_err(|e| match e {
            MockError::ConfigUnreadable { reason, .. } => MockError::ConfigUnreadable {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), root = %config.root_path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_properties(props: &Properties) -> Result<Self> {
        for key in props.keys().filter(|k| !KNOWN_KEYS.contains(k)) {
            tracing::debug!(key, "ignoring unknown configuration key");
        }

        let root = props
            .get_non_blank(KEY_FOLDER_PATH)
            .ok_or_else(|| MockError::ConfigMissing(KEY_FOLDER_PATH.to_string()))?;

        let mut config = Self::new(root);

        if let Some(raw) = props.get_non_blank(KEY_MAX_ENTRIES) {
            config.max_entries_per_dir = parse_max_entries(raw)?;
        }
        if let Some(suffix) = props.get_non_blank(KEY_FILE_EXTENSION) {
            config.file_suffix = normalize_suffix(suffix);
        }
        if let Some(raw) = props.get_non_blank(KEY_FALLBACK_ON_MISSING_IDENTITY) {
            config.fallback_on_missing_identity = parse_bool(KEY_FALLBACK_ON_MISSING_IDENTITY, raw)?;
        }

        Ok(config)
    }
}

fn read_properties(path: &Path) -> Result<Properties> {
    let unreadable = |reason: String| MockError::ConfigUnreadable {
        path: path.to_path_buf(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    Properties::parse(&content).map_err(|e| unreadable(e.to_string()))
}

fn parse_max_entries(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(invalid_value(
            KEY_MAX_ENTRIES,
            raw,
            "expected a positive integer",
        )),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(invalid_value(key, raw, "expected true or false")),
    }
}

fn invalid_value(key: &str, raw: &str, expected: &str) -> MockError {
    MockError::ConfigUnreadable {
        path: PathBuf::new(),
        reason: format!("invalid {} '{}': {}", key, raw, expected),
    }
}

/// Ensures the suffix starts with a dot.
fn normalize_suffix(suffix: &str) -> String {
    if suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{}", suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(input: &str) -> Properties {
        Properties::parse(input).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = StoreConfig::from_properties(&props("mockFolderPath=./mocks")).unwrap();
        assert_eq!(config.root_path, PathBuf::from("./mocks"));
        assert_eq!(config.max_entries_per_dir, 5);
        assert_eq!(config.file_suffix, ".json");
        assert!(config.fallback_on_missing_identity);
    }

    #[test]
    fn test_all_keys_read() {
        let input = "mockFolderPath = /tmp/m\nmockFolderMaxEntries = 2\nfileExtension = .txt\nfallbackOnMissingIdentity = false\n";
        let config = StoreConfig::from_properties(&props(input)).unwrap();
        assert_eq!(config.root_path, PathBuf::from("/tmp/m"));
        assert_eq!(config.max_entries_per_dir, 2);
        assert_eq!(config.file_suffix, ".txt");
        assert!(!config.fallback_on_missing_identity);
    }

    #[test]
    fn test_missing_root_is_config_missing() {
        let err = StoreConfig::from_properties(&props("fileExtension=.json")).unwrap_err();
        assert!(matches!(err, MockError::ConfigMissing(ref k) if k == "mockFolderPath"));
    }

    #[test]
    fn test_blank_root_is_config_missing() {
        let err = StoreConfig::from_properties(&props("mockFolderPath=   ")).unwrap_err();
        assert!(matches!(err, MockError::ConfigMissing(_)));
    }

    #[test]
    fn test_suffix_normalization_without_dot() {
        let config =
            StoreConfig::from_properties(&props("mockFolderPath=m\nfileExtension=xml")).unwrap();
        assert_eq!(config.file_suffix, ".xml");
    }

    #[test]
    fn test_invalid_max_entries_rejected() {
        for bad in ["0", "-3", "many"] {
            let input = format!("mockFolderPath=m\nmockFolderMaxEntries={}", bad);
            let err = StoreConfig::from_properties(&props(&input)).unwrap_err();
            assert!(
                matches!(err, MockError::ConfigUnreadable { .. }),
                "expected rejection for {}",
                bad
            );
        }
    }

    #[test]
    fn test_source_paths() {
        assert_eq!(
            ConfigSource::Default.path(),
            PathBuf::from("mockConfig.properties")
        );
        assert_eq!(
            ConfigSource::Dir(PathBuf::from("/etc/app")).path(),
            PathBuf::from("/etc/app/mockConfig.properties")
        );
        assert_eq!(
            ConfigSource::Named {
                name: "qa".to_string(),
                dir: PathBuf::from("/etc/app"),
            }
            .path(),
            PathBuf::from("/etc/app/qa.properties")
        );
    }

    #[test]
    fn test_load_missing_file_is_unreadable() {
        let temp = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(&ConfigSource::Dir(temp.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, MockError::ConfigUnreadable { .. }));
    }

    #[test]
    fn test_load_named_file() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("staging.properties"),
            "mockFolderPath=./staging-mocks\nmockFolderMaxEntries=9\n",
        )
        .unwrap();

        let config = StoreConfig::load(&ConfigSource::Named {
            name: "staging".to_string(),
            dir: temp.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(config.root_path, PathBuf::from("./staging-mocks"));
        assert_eq!(config.max_entries_per_dir, 9);
    }

    #[test]
    fn test_root_override_replaces_configured_root() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("mockConfig.properties"),
            "mockFolderPath=./configured\nmockFolderMaxEntries=3\n",
        )
        .unwrap();

        let source = ConfigSource::Dir(temp.path().to_path_buf());
        let config = StoreConfig::load_with_root(&source, Some(Path::new("/elsewhere"))).unwrap();
        assert_eq!(config.root_path, PathBuf::from("/elsewhere"));
        assert_eq!(config.max_entries_per_dir, 3);
    }

    #[test]
    fn test_root_override_still_requires_explicit_source() {
        let temp = tempfile::tempdir().unwrap();
        let source = ConfigSource::Dir(temp.path().to_path_buf());
        let err = StoreConfig::load_with_root(&source, Some(Path::new("/elsewhere"))).unwrap_err();
        assert!(matches!(err, MockError::ConfigUnreadable { .. }));
    }

    #[test]
    fn test_unreadable_value_reports_file_path() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("mockConfig.properties");
        fs::write(&file, "mockFolderPath=m\nmockFolderMaxEntries=zero\n").unwrap();

        match StoreConfig::load_file(&file).unwrap_err() {
            MockError::ConfigUnreadable { path, reason } => {
                assert_eq!(path, file);
                assert!(reason.contains("mockFolderMaxEntries"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
