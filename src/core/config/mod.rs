//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Repo config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$RFCLEDGER_CONFIG` if set
//! 2. `<repo>/.rfcledger.toml` (canonical)
//!
//! # Example
//!
//! ```no_run
//! use rfcledger::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Path::new("/path/to/repo")).unwrap();
//! let config = result.config;
//!
//! println!("Docs root: {}", config.docs_root());
//! println!("Scan window: {}", config.scan_window());
//! ```

pub mod schema;

pub use schema::RepoConfig;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::corpus::Exclusions;
use crate::core::table::DEFAULT_SCAN_WINDOW;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RFCLEDGER_CONFIG";

/// Canonical config file name at the repository root.
pub const CONFIG_FILE: &str = ".rfcledger.toml";

/// Default document tree root.
pub const DEFAULT_DOCS_ROOT: &str = "docs";

/// File names excluded from discovery unless overridden.
pub const DEFAULT_EXCLUDE_FILES: [&str; 4] = ["README.md", "SUMMARY.md", "about.md", "template.md"];

/// Default archived snapshot segment.
pub const DEFAULT_ARCHIVE_SEGMENT: &str = "previous-versions";

/// Default deprecated subtree segment.
pub const DEFAULT_DEPRECATED_SEGMENT: &str = "deprecated";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Resolved configuration.
///
/// Accessors apply defaults for anything the file leaves unset.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Repository configuration from file (defaults if none found)
    pub repo: RepoConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the repository rooted at `repo_root`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. A missing config file is not an error.
    pub fn load(repo_root: &Path) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(explicit);
            if path.exists() {
                return Self::from_file(path, warnings);
            }
            warnings.push(ConfigWarning {
                message: format!("{CONFIG_ENV} points to a missing file; ignoring it"),
                path,
            });
        }

        let canonical = repo_root.join(CONFIG_FILE);
        if canonical.exists() {
            return Self::from_file(canonical, warnings);
        }

        Ok(ConfigLoadResult {
            config: Config::default(),
            warnings,
        })
    }

    fn from_file(
        path: PathBuf,
        warnings: Vec<ConfigWarning>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let repo = Self::read_repo_config(&path)?;
        repo.validate()?;
        Ok(ConfigLoadResult {
            config: Config {
                repo,
                path: Some(path),
            },
            warnings,
        })
    }

    /// Read and parse a repo config file.
    fn read_repo_config(path: &Path) -> Result<RepoConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the document tree root, relative to the repository root.
    ///
    /// Defaults to "docs".
    pub fn docs_root(&self) -> &str {
        self.repo.docs_root.as_deref().unwrap_or(DEFAULT_DOCS_ROOT)
    }

    /// Get the metadata header scan window.
    ///
    /// Defaults to 140 lines.
    pub fn scan_window(&self) -> usize {
        self.repo.scan_window.unwrap_or(DEFAULT_SCAN_WINDOW)
    }

    /// Get the configured web URL override, if any.
    pub fn repo_url(&self) -> Option<&str> {
        self.repo
            .repo_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
    }

    /// Build the exclusion rules used by discovery and validation.
    pub fn exclusions(&self) -> Exclusions {
        let files: BTreeSet<String> = match &self.repo.exclude_files {
            Some(files) => files.iter().cloned().collect(),
            None => DEFAULT_EXCLUDE_FILES.iter().map(|f| f.to_string()).collect(),
        };
        Exclusions {
            files,
            archive_segment: self
                .repo
                .archive_segment
                .clone()
                .unwrap_or_else(|| DEFAULT_ARCHIVE_SEGMENT.to_string()),
            deprecated_segment: self
                .repo
                .deprecated_segment
                .clone()
                .unwrap_or_else(|| DEFAULT_DEPRECATED_SEGMENT.to_string()),
        }
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        std::env::remove_var(CONFIG_ENV);
        let temp = TempDir::new().unwrap();

        let result = Config::load(temp.path()).unwrap();
        let config = result.config;

        assert_eq!(config.docs_root(), "docs");
        assert_eq!(config.scan_window(), 140);
        assert!(config.repo_url().is_none());
        assert!(config.loaded_from().is_none());

        let exclusions = config.exclusions();
        assert!(exclusions.files.contains("template.md"));
        assert_eq!(exclusions.archive_segment, "previous-versions");
        assert_eq!(exclusions.deprecated_segment, "deprecated");
    }

    #[test]
    fn load_repo_config() {
        std::env::remove_var(CONFIG_ENV);
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            r#"
            docs_root = "rfcs"
            repo_url = "https://github.com/org/rfcs/"
            exclude_files = ["index.md"]
            "#,
        )
        .unwrap();

        let result = Config::load(temp.path()).unwrap();
        let config = result.config;

        assert_eq!(config.docs_root(), "rfcs");
        assert_eq!(config.repo_url(), Some("https://github.com/org/rfcs"));
        let exclusions = config.exclusions();
        assert!(exclusions.files.contains("index.md"));
        assert!(!exclusions.files.contains("README.md"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn invalid_value_rejected() {
        std::env::remove_var(CONFIG_ENV);
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "scan_window = 0").unwrap();

        assert!(matches!(
            Config::load(temp.path()),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn unparsable_file_rejected() {
        std::env::remove_var(CONFIG_ENV);
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "docs_root = ").unwrap();

        assert!(matches!(
            Config::load(temp.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
