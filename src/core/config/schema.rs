//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Repo Config
//!
//! Located at (in order of precedence):
//! 1. `$RFCLEDGER_CONFIG` if set
//! 2. `<repo>/.rfcledger.toml`
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad file fails the
//! run up front instead of producing confusing diagnostics later.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Repository configuration.
///
/// Every field is optional; unset fields fall back to the built-in defaults
/// exposed by [`super::Config`].
///
/// # Example
///
/// ```toml
/// docs_root = "docs"
/// scan_window = 140
/// repo_url = "https://github.com/org/rfcs"
/// exclude_files = ["README.md", "SUMMARY.md", "about.md", "template.md"]
/// archive_segment = "previous-versions"
/// deprecated_segment = "deprecated"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Document tree root, relative to the repository root.
    pub docs_root: Option<String>,

    /// Number of leading lines searched for the metadata header.
    pub scan_window: Option<usize>,

    /// Web URL used to link timeline entries, overriding the origin remote.
    pub repo_url: Option<String>,

    /// File names that are never treated as documents.
    pub exclude_files: Option<Vec<String>>,

    /// Path segment marking archived previous-version snapshots.
    pub archive_segment: Option<String>,

    /// Path segment marking deprecated documents.
    pub deprecated_segment: Option<String>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.docs_root {
            if root.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "docs_root cannot be empty".to_string(),
                ));
            }
        }

        if let Some(window) = self.scan_window {
            if window < 2 {
                return Err(ConfigError::InvalidValue(format!(
                    "scan_window must be at least 2, got {window}"
                )));
            }
        }

        if let Some(url) = &self.repo_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "repo_url must be an http(s) URL, got '{url}'"
                )));
            }
        }

        for (name, segment) in [
            ("archive_segment", &self.archive_segment),
            ("deprecated_segment", &self.deprecated_segment),
        ] {
            if let Some(segment) = segment {
                if segment.is_empty() || segment.contains('/') {
                    return Err(ConfigError::InvalidValue(format!(
                        "{name} must be a single path segment, got '{segment}'"
                    )));
                }
            }
        }

        Ok(())
    }
}
