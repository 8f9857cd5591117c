//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Slug`] - Positive integer document identifier
//! - [`Status`] - Document lifecycle status
//! - [`Category`] - Document category
//! - [`CommitId`] - Git commit identifier (SHA)
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so a parsed table value either becomes one of
//! these types or is reported as an issue.
//!
//! # Examples
//!
//! ```
//! use rfcledger::core::types::{CommitId, Slug, Status};
//!
//! let slug = Slug::parse("17").unwrap();
//! assert_eq!(slug.get(), 17);
//! assert!(Slug::parse("017").is_err());
//!
//! assert_eq!(Status::parse("Draft"), Some(Status::Draft));
//!
//! let id = CommitId::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! assert_eq!(id.short(7), "abc123d");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid slug: {0}")]
    InvalidSlug(String),

    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),
}

/// A validated document slug.
///
/// Slugs are positive integers written without leading zeros or signs:
/// `1`, `42`, `1000`. Values such as `0`, `007`, `+3` and `3.0` are rejected.
///
/// # Example
///
/// ```
/// use rfcledger::core::types::Slug;
///
/// assert_eq!(Slug::parse("42").unwrap().to_string(), "42");
/// assert!(Slug::parse("0").is_err());
/// assert!(Slug::parse("").is_err());
/// assert!(Slug::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Slug(u32);

impl Slug {
    /// Create a slug from an integer.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSlug` for zero.
    pub fn new(value: u32) -> Result<Self, TypeError> {
        if value == 0 {
            return Err(TypeError::InvalidSlug("slug must be positive".into()));
        }
        Ok(Self(value))
    }

    /// Parse a slug from its table representation.
    ///
    /// The input must match `[1-9][0-9]*` exactly; surrounding whitespace is
    /// not accepted here (callers trim cell values first).
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let mut chars = text.chars();
        match chars.next() {
            Some('1'..='9') => {}
            _ => {
                return Err(TypeError::InvalidSlug(format!(
                    "'{text}' is not a positive integer"
                )))
            }
        }
        if !chars.all(|c| c.is_ascii_digit()) {
            return Err(TypeError::InvalidSlug(format!(
                "'{text}' is not a positive integer"
            )));
        }
        let value: u32 = text
            .parse()
            .map_err(|_| TypeError::InvalidSlug(format!("'{text}' is out of range")))?;
        Self::new(value)
    }

    /// Get the numeric value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The slug that follows this one, if representable.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// The smallest slug.
    pub fn first() -> Self {
        Self(1)
    }
}

impl TryFrom<u32> for Slug {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Slug> for u32 {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Raw,
    Draft,
    Stable,
    Deprecated,
    Deleted,
}

impl Status {
    /// All statuses in declaration order.
    pub const ALL: [Status; 5] = [
        Status::Raw,
        Status::Draft,
        Status::Stable,
        Status::Deprecated,
        Status::Deleted,
    ];

    /// Parse a status value, ignoring case and surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        let wanted = text.trim().to_lowercase();
        Self::ALL.into_iter().find(|s| s.as_str() == wanted)
    }

    /// The canonical lowercase spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Raw => "raw",
            Status::Draft => "draft",
            Status::Stable => "stable",
            Status::Deprecated => "deprecated",
            Status::Deleted => "deleted",
        }
    }

    /// Whether a document under a deprecated subtree may carry this status.
    pub fn is_retired(&self) -> bool {
        matches!(self, Status::Deprecated | Status::Deleted)
    }

    /// Allowed values, sorted alphabetically and comma separated.
    pub fn allowed_list() -> String {
        let mut names: Vec<_> = Self::ALL.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    StandardsTrack,
    Informational,
    BestCurrentPractice,
    Process,
    Infrastructure,
    Networking,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 6] = [
        Category::StandardsTrack,
        Category::Informational,
        Category::BestCurrentPractice,
        Category::Process,
        Category::Infrastructure,
        Category::Networking,
    ];

    /// Parse a category value, ignoring case and surrounding whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use rfcledger::core::types::Category;
    ///
    /// assert_eq!(Category::parse("Standards Track"), Some(Category::StandardsTrack));
    /// assert_eq!(Category::parse("speculative"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let wanted = text.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == wanted)
    }

    /// The canonical lowercase spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::StandardsTrack => "standards track",
            Category::Informational => "informational",
            Category::BestCurrentPractice => "best current practice",
            Category::Process => "process",
            Category::Infrastructure => "infrastructure",
            Category::Networking => "networking",
        }
    }

    /// Allowed values, sorted alphabetically and comma separated.
    pub fn allowed_list() -> String {
        let mut names: Vec<_> = Self::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Git commit identifier (SHA-1 or SHA-256).
///
/// Identifiers are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use rfcledger::core::types::CommitId;
///
/// let id = CommitId::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(id.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(id.short(7), "abc123d");
/// assert!(CommitId::new("not-a-sha").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(String);

impl CommitId {
    /// Create a new validated commit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitId` if the string is not a full hex id.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into().to_ascii_lowercase();
        if id.len() != 40 && id.len() != 64 {
            return Err(TypeError::InvalidCommitId(format!(
                "expected 40 or 64 hex characters, got {}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidCommitId(
                "commit id must be hexadecimal".into(),
            ));
        }
        Ok(Self(id))
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters, or the full id if shorter.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.0
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
