//! Location value types and decoding errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parsed query string: decoded key to decoded value.
pub type Query = BTreeMap<String, String>;

/// A parsed path + query + fragment.
///
/// Locations are values: every state transition builds a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Decoded pathname. Absolute unless it was given relative with no base.
    #[serde(default = "default_pathname")]
    pub pathname: String,

    /// Empty or starting with `?`.
    #[serde(default)]
    pub search: String,

    /// Empty or starting with `#`.
    #[serde(default)]
    pub hash: String,

    /// Derived from `search`.
    #[serde(default)]
    pub query: Query,

    /// Opaque identifier distinguishing otherwise identical locations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

fn default_pathname() -> String {
    "/".to_string()
}

impl Location {
    /// Rebuild the full path (`pathname + search + hash`).
    pub fn path(&self) -> String {
        let mut path = String::with_capacity(self.pathname.len() + self.search.len() + self.hash.len());
        path.push_str(&self.pathname);
        path.push_str(&self.search);
        path.push_str(&self.hash);
        path
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            pathname: default_pathname(),
            search: String::new(),
            hash: String::new(),
            query: Query::new(),
            key: None,
        }
    }
}

/// Structured location input. Missing parts take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialLocation {
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
}

impl PartialLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// Anything `create_location` accepts: a raw path string or structured parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationInput {
    Path(String),
    Parts(PartialLocation),
}

impl From<&str> for LocationInput {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for LocationInput {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<PartialLocation> for LocationInput {
    fn from(parts: PartialLocation) -> Self {
        Self::Parts(parts)
    }
}

/// The pathname contained a malformed percent-escape sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Pathname \"{pathname}\" could not be decoded.")]
pub struct DecodingError {
    /// The raw pathname as it was given.
    pub pathname: String,
}

impl DecodingError {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
        }
    }
}
