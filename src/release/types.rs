use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::release::error::FormatError;
use crate::release::semver::is_prerelease;

/// One published Electron release as listed in the releases feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub version: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(rename = "npm_dist_tags", default)]
    pub dist_tags: Vec<String>,
    /// Bundled dependency versions; absent on some entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<IndexMap<String, String>>,
    /// Identity and display fields (name, node_id, tag_name, ...) carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ReleaseRecord {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            prerelease: false,
            published_at: None,
            dist_tags: Vec::new(),
            deps: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Whether the Electron version itself is a prerelease.
    ///
    /// The version string decides; the feed's `prerelease` flag is only
    /// consulted when the version does not parse.
    pub fn is_prerelease(&self) -> bool {
        is_prerelease(&self.version).unwrap_or(self.prerelease)
    }

    pub fn has_dist_tag(&self, tag: &str) -> bool {
        self.dist_tags.iter().any(|t| t == tag)
    }

    pub fn dependency(&self, key: DependencyKey) -> Option<&str> {
        self.deps
            .as_ref()
            .and_then(|deps| deps.get(key.as_str()))
            .map(String::as_str)
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// The full ordered list of releases, in feed order (newest first as published)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    releases: Vec<ReleaseRecord>,
}

impl Manifest {
    pub fn new(releases: Vec<ReleaseRecord>) -> Self {
        Self { releases }
    }

    /// Parses a JSON payload that must be an array of release objects
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let kind = match &value {
            Value::Array(_) => None,
            Value::Object(_) => Some("an object"),
            Value::String(_) => Some("a string"),
            Value::Number(_) => Some("a number"),
            Value::Bool(_) => Some("a boolean"),
            Value::Null => Some("null"),
        };
        if let Some(kind) = kind {
            return Err(FormatError::NotAnArray(kind));
        }

        let releases: Vec<ReleaseRecord> = serde_json::from_value(value)?;
        Ok(Self { releases })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReleaseRecord> {
        self.releases.iter()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

/// Components bundled with an Electron release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKey {
    Chrome,
    Modules,
    Node,
    Openssl,
    Uv,
    V8,
    Zlib,
}

impl DependencyKey {
    pub const ALL: [DependencyKey; 7] = [
        DependencyKey::Chrome,
        DependencyKey::Modules,
        DependencyKey::Node,
        DependencyKey::Openssl,
        DependencyKey::Uv,
        DependencyKey::V8,
        DependencyKey::Zlib,
    ];

    /// Key used in the feed's `deps` object
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKey::Chrome => "chrome",
            DependencyKey::Modules => "modules",
            DependencyKey::Node => "node",
            DependencyKey::Openssl => "openssl",
            DependencyKey::Uv => "uv",
            DependencyKey::V8 => "v8",
            DependencyKey::Zlib => "zlib",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DependencyKey::Chrome => "Chrome",
            DependencyKey::Modules => "Node.js Modules",
            DependencyKey::Node => "Node.js",
            DependencyKey::Openssl => "OpenSSL",
            DependencyKey::Uv => "uv",
            DependencyKey::V8 => "V8",
            DependencyKey::Zlib => "zlib",
        }
    }
}

impl FromStr for DependencyKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DependencyKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown dependency \"{}\"", s))
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a version expression is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Electron,
    Dependency(DependencyKey),
}

impl Target {
    /// The version string of `record` this target compares, if the record has one
    pub fn value_of<'r>(&self, record: &'r ReleaseRecord) -> Option<&'r str> {
        match self {
            Target::Electron => Some(record.version.as_str()),
            Target::Dependency(key) => record.dependency(*key),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Electron => "electron",
            Target::Dependency(key) => key.as_str(),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "electron" {
            Ok(Target::Electron)
        } else {
            s.parse().map(Target::Dependency)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call resolution settings
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionOptions {
    /// Bypass the snapshot and always fetch
    pub force_update: bool,
    pub include_prereleases: bool,
    /// Maximum number of results, 0 means unlimited
    pub limit: usize,
    /// URL or local path used instead of the configured releases source
    pub source_override: Option<String>,
    /// Fail on unparseable expressions instead of returning no matches
    pub strict: bool,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            force_update: false,
            include_prereleases: true,
            limit: 0,
            source_override: None,
            strict: false,
        }
    }
}
