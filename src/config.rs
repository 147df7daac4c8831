use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::release::types::ResolutionOptions;

// =============================================================================
// Defaults
// =============================================================================

/// Published lite manifest of all Electron releases
pub const DEFAULT_RELEASES_URL: &str = "https://unpkg.com/electron-releases@latest/lite.json";

/// Timeout for fetching the releases file in milliseconds (2 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;

/// Maximum snapshot age in milliseconds before it is refetched (24 hours)
pub const DEFAULT_CACHE_MAX_AGE_MS: u64 = 24 * 60 * 60 * 1000;

/// Name of the cache directory created under the system temp directory
pub const CACHE_DIR_NAME: &str = "electron-info";

/// Effective configuration after defaults and overrides are merged
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub force_update: bool,
    pub include_prereleases: bool,
    /// Maximum number of results, 0 means unlimited
    pub limit: usize,
    /// Only the first matching release, takes precedence over `limit`
    pub latest: bool,
    /// URL or local path of the releases feed
    pub releases_source: String,
    pub cache_directory: Option<PathBuf>,
    pub timeout_ms: u64,
    /// 0 disables the age check
    pub cache_max_age_ms: u64,
    pub strict: bool,
    pub debug: bool,
    pub colors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            force_update: false,
            include_prereleases: true,
            limit: 0,
            latest: false,
            releases_source: DEFAULT_RELEASES_URL.to_string(),
            cache_directory: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cache_max_age_ms: DEFAULT_CACHE_MAX_AGE_MS,
            strict: false,
            debug: false,
            colors: true,
        }
    }
}

/// Partial configuration; every field left `None` keeps the value it is merged onto
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
    pub force_update: Option<bool>,
    pub include_prereleases: Option<bool>,
    pub limit: Option<usize>,
    pub latest: Option<bool>,
    pub releases_source: Option<String>,
    pub cache_directory: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
    pub cache_max_age_ms: Option<u64>,
    pub strict: Option<bool>,
    pub debug: Option<bool>,
    pub colors: Option<bool>,
}

impl ConfigOverrides {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Config {
    /// Apply `overrides` on top of `self`
    pub fn merge(self, overrides: ConfigOverrides) -> Self {
        Self {
            force_update: overrides.force_update.unwrap_or(self.force_update),
            include_prereleases: overrides
                .include_prereleases
                .unwrap_or(self.include_prereleases),
            limit: overrides.limit.unwrap_or(self.limit),
            latest: overrides.latest.unwrap_or(self.latest),
            releases_source: overrides.releases_source.unwrap_or(self.releases_source),
            cache_directory: overrides.cache_directory.or(self.cache_directory),
            timeout_ms: overrides.timeout_ms.unwrap_or(self.timeout_ms),
            cache_max_age_ms: overrides.cache_max_age_ms.unwrap_or(self.cache_max_age_ms),
            strict: overrides.strict.unwrap_or(self.strict),
            debug: overrides.debug.unwrap_or(self.debug),
            colors: overrides.colors.unwrap_or(self.colors),
        }
    }

    /// Returns the cache directory.
    /// Uses the configured directory if set,
    /// otherwise `electron-info` under the system temp directory.
    pub fn cache_directory(&self) -> PathBuf {
        cache_directory_with_env(self.cache_directory.clone(), std::env::temp_dir())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_max_age(&self) -> Option<Duration> {
        (self.cache_max_age_ms > 0).then(|| Duration::from_millis(self.cache_max_age_ms))
    }

    pub fn resolution_options(&self) -> ResolutionOptions {
        ResolutionOptions {
            force_update: self.force_update,
            include_prereleases: self.include_prereleases,
            limit: if self.latest { 1 } else { self.limit },
            source_override: None,
            strict: self.strict,
        }
    }
}

fn cache_directory_with_env(configured: Option<PathBuf>, temp_dir: PathBuf) -> PathBuf {
    configured.unwrap_or_else(|| temp_dir.join(CACHE_DIR_NAME))
}
