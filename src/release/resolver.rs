//! Release resolution coordinator
//!
//! Composes the manifest cache and the matcher into the two public lookups:
//! Electron versions and bundled dependency versions.

use std::sync::Arc;

use crate::config::Config;
use crate::release::cache::ManifestCache;
use crate::release::error::ResolveError;
use crate::release::fetcher::{Fetcher, HttpFetcher};
use crate::release::matcher::select;
use crate::release::types::{DependencyKey, ReleaseRecord, ResolutionOptions, Target};

/// Resolves version expressions against the releases feed.
///
/// The cache directory is established once, when the resolver is created,
/// and reused by every lookup made through it.
pub struct ReleaseResolver {
    cache: ManifestCache,
}

impl ReleaseResolver {
    /// Create a resolver fetching over HTTP
    pub fn new(config: &Config) -> Result<Self, ResolveError> {
        Self::with_fetcher(config, Arc::new(HttpFetcher::new()))
    }

    /// Create a resolver with the given fetcher
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, ResolveError> {
        Ok(Self {
            cache: ManifestCache::new(config, fetcher)?,
        })
    }

    /// Releases whose Electron version matches `expression`
    pub async fn resolve_electron(
        &self,
        expression: &str,
        options: &ResolutionOptions,
    ) -> Result<Vec<ReleaseRecord>, ResolveError> {
        self.resolve(Target::Electron, expression, options).await
    }

    /// Releases whose bundled `key` version matches `expression`
    pub async fn resolve_dependency(
        &self,
        key: DependencyKey,
        expression: &str,
        options: &ResolutionOptions,
    ) -> Result<Vec<ReleaseRecord>, ResolveError> {
        self.resolve(Target::Dependency(key), expression, options)
            .await
    }

    pub async fn resolve(
        &self,
        target: Target,
        expression: &str,
        options: &ResolutionOptions,
    ) -> Result<Vec<ReleaseRecord>, ResolveError> {
        let manifest = self.cache.get_manifest(options).await?;
        let selected = select(&manifest, target, expression, options)?;
        Ok(selected.into_iter().cloned().collect())
    }
}
