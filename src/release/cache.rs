use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::release::error::{FormatError, ResolveError};
use crate::release::fetcher::Fetcher;
use crate::release::types::{Manifest, ResolutionOptions};

/// File name of the snapshot inside the cache directory
pub const SNAPSHOT_FILE_NAME: &str = "latest.json";

/// Where a releases feed comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Remote(String),
    Local(PathBuf),
}

impl ManifestSource {
    /// `http(s)://` URLs are remote; `file://` URLs and anything else are local paths
    pub fn parse(input: &str) -> Self {
        match reqwest::Url::parse(input) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                ManifestSource::Remote(input.to_string())
            }
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => ManifestSource::Local(path),
                Err(()) => ManifestSource::Local(PathBuf::from(input)),
            },
            _ => ManifestSource::Local(PathBuf::from(input)),
        }
    }
}

/// Produces manifests, preferring the on-disk snapshot over network traffic
pub struct ManifestCache {
    fetcher: Arc<dyn Fetcher>,
    source: ManifestSource,
    cache_dir: PathBuf,
    timeout: Duration,
    max_age: Option<Duration>,
}

impl ManifestCache {
    /// Creates the cache, creating its directory if it does not exist yet
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, ResolveError> {
        let cache_dir = config.cache_directory();
        std::fs::create_dir_all(&cache_dir).map_err(|source| ResolveError::CacheDirectory {
            path: cache_dir.clone(),
            source,
        })?;
        debug!("Using cache directory {:?}", cache_dir);

        Ok(Self {
            fetcher,
            source: ManifestSource::parse(&config.releases_source),
            cache_dir,
            timeout: config.timeout(),
            max_age: config.cache_max_age(),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(SNAPSHOT_FILE_NAME)
    }

    /// Returns the manifest for this request.
    ///
    /// - A local source is read directly, the snapshot is not involved.
    /// - Otherwise a fresh, readable snapshot is used unless `force_update` is set.
    /// - Otherwise the remote source is fetched and the snapshot overwritten.
    pub async fn get_manifest(&self, options: &ResolutionOptions) -> Result<Manifest, ResolveError> {
        let source = match &options.source_override {
            Some(source) => ManifestSource::parse(source),
            None => self.source.clone(),
        };

        let url = match source {
            ManifestSource::Local(path) => {
                debug!("Releases source points to a local file: {:?}", path);
                return load_local(&path).await;
            }
            ManifestSource::Remote(url) => url,
        };

        let snapshot = self.snapshot_path();

        if options.force_update {
            info!("Forced download of the releases file from {}", url);
            return self.download(&url, &snapshot).await;
        }

        if self.snapshot_is_fresh(&snapshot).await
            && let Some(manifest) = read_snapshot(&snapshot).await
        {
            return Ok(manifest);
        }

        self.download(&url, &snapshot).await
    }

    async fn snapshot_is_fresh(&self, snapshot: &Path) -> bool {
        let metadata = match tokio::fs::metadata(snapshot).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return false,
            Err(e) => {
                debug!("No usable snapshot at {:?}: {}", snapshot, e);
                return false;
            }
        };

        let Some(max_age) = self.max_age else {
            return true;
        };

        // a modification time in the future counts as fresh
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| modified.elapsed().ok());

        match age {
            Some(age) if age > max_age => {
                debug!(
                    "Snapshot {:?} is {:?} old, older than {:?}",
                    snapshot, age, max_age
                );
                false
            }
            _ => true,
        }
    }

    /// Fetches the remote feed and persists it as the new snapshot
    async fn download(&self, url: &str, snapshot: &Path) -> Result<Manifest, ResolveError> {
        let bytes = self.fetcher.fetch(url, self.timeout).await?;

        let manifest = Manifest::parse(&bytes).map_err(|reason| ResolveError::ManifestFormat {
            origin: url.to_string(),
            reason,
        })?;
        info!("Downloaded {} releases from {}", manifest.len(), url);

        // the fetched data is still returned when the snapshot cannot be written
        match tokio::fs::write(snapshot, &bytes).await {
            Ok(()) => debug!("Saved snapshot to {:?}", snapshot),
            Err(e) => warn!("Failed to save snapshot to {:?}: {}", snapshot, e),
        }

        Ok(manifest)
    }
}

/// Reads the snapshot, `None` when it cannot be read or no longer parses
async fn read_snapshot(snapshot: &Path) -> Option<Manifest> {
    let bytes = tokio::fs::read(snapshot)
        .await
        .inspect_err(|e| warn!("Snapshot {:?} is not readable: {}", snapshot, e))
        .ok()?;

    let manifest = Manifest::parse(&bytes)
        .inspect_err(|e| warn!("Ignoring invalid snapshot {:?}: {}", snapshot, e))
        .ok()?;

    debug!("Loaded {} releases from snapshot {:?}", manifest.len(), snapshot);
    Some(manifest)
}

async fn load_local(path: &Path) -> Result<Manifest, ResolveError> {
    let to_error = |reason: FormatError| ResolveError::ManifestFormat {
        origin: path.display().to_string(),
        reason,
    };

    let bytes = tokio::fs::read(path).await.map_err(|e| to_error(e.into()))?;
    Manifest::parse(&bytes).map_err(to_error)
}
