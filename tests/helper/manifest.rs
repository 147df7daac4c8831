//! Releases feed test utilities

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use tempfile::TempDir;

use electron_info::config::Config;
use electron_info::release::cache::SNAPSHOT_FILE_NAME;
use electron_info::release::fetcher::Fetcher;
use electron_info::release::{FetchError, ReleaseRecord, ReleaseResolver};

/// Build a release record with a Chrome and Node.js version
pub fn release(version: &str, chrome: &str, node: &str) -> ReleaseRecord {
    let mut record = ReleaseRecord::new(version);
    record.prerelease = version.contains('-');
    let mut deps = IndexMap::new();
    deps.insert("chrome".to_string(), chrome.to_string());
    deps.insert("node".to_string(), node.to_string());
    record.deps = Some(deps);
    record
}

/// Serialize records the way the published feed lays them out
pub fn feed(records: &[ReleaseRecord]) -> String {
    serde_json::to_string(records).unwrap()
}

/// Feed containing 29 releases in the `^5` range, mixed with releases outside it.
///
/// Returns the feed and the matching versions in feed order.
pub fn feed_with_electron_5() -> (Vec<ReleaseRecord>, Vec<String>) {
    let mut records = vec![
        release("6.0.0-beta.2", "76.0.3809.22", "12.4.0"),
        release("6.0.0-beta.1", "76.0.3809.3", "12.4.0"),
    ];
    let mut expected = Vec::new();

    for patch in (0..=13).rev() {
        let version = format!("5.0.{}", patch);
        records.push(release(&version, "73.0.3683.121", "12.0.0"));
        expected.push(version);
    }

    records.push(release("4.2.9", "69.0.3497.128", "10.11.0"));

    for beta in (1..=9).rev() {
        let version = format!("5.0.0-beta.{}", beta);
        records.push(release(&version, "73.0.3683.27", "12.0.0"));
        expected.push(version);
    }

    records.push(release("4.2.8", "69.0.3497.128", "10.11.0"));

    for patch in 0..=5 {
        let version = format!("5.1.{}", patch);
        records.push(release(&version, "73.0.3683.121", "12.0.0"));
        expected.push(version);
    }

    records.push(release("3.1.13", "66.0.3359.181", "10.2.0"));

    (records, expected)
}

/// Config pointing at `source` and caching under `dir`
pub fn test_config(dir: &TempDir, source: &str) -> Config {
    Config {
        releases_source: source.to_string(),
        cache_directory: Some(dir.path().to_path_buf()),
        ..Default::default()
    }
}

/// Write `payload` as the snapshot inside `dir`
pub fn write_snapshot(dir: &Path, payload: &str) {
    std::fs::write(dir.join(SNAPSHOT_FILE_NAME), payload).unwrap();
}

/// Fetcher serving a fixed payload and counting its calls
pub struct CountingFetcher {
    payload: String,
    calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(payload: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            payload: payload.into(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.as_bytes().to_vec())
    }
}

/// Resolver backed by a `CountingFetcher`
pub fn create_test_resolver(config: &Config, fetcher: Arc<CountingFetcher>) -> ReleaseResolver {
    ReleaseResolver::with_fetcher(config, fetcher).unwrap()
}
