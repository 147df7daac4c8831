//! Release resolution layer
//!
//! This module provides the core functionality for acquiring the Electron
//! releases feed and selecting the releases that match a version expression,
//! either by Electron version or by the version of a bundled dependency.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│    Cache    │◀────│  Resolver   │
//! │   (HTTP)    │     │ (snapshot)  │     │ (orchestr.) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │    Range    │◀────│   Matcher   │
//!                     │ (npm semver)│     │ (selection) │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: Snapshot-backed manifest acquisition with forced refresh
//! - [`error`]: Error types for fetching, parsing and resolution
//! - [`fetcher`]: Fetcher trait and its reqwest implementation
//! - [`matcher`]: `all`/`latest`/dist tag/range selection over a manifest
//! - [`range`]: npm-style range parsing
//! - [`resolver`]: Public entry point composing cache and matcher
//! - [`semver`]: Loose version parsing
//! - [`types`]: Release records, manifests and options

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod matcher;
pub mod range;
pub mod resolver;
pub mod semver;
pub mod types;

pub use error::{FetchError, FormatError, ResolveError};
pub use resolver::ReleaseResolver;
pub use types::{DependencyKey, Manifest, ReleaseRecord, ResolutionOptions, Target};
