//! Selection of releases matching a version expression
//!
//! Expressions are interpreted in order:
//! 1. `all` - every release
//! 2. `latest` - the first release in feed order
//! 3. an npm dist tag (`5-0-x`, Electron only)
//! 4. a semver range (`5.0.8`, `^5`, `~66`, `>=4 <6`, ...)
//!
//! Anything else selects nothing.

use tracing::debug;

use crate::release::error::ResolveError;
use crate::release::range::VersionRange;
use crate::release::semver::parse_loose;
use crate::release::types::{Manifest, ReleaseRecord, ResolutionOptions, Target};

pub const ALL_EXPRESSION: &str = "all";
pub const LATEST_EXPRESSION: &str = "latest";

/// How an expression was understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    All,
    Latest,
    DistTag(String),
    Range(VersionRange),
    Invalid(String),
}

impl Expression {
    /// Interpret `input` against the candidate releases.
    ///
    /// Dist tags are only looked up for Electron, must match `input` exactly
    /// and win over range syntax.
    pub fn interpret(input: &str, target: Target, candidates: &[&ReleaseRecord]) -> Self {
        let trimmed = input.trim();
        match trimmed {
            ALL_EXPRESSION => Expression::All,
            LATEST_EXPRESSION => Expression::Latest,
            _ if target == Target::Electron && candidates.iter().any(|r| r.has_dist_tag(input)) => {
                Expression::DistTag(input.to_string())
            }
            _ => match VersionRange::parse(trimmed) {
                Some(range) => Expression::Range(range),
                None => Expression::Invalid(trimmed.to_string()),
            },
        }
    }
}

/// Select the releases of `manifest` matching `expression` for `target`.
///
/// Feed order is preserved and the result is truncated to `options.limit`
/// when it is non-zero.
pub fn select<'m>(
    manifest: &'m Manifest,
    target: Target,
    expression: &str,
    options: &ResolutionOptions,
) -> Result<Vec<&'m ReleaseRecord>, ResolveError> {
    let candidates: Vec<&ReleaseRecord> = manifest
        .iter()
        .filter(|record| target.value_of(record).is_some())
        .filter(|record| options.include_prereleases || !record.is_prerelease())
        .collect();

    let mut selected: Vec<&ReleaseRecord> =
        match Expression::interpret(expression, target, &candidates) {
            Expression::All => candidates,
            Expression::Latest => candidates.into_iter().take(1).collect(),
            Expression::DistTag(tag) => candidates
                .into_iter()
                .filter(|record| record.has_dist_tag(&tag))
                .collect(),
            Expression::Range(range) => candidates
                .into_iter()
                .filter(|record| {
                    target
                        .value_of(record)
                        .and_then(parse_loose)
                        .is_some_and(|version| range.satisfies(&version))
                })
                .collect(),
            Expression::Invalid(input) if options.strict => {
                return Err(ResolveError::InvalidVersionExpression(input));
            }
            Expression::Invalid(input) => {
                debug!("\"{}\" is neither a dist tag nor a version range", input);
                Vec::new()
            }
        };

    if options.limit > 0 {
        selected.truncate(options.limit);
    }

    debug!(
        "Selected {} of {} releases for {} \"{}\"",
        selected.len(),
        manifest.len(),
        target,
        expression
    );

    Ok(selected)
}
