//! Loose version parsing shared by the matcher and the range parser

use semver::{BuildMetadata, Prerelease, Version};

/// Largest major, minor or patch accepted in a partial version, npm's safe integer limit
pub(crate) const MAX_COMPONENT: u64 = 9_007_199_254_740_991;

/// A version as written by a user or a feed, possibly incomplete.
///
/// Missing or wildcard (`x`, `X`, `*`) components are `None`. Components after
/// the third (Chromium's `71.0.3578.98`) are kept as build metadata so that
/// exact comparisons stay exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartialVersion {
    pub major: Option<u64>,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    pub pre: Prerelease,
    pub build: BuildMetadata,
    pub has_wildcard: bool,
}

impl PartialVersion {
    pub fn parse(input: &str) -> Option<Self> {
        let input = clean(input);
        if input.is_empty() {
            return None;
        }

        let (rest, build) = match input.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (input, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let mut components = Vec::new();
        let mut has_wildcard = false;
        for part in core.split('.') {
            match part {
                "x" | "X" | "*" => {
                    has_wildcard = true;
                    components.push(None);
                }
                // once a wildcard appears the rest is ignored (1.x.3 is 1.x)
                _ if has_wildcard => components.push(None),
                _ => {
                    let number = part.parse::<u64>().ok()?;
                    // range bounds step a core component up by one
                    if components.len() < 3 && number > MAX_COMPONENT {
                        return None;
                    }
                    components.push(Some(number));
                }
            }
        }

        let mut extra = Vec::new();
        if components.len() > 3 {
            if has_wildcard {
                return None;
            }
            extra = components
                .split_off(3)
                .into_iter()
                .map(|c| c.map(|n| n.to_string()))
                .collect::<Option<Vec<_>>>()?;
        }
        if let Some(build) = build {
            extra.push(build.to_string());
        }

        let major = components.first().copied().flatten();
        let minor = components.get(1).copied().flatten();
        let patch = components.get(2).copied().flatten();
        let complete = major.is_some() && minor.is_some() && patch.is_some();

        // prerelease and build tags only make sense on a complete version
        if (pre.is_some() || !extra.is_empty()) && !complete {
            return None;
        }

        Some(Self {
            major,
            minor,
            patch,
            pre: Prerelease::new(pre.unwrap_or("")).ok()?,
            build: BuildMetadata::new(&extra.join(".")).ok()?,
            has_wildcard,
        })
    }

    /// The complete version, if every component is present
    pub fn complete(&self) -> Option<Version> {
        Some(Version {
            major: self.major?,
            minor: self.minor?,
            patch: self.patch?,
            pre: self.pre.clone(),
            build: self.build.clone(),
        })
    }
}

/// Strips surrounding whitespace and a leading `=` or `v`
pub fn clean(input: &str) -> &str {
    let input = input.trim();
    let input = input.strip_prefix('=').unwrap_or(input).trim_start();
    input.strip_prefix(['v', 'V']).unwrap_or(input)
}

/// Parse a release's version string leniently.
///
/// Handles `v` prefixes, partial versions padded with zeros and
/// four-component versions.
///
/// Examples:
/// - "v5.0.8" -> Version(5, 0, 8)
/// - "70" -> Version(70, 0, 0)
/// - "71.0.3578.98" -> Version(71, 0, 3578) with build "98"
pub fn parse_loose(input: &str) -> Option<Version> {
    if let Ok(version) = Version::parse(clean(input)) {
        return Some(version);
    }

    let partial = PartialVersion::parse(input)?;
    if partial.has_wildcard {
        return None;
    }

    Some(Version {
        major: partial.major?,
        minor: partial.minor.unwrap_or(0),
        patch: partial.patch.unwrap_or(0),
        pre: partial.pre,
        build: partial.build,
    })
}

/// Whether a version string is a semver prerelease, `None` if it does not parse
pub fn is_prerelease(version: &str) -> Option<bool> {
    parse_loose(version).map(|v| !v.pre.is_empty())
}
