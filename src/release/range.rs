//! npm-style version ranges
//!
//! Supports:
//! - `1.2.3` - exact match
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0)
//! - `~1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.2.x`, `1.x`, `1`, `*` - X-ranges
//! - `1.0.0 - 2.0.0` - hyphen ranges
//! - `>=1.0.0 <2.0.0` - AND (space separated), `^1 || ^2` - OR
//!
//! Ranges include prereleases: `^5` matches `5.0.0-beta.1`, while the upper
//! bound `<6.0.0-0` keeps `6.0.0-beta.1` out.

use semver::{BuildMetadata, Prerelease, Version};

use crate::release::semver::PartialVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn test(&self, version: &Version) -> bool {
        match self.op {
            Op::Eq => version == &self.version,
            Op::Gt => version > &self.version,
            Op::Gte => version >= &self.version,
            Op::Lt => version < &self.version,
            Op::Lte => version <= &self.version,
        }
    }
}

/// `major.minor.patch-0`, the lowest version with that core
fn floor(major: u64, minor: u64, patch: u64) -> Version {
    Version {
        major,
        minor,
        patch,
        pre: Prerelease::new("0").unwrap_or(Prerelease::EMPTY),
        build: BuildMetadata::EMPTY,
    }
}

/// A comparator no version satisfies
fn nothing() -> Vec<Comparator> {
    vec![Comparator::new(Op::Lt, floor(0, 0, 0))]
}

/// A parsed range: any of the alternatives, each requiring all its comparators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    alternatives: Vec<Vec<Comparator>>,
}

impl VersionRange {
    /// Parse a range expression, `None` if it is not valid range syntax
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let alternatives = input
            .split("||")
            .map(parse_set)
            .collect::<Option<Vec<_>>>()?;

        Some(Self { alternatives })
    }

    pub fn satisfies(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|set| set.iter().all(|c| c.test(version)))
    }
}

/// Parse one `||` alternative: a hyphen range or whitespace separated comparators
fn parse_set(input: &str) -> Option<Vec<Comparator>> {
    let input = input.trim();

    if let Some((from, to)) = input.split_once(" - ") {
        return parse_hyphen(from, to);
    }

    let mut comparators = Vec::new();
    let mut tokens = input.split_whitespace();
    while let Some(token) = tokens.next() {
        // ">= 1.2.3" is written with a space after the operator
        let token = if is_operator(token) {
            format!("{}{}", token, tokens.next()?)
        } else {
            token.to_string()
        };
        comparators.extend(parse_comparator(&token)?);
    }

    Some(comparators)
}

fn is_operator(token: &str) -> bool {
    matches!(token, ">=" | "<=" | ">" | "<" | "=" | "^" | "~" | "~>")
}

fn parse_comparator(token: &str) -> Option<Vec<Comparator>> {
    if let Some(rest) = token.strip_prefix(">=") {
        PartialVersion::parse(rest).map(|p| greater_or_equal(&p))
    } else if let Some(rest) = token.strip_prefix("<=") {
        PartialVersion::parse(rest).map(|p| less_or_equal(&p))
    } else if let Some(rest) = token.strip_prefix('>') {
        PartialVersion::parse(rest).map(|p| greater(&p))
    } else if let Some(rest) = token.strip_prefix('<') {
        PartialVersion::parse(rest).map(|p| less(&p))
    } else if let Some(rest) = token.strip_prefix('^') {
        PartialVersion::parse(rest).map(|p| caret(&p))
    } else if let Some(rest) = token.strip_prefix("~>") {
        PartialVersion::parse(rest).map(|p| tilde(&p))
    } else if let Some(rest) = token.strip_prefix('~') {
        PartialVersion::parse(rest).map(|p| tilde(&p))
    } else {
        // bare versions and "=1.2.3"; PartialVersion::parse strips the "="
        PartialVersion::parse(token).map(|p| x_range(&p))
    }
}

/// `1.2.3 - 2.3.4` is `>=1.2.3 <=2.3.4`; a partial upper bound is exclusive of the next
fn parse_hyphen(from: &str, to: &str) -> Option<Vec<Comparator>> {
    let from = PartialVersion::parse(from)?;
    let to = PartialVersion::parse(to)?;

    let mut comparators = Vec::new();
    if let Some(lower) = from.complete() {
        comparators.push(Comparator::new(Op::Gte, lower));
    } else if let Some(major) = from.major {
        comparators.push(Comparator::new(
            Op::Gte,
            floor(major, from.minor.unwrap_or(0), 0),
        ));
    }

    if let Some(upper) = to.complete() {
        comparators.push(Comparator::new(Op::Lte, upper));
    } else {
        match (to.major, to.minor) {
            (Some(major), Some(minor)) => {
                comparators.push(Comparator::new(Op::Lt, floor(major, minor + 1, 0)))
            }
            (Some(major), None) => {
                comparators.push(Comparator::new(Op::Lt, floor(major + 1, 0, 0)))
            }
            _ => {}
        }
    }

    Some(comparators)
}

/// `1`, `1.2`, `1.x`, `*` and exact `1.2.3`
fn x_range(p: &PartialVersion) -> Vec<Comparator> {
    match p.complete() {
        Some(version) => vec![Comparator::new(Op::Eq, version)],
        None => tilde(p),
    }
}

/// `^1.2.3` := >=1.2.3 <2.0.0-0, `^0.2.3` := >=0.2.3 <0.3.0-0, `^0.0.3` := >=0.0.3 <0.0.4-0
fn caret(p: &PartialVersion) -> Vec<Comparator> {
    match (p.major, p.minor, p.patch) {
        (None, _, _) => vec![],
        (Some(major), None, _) => vec![
            Comparator::new(Op::Gte, floor(major, 0, 0)),
            Comparator::new(Op::Lt, floor(major + 1, 0, 0)),
        ],
        (Some(0), Some(minor), None) => vec![
            Comparator::new(Op::Gte, floor(0, minor, 0)),
            Comparator::new(Op::Lt, floor(0, minor + 1, 0)),
        ],
        (Some(major), Some(minor), None) => vec![
            Comparator::new(Op::Gte, floor(major, minor, 0)),
            Comparator::new(Op::Lt, floor(major + 1, 0, 0)),
        ],
        (Some(major), Some(minor), Some(patch)) => {
            let upper = if major > 0 {
                floor(major + 1, 0, 0)
            } else if minor > 0 {
                floor(0, minor + 1, 0)
            } else {
                floor(0, 0, patch + 1)
            };
            let lower = p.complete().unwrap_or_else(|| floor(major, minor, patch));
            vec![
                Comparator::new(Op::Gte, lower),
                Comparator::new(Op::Lt, upper),
            ]
        }
    }
}

/// `~1.2.3` := >=1.2.3 <1.3.0-0, `~1.2` := >=1.2.0-0 <1.3.0-0, `~1` := >=1.0.0-0 <2.0.0-0
fn tilde(p: &PartialVersion) -> Vec<Comparator> {
    match (p.major, p.minor, p.patch) {
        (None, _, _) => vec![],
        (Some(major), None, _) => vec![
            Comparator::new(Op::Gte, floor(major, 0, 0)),
            Comparator::new(Op::Lt, floor(major + 1, 0, 0)),
        ],
        (Some(major), Some(minor), None) => vec![
            Comparator::new(Op::Gte, floor(major, minor, 0)),
            Comparator::new(Op::Lt, floor(major, minor + 1, 0)),
        ],
        (Some(major), Some(minor), Some(patch)) => {
            let lower = p.complete().unwrap_or_else(|| floor(major, minor, patch));
            vec![
                Comparator::new(Op::Gte, lower),
                Comparator::new(Op::Lt, floor(major, minor + 1, 0)),
            ]
        }
    }
}

fn greater(p: &PartialVersion) -> Vec<Comparator> {
    match (p.major, p.minor, p.complete()) {
        (_, _, Some(version)) => vec![Comparator::new(Op::Gt, version)],
        (None, _, _) => nothing(),
        (Some(major), None, _) => vec![Comparator::new(Op::Gte, floor(major + 1, 0, 0))],
        (Some(major), Some(minor), _) => {
            vec![Comparator::new(Op::Gte, floor(major, minor + 1, 0))]
        }
    }
}

fn greater_or_equal(p: &PartialVersion) -> Vec<Comparator> {
    match (p.major, p.minor, p.complete()) {
        (_, _, Some(version)) => vec![Comparator::new(Op::Gte, version)],
        (None, _, _) => vec![],
        (Some(major), None, _) => vec![Comparator::new(Op::Gte, floor(major, 0, 0))],
        (Some(major), Some(minor), _) => vec![Comparator::new(Op::Gte, floor(major, minor, 0))],
    }
}

fn less(p: &PartialVersion) -> Vec<Comparator> {
    match (p.major, p.minor, p.complete()) {
        (_, _, Some(version)) => vec![Comparator::new(Op::Lt, version)],
        (None, _, _) => nothing(),
        (Some(major), None, _) => vec![Comparator::new(Op::Lt, floor(major, 0, 0))],
        (Some(major), Some(minor), _) => vec![Comparator::new(Op::Lt, floor(major, minor, 0))],
    }
}

fn less_or_equal(p: &PartialVersion) -> Vec<Comparator> {
    match (p.major, p.minor, p.complete()) {
        (_, _, Some(version)) => vec![Comparator::new(Op::Lte, version)],
        (None, _, _) => vec![],
        (Some(major), None, _) => vec![Comparator::new(Op::Lt, floor(major + 1, 0, 0))],
        (Some(major), Some(minor), _) => {
            vec![Comparator::new(Op::Lt, floor(major, minor + 1, 0))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::semver::parse_loose;
    use rstest::rstest;

    fn matches(range: &str, version: &str) -> bool {
        let range = VersionRange::parse(range).unwrap();
        range.satisfies(&parse_loose(version).unwrap())
    }

    // exact versions are the narrowest range
    #[rstest]
    #[case("5.0.8", "5.0.8", true)]
    #[case("5.0.8", "5.0.9", false)]
    #[case("v5.0.8", "5.0.8", true)]
    #[case("=5.0.8", "5.0.8", true)]
    #[case("6.0.0-beta.1", "6.0.0-beta.1", true)]
    #[case("6.0.0-beta.1", "6.0.0", false)]
    #[case("71.0.3578.98", "71.0.3578.98", true)]
    #[case("71.0.3578.98", "71.0.3578.99", false)]
    fn exact(#[case] range: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(matches(range, version), expected);
    }

    #[rstest]
    // ^1.2.3 matches >=1.2.3 <2.0.0
    #[case("^1.2.3", "1.2.3", true)]
    #[case("^1.2.3", "1.9.9", true)]
    #[case("^1.2.3", "1.2.2", false)]
    #[case("^1.2.3", "2.0.0", false)]
    // ^0.2.3 matches >=0.2.3 <0.3.0 (special case for 0.x)
    #[case("^0.2.3", "0.2.9", true)]
    #[case("^0.2.3", "0.3.0", false)]
    // ^0.0.3 matches >=0.0.3 <0.0.4 (special case for 0.0.x)
    #[case("^0.0.3", "0.0.3", true)]
    #[case("^0.0.3", "0.0.4", false)]
    // partial carets include the prereleases of their floor
    #[case("^5", "5.0.0-beta.1", true)]
    #[case("^5", "5.9.0", true)]
    #[case("^5", "6.0.0-beta.1", false)]
    #[case("^5.0.0", "5.0.0-beta.1", false)]
    #[case("^5.0.0", "5.1.0-beta.1", true)]
    #[case("^0.14", "0.14.5", true)]
    #[case("^0.14", "0.15.0", false)]
    fn caret_range(#[case] range: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(matches(range, version), expected);
    }

    #[rstest]
    // ~1.2.3 matches >=1.2.3 <1.3.0
    #[case("~1.2.3", "1.2.9", true)]
    #[case("~1.2.3", "1.3.0", false)]
    #[case("~1.2.3", "1.2.2", false)]
    #[case("~1.2", "1.2.0", true)]
    #[case("~1.2", "1.3.0", false)]
    // Chromium versions carry a fourth component
    #[case("~66", "66.0.3359.181", true)]
    #[case("~66", "67.0.3396.99", false)]
    #[case("~>1.2.3", "1.2.5", true)]
    fn tilde_range(#[case] range: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(matches(range, version), expected);
    }

    #[rstest]
    #[case(">=1.0.0", "1.0.0", true)]
    #[case(">=1.0.0", "0.9.9", false)]
    #[case(">1.0.0", "1.0.1", true)]
    #[case(">1.0.0", "1.0.0", false)]
    #[case("<=1.0.0", "1.0.0", true)]
    #[case("<=1.0.0", "1.0.1", false)]
    #[case("<1.0.0", "0.9.9", true)]
    #[case("<1.0.0", "1.0.0", false)]
    #[case(">= 1.2", "1.2.0", true)]
    #[case(">=1.2", "1.1.9", false)]
    #[case(">1", "1.9.0", false)]
    #[case(">1", "2.0.0-beta.1", true)]
    #[case("<2", "2.0.0-beta.1", false)]
    #[case("<=1.2", "1.2.9", true)]
    #[case("<=1.2", "1.3.0", false)]
    fn comparison_operators(#[case] range: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(matches(range, version), expected);
    }

    #[rstest]
    #[case("*", "1.0.0", true)]
    #[case("*", "0.0.1-alpha", true)]
    #[case("x", "3.1.4", true)]
    #[case("1.x", "1.9.9", true)]
    #[case("1.x", "2.0.0", false)]
    #[case("1.X", "1.5.0", true)]
    #[case("1.2.x", "1.2.9", true)]
    #[case("1.2.x", "1.3.0", false)]
    // a bare major is an X-range, not 1.0.0
    #[case("5", "5.0.8", true)]
    #[case("5", "6.0.0", false)]
    #[case("70", "70", true)]
    fn x_ranges(#[case] range: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(matches(range, version), expected);
    }

    #[rstest]
    #[case("1.0.0 - 2.0.0", "1.0.0", true)]
    #[case("1.0.0 - 2.0.0", "2.0.0", true)]
    #[case("1.0.0 - 2.0.0", "2.0.1", false)]
    #[case("1.0.0 - 2.0.0", "0.9.9", false)]
    #[case("1 - 2", "2.9.9", true)]
    #[case("1 - 2", "3.0.0", false)]
    #[case("1.2 - 2.3", "2.3.5", true)]
    #[case("1.2 - 2.3", "2.4.0", false)]
    fn hyphen_range(#[case] range: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(matches(range, version), expected);
    }

    #[rstest]
    #[case(">=1.0.0 <2.0.0", "1.5.0", true)]
    #[case(">=1.0.0 <2.0.0", "2.0.0", false)]
    #[case(">1.0.0 <=2.0.0", "2.0.0", true)]
    #[case("^1.0.0 || ^2.0.0", "2.5.0", true)]
    #[case("^1.0.0 || ^2.0.0", "3.0.0", false)]
    #[case(">=1.0.0 <1.5.0 || >=2.0.0", "1.6.0", false)]
    #[case("1.0.0 || 2.0.0 || 3.0.0", "2.0.0", true)]
    fn compound_ranges(#[case] range: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(matches(range, version), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("latest")]
    #[case("5-0-x")]
    #[case("^")]
    #[case(">=")]
    #[case("1.2.3.beta")]
    #[case("^1.0.0 || nope")]
    fn parse_rejects_invalid_syntax(#[case] input: &str) {
        assert_eq!(VersionRange::parse(input), None);
    }

    #[rstest]
    fn parse_rejects_components_too_large_to_bound(
        #[values("", "^", "~", "~>", ">", ">=", "<", "<=", "=")] op: &str,
        #[values(
            "18446744073709551615",
            "1.18446744073709551615",
            "1.2.18446744073709551615",
            "9007199254740992.x"
        )]
        version: &str,
    ) {
        assert_eq!(VersionRange::parse(&format!("{}{}", op, version)), None);
    }

    #[rstest]
    #[case("18446744073709551615 - 2.0.0")]
    #[case("1.0.0 - 18446744073709551615")]
    #[case("1.0.0 - 2.18446744073709551615")]
    fn parse_rejects_hyphen_bounds_too_large(#[case] input: &str) {
        assert_eq!(VersionRange::parse(input), None);
    }

    #[rstest]
    #[case("^9007199254740991", "9007199254740991.5.0", true)]
    #[case("~1.9007199254740991", "1.9007199254740991.7", true)]
    #[case("<=1.9007199254740991", "1.9007199254740991.3", true)]
    #[case(">1", "9007199254740991.0.0", true)]
    #[case("1.0.0 - 9007199254740991", "9007199254740991.1.0", true)]
    #[case("^0.0.9007199254740991", "0.0.9007199254740991", true)]
    fn ranges_at_component_limit(
        #[case] range: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(matches(range, version), expected);
    }

    #[test]
    fn comparison_against_wildcard_matches_nothing_or_everything() {
        assert!(!matches("<*", "0.0.1"));
        assert!(!matches(">*", "99.0.0"));
        assert!(matches(">=*", "0.0.1"));
    }
}
