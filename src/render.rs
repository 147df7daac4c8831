//! Human-readable rendering of resolved releases

use std::io::{self, Write};

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::release::types::{DependencyKey, ReleaseRecord};

const LABEL_WIDTH: usize = 16;

/// Render `releases` as text blocks, one per release, with ANSI colors if `colors` is set
pub fn render_releases(releases: &[ReleaseRecord], colors: bool) -> io::Result<String> {
    let mut buffer = if colors {
        Buffer::ansi()
    } else {
        Buffer::no_color()
    };

    if releases.is_empty() {
        writeln!(buffer, "No releases found.")?;
    }

    for (index, release) in releases.iter().enumerate() {
        if index > 0 {
            writeln!(buffer)?;
        }
        render_release(&mut buffer, release)?;
    }

    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

fn render_release(out: &mut Buffer, release: &ReleaseRecord) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(out, "Electron {}", release.version)?;
    out.reset()?;
    if release.is_prerelease() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(out, " (prerelease)")?;
        out.reset()?;
    }
    writeln!(out)?;

    let published = release
        .published_at()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .or_else(|| release.published_at.clone());
    if let Some(published) = published {
        row(out, "Published on", &published)?;
    }

    if !release.dist_tags.is_empty() {
        row(out, "npm dist tags", &release.dist_tags.join(", "))?;
    }

    if release.deps.is_none() {
        row(out, "Dependencies", "unknown")?;
    }
    for key in DependencyKey::ALL {
        if let Some(version) = release.dependency(key) {
            row(out, key.display_name(), version)?;
        }
    }

    Ok(())
}

fn row(out: &mut Buffer, label: &str, value: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    write!(out, "  {:<width$}", label, width = LABEL_WIDTH)?;
    out.reset()?;
    writeln!(out, "{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn release() -> ReleaseRecord {
        let mut record = ReleaseRecord::new("5.0.8");
        record.published_at = Some("2019-07-30T17:47:53Z".to_string());
        record.dist_tags = vec!["5-0-x".to_string()];
        let mut deps = IndexMap::new();
        deps.insert("node".to_string(), "12.0.0".to_string());
        deps.insert("chrome".to_string(), "73.0.3683.121".to_string());
        record.deps = Some(deps);
        record
    }

    #[test]
    fn render_releases_without_colors_prints_plain_rows() {
        let output = render_releases(&[release()], false).unwrap();

        assert_eq!(
            output,
            "Electron 5.0.8\n\
             \x20 Published on    2019-07-30\n\
             \x20 npm dist tags   5-0-x\n\
             \x20 Chrome          73.0.3683.121\n\
             \x20 Node.js         12.0.0\n"
        );
    }

    #[test]
    fn render_releases_marks_prereleases_and_missing_deps() {
        let output = render_releases(&[ReleaseRecord::new("6.0.0-beta.1")], false).unwrap();

        assert_eq!(
            output,
            "Electron 6.0.0-beta.1 (prerelease)\n  Dependencies    unknown\n"
        );
    }

    #[test]
    fn render_releases_separates_releases_with_blank_line() {
        let output = render_releases(
            &[ReleaseRecord::new("5.0.8"), ReleaseRecord::new("5.0.7")],
            false,
        )
        .unwrap();

        assert!(output.contains("unknown\n\nElectron 5.0.7"));
    }

    #[test]
    fn render_releases_with_colors_emits_ansi_sequences() {
        let output = render_releases(&[release()], true).unwrap();
        assert!(output.contains("\x1b["));
        assert!(output.contains("5.0.8"));
    }

    #[test]
    fn render_releases_reports_empty_result() {
        assert_eq!(render_releases(&[], false).unwrap(), "No releases found.\n");
    }
}
