use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use electron_info::config::{Config, ConfigOverrides};
use electron_info::logging::init_logging;
use electron_info::release::{DependencyKey, ReleaseResolver, Target};
use electron_info::render::render_releases;

#[derive(Parser)]
#[command(name = "electron-info")]
#[command(
    version,
    about = "Get useful data about Electron releases",
    after_help = "Allowed version argument inputs:\n  \
        - SemVer versions and ranges (e.g. \"~7\", \"^5.0.0\", \"5.0.8\")\n  \
        - npm dist tags (e.g. \"5-0-x\", only Electron)\n  \
        - \"all\" and \"latest\""
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Force downloading the latest release file
    #[arg(short, long, global = true)]
    force: bool,

    /// List only the latest release (ignores --limit)
    #[arg(short = 'L', long, global = true)]
    latest: bool,

    /// Limit output of releases
    #[arg(short, long, global = true, value_name = "NUMBER")]
    limit: Option<usize>,

    /// Output raw JSON
    #[arg(short, long, global = true)]
    raw: bool,

    /// Use a custom releases source URL or path
    #[arg(short, long, global = true, value_name = "URL")]
    source: Option<String>,

    /// Use a custom HTTP timeout in milliseconds
    #[arg(short, long, global = true, value_name = "MS")]
    timeout: Option<u64>,

    /// Directory for the cached releases file
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Read settings from a JSON file; flags take precedence
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Don't use colors for displaying
    #[arg(long, global = true)]
    no_colors: bool,

    /// Don't include Electron prereleases
    #[arg(long, global = true)]
    no_prereleases: bool,

    /// Fail on version inputs that are neither a dist tag nor a SemVer range
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Get information about an Electron release
    #[command(alias = "e")]
    Electron { version: String },
    /// Get information about Chrome releases
    #[command(alias = "c")]
    Chrome { version: String },
    /// Get information about Node.js Modules releases
    #[command(alias = "m")]
    Modules { version: String },
    /// Get information about Node.js releases
    #[command(alias = "n")]
    Node { version: String },
    /// Get information about OpenSSL releases
    #[command(alias = "o")]
    Openssl { version: String },
    /// Get information about uv releases
    #[command(alias = "u")]
    Uv { version: String },
    /// Get information about V8 releases
    #[command(alias = "v")]
    V8 { version: String },
    /// Get information about zlib releases
    #[command(alias = "z")]
    Zlib { version: String },
    /// Get information about all releases
    #[command(alias = "a")]
    All,
}

impl Command {
    fn query(self) -> (Target, String) {
        let dependency = |key, version| (Target::Dependency(key), version);
        match self {
            Command::Electron { version } => (Target::Electron, version),
            Command::Chrome { version } => dependency(DependencyKey::Chrome, version),
            Command::Modules { version } => dependency(DependencyKey::Modules, version),
            Command::Node { version } => dependency(DependencyKey::Node, version),
            Command::Openssl { version } => dependency(DependencyKey::Openssl, version),
            Command::Uv { version } => dependency(DependencyKey::Uv, version),
            Command::V8 { version } => dependency(DependencyKey::V8, version),
            Command::Zlib { version } => dependency(DependencyKey::Zlib, version),
            Command::All => (Target::Electron, "all".to_string()),
        }
    }
}

impl Cli {
    /// Flags that were given, as overrides; absent flags leave lower layers alone
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            force_update: self.force.then_some(true),
            include_prereleases: self.no_prereleases.then_some(false),
            limit: self.limit,
            latest: self.latest.then_some(true),
            releases_source: self.source.clone(),
            cache_directory: self.cache_dir.clone(),
            timeout_ms: self.timeout,
            cache_max_age_ms: None,
            strict: self.strict.then_some(true),
            debug: self.debug.then_some(true),
            colors: self.no_colors.then_some(false),
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let file_overrides = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            ConfigOverrides::from_json(&raw)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ConfigOverrides::default(),
    };

    Ok(Config::default().merge(file_overrides).merge(cli.overrides()))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    init_logging(config.debug);

    let raw = cli.raw;
    let (target, expression) = cli.command.unwrap_or(Command::All).query();

    let resolver = ReleaseResolver::new(&config)?;
    let releases = resolver
        .resolve(target, &expression, &config.resolution_options())
        .await
        .with_context(|| format!("Failed to look up {} \"{}\"", target, expression))?;

    if raw {
        println!("{}", serde_json::to_string_pretty(&releases)?);
    } else {
        print!("{}", render_releases(&releases, config.colors)?);
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(run(cli)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
