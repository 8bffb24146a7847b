use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use depgraph_sbom::adapters::outbound::network::DEFAULT_BASE_URL;
use depgraph_sbom::application::dto::OutputFormat;
use depgraph_sbom::config::ConfigFile;
use depgraph_sbom::graph_resolution::policies::VersionOverrides;
use depgraph_sbom::graph_resolution::services::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
use depgraph_sbom::shared::Result;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolve transitive dependency graphs from the deps.dev metadata service
#[derive(Parser, Debug)]
#[command(name = "depgraph-sbom")]
#[command(version)]
#[command(
    about = "Resolve transitive dependency graphs and render them as trees or CycloneDX SBOMs",
    long_about = None
)]
pub struct Args {
    /// Root packages as ecosystem:name:version (e.g. maven:com.google.guava:guava:31.1-jre)
    #[arg(value_name = "COORDINATE")]
    pub coordinates: Vec<String>,

    /// File listing one root coordinate per line ('#' starts a comment)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format: tree, text, list or json [default: tree]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exclude packages matching patterns (supports wildcards: *)
    /// Can be specified multiple times: -e "junit" -e "npm:*-test"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Force a package version wherever it appears; repeatable
    #[arg(short = 'O', long = "override", value_name = "NAME=VERSION")]
    pub overrides: Vec<String>,

    /// Base URL of the metadata service
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Maximum concurrent requests to the metadata service [default: 8]
    #[arg(long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Record packages that fail to resolve and keep going
    #[arg(long)]
    pub continue_on_error: bool,

    /// Config file path (defaults to ./depgraph.config.yml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored tree output
    #[arg(long)]
    pub no_color: bool,
}

fn parse_concurrency(value: &str) -> std::result::Result<usize, String> {
    let parsed: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if parsed == 0 || parsed > MAX_CONCURRENCY {
        return Err(format!(
            "concurrency must be between 1 and {}",
            MAX_CONCURRENCY
        ));
    }
    Ok(parsed)
}

/// Effective settings after merging command-line arguments over the config file
#[derive(Debug)]
pub struct Settings {
    pub coordinates: Vec<String>,
    pub input: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub overrides: VersionOverrides,
    pub base_url: String,
    pub concurrency: usize,
    pub timeout: Duration,
    pub continue_on_error: bool,
    pub no_color: bool,
}

impl Settings {
    /// CLI values win over config values; exclusion lists are merged and
    /// CLI overrides replace config overrides for the same name
    pub fn merge(args: Args, config: Option<ConfigFile>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let format = match args.format {
            Some(format) => format,
            None => config.output_format()?.unwrap_or_default(),
        };

        let mut exclude = config.exclude.clone().unwrap_or_default();
        for pattern in args.exclude {
            if !exclude.contains(&pattern) {
                exclude.push(pattern);
            }
        }

        let mut overrides = config.version_overrides()?;
        overrides.merge(VersionOverrides::parse_directives(&args.overrides)?);

        Ok(Self {
            coordinates: args.coordinates,
            input: args.input,
            format,
            output: args.output,
            exclude,
            overrides,
            base_url: args
                .base_url
                .or(config.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            concurrency: args
                .concurrency
                .or(config.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
            timeout: Duration::from_secs(
                args.timeout
                    .or(config.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            continue_on_error: args.continue_on_error || config.continue_on_error.unwrap_or(false),
            no_color: args.no_color,
        })
    }
}
