//! encapp result search
//!
//! Indexes the `encapp_*.json` result files below a directory into a flat
//! `.encapp_index` table and searches it by size, codec, bitrate, gop and
//! frame rate. Prints the matching result files, their encoded media files,
//! or a one-line summary per match.

#![allow(dead_code)]

mod config;
mod device;
mod error;
mod index;
mod projection;
mod query;

#[cfg(test)]
mod integration;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::index::IndexCache;
use crate::projection::{project, Projection};
use crate::query::{search, FilterSpec};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "encapp-search";

/// Search encapp result files.
///
/// Searchable properties are size (WxH, or one dimension matching either),
/// codec (partial name is fine), bitrate (exact like 200k, or a range like
/// 200000-1M), group of pictures and frame rate.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "encapp-search")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Search path, default current directory
    pub path: Option<PathBuf>,

    /// Frame size, WxH or a single dimension
    #[arg(short, long)]
    pub size: Option<String>,

    /// Codec name or part of it
    #[arg(short, long)]
    pub codec: Option<String>,

    /// Bitrate, e.g. 200k, or a range like 200000-1M
    #[arg(short, long)]
    pub bitrate: Option<String>,

    /// Group of pictures (I-frame interval)
    #[arg(short, long)]
    pub gop: Option<i64>,

    /// Frame rate
    #[arg(short, long)]
    pub fps: Option<f64>,

    /// Do not descend into subdirectories
    #[arg(long = "no-rec", alias = "no_rec")]
    pub no_rec: bool,

    /// Rebuild the index before searching
    #[arg(short, long)]
    pub index: bool,

    /// Print encoded media files instead of result files
    #[arg(short, long)]
    pub video: bool,

    /// Print a summary line per match
    #[arg(short, long = "print-data", alias = "print_data")]
    pub print_data: bool,

    /// Configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    fn projection(&self) -> Projection {
        if self.print_data {
            Projection::Summary
        } else if self.video {
            Projection::Media
        } else {
            Projection::Files
        }
    }

    fn filters(&self) -> Result<FilterSpec> {
        FilterSpec::from_tokens(
            self.codec.as_deref(),
            self.bitrate.as_deref(),
            self.gop,
            self.fps,
            self.size.as_deref(),
        )
    }
}

/// Load the configuration file, falling back to defaults.
///
/// Returns the load error separately so it can be logged once logging
/// has been set up from the configuration.
fn load_config(args: &Args) -> (SearchConfig, Option<SearchError>) {
    let Some(path) = &args.config else {
        return (SearchConfig::default(), None);
    };
    match SearchConfig::from_file(path) {
        Ok(config) => (config, None),
        Err(e) => (SearchConfig::default(), Some(e)),
    }
}

/// Run a search and return the lines to print.
pub fn run(args: &Args, config: &SearchConfig) -> Result<Vec<String>> {
    let root = match &args.path {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let recursive = config.recursive && !args.no_rec;
    let filters = args.filters()?;

    let mut cache = IndexCache::new(&root, config.clone(), recursive);
    if args.index {
        cache.reindex()?;
    }
    let table = cache.load()?;

    let matches = search(table, &filters)?;
    project(&matches, args.projection(), &config.summary_separator)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (config, config_error) = load_config(&args);
    init_logging(
        args.log_level.as_deref().unwrap_or(&config.log_level),
        &config.log_format,
    );
    if let (Some(path), Some(e)) = (&args.config, config_error) {
        tracing::warn!(
            "Failed to load config file {:?}: {}. Using defaults.",
            path,
            e
        );
    }

    tracing::debug!("{} v{} starting", APP_NAME, VERSION);

    match run(&args, &config) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with tracing; all log output goes to stderr.
fn init_logging(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("encapp_search={}", level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
