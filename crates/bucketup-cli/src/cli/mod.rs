//! CLI for the bucket manifest updater.

mod commands;

use anyhow::Result;
use bucketup_core::config;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::PathBuf;

use commands::run_update;

/// Refresh a Scoop bucket manifest to a new upstream build.
#[derive(Debug, Parser)]
#[command(name = "bucketup")]
#[command(
    about = "Download a new upstream build and update its Scoop manifest (version, url, hash)",
    long_about = None
)]
pub struct Cli {
    /// New upstream version (e.g. 7.2.1.78900).
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub version: String,

    /// Keep the downloaded installer instead of deleting it.
    #[arg(long)]
    pub keep_temp: bool,

    /// Read configuration from this TOML file instead of ~/.config/bucketup/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Manifest to update (overrides the configured path).
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        if let Some(manifest) = self.manifest {
            cfg.manifest_path = manifest;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        run_update(&cfg, &self.version, self.keep_temp)
    }
}

#[cfg(test)]
mod tests;
