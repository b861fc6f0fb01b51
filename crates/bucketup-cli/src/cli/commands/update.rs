//! `bucketup <version>` – download, hash and rewrite the manifest.

use anyhow::Result;
use bucketup_core::config::UpdaterConfig;
use bucketup_core::fetch::CurlFetcher;
use bucketup_core::updater::{self, Step};
use std::time::Duration;

pub fn run_update(cfg: &UpdaterConfig, version: &str, keep_temp: bool) -> Result<()> {
    let fetcher = CurlFetcher::new(cfg.connect_timeout_secs.map(Duration::from_secs));
    let report = updater::update_with_progress(cfg, &fetcher, version, keep_temp, print_step)?;
    print!("{report}");
    Ok(())
}

fn print_step(step: Step<'_>) {
    match step {
        Step::Downloading { url } => println!("Downloading {url} ..."),
        Step::Hashing { .. } => println!("Calculating SHA256..."),
        Step::WritingManifest { path } => println!("Updating manifest {}...", path.display()),
        Step::CleaningUp => println!("Cleaning up temporary files..."),
    }
}
