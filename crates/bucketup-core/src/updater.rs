//! The manifest update routine.
//!
//! version → URL → download to scratch → SHA-256 from disk → set fields →
//! write manifest → drop or keep the download → report. The manifest is only
//! written once the URL and hash are both known, so any earlier failure
//! leaves it untouched.

use crate::artifact::TempArtifact;
use crate::checksum;
use crate::config::UpdaterConfig;
use crate::error::{Result, UpdateError};
use crate::fetch::Fetcher;
use crate::manifest::Manifest;
use crate::template;
use crate::url_model;
use std::fmt;
use std::path::{Path, PathBuf};

/// Step about to run, for progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    Downloading { url: &'a str },
    Hashing { path: &'a Path },
    WritingManifest { path: &'a Path },
    CleaningUp,
}

/// Outcome of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub package: String,
    pub previous_version: Option<String>,
    pub version: String,
    pub url: String,
    pub hash: String,
    pub bytes: u64,
    pub manifest_path: PathBuf,
    /// Where the installer was kept (`keep_temp` only).
    pub kept_artifact: Option<PathBuf>,
}

impl UpdateReport {
    /// Commands the maintainer should run next. Never executed here.
    pub fn next_steps(&self) -> Vec<String> {
        let manifest = self.manifest_path.display();
        vec![
            format!("git diff -- {manifest}"),
            format!("git add {manifest}"),
            format!(
                "git commit -m \"Update {} to {}\"",
                self.package, self.version
            ),
            "git push".to_string(),
            format!("scoop update {}", self.package),
        ]
    }
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Done. Updated {} to version {}.", self.package, self.version)?;
        if let Some(prev) = &self.previous_version {
            writeln!(f, "Previous version: {prev}")?;
        }
        writeln!(f, "SHA256: {}", self.hash)?;
        if let Some(kept) = &self.kept_artifact {
            writeln!(f, "Installer kept at {}", kept.display())?;
        }
        writeln!(f, "Next steps:")?;
        for step in self.next_steps() {
            writeln!(f, "   {step}")?;
        }
        Ok(())
    }
}

/// Update the configured manifest to `version`. See [`update_with_progress`].
pub fn update(
    config: &UpdaterConfig,
    fetcher: &dyn Fetcher,
    version: &str,
    keep_temp: bool,
) -> Result<UpdateReport> {
    update_with_progress(config, fetcher, version, keep_temp, |_| {})
}

/// Update the configured manifest to `version`, calling `on_step` before each step.
///
/// The manifest is loaded and its field pointers checked before any network
/// traffic. A failed download is always removed; a successful one is removed
/// unless `keep_temp`, even if the manifest write then fails.
pub fn update_with_progress(
    config: &UpdaterConfig,
    fetcher: &dyn Fetcher,
    version: &str,
    keep_temp: bool,
    mut on_step: impl FnMut(Step<'_>),
) -> Result<UpdateReport> {
    let url = template::render_url(config.url_template.as_deref(), version)?;
    tracing::info!(package = %config.package, version, url = %url, "starting update");

    let fields = &config.fields;
    let mut manifest = Manifest::load(&config.manifest_path)?;
    for pointer in [&fields.version, &fields.url, &fields.hash] {
        manifest.check_field(pointer)?;
    }
    let previous_version = manifest.get_str(&fields.version).map(str::to_string);
    if previous_version.as_deref() == Some(version) {
        tracing::warn!(version, "manifest already at this version, refreshing url and hash");
    }

    let mut artifact = TempArtifact::create(
        &config.scratch_dir(),
        &url_model::artifact_file_name(&url),
    )?;

    on_step(Step::Downloading { url: &url });
    let (bytes, hash) = match download_and_hash(fetcher, &url, &mut artifact, &mut on_step) {
        Ok(done) => done,
        Err(e) => {
            tracing::error!(url = %url, "download failed: {}", e);
            on_step(Step::CleaningUp);
            artifact.finish(false);
            return Err(e);
        }
    };
    tracing::info!(bytes, hash = %hash, "installer hashed");

    on_step(Step::WritingManifest {
        path: &config.manifest_path,
    });
    let written = write_manifest(&mut manifest, config, version, &url, &hash);

    if !keep_temp {
        on_step(Step::CleaningUp);
    }
    let kept_artifact = artifact.finish(keep_temp);
    written?;

    tracing::info!(package = %config.package, version, "manifest updated");
    Ok(UpdateReport {
        package: config.package.clone(),
        previous_version,
        version: version.to_string(),
        url,
        hash,
        bytes,
        manifest_path: manifest.path().to_path_buf(),
        kept_artifact,
    })
}

fn download_and_hash(
    fetcher: &dyn Fetcher,
    url: &str,
    artifact: &mut TempArtifact,
    on_step: &mut impl FnMut(Step<'_>),
) -> Result<(u64, String)> {
    let bytes = fetcher
        .fetch(url, artifact.file_mut())
        .map_err(|e| UpdateError::from_fetch(e, artifact.path()))?;
    artifact.sync()?;
    on_step(Step::Hashing {
        path: artifact.path(),
    });
    let hash = checksum::sha256_path(artifact.path())?;
    Ok((bytes, hash))
}

fn write_manifest(
    manifest: &mut Manifest,
    config: &UpdaterConfig,
    version: &str,
    url: &str,
    hash: &str,
) -> Result<()> {
    manifest.set_field(&config.fields.version, version)?;
    manifest.set_field(&config.fields.url, url)?;
    manifest.set_field(&config.fields.hash, hash)?;
    manifest.save()
}
