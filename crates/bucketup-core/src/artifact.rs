//! Scratch file that receives the installer download.

use crate::error::{Result, UpdateError};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Downloaded installer held in a uniquely named file inside the scratch dir.
///
/// Dropping without `finish` removes the file.
#[derive(Debug)]
pub struct TempArtifact {
    file: NamedTempFile,
    dir: PathBuf,
    file_name: String,
}

impl TempArtifact {
    /// Create an empty artifact in `dir` (created if missing). `file_name` is
    /// the name the file gets if it is kept.
    pub fn create(dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| UpdateError::io("creating scratch dir", dir, e))?;
        let file = tempfile::Builder::new()
            .prefix(&format!("{file_name}."))
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| UpdateError::io("creating temp file in", dir, e))?;
        tracing::debug!(path = %file.path().display(), "created temp artifact");
        Ok(Self {
            file,
            dir: dir.to_path_buf(),
            file_name: file_name.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }

    /// Flush written bytes to disk before the file is re-read for hashing.
    pub fn sync(&self) -> Result<()> {
        self.file
            .as_file()
            .sync_all()
            .map_err(|e| UpdateError::io("syncing", self.file.path(), e))
    }

    /// Keep the artifact under its final name or delete it.
    ///
    /// Returns the kept path. Failures here never fail the update; they are
    /// logged as warnings.
    pub fn finish(self, keep: bool) -> Option<PathBuf> {
        if !keep {
            let path = self.file.path().to_path_buf();
            match self.file.close() {
                Ok(()) => tracing::info!(path = %path.display(), "removed temp artifact"),
                Err(e) => tracing::warn!(path = %path.display(), "failed to remove temp artifact: {}", e),
            }
            return None;
        }

        let target = self.dir.join(&self.file_name);
        match self.file.persist(&target) {
            Ok(_) => {
                tracing::info!(path = %target.display(), "kept downloaded installer");
                Some(target)
            }
            Err(e) => {
                tracing::warn!(
                    path = %target.display(),
                    "could not rename kept installer, leaving temp name: {}",
                    e.error
                );
                match e.file.keep() {
                    Ok((_, path)) => Some(path),
                    Err(e) => {
                        tracing::warn!("failed to keep temp artifact: {}", e.error);
                        None
                    }
                }
            }
        }
    }
}
