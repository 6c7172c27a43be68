//! Filesystem adapter for plate images.

use anyhow::{Context, Result};
use ishihara_core::PlateSource;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Image extensions considered plate candidates.
const PLATE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// Plate source backed by a single flat directory.
///
/// Only regular files directly inside the directory are listed;
/// subdirectories are ignored.
#[derive(Debug, Clone)]
pub struct FsPlateSource {
    dir: PathBuf,
}

impl FsPlateSource {
    /// Creates a source reading plates from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the plates are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PlateSource for FsPlateSource {
    fn names(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read plate directory {}", self.dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {e}", self.dir.display());
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !is_plate_image(&path) {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => debug!("Skipping non UTF-8 filename: {name:?}"),
            }
        }

        debug!("Found {} image files in {}", names.len(), self.dir.display());
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        if !is_bare_name(name) {
            anyhow::bail!("Refusing to read outside the plate directory: {name:?}");
        }

        let path = self.dir.join(name);
        std::fs::read(&path).with_context(|| format!("Failed to read plate {}", path.display()))
    }
}

/// Checks if a path has a plate image extension.
fn is_plate_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| PLATE_EXTENSIONS.contains(&e.as_str()))
}

fn is_bare_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
