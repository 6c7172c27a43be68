//! Model file location, listing and download.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the digit classifier model.
pub const DIGIT_MODEL: &str = "ishihara_digit";

/// Read buffer size used when streaming downloads.
const CHUNK_SIZE: usize = 64 * 1024;

/// Model metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// Filename in the models directory.
    pub filename: &'static str,
    /// One-line description.
    pub description: &'static str,
}

/// Known models.
pub const MODELS: &[ModelInfo] = &[ModelInfo {
    name: DIGIT_MODEL,
    filename: "ishihara_digit.safetensors",
    description: "CNN reading the digit hidden in an Ishihara plate",
}];

/// Install status of a known model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatus {
    /// Model metadata.
    pub info: ModelInfo,
    /// Location the model is expected at.
    pub path: PathBuf,
    /// Whether the file exists.
    pub installed: bool,
}

/// Returns the default models directory.
///
/// Uses `XDG_DATA_HOME/ishihara/models` or `~/.local/share/ishihara/models`.
#[must_use]
pub fn default_models_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ishihara")
        .join("models")
}

/// Looks up a known model by name.
#[must_use]
pub fn find_model(name: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.name == name)
}

/// Returns the path of a known model inside `dir`.
#[must_use]
pub fn model_path(dir: &Path, name: &str) -> Option<PathBuf> {
    find_model(name).map(|m| dir.join(m.filename))
}

/// Lists the known models and whether each is installed in `dir`.
#[must_use]
pub fn list_models(dir: &Path) -> Vec<ModelStatus> {
    MODELS
        .iter()
        .map(|m| {
            let path = dir.join(m.filename);
            ModelStatus {
                info: *m,
                installed: path.is_file(),
                path,
            }
        })
        .collect()
}

/// Downloads `model` from `url` into `dir`.
///
/// `progress` is called with the bytes received so far and the total size
/// when the server reports one.
///
/// # Errors
///
/// Returns an error if the request fails, the server answers with a
/// non-success status, the checksum does not match, or the file cannot
/// be written.
pub fn fetch_model(
    dir: &Path,
    model: &ModelInfo,
    url: &str,
    sha256: Option<&str>,
    progress: impl FnMut(u64, Option<u64>),
) -> Result<PathBuf> {
    info!("Downloading model {} from {url}", model.name);

    let response = reqwest::blocking::get(url)
        .with_context(|| format!("Failed to download {}", model.name))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status: {}", response.status());
    }

    let total = response.content_length();
    install_model(dir, model, response, total, sha256, progress)
}

/// Streams model bytes from `reader` into `dir`, verifying `sha256` if given.
///
/// The data lands in a `.part` file first and is renamed into place only
/// after the checksum matched, so an interrupted or corrupt download never
/// replaces a working model.
///
/// # Errors
///
/// Returns an error on read or write failure or on a checksum mismatch.
pub fn install_model(
    dir: &Path,
    model: &ModelInfo,
    mut reader: impl Read,
    total: Option<u64>,
    sha256: Option<&str>,
    mut progress: impl FnMut(u64, Option<u64>),
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create models directory {}", dir.display()))?;

    let target = dir.join(model.filename);
    let partial = dir.join(format!("{}.part", model.filename));

    let streamed = stream_to_file(&partial, model, &mut reader, total, &mut progress);
    let (hash, received) = match streamed {
        Ok(done) => done,
        Err(e) => {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
    };

    match sha256 {
        Some(expected) if !expected.eq_ignore_ascii_case(&hash) => {
            let _ = fs::remove_file(&partial);
            anyhow::bail!(
                "Checksum mismatch for {}: expected {}, got {hash}",
                model.name,
                expected.to_lowercase()
            );
        }
        Some(_) => debug!("Checksum verified for {}", model.name),
        None => debug!("No checksum given for {}, skipping verification", model.name),
    }

    if let Err(e) = fs::rename(&partial, &target) {
        let _ = fs::remove_file(&partial);
        return Err(e).with_context(|| format!("Failed to move model into {}", target.display()));
    }

    info!("Installed {} ({received} bytes)", model.name);
    Ok(target)
}

/// Copies `reader` into `partial`, returning the hex SHA-256 and byte count.
fn stream_to_file(
    partial: &Path,
    model: &ModelInfo,
    reader: &mut impl Read,
    total: Option<u64>,
    progress: &mut impl FnMut(u64, Option<u64>),
) -> Result<(String, u64)> {
    let mut file = fs::File::create(partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut received = 0u64;

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read data for {}", model.name))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n])
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        received += n as u64;
        progress(received, total);
    }
    file.flush()
        .with_context(|| format!("Failed to write {}", partial.display()))?;

    Ok((format!("{:x}", hasher.finalize()), received))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn digit_model() -> &'static ModelInfo {
        find_model(DIGIT_MODEL).unwrap()
    }

    #[test]
    fn test_default_models_dir() {
        assert!(default_models_dir().ends_with("ishihara/models"));
    }

    #[test]
    fn test_model_path() {
        let path = model_path(Path::new("/m"), DIGIT_MODEL).unwrap();
        assert_eq!(path, PathBuf::from("/m/ishihara_digit.safetensors"));
    }

    #[test]
    fn test_model_path_unknown() {
        assert!(model_path(Path::new("/m"), "unknown").is_none());
    }

    #[test]
    fn test_list_models_reports_install_state() {
        let dir = tempfile::tempdir().unwrap();
        let before = list_models(dir.path());
        assert_eq!(before.len(), 1);
        assert!(!before[0].installed);

        fs::write(dir.path().join("ishihara_digit.safetensors"), b"x").unwrap();
        assert!(list_models(dir.path())[0].installed);
    }

    #[test]
    fn test_install_model_with_matching_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let mut seen = Vec::new();

        let path = install_model(
            dir.path(),
            digit_model(),
            Cursor::new(b"hello".to_vec()),
            Some(5),
            Some(&HELLO_SHA256.to_uppercase()),
            |done, total| seen.push((done, total)),
        )
        .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello");
        assert_eq!(seen.last(), Some(&(5, Some(5))));
        assert!(!dir.path().join("ishihara_digit.safetensors.part").exists());
        let hash = format!("{:x}", Sha256::digest(fs::read(&path).unwrap()));
        assert_eq!(hash, HELLO_SHA256);
    }

    #[test]
    fn test_install_model_checksum_mismatch_keeps_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ishihara_digit.safetensors");
        fs::write(&target, b"old").unwrap();

        let err = install_model(
            dir.path(),
            digit_model(),
            Cursor::new(b"corrupt".to_vec()),
            None,
            Some(HELLO_SHA256),
            |_, _| {},
        )
        .unwrap_err();

        assert!(err.to_string().contains("Checksum mismatch"));
        assert_eq!(fs::read(&target).unwrap(), b"old");
        assert!(!dir.path().join("ishihara_digit.safetensors.part").exists());
    }

    /// Yields one chunk, then fails like a dropped connection.
    struct BrokenStream {
        sent: bool,
    }

    impl Read for BrokenStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ));
            }
            self.sent = true;
            buf[..4].copy_from_slice(b"part");
            Ok(4)
        }
    }

    #[test]
    fn test_install_model_read_error_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ishihara_digit.safetensors");
        fs::write(&target, b"old").unwrap();

        let err = install_model(
            dir.path(),
            digit_model(),
            BrokenStream { sent: false },
            None,
            None,
            |_, _| {},
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("Failed to read data"));
        assert!(!dir.path().join("ishihara_digit.safetensors.part").exists());
        assert_eq!(fs::read(&target).unwrap(), b"old");
    }

    #[test]
    fn test_install_model_without_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let path = install_model(
            &nested,
            digit_model(),
            Cursor::new(vec![7u8; 3 * CHUNK_SIZE + 1]),
            None,
            None,
            |_, _| {},
        )
        .unwrap();
        assert_eq!(fs::metadata(path).unwrap().len(), 3 * CHUNK_SIZE as u64 + 1);
    }
}
