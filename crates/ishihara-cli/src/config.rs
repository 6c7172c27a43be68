//! Configuration file support for the ishihara CLI.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/ishihara/config.toml` (lowest priority)
//! - Project-local: `.ishihara.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use ishihara_core::engine::{MAX_PLATES, MIN_PLATES};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Name of the project-local config file.
pub const PROJECT_CONFIG: &str = ".ishihara.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Plate directory settings.
    pub plates: PlatesConfig,
    /// Session settings.
    pub session: SessionConfig,
    /// Model settings.
    pub models: ModelsConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Plate directory configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PlatesConfig {
    /// Directory holding the plate images.
    pub dir: Option<PathBuf>,
}

/// Session configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Plates per session when `--count` is not given.
    pub default_count: Option<usize>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Missing files are silently ignored. Unreadable or invalid files and
    /// out-of-range values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.validate() {
            warn!("{problem}");
            eprintln!("warning: {problem}");
        }

        config
    }

    /// Lists values outside their accepted ranges.
    fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(count) = self.session.default_count {
            if !(MIN_PLATES..=MAX_PLATES).contains(&count) {
                problems.push(format!(
                    "session.default_count must be {MIN_PLATES}-{MAX_PLATES}, got {count} (will be clamped)"
                ));
            }
        }

        if let Some(dir) = &self.plates.dir {
            if dir.as_os_str().is_empty() {
                problems.push("plates.dir must not be empty".to_string());
            }
        }

        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.plates.dir = other.plates.dir.or_else(|| self.plates.dir.take());
        self.session.default_count = other.session.default_count.or(self.session.default_count);
        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ishihara").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.ishihara.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG))
        .find(|path| path.is_file())
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
