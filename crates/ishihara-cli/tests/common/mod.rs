//! Shared fixtures for CLI integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use ishihara_core::PlateCategory;
use ishihara_test_support::{PlateNameBuilder, SyntheticPlateBuilder};
use tempfile::TempDir;

/// Isolated working area: its own cwd, XDG dirs and plate directory.
pub struct Sandbox {
    pub root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("work")).unwrap();
        std::fs::create_dir_all(root.path().join("config")).unwrap();
        std::fs::create_dir_all(root.path().join("data")).unwrap();
        Self { root }
    }

    pub fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    pub fn xdg_config(&self) -> PathBuf {
        self.root.path().join("config").join("ishihara").join("config.toml")
    }

    /// Writes `count` plates per category into `work/<dir>`.
    pub fn plates(&self, dir: &str, per_category: u8) -> PathBuf {
        let plates = self.work().join(dir);
        write_plates(&plates, per_category);
        plates
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// `ishihara` with cwd and XDG dirs inside the sandbox.
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("ishihara").unwrap();
        cmd.current_dir(self.work())
            .env("XDG_CONFIG_HOME", self.root.path().join("config"))
            .env("XDG_DATA_HOME", self.root.path().join("data"))
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Plate filename for `digit` in `category`, unique per digit.
pub fn plate_name(digit: u8, category: PlateCategory) -> String {
    PlateNameBuilder::new(digit)
        .font(format!("Font{digit}"))
        .category(category)
        .build()
}

pub fn write_plates(dir: &Path, per_category: u8) {
    std::fs::create_dir_all(dir).unwrap();
    for category in PlateCategory::ALL {
        for digit in 0..per_category {
            let name = plate_name(digit % 10, category);
            let name = if digit >= 10 {
                name.replace("theme_1", &format!("theme_{digit}"))
            } else {
                name
            };
            std::fs::write(
                dir.join(name),
                SyntheticPlateBuilder::new(digit % 10).png_bytes(),
            )
            .unwrap();
        }
    }
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
