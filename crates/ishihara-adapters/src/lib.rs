//! Ishihara Adapters - External adapters for the Ishihara engine.
//!
//! This crate provides adapters for:
//! - Filesystem plate source
//! - Model file location, listing and download

pub mod fs;
pub mod models;

pub use fs::FsPlateSource;
pub use models::{default_models_dir, model_path, DIGIT_MODEL};
