//! JSON output adapter.

use anyhow::Result;
use ishihara_core::EngineError;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;

/// Writes command results as a single JSON document per call.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty,
        }
    }

    /// Serializes `value` and writes it followed by a newline.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the structured payload for an engine error.
    pub fn write_error(&self, err: &EngineError) -> Result<()> {
        self.write(&error_payload(err))
    }
}

/// Builds `{ "error": { "code", "message" } }` for an engine error.
#[must_use]
pub fn error_payload(err: &EngineError) -> serde_json::Value {
    json!({
        "error": {
            "code": err.code(),
            "message": err.to_string(),
        }
    })
}
