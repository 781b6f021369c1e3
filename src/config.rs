//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/snaptile/config.json`.
//! A missing file is fine — everything falls back to the compiled-in layout
//! table.  The only section so far is `"layouts"`, which can replace a
//! built-in cycle list or add a new command name; the top-level schema
//! leaves room for more sections later without breaking existing files.
//!
//! # Example
//!
//! ```json
//! {
//!   "layouts": {
//!     "left": [[0.0, 0.0, 0.5, 1.0], [0.0, 0.0, 0.25, 1.0]],
//!     "center-third": [[0.333, 0.0, 0.333, 1.0]]
//!   }
//! }
//! ```
//!
//! Each rectangle is `[x, y, w, h]` as fractions of the monitor size.
//! Overrides are validated with the same rules as the built-in table when
//! the layout table is built.

use crate::geometry::FracRect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional — a minimal `{}` file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Per-command cycle-list overrides, merged over the built-in table.
    #[serde(default)]
    pub layouts: HashMap<String, Vec<FracRect>>,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
