//! Workspace configuration file loading.

use super::types::WorkspaceConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// File names probed at the workspace root, in order of preference.
const CONFIG_FILE_NAMES: [&str; 2] = ["forge.json", "workspace.json"];

impl WorkspaceConfig {
    /// Loads the workspace configuration from `root`.
    ///
    /// Probes `forge.json` then `workspace.json`; when neither exists the
    /// default configuration is returned. Unknown keys in the file are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a file exists but cannot be read
    /// or is not valid JSON.
    pub fn load(root: &Path) -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }

            let contents = std::fs::read_to_string(&path).map_err(|error| {
                Error::config(format!("Failed to read {}: {error}", path.display()))
            })?;
            let config = serde_json::from_str(&contents).map_err(|error| {
                Error::config(format!("Malformed {}: {error}", path.display()))
            })?;
            log::debug!("Loaded workspace configuration from {}", path.display());
            return Ok(config);
        }

        log::debug!("No workspace configuration file found, using defaults");
        Ok(Self::default())
    }
}
