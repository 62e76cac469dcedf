use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigError;

pub const SETTINGS_FILE_NAME: &str = "highs-forge.toml";

/// Optional per-project overrides read from `highs-forge.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSettings {
    /// Token identifying the library's own binaries (matched case-insensitively).
    pub library: String,
    /// Substring marking the real versioned shared library on Linux and macOS.
    pub version_token: String,
    /// Device and simulator presets combined by the `ios` macro.
    pub ios_platforms: Vec<String>,
    pub bundle_name: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            library: "highs".to_string(),
            version_token: "1.11".to_string(),
            ios_platforms: vec!["ios-arm64".to_string(), "ios-simulator-arm64".to_string()],
            bundle_name: "highs".to_string(),
        }
    }
}

impl ProjectSettings {
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = project_dir.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(ConfigError::Toml)
    }

    pub fn static_library_name(&self) -> String {
        format!("lib{}.a", self.library)
    }
}
