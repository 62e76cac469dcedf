use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigError;
use crate::platform::{PlatformDescriptor, ANDROID_PREFIX};

pub const PRESETS_FILE_NAME: &str = "CMakePresets.json";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresetsFile {
    #[serde(default)]
    configure_presets: Vec<ConfigurePreset>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurePreset {
    name: String,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    inherits: Option<Inherits>,
    #[serde(default)]
    generator: Option<String>,
    #[serde(default)]
    binary_dir: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Inherits {
    One(String),
    Many(Vec<String>),
}

impl Inherits {
    fn names(&self) -> Vec<&str> {
        match self {
            Inherits::One(name) => vec![name.as_str()],
            Inherits::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Buildable platforms declared by a presets file, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresetCatalog {
    platforms: Vec<PlatformDescriptor>,
}

impl PresetCatalog {
    pub fn new(platforms: Vec<PlatformDescriptor>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for platform in &platforms {
            if !seen.insert(platform.name.as_str()) {
                return Err(ConfigError::DuplicatePreset {
                    name: platform.name.clone(),
                });
            }
        }
        Ok(Self { platforms })
    }

    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = project_dir.join(PRESETS_FILE_NAME);
        if !path.exists() {
            return Err(ConfigError::MissingPresets {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::Io)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let parsed: PresetsFile = serde_json::from_str(contents).map_err(ConfigError::Json)?;
        let mut by_name: HashMap<&str, &ConfigurePreset> = HashMap::new();
        for preset in &parsed.configure_presets {
            if by_name.insert(preset.name.as_str(), preset).is_some() {
                return Err(ConfigError::DuplicatePreset {
                    name: preset.name.clone(),
                });
            }
        }
        let mut platforms = Vec::new();
        for preset in parsed.configure_presets.iter().filter(|preset| !preset.hidden) {
            let generator = resolve_field(preset, &by_name, &mut Vec::new(), &|p: &ConfigurePreset| {
                p.generator.clone()
            })?;
            let binary_dir = resolve_field(preset, &by_name, &mut Vec::new(), &|p: &ConfigurePreset| {
                p.binary_dir.clone()
            })?;
            platforms.push(PlatformDescriptor {
                name: preset.name.clone(),
                generator,
                binary_dir,
            });
        }
        Self::new(platforms)
    }

    pub fn platforms(&self) -> &[PlatformDescriptor] {
        &self.platforms
    }

    pub fn names(&self) -> Vec<String> {
        self.platforms.iter().map(|p| p.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&PlatformDescriptor> {
        self.platforms.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn android_names(&self) -> Vec<String> {
        self.platforms
            .iter()
            .filter(|p| p.name.starts_with(ANDROID_PREFIX))
            .map(|p| p.name.clone())
            .collect()
    }
}

// First preset in inheritance order that sets the field wins.
fn resolve_field(
    preset: &ConfigurePreset,
    by_name: &HashMap<&str, &ConfigurePreset>,
    chain: &mut Vec<String>,
    field: &dyn Fn(&ConfigurePreset) -> Option<String>,
) -> Result<Option<String>, ConfigError> {
    if chain.iter().any(|name| name == &preset.name) {
        chain.push(preset.name.clone());
        return Err(ConfigError::InheritanceCycle {
            chain: chain.clone(),
        });
    }
    if let Some(value) = field(preset) {
        return Ok(Some(value));
    }
    chain.push(preset.name.clone());
    if let Some(inherits) = &preset.inherits {
        for parent in inherits.names() {
            if let Some(&parent) = by_name.get(parent) {
                if let Some(value) = resolve_field(parent, by_name, chain, field)? {
                    return Ok(Some(value));
                }
            }
        }
    }
    chain.pop();
    Ok(None)
}
