use std::path::{Path, PathBuf};

use crate::platform::{normalize_path, BuildType};
use crate::preset::{PresetCatalog, PRESETS_FILE_NAME};
use crate::settings::ProjectSettings;
use crate::toolchain::ToolchainStore;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Toml(toml::de::Error),
    MissingPresets { path: String },
    DuplicatePreset { name: String },
    InheritanceCycle { chain: Vec<String> },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(error) => write!(f, "failed to read config: {}", error),
            ConfigError::Json(error) => write!(f, "invalid JSON in {}: {}", PRESETS_FILE_NAME, error),
            ConfigError::Toml(error) => write!(f, "failed to parse project settings: {}", error),
            ConfigError::MissingPresets { path } => {
                write!(f, "{} not found at {}", PRESETS_FILE_NAME, path)
            }
            ConfigError::DuplicatePreset { name } => write!(f, "duplicate preset '{}'", name),
            ConfigError::InheritanceCycle { chain } => {
                write!(f, "preset inheritance cycle: {}", chain.join(" -> "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Absolute, dot-free form of a directory given on the command line.
pub fn absolute_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let absolute = std::path::absolute(path).map_err(ConfigError::Io)?;
    Ok(normalize_path(&absolute))
}

/// Everything a run needs, loaded once at startup and read-only afterwards.
#[derive(Clone, Debug)]
pub struct BuildContext {
    pub project_dir: PathBuf,
    pub env_file: PathBuf,
    pub presets: PresetCatalog,
    pub settings: ProjectSettings,
    pub toolchain_path: Option<PathBuf>,
    pub build_type: BuildType,
    pub extract_libs: bool,
}

impl BuildContext {
    pub fn load(
        project_dir: &Path,
        store: &ToolchainStore,
        build_type: BuildType,
        extract_libs: bool,
    ) -> Result<Self, ConfigError> {
        let project_dir = absolute_dir(project_dir)?;
        let presets = PresetCatalog::load(&project_dir)?;
        let settings = ProjectSettings::load(&project_dir)?;
        Ok(Self {
            project_dir,
            env_file: store.path().to_path_buf(),
            presets,
            settings,
            toolchain_path: store.load(),
            build_type,
            extract_libs,
        })
    }

    pub fn presets_file(&self) -> PathBuf {
        self.project_dir.join(PRESETS_FILE_NAME)
    }

    pub fn build_root(&self) -> PathBuf {
        self.project_dir.join("build")
    }

    /// Output directory for a platform, falling back to `build/<name>` for unknown names.
    pub fn output_dir(&self, platform: &str) -> PathBuf {
        match self.presets.get(platform) {
            Some(descriptor) => descriptor.output_dir(&self.project_dir),
            None => crate::platform::default_output_dir(&self.project_dir, platform),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("highs-forge-core-{}-{}", name, stamp));
        std::fs::create_dir_all(&path).expect("create temp dir");
        path
    }

    #[test]
    fn loads_context_from_project_dir() {
        let dir = temp_dir("context");
        std::fs::write(
            dir.join(PRESETS_FILE_NAME),
            r#"{"configurePresets": [{"name": "linux-x64", "generator": "Ninja"}]}"#,
        )
        .expect("write presets");
        let store = ToolchainStore::new(dir.join(".env"));
        let context =
            BuildContext::load(&dir, &store, BuildType::Debug, true).expect("context");
        assert_eq!(context.presets.names(), vec!["linux-x64"]);
        assert_eq!(context.toolchain_path, None);
        assert_eq!(context.build_type, BuildType::Debug);
        assert_eq!(context.settings, ProjectSettings::default());
        assert_eq!(context.output_dir("linux-x64"), dir.join("build").join("linux-x64"));
    }

    #[test]
    fn relative_project_dir_becomes_absolute() {
        let cwd = std::env::current_dir().expect("cwd");
        let resolved = absolute_dir(Path::new("./highs_patched/../highs_patched")).expect("absolute");
        assert_eq!(resolved, cwd.join("highs_patched"));
    }

    #[test]
    fn loaded_context_resolves_preset_dirs_against_absolute_root() {
        let dir = temp_dir("dotted");
        std::fs::write(
            dir.join(PRESETS_FILE_NAME),
            r#"{"configurePresets": [{"name": "linux-x64", "binaryDir": "${sourceDir}/build/${presetName}"}]}"#,
        )
        .expect("write presets");
        let store = ToolchainStore::new(dir.join(".env"));
        let context = BuildContext::load(&dir.join("."), &store, BuildType::Release, false)
            .expect("context");
        assert_eq!(context.project_dir, dir);
        assert_eq!(context.output_dir("linux-x64"), dir.join("build").join("linux-x64"));
    }

    #[test]
    fn missing_presets_abort_loading() {
        let dir = temp_dir("no-presets");
        let store = ToolchainStore::new(dir.join(".env"));
        let error = BuildContext::load(&dir, &store, BuildType::Release, false)
            .expect_err("error");
        assert!(matches!(error, ConfigError::MissingPresets { .. }));
    }
}
