use std::path::{Path, PathBuf};

pub const NDK_PATH_KEY: &str = "ANDROID_NDK_PATH";
pub const NDK_MARKER: &str = "build/cmake/android.toolchain.cmake";
/// Variables exported to cross builds; consumers disagree on the name.
pub const NDK_ENV_VARS: [&str; 2] = ["ANDROID_NDK_ROOT", "ANDROID_NDK_HOME"];

#[derive(Debug)]
pub enum ToolchainError {
    MissingPath { path: String },
    MissingMarker { path: String },
    Io(std::io::Error),
}

impl std::fmt::Display for ToolchainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolchainError::MissingPath { path } => {
                write!(f, "Android NDK path does not exist: {}", path)
            }
            ToolchainError::MissingMarker { path } => write!(
                f,
                "invalid Android NDK path: {} (expected to find {})",
                path, NDK_MARKER
            ),
            ToolchainError::Io(error) => write!(f, "failed to persist NDK path: {}", error),
        }
    }
}

impl std::error::Error for ToolchainError {}

/// Key-value file holding the persisted NDK path alongside unrelated keys.
#[derive(Clone, Debug)]
pub struct ToolchainStore {
    path: PathBuf,
}

impl ToolchainStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persisted NDK path, ignored when it no longer exists on disk.
    pub fn load(&self) -> Option<PathBuf> {
        let entries = self.read_entries().ok()?;
        entries
            .into_iter()
            .find(|(key, _)| key == NDK_PATH_KEY)
            .map(|(_, value)| PathBuf::from(value))
            .filter(|path| !path.as_os_str().is_empty() && path.exists())
    }

    /// Validates and persists `candidate`, returning the canonical path stored.
    pub fn set(&self, candidate: &Path) -> Result<PathBuf, ToolchainError> {
        let resolved = validate_ndk_path(candidate)?;
        let mut entries = self.read_entries().map_err(ToolchainError::Io)?;
        let value = resolved.to_string_lossy().into_owned();
        match entries.iter_mut().find(|(key, _)| key == NDK_PATH_KEY) {
            Some(entry) => entry.1 = value,
            None => entries.push((NDK_PATH_KEY.to_string(), value)),
        }
        self.write_entries(&entries).map_err(ToolchainError::Io)?;
        Ok(resolved)
    }

    fn read_entries(&self) -> std::io::Result<Vec<(String, String)>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(parse_entries(&contents))
    }

    fn write_entries(&self, entries: &[(String, String)]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut contents = String::from("# HiGHS Build Configuration\n");
        contents.push_str("# Android NDK path for cross-compilation\n");
        for (key, value) in entries {
            contents.push_str(&format!("{}=\"{}\"\n", key, value));
        }
        std::fs::write(&self.path, contents)
    }
}

pub fn validate_ndk_path(candidate: &Path) -> Result<PathBuf, ToolchainError> {
    if !candidate.exists() {
        return Err(ToolchainError::MissingPath {
            path: candidate.display().to_string(),
        });
    }
    if !candidate.join(NDK_MARKER).exists() {
        return Err(ToolchainError::MissingMarker {
            path: candidate.display().to_string(),
        });
    }
    candidate.canonicalize().map_err(ToolchainError::Io)
}

fn parse_entries(contents: &str) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = match line.split_once('=') {
            Some(pair) => pair,
            None => continue,
        };
        let key = key.trim().to_string();
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }
    entries
}
