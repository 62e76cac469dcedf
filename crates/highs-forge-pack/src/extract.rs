use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use highs_forge_core::settings::ProjectSettings;
use highs_forge_core::{BuildContext, Reporter};
use walkdir::WalkDir;

pub const LIBRARY_EXTENSIONS: [&str; 5] = [".a", ".so", ".dylib", ".dll", ".lib"];
/// Name fragments of test, example and intermediate outputs.
pub const EXCLUDED_FRAGMENTS: [&str; 6] = ["cmake", "test", "example", "benchmark", "obj.", "pdb"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractError {
    MissingBuildDir { platform: String, candidates: Vec<PathBuf> },
    NoArtifacts { platform: String, dir: PathBuf },
    VersionedLibrary { token: String, matches: Vec<String> },
    Io { message: String },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::MissingBuildDir { platform, .. } => write!(
                f,
                "build directory not found for platform {} in standard locations",
                platform
            ),
            ExtractError::NoArtifacts { platform, dir } => {
                write!(f, "no library files found for {} in {}", platform, dir.display())
            }
            ExtractError::VersionedLibrary { token, matches } if matches.is_empty() => {
                write!(f, "no library file contains version token '{}'", token)
            }
            ExtractError::VersionedLibrary { token, matches } => write!(
                f,
                "several library files contain version token '{}': {}",
                token,
                matches.join(", ")
            ),
            ExtractError::Io { message } => write!(f, "extraction i/o error: {}", message),
        }
    }
}

impl std::error::Error for ExtractError {}

fn io_error(action: &str, path: &Path, error: std::io::Error) -> ExtractError {
    ExtractError::Io {
        message: format!("failed to {} '{}': {}", action, path.display(), error),
    }
}

/// Canonical shared-library name for desktop Unix families, if the platform has one.
pub fn canonical_library_name(platform: &str, library: &str) -> Option<String> {
    if platform.contains("linux") {
        Some(format!("lib{}.so", library))
    } else if platform.contains("macos") {
        Some(format!("lib{}.dylib", library))
    } else {
        None
    }
}

pub fn is_library_file(name: &str) -> bool {
    LIBRARY_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) || name.contains(".so.")
}

pub fn is_wanted_library(name: &str, library: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains(&library.to_lowercase())
        && !EXCLUDED_FRAGMENTS
            .iter()
            .any(|fragment| lowered.contains(fragment))
}

pub fn find_library_files(build_dir: &Path, library: &str) -> Result<Vec<PathBuf>, ExtractError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(build_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ExtractError::Io {
            message: err.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_library_file(&name) && is_wanted_library(&name, library) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

pub struct ArtifactExtractor<'a> {
    context: &'a BuildContext,
    reporter: &'a dyn Reporter,
}

impl<'a> ArtifactExtractor<'a> {
    pub fn new(context: &'a BuildContext, reporter: &'a dyn Reporter) -> Self {
        Self { context, reporter }
    }

    fn settings(&self) -> &ProjectSettings {
        &self.context.settings
    }

    pub fn locate_build_dir(&self, platform: &str) -> Result<PathBuf, ExtractError> {
        let root = self.context.output_dir(platform);
        let candidates = vec![root.clone(), root.join("Release"), root.join("Debug")];
        match candidates.iter().find(|path| path.is_dir()) {
            Some(found) => Ok(found.clone()),
            None => Err(ExtractError::MissingBuildDir {
                platform: platform.to_string(),
                candidates,
            }),
        }
    }

    /// Reduces a platform's build tree to its library files, returning their final paths.
    pub fn extract(&self, platform: &str) -> Result<Vec<PathBuf>, ExtractError> {
        let result = self.extract_inner(platform);
        if let Err(error) = &result {
            self.reporter
                .warning(&format!("Library extraction failed for {}: {}", platform, error));
        }
        result
    }

    fn extract_inner(&self, platform: &str) -> Result<Vec<PathBuf>, ExtractError> {
        let build_dir = self.locate_build_dir(platform)?;
        self.reporter.info(&format!(
            "Extracting libraries for {} from {}",
            platform,
            build_dir.display()
        ));
        let found = find_library_files(&build_dir, &self.settings().library)?;
        if found.is_empty() {
            return Err(ExtractError::NoArtifacts {
                platform: platform.to_string(),
                dir: build_dir,
            });
        }
        let retained = self.unique_by_name(found);

        let staging_parent = build_dir.parent().unwrap_or(&build_dir).to_path_buf();
        let staging = tempfile::Builder::new()
            .prefix(&format!(".stage-{}-", platform))
            .tempdir_in(&staging_parent)
            .map_err(|err| io_error("create staging dir in", &staging_parent, err))?;

        let mut staged = Vec::with_capacity(retained.len());
        for source in &retained {
            let name = match source.file_name() {
                Some(name) => name.to_os_string(),
                None => continue,
            };
            let target = staging.path().join(&name);
            if let Err(err) = fs::copy(source, &target) {
                self.rollback(staging, false);
                return Err(io_error("copy", source, err));
            }
            self.reporter
                .info(&format!("Found library: {}", name.to_string_lossy()));
            staged.push((target, name));
        }

        if let Err(error) = clear_dir(&build_dir) {
            self.rollback(staging, true);
            return Err(error);
        }

        let mut extracted = Vec::with_capacity(staged.len());
        for (temp, name) in &staged {
            let final_path = build_dir.join(name);
            if let Err(err) = fs::rename(temp, &final_path) {
                self.rollback(staging, true);
                return Err(io_error("move", temp, err));
            }
            self.reporter
                .success(&format!("Extracted: {}", name.to_string_lossy()));
            extracted.push(final_path);
        }
        if let Err(err) = staging.close() {
            self.reporter
                .warning(&format!("Failed to remove staging directory: {}", err));
        }

        match canonical_library_name(platform, &self.settings().library) {
            Some(canonical) => {
                let library = promote_versioned_library(
                    &build_dir,
                    &extracted,
                    &self.settings().version_token,
                    &canonical,
                )?;
                self.reporter
                    .success(&format!("Renamed library to {}", canonical));
                Ok(vec![library])
            }
            None => Ok(extracted),
        }
    }

    fn unique_by_name(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(files.len());
        for file in files {
            let name = file.file_name().map(|name| name.to_os_string());
            if seen.insert(name) {
                unique.push(file);
            } else {
                self.reporter.warning(&format!(
                    "Skipping duplicate library name: {}",
                    file.display()
                ));
            }
        }
        unique
    }

    fn rollback(&self, staging: tempfile::TempDir, build_dir_touched: bool) {
        let path = staging.path().to_path_buf();
        if let Err(err) = staging.close() {
            self.reporter.error(&format!(
                "Failed to remove staged libraries in {}: {}",
                path.display(),
                err
            ));
        }
        if build_dir_touched {
            self.reporter
                .warning("Build directory may be partially cleared; rebuild the platform to restore it");
        }
    }
}

fn clear_dir(dir: &Path) -> Result<(), ExtractError> {
    let entries = fs::read_dir(dir).map_err(|err| io_error("read", dir, err))?;
    for entry in entries {
        let entry = entry.map_err(|err| io_error("read", dir, err))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|err| io_error("inspect", &path, err))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|err| io_error("remove", &path, err))?;
        } else {
            fs::remove_file(&path).map_err(|err| io_error("remove", &path, err))?;
        }
    }
    Ok(())
}

fn promote_versioned_library(
    build_dir: &Path,
    extracted: &[PathBuf],
    token: &str,
    canonical: &str,
) -> Result<PathBuf, ExtractError> {
    let matches: Vec<&PathBuf> = extracted
        .iter()
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().contains(token))
                .unwrap_or(false)
        })
        .collect();
    if matches.len() != 1 {
        return Err(ExtractError::VersionedLibrary {
            token: token.to_string(),
            matches: matches
                .iter()
                .map(|path| path.display().to_string())
                .collect(),
        });
    }
    let keep = matches[0];
    for path in extracted.iter().filter(|path| *path != keep) {
        fs::remove_file(path).map_err(|err| io_error("remove", path, err))?;
    }
    let final_path = build_dir.join(canonical);
    fs::rename(keep, &final_path).map_err(|err| io_error("rename", keep, err))?;
    Ok(final_path)
}
