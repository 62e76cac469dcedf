use std::fs;
use std::path::{Path, PathBuf};

use highs_forge_core::platform::normalize_path;
use highs_forge_core::Reporter;

pub const ROOT_ARTIFACTS: [&str; 2] = ["CMakeCache.txt", "CMakeFiles"];

/// Best-effort removal of build outputs; failures are warned about, never raised.
pub struct Cleaner<'a> {
    project_dir: PathBuf,
    reporter: &'a dyn Reporter,
}

impl<'a> Cleaner<'a> {
    pub fn new(project_dir: impl Into<PathBuf>, reporter: &'a dyn Reporter) -> Self {
        let project_dir: PathBuf = project_dir.into();
        Self {
            project_dir: normalize_path(&project_dir),
            reporter,
        }
    }

    pub fn build_root(&self) -> PathBuf {
        self.project_dir.join("build")
    }

    /// Per-platform removal is confined to directories strictly below `build/`.
    pub fn is_removable(&self, dir: &Path) -> bool {
        let root = self.build_root();
        let dir = normalize_path(dir);
        dir != root && dir.starts_with(&root)
    }

    pub fn clean_all(&self) -> Vec<PathBuf> {
        self.reporter.header("Cleaning Up");
        let mut removed = Vec::new();
        for artifact in ROOT_ARTIFACTS {
            let path = self.project_dir.join(artifact);
            if self.remove(&path, &format!("Removing {}", artifact)) {
                removed.push(path);
            }
        }
        let build_root = self.build_root();
        if self.remove(&build_root, "Removing build directory: build/") {
            removed.push(build_root);
        }
        self.reporter.success("Cleanup completed");
        removed
    }

    pub fn clean_dirs(&self, dirs: &[PathBuf]) -> Vec<PathBuf> {
        let mut removed = Vec::new();
        for dir in dirs {
            if !self.is_removable(dir) {
                self.reporter.warning(&format!(
                    "Not cleaning {}: outside {}",
                    dir.display(),
                    self.build_root().display()
                ));
                continue;
            }
            let label = dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| dir.display().to_string());
            if self.remove(dir, &format!("Cleaning previous build: {}", label)) {
                removed.push(dir.clone());
            }
        }
        removed
    }

    fn remove(&self, path: &Path, message: &str) -> bool {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(_) => return false,
        };
        self.reporter.info(message);
        let result = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                self.reporter
                    .warning(&format!("Failed to remove {}: {}", path.display(), err));
                false
            }
        }
    }
}
