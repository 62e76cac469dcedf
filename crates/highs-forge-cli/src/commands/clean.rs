use std::path::{Path, PathBuf};

use highs_forge_core::Reporter;
use highs_forge_pack::Cleaner;

/// Removes CMake caches and `build/`; preset output dirs live below `build/`.
pub fn run(project_dir: &Path, reporter: &dyn Reporter) -> Vec<PathBuf> {
    Cleaner::new(project_dir, reporter).clean_all()
}
