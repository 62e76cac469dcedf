use highs_forge_core::{BuildContext, StrategyKind};

/// Human-readable view of the loaded context.
pub fn render(context: &BuildContext) -> Vec<String> {
    let mut lines = vec!["Current Configuration:".to_string()];
    if let Ok(cwd) = std::env::current_dir() {
        lines.push(format!("  Working directory: {}", cwd.display()));
    }
    lines.push(format!("  Project directory: {}", context.project_dir.display()));
    lines.push(format!("  CMake presets: {}", context.presets_file().display()));
    lines.push(format!("  Environment file: {}", context.env_file.display()));
    lines.push(format!("  Build configuration: {}", context.build_type));
    lines.push(format!("  Extract libraries: {}", context.extract_libs));
    lines.push(format!("  Library name: {}", context.settings.library));
    lines.push(format!("  Version token: {}", context.settings.version_token));
    match &context.toolchain_path {
        Some(path) => lines.push(format!("  Android NDK: {}", path.display())),
        None => {
            lines.push("  Android NDK: Not configured".to_string());
            lines.push("    Use: highs-forge build android --ndk-path /path/to/ndk".to_string());
        }
    }

    lines.push(String::new());
    lines.push("Available platforms:".to_string());
    let (gated, standard): (Vec<String>, Vec<String>) = context
        .presets
        .names()
        .into_iter()
        .partition(|name| StrategyKind::classify(name).requires_toolchain());
    lines.extend(standard.iter().map(|name| format!("  - {}", name)));
    let note = if context.toolchain_path.is_some() {
        ""
    } else {
        " (requires NDK path)"
    };
    lines.extend(gated.iter().map(|name| format!("  - {}{}", name, note)));
    lines
}
