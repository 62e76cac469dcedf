use std::collections::HashSet;

use highs_forge_build::CommandRunner;
use highs_forge_core::preset::PresetCatalog;
use highs_forge_core::{BuildContext, Reporter, StrategyKind};

use crate::orchestrator::{BatchReport, Orchestrator};

pub const ALL_TARGET: &str = "all";
pub const IOS_TARGET: &str = "ios";
pub const ANDROID_TARGET: &str = "android";
pub const MACRO_TARGETS: [&str; 3] = [ALL_TARGET, IOS_TARGET, ANDROID_TARGET];

/// What a `build` invocation asked for, after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildTarget {
    All,
    Ios,
    Android,
    Platforms(Vec<String>),
}

pub struct BuildArgs {
    pub platforms: Vec<String>,
}

/// Validates requested names; a macro must be the only token.
pub fn resolve_target(requested: &[String], catalog: &PresetCatalog) -> Result<BuildTarget, String> {
    if requested.is_empty() {
        return Ok(BuildTarget::All);
    }
    if let Some(macro_name) = requested
        .iter()
        .find(|name| MACRO_TARGETS.contains(&name.as_str()))
    {
        if requested.len() > 1 {
            return Err(format!(
                "Cannot combine '{}' with other platforms: {}",
                macro_name,
                requested.join(" ")
            ));
        }
        return Ok(match macro_name.as_str() {
            ALL_TARGET => BuildTarget::All,
            IOS_TARGET => BuildTarget::Ios,
            _ => BuildTarget::Android,
        });
    }

    let invalid: Vec<&str> = requested
        .iter()
        .filter(|name| !catalog.contains(name))
        .map(String::as_str)
        .collect();
    if !invalid.is_empty() {
        return Err(format!(
            "Invalid platforms: {}\nAvailable platforms: {}\nSpecial targets: {}",
            invalid.join(", "),
            catalog.names().join(", "),
            MACRO_TARGETS.join(", ")
        ));
    }
    let mut seen = HashSet::new();
    let platforms = requested
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect();
    Ok(BuildTarget::Platforms(platforms))
}

pub fn run(
    context: &BuildContext,
    args: BuildArgs,
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
) -> Result<BatchReport, String> {
    let target = resolve_target(&args.platforms, &context.presets)?;
    if let BuildTarget::Platforms(platforms) = &target {
        let gated: Vec<&str> = platforms
            .iter()
            .filter(|name| StrategyKind::classify(name).requires_toolchain())
            .map(String::as_str)
            .collect();
        if !gated.is_empty() && context.toolchain_path.is_none() {
            return Err(format!(
                "Android NDK path is required to build {} (use --ndk-path /path/to/ndk)",
                gated.join(", ")
            ));
        }
    }

    let orchestrator = Orchestrator::new(context, runner, reporter);
    let report = match target {
        BuildTarget::All => orchestrator.build_all(),
        BuildTarget::Ios => orchestrator.build_ios().map_err(|err| err.to_string())?,
        BuildTarget::Android => orchestrator.build_android().map_err(|err| err.to_string())?,
        BuildTarget::Platforms(platforms) => orchestrator.build_multiple_platforms(&platforms),
    };
    if report.success() {
        Ok(report)
    } else {
        Err(format!("Build failed for: {}", report.failed().join(", ")))
    }
}
