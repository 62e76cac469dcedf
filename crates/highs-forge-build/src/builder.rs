use std::path::Path;

use highs_forge_core::{BuildContext, BuildType, GeneratorKind, PlatformDescriptor, Reporter, StrategyKind};

use crate::android::AndroidBuilder;
use crate::ios::IosBuilder;
use crate::runner::{CommandRunner, Invocation, RunError};
use crate::standard::StandardBuilder;

pub const CMAKE: &str = "cmake";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    MissingToolchain { platform: String },
    Command(RunError),
}

impl BuildError {
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, BuildError::Command(RunError::NotFound { .. }))
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::MissingToolchain { platform } => write!(
                f,
                "Android NDK path not set; cannot build {} (use --ndk-path)",
                platform
            ),
            BuildError::Command(error) => write!(f, "build execution failed: {}", error),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<RunError> for BuildError {
    fn from(error: RunError) -> Self {
        BuildError::Command(error)
    }
}

pub trait PlatformBuilder {
    fn kind(&self) -> StrategyKind;
    fn configure(&self, platform: &PlatformDescriptor) -> Result<(), BuildError>;
    fn build(&self, platform: &PlatformDescriptor) -> Result<(), BuildError>;
}

/// Shared collaborators handed to every strategy.
#[derive(Clone, Copy)]
pub struct BuildEnv<'a> {
    pub context: &'a BuildContext,
    pub runner: &'a dyn CommandRunner,
    pub reporter: &'a dyn Reporter,
}

impl BuildEnv<'_> {
    pub(crate) fn run_step(
        &self,
        step: Step,
        platform: &str,
        invocation: Invocation,
    ) -> Result<(), BuildError> {
        match self.runner.run(&invocation) {
            Ok(_) => {
                self.reporter
                    .success(&format!("{} successful for {}", step.label(), platform));
                Ok(())
            }
            Err(error) => {
                match &error {
                    RunError::NotFound { program } => self.reporter.error(&format!(
                        "{} failed for {}: {} is not installed",
                        step.label(),
                        platform,
                        program
                    )),
                    other => self.reporter.error(&format!(
                        "{} failed for {}: {}",
                        step.label(),
                        platform,
                        other
                    )),
                }
                Err(BuildError::Command(error))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Configure,
    Build,
}

impl Step {
    fn label(self) -> &'static str {
        match self {
            Step::Configure => "Configuration",
            Step::Build => "Build",
        }
    }
}

/// `cmake --preset <name>`, pinning the build type only where the generator needs it.
pub fn configure_invocation(
    preset: &str,
    generator: GeneratorKind,
    build_type: BuildType,
    project_dir: &Path,
) -> Invocation {
    let mut invocation = Invocation::new(CMAKE)
        .args(["--preset", preset])
        .current_dir(project_dir);
    if generator == GeneratorKind::SingleConfig && !build_type.is_default() {
        invocation = invocation.arg(format!("-DCMAKE_BUILD_TYPE={}", build_type));
    }
    invocation
}

/// `cmake --build --preset <name>`, selecting the configuration for multi-config generators.
pub fn build_invocation(
    preset: &str,
    generator: GeneratorKind,
    build_type: BuildType,
    project_dir: &Path,
) -> Invocation {
    let mut invocation = Invocation::new(CMAKE)
        .args(["--build", "--preset", preset])
        .current_dir(project_dir);
    if generator == GeneratorKind::MultiConfig {
        invocation = invocation.args(["--config", build_type.as_str()]);
    }
    invocation
}

/// The closed set of strategies, one per platform family.
pub struct BuilderDispatch<'a> {
    standard: StandardBuilder<'a>,
    android: AndroidBuilder<'a>,
    ios: IosBuilder<'a>,
}

impl<'a> BuilderDispatch<'a> {
    pub fn new(env: BuildEnv<'a>) -> Self {
        Self {
            standard: StandardBuilder::new(env),
            android: AndroidBuilder::new(env),
            ios: IosBuilder::new(env),
        }
    }

    pub fn for_platform(&self, platform: &str) -> &dyn PlatformBuilder {
        match StrategyKind::classify(platform) {
            StrategyKind::Standard => &self.standard,
            StrategyKind::AndroidCross => &self.android,
            StrategyKind::IosCross => &self.ios,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RecordingRunner;
    use highs_forge_core::preset::PresetCatalog;
    use highs_forge_core::settings::ProjectSettings;
    use highs_forge_core::MemoryReporter;
    use std::path::PathBuf;

    fn context() -> BuildContext {
        BuildContext {
            project_dir: PathBuf::from("/work/highs"),
            env_file: PathBuf::from("/work/.env"),
            presets: PresetCatalog::default(),
            settings: ProjectSettings::default(),
            toolchain_path: None,
            build_type: BuildType::Release,
            extract_libs: false,
        }
    }

    #[test]
    fn configure_override_only_for_single_config_non_default() {
        let dir = Path::new("/p");
        let release = configure_invocation("linux-x64", GeneratorKind::SingleConfig, BuildType::Release, dir);
        assert_eq!(release.command_line(), "cmake --preset linux-x64");
        let debug = configure_invocation("linux-x64", GeneratorKind::SingleConfig, BuildType::Debug, dir);
        assert_eq!(
            debug.command_line(),
            "cmake --preset linux-x64 -DCMAKE_BUILD_TYPE=Debug"
        );
        let multi = configure_invocation("windows-x64", GeneratorKind::MultiConfig, BuildType::Debug, dir);
        assert_eq!(multi.command_line(), "cmake --preset windows-x64");
        assert_eq!(debug.cwd.as_deref(), Some(dir));
    }

    #[test]
    fn build_config_flag_only_for_multi_config() {
        let dir = Path::new("/p");
        let single = build_invocation("linux-x64", GeneratorKind::SingleConfig, BuildType::Debug, dir);
        assert_eq!(single.command_line(), "cmake --build --preset linux-x64");
        let multi = build_invocation("windows-x64", GeneratorKind::MultiConfig, BuildType::Release, dir);
        assert_eq!(
            multi.command_line(),
            "cmake --build --preset windows-x64 --config Release"
        );
    }

    #[test]
    fn dispatch_selects_strategy_by_prefix() {
        let context = context();
        let runner = RecordingRunner::new();
        let reporter = MemoryReporter::new();
        let dispatch = BuilderDispatch::new(BuildEnv {
            context: &context,
            runner: &runner,
            reporter: &reporter,
        });
        assert_eq!(dispatch.for_platform("linux-x64").kind(), StrategyKind::Standard);
        assert_eq!(dispatch.for_platform("android-x86").kind(), StrategyKind::AndroidCross);
        assert_eq!(dispatch.for_platform("ios-arm64").kind(), StrategyKind::IosCross);
        assert_eq!(dispatch.for_platform("macos-arm64").kind(), StrategyKind::Standard);
    }

    #[test]
    fn missing_tool_is_distinguished() {
        let missing = BuildError::Command(RunError::NotFound {
            program: CMAKE.to_string(),
        });
        let failed = BuildError::Command(RunError::Failed {
            program: CMAKE.to_string(),
            code: Some(1),
            stderr: String::new(),
        });
        assert!(missing.is_tool_missing());
        assert!(!failed.is_tool_missing());
        assert!(missing.to_string().contains("not found"));
        assert!(failed.to_string().contains("exited with status 1"));
    }
}
