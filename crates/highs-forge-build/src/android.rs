use std::path::Path;

use highs_forge_core::toolchain::NDK_ENV_VARS;
use highs_forge_core::{GeneratorKind, PlatformDescriptor, StrategyKind};

use crate::builder::{build_invocation, configure_invocation, BuildEnv, BuildError, PlatformBuilder, Step};
use crate::runner::Invocation;

/// NDK cross-compiles. Android presets always use a single-config generator.
pub struct AndroidBuilder<'a> {
    env: BuildEnv<'a>,
}

impl<'a> AndroidBuilder<'a> {
    pub fn new(env: BuildEnv<'a>) -> Self {
        Self { env }
    }

    fn ndk_path(&self, platform: &str) -> Result<&'a Path, BuildError> {
        let context = self.env.context;
        match context.toolchain_path.as_deref() {
            Some(path) => Ok(path),
            None => {
                self.env
                    .reporter
                    .error("Android NDK path not set. Use --ndk-path to configure it.");
                Err(BuildError::MissingToolchain {
                    platform: platform.to_string(),
                })
            }
        }
    }
}

fn with_ndk_env(invocation: Invocation, ndk: &Path) -> Invocation {
    let value = ndk.to_string_lossy().into_owned();
    NDK_ENV_VARS
        .iter()
        .fold(invocation, |invocation, key| invocation.env(*key, value.clone()))
}

impl PlatformBuilder for AndroidBuilder<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AndroidCross
    }

    fn configure(&self, platform: &PlatformDescriptor) -> Result<(), BuildError> {
        let ndk = self.ndk_path(&platform.name)?;
        self.env
            .reporter
            .info(&format!("Configuring Android preset: {}", platform.name));
        let invocation = configure_invocation(
            &platform.name,
            GeneratorKind::SingleConfig,
            self.env.context.build_type,
            &self.env.context.project_dir,
        );
        self.env
            .run_step(Step::Configure, &platform.name, with_ndk_env(invocation, ndk))
    }

    fn build(&self, platform: &PlatformDescriptor) -> Result<(), BuildError> {
        let ndk = self.ndk_path(&platform.name)?;
        self.env.reporter.info(&format!(
            "Building Android preset: {} ({} configuration)",
            platform.name, self.env.context.build_type
        ));
        let invocation = build_invocation(
            &platform.name,
            GeneratorKind::SingleConfig,
            self.env.context.build_type,
            &self.env.context.project_dir,
        );
        self.env
            .run_step(Step::Build, &platform.name, with_ndk_env(invocation, ndk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RecordingRunner;
    use highs_forge_core::preset::PresetCatalog;
    use highs_forge_core::settings::ProjectSettings;
    use highs_forge_core::{BuildContext, BuildType, MemoryReporter};
    use std::path::PathBuf;

    fn context(toolchain_path: Option<PathBuf>, build_type: BuildType) -> BuildContext {
        BuildContext {
            project_dir: PathBuf::from("/work/highs"),
            env_file: PathBuf::from("/work/.env"),
            presets: PresetCatalog::default(),
            settings: ProjectSettings::default(),
            toolchain_path,
            build_type,
            extract_libs: false,
        }
    }

    #[test]
    fn configure_without_ndk_fails_before_running() {
        let context = context(None, BuildType::Release);
        let runner = RecordingRunner::new();
        let reporter = MemoryReporter::new();
        let builder = AndroidBuilder::new(BuildEnv {
            context: &context,
            runner: &runner,
            reporter: &reporter,
        });
        let error = builder
            .configure(&PlatformDescriptor::new("android-arm64"))
            .expect_err("error");
        assert_eq!(
            error,
            BuildError::MissingToolchain {
                platform: "android-arm64".to_string()
            }
        );
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn ndk_is_exported_under_both_names() {
        let context = context(Some(PathBuf::from("/opt/ndk")), BuildType::Debug);
        let runner = RecordingRunner::new();
        let reporter = MemoryReporter::new();
        let builder = AndroidBuilder::new(BuildEnv {
            context: &context,
            runner: &runner,
            reporter: &reporter,
        });
        // A multi-config generator in the preset must not leak a --config flag.
        let platform = PlatformDescriptor::new("android-arm64").with_generator("Ninja Multi-Config");
        builder.configure(&platform).expect("configure");
        builder.build(&platform).expect("build");
        let calls = runner.calls();
        assert_eq!(
            calls[0].command_line(),
            "cmake --preset android-arm64 -DCMAKE_BUILD_TYPE=Debug"
        );
        assert_eq!(calls[1].command_line(), "cmake --build --preset android-arm64");
        for call in &calls {
            assert_eq!(call.env_value("ANDROID_NDK_ROOT"), Some("/opt/ndk"));
            assert_eq!(call.env_value("ANDROID_NDK_HOME"), Some("/opt/ndk"));
            assert!(!call.has_arg("--config"));
        }
    }
}
