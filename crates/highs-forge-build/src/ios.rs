use highs_forge_core::{GeneratorKind, PlatformDescriptor, StrategyKind};

use crate::builder::{build_invocation, configure_invocation, BuildEnv, BuildError, PlatformBuilder, Step};

/// Device and simulator presets; these default to the Xcode generator.
pub struct IosBuilder<'a> {
    env: BuildEnv<'a>,
}

impl<'a> IosBuilder<'a> {
    pub fn new(env: BuildEnv<'a>) -> Self {
        Self { env }
    }

    fn generator(platform: &PlatformDescriptor) -> GeneratorKind {
        platform.generator_kind().unwrap_or(GeneratorKind::MultiConfig)
    }
}

impl PlatformBuilder for IosBuilder<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::IosCross
    }

    fn configure(&self, platform: &PlatformDescriptor) -> Result<(), BuildError> {
        self.env
            .reporter
            .info(&format!("Configuring iOS preset: {}", platform.name));
        let invocation = configure_invocation(
            &platform.name,
            Self::generator(platform),
            self.env.context.build_type,
            &self.env.context.project_dir,
        );
        self.env.run_step(Step::Configure, &platform.name, invocation)
    }

    fn build(&self, platform: &PlatformDescriptor) -> Result<(), BuildError> {
        self.env.reporter.info(&format!(
            "Building iOS preset: {} ({} configuration)",
            platform.name, self.env.context.build_type
        ));
        let invocation = build_invocation(
            &platform.name,
            Self::generator(platform),
            self.env.context.build_type,
            &self.env.context.project_dir,
        );
        self.env.run_step(Step::Build, &platform.name, invocation)
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

    #[test]
    fn undeclared_generator_is_treated_as_xcode() {
        let context = BuildContext {
            project_dir: PathBuf::from("/work/highs"),
            env_file: PathBuf::from("/work/.env"),
            presets: PresetCatalog::default(),
            settings: ProjectSettings::default(),
            toolchain_path: None,
            build_type: BuildType::Debug,
            extract_libs: false,
        };
        let runner = RecordingRunner::new();
        let reporter = MemoryReporter::new();
        let builder = IosBuilder::new(BuildEnv {
            context: &context,
            runner: &runner,
            reporter: &reporter,
        });
        let platform = PlatformDescriptor::new("ios-simulator-arm64");
        builder.configure(&platform).expect("configure");
        builder.build(&platform).expect("build");
        assert_eq!(
            runner.command_lines(),
            vec![
                "cmake --preset ios-simulator-arm64",
                "cmake --build --preset ios-simulator-arm64 --config Debug",
            ]
        );
    }
}
