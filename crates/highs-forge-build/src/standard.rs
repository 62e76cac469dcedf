use highs_forge_core::{GeneratorKind, PlatformDescriptor, StrategyKind};

use crate::builder::{build_invocation, configure_invocation, BuildEnv, BuildError, PlatformBuilder, Step};

/// Desktop presets (Linux, macOS, Windows) built on the host.
pub struct StandardBuilder<'a> {
    env: BuildEnv<'a>,
}

impl<'a> StandardBuilder<'a> {
    pub fn new(env: BuildEnv<'a>) -> Self {
        Self { env }
    }

    fn generator(platform: &PlatformDescriptor) -> GeneratorKind {
        platform
            .generator_kind()
            .unwrap_or(GeneratorKind::SingleConfig)
    }
}

impl PlatformBuilder for StandardBuilder<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Standard
    }

    fn configure(&self, platform: &PlatformDescriptor) -> Result<(), BuildError> {
        self.env
            .reporter
            .info(&format!("Configuring preset: {}", platform.name));
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
            "Building preset: {} ({} configuration)",
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
