use std::collections::HashSet;
use std::path::PathBuf;

use highs_forge_build::builder::BuildEnv;
use highs_forge_build::{BuilderDispatch, CommandRunner};
use highs_forge_core::{BuildContext, PlatformDescriptor, Reporter, StrategyKind};
use highs_forge_pack::{ArtifactExtractor, Cleaner, PackError, XcframeworkAssembler};

/// Terminal outcome of one platform in a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildResult {
    pub platform: String,
    pub success: bool,
    pub error: Option<String>,
    /// `None` when extraction was not requested or the build failed.
    pub extracted: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub results: Vec<BuildResult>,
}

impl BatchReport {
    pub fn success(&self) -> bool {
        self.results.iter().all(|result| result.success)
    }

    pub fn platforms(&self) -> Vec<&str> {
        self.results
            .iter()
            .map(|result| result.platform.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|result| !result.success)
            .map(|result| result.platform.as_str())
            .collect()
    }

    pub fn get(&self, platform: &str) -> Option<&BuildResult> {
        self.results.iter().find(|result| result.platform == platform)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrchestratorError {
    MissingToolchain,
    Bundle(PackError),
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::MissingToolchain => write!(
                f,
                "Android NDK path is required for Android platforms (use --ndk-path /path/to/ndk)"
            ),
            OrchestratorError::Bundle(error) => write!(f, "XCFramework creation failed: {}", error),
        }
    }
}

impl std::error::Error for OrchestratorError {}

pub struct Orchestrator<'a> {
    context: &'a BuildContext,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    dispatch: BuilderDispatch<'a>,
    bundle_host: Option<bool>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        context: &'a BuildContext,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        let dispatch = BuilderDispatch::new(BuildEnv {
            context,
            runner,
            reporter,
        });
        Self {
            context,
            runner,
            reporter,
            dispatch,
            bundle_host: None,
        }
    }

    /// Overrides host detection for XCFramework creation.
    pub fn with_bundle_host_support(mut self, supported: bool) -> Self {
        self.bundle_host = Some(supported);
        self
    }

    pub fn build_single_platform(&self, platform: &str) -> BuildResult {
        self.reporter.header(&format!("Building {}", platform));
        let descriptor = self
            .context
            .presets
            .get(platform)
            .cloned()
            .unwrap_or_else(|| PlatformDescriptor::new(platform));
        let builder = self.dispatch.for_platform(platform);

        let built = builder
            .configure(&descriptor)
            .and_then(|()| builder.build(&descriptor));
        if let Err(error) = built {
            return BuildResult {
                platform: platform.to_string(),
                success: false,
                error: Some(error.to_string()),
                extracted: None,
            };
        }

        let extracted = if self.context.extract_libs {
            let extractor = ArtifactExtractor::new(self.context, self.reporter);
            Some(extractor.extract(platform).is_ok())
        } else {
            None
        };
        BuildResult {
            platform: platform.to_string(),
            success: true,
            error: None,
            extracted,
        }
    }

    pub fn build_multiple_platforms(&self, platforms: &[String]) -> BatchReport {
        let mut seen = HashSet::new();
        let platforms: Vec<&String> = platforms
            .iter()
            .filter(|platform| seen.insert(platform.as_str()))
            .collect();
        if platforms.is_empty() {
            self.reporter.warning("No platforms to build");
            return BatchReport::default();
        }
        self.reporter.header("Building Multiple Platforms");
        let names: Vec<&str> = platforms.iter().map(|p| p.as_str()).collect();
        self.reporter
            .info(&format!("Platforms to build: {}", names.join(", ")));

        let mut report = BatchReport::default();
        for platform in platforms {
            let result = self.build_single_platform(platform);
            if !result.success {
                self.reporter.warning(&format!(
                    "Build failed for {}, continuing with next platform",
                    platform
                ));
            }
            report.results.push(result);
        }
        self.print_summary(&report);
        report
    }

    /// Every known platform, minus toolchain-gated ones when no toolchain is configured.
    pub fn buildable_platforms(&self) -> Vec<String> {
        let platforms = self.context.presets.names();
        if self.context.toolchain_path.is_some() {
            return platforms;
        }
        let (gated, available): (Vec<String>, Vec<String>) = platforms
            .into_iter()
            .partition(|name| StrategyKind::classify(name).requires_toolchain());
        if !gated.is_empty() {
            self.reporter
                .warning("Android NDK path not set. Skipping Android platforms:");
            for name in &gated {
                self.reporter.warning(&format!("  - {}", name));
            }
            self.reporter.info("Use --ndk-path to include Android builds");
        }
        available
    }

    pub fn build_all(&self) -> BatchReport {
        let platforms = self.buildable_platforms();
        self.build_multiple_platforms(&platforms)
    }

    pub fn build_ios(&self) -> Result<BatchReport, OrchestratorError> {
        let platforms = self.context.settings.ios_platforms.clone();
        self.reporter.header("Building XCFramework for iOS");
        self.clean_platforms(&platforms);

        let report = self.build_multiple_platforms(&platforms);
        if !report.success() {
            self.reporter
                .error("iOS builds failed, cannot create XCFramework");
            return Ok(report);
        }
        let mut assembler = XcframeworkAssembler::new(self.context, self.runner, self.reporter);
        if let Some(supported) = self.bundle_host {
            assembler = assembler.with_host_support(supported);
        }
        assembler
            .assemble(&platforms)
            .map_err(OrchestratorError::Bundle)?;
        Ok(report)
    }

    pub fn build_android(&self) -> Result<BatchReport, OrchestratorError> {
        self.reporter.header("Building for Android");
        if self.context.toolchain_path.is_none() {
            self.reporter.error("Android NDK path not set.");
            self.reporter.info("Use: highs-forge build android --ndk-path /path/to/ndk");
            return Err(OrchestratorError::MissingToolchain);
        }
        let platforms = self.context.presets.android_names();
        self.clean_platforms(&platforms);

        let report = self.build_multiple_platforms(&platforms);
        if report.success() {
            self.reporter
                .success("All Android builds completed successfully!");
        } else {
            self.reporter.error("Some Android builds failed");
        }
        Ok(report)
    }

    fn clean_platforms(&self, platforms: &[String]) {
        let dirs: Vec<PathBuf> = platforms
            .iter()
            .map(|platform| self.context.output_dir(platform))
            .collect();
        Cleaner::new(&self.context.project_dir, self.reporter).clean_dirs(&dirs);
    }

    fn print_summary(&self, report: &BatchReport) {
        self.reporter.header("Build Summary");
        for result in &report.results {
            if result.success {
                self.reporter
                    .success(&format!("{}: SUCCESS", result.platform));
            } else {
                self.reporter.error(&format!("{}: FAILED", result.platform));
            }
        }
        let total = report.results.len();
        let succeeded = total - report.failed().len();
        if succeeded == total {
            self.reporter
                .success(&format!("All {} builds completed successfully!", total));
        } else {
            self.reporter.warning(&format!(
                "{}/{} builds completed successfully",
                succeeded, total
            ));
        }
    }
}
