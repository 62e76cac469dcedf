use std::fs;
use std::path::PathBuf;

use highs_forge_build::{CommandRunner, Invocation, RunError};
use highs_forge_core::{BuildContext, Reporter};

use crate::PackError;

pub const XCODEBUILD: &str = "xcodebuild";
pub const XCFRAMEWORK_DIR_NAME: &str = "ios-xcframework";

/// Combines per-architecture static libraries into one `.xcframework`.
pub struct XcframeworkAssembler<'a> {
    context: &'a BuildContext,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    host_supported: bool,
}

impl<'a> XcframeworkAssembler<'a> {
    pub fn new(
        context: &'a BuildContext,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            context,
            runner,
            reporter,
            host_supported: cfg!(target_os = "macos"),
        }
    }

    pub fn with_host_support(mut self, supported: bool) -> Self {
        self.host_supported = supported;
        self
    }

    pub fn library_path(&self, platform: &str) -> PathBuf {
        self.context
            .output_dir(platform)
            .join(self.context.build_type.as_str())
            .join("lib")
            .join(self.context.settings.static_library_name())
    }

    pub fn output_path(&self) -> PathBuf {
        self.context
            .build_root()
            .join(XCFRAMEWORK_DIR_NAME)
            .join(format!("{}.xcframework", self.context.settings.bundle_name))
    }

    pub fn assemble(&self, platforms: &[String]) -> Result<PathBuf, PackError> {
        self.reporter.header("Creating XCFramework for iOS");
        let result = self.assemble_inner(platforms);
        match &result {
            Ok(path) => {
                self.reporter.success("XCFramework created successfully!");
                self.reporter
                    .info(&format!("XCFramework saved to: {}", path.display()));
            }
            Err(PackError::MissingLibraries { paths }) => {
                self.reporter.error("Missing library files:");
                for path in paths {
                    self.reporter.error(&format!("  {}", path.display()));
                }
            }
            Err(error) => self.reporter.error(&error.to_string()),
        }
        result
    }

    fn assemble_inner(&self, platforms: &[String]) -> Result<PathBuf, PackError> {
        if !self.host_supported {
            return Err(PackError::UnsupportedHost {
                requirement: "XCFramework creation requires macOS".to_string(),
            });
        }
        let libraries: Vec<PathBuf> = platforms.iter().map(|p| self.library_path(p)).collect();
        let missing: Vec<PathBuf> = libraries
            .iter()
            .filter(|path| !path.is_file())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PackError::MissingLibraries { paths: missing });
        }
        let libraries = libraries
            .iter()
            .map(|path| {
                path.canonicalize().map_err(|err| PackError::Io {
                    message: format!("failed to resolve '{}': {}", path.display(), err),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self.output_path();
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|err| PackError::Io {
                message: err.to_string(),
            })?;
        }
        if output.exists() {
            self.reporter
                .info(&format!("Removing existing XCFramework: {}", output.display()));
            fs::remove_dir_all(&output).map_err(|err| PackError::Io {
                message: err.to_string(),
            })?;
        }

        let mut invocation = Invocation::new(XCODEBUILD).arg("-create-xcframework");
        for library in &libraries {
            invocation = invocation
                .arg("-library")
                .arg(library.to_string_lossy().into_owned());
        }
        let invocation = invocation
            .arg("-output")
            .arg(output.to_string_lossy().into_owned())
            .capture_output();
        self.reporter.info(&format!(
            "Creating XCFramework with libraries from: {}",
            platforms.join(", ")
        ));
        self.runner.run(&invocation).map_err(|error| match error {
            RunError::NotFound { program } => PackError::ToolNotFound { program },
            RunError::Failed {
                program, stderr, ..
            } => PackError::ToolFailed {
                program,
                message: stderr.trim().to_string(),
            },
            RunError::Io { program, message } => PackError::ToolFailed { program, message },
        })?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use highs_forge_build::RecordingRunner;
    use highs_forge_core::preset::PresetCatalog;
    use highs_forge_core::settings::ProjectSettings;
    use highs_forge_core::{BuildType, MemoryReporter, Severity};

    fn context() -> BuildContext {
        BuildContext {
            project_dir: PathBuf::from("/work/highs"),
            env_file: PathBuf::from("/work/.env"),
            presets: PresetCatalog::default(),
            settings: ProjectSettings::default(),
            toolchain_path: None,
            build_type: BuildType::Debug,
            extract_libs: false,
        }
    }

    #[test]
    fn library_paths_follow_build_type() {
        let context = context();
        let runner = RecordingRunner::new();
        let reporter = MemoryReporter::new();
        let assembler = XcframeworkAssembler::new(&context, &runner, &reporter);
        assert_eq!(
            assembler.library_path("ios-arm64"),
            PathBuf::from("/work/highs/build/ios-arm64/Debug/lib/libhighs.a")
        );
        assert_eq!(
            assembler.output_path(),
            PathBuf::from("/work/highs/build/ios-xcframework/highs.xcframework")
        );
    }

    #[test]
    fn unsupported_host_fails_without_running() {
        let context = context();
        let runner = RecordingRunner::new();
        let reporter = MemoryReporter::new();
        let assembler =
            XcframeworkAssembler::new(&context, &runner, &reporter).with_host_support(false);
        let error = assembler
            .assemble(&["ios-arm64".to_string()])
            .expect_err("error");
        assert!(matches!(error, PackError::UnsupportedHost { .. }));
        assert!(runner.calls().is_empty());
        assert!(reporter.contains(Severity::Error, "requires macOS"));
    }
}
