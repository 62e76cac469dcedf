use std::path::PathBuf;

use clap::{Parser, Subcommand};
use highs_forge_build::ProcessRunner;
use highs_forge_cli::commands;
use highs_forge_cli::logging;
use highs_forge_core::config::absolute_dir;
use highs_forge_core::preset::PresetCatalog;
use highs_forge_core::toolchain::ToolchainStore;
use highs_forge_core::{BuildContext, BuildType, LogReporter, Reporter};

#[derive(Parser)]
#[command(name = "highs-forge", version, about = "Cross-platform CMake build driver for HiGHS")]
struct Cli {
    /// Source tree containing CMakePresets.json.
    #[arg(long, global = true, default_value = "./highs_patched")]
    project_dir: PathBuf,
    /// File holding the persisted Android NDK path.
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Remove CMake caches and build directories.
    Clean,
    /// Show the loaded configuration.
    Config,
    /// List buildable platforms.
    List,
    /// Build one or more platforms (all, ios, android, or preset names).
    Build {
        /// Platforms to build (default: all).
        platforms: Vec<String>,
        /// Android NDK root; validated and saved before building.
        #[arg(long)]
        ndk_path: Option<PathBuf>,
        /// Reduce each build directory to its library files.
        #[arg(long)]
        extract_libs: bool,
        /// Build configuration (Release | Debug).
        #[arg(long, default_value = "Release")]
        config: BuildType,
    },
}

fn main() {
    logging::init();
    if let Err(message) = run_cli() {
        exit_with_error(&message);
    }
}

fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let reporter = LogReporter;
    let store = ToolchainStore::new(&cli.env_file);
    let project_dir = absolute_dir(&cli.project_dir).map_err(|err| err.to_string())?;
    match cli.command {
        Command::Clean => {
            commands::clean::run(&project_dir, &reporter);
            Ok(())
        }
        Command::List => {
            let catalog = PresetCatalog::load(&project_dir).map_err(|err| err.to_string())?;
            for line in commands::list::render(&catalog) {
                println!("{}", line);
            }
            Ok(())
        }
        Command::Config => {
            let context = BuildContext::load(&project_dir, &store, BuildType::default(), false)
                .map_err(|err| err.to_string())?;
            for line in commands::config::render(&context) {
                println!("{}", line);
            }
            Ok(())
        }
        Command::Build {
            platforms,
            ndk_path,
            extract_libs,
            config,
        } => {
            if let Some(candidate) = ndk_path {
                let saved = store.set(&candidate).map_err(|err| err.to_string())?;
                reporter.success(&format!("Android NDK path set to: {}", saved.display()));
                reporter.info(&format!("NDK path saved to: {}", store.path().display()));
            }
            let context = BuildContext::load(&project_dir, &store, config, extract_libs)
                .map_err(|err| err.to_string())?;
            let runner = ProcessRunner::new(&reporter);
            commands::build::run(
                &context,
                commands::build::BuildArgs { platforms },
                &runner,
                &reporter,
            )?;
            Ok(())
        }
    }
}

fn exit_with_error(message: &str) {
    LogReporter.error(message);
    std::process::exit(1);
}
