use std::path::PathBuf;

pub mod clean;
pub mod extract;
pub mod xcframework;

pub use clean::Cleaner;
pub use extract::{ArtifactExtractor, ExtractError};
pub use xcframework::XcframeworkAssembler;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackError {
    UnsupportedHost { requirement: String },
    MissingLibraries { paths: Vec<PathBuf> },
    ToolNotFound { program: String },
    ToolFailed { program: String, message: String },
    Io { message: String },
}

impl std::fmt::Display for PackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackError::UnsupportedHost { requirement } => {
                write!(f, "unsupported host: {}", requirement)
            }
            PackError::MissingLibraries { paths } => {
                let listed: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(f, "missing library files: {}", listed.join(", "))
            }
            PackError::ToolNotFound { program } => {
                write!(f, "{} not found; make sure Xcode is installed", program)
            }
            PackError::ToolFailed { program, message } => {
                write!(f, "{} failed: {}", program, message)
            }
            PackError::Io { message } => write!(f, "pack i/o error: {}", message),
        }
    }
}

impl std::error::Error for PackError {}
