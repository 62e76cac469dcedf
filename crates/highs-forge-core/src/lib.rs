pub mod config;
pub mod platform;
pub mod preset;
pub mod report;
pub mod settings;
pub mod toolchain;

pub use config::{BuildContext, ConfigError};
pub use platform::{BuildType, GeneratorKind, PlatformDescriptor, StrategyKind};
pub use report::{LogReporter, MemoryReporter, Reporter, Severity};
