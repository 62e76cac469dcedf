pub mod android;
pub mod builder;
pub mod ios;
pub mod runner;
pub mod standard;

pub use builder::{BuildError, BuilderDispatch, PlatformBuilder};
pub use runner::{CommandOutput, CommandRunner, Invocation, ProcessRunner, RunError};
#[cfg(any(test, feature = "test-support"))]
pub use runner::RecordingRunner;
