#[cfg(any(test, feature = "test-support"))]
use std::cell::RefCell;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use highs_forge_core::Reporter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// Capture stdout/stderr instead of streaming them to the console.
    pub capture: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn capture_output(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|value| value == arg)
    }

    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    NotFound { program: String },
    Failed { program: String, code: Option<i32>, stderr: String },
    Io { program: String, message: String },
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::NotFound { program } => write!(f, "{} not found; is it installed?", program),
            RunError::Failed {
                program,
                code,
                stderr,
            } => {
                match code {
                    Some(code) => write!(f, "{} exited with status {}", program, code)?,
                    None => write!(f, "{} was terminated by a signal", program)?,
                }
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            RunError::Io { program, message } => write!(f, "failed to run {}: {}", program, message),
        }
    }
}

impl std::error::Error for RunError {}

pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError>;
}

/// Runs real processes, blocking until they exit.
pub struct ProcessRunner<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> ProcessRunner<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }
}

impl CommandRunner for ProcessRunner<'_> {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
        self.reporter
            .info(&format!("Running: {}", invocation.command_line()));
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }
        for (key, value) in &invocation.env {
            command.env(key, value);
        }
        let spawn_error = |error: std::io::Error| match error.kind() {
            std::io::ErrorKind::NotFound => RunError::NotFound {
                program: invocation.program.clone(),
            },
            _ => RunError::Io {
                program: invocation.program.clone(),
                message: error.to_string(),
            },
        };
        let output = if invocation.capture {
            let output = command.output().map_err(spawn_error)?;
            CommandOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        } else {
            let status = command
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(spawn_error)?;
            CommandOutput {
                code: status.code(),
                ..CommandOutput::default()
            }
        };
        if output.code != Some(0) {
            self.reporter
                .error(&format!("Command failed: {}", invocation.command_line()));
            return Err(RunError::Failed {
                program: invocation.program.clone(),
                code: output.code,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

#[cfg(any(test, feature = "test-support"))]
type FailRule = Box<dyn Fn(&Invocation) -> Option<RunError>>;

/// Records invocations instead of spawning them; rules decide which ones fail.
#[cfg(any(test, feature = "test-support"))]
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    rules: Vec<FailRule>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_when(mut self, rule: impl Fn(&Invocation) -> Option<RunError> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
        self.calls.borrow_mut().push(invocation.clone());
        for rule in &self.rules {
            if let Some(error) = rule(invocation) {
                return Err(error);
            }
        }
        Ok(CommandOutput {
            code: Some(0),
            ..CommandOutput::default()
        })
    }
}
