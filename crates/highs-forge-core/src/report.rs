use std::cell::RefCell;
use std::fmt;

/// Log target used for success lines so the console format can tag them.
pub const SUCCESS_TARGET: &str = "success";
pub const HEADER_TARGET: &str = "header";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Header,
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Severity::Header => "HEADER",
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        f.write_str(value)
    }
}

pub trait Reporter {
    fn emit(&self, severity: Severity, message: &str);

    fn header(&self, message: &str) {
        self.emit(Severity::Header, message);
    }

    fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    fn success(&self, message: &str) {
        self.emit(Severity::Success, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }
}

/// Forwards to the `log` facade; the binary decides how records are rendered.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Header => log::info!(target: HEADER_TARGET, "{}", message),
            Severity::Info => log::info!("{}", message),
            Severity::Success => log::info!(target: SUCCESS_TARGET, "{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
    }
}

/// Records every line; used by tests and silent runs.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: RefCell<Vec<(Severity, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines.borrow().clone()
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(level, _)| *level == severity)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.messages(severity)
            .iter()
            .any(|message| message.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn emit(&self, severity: Severity, message: &str) {
        self.lines
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reporter_keeps_order_and_severity() {
        let reporter = MemoryReporter::new();
        reporter.header("Building linux-x64");
        reporter.warning("skipped");
        reporter.success("done");
        assert_eq!(
            reporter.lines(),
            vec![
                (Severity::Header, "Building linux-x64".to_string()),
                (Severity::Warning, "skipped".to_string()),
                (Severity::Success, "done".to_string()),
            ]
        );
        assert!(reporter.contains(Severity::Warning, "skip"));
        assert!(!reporter.contains(Severity::Error, "skip"));
    }
}
