use std::io::Write;

use highs_forge_core::report::{HEADER_TARGET, SUCCESS_TARGET};
use log::Level;

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Renders a record as a console line: tagged messages plus `=== title ===` section headers.
pub fn format_line(target: &str, level: Level, message: &str) -> String {
    match target {
        HEADER_TARGET => format!("\n=== {} ===", message),
        SUCCESS_TARGET => format!("[SUCCESS] {}", message),
        _ => format!("[{}] {}", level_tag(level), message),
    }
}

/// Installs the console logger. `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            let line = format_line(record.target(), record.level(), &record.args().to_string());
            writeln!(buf, "{}", line)
        })
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_tagged_by_target_and_level() {
        assert_eq!(format_line(HEADER_TARGET, Level::Info, "Build Summary"), "\n=== Build Summary ===");
        assert_eq!(format_line(SUCCESS_TARGET, Level::Info, "done"), "[SUCCESS] done");
        assert_eq!(format_line("highs_forge_build", Level::Warn, "slow"), "[WARNING] slow");
        assert_eq!(format_line("highs_forge_cli", Level::Info, "hi"), "[INFO] hi");
    }
}
