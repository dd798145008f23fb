//! Run logging: console plus one timestamped file per run.
//!
//! The dispatcher is built explicitly and installed for the scope of a run
//! rather than as a process-wide global.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable selecting the log level
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Crates whose internals are only interesting when they go wrong
const QUIET_TARGETS: &[&str] = &[
    "aws_config",
    "aws_smithy_runtime",
    "aws_smithy_runtime_api",
    "aws_sdk_ec2",
    "aws_sdk_elasticloadbalancingv2",
    "hyper",
    "hyper_util",
    "rustls",
];

/// A ready-to-install dispatcher and the file it writes to
pub struct RunLogger {
    pub dispatch: Dispatch,
    pub log_file: PathBuf,
}

/// Log file name for a run started at `now`
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("{}.log", now.format("%Y_%m_%d_%H_%M_%S"))
}

/// Map a level name to a tracing level, accepting the names Python-style
/// loggers use (`WARNING`, `CRITICAL`, ...). Unknown names fall back to debug.
pub fn normalize_level(raw: Option<&str>) -> &'static str {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("trace") => "trace",
        Some("debug") | Some("notset") => "debug",
        Some("info") => "info",
        Some("warn") | Some("warning") => "warn",
        Some("error") | Some("critical") | Some("fatal") => "error",
        Some("off") => "off",
        _ => DEFAULT_LOG_LEVEL,
    }
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    let mut filter = EnvFilter::new(level);
    for target in QUIET_TARGETS {
        filter = filter.add_directive(format!("{}=warn", target).parse()?);
    }
    Ok(filter)
}

/// Build the console + file dispatcher. The file is created in `log_dir`.
pub fn build(log_dir: &Path, level: Option<&str>) -> Result<RunLogger> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    let log_file = log_dir.join(log_file_name(Local::now()));
    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file: {:?}", log_file))?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Mutex::new(file));

    let subscriber = tracing_subscriber::registry()
        .with(build_filter(normalize_level(level))?)
        .with(console_layer)
        .with(file_layer);

    Ok(RunLogger {
        dispatch: Dispatch::new(subscriber),
        log_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_name_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log_file_name(now), "2024_03_09_07_05_01.log");
    }

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level(None), "debug");
        assert_eq!(normalize_level(Some("DEBUG")), "debug");
        assert_eq!(normalize_level(Some("INFO")), "info");
        assert_eq!(normalize_level(Some("WARNING")), "warn");
        assert_eq!(normalize_level(Some("warn")), "warn");
        assert_eq!(normalize_level(Some("CRITICAL")), "error");
        assert_eq!(normalize_level(Some(" error ")), "error");
        assert_eq!(normalize_level(Some("verbose")), "debug");
        assert_eq!(normalize_level(Some("")), "debug");
    }

    #[test]
    fn test_events_reach_the_log_file() {
        let dir = TempDir::new().unwrap();
        let logger = build(dir.path(), Some("info")).unwrap();

        tracing::dispatcher::with_default(&logger.dispatch, || {
            tracing::info!("provisioning started");
            tracing::debug!("filtered out at info");
        });

        let contents = std::fs::read_to_string(&logger.log_file).unwrap();
        assert!(logger.log_file.starts_with(dir.path()));
        assert!(contents.contains("INFO"));
        assert!(contents.contains("provisioning started"));
        assert!(!contents.contains("filtered out at info"));
        // No ANSI escapes in the file sink
        assert!(!contents.contains('\u{1b}'));
    }
}
