use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "pitch-report.log";

/// Where log lines go. The interactive UI owns stdout, so it logs to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("unable to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// `RUST_LOG` wins, then `PITCH_REPORT_LOG`, then `info`.
pub fn filter_directive(rust_log: Option<String>, app_log: Option<String>) -> String {
    rust_log
        .into_iter()
        .chain(app_log)
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "info".to_string())
}

pub fn init(target: &LogTarget) -> Result<(), TelemetryError> {
    let directive = filter_directive(
        std::env::var("RUST_LOG").ok(),
        std::env::var("PITCH_REPORT_LOG").ok(),
    );
    let env_filter =
        EnvFilter::try_new(&directive).map_err(|source| TelemetryError::EnvFilter {
            value: directive.clone(),
            source,
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false);

    match target {
        LogTarget::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(TelemetryError::Subscriber),
        LogTarget::File(path) => {
            let file = open_log(path)?;
            builder
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(TelemetryError::Subscriber)
        }
    }
}

fn open_log(path: &Path) -> Result<File, TelemetryError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TelemetryError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}
