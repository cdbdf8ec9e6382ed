//! Tracing setup for binaries embedding the registry.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use localpersist_shared::errors::PersistResult;

use crate::runtime::constants::envs;
use crate::util::ensure_dir;
use crate::volumes::constants::perms;

/// Log file written inside the configured log directory.
pub const LOG_FILE_NAME: &str = "localpersist.log";

#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Default to `debug` instead of `info` when `RUST_LOG` is unset.
    pub debug: bool,
    /// Also write plain-text logs to `<log_dir>/localpersist.log`.
    pub log_dir: Option<PathBuf>,
}

/// Install the global subscriber.
///
/// Returns the file writer guard when a log directory is configured; keep it
/// alive until exit or buffered lines are lost. Calling this twice leaves the
/// first subscriber in place.
pub fn init_logging(options: &LoggingOptions) -> PersistResult<Option<WorkerGuard>> {
    let default_level = if options.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match &options.log_dir {
        Some(dir) => {
            ensure_dir(dir, perms::DATA_DIR_MODE)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Logging already initialized, keeping existing subscriber");
    }

    Ok(guard)
}

/// Read the `DEBUG` switch from the environment.
pub fn debug_from_env() -> bool {
    std::env::var(envs::DEBUG)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(false)
}

/// Accepts the usual spellings: `1`, `t`, `true`, `0`, `f`, `false` in any common case.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("f"), Some(false));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_init_logging_twice_is_tolerated() {
        let temp_dir = TempDir::new().unwrap();
        let options = LoggingOptions {
            debug: true,
            log_dir: Some(temp_dir.path().join("logs")),
        };

        let guard = init_logging(&options).unwrap();
        assert!(guard.is_some());
        assert!(temp_dir.path().join("logs").is_dir());

        let second = init_logging(&LoggingOptions::default()).unwrap();
        assert!(second.is_none());
    }
}
