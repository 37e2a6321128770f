// Logger initialization
// Diagnostics go to stderr so stdout only carries report lines.

use crate::config::LoggingConfig;
use crate::types::{AppError, AppResult};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "inbox-sorter.log";

fn default_filter(config: &LoggingConfig) -> &'static str {
    if config.verbose {
        "inbox_sorter=debug"
    } else {
        "inbox_sorter=info"
    }
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process, or buffered file output is lost.
pub fn init_logger(config: &LoggingConfig) -> AppResult<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(config).into());

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match &config.log_dir {
        Some(dir) => {
            let appender = file_appender(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            Ok(None)
        }
    }
}

/// Daily rolling file in `dir`; an unusable directory is a config error
fn file_appender(dir: &Path) -> AppResult<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(dir)
        .map_err(|e| AppError::config_at(dir, format!("cannot open log directory: {}", e)))
}
