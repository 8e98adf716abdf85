//! Logging initialization
//!
//! Logs go to stderr so that command output on stdout stays clean. Filtering
//! follows `RUST_LOG`, defaulting to warnings.

use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Configuration for the logger.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Name the process logs under.
    whoami: String,
}

impl LoggerConfig {
    pub const fn new(whoami: String) -> Self {
        Self { whoami }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new("colorcore".to_string())
    }
}

/// Initializes the logging subsystem with the provided config.
pub fn init(config: LoggerConfig) {
    let filt = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let log_file = std::env::var("LOG_FILE").is_ok_and(|v| v == "1");
    let log_line_num = std::env::var("LOG_LINE_NUM").is_ok_and(|v| v == "1");

    let stderr_sub = tracing_subscriber::fmt::layer()
        .event_format(
            tracing_subscriber::fmt::format()
                .compact()
                .with_file(log_file)
                .with_line_number(log_line_num),
        )
        .with_writer(std::io::stderr)
        .with_filter(filt);

    tracing_subscriber::registry().with(stderr_sub).init();

    info!(whoami = %config.whoami, "logging started");
}
