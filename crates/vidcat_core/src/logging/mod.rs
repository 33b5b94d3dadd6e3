//! Logging for vidcat.
//!
//! - Application-wide logging goes through `tracing`, set up once by
//!   [`init_tracing`].
//! - Each processed directory gets a [`RunLogger`] writing its own log
//!   file, with a bounded tail of transcoder output for failures.
//!
//! # Example
//!
//! ```no_run
//! use vidcat_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new("holiday", "/videos/holiday/output/logs", LogConfig::default(), None).unwrap();
//! logger.phase("Probe");
//! logger.command("ffmpeg -f concat ...");
//! logger.success("Wrote holiday.mkv");
//! ```

mod run_logger;
mod types;

pub use run_logger::RunLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies. Output
/// goes to stderr. Calling this twice is a no-op.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
