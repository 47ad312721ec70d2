//! Structured logging setup for Mintboard
//!
//! Console lines go to stderr, as JSON by default or pretty on request, so
//! stdout stays free for command output. `RUST_LOG` overrides the configured
//! level. An optional file sink writes JSON lines through `tracing-appender`.
//!
//! ```ignore
//! use mintboard_logging::{FileConfig, LogConfig, MintboardSubscriberBuilder};
//!
//! let _guard = MintboardSubscriberBuilder::new()
//!     .with_config(LogConfig::default())
//!     .with_file_output(FileConfig::in_dir("./logs"))
//!     .try_init()?;
//! ```

pub mod config;

pub use config::{FileConfig, LogConfig, LogFormat, RotationStrategy};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to prepare log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Builder for the Mintboard logging subscriber
///
/// Console lines go to stderr. JSON is the default format; set
/// [`LogFormat::Pretty`] for human-readable output.
#[derive(Default)]
pub struct MintboardSubscriberBuilder {
    config: LogConfig,
}

impl MintboardSubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the filter directive
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    /// Also write JSON lines to a file
    pub fn with_file_output(mut self, file: FileConfig) -> Self {
        self.config.file = Some(file);
        self
    }

    /// Install the subscriber globally
    ///
    /// The returned guard flushes the file writer on drop; keep it alive for
    /// the life of the program when file output is configured.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LogError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.level));

        let pretty_layer = (self.config.format == LogFormat::Pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(self.config.ansi)
                .with_target(true)
        });

        let json_layer = (self.config.format == LogFormat::Json).then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .flatten_event(true)
        });

        let (file_layer, guard) = match &self.config.file {
            Some(file) => {
                let (writer, guard) = create_file_writer(file)?;
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(writer);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        Registry::default()
            .with(env_filter)
            .with(pretty_layer)
            .with(json_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))?;

        Ok(guard)
    }
}

// Truncates for Never rotation, appends for others
fn create_file_writer(file: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LogError> {
    let rotation = match file.rotation {
        RotationStrategy::Never => {
            fs::create_dir_all(&file.directory)?;
            let handle = File::create(file.directory.join(format!("{}.log", file.prefix)))?;
            return Ok(tracing_appender::non_blocking(handle));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };

    let appender = RollingFileAppender::new(rotation, &file.directory, &file.prefix);
    Ok(tracing_appender::non_blocking(appender))
}
