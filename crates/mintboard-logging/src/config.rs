//! What the `mintboard` binary can configure about its logs
//!
//! Embedded as the `[log]` table of the node's TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Level, console format and optional file sink
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `mintboard_node=debug`
    pub level: String,
    /// Shape of the lines written to stderr
    pub format: LogFormat,
    /// Colorize pretty output
    pub ansi: bool,
    /// Also write JSON lines to a file
    pub file: Option<FileConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            ansi: false,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable
    Pretty,
}

/// JSON lines written under `directory` as `<prefix>.log` (or dated files when rotating)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub directory: PathBuf,
    pub prefix: String,
    pub rotation: RotationStrategy,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::in_dir("./logs")
    }
}

impl FileConfig {
    /// Daily-rotated `mintboard` logs in `directory`
    pub fn in_dir(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            prefix: "mintboard".to_string(),
            rotation: RotationStrategy::Daily,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    #[default]
    Daily,
    Hourly,
    /// Single file, truncated on start
    Never,
}
