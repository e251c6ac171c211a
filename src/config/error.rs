//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors, all fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown theme `{name}`, expected one of: {available}")]
    UnknownTheme { name: String, available: String },

    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error in `{}`", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid hostname `{0}`")]
    BadAddress(String),
}
