//! Server configuration: CLI flags over `sol.toml` over built-in defaults.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── serve      # [serve] section as written in the file
//! └── mod.rs     # ConfigFile, ServeConfig (this file)
//! ```

mod error;
mod serve;

pub use error::ConfigError;
use serve::ServeSection;

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Cli;
use crate::palette::Theme;

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "sol.toml";
pub const DEFAULT_HOSTNAME: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

// ============================================================================
// file configuration
// ============================================================================

/// Root structure of `sol.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub serve: ServeSection,
}

impl ConfigFile {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::parse(&content, path)
    }

    /// Load the file `cli` points at, or `sol.toml` in `cwd` if it exists.
    ///
    /// An explicit `--config` path must exist; the implicit one is optional.
    pub fn discover(cli: &Cli, cwd: &Path) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = &cli.config {
            return Ok((Self::load(path)?, Some(path.clone())));
        }
        let implicit = cwd.join(DEFAULT_CONFIG);
        if implicit.is_file() {
            return Ok((Self::load(&implicit)?, Some(implicit)));
        }
        Ok((Self::default(), None))
    }
}

// ============================================================================
// resolved configuration
// ============================================================================

/// Fully resolved settings for one server run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    /// Target document, as given on the command line.
    pub file: PathBuf,
    pub hostname: String,
    pub port: u16,
    pub theme: Theme,
    pub debounce: Duration,
}

impl ServeConfig {
    /// Merge CLI flags over the file section over defaults, then validate.
    pub fn resolve(cli: &Cli, file: &ConfigFile) -> Result<Self, ConfigError> {
        let section = &file.serve;

        let hostname = cli
            .hostname
            .clone()
            .or_else(|| section.hostname.clone())
            .unwrap_or_else(|| DEFAULT_HOSTNAME.to_string());
        validate_hostname(&hostname)?;

        let theme = match cli.theme.as_deref().or(section.theme.as_deref()) {
            Some(name) => name.parse()?,
            None => Theme::DEFAULT,
        };

        Ok(Self {
            file: cli.file.clone(),
            hostname,
            port: cli.port.or(section.port).unwrap_or(DEFAULT_PORT),
            theme,
            debounce: Duration::from_millis(cli.debounce.or(section.debounce).unwrap_or(0)),
        })
    }

    /// Discover the config file from the current directory and resolve.
    pub fn load(cli: &Cli) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(PathBuf::from("."), e))?;
        let (file, path) = ConfigFile::discover(cli, &cwd)?;
        Ok((Self::resolve(cli, &file)?, path))
    }
}

/// Accept IP literals and DNS-style host names.
fn validate_hostname(hostname: &str) -> Result<(), ConfigError> {
    if hostname.parse::<IpAddr>().is_ok() {
        return Ok(());
    }
    let valid = !hostname.is_empty()
        && !hostname.starts_with(['-', '.'])
        && hostname
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::BadAddress(hostname.to_string()))
    }
}

// ============================================================================
// test helpers
// ============================================================================

#[cfg(test)]
pub fn test_parse_config(content: &str) -> ConfigFile {
    ConfigFile::parse(content, Path::new(DEFAULT_CONFIG)).unwrap()
}

// ============================================================================
// tests
// ============================================================================
