//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! hostname = "127.0.0.1"   # Address to bind (0.0.0.0 = LAN accessible)
//! port = 3000              # HTTP port number
//! theme = "zinc"           # gray, neutral, slate, stone, zinc
//! debounce = 0             # Milliseconds to coalesce file events (0 = off)
//! ```

use serde::Deserialize;

/// `[serve]` as written in the file. Every field is optional so the CLI
/// and the built-in defaults can fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeSection {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub theme: Option<String>,
    pub debounce: Option<u64>,
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_serve_section() {
        let config = test_parse_config(
            "[serve]\nhostname = \"0.0.0.0\"\nport = 8080\ntheme = \"stone\"\ndebounce = 100",
        );
        assert_eq!(config.serve.hostname.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.serve.port, Some(8080));
        assert_eq!(config.serve.theme.as_deref(), Some("stone"));
        assert_eq!(config.serve.debounce, Some(100));
    }

    #[test]
    fn test_serve_section_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.serve, Default::default());
    }

    #[test]
    fn test_serve_section_partial_override() {
        let config = test_parse_config("[serve]\nport = 4000");
        assert_eq!(config.serve.port, Some(4000));
        assert_eq!(config.serve.hostname, None);
        assert_eq!(config.serve.theme, None);
    }
}
