//! Palette registry: theme name → raw palette stylesheet.
//!
//! Each palette is a stylesheet fragment carrying the `@tailwind` layer
//! directives, the `:root` / `.dark` color variables, and the base
//! `@apply` rules for borders and the page body. Only the variable values
//! differ between palettes.

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// A named color palette, selectable at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Gray,
    Neutral,
    Slate,
    Stone,
    Zinc,
}

impl Theme {
    /// Every theme, in the order they are listed to users.
    pub const ALL: [Theme; 5] = [
        Theme::Gray,
        Theme::Neutral,
        Theme::Slate,
        Theme::Stone,
        Theme::Zinc,
    ];

    /// Theme used when none is configured.
    pub const DEFAULT: Theme = Theme::Slate;

    pub const fn name(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Neutral => "neutral",
            Self::Slate => "slate",
            Self::Stone => "stone",
            Self::Zinc => "zinc",
        }
    }

    /// Raw palette stylesheet text.
    pub const fn palette(self) -> &'static str {
        match self {
            Self::Gray => include_str!("gray.css"),
            Self::Neutral => include_str!("neutral.css"),
            Self::Slate => include_str!("slate.css"),
            Self::Stone => include_str!("stone.css"),
            Self::Zinc => include_str!("zinc.css"),
        }
    }

    /// Comma separated list of accepted names, for error messages.
    pub fn names() -> String {
        Self::ALL.map(Theme::name).join(", ")
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownTheme {
                name: s.to_string(),
                available: Self::names(),
            })
    }
}

/// Look up the palette stylesheet for a theme name.
pub fn lookup(name: &str) -> Result<&'static str, ConfigError> {
    name.parse::<Theme>().map(Theme::palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_every_theme() {
        for theme in Theme::ALL {
            let css = lookup(theme.name()).unwrap();
            assert!(css.contains("@tailwind base;"), "{theme}");
            assert!(css.contains(":root {"), "{theme}");
            assert!(css.contains(".dark {"), "{theme}");
            assert!(css.contains("--radius: 0.5rem;"), "{theme}");
            assert!(css.contains("--sidebar-ring:"), "{theme}");
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup("Zinc").unwrap(), Theme::Zinc.palette());
        assert_eq!(" stone ".parse::<Theme>().unwrap(), Theme::Stone);
    }

    #[test]
    fn test_lookup_unknown_theme() {
        let err = lookup("rose").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("rose"));
        assert!(message.contains("gray, neutral, slate, stone, zinc"));
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Theme::Slate.palette(), Theme::Zinc.palette());
        assert!(
            Theme::Slate
                .palette()
                .contains("--primary: 222.2 47.4% 11.2%;")
        );
        assert!(Theme::Zinc.palette().contains("--primary: 240 5.9% 10%;"));
    }

    #[test]
    fn test_default_theme() {
        assert_eq!(Theme::DEFAULT.name(), "slate");
    }
}
