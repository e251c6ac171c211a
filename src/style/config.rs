//! Engine configuration: static tokens plus per-request content.

use super::tokens::{DesignTokens, TOKENS};

/// A literal content source scanned for class candidates.
#[derive(Debug, Clone)]
pub struct RawContent {
    pub raw: String,
    /// File extension the content would have on disk, used only for logs.
    pub extension: &'static str,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Class that switches `dark:` variants on when set on an ancestor.
    pub dark_class: &'static str,
    pub content: Vec<RawContent>,
    pub tokens: &'static DesignTokens,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dark_class: "dark",
            content: Vec::new(),
            tokens: &TOKENS,
        }
    }
}

impl EngineConfig {
    /// Token configuration with `markup` as its only content source.
    ///
    /// The markup is taken as text, not as a path, so every call sees the
    /// document as it is right now.
    pub fn for_markup(markup: &str) -> Self {
        Self {
            content: vec![RawContent {
                raw: markup.to_string(),
                extension: "html",
            }],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_markup_keeps_tokens() {
        let config = EngineConfig::for_markup("<p class=\"p-4\"></p>");
        assert_eq!(config.content.len(), 1);
        assert_eq!(config.content[0].extension, "html");
        assert_eq!(config.dark_class, "dark");
        assert!(std::ptr::eq(config.tokens, &TOKENS));
    }
}
