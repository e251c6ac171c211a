//! Stylesheet builder.
//!
//! Every document request rebuilds the stylesheet from scratch: the current
//! markup is scanned for class candidates, the palette for the chosen theme
//! is wrapped with the web-font import and font override, and the result
//! runs through one processing pass that expands layer directives and
//! `@apply` rules.
//!
//! # Module Structure
//!
//! - `config` - Engine configuration (tokens + per-request content)
//! - `tokens` - Design token set shared by every theme
//! - `defaults` - Default scales and the fallback color palette
//! - `scan` - Class candidate extraction
//! - `variant` - Variant prefixes and their selector / media forms
//! - `utility` - Utility resolution
//! - `color` - Color values and opacity modifiers
//! - `engine` - Layer generation and `@apply` resolution
//! - `process` - Directive processing pass

mod color;
mod config;
mod defaults;
mod engine;
mod process;
mod scan;
mod tokens;
mod utility;
mod variant;

use thiserror::Error;

use crate::debug;
use crate::palette::Theme;
use config::EngineConfig;
use engine::Engine;
use process::process;

/// Web font the palettes' sans token is bound to.
pub const FONT_IMPORT: &str = "@import url('https://fonts.googleapis.com/css2?family=Inter:ital,opsz,wght@0,14..32,100..900;1,14..32,100..900&display=swap');";

/// Root-scope override binding `--font-sans` to the imported family.
pub const FONT_OVERRIDE: &str = ":root {\n  --font-sans: \"Inter\";\n}";

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("`@apply` of unknown class `{class}`")]
    UnknownApply { class: String },

    #[error("`@apply` cannot take variants: `{class}`")]
    ApplyVariant { class: String },

    #[error("`@apply` cannot inline `{class}`, it styles child elements")]
    ApplyNested { class: String },

    #[error("unknown layer `{0}`")]
    UnknownLayer(String),

    #[error("`@layer {0}` used without a matching `@tailwind {0}` directive")]
    MissingDirective(String),

    #[error("unbalanced braces at byte {0}")]
    UnbalancedBraces(usize),

    #[error("stylesheet task failed")]
    Task(#[from] tokio::task::JoinError),
}

/// Processing-pass input for `theme`.
pub fn input(theme: Theme) -> String {
    format!(
        "{FONT_IMPORT}\n{}\n{FONT_OVERRIDE}\n",
        theme.palette().trim_end()
    )
}

/// Build the stylesheet for `markup` synchronously.
pub fn compile(markup: &str, theme: Theme) -> Result<String, StyleError> {
    let config = EngineConfig::for_markup(markup);
    for content in &config.content {
        debug!("style"; "scanning {} bytes of {}", content.raw.len(), content.extension);
    }
    let engine = Engine::new(config);
    debug!("style"; "{} class candidates, theme {}", engine.candidates().len(), theme);
    process(&input(theme), &engine)
}

/// Build the stylesheet for `markup` off the event loop.
pub async fn build(markup: &str, theme: Theme) -> Result<String, StyleError> {
    let markup = markup.to_string();
    tokio::task::spawn_blocking(move || compile(&markup, theme)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_variables_verbatim() {
        for theme in Theme::ALL {
            let css = compile("<div></div>", theme).unwrap();
            for line in theme.palette().lines() {
                let line = line.trim();
                if line.starts_with("--") {
                    assert!(css.contains(line), "{theme}: missing `{line}`");
                }
            }
        }
    }

    #[test]
    fn test_font_import_and_override() {
        let css = compile("", Theme::Zinc).unwrap();
        assert!(css.starts_with(FONT_IMPORT));
        assert!(css.contains("--font-sans: \"Inter\";"));
        assert!(!css.contains("@tailwind"));
        assert!(!css.contains("@apply"));
    }

    #[test]
    fn test_base_apply_rules_expanded() {
        let css = compile("", Theme::Slate).unwrap();
        assert!(css.contains("border-color: hsl(var(--border));"));
        assert!(css.contains("background-color: hsl(var(--background));"));
        assert!(css.contains("color: hsl(var(--foreground));"));
    }

    #[tokio::test]
    async fn test_build_is_deterministic() {
        let markup = r#"<div class="bg-primary p-4"></div>"#;
        let first = build(markup, Theme::Slate).await.unwrap();
        let second = build(markup, Theme::Slate).await.unwrap();
        assert_eq!(first, second);
        assert!(first.contains(".bg-primary {"));
        assert!(first.contains(".p-4 {"));
    }

    #[tokio::test]
    async fn test_build_follows_markup() {
        let before = build(r#"<p class="p-4"></p>"#, Theme::Slate).await.unwrap();
        let after = build(r#"<p class="p-4 text-accent"></p>"#, Theme::Slate)
            .await
            .unwrap();
        assert!(!before.contains(".text-accent"));
        assert!(after.contains(".text-accent {"));
    }

    #[test]
    fn test_broken_arbitrary_value_is_skipped() {
        let css = compile(r#"<p class="w-[1px}] p-4 bg-[red;color:blue]">"#, Theme::Slate).unwrap();
        assert!(!css.contains("1px}"));
        assert!(!css.contains("red;color"));
        assert!(css.contains(".p-4 {"));
        assert_eq!(css.matches('{').count(), css.matches('}').count());
    }

    #[test]
    fn test_unused_classes_are_not_generated() {
        let css = compile(r#"<p class="p-4"></p>"#, Theme::Gray).unwrap();
        assert!(!css.contains(".bg-primary"));
        assert!(!css.contains(".container"));
    }
}
