//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `style` - Stylesheet templates (preflight.css)
//! - `serve` - Dev server scripts (reload.js)
//!
//! # Usage
//!
//! ```ignore
//! use embed::style::{PREFLIGHT_CSS, PreflightVars};
//! use embed::serve::RELOAD_JS;
//!
//! let css = PREFLIGHT_CSS.render(&PreflightVars {
//!     font_sans: "var(--font-sans), ui-sans-serif".to_string(),
//!     font_mono: "var(--font-mono), ui-monospace".to_string(),
//!     border_color: "#e5e7eb",
//! });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod style {
    use super::{Template, TemplateVars};

    /// Variables for preflight.css template.
    pub struct PreflightVars {
        pub font_sans: String,
        pub font_mono: String,
        pub border_color: &'static str,
    }

    impl TemplateVars for PreflightVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__FONT_SANS__", &self.font_sans)
                .replace("__FONT_MONO__", &self.font_mono)
                .replace("__BORDER_COLOR__", self.border_color)
        }
    }

    /// Element reset emitted for `@tailwind base`.
    pub const PREFLIGHT_CSS: Template<PreflightVars> =
        Template::new(include_str!("style/preflight.css"));
}

pub mod serve {
    /// Client script injected into every served document.
    ///
    /// Opens a socket back to the serving host and reloads the page when the
    /// `reload` message arrives.
    pub const RELOAD_JS: &str = include_str!("serve/reload.js");
}
