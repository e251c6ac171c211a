//! Rule generation and stylesheet formatting.
//!
//! The engine owns the scanned candidate set for one configuration and
//! renders the three layers on demand. Output is deterministic: rules are
//! sorted by variant mask, utility family and class name, and every rule is
//! printed with two-space indentation.

use std::collections::BTreeSet;
use std::fmt::Write;

use rustc_hash::FxHashSet;

use super::StyleError;
use super::config::EngineConfig;
use super::defaults;
use super::scan;
use super::tokens::Keyframes;
use super::utility::{self, Family};
use super::variant::{self, Variant};
use crate::embed::style::{PREFLIGHT_CSS, PreflightVars};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    fn important(mut self) -> Self {
        self.value.push_str(" !important");
        self
    }
}

/// A class name split into its parts: `md:hover:!-mt-4`.
#[derive(Debug)]
pub struct Candidate<'a> {
    pub variants: Vec<Variant>,
    pub important: bool,
    pub negative: bool,
    pub base: &'a str,
}

impl<'a> Candidate<'a> {
    pub fn parse(raw: &'a str) -> Option<Self> {
        let segments = split_variants(raw);
        let (base, names) = segments.split_last()?;
        let variants = names
            .iter()
            .map(|name| Variant::parse(name))
            .collect::<Option<Vec<_>>>()?;

        let (important, base) = match base.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, *base),
        };
        let (negative, base) = match base.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, base),
        };
        if base.is_empty() {
            return None;
        }

        Some(Self {
            variants,
            important,
            negative,
            base,
        })
    }
}

/// Split on `:` outside brackets.
fn split_variants(raw: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                segments.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&raw[start..]);
    segments
}

/// Escape a class name for use in a selector.
pub fn escape_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 8);
    for (i, c) in class.chars().enumerate() {
        match c {
            'a'..='z' | 'A'..='Z' | '_' | '-' => out.push(c),
            '0'..='9' if i > 0 => out.push(c),
            '0'..='9' => {
                let _ = write!(out, "\\3{c} ");
            }
            _ => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Print `selector { declarations }` at the given indent.
pub fn render_rule(out: &mut String, selector: &str, declarations: &[Declaration], indent: &str) {
    let _ = writeln!(out, "{indent}{selector} {{");
    for d in declarations {
        let _ = writeln!(out, "{indent}  {}: {};", d.property, d.value);
    }
    let _ = write!(out, "{indent}}}");
}

pub fn render_keyframes(out: &mut String, keyframes: &Keyframes, indent: &str) {
    let _ = writeln!(out, "{indent}@keyframes {} {{", keyframes.name);
    for step in keyframes.steps {
        let _ = writeln!(out, "{indent}  {} {{", step.offset);
        for (property, value) in step.declarations {
            let _ = writeln!(out, "{indent}    {property}: {value};");
        }
        let _ = writeln!(out, "{indent}  }}");
    }
    let _ = write!(out, "{indent}}}");
}

/// One generated utility rule, ready to sort and print.
#[derive(Debug)]
struct GeneratedRule {
    mask: u32,
    family: Family,
    class: String,
    media: Option<String>,
    selector: String,
    declarations: Vec<Declaration>,
    keyframes: Option<&'static Keyframes>,
}

/// Declarations inlined by `@apply`.
#[derive(Debug, Default)]
pub struct Applied {
    pub declarations: Vec<Declaration>,
    pub keyframes: Vec<&'static Keyframes>,
}

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    candidates: BTreeSet<String>,
}

impl Engine {
    /// Scan every content source of `config`.
    pub fn new(config: EngineConfig) -> Self {
        let candidates = config
            .content
            .iter()
            .flat_map(|content| scan::candidates(&content.raw))
            .collect();
        Self { config, candidates }
    }

    pub fn candidates(&self) -> &BTreeSet<String> {
        &self.candidates
    }

    /// Preflight reset with the configured font stacks.
    pub fn base(&self) -> String {
        let tokens = self.config.tokens;
        PREFLIGHT_CSS
            .render(&PreflightVars {
                font_sans: tokens.font_family("sans").unwrap_or_default(),
                font_mono: tokens.font_family("mono").unwrap_or_default(),
                border_color: defaults::palette_color("gray-200").unwrap_or("currentColor"),
            })
            .trim_end()
            .to_string()
    }

    /// Component classes used by the content (`container`).
    pub fn components(&self) -> String {
        if !self.candidates.contains("container") {
            return String::new();
        }
        let container = &self.config.tokens.container;
        let mut declarations = vec![Declaration::new("width", "100%")];
        if container.center {
            declarations.push(Declaration::new("margin-right", "auto"));
            declarations.push(Declaration::new("margin-left", "auto"));
        }
        declarations.push(Declaration::new("padding-right", container.padding));
        declarations.push(Declaration::new("padding-left", container.padding));

        let mut out = String::new();
        render_rule(&mut out, ".container", &declarations, "");
        for (_, width) in container.screens {
            let _ = write!(out, "\n\n@media (min-width: {width}) {{\n");
            render_rule(
                &mut out,
                ".container",
                &[Declaration::new("max-width", *width)],
                "  ",
            );
            out.push_str("\n}");
        }
        out
    }

    /// Utility rules for every candidate that resolves.
    pub fn utilities(&self) -> String {
        let mut rules: Vec<GeneratedRule> = self
            .candidates
            .iter()
            .filter_map(|raw| self.generate(raw))
            .collect();
        rules.sort_by(|a, b| (a.mask, a.family, &a.class).cmp(&(b.mask, b.family, &b.class)));

        let mut blocks: Vec<String> = Vec::new();
        let mut emitted: FxHashSet<&'static str> = FxHashSet::default();
        let mut index = 0;
        while index < rules.len() {
            let media = rules[index].media.clone();
            let end = rules[index..]
                .iter()
                .position(|rule| rule.media != media)
                .map_or(rules.len(), |offset| index + offset);
            let group = &rules[index..end];

            for rule in group {
                if let Some(keyframes) = rule.keyframes
                    && emitted.insert(keyframes.name)
                {
                    let mut block = String::new();
                    render_keyframes(&mut block, keyframes, "");
                    blocks.push(block);
                }
                if media.is_none() {
                    let mut block = String::new();
                    render_rule(&mut block, &rule.selector, &rule.declarations, "");
                    blocks.push(block);
                }
            }

            if let Some(condition) = &media {
                let inner: Vec<String> = group
                    .iter()
                    .map(|rule| {
                        let mut block = String::new();
                        render_rule(&mut block, &rule.selector, &rule.declarations, "  ");
                        block
                    })
                    .collect();
                blocks.push(format!("@media {condition} {{\n{}\n}}", inner.join("\n\n")));
            }
            index = end;
        }
        blocks.join("\n\n")
    }

    fn generate(&self, raw: &str) -> Option<GeneratedRule> {
        let candidate = Candidate::parse(raw)?;
        let utility = utility::resolve(candidate.base, candidate.negative, self.config.tokens)?;

        let class_selector = format!(".{}", escape_class(raw));
        let selector = variant::selector(
            &class_selector,
            &candidate.variants,
            utility.tail,
            self.config.dark_class,
        );
        let declarations = if candidate.important {
            utility.declarations.into_iter().map(Declaration::important).collect()
        } else {
            utility.declarations
        };

        Some(GeneratedRule {
            mask: variant::sort_mask(&candidate.variants),
            family: utility.family,
            class: raw.to_string(),
            media: variant::media(&candidate.variants),
            selector,
            declarations,
            keyframes: utility.keyframes,
        })
    }

    /// Resolve the class list of an `@apply` rule.
    ///
    /// Variants are rejected, as are utilities that style child elements.
    pub fn apply<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> Result<Applied, StyleError> {
        let mut applied = Applied::default();
        let mut all_important = false;
        for class in classes {
            if class == "!important" {
                all_important = true;
                continue;
            }
            let candidate = Candidate::parse(class).ok_or_else(|| StyleError::UnknownApply {
                class: class.to_string(),
            })?;
            if !candidate.variants.is_empty() {
                return Err(StyleError::ApplyVariant {
                    class: class.to_string(),
                });
            }
            let utility = utility::resolve(candidate.base, candidate.negative, self.config.tokens)
                .ok_or_else(|| StyleError::UnknownApply {
                    class: class.to_string(),
                })?;
            if !utility.tail.is_empty() {
                return Err(StyleError::ApplyNested {
                    class: class.to_string(),
                });
            }
            if let Some(keyframes) = utility.keyframes {
                applied.keyframes.push(keyframes);
            }
            applied
                .declarations
                .extend(utility.declarations.into_iter().map(|d| {
                    if candidate.important { d.important() } else { d }
                }));
        }
        if all_important {
            applied.declarations = applied
                .declarations
                .into_iter()
                .map(|d| {
                    if d.value.ends_with("!important") { d } else { d.important() }
                })
                .collect();
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(markup: &str) -> Engine {
        Engine::new(EngineConfig::for_markup(markup))
    }

    #[test]
    fn test_candidate_parse() {
        let c = Candidate::parse("md:hover:!-mt-4").unwrap();
        assert_eq!(c.variants.len(), 2);
        assert!(c.important);
        assert!(c.negative);
        assert_eq!(c.base, "mt-4");

        let c = Candidate::parse("data-[state=open]:bg-accent").unwrap();
        assert_eq!(c.base, "bg-accent");
        assert!(Candidate::parse("nope:p-4").is_none());
        assert!(Candidate::parse("hover:").is_none());
    }

    #[test]
    fn test_escape_class() {
        assert_eq!(escape_class("hover:bg-primary/90"), "hover\\:bg-primary\\/90");
        assert_eq!(escape_class("px-2.5"), "px-2\\.5");
        assert_eq!(escape_class("2xl:p-4"), "\\32 xl\\:p-4");
        assert_eq!(
            escape_class("w-[calc(100%_-_2rem)]"),
            "w-\\[calc\\(100\\%_-_2rem\\)\\]"
        );
    }

    #[test]
    fn test_utilities_plain_rule() {
        let css = engine(r#"<div class="p-4"></div>"#).utilities();
        assert_eq!(css, ".p-4 {\n  padding: 1rem;\n}");
    }

    #[test]
    fn test_utilities_only_used_classes() {
        let css = engine(r#"<div class="bg-primary p-4"></div>"#).utilities();
        assert!(css.contains(".bg-primary {\n  background-color: hsl(var(--primary));\n}"));
        assert!(!css.contains("text-accent"));
        assert!(!css.contains(".div"));
    }

    #[test]
    fn test_utilities_order() {
        let css = engine(r#"<p class="md:p-2 hover:bg-accent p-4 flex absolute"></p>"#).utilities();
        let absolute = css.find(".absolute").unwrap();
        let flex = css.find(".flex").unwrap();
        let p4 = css.find(".p-4").unwrap();
        let hover = css.find(".hover\\:bg-accent:hover").unwrap();
        let md = css.find("@media (min-width: 768px)").unwrap();
        assert!(absolute < flex && flex < p4 && p4 < hover && hover < md);
    }

    #[test]
    fn test_utilities_media_grouped() {
        let css = engine(r#"<p class="md:p-2 md:flex"></p>"#).utilities();
        assert_eq!(css.matches("@media").count(), 1);
        assert!(css.contains("  .md\\:flex {\n    display: flex;\n  }"));
    }

    #[test]
    fn test_utilities_important() {
        let css = engine(r#"<p class="!p-0"></p>"#).utilities();
        assert!(css.contains("padding: 0px !important;"));
    }

    #[test]
    fn test_utilities_keyframes_once() {
        let css = engine(r#"<p class="animate-spin hover:animate-spin"></p>"#).utilities();
        assert_eq!(css.matches("@keyframes spin").count(), 1);
        assert!(css.find("@keyframes spin").unwrap() < css.find(".animate-spin").unwrap());
    }

    #[test]
    fn test_components_container() {
        assert!(engine("<p></p>").components().is_empty());
        let css = engine(r#"<main class="container"></main>"#).components();
        assert!(css.starts_with(".container {\n  width: 100%;\n  margin-right: auto;"));
        assert!(css.contains("@media (min-width: 1536px) {\n  .container {\n    max-width: 1536px;\n  }\n}"));
    }

    #[test]
    fn test_base_uses_font_tokens() {
        let css = engine("").base();
        assert!(css.contains("font-family: var(--font-sans), ui-sans-serif"));
        assert!(css.contains("font-family: var(--font-mono), ui-monospace"));
        assert!(css.contains("border-color: #e5e7eb;"));
    }

    #[test]
    fn test_apply() {
        let e = engine("");
        let applied = e.apply(["bg-background", "text-foreground"]).unwrap();
        assert_eq!(
            applied.declarations,
            vec![
                Declaration::new("background-color", "hsl(var(--background))"),
                Declaration::new("color", "hsl(var(--foreground))"),
            ]
        );
        let important = e.apply(["p-4", "!important"]).unwrap();
        assert_eq!(important.declarations[0].value, "1rem !important");
    }

    #[test]
    fn test_apply_errors() {
        let e = engine("");
        assert!(matches!(
            e.apply(["bg-nowhere"]),
            Err(StyleError::UnknownApply { .. })
        ));
        assert!(matches!(
            e.apply(["hover:bg-accent"]),
            Err(StyleError::ApplyVariant { .. })
        ));
        assert!(matches!(
            e.apply(["space-x-2"]),
            Err(StyleError::ApplyNested { .. })
        ));
    }

    #[test]
    fn test_output_is_deterministic() {
        let markup = r#"<div class="text-sm p-4 bg-primary hover:bg-primary/90 sm:flex"></div>"#;
        assert_eq!(engine(markup).utilities(), engine(markup).utilities());
    }
}
