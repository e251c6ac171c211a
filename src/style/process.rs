//! Directive processing pass.
//!
//! Expands `@tailwind <layer>;` into the engine's output for that layer,
//! hoists `@layer <layer> { ... }` bodies to the matching directive, and
//! inlines `@apply` class lists everywhere. Anything else passes through
//! unchanged, in source order.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::StyleError;
use super::engine::{Engine, render_keyframes};

static RE_APPLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@apply[ \t\r\n]+([^;{}]+);").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Base,
    Components,
    Utilities,
}

impl Layer {
    fn parse(name: &str) -> Result<Self, StyleError> {
        match name {
            "base" => Ok(Self::Base),
            "components" => Ok(Self::Components),
            "utilities" => Ok(Self::Utilities),
            _ => Err(StyleError::UnknownLayer(name.to_string())),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// A top-level stylesheet item.
#[derive(Debug, PartialEq, Eq)]
enum Item<'a> {
    /// At-rule or stray text ending in `;`.
    Statement(&'a str),
    Block { prelude: &'a str, body: &'a str },
}

/// Scanner state shared by the top-level and block-matching loops.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(css: &'a str) -> Self {
        Self {
            bytes: css.as_bytes(),
            pos: 0,
        }
    }

    /// Step over a comment or quoted string starting at `pos`, if any.
    fn skip_opaque(&mut self) -> bool {
        match self.bytes[self.pos] {
            b'/' if self.bytes.get(self.pos + 1) == Some(&b'*') => {
                let rest = &self.bytes[self.pos + 2..];
                self.pos = match rest.windows(2).position(|w| w == b"*/") {
                    Some(end) => self.pos + 2 + end + 2,
                    None => self.bytes.len(),
                };
                true
            }
            quote @ (b'"' | b'\'') => {
                self.pos += 1;
                while self.pos < self.bytes.len() && self.bytes[self.pos] != quote {
                    if self.bytes[self.pos] == b'\\' {
                        self.pos += 1;
                    }
                    self.pos += 1;
                }
                self.pos = (self.pos + 1).min(self.bytes.len());
                true
            }
            _ => false,
        }
    }

    /// Position of the `}` matching the `{` just before `pos`.
    fn block_end(&mut self) -> Result<usize, StyleError> {
        let open = self.pos - 1;
        let mut depth = 1usize;
        while self.pos < self.bytes.len() {
            if self.skip_opaque() {
                continue;
            }
            match self.bytes[self.pos] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let end = self.pos;
                        self.pos += 1;
                        return Ok(end);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(StyleError::UnbalancedBraces(open))
    }
}

fn parse_items(css: &str) -> Result<Vec<Item<'_>>, StyleError> {
    let mut items = Vec::new();
    let mut cursor = Cursor::new(css);
    let mut start = 0;
    let mut parens = 0usize;

    while cursor.pos < cursor.bytes.len() {
        let leading = css[start..cursor.pos].trim().is_empty();
        let comment = cursor.bytes[cursor.pos] == b'/';
        if cursor.skip_opaque() {
            // Top-level comments between items are dropped.
            if leading && comment {
                start = cursor.pos;
            }
            continue;
        }
        match cursor.bytes[cursor.pos] {
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b';' if parens == 0 => {
                let text = css[start..=cursor.pos].trim();
                if text != ";" {
                    items.push(Item::Statement(text));
                }
                start = cursor.pos + 1;
            }
            b'{' => {
                let prelude = css[start..cursor.pos].trim();
                cursor.pos += 1;
                let body_start = cursor.pos;
                let end = cursor.block_end()?;
                items.push(Item::Block {
                    prelude,
                    body: &css[body_start..end],
                });
                start = cursor.pos;
                continue;
            }
            b'}' => return Err(StyleError::UnbalancedBraces(cursor.pos)),
            _ => {}
        }
        cursor.pos += 1;
    }

    let tail = css[start..].trim();
    if !tail.is_empty() {
        items.push(Item::Statement(tail));
    }
    Ok(items)
}

/// Remove the indentation shared by every non-blank line.
fn dedent(body: &str) -> String {
    let body = body.trim_start_matches(['\n', '\r']).trim_end();
    let indent = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    body.lines()
        .map(|line| line.get(indent..).unwrap_or(line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every `@apply a b c;` in `css` with the resolved declarations,
/// one per line at the `@apply` indentation. Keyframes referenced by the
/// applied utilities are appended after the text.
fn expand_apply(css: &str, engine: &Engine) -> Result<String, StyleError> {
    let mut error = None;
    let mut keyframes = Vec::new();

    let expanded = RE_APPLY.replace_all(css, |caps: &Captures<'_>| {
        let Some(whole) = caps.get(0) else {
            return String::new();
        };
        // Only an `@apply` on a line of its own sets the indent.
        let indent = match css[..whole.start()].rfind('\n') {
            Some(i) if css[i + 1..whole.start()].trim().is_empty() => &css[i + 1..whole.start()],
            _ => "",
        };

        match engine.apply(caps[1].split_ascii_whitespace()) {
            Ok(applied) => {
                keyframes.extend(applied.keyframes);
                let mut out = String::new();
                for (i, d) in applied.declarations.iter().enumerate() {
                    if i > 0 {
                        let _ = write!(out, "\n{indent}");
                    }
                    let _ = write!(out, "{}: {};", d.property, d.value);
                }
                out
            }
            Err(e) => {
                error.get_or_insert(e);
                String::new()
            }
        }
    });

    if let Some(e) = error {
        return Err(e);
    }
    let mut out = expanded.into_owned();
    let mut seen = Vec::new();
    for k in keyframes {
        if !seen.contains(&k.name) {
            seen.push(k.name);
            out.push_str("\n\n");
            render_keyframes(&mut out, k, "");
        }
    }
    Ok(out)
}

enum Piece {
    Text(String),
    Layer(Layer),
}

/// Run the processing pass over `input`.
pub fn process(input: &str, engine: &Engine) -> Result<String, StyleError> {
    let items = parse_items(input)?;

    let mut directives = [false; 3];
    for item in &items {
        if let Item::Statement(text) = item
            && let Some(name) = tailwind_directive(text)
        {
            directives[Layer::parse(name)?.index()] = true;
        }
    }

    let mut pieces = Vec::new();
    let mut placed = [false; 3];
    let mut extras: [Vec<String>; 3] = Default::default();

    for item in items {
        match item {
            Item::Statement(text) => match tailwind_directive(text) {
                Some(name) => {
                    let layer = Layer::parse(name)?;
                    if !placed[layer.index()] {
                        placed[layer.index()] = true;
                        pieces.push(Piece::Layer(layer));
                    }
                }
                None => pieces.push(Piece::Text(text.to_string())),
            },
            Item::Block { prelude, body } => {
                if let Some(name) = prelude.strip_prefix("@layer ") {
                    let layer = Layer::parse(name.trim())?;
                    if !directives[layer.index()] {
                        return Err(StyleError::MissingDirective(name.trim().to_string()));
                    }
                    extras[layer.index()].push(expand_apply(&dedent(body), engine)?);
                } else {
                    let body = expand_apply(body, engine)?;
                    pieces.push(Piece::Text(format!("{prelude} {{{body}}}")));
                }
            }
        }
    }

    let mut blocks = Vec::new();
    for piece in pieces {
        let text = match piece {
            Piece::Text(text) => text,
            Piece::Layer(layer) => {
                let generated = match layer {
                    Layer::Base => engine.base(),
                    Layer::Components => engine.components(),
                    Layer::Utilities => engine.utilities(),
                };
                std::iter::once(generated)
                    .chain(extras[layer.index()].drain(..))
                    .filter(|block| !block.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
        };
        if !text.trim().is_empty() {
            blocks.push(text);
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    Ok(out)
}

/// `@tailwind base;` → `base`
fn tailwind_directive(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("@tailwind")?;
    if !rest.starts_with([' ', '\t', '\n']) {
        return None;
    }
    Some(rest.trim().trim_end_matches(';').trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::config::EngineConfig;

    fn engine(markup: &str) -> Engine {
        Engine::new(EngineConfig::for_markup(markup))
    }

    #[test]
    fn test_parse_items_respects_strings() {
        let css = "@import url('a;b');\n.x { content: '}'; }\n@tailwind base;";
        let items = parse_items(css).unwrap();
        assert_eq!(
            items,
            vec![
                Item::Statement("@import url('a;b');"),
                Item::Block {
                    prelude: ".x",
                    body: " content: '}'; ",
                },
                Item::Statement("@tailwind base;"),
            ]
        );
    }

    #[test]
    fn test_parse_items_drops_top_level_comments() {
        let items = parse_items("/* theme */\n@tailwind base;\n/* end */").unwrap();
        assert_eq!(items, vec![Item::Statement("@tailwind base;")]);
    }

    #[test]
    fn test_parse_items_unbalanced() {
        assert!(matches!(
            parse_items(".x { color: red;"),
            Err(StyleError::UnbalancedBraces(_))
        ));
        assert!(matches!(
            parse_items(".x { color: red; } }"),
            Err(StyleError::UnbalancedBraces(_))
        ));
    }

    #[test]
    fn test_dedent() {
        let body = "\n  :root {\n    --x: 1;\n  }\n";
        assert_eq!(dedent(body), ":root {\n  --x: 1;\n}");
    }

    #[test]
    fn test_expand_apply_keeps_indent() {
        let css = "body {\n  @apply bg-background text-foreground;\n}";
        let out = expand_apply(css, &engine("")).unwrap();
        assert_eq!(
            out,
            "body {\n  background-color: hsl(var(--background));\n  color: hsl(var(--foreground));\n}"
        );
    }

    #[test]
    fn test_process_layers_in_directive_order() {
        let input = "@tailwind base;\n@tailwind utilities;\n@layer base { :root { --x: 1; } }\n.tail { color: red; }";
        let out = process(input, &engine(r#"<p class="p-4">"#)).unwrap();
        let preflight = out.find("box-sizing: border-box").unwrap();
        let root = out.find(":root { --x: 1; }").unwrap();
        let utility = out.find(".p-4 {").unwrap();
        let tail = out.find(".tail {").unwrap();
        assert!(preflight < root && root < utility && utility < tail);
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_process_passes_imports_through() {
        let input = "@import url('https://x.test/a?b=1;2');\n@tailwind utilities;";
        let out = process(input, &engine("")).unwrap();
        assert_eq!(out, "@import url('https://x.test/a?b=1;2');\n");
    }

    #[test]
    fn test_process_errors() {
        let e = engine("");
        assert!(matches!(
            process("@tailwind nothing;", &e),
            Err(StyleError::UnknownLayer(_))
        ));
        assert!(matches!(
            process("@tailwind base;\n@layer things { }", &e),
            Err(StyleError::UnknownLayer(_))
        ));
        assert!(matches!(
            process("@tailwind base;\n@layer utilities { .x { color: red; } }", &e),
            Err(StyleError::MissingDirective(_))
        ));
        assert!(matches!(
            process("body { @apply no-such-class; }", &e),
            Err(StyleError::UnknownApply { .. })
        ));
    }

    #[test]
    fn test_apply_in_plain_rule() {
        let out = process(".btn { @apply px-4 py-2; }", &engine("")).unwrap();
        assert_eq!(
            out,
            ".btn { padding-left: 1rem;\npadding-right: 1rem;\npadding-top: 0.5rem;\npadding-bottom: 0.5rem; }\n"
        );
    }
}
