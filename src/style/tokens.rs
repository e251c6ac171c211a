//! Design token set shared by every theme.
//!
//! Colors resolve to CSS variables whose values come from the palette
//! stylesheet, so the same token tree serves all five themes. Lookups fall
//! back to the built-in scales in [`defaults`](super::defaults), mirroring
//! an `extend` block layered over the default theme.

use super::defaults;

use ColorNode::{Group, Value};

/// A node in the color tree: a leaf value or a group of named children.
///
/// Inside a group, the `DEFAULT` child is used when the group name itself is
/// referenced (`bg-primary` vs `bg-primary-foreground`).
#[derive(Debug)]
pub enum ColorNode {
    Value(&'static str),
    Group(&'static [(&'static str, ColorNode)]),
}

#[derive(Debug)]
pub struct KeyframeStep {
    pub offset: &'static str,
    pub declarations: &'static [(&'static str, &'static str)],
}

#[derive(Debug)]
pub struct Keyframes {
    pub name: &'static str,
    pub steps: &'static [KeyframeStep],
}

/// An `animate-{name}` binding of keyframes to timing.
#[derive(Debug)]
pub struct Animation {
    pub name: &'static str,
    pub value: &'static str,
    pub keyframes: Option<&'static str>,
}

#[derive(Debug)]
pub struct Container {
    pub center: bool,
    pub padding: &'static str,
    pub screens: &'static [(&'static str, &'static str)],
}

#[derive(Debug)]
pub struct DesignTokens {
    pub colors: &'static [(&'static str, ColorNode)],
    pub border_radius: &'static [(&'static str, &'static str)],
    pub font_family: &'static [(&'static str, &'static [&'static str])],
    pub keyframes: &'static [Keyframes],
    pub animation: &'static [Animation],
    pub container: Container,
}

pub static TOKENS: DesignTokens = DesignTokens {
    colors: &[
        ("border", Value("hsl(var(--border))")),
        ("input", Value("hsl(var(--input))")),
        ("ring", Value("hsl(var(--ring))")),
        ("background", Value("hsl(var(--background))")),
        ("foreground", Value("hsl(var(--foreground))")),
        (
            "primary",
            Group(&[
                ("DEFAULT", Value("hsl(var(--primary))")),
                ("foreground", Value("hsl(var(--primary-foreground))")),
            ]),
        ),
        (
            "secondary",
            Group(&[
                ("DEFAULT", Value("hsl(var(--secondary))")),
                ("foreground", Value("hsl(var(--secondary-foreground))")),
            ]),
        ),
        (
            "destructive",
            Group(&[
                ("DEFAULT", Value("hsl(var(--destructive) / <alpha-value>)")),
                ("foreground", Value("hsl(var(--destructive-foreground) / <alpha-value>)")),
            ]),
        ),
        (
            "muted",
            Group(&[
                ("DEFAULT", Value("hsl(var(--muted))")),
                ("foreground", Value("hsl(var(--muted-foreground))")),
            ]),
        ),
        (
            "accent",
            Group(&[
                ("DEFAULT", Value("hsl(var(--accent))")),
                ("foreground", Value("hsl(var(--accent-foreground))")),
            ]),
        ),
        (
            "popover",
            Group(&[
                ("DEFAULT", Value("hsl(var(--popover))")),
                ("foreground", Value("hsl(var(--popover-foreground))")),
            ]),
        ),
        (
            "card",
            Group(&[
                ("DEFAULT", Value("hsl(var(--card))")),
                ("foreground", Value("hsl(var(--card-foreground))")),
            ]),
        ),
        (
            "chart",
            Group(&[
                ("1", Value("hsl(var(--chart-1))")),
                ("2", Value("hsl(var(--chart-2))")),
                ("3", Value("hsl(var(--chart-3))")),
                ("4", Value("hsl(var(--chart-4))")),
                ("5", Value("hsl(var(--chart-5))")),
            ]),
        ),
        (
            "sidebar",
            Group(&[
                ("DEFAULT", Value("hsl(var(--sidebar-background))")),
                ("foreground", Value("hsl(var(--sidebar-foreground))")),
                ("primary", Value("hsl(var(--sidebar-primary))")),
                ("primary-foreground", Value("hsl(var(--sidebar-primary-foreground))")),
                ("accent", Value("hsl(var(--sidebar-accent))")),
                ("accent-foreground", Value("hsl(var(--sidebar-accent-foreground))")),
                ("border", Value("hsl(var(--sidebar-border))")),
                ("ring", Value("hsl(var(--sidebar-ring))")),
            ]),
        ),
    ],
    border_radius: &[
        ("xl", "calc(var(--radius) + 4px)"),
        ("lg", "var(--radius)"),
        ("md", "calc(var(--radius) - 2px)"),
        ("sm", "calc(var(--radius) - 4px)"),
    ],
    font_family: &[
        (
            "sans",
            &[
                "var(--font-sans)",
                "ui-sans-serif",
                "system-ui",
                "sans-serif",
                "\"Apple Color Emoji\"",
                "\"Segoe UI Emoji\"",
                "\"Segoe UI Symbol\"",
                "\"Noto Color Emoji\"",
            ],
        ),
        (
            "mono",
            &[
                "var(--font-mono)",
                "ui-monospace",
                "SFMono-Regular",
                "Menlo",
                "Monaco",
                "Consolas",
                "\"Liberation Mono\"",
                "\"Courier New\"",
                "monospace",
            ],
        ),
    ],
    keyframes: &[
        Keyframes {
            name: "accordion-down",
            steps: &[
                KeyframeStep {
                    offset: "from",
                    declarations: &[("height", "0")],
                },
                KeyframeStep {
                    offset: "to",
                    declarations: &[("height", "var(--radix-accordion-content-height)")],
                },
            ],
        },
        Keyframes {
            name: "accordion-up",
            steps: &[
                KeyframeStep {
                    offset: "from",
                    declarations: &[("height", "var(--radix-accordion-content-height)")],
                },
                KeyframeStep {
                    offset: "to",
                    declarations: &[("height", "0")],
                },
            ],
        },
        Keyframes {
            name: "caret-blink",
            steps: &[
                KeyframeStep {
                    offset: "0%,70%,100%",
                    declarations: &[("opacity", "1")],
                },
                KeyframeStep {
                    offset: "20%,50%",
                    declarations: &[("opacity", "0")],
                },
            ],
        },
    ],
    animation: &[
        Animation {
            name: "accordion-down",
            value: "accordion-down 0.2s ease-out",
            keyframes: Some("accordion-down"),
        },
        Animation {
            name: "accordion-up",
            value: "accordion-up 0.2s ease-out",
            keyframes: Some("accordion-up"),
        },
        Animation {
            name: "caret-blink",
            value: "caret-blink 1.25s ease-out infinite",
            keyframes: Some("caret-blink"),
        },
    ],
    container: Container {
        center: true,
        padding: "2rem",
        screens: &[("2xl", "1536px")],
    },
};

impl DesignTokens {
    /// Resolve a color name (`primary`, `sidebar-primary-foreground`,
    /// `red-500`) to its raw value.
    pub fn color(&self, name: &str) -> Option<&'static str> {
        lookup_color(self.colors, name).or_else(|| defaults::palette_color(name))
    }

    pub fn border_radius(&self, name: &str) -> Option<&'static str> {
        defaults::find(self.border_radius, name)
            .or_else(|| defaults::find(defaults::BORDER_RADIUS, name))
    }

    /// Font stack for `font-{name}`, comma joined.
    pub fn font_family(&self, name: &str) -> Option<String> {
        if let Some((_, stack)) = self.font_family.iter().find(|(n, _)| *n == name) {
            return Some(stack.join(", "));
        }
        defaults::find(defaults::FONT_FAMILY, name).map(str::to_string)
    }

    pub fn keyframes(&self, name: &str) -> Option<&'static Keyframes> {
        self.keyframes
            .iter()
            .chain(defaults::KEYFRAMES)
            .find(|k| k.name == name)
    }

    pub fn animation(&self, name: &str) -> Option<&'static Animation> {
        self.animation
            .iter()
            .chain(defaults::ANIMATION)
            .find(|a| a.name == name)
    }
}

fn lookup_color(nodes: &'static [(&'static str, ColorNode)], name: &str) -> Option<&'static str> {
    for (key, node) in nodes {
        if *key == name {
            return match node {
                ColorNode::Value(value) => Some(*value),
                ColorNode::Group(children) => lookup_color(*children, "DEFAULT"),
            };
        }
        if let (Some(rest), ColorNode::Group(children)) = (strip_segment(name, key), node)
            && let Some(value) = lookup_color(*children, rest)
        {
            return Some(value);
        }
    }
    None
}

/// `strip_segment("primary-foreground", "primary") == Some("foreground")`
fn strip_segment<'a>(name: &'a str, key: &str) -> Option<&'a str> {
    name.strip_prefix(key)?.strip_prefix('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_default_child() {
        assert_eq!(TOKENS.color("primary"), Some("hsl(var(--primary))"));
        assert_eq!(TOKENS.color("sidebar"), Some("hsl(var(--sidebar-background))"));
    }

    #[test]
    fn test_color_nested() {
        assert_eq!(
            TOKENS.color("primary-foreground"),
            Some("hsl(var(--primary-foreground))")
        );
        assert_eq!(
            TOKENS.color("sidebar-primary-foreground"),
            Some("hsl(var(--sidebar-primary-foreground))")
        );
        assert_eq!(TOKENS.color("chart-3"), Some("hsl(var(--chart-3))"));
    }

    #[test]
    fn test_color_falls_back_to_palette() {
        assert_eq!(TOKENS.color("blue-500"), Some("#3b82f6"));
        assert_eq!(TOKENS.color("primary-500"), None);
        assert_eq!(TOKENS.color("nope"), None);
    }

    #[test]
    fn test_radius_extends_defaults() {
        assert_eq!(TOKENS.border_radius("lg"), Some("var(--radius)"));
        assert_eq!(TOKENS.border_radius("full"), Some("9999px"));
        assert_eq!(TOKENS.border_radius("DEFAULT"), Some("0.25rem"));
    }

    #[test]
    fn test_font_family_prefers_variable() {
        let sans = TOKENS.font_family("sans").unwrap();
        assert!(sans.starts_with("var(--font-sans), ui-sans-serif"));
        assert!(TOKENS.font_family("serif").unwrap().starts_with("ui-serif"));
    }

    #[test]
    fn test_animation_lookup() {
        let caret = TOKENS.animation("caret-blink").unwrap();
        assert_eq!(caret.value, "caret-blink 1.25s ease-out infinite");
        assert!(TOKENS.keyframes("caret-blink").is_some());
        assert!(TOKENS.animation("spin").is_some());
    }
}
