//! Variant prefixes (`hover:`, `dark:`, `md:`, ...).
//!
//! Every variant owns one bit of a sort mask. Rules sort by that mask, so
//! plain utilities come first, single variants follow in table order,
//! stacked variants land after their highest member, and responsive
//! variants close the stylesheet.

use super::defaults::SCREENS;
use super::utility::is_valid_arbitrary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    /// Appended to the class selector (`:hover`, `:nth-child(odd)`).
    PseudoClass { bit: u32, selector: &'static str },
    /// Appended after any utility selector tail (`::placeholder`).
    PseudoElement { bit: u32, selector: &'static str },
    /// Ancestor / sibling marker: `.group:hover .x`, `.peer:disabled ~ .x`.
    Marker {
        bit: u32,
        class: &'static str,
        state: &'static str,
        combinator: &'static str,
    },
    /// `data-[state=open]` → `[data-state=open]`.
    Data { bit: u32, attribute: String },
    Dark { bit: u32 },
    Screen { bit: u32, min_width: &'static str },
}

const PSEUDO_CLASSES: &[(&str, &str)] = &[
    ("first", ":first-child"),
    ("last", ":last-child"),
    ("odd", ":nth-child(odd)"),
    ("even", ":nth-child(even)"),
    ("visited", ":visited"),
    ("focus-within", ":focus-within"),
    ("hover", ":hover"),
    ("focus", ":focus"),
    ("focus-visible", ":focus-visible"),
    ("active", ":active"),
    ("disabled", ":disabled"),
];

const MARKERS: &[(&str, &str, &str, &str)] = &[
    ("group-hover", "group", ":hover", " "),
    ("peer-disabled", "peer", ":disabled", " ~ "),
];

// Bit layout, lowest first.
const PLACEHOLDER_BIT: u32 = 0;
const PSEUDO_CLASS_BASE: u32 = 1;
const MARKER_BASE: u32 = PSEUDO_CLASS_BASE + PSEUDO_CLASSES.len() as u32;
const DATA_BIT: u32 = MARKER_BASE + MARKERS.len() as u32;
const DARK_BIT: u32 = DATA_BIT + 1;
const SCREEN_BASE: u32 = DARK_BIT + 1;

impl Variant {
    pub fn parse(name: &str) -> Option<Self> {
        if name == "placeholder" {
            return Some(Self::PseudoElement {
                bit: PLACEHOLDER_BIT,
                selector: "::placeholder",
            });
        }
        if let Some(i) = PSEUDO_CLASSES.iter().position(|(n, _)| *n == name) {
            return Some(Self::PseudoClass {
                bit: PSEUDO_CLASS_BASE + i as u32,
                selector: PSEUDO_CLASSES[i].1,
            });
        }
        if let Some(i) = MARKERS.iter().position(|(n, ..)| *n == name) {
            let (_, class, state, combinator) = MARKERS[i];
            return Some(Self::Marker {
                bit: MARKER_BASE + i as u32,
                class,
                state,
                combinator,
            });
        }
        if name == "dark" {
            return Some(Self::Dark { bit: DARK_BIT });
        }
        if let Some(i) = SCREENS.iter().position(|(n, _)| *n == name) {
            return Some(Self::Screen {
                bit: SCREEN_BASE + i as u32,
                min_width: SCREENS[i].1,
            });
        }
        let inner = name.strip_prefix("data-[")?.strip_suffix(']')?;
        if inner.is_empty() || !is_valid_arbitrary(inner) {
            return None;
        }
        Some(Self::Data {
            bit: DATA_BIT,
            attribute: format!("[data-{}]", inner.replace('_', " ")),
        })
    }

    fn bit(&self) -> u32 {
        match self {
            Self::PseudoClass { bit, .. }
            | Self::PseudoElement { bit, .. }
            | Self::Marker { bit, .. }
            | Self::Data { bit, .. }
            | Self::Dark { bit }
            | Self::Screen { bit, .. } => *bit,
        }
    }
}

/// Sort mask for a variant chain.
pub fn sort_mask(variants: &[Variant]) -> u32 {
    variants.iter().fold(0, |mask, v| mask | (1 << v.bit()))
}

/// Media condition for the chain, if it has responsive variants.
pub fn media(variants: &[Variant]) -> Option<String> {
    let conditions: Vec<String> = variants
        .iter()
        .filter_map(|v| match v {
            Variant::Screen { min_width, .. } => Some(format!("(min-width: {min_width})")),
            _ => None,
        })
        .collect();
    (!conditions.is_empty()).then(|| conditions.join(" and "))
}

/// Build the full selector for `class_selector` (already escaped, with
/// leading dot) under `variants`, followed by the utility's own `tail`.
pub fn selector(class_selector: &str, variants: &[Variant], tail: &str, dark_class: &str) -> String {
    let mut prefix = String::new();
    let mut states = String::new();
    let mut elements = String::new();

    for variant in variants {
        match variant {
            Variant::PseudoClass { selector, .. } => states.push_str(selector),
            Variant::PseudoElement { selector, .. } => elements.push_str(selector),
            Variant::Marker {
                class,
                state,
                combinator,
                ..
            } => {
                prefix.push('.');
                prefix.push_str(class);
                prefix.push_str(state);
                prefix.push_str(combinator);
            }
            Variant::Data { attribute, .. } => states.push_str(attribute),
            Variant::Dark { .. } => {
                states.push_str(":is(.");
                states.push_str(dark_class);
                states.push_str(" *)");
            }
            Variant::Screen { .. } => {}
        }
    }

    format!("{prefix}{class_selector}{states}{tail}{elements}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[&str]) -> Vec<Variant> {
        names.iter().map(|n| Variant::parse(n).unwrap()).collect()
    }

    #[test]
    fn test_parse_unknown() {
        assert!(Variant::parse("sideways").is_none());
        assert!(Variant::parse("data-[]").is_none());
        assert!(Variant::parse("data-[state=open]{x]").is_none());
    }

    #[test]
    fn test_selector_pseudo_class() {
        let s = selector(".hover\\:bg-accent", &chain(&["hover"]), "", "dark");
        assert_eq!(s, ".hover\\:bg-accent:hover");
    }

    #[test]
    fn test_selector_dark() {
        let s = selector(".dark\\:bg-muted", &chain(&["dark"]), "", "dark");
        assert_eq!(s, ".dark\\:bg-muted:is(.dark *)");
    }

    #[test]
    fn test_selector_group_and_peer() {
        let s = selector(".x", &chain(&["group-hover"]), "", "dark");
        assert_eq!(s, ".group:hover .x");
        let s = selector(".x", &chain(&["peer-disabled"]), "", "dark");
        assert_eq!(s, ".peer:disabled ~ .x");
    }

    #[test]
    fn test_selector_data_attribute() {
        let s = selector(".x", &chain(&["data-[state=open]"]), "", "dark");
        assert_eq!(s, ".x[data-state=open]");
    }

    #[test]
    fn test_selector_placeholder_after_tail() {
        let s = selector(
            ".x",
            &chain(&["placeholder", "hover"]),
            " > :not([hidden])",
            "dark",
        );
        assert_eq!(s, ".x:hover > :not([hidden])::placeholder");
    }

    #[test]
    fn test_media() {
        assert_eq!(media(&chain(&["hover"])), None);
        assert_eq!(
            media(&chain(&["md", "hover"])).as_deref(),
            Some("(min-width: 768px)")
        );
    }

    #[test]
    fn test_sort_mask_orders_screens_last() {
        let hover = sort_mask(&chain(&["hover"]));
        let dark_hover = sort_mask(&chain(&["dark", "hover"]));
        let sm = sort_mask(&chain(&["sm"]));
        let md_hover = sort_mask(&chain(&["md", "hover"]));
        assert!(0 < hover);
        assert!(hover < dark_hover);
        assert!(dark_hover < sm);
        assert!(sm < md_hover);
    }
}
