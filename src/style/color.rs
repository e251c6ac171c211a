//! Color values with opacity modifiers.
//!
//! Four value shapes are understood:
//! - hex (`#fff`, `#3b82f6`), emitted as space separated `rgb()`
//! - templates containing `<alpha-value>`
//! - `hsl(var(--x))` / `rgb(var(--x))` style functions without an alpha slot
//! - keywords (`transparent`, `currentColor`, `inherit`), which take no alpha

use super::engine::Declaration;
use super::utility::is_valid_arbitrary;

/// Parse a `/NN` or `/[value]` opacity modifier into an alpha value.
pub fn parse_alpha(modifier: &str) -> Option<String> {
    if let Some(inner) = arbitrary(modifier) {
        return Some(inner.to_string());
    }
    let percent: u32 = modifier.parse().ok()?;
    if percent > 100 {
        return None;
    }
    Some(format_fraction(f64::from(percent) / 100.0))
}

fn arbitrary(raw: &str) -> Option<&str> {
    raw.strip_prefix('[')?
        .strip_suffix(']')
        .filter(|inner| is_valid_arbitrary(inner))
}

/// `0.5`, `0.05`, `1`
pub fn format_fraction(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn hex_channels(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn is_keyword(value: &str) -> bool {
    matches!(value, "transparent" | "currentColor" | "inherit")
}

/// Insert ` / alpha` before the closing paren of `hsl(...)`/`rgb(...)`.
fn with_alpha_slot(value: &str, alpha: &str) -> Option<String> {
    let is_function = ["hsl(", "hsla(", "rgb(", "rgba(", "oklch(", "lab("]
        .iter()
        .any(|f| value.starts_with(f));
    if !is_function || value.contains(" / ") {
        return None;
    }
    let body = value.strip_suffix(')')?;
    Some(format!("{body} / {alpha})"))
}

/// Declarations setting `property` to `color`.
///
/// `opacity_var` is the `--tw-*-opacity` variable for properties whose
/// opacity can be adjusted separately (`bg`, `text`, `border`, `ring`).
/// Returns `None` when the modifier cannot be applied to the value.
pub fn declarations(
    property: &str,
    color: &str,
    modifier: Option<&str>,
    opacity_var: Option<&str>,
) -> Option<Vec<Declaration>> {
    let alpha = match modifier {
        Some(m) => Some(parse_alpha(m)?),
        None => None,
    };

    if is_keyword(color) {
        return alpha
            .is_none()
            .then(|| vec![Declaration::new(property, color)]);
    }

    if let Some([r, g, b]) = hex_channels(color) {
        return Some(match (alpha, opacity_var) {
            (Some(alpha), _) => vec![Declaration::new(property, format!("rgb({r} {g} {b} / {alpha})"))],
            (None, Some(var)) => vec![
                Declaration::new(var, "1"),
                Declaration::new(property, format!("rgb({r} {g} {b} / var({var}))")),
            ],
            (None, None) => vec![Declaration::new(property, color)],
        });
    }

    if color.contains("<alpha-value>") {
        return Some(match (alpha, opacity_var) {
            (Some(alpha), _) => vec![Declaration::new(
                property,
                color.replace("<alpha-value>", &alpha),
            )],
            (None, Some(var)) => vec![
                Declaration::new(var, "1"),
                Declaration::new(property, color.replace("<alpha-value>", &format!("var({var})"))),
            ],
            (None, None) => vec![Declaration::new(property, color.replace("<alpha-value>", "1"))],
        });
    }

    match alpha {
        None => Some(vec![Declaration::new(property, color)]),
        Some(alpha) => {
            with_alpha_slot(color, &alpha).map(|value| vec![Declaration::new(property, value)])
        }
    }
}

/// Whether an arbitrary value reads as a color rather than a length.
pub fn is_color_like(value: &str) -> bool {
    value.starts_with('#')
        || ["rgb(", "rgba(", "hsl(", "hsla(", "oklch(", "color-mix("]
            .iter()
            .any(|f| value.starts_with(f))
        || is_keyword(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(decls: &[Declaration]) -> String {
        decls
            .iter()
            .map(|d| format!("{}: {}", d.property, d.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    #[test]
    fn test_parse_alpha() {
        assert_eq!(parse_alpha("50").as_deref(), Some("0.5"));
        assert_eq!(parse_alpha("5").as_deref(), Some("0.05"));
        assert_eq!(parse_alpha("100").as_deref(), Some("1"));
        assert_eq!(parse_alpha("0").as_deref(), Some("0"));
        assert_eq!(parse_alpha("[.37]").as_deref(), Some(".37"));
        assert_eq!(parse_alpha("150"), None);
        assert_eq!(parse_alpha("abc"), None);
    }

    #[test]
    fn test_hex_with_opacity_variable() {
        let decls = declarations("background-color", "#fff", None, Some("--tw-bg-opacity")).unwrap();
        assert_eq!(
            render(&decls),
            "--tw-bg-opacity: 1; background-color: rgb(255 255 255 / var(--tw-bg-opacity))"
        );
    }

    #[test]
    fn test_hex_with_modifier() {
        let decls = declarations("background-color", "#000", Some("80"), Some("--tw-bg-opacity")).unwrap();
        assert_eq!(render(&decls), "background-color: rgb(0 0 0 / 0.8)");
    }

    #[test]
    fn test_hsl_variable() {
        let plain = declarations("color", "hsl(var(--primary))", None, Some("--tw-text-opacity")).unwrap();
        assert_eq!(render(&plain), "color: hsl(var(--primary))");

        let faded = declarations("color", "hsl(var(--primary))", Some("50"), None).unwrap();
        assert_eq!(render(&faded), "color: hsl(var(--primary) / 0.5)");
    }

    #[test]
    fn test_alpha_value_placeholder() {
        let color = "hsl(var(--destructive) / <alpha-value>)";
        let plain = declarations("background-color", color, None, Some("--tw-bg-opacity")).unwrap();
        assert_eq!(
            render(&plain),
            "--tw-bg-opacity: 1; background-color: hsl(var(--destructive) / var(--tw-bg-opacity))"
        );
        let faded = declarations("background-color", color, Some("90"), None).unwrap();
        assert_eq!(render(&faded), "background-color: hsl(var(--destructive) / 0.9)");
    }

    #[test]
    fn test_keyword_rejects_modifier() {
        assert!(declarations("color", "transparent", Some("50"), None).is_none());
        let decls = declarations("color", "currentColor", None, Some("--tw-text-opacity")).unwrap();
        assert_eq!(render(&decls), "color: currentColor");
    }

    #[test]
    fn test_is_color_like() {
        assert!(is_color_like("#123456"));
        assert!(is_color_like("rgb(1 2 3)"));
        assert!(!is_color_like("12px"));
        assert!(!is_color_like("url(x.png)"));
    }
}
