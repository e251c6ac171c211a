//! Class candidate extraction from raw content.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Runs of characters that can never appear in an HTML attribute value
/// boundary. `=` and braces are split later, outside of `[...]`.
static RE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\x00-\x20"'`<>]+"#).unwrap());

/// Extract every distinct class candidate from `content`.
///
/// Over-collection is fine: candidates that do not resolve to a utility are
/// dropped by the engine.
pub fn candidates(content: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for token in RE_TOKEN.find_iter(content) {
        for piece in split_outside_brackets(token.as_str()) {
            let piece = piece.trim_end_matches([',', '.', ':']);
            if is_plausible(piece) {
                out.insert(piece.to_string());
            }
        }
    }
    out
}

/// Split on `=`, `{`, `}`, `;` and `,` that are not inside `[...]`.
fn split_outside_brackets(token: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in token.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '=' | '{' | '}' | ';' | ',' if depth == 0 => {
                pieces.push(&token[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    pieces.push(&token[start..]);
    pieces
}

fn is_plausible(piece: &str) -> bool {
    !piece.is_empty()
        && piece.len() <= 256
        && piece.is_ascii()
        && piece.bytes().any(|b| b.is_ascii_alphabetic())
        && !piece.starts_with("//")
        && !piece.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_from_class_attribute() {
        let found = candidates(r#"<div class="bg-primary p-4">hi</div>"#);
        assert!(found.contains("bg-primary"));
        assert!(found.contains("p-4"));
        assert!(found.contains("div"));
    }

    #[test]
    fn test_candidates_keep_brackets_intact() {
        let found = candidates(r#"<button class="data-[state=open]:bg-accent w-[calc(100%_-_2rem)]">"#);
        assert!(found.contains("data-[state=open]:bg-accent"));
        assert!(found.contains("w-[calc(100%_-_2rem)]"));
    }

    #[test]
    fn test_candidates_unquoted_attribute() {
        let found = candidates("<p class=text-accent>");
        assert!(found.contains("text-accent"));
        assert!(found.contains("class"));
    }

    #[test]
    fn test_candidates_skip_urls_and_punctuation() {
        let found = candidates(r#"<a href="https://example.com">Note: flex.</a>"#);
        assert!(!found.iter().any(|c| c.contains("://")));
        assert!(found.contains("flex"));
        assert!(found.contains("Note"));
    }

    #[test]
    fn test_candidates_dedup() {
        let found = candidates(r#"<i class="p-4"></i><i class="p-4"></i>"#);
        assert_eq!(found.iter().filter(|c| *c == "p-4").count(), 1);
    }
}
