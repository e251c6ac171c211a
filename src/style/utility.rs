//! Utility class resolution: `p-4` → `padding: 1rem`.
//!
//! [`resolve`] takes the class name with variants, `!` and the leading `-`
//! already stripped. Static keywords are matched first, then functional
//! utilities by prefix, longest prefix first where two could overlap
//! (`ring-offset-` before `ring-`).

use super::color::{self, format_fraction};
use super::defaults::{self, find};
use super::engine::Declaration;
use super::tokens::{DesignTokens, Keyframes};

/// Utility families in stylesheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    SrOnly,
    PointerEvents,
    Visibility,
    Position,
    Inset,
    Isolation,
    ZIndex,
    Order,
    GridColumn,
    GridRow,
    Float,
    Margin,
    BoxSizing,
    LineClamp,
    Display,
    AspectRatio,
    Size,
    Height,
    MaxHeight,
    MinHeight,
    Width,
    MinWidth,
    MaxWidth,
    Flex,
    FlexShrink,
    FlexGrow,
    FlexBasis,
    TableLayout,
    BorderCollapse,
    Translate,
    Rotate,
    Scale,
    Transform,
    Animation,
    Cursor,
    UserSelect,
    Resize,
    ListStyle,
    Appearance,
    GridTemplateColumns,
    GridTemplateRows,
    FlexDirection,
    FlexWrap,
    PlaceItems,
    AlignContent,
    AlignItems,
    JustifyContent,
    Gap,
    Space,
    AlignSelf,
    Overflow,
    TextOverflow,
    Whitespace,
    WordBreak,
    BorderRadius,
    BorderWidth,
    BorderStyle,
    BorderColor,
    BackgroundColor,
    BackgroundImage,
    BackgroundSize,
    BackgroundPosition,
    BackgroundRepeat,
    Fill,
    Stroke,
    StrokeWidth,
    ObjectFit,
    Padding,
    TextAlign,
    VerticalAlign,
    FontFamily,
    FontSize,
    FontWeight,
    TextTransform,
    FontStyle,
    LineHeight,
    LetterSpacing,
    TextColor,
    TextDecoration,
    DecorationColor,
    DecorationThickness,
    UnderlineOffset,
    FontSmoothing,
    Opacity,
    BoxShadow,
    ShadowColor,
    OutlineStyle,
    OutlineWidth,
    OutlineOffset,
    OutlineColor,
    RingWidth,
    RingColor,
    RingOffsetWidth,
    RingOffsetColor,
    Transition,
    Delay,
    Duration,
    Ease,
    WillChange,
    Enter,
    Exit,
    EnterExitValue,
    ArbitraryProperty,
}

use Family::*;

#[derive(Debug, Clone)]
pub struct Utility {
    pub family: Family,
    pub declarations: Vec<Declaration>,
    /// Selector tail appended after the class (`space-x-*` children).
    pub tail: &'static str,
    /// Keyframes the declarations refer to.
    pub keyframes: Option<&'static Keyframes>,
}

impl Utility {
    fn new(family: Family, declarations: Vec<Declaration>) -> Self {
        Self {
            family,
            declarations,
            tail: "",
            keyframes: None,
        }
    }

    fn single(family: Family, property: &str, value: impl Into<String>) -> Self {
        Self::new(family, vec![Declaration::new(property, value)])
    }

    fn each(family: Family, properties: &[&str], value: &str) -> Self {
        let declarations = properties
            .iter()
            .map(|p| Declaration::new(*p, value))
            .collect();
        Self::new(family, declarations)
    }

    fn with_tail(mut self, tail: &'static str) -> Self {
        self.tail = tail;
        self
    }
}

const TRANSFORM: &str = "translate(var(--tw-translate-x), var(--tw-translate-y)) rotate(var(--tw-rotate)) skewX(var(--tw-skew-x)) skewY(var(--tw-skew-y)) scaleX(var(--tw-scale-x)) scaleY(var(--tw-scale-y))";

const SPACE_TAIL: &str = " > :not([hidden]) ~ :not([hidden])";

/// Resolve a bare utility name.
pub fn resolve(base: &str, negative: bool, tokens: &DesignTokens) -> Option<Utility> {
    if base.starts_with('[') {
        return if negative { None } else { arbitrary_property(base) };
    }
    if !negative && let Some(utility) = keyword(base) {
        return Some(utility);
    }
    functional(base, negative, tokens)
}

// ============================================================================
// Value helpers
// ============================================================================

/// Contents of `[...]`, with `_` decoded to spaces and type hints removed.
pub fn arbitrary(value: &str) -> Option<String> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        return None;
    }
    let inner = ["length:", "color:", "url:", "percentage:", "number:", "image:"]
        .iter()
        .find_map(|hint| inner.strip_prefix(hint))
        .unwrap_or(inner);
    if !is_valid_arbitrary(inner) {
        return None;
    }
    if inner.starts_with("url(") {
        return Some(inner.to_string());
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'_') => {
                out.push('_');
                chars.next();
            }
            '_' => out.push(' '),
            c => out.push(c),
        }
    }
    Some(out)
}

/// Whether `value` can sit inside a declaration: no `;`, `{` or `}`,
/// closed quotes, and balanced `()` / `[]` outside quotes.
pub fn is_valid_arbitrary(value: &str) -> bool {
    let mut open = Vec::new();
    let mut quote = None;
    for c in value.chars() {
        if matches!(c, ';' | '{' | '}') {
            return false;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => open.push(')'),
            '[' => open.push(']'),
            ')' | ']' => {
                if open.pop() != Some(c) {
                    return false;
                }
            }
            _ => {}
        }
    }
    open.is_empty() && quote.is_none()
}

fn is_arbitrary(value: &str) -> bool {
    value.starts_with('[') && value.ends_with(']')
}

/// Split a trailing `/modifier` that is not inside brackets.
fn split_modifier(value: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let mut split = None;
    for (i, c) in value.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => split = Some(i),
            _ => {}
        }
    }
    match split {
        Some(i) if i > 0 && i + 1 < value.len() => (&value[..i], Some(&value[i + 1..])),
        _ => (value, None),
    }
}

fn spacing(value: &str) -> Option<String> {
    match value {
        "px" => Some("1px".to_string()),
        "0" => Some("0px".to_string()),
        _ if defaults::SPACING_STEPS.contains(&value) => {
            let step: f64 = value.parse().ok()?;
            Some(format!("{}rem", format_fraction(step / 4.0)))
        }
        _ => arbitrary(value),
    }
}

fn fraction(value: &str) -> Option<String> {
    if value == "full" {
        return Some("100%".to_string());
    }
    let (a, b) = value.split_once('/')?;
    let a: u32 = a.parse().ok()?;
    let b: u32 = b.parse().ok()?;
    if a == 0 || a >= b || ![2, 3, 4, 5, 6, 12].contains(&b) {
        return None;
    }
    Some(format!(
        "{}%",
        format_fraction(f64::from(a) * 100.0 / f64::from(b))
    ))
}

fn negate(value: &str) -> String {
    if ["calc(", "var(", "min(", "max(", "clamp("]
        .iter()
        .any(|f| value.starts_with(f))
    {
        format!("calc({value} * -1)")
    } else if let Some(positive) = value.strip_prefix('-') {
        positive.to_string()
    } else {
        format!("-{value}")
    }
}

fn signed(value: String, negative: bool) -> String {
    if negative { negate(&value) } else { value }
}

/// Spacing, `auto`, fractions and `full`: shared by inset and margin-like
/// families.
fn inset_value(value: &str) -> Option<String> {
    match value {
        "auto" => Some("auto".to_string()),
        _ => fraction(value).or_else(|| spacing(value)),
    }
}

/// Width / height scale. `screen` maps to the given viewport unit.
fn sizing_value(value: &str, screen: &str) -> Option<String> {
    match value {
        "auto" => Some("auto".to_string()),
        "screen" => Some(screen.to_string()),
        "svw" | "lvw" | "dvw" | "svh" | "lvh" | "dvh" => Some(format!("100{value}")),
        "min" => Some("min-content".to_string()),
        "max" => Some("max-content".to_string()),
        "fit" => Some("fit-content".to_string()),
        _ => fraction(value).or_else(|| spacing(value)),
    }
}

fn integer_in(value: &str, range: std::ops::RangeInclusive<u32>) -> Option<u32> {
    value.parse().ok().filter(|n| range.contains(n))
}

/// Plain integer (`2`) or arbitrary value, for width-like scales in `px`.
fn pixel_width(value: &str, allowed: &[&str]) -> Option<String> {
    if allowed.contains(&value) {
        return Some(format!("{value}px"));
    }
    arbitrary(value)
}

// ============================================================================
// Static keywords
// ============================================================================

fn keyword(base: &str) -> Option<Utility> {
    let (family, declarations): (Family, &[(&str, &str)]) = match base {
        "sr-only" => (
            SrOnly,
            &[
                ("position", "absolute"),
                ("width", "1px"),
                ("height", "1px"),
                ("padding", "0"),
                ("margin", "-1px"),
                ("overflow", "hidden"),
                ("clip", "rect(0, 0, 0, 0)"),
                ("white-space", "nowrap"),
                ("border-width", "0"),
            ],
        ),
        "not-sr-only" => (
            SrOnly,
            &[
                ("position", "static"),
                ("width", "auto"),
                ("height", "auto"),
                ("padding", "0"),
                ("margin", "0"),
                ("overflow", "visible"),
                ("clip", "auto"),
                ("white-space", "normal"),
            ],
        ),
        "pointer-events-none" => (PointerEvents, &[("pointer-events", "none")]),
        "pointer-events-auto" => (PointerEvents, &[("pointer-events", "auto")]),
        "visible" => (Visibility, &[("visibility", "visible")]),
        "invisible" => (Visibility, &[("visibility", "hidden")]),
        "collapse" => (Visibility, &[("visibility", "collapse")]),
        "static" => (Position, &[("position", "static")]),
        "fixed" => (Position, &[("position", "fixed")]),
        "absolute" => (Position, &[("position", "absolute")]),
        "relative" => (Position, &[("position", "relative")]),
        "sticky" => (Position, &[("position", "sticky")]),
        "isolate" => (Isolation, &[("isolation", "isolate")]),
        "isolation-auto" => (Isolation, &[("isolation", "auto")]),
        "float-left" => (Float, &[("float", "left")]),
        "float-right" => (Float, &[("float", "right")]),
        "float-none" => (Float, &[("float", "none")]),
        "box-border" => (BoxSizing, &[("box-sizing", "border-box")]),
        "box-content" => (BoxSizing, &[("box-sizing", "content-box")]),
        "line-clamp-none" => (
            LineClamp,
            &[
                ("overflow", "visible"),
                ("display", "block"),
                ("-webkit-box-orient", "horizontal"),
                ("-webkit-line-clamp", "none"),
            ],
        ),
        "block" => (Display, &[("display", "block")]),
        "inline-block" => (Display, &[("display", "inline-block")]),
        "inline" => (Display, &[("display", "inline")]),
        "flex" => (Display, &[("display", "flex")]),
        "inline-flex" => (Display, &[("display", "inline-flex")]),
        "table" => (Display, &[("display", "table")]),
        "inline-table" => (Display, &[("display", "inline-table")]),
        "table-cell" => (Display, &[("display", "table-cell")]),
        "table-row" => (Display, &[("display", "table-row")]),
        "grid" => (Display, &[("display", "grid")]),
        "inline-grid" => (Display, &[("display", "inline-grid")]),
        "contents" => (Display, &[("display", "contents")]),
        "list-item" => (Display, &[("display", "list-item")]),
        "flow-root" => (Display, &[("display", "flow-root")]),
        "hidden" => (Display, &[("display", "none")]),
        "aspect-auto" => (AspectRatio, &[("aspect-ratio", "auto")]),
        "aspect-square" => (AspectRatio, &[("aspect-ratio", "1 / 1")]),
        "aspect-video" => (AspectRatio, &[("aspect-ratio", "16 / 9")]),
        "flex-1" => (Flex, &[("flex", "1 1 0%")]),
        "flex-auto" => (Flex, &[("flex", "1 1 auto")]),
        "flex-initial" => (Flex, &[("flex", "0 1 auto")]),
        "flex-none" => (Flex, &[("flex", "none")]),
        "shrink" => (FlexShrink, &[("flex-shrink", "1")]),
        "shrink-0" => (FlexShrink, &[("flex-shrink", "0")]),
        "grow" => (FlexGrow, &[("flex-grow", "1")]),
        "grow-0" => (FlexGrow, &[("flex-grow", "0")]),
        "table-auto" => (TableLayout, &[("table-layout", "auto")]),
        "table-fixed" => (TableLayout, &[("table-layout", "fixed")]),
        "border-collapse" => (BorderCollapse, &[("border-collapse", "collapse")]),
        "border-separate" => (BorderCollapse, &[("border-collapse", "separate")]),
        "transform" => (Transform, &[("transform", TRANSFORM)]),
        "transform-none" => (Transform, &[("transform", "none")]),
        "select-none" => (UserSelect, &[("-webkit-user-select", "none"), ("user-select", "none")]),
        "select-text" => (UserSelect, &[("-webkit-user-select", "text"), ("user-select", "text")]),
        "select-all" => (UserSelect, &[("-webkit-user-select", "all"), ("user-select", "all")]),
        "select-auto" => (UserSelect, &[("-webkit-user-select", "auto"), ("user-select", "auto")]),
        "resize-none" => (Resize, &[("resize", "none")]),
        "resize" => (Resize, &[("resize", "both")]),
        "resize-x" => (Resize, &[("resize", "horizontal")]),
        "resize-y" => (Resize, &[("resize", "vertical")]),
        "list-inside" => (ListStyle, &[("list-style-position", "inside")]),
        "list-outside" => (ListStyle, &[("list-style-position", "outside")]),
        "list-none" => (ListStyle, &[("list-style-type", "none")]),
        "list-disc" => (ListStyle, &[("list-style-type", "disc")]),
        "list-decimal" => (ListStyle, &[("list-style-type", "decimal")]),
        "appearance-none" => (Appearance, &[("-webkit-appearance", "none"), ("appearance", "none")]),
        "appearance-auto" => (Appearance, &[("-webkit-appearance", "auto"), ("appearance", "auto")]),
        "flex-row" => (FlexDirection, &[("flex-direction", "row")]),
        "flex-row-reverse" => (FlexDirection, &[("flex-direction", "row-reverse")]),
        "flex-col" => (FlexDirection, &[("flex-direction", "column")]),
        "flex-col-reverse" => (FlexDirection, &[("flex-direction", "column-reverse")]),
        "flex-wrap" => (FlexWrap, &[("flex-wrap", "wrap")]),
        "flex-wrap-reverse" => (FlexWrap, &[("flex-wrap", "wrap-reverse")]),
        "flex-nowrap" => (FlexWrap, &[("flex-wrap", "nowrap")]),
        "place-items-start" => (PlaceItems, &[("place-items", "start")]),
        "place-items-end" => (PlaceItems, &[("place-items", "end")]),
        "place-items-center" => (PlaceItems, &[("place-items", "center")]),
        "place-items-stretch" => (PlaceItems, &[("place-items", "stretch")]),
        "place-content-center" => (PlaceItems, &[("place-content", "center")]),
        "content-center" => (AlignContent, &[("align-content", "center")]),
        "content-start" => (AlignContent, &[("align-content", "flex-start")]),
        "content-end" => (AlignContent, &[("align-content", "flex-end")]),
        "content-between" => (AlignContent, &[("align-content", "space-between")]),
        "content-around" => (AlignContent, &[("align-content", "space-around")]),
        "content-evenly" => (AlignContent, &[("align-content", "space-evenly")]),
        "content-stretch" => (AlignContent, &[("align-content", "stretch")]),
        "items-start" => (AlignItems, &[("align-items", "flex-start")]),
        "items-end" => (AlignItems, &[("align-items", "flex-end")]),
        "items-center" => (AlignItems, &[("align-items", "center")]),
        "items-baseline" => (AlignItems, &[("align-items", "baseline")]),
        "items-stretch" => (AlignItems, &[("align-items", "stretch")]),
        "justify-normal" => (JustifyContent, &[("justify-content", "normal")]),
        "justify-start" => (JustifyContent, &[("justify-content", "flex-start")]),
        "justify-end" => (JustifyContent, &[("justify-content", "flex-end")]),
        "justify-center" => (JustifyContent, &[("justify-content", "center")]),
        "justify-between" => (JustifyContent, &[("justify-content", "space-between")]),
        "justify-around" => (JustifyContent, &[("justify-content", "space-around")]),
        "justify-evenly" => (JustifyContent, &[("justify-content", "space-evenly")]),
        "justify-stretch" => (JustifyContent, &[("justify-content", "stretch")]),
        "justify-items-start" => (JustifyContent, &[("justify-items", "start")]),
        "justify-items-end" => (JustifyContent, &[("justify-items", "end")]),
        "justify-items-center" => (JustifyContent, &[("justify-items", "center")]),
        "justify-items-stretch" => (JustifyContent, &[("justify-items", "stretch")]),
        "self-auto" => (AlignSelf, &[("align-self", "auto")]),
        "self-start" => (AlignSelf, &[("align-self", "flex-start")]),
        "self-end" => (AlignSelf, &[("align-self", "flex-end")]),
        "self-center" => (AlignSelf, &[("align-self", "center")]),
        "self-stretch" => (AlignSelf, &[("align-self", "stretch")]),
        "self-baseline" => (AlignSelf, &[("align-self", "baseline")]),
        "overflow-auto" => (Overflow, &[("overflow", "auto")]),
        "overflow-hidden" => (Overflow, &[("overflow", "hidden")]),
        "overflow-clip" => (Overflow, &[("overflow", "clip")]),
        "overflow-visible" => (Overflow, &[("overflow", "visible")]),
        "overflow-scroll" => (Overflow, &[("overflow", "scroll")]),
        "overflow-x-auto" => (Overflow, &[("overflow-x", "auto")]),
        "overflow-y-auto" => (Overflow, &[("overflow-y", "auto")]),
        "overflow-x-hidden" => (Overflow, &[("overflow-x", "hidden")]),
        "overflow-y-hidden" => (Overflow, &[("overflow-y", "hidden")]),
        "overflow-x-scroll" => (Overflow, &[("overflow-x", "scroll")]),
        "overflow-y-scroll" => (Overflow, &[("overflow-y", "scroll")]),
        "truncate" => (
            TextOverflow,
            &[
                ("overflow", "hidden"),
                ("text-overflow", "ellipsis"),
                ("white-space", "nowrap"),
            ],
        ),
        "text-ellipsis" => (TextOverflow, &[("text-overflow", "ellipsis")]),
        "text-clip" => (TextOverflow, &[("text-overflow", "clip")]),
        "whitespace-normal" => (Whitespace, &[("white-space", "normal")]),
        "whitespace-nowrap" => (Whitespace, &[("white-space", "nowrap")]),
        "whitespace-pre" => (Whitespace, &[("white-space", "pre")]),
        "whitespace-pre-line" => (Whitespace, &[("white-space", "pre-line")]),
        "whitespace-pre-wrap" => (Whitespace, &[("white-space", "pre-wrap")]),
        "whitespace-break-spaces" => (Whitespace, &[("white-space", "break-spaces")]),
        "break-normal" => (
            WordBreak,
            &[("overflow-wrap", "normal"), ("word-break", "normal")],
        ),
        "break-words" => (WordBreak, &[("overflow-wrap", "break-word")]),
        "break-all" => (WordBreak, &[("word-break", "break-all")]),
        "break-keep" => (WordBreak, &[("word-break", "keep-all")]),
        "border-solid" => (BorderStyle, &[("border-style", "solid")]),
        "border-dashed" => (BorderStyle, &[("border-style", "dashed")]),
        "border-dotted" => (BorderStyle, &[("border-style", "dotted")]),
        "border-double" => (BorderStyle, &[("border-style", "double")]),
        "border-hidden" => (BorderStyle, &[("border-style", "hidden")]),
        "border-none" => (BorderStyle, &[("border-style", "none")]),
        "bg-none" => (BackgroundImage, &[("background-image", "none")]),
        "bg-auto" => (BackgroundSize, &[("background-size", "auto")]),
        "bg-cover" => (BackgroundSize, &[("background-size", "cover")]),
        "bg-contain" => (BackgroundSize, &[("background-size", "contain")]),
        "bg-center" => (BackgroundPosition, &[("background-position", "center")]),
        "bg-top" => (BackgroundPosition, &[("background-position", "top")]),
        "bg-bottom" => (BackgroundPosition, &[("background-position", "bottom")]),
        "bg-repeat" => (BackgroundRepeat, &[("background-repeat", "repeat")]),
        "bg-no-repeat" => (BackgroundRepeat, &[("background-repeat", "no-repeat")]),
        "object-contain" => (ObjectFit, &[("object-fit", "contain")]),
        "object-cover" => (ObjectFit, &[("object-fit", "cover")]),
        "object-fill" => (ObjectFit, &[("object-fit", "fill")]),
        "object-none" => (ObjectFit, &[("object-fit", "none")]),
        "object-scale-down" => (ObjectFit, &[("object-fit", "scale-down")]),
        "object-center" => (ObjectFit, &[("object-position", "center")]),
        "text-left" => (TextAlign, &[("text-align", "left")]),
        "text-center" => (TextAlign, &[("text-align", "center")]),
        "text-right" => (TextAlign, &[("text-align", "right")]),
        "text-justify" => (TextAlign, &[("text-align", "justify")]),
        "text-start" => (TextAlign, &[("text-align", "start")]),
        "text-end" => (TextAlign, &[("text-align", "end")]),
        "align-baseline" => (VerticalAlign, &[("vertical-align", "baseline")]),
        "align-top" => (VerticalAlign, &[("vertical-align", "top")]),
        "align-middle" => (VerticalAlign, &[("vertical-align", "middle")]),
        "align-bottom" => (VerticalAlign, &[("vertical-align", "bottom")]),
        "align-text-top" => (VerticalAlign, &[("vertical-align", "text-top")]),
        "align-text-bottom" => (VerticalAlign, &[("vertical-align", "text-bottom")]),
        "uppercase" => (TextTransform, &[("text-transform", "uppercase")]),
        "lowercase" => (TextTransform, &[("text-transform", "lowercase")]),
        "capitalize" => (TextTransform, &[("text-transform", "capitalize")]),
        "normal-case" => (TextTransform, &[("text-transform", "none")]),
        "italic" => (FontStyle, &[("font-style", "italic")]),
        "not-italic" => (FontStyle, &[("font-style", "normal")]),
        "underline" => (TextDecoration, &[("text-decoration-line", "underline")]),
        "overline" => (TextDecoration, &[("text-decoration-line", "overline")]),
        "line-through" => (TextDecoration, &[("text-decoration-line", "line-through")]),
        "no-underline" => (TextDecoration, &[("text-decoration-line", "none")]),
        "antialiased" => (
            FontSmoothing,
            &[
                ("-webkit-font-smoothing", "antialiased"),
                ("-moz-osx-font-smoothing", "grayscale"),
            ],
        ),
        "subpixel-antialiased" => (
            FontSmoothing,
            &[
                ("-webkit-font-smoothing", "auto"),
                ("-moz-osx-font-smoothing", "auto"),
            ],
        ),
        "outline-none" => (
            OutlineStyle,
            &[("outline", "2px solid transparent"), ("outline-offset", "2px")],
        ),
        "outline" => (OutlineStyle, &[("outline-style", "solid")]),
        "outline-dashed" => (OutlineStyle, &[("outline-style", "dashed")]),
        "outline-dotted" => (OutlineStyle, &[("outline-style", "dotted")]),
        "outline-double" => (OutlineStyle, &[("outline-style", "double")]),
        "ring-inset" => (RingWidth, &[("--tw-ring-inset", "inset")]),
        "will-change-auto" => (WillChange, &[("will-change", "auto")]),
        "will-change-scroll" => (WillChange, &[("will-change", "scroll-position")]),
        "will-change-contents" => (WillChange, &[("will-change", "contents")]),
        "will-change-transform" => (WillChange, &[("will-change", "transform")]),
        "animate-in" => (
            Enter,
            &[
                ("animation-name", "enter"),
                ("animation-duration", "150ms"),
                ("--tw-enter-opacity", "initial"),
                ("--tw-enter-scale", "initial"),
                ("--tw-enter-rotate", "initial"),
                ("--tw-enter-translate-x", "initial"),
                ("--tw-enter-translate-y", "initial"),
            ],
        ),
        "animate-out" => (
            Exit,
            &[
                ("animation-name", "exit"),
                ("animation-duration", "150ms"),
                ("--tw-exit-opacity", "initial"),
                ("--tw-exit-scale", "initial"),
                ("--tw-exit-rotate", "initial"),
                ("--tw-exit-translate-x", "initial"),
                ("--tw-exit-translate-y", "initial"),
            ],
        ),
        _ => return None,
    };

    let mut utility = Utility::new(
        family,
        declarations
            .iter()
            .map(|(p, v)| Declaration::new(*p, *v))
            .collect(),
    );
    utility.keyframes = match base {
        "animate-in" => defaults::KEYFRAMES.iter().find(|k| k.name == "enter"),
        "animate-out" => defaults::KEYFRAMES.iter().find(|k| k.name == "exit"),
        _ => None,
    };
    Some(utility)
}

// ============================================================================
// Functional utilities
// ============================================================================

const PADDING: &[(&str, &[&str])] = &[
    ("px-", &["padding-left", "padding-right"]),
    ("py-", &["padding-top", "padding-bottom"]),
    ("pt-", &["padding-top"]),
    ("pr-", &["padding-right"]),
    ("pb-", &["padding-bottom"]),
    ("pl-", &["padding-left"]),
    ("ps-", &["padding-inline-start"]),
    ("pe-", &["padding-inline-end"]),
    ("p-", &["padding"]),
];

const MARGIN: &[(&str, &[&str])] = &[
    ("mx-", &["margin-left", "margin-right"]),
    ("my-", &["margin-top", "margin-bottom"]),
    ("mt-", &["margin-top"]),
    ("mr-", &["margin-right"]),
    ("mb-", &["margin-bottom"]),
    ("ml-", &["margin-left"]),
    ("ms-", &["margin-inline-start"]),
    ("me-", &["margin-inline-end"]),
    ("m-", &["margin"]),
];

const INSET: &[(&str, &[&str])] = &[
    ("inset-x-", &["left", "right"]),
    ("inset-y-", &["top", "bottom"]),
    ("inset-", &["inset"]),
    ("top-", &["top"]),
    ("right-", &["right"]),
    ("bottom-", &["bottom"]),
    ("left-", &["left"]),
    ("start-", &["inset-inline-start"]),
    ("end-", &["inset-inline-end"]),
];

const RADIUS: &[(&str, &[&str])] = &[
    ("rounded-tl", &["border-top-left-radius"]),
    ("rounded-tr", &["border-top-right-radius"]),
    ("rounded-br", &["border-bottom-right-radius"]),
    ("rounded-bl", &["border-bottom-left-radius"]),
    ("rounded-t", &["border-top-left-radius", "border-top-right-radius"]),
    ("rounded-r", &["border-top-right-radius", "border-bottom-right-radius"]),
    ("rounded-b", &["border-bottom-right-radius", "border-bottom-left-radius"]),
    ("rounded-l", &["border-top-left-radius", "border-bottom-left-radius"]),
    ("rounded", &["border-radius"]),
];

const BORDER_SIDES: &[(&str, &[&str])] = &[
    ("x", &["border-left-width", "border-right-width"]),
    ("y", &["border-top-width", "border-bottom-width"]),
    ("t", &["border-top-width"]),
    ("r", &["border-right-width"]),
    ("b", &["border-bottom-width"]),
    ("l", &["border-left-width"]),
    ("s", &["border-inline-start-width"]),
    ("e", &["border-inline-end-width"]),
];

fn prefixed<'a>(
    base: &'a str,
    table: &'static [(&'static str, &'static [&'static str])],
) -> Option<(&'a str, &'static [&'static str])> {
    table
        .iter()
        .find_map(|(prefix, props)| base.strip_prefix(prefix).map(|rest| (rest, *props)))
}

fn functional(base: &str, negative: bool, tokens: &DesignTokens) -> Option<Utility> {
    if let Some((value, props)) = prefixed(base, PADDING) {
        if negative {
            return None;
        }
        return spacing(value).map(|v| Utility::each(Padding, props, &v));
    }
    if let Some((value, props)) = prefixed(base, MARGIN) {
        let v = match value {
            "auto" if !negative => "auto".to_string(),
            _ => signed(spacing(value)?, negative),
        };
        return Some(Utility::each(Margin, props, &v));
    }
    if let Some((value, props)) = prefixed(base, INSET) {
        let v = signed(inset_value(value)?, negative && value != "auto");
        return Some(Utility::each(Inset, props, &v));
    }
    if let Some(value) = base.strip_prefix("z-") {
        let v = if defaults::Z_INDEX.contains(&value) {
            value.to_string()
        } else {
            arbitrary(value)?
        };
        return Some(Utility::single(ZIndex, "z-index", signed(v, negative && value != "auto")));
    }
    if let Some(value) = base.strip_prefix("order-") {
        let v = match value {
            "first" => "-9999".to_string(),
            "last" => "9999".to_string(),
            "none" => "0".to_string(),
            _ => integer_in(value, 1..=12)
                .map(|n| n.to_string())
                .or_else(|| arbitrary(value))?,
        };
        return Some(Utility::single(Order, "order", signed(v, negative)));
    }
    if negative {
        return negative_only(base);
    }
    positive(base, tokens)
}

/// Families that accept a leading `-` beyond spacing and inset.
fn negative_only(base: &str) -> Option<Utility> {
    if let Some(utility) = translate(base, true) {
        return Some(utility);
    }
    if let Some(value) = base.strip_prefix("rotate-") {
        return rotate(value, true);
    }
    if let Some(value) = base.strip_prefix("space-x-") {
        return Some(space_x(&negate(&spacing(value)?)));
    }
    if let Some(value) = base.strip_prefix("space-y-") {
        return Some(space_y(&negate(&spacing(value)?)));
    }
    if let Some(value) = base.strip_prefix("tracking-") {
        let v = find(defaults::LETTER_SPACING, value)
            .map(str::to_string)
            .or_else(|| arbitrary(value))?;
        return Some(Utility::single(LetterSpacing, "letter-spacing", negate(&v)));
    }
    None
}

fn positive(base: &str, tokens: &DesignTokens) -> Option<Utility> {
    // Sizing
    if let Some(value) = base.strip_prefix("size-") {
        let v = sizing_value(value, "100vw")?;
        return Some(Utility::each(Size, &["width", "height"], &v));
    }
    if let Some(value) = base.strip_prefix("min-w-") {
        let v = sizing_value(value, "100vw")?;
        return Some(Utility::single(MinWidth, "min-width", v));
    }
    if let Some(value) = base.strip_prefix("min-h-") {
        let v = sizing_value(value, "100vh")?;
        return Some(Utility::single(MinHeight, "min-height", v));
    }
    if let Some(value) = base.strip_prefix("max-w-") {
        let v = max_width(value)?;
        return Some(Utility::single(MaxWidth, "max-width", v));
    }
    if let Some(value) = base.strip_prefix("max-h-") {
        let v = match value {
            "none" => "none".to_string(),
            _ => sizing_value(value, "100vh")?,
        };
        return Some(Utility::single(MaxHeight, "max-height", v));
    }
    if let Some(value) = base.strip_prefix("w-") {
        return Some(Utility::single(Width, "width", sizing_value(value, "100vw")?));
    }
    if let Some(value) = base.strip_prefix("h-") {
        return Some(Utility::single(Height, "height", sizing_value(value, "100vh")?));
    }
    if let Some(value) = base.strip_prefix("basis-") {
        return Some(Utility::single(FlexBasis, "flex-basis", inset_value(value)?));
    }
    if let Some(value) = base.strip_prefix("flex-") {
        return Some(Utility::single(Flex, "flex", arbitrary(value)?));
    }
    if let Some(value) = base.strip_prefix("shrink-") {
        return Some(Utility::single(FlexShrink, "flex-shrink", arbitrary(value)?));
    }
    if let Some(value) = base.strip_prefix("grow-") {
        return Some(Utility::single(FlexGrow, "flex-grow", arbitrary(value)?));
    }
    if let Some(value) = base.strip_prefix("aspect-") {
        return Some(Utility::single(AspectRatio, "aspect-ratio", arbitrary(value)?));
    }
    if let Some(value) = base.strip_prefix("line-clamp-") {
        let n = integer_in(value, 1..=6)
            .map(|n| n.to_string())
            .or_else(|| arbitrary(value))?;
        return Some(Utility::new(
            LineClamp,
            vec![
                Declaration::new("overflow", "hidden"),
                Declaration::new("display", "-webkit-box"),
                Declaration::new("-webkit-box-orient", "vertical"),
                Declaration::new("-webkit-line-clamp", n),
            ],
        ));
    }

    // Grid
    if let Some(value) = base.strip_prefix("grid-cols-") {
        let v = grid_template(value)?;
        return Some(Utility::single(GridTemplateColumns, "grid-template-columns", v));
    }
    if let Some(value) = base.strip_prefix("grid-rows-") {
        let v = grid_template(value)?;
        return Some(Utility::single(GridTemplateRows, "grid-template-rows", v));
    }
    if let Some(value) = base.strip_prefix("col-") {
        return grid_placement(GridColumn, "grid-column", value);
    }
    if let Some(value) = base.strip_prefix("row-") {
        return grid_placement(GridRow, "grid-row", value);
    }

    // Transforms
    if let Some(utility) = translate(base, false) {
        return Some(utility);
    }
    if let Some(value) = base.strip_prefix("rotate-") {
        return rotate(value, false);
    }
    if let Some(utility) = scale(base) {
        return Some(utility);
    }

    // Spacing between children
    if let Some(value) = base.strip_prefix("gap-x-") {
        return Some(Utility::single(Gap, "column-gap", spacing(value)?));
    }
    if let Some(value) = base.strip_prefix("gap-y-") {
        return Some(Utility::single(Gap, "row-gap", spacing(value)?));
    }
    if let Some(value) = base.strip_prefix("gap-") {
        return Some(Utility::single(Gap, "gap", spacing(value)?));
    }
    if let Some(value) = base.strip_prefix("space-x-") {
        return Some(match value {
            "reverse" => Utility::single(Space, "--tw-space-x-reverse", "1").with_tail(SPACE_TAIL),
            _ => space_x(&spacing(value)?),
        });
    }
    if let Some(value) = base.strip_prefix("space-y-") {
        return Some(match value {
            "reverse" => Utility::single(Space, "--tw-space-y-reverse", "1").with_tail(SPACE_TAIL),
            _ => space_y(&spacing(value)?),
        });
    }

    // Interactivity
    if let Some(value) = base.strip_prefix("cursor-") {
        let v = if defaults::CURSORS.contains(&value) {
            value.to_string()
        } else {
            arbitrary(value)?
        };
        return Some(Utility::single(Cursor, "cursor", v));
    }

    // Animation
    if let Some(value) = base.strip_prefix("animate-") {
        return animation(value, tokens);
    }
    if let Some(utility) = enter_exit(base) {
        return Some(utility);
    }

    // Borders
    if let Some((value, props)) = RADIUS.iter().find_map(|(prefix, props)| {
        base.strip_prefix(prefix)
            .filter(|rest| rest.is_empty() || rest.starts_with('-'))
            .map(|rest| (rest, *props))
    }) {
        let key = match value {
            "" => "DEFAULT",
            _ => value.strip_prefix('-')?,
        };
        let v = tokens
            .border_radius(key)
            .map(str::to_string)
            .or_else(|| arbitrary(key))?;
        return Some(Utility::each(BorderRadius, props, &v));
    }
    if base == "border" || base.starts_with("border-") {
        return border(base, tokens);
    }

    // Backgrounds
    if let Some(value) = base.strip_prefix("bg-") {
        if let Some(url) = arbitrary(value).filter(|v| v.starts_with("url(")) {
            return Some(Utility::single(BackgroundImage, "background-image", url));
        }
        return colored(BackgroundColor, "background-color", Some("--tw-bg-opacity"), value, tokens);
    }
    if let Some(value) = base.strip_prefix("fill-") {
        return colored(Fill, "fill", None, value, tokens);
    }
    if let Some(value) = base.strip_prefix("stroke-") {
        if ["0", "1", "2"].contains(&value) {
            return Some(Utility::single(StrokeWidth, "stroke-width", value));
        }
        if let Some(utility) = colored(Stroke, "stroke", None, value, tokens) {
            return Some(utility);
        }
        return Some(Utility::single(StrokeWidth, "stroke-width", arbitrary(value)?));
    }

    // Padding handled earlier; typography
    if let Some(value) = base.strip_prefix("font-") {
        if let Some(weight) = find(defaults::FONT_WEIGHT, value) {
            return Some(Utility::single(FontWeight, "font-weight", weight));
        }
        if let Some(stack) = tokens.font_family(value) {
            return Some(Utility::single(FontFamily, "font-family", stack));
        }
        let v = arbitrary(value)?;
        return Some(if v.chars().all(|c| c.is_ascii_digit()) {
            Utility::single(FontWeight, "font-weight", v)
        } else {
            Utility::single(FontFamily, "font-family", v)
        });
    }
    if let Some(value) = base.strip_prefix("text-") {
        return text(value, tokens);
    }
    if let Some(value) = base.strip_prefix("leading-") {
        let v = find(defaults::LINE_HEIGHT, value)
            .map(str::to_string)
            .or_else(|| arbitrary(value))?;
        return Some(Utility::single(LineHeight, "line-height", v));
    }
    if let Some(value) = base.strip_prefix("tracking-") {
        let v = find(defaults::LETTER_SPACING, value)
            .map(str::to_string)
            .or_else(|| arbitrary(value))?;
        return Some(Utility::single(LetterSpacing, "letter-spacing", v));
    }
    if let Some(value) = base.strip_prefix("underline-offset-") {
        let v = match value {
            "auto" => "auto".to_string(),
            _ => pixel_width(value, &["0", "1", "2", "4", "8"])?,
        };
        return Some(Utility::single(UnderlineOffset, "text-underline-offset", v));
    }
    if let Some(value) = base.strip_prefix("decoration-") {
        let thickness = match value {
            "auto" | "from-font" => Some(value.to_string()),
            _ => pixel_width(value, &["0", "1", "2", "4", "8"])
                .filter(|v| !color::is_color_like(v)),
        };
        if let Some(v) = thickness {
            return Some(Utility::single(DecorationThickness, "text-decoration-thickness", v));
        }
        return colored(DecorationColor, "text-decoration-color", None, value, tokens);
    }

    // Effects
    if let Some(value) = base.strip_prefix("opacity-") {
        let v = if defaults::OPACITY_STEPS.contains(&value) {
            color::parse_alpha(value)?
        } else {
            arbitrary(value)?
        };
        return Some(Utility::single(Opacity, "opacity", v));
    }
    if base == "shadow" || base.starts_with("shadow-") {
        return shadow(base, tokens);
    }

    // Outline and ring
    if let Some(value) = base.strip_prefix("outline-offset-") {
        let v = pixel_width(value, &["0", "1", "2", "4", "8"])?;
        return Some(Utility::single(OutlineOffset, "outline-offset", v));
    }
    if let Some(value) = base.strip_prefix("outline-") {
        if let Some(width) = pixel_width(value, &["0", "1", "2", "4", "8"]).filter(|v| !color::is_color_like(v)) {
            return Some(Utility::single(OutlineWidth, "outline-width", width));
        }
        return colored(OutlineColor, "outline-color", None, value, tokens);
    }
    if base == "ring" || base.starts_with("ring-") {
        return ring(base, tokens);
    }

    // Transitions
    if base == "transition" || base.starts_with("transition-") {
        let key = base.strip_prefix("transition-").unwrap_or("DEFAULT");
        let property = find(defaults::TRANSITION_PROPERTY, key)
            .map(str::to_string)
            .or_else(|| arbitrary(key))?;
        let mut declarations = vec![Declaration::new("transition-property", property)];
        if key != "none" {
            declarations.push(Declaration::new(
                "transition-timing-function",
                defaults::DEFAULT_TIMING_FUNCTION,
            ));
            declarations.push(Declaration::new("transition-duration", "150ms"));
        }
        return Some(Utility::new(Transition, declarations));
    }
    if let Some(value) = base.strip_prefix("duration-") {
        let v = milliseconds(value)?;
        return Some(Utility::new(
            Duration,
            vec![
                Declaration::new("transition-duration", v.clone()),
                Declaration::new("animation-duration", v),
            ],
        ));
    }
    if let Some(value) = base.strip_prefix("delay-") {
        let v = milliseconds(value)?;
        return Some(Utility::new(
            Delay,
            vec![
                Declaration::new("transition-delay", v.clone()),
                Declaration::new("animation-delay", v),
            ],
        ));
    }
    if let Some(value) = base.strip_prefix("ease-") {
        let v = find(defaults::TIMING_FUNCTION, value)
            .map(str::to_string)
            .or_else(|| arbitrary(value))?;
        return Some(Utility::new(
            Ease,
            vec![
                Declaration::new("transition-timing-function", v.clone()),
                Declaration::new("animation-timing-function", v),
            ],
        ));
    }
    if let Some(value) = base.strip_prefix("will-change-") {
        return Some(Utility::single(WillChange, "will-change", arbitrary(value)?));
    }
    None
}

/// `[mask-type:luminance]` → `mask-type: luminance`
fn arbitrary_property(base: &str) -> Option<Utility> {
    let inner = base.strip_prefix('[')?.strip_suffix(']')?;
    let (property, value) = inner.split_once(':')?;
    let valid_property = !property.is_empty()
        && property
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b == b'-');
    if !valid_property || value.is_empty() {
        return None;
    }
    let value = arbitrary(&format!("[{value}]"))?;
    Some(Utility::single(ArbitraryProperty, property, value))
}

fn max_width(value: &str) -> Option<String> {
    if let Some(v) = find(defaults::MAX_WIDTH, value) {
        return Some(v.to_string());
    }
    if let Some(screen) = value.strip_prefix("screen-") {
        return find(defaults::SCREENS, screen).map(str::to_string);
    }
    match value {
        "full" => Some("100%".to_string()),
        "min" => Some("min-content".to_string()),
        "max" => Some("max-content".to_string()),
        "fit" => Some("fit-content".to_string()),
        _ => spacing(value),
    }
}

fn grid_template(value: &str) -> Option<String> {
    match value {
        "none" => Some("none".to_string()),
        "subgrid" => Some("subgrid".to_string()),
        _ => integer_in(value, 1..=12)
            .map(|n| format!("repeat({n}, minmax(0, 1fr))"))
            .or_else(|| arbitrary(value)),
    }
}

fn grid_placement(family: Family, property: &str, value: &str) -> Option<Utility> {
    if value == "auto" {
        return Some(Utility::single(family, property, "auto"));
    }
    if let Some(span) = value.strip_prefix("span-") {
        let v = match span {
            "full" => "1 / -1".to_string(),
            _ => integer_in(span, 1..=12).map(|n| format!("span {n} / span {n}"))?,
        };
        return Some(Utility::single(family, property, v));
    }
    for (suffix, side) in [("start-", "start"), ("end-", "end")] {
        if let Some(line) = value.strip_prefix(suffix) {
            let v = match line {
                "auto" => "auto".to_string(),
                _ => integer_in(line, 1..=13)
                    .map(|n| n.to_string())
                    .or_else(|| arbitrary(line))?,
            };
            return Some(Utility::single(family, &format!("{property}-{side}"), v));
        }
    }
    Some(Utility::single(family, property, arbitrary(value)?))
}

fn translate(base: &str, negative: bool) -> Option<Utility> {
    let (axis, value) = if let Some(v) = base.strip_prefix("translate-x-") {
        ("x", v)
    } else {
        ("y", base.strip_prefix("translate-y-")?)
    };
    let v = signed(fraction(value).or_else(|| spacing(value))?, negative);
    Some(Utility::new(
        Translate,
        vec![
            Declaration::new(format!("--tw-translate-{axis}"), v),
            Declaration::new("transform", TRANSFORM),
        ],
    ))
}

fn rotate(value: &str, negative: bool) -> Option<Utility> {
    const DEGREES: &[&str] = &["0", "1", "2", "3", "6", "12", "45", "90", "180"];
    let v = if DEGREES.contains(&value) {
        format!("{value}deg")
    } else {
        arbitrary(value)?
    };
    Some(Utility::new(
        Rotate,
        vec![
            Declaration::new("--tw-rotate", signed(v, negative)),
            Declaration::new("transform", TRANSFORM),
        ],
    ))
}

fn scale(base: &str) -> Option<Utility> {
    const STEPS: &[&str] = &["0", "50", "75", "90", "95", "100", "105", "110", "125", "150"];
    let (axes, value): (&[&str], &str) = if let Some(v) = base.strip_prefix("scale-x-") {
        (&["x"], v)
    } else if let Some(v) = base.strip_prefix("scale-y-") {
        (&["y"], v)
    } else {
        (&["x", "y"], base.strip_prefix("scale-")?)
    };
    let v = if STEPS.contains(&value) {
        color::parse_alpha(value)?
    } else {
        arbitrary(value)?
    };
    let mut declarations: Vec<Declaration> = axes
        .iter()
        .map(|axis| Declaration::new(format!("--tw-scale-{axis}"), v.clone()))
        .collect();
    declarations.push(Declaration::new("transform", TRANSFORM));
    Some(Utility::new(Scale, declarations))
}

fn space_x(value: &str) -> Utility {
    Utility::new(
        Space,
        vec![
            Declaration::new("--tw-space-x-reverse", "0"),
            Declaration::new(
                "margin-right",
                format!("calc({value} * var(--tw-space-x-reverse))"),
            ),
            Declaration::new(
                "margin-left",
                format!("calc({value} * calc(1 - var(--tw-space-x-reverse)))"),
            ),
        ],
    )
    .with_tail(SPACE_TAIL)
}

fn space_y(value: &str) -> Utility {
    Utility::new(
        Space,
        vec![
            Declaration::new("--tw-space-y-reverse", "0"),
            Declaration::new(
                "margin-top",
                format!("calc({value} * calc(1 - var(--tw-space-y-reverse)))"),
            ),
            Declaration::new(
                "margin-bottom",
                format!("calc({value} * var(--tw-space-y-reverse))"),
            ),
        ],
    )
    .with_tail(SPACE_TAIL)
}

fn animation(value: &str, tokens: &DesignTokens) -> Option<Utility> {
    if let Some(binding) = tokens.animation(value) {
        let mut utility = Utility::single(Family::Animation, "animation", binding.value);
        utility.keyframes = binding.keyframes.and_then(|name| tokens.keyframes(name));
        return Some(utility);
    }
    Some(Utility::single(Family::Animation, "animation", arbitrary(value)?))
}

/// `fade-in`, `zoom-out-95`, `slide-in-from-top-2`, `spin-in-90`, ...
fn enter_exit(base: &str) -> Option<Utility> {
    let (stage, rest) = if let Some(rest) = base.strip_prefix("fade-in") {
        ("enter", ("opacity", rest))
    } else if let Some(rest) = base.strip_prefix("fade-out") {
        ("exit", ("opacity", rest))
    } else if let Some(rest) = base.strip_prefix("zoom-in") {
        ("enter", ("scale", rest))
    } else if let Some(rest) = base.strip_prefix("zoom-out") {
        ("exit", ("scale", rest))
    } else if let Some(rest) = base.strip_prefix("spin-in") {
        ("enter", ("rotate", rest))
    } else if let Some(rest) = base.strip_prefix("spin-out") {
        ("exit", ("rotate", rest))
    } else if let Some(rest) = base.strip_prefix("slide-in-from-") {
        ("enter", ("slide", rest))
    } else if let Some(rest) = base.strip_prefix("slide-out-to-") {
        ("exit", ("slide", rest))
    } else {
        return None;
    };

    let (kind, rest) = rest;
    let amount = match rest {
        "" => None,
        _ if kind == "slide" => Some(rest),
        _ => Some(rest.strip_prefix('-')?),
    };

    let declaration = match kind {
        "opacity" => {
            let v = match amount {
                None => "0".to_string(),
                Some(a) => color::parse_alpha(a).or_else(|| arbitrary(a))?,
            };
            Declaration::new(format!("--tw-{stage}-opacity"), v)
        }
        "scale" => {
            let v = match amount {
                None => "0".to_string(),
                Some(a) => color::parse_alpha(a).or_else(|| arbitrary(a))?,
            };
            Declaration::new(format!("--tw-{stage}-scale"), v)
        }
        "rotate" => {
            let v = match amount {
                None => "30deg".to_string(),
                Some(a) => a
                    .parse::<u32>()
                    .ok()
                    .map(|deg| format!("{deg}deg"))
                    .or_else(|| arbitrary(a))?,
            };
            Declaration::new(format!("--tw-{stage}-rotate"), v)
        }
        _ => {
            let (side, length) = match amount?.split_once('-') {
                Some((side, length)) => (side, Some(length)),
                None => (amount?, None),
            };
            let v = match length {
                None => "100%".to_string(),
                Some(l) => fraction(l).or_else(|| spacing(l))?,
            };
            let (axis, towards_start) = match side {
                "top" => ("y", true),
                "bottom" => ("y", false),
                "left" => ("x", true),
                "right" => ("x", false),
                _ => return None,
            };
            let v = if towards_start { negate(&v) } else { v };
            Declaration::new(format!("--tw-{stage}-translate-{axis}"), v)
        }
    };
    Some(Utility::new(EnterExitValue, vec![declaration]))
}

fn border(base: &str, tokens: &DesignTokens) -> Option<Utility> {
    const WIDTHS: &[&str] = &["0", "2", "4", "8"];
    if base == "border" {
        return Some(Utility::single(BorderWidth, "border-width", "1px"));
    }
    let rest = base.strip_prefix("border-")?;
    if let Some(width) = pixel_width(rest, WIDTHS).filter(|v| !color::is_color_like(v)) {
        return Some(Utility::single(BorderWidth, "border-width", width));
    }
    for (side, props) in BORDER_SIDES {
        if rest == *side {
            return Some(Utility::each(BorderWidth, props, "1px"));
        }
        if let Some(width) = rest.strip_prefix(side).and_then(|r| r.strip_prefix('-'))
            && let Some(v) = pixel_width(width, WIDTHS).filter(|v| !color::is_color_like(v))
        {
            return Some(Utility::each(BorderWidth, props, &v));
        }
    }
    colored(BorderColor, "border-color", Some("--tw-border-opacity"), rest, tokens)
}

fn text(value: &str, tokens: &DesignTokens) -> Option<Utility> {
    let (name, modifier) = split_modifier(value);
    if let Some((_, size, line_height)) = defaults::FONT_SIZE.iter().find(|(n, ..)| *n == name) {
        let line_height = match modifier {
            None => line_height.to_string(),
            Some(m) => find(defaults::LINE_HEIGHT, m)
                .map(str::to_string)
                .or_else(|| arbitrary(m))
                .or_else(|| spacing(m))?,
        };
        return Some(Utility::new(
            FontSize,
            vec![
                Declaration::new("font-size", *size),
                Declaration::new("line-height", line_height),
            ],
        ));
    }
    if is_arbitrary(name)
        && let Some(v) = arbitrary(name)
        && !color::is_color_like(&v)
    {
        return Some(Utility::single(FontSize, "font-size", v));
    }
    colored(TextColor, "color", Some("--tw-text-opacity"), value, tokens)
}

fn shadow(base: &str, tokens: &DesignTokens) -> Option<Utility> {
    let key = base.strip_prefix("shadow-").unwrap_or("DEFAULT");
    if let Some(value) = find(defaults::BOX_SHADOW, key) {
        return Some(Utility::new(
            BoxShadow,
            vec![
                Declaration::new("--tw-shadow", value),
                Declaration::new("--tw-shadow-colored", colored_shadow(value)),
                Declaration::new(
                    "box-shadow",
                    "var(--tw-ring-offset-shadow, 0 0 #0000), var(--tw-ring-shadow, 0 0 #0000), var(--tw-shadow)",
                ),
            ],
        ));
    }
    let (name, modifier) = split_modifier(key);
    let raw = tokens.color(name).map(str::to_string).or_else(|| arbitrary(name))?;
    let mut declarations = color::declarations("--tw-shadow-color", &raw, modifier, None)?;
    declarations.push(Declaration::new("--tw-shadow", "var(--tw-shadow-colored)"));
    Some(Utility::new(ShadowColor, declarations))
}

/// Replace each layer's `rgb(...)` color with `var(--tw-shadow-color)`.
fn colored_shadow(shadow: &str) -> String {
    let mut out = String::with_capacity(shadow.len());
    let mut rest = shadow;
    while let Some(start) = rest.find("rgb(") {
        out.push_str(&rest[..start]);
        out.push_str("var(--tw-shadow-color)");
        rest = match rest[start..].find(')') {
            Some(end) => &rest[start + end + 1..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

fn ring(base: &str, tokens: &DesignTokens) -> Option<Utility> {
    const WIDTHS: &[&str] = &["0", "1", "2", "4", "8"];
    if let Some(value) = base.strip_prefix("ring-offset-") {
        if let Some(width) = pixel_width(value, WIDTHS).filter(|v| !color::is_color_like(v)) {
            return Some(Utility::single(RingOffsetWidth, "--tw-ring-offset-width", width));
        }
        return colored(RingOffsetColor, "--tw-ring-offset-color", None, value, tokens);
    }
    let width = match base.strip_prefix("ring-") {
        None => Some("3px".to_string()),
        Some(value) => pixel_width(value, WIDTHS).filter(|v| !color::is_color_like(v)),
    };
    if let Some(width) = width {
        return Some(Utility::new(
            RingWidth,
            vec![
                Declaration::new(
                    "--tw-ring-offset-shadow",
                    "var(--tw-ring-inset) 0 0 0 var(--tw-ring-offset-width) var(--tw-ring-offset-color)",
                ),
                Declaration::new(
                    "--tw-ring-shadow",
                    format!(
                        "var(--tw-ring-inset) 0 0 0 calc({width} + var(--tw-ring-offset-width)) var(--tw-ring-color)"
                    ),
                ),
                Declaration::new(
                    "box-shadow",
                    "var(--tw-ring-offset-shadow), var(--tw-ring-shadow), var(--tw-shadow, 0 0 #0000)",
                ),
            ],
        ));
    }
    let value = base.strip_prefix("ring-")?;
    colored(RingColor, "--tw-ring-color", Some("--tw-ring-opacity"), value, tokens)
}

/// Color utility over the token tree, palette, or an arbitrary color.
fn colored(
    family: Family,
    property: &str,
    opacity_var: Option<&str>,
    value: &str,
    tokens: &DesignTokens,
) -> Option<Utility> {
    let (name, modifier) = split_modifier(value);
    let raw = match tokens.color(name) {
        Some(raw) => raw.to_string(),
        None => arbitrary(name).filter(|v| color::is_color_like(v) || v.starts_with("var("))?,
    };
    let declarations = color::declarations(property, &raw, modifier, opacity_var)?;
    Some(Utility::new(family, declarations))
}

fn milliseconds(value: &str) -> Option<String> {
    if defaults::DURATIONS.contains(&value) {
        Some(format!("{value}ms"))
    } else {
        arbitrary(value)
    }
}
