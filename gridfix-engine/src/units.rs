//! Width values found in markup
//!
//! Widths come from a `width` attribute or from a `width:` declaration in an
//! inline `style`. Both accept plain numbers, pixels and percentages.

use once_cell::sync::Lazy;
use regex::Regex;

/// `width:` at the start of a style or right after a `;`, so that
/// `max-width:` and `min-width:` are not taken for it
static STYLE_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|;)width:([^;]*)").expect("style width pattern is valid"));

/// A parsed width
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidthValue {
    Pixels(u32),
    Percent(f64),
}

impl WidthValue {
    /// Parse `120`, `120px` or `50%`. Decimals are accepted and truncated
    /// when resolved. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<WidthValue> {
        let text = text.trim();
        if let Some(pct) = text.strip_suffix('%') {
            return parse_number(pct).map(WidthValue::Percent);
        }
        let px = text
            .strip_suffix("px")
            .or_else(|| text.strip_suffix("PX"))
            .unwrap_or(text);
        parse_number(px).map(|n| WidthValue::Pixels(n as u32))
    }

    /// Pixel width, with percentages taken of `parent_width`
    pub fn resolve(self, parent_width: u32) -> u32 {
        match self {
            WidthValue::Pixels(px) => px,
            WidthValue::Percent(pct) => (f64::from(parent_width) * pct / 100.0) as u32,
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Remove spaces and tabs (and line breaks) from a style attribute
fn compact(style: &str) -> String {
    style.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Text of the `width:` declaration in a style attribute, if any
pub fn style_width(style: &str) -> Option<String> {
    let compacted = compact(style);
    STYLE_WIDTH
        .captures(&compacted)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The style with every `width:` declaration removed, `None` when nothing
/// else is left
pub fn strip_style_width(style: &str) -> Option<String> {
    let kept: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| !is_width_declaration(decl))
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(format!("{};", kept.join(";")))
    }
}

/// Whether a style attribute contains a `width:` declaration
pub fn declares_width(style: &str) -> bool {
    style.split(';').any(is_width_declaration)
}

fn is_width_declaration(decl: &str) -> bool {
    match decl.split_once(':') {
        Some((property, _)) => property.trim().eq_ignore_ascii_case("width"),
        None => false,
    }
}
