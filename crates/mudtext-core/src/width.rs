//! Visual width accounting and width-bounded truncation.
//!
//! Widths follow the monospaced-CJK convention the web client lays text out with: ASCII and
//! halfwidth forms take one column, everything else takes two.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// How a character's column count is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidthRule {
    /// `U+0001..=U+007E` and `U+FF60..=U+FF9F` are narrow, every other scalar value is wide.
    #[default]
    Legacy,
    /// Unicode East Asian Width (ambiguous characters are narrow, control and combining
    /// characters take no column).
    EastAsian,
}

impl WidthRule {
    pub fn char_width(self, ch: char) -> usize {
        match self {
            WidthRule::Legacy => legacy_char_width(ch),
            WidthRule::EastAsian => ch.width().unwrap_or(0),
        }
    }

    pub fn str_width(self, text: &str) -> usize {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }
}

fn legacy_char_width(ch: char) -> usize {
    match ch {
        '\u{0001}'..='\u{007E}' | '\u{FF60}'..='\u{FF9F}' => 1,
        _ => 2,
    }
}

/// Width of `text` under [`WidthRule::Legacy`].
pub fn visual_width(text: &str) -> usize {
    WidthRule::Legacy.str_width(text)
}

/// Truncates `raw` to at most `max_width` columns under [`WidthRule::Legacy`].
///
/// With `add_ellipsis`, the prefix is shortened further so that `..` fits inside `max_width`.
/// A string that already fits is returned unchanged.
pub fn truncate(raw: &str, max_width: usize, add_ellipsis: bool) -> String {
    let ellipsis = add_ellipsis.then_some("..");
    truncate_with(raw, max_width, ellipsis, WidthRule::Legacy)
}

/// Width-bounded truncation with an explicit ellipsis and width rule.
///
/// The result never exceeds `max_width` columns. When the ellipsis is wider than `max_width` it is
/// dropped and the plain prefix is returned instead.
pub fn truncate_with(
    raw: &str,
    max_width: usize,
    ellipsis: Option<&str>,
    rule: WidthRule,
) -> String {
    let Some(overflow) = find_overflow(raw, max_width, rule) else {
        return raw.to_string();
    };

    let ellipsis = ellipsis.filter(|e| rule.str_width(e) <= max_width);
    let Some(ellipsis) = ellipsis else {
        return raw[..overflow.at].to_string();
    };

    let budget = max_width - rule.str_width(ellipsis);
    let mut width = overflow.width;
    let mut cut = overflow.end;
    for (idx, ch) in raw[..overflow.end].char_indices().rev() {
        if width <= budget {
            break;
        }
        width -= rule.char_width(ch);
        cut = idx;
    }

    let mut out = String::with_capacity(cut + ellipsis.len());
    out.push_str(&raw[..cut]);
    out.push_str(ellipsis);
    out
}

struct Overflow {
    /// Byte offset of the character that pushed the width past the limit.
    at: usize,
    /// Byte offset just past that character.
    end: usize,
    /// Accumulated width including that character.
    width: usize,
}

fn find_overflow(raw: &str, max_width: usize, rule: WidthRule) -> Option<Overflow> {
    let mut width = 0usize;
    for (idx, ch) in raw.char_indices() {
        width += rule.char_width(ch);
        if width > max_width {
            return Some(Overflow {
                at: idx,
                end: idx + ch.len_utf8(),
                width,
            });
        }
    }
    None
}
