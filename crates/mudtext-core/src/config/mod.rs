use crate::width::WidthRule;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Color letters in declaration order. Lowercase letters are the bright variants.
pub const COLOR_LETTERS: [char; 16] = [
    'r', 'g', 'y', 'b', 'm', 'c', 'w', 'x', 'R', 'G', 'Y', 'B', 'M', 'C', 'W', 'X',
];

const DEFAULT_PALETTE: [(char, &str); 16] = [
    ('r', "red"),
    ('g', "green"),
    ('y', "yellow"),
    ('b', "blue"),
    ('m', "magenta"),
    ('c', "cyan"),
    ('w', "white"),
    ('x', "gray"),
    ('R', "dark-red"),
    ('G', "dark-green"),
    ('Y', "dark-yellow"),
    ('B', "dark-blue"),
    ('M', "dark-magenta"),
    ('C', "dark-cyan"),
    ('W', "dark-white"),
    ('X', "black"),
];

/// Letters that already have a meaning after `{` and cannot be used as colors.
const RESERVED_LETTERS: [char; 4] = ['h', 'H', 'l', 'n'];

const MIN_TAB_WIDTH: usize = 1;
const MAX_TAB_WIDTH: usize = 16;

/// What [`crate::Renderer::convert`] returns when conversion fails internally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackPolicy {
    /// Return the input untouched. Nothing is hidden from the player, but nothing is escaped
    /// either.
    #[default]
    Original,
    /// Return the input with HTML special characters escaped and no markup processing.
    Escaped,
}

/// Rendering options shared by the HTML and plain-text token tables.
///
/// Every field has a default, so a JSON document only needs the keys it overrides. Use
/// [`MarkupConfig::from_json_str`] or [`MarkupConfig::merged_with`] to apply partial overrides:
/// both deep-merge onto the defaults, so overriding one palette entry keeps the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkupConfig {
    /// Color letter -> CSS class emitted by `{<letter>`.
    pub palette: IndexMap<String, String>,
    /// Prefix prepended to the palette class for `{[<letter>` background spans.
    pub background_prefix: String,
    /// Element used for `{h` / `{H`.
    pub highlight_tag: String,
    /// CSS class on command links.
    pub link_class: String,
    /// Attribute that carries the command text of a `{lc ... {lt` link.
    pub link_attribute: String,
    /// Columns produced by `{-`.
    pub tab_width: usize,
    /// Suffix appended by ellipsis truncation.
    pub ellipsis: String,
    pub width_rule: WidthRule,
    pub fallback: FallbackPolicy,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE
                .iter()
                .map(|(letter, class)| (letter.to_string(), (*class).to_string()))
                .collect(),
            background_prefix: "bg-".to_string(),
            highlight_tag: "strong".to_string(),
            link_class: "cmd".to_string(),
            link_attribute: "data-cmd".to_string(),
            tab_width: 4,
            ellipsis: "..".to_string(),
            width_rule: WidthRule::Legacy,
            fallback: FallbackPolicy::Original,
        }
    }
}

impl MarkupConfig {
    /// Parses a (possibly partial) JSON config and merges it onto the defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        Self::default().merged_with(&overrides)
    }

    /// Returns a copy of `self` with `overrides` deep-merged on top, validated.
    pub fn merged_with(&self, overrides: &Value) -> Result<Self> {
        if !overrides.is_object() {
            return Err(Error::InvalidConfig {
                message: "config overrides must be a JSON object".to_string(),
            });
        }
        let mut base = serde_json::to_value(self)?;
        deep_merge_value(&mut base, overrides);
        let merged: Self = serde_json::from_value(base)?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn palette_class(&self, letter: char) -> Option<&str> {
        let mut buf = [0u8; 4];
        self.palette
            .get(&*letter.encode_utf8(&mut buf))
            .map(String::as_str)
    }

    /// Checks that every configured fragment can be spliced into HTML without breaking out of
    /// its element or attribute.
    pub fn validate(&self) -> Result<()> {
        for (key, class) in &self.palette {
            let mut chars = key.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => c,
                _ => {
                    return Err(invalid(format!(
                        "palette key `{key}` must be a single ASCII letter"
                    )));
                }
            };
            if RESERVED_LETTERS.contains(&letter) {
                return Err(invalid(format!(
                    "palette key `{key}` collides with a built-in token"
                )));
            }
            if class.is_empty() || !is_class_list(class) {
                return Err(invalid(format!(
                    "palette class `{class}` for `{key}` is not a valid class list"
                )));
            }
        }

        if !is_class_list(&self.background_prefix) {
            return Err(invalid(format!(
                "background prefix `{}` contains characters not allowed in a class name",
                self.background_prefix
            )));
        }
        if self.highlight_tag.is_empty()
            || !self.highlight_tag.chars().all(|c| c.is_ascii_alphanumeric())
            || !self.highlight_tag.starts_with(|c: char| c.is_ascii_alphabetic())
        {
            return Err(invalid(format!(
                "highlight tag `{}` is not a valid element name",
                self.highlight_tag
            )));
        }
        if !is_class_list(&self.link_class) {
            return Err(invalid(format!(
                "link class `{}` is not a valid class list",
                self.link_class
            )));
        }
        if self.link_attribute.is_empty()
            || !self
                .link_attribute
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'))
        {
            return Err(invalid(format!(
                "link attribute `{}` is not a valid attribute name",
                self.link_attribute
            )));
        }
        if !(MIN_TAB_WIDTH..=MAX_TAB_WIDTH).contains(&self.tab_width) {
            return Err(invalid(format!(
                "tab width {} is outside {MIN_TAB_WIDTH}..={MAX_TAB_WIDTH}",
                self.tab_width
            )));
        }
        if self.ellipsis.contains(['\n', '{']) {
            return Err(invalid(
                "ellipsis must not contain line breaks or markup".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig { message }
}

fn is_class_list(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
