#![forbid(unsafe_code)]

//! `mudtext` is the text core of MUD web clients: inline markup to HTML, plain-text stripping,
//! `$NAME` substitution and CJK-aware truncation.
//!
//! The building blocks live in `mudtext-core` and are re-exported here. This crate adds
//! [`MessagePipeline`], which chains them in the order the client applies them to a server
//! message: truncate the raw text, convert markup, then fill placeholders.

pub use mudtext_core::*;

use std::collections::HashMap;

/// Bundles a [`Renderer`] with the per-sink options used for every message.
#[derive(Debug, Clone)]
pub struct MessagePipeline {
    pub renderer: Renderer,
    /// Truncate raw text to this many columns before conversion.
    pub max_width: Option<usize>,
    pub ellipsis: bool,
    /// Placeholder values applied to the converted HTML (keys include the leading `$`).
    pub values: HashMap<String, String>,
}

impl Default for MessagePipeline {
    fn default() -> Self {
        Self {
            renderer: Renderer::new(),
            max_width: None,
            ellipsis: true,
            values: HashMap::new(),
        }
    }
}

impl MessagePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_max_width(mut self, max_width: usize, ellipsis: bool) -> Self {
        self.max_width = Some(max_width);
        self.ellipsis = ellipsis;
        self
    }

    /// Adds a placeholder value. `name` may be given with or without the leading `$`.
    pub fn with_value(mut self, name: &str, value: impl Into<String>) -> Self {
        let key = if name.starts_with('$') {
            name.to_string()
        } else {
            format!("${name}")
        };
        self.values.insert(key, value.into());
        self
    }

    /// Raw server text -> HTML ready for insertion.
    ///
    /// Truncation counts markup tokens as visible text, so widths are only exact for raw text
    /// without markup.
    pub fn render_html(&self, raw: &str) -> String {
        let raw = self.truncated(raw);
        let html = self.renderer.convert(&raw);
        if self.values.is_empty() {
            return html;
        }
        escape::parse(&html, &self.values)
    }

    /// Raw server text -> plain text, for labels that cannot hold HTML.
    pub fn render_plain(&self, raw: &str) -> String {
        let text = self.renderer.strip(raw);
        let text = self.truncated(&text);
        if self.values.is_empty() {
            return text;
        }
        escape::parse(&text, &self.values)
    }

    fn truncated(&self, raw: &str) -> String {
        match self.max_width {
            Some(max_width) => self.renderer.truncate(raw, max_width, self.ellipsis),
            None => raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_html_converts_and_fills_placeholders() {
        let pipeline = MessagePipeline::new()
            .with_value("NAME", "Aria")
            .with_value("$GOLD", "30");
        assert_eq!(
            pipeline.render_html("{gWelcome, $NAME!{n You carry $GOLD gold ($$)."),
            "<span class=\"green\">Welcome, Aria!</span> You carry 30 gold ($)."
        );
    }

    #[test]
    fn render_html_truncates_before_converting() {
        let pipeline = MessagePipeline::new().with_max_width(8, true);
        assert_eq!(pipeline.render_html("一二三四五六"), "一二三..");
        assert_eq!(pipeline.render_html("<b>&"), "&#60;b&#62;&#38;");
    }

    #[test]
    fn render_plain_strips_before_truncating() {
        let pipeline = MessagePipeline::new().with_max_width(6, true);
        assert_eq!(pipeline.render_plain("{rDragon{n Lair"), "Drag..");
        assert_eq!(pipeline.render_plain("{rCave"), "Cave");
    }

    #[test]
    fn reexports_the_core_api() {
        assert_eq!(convert("{bx"), "<span class=\"blue\">x</span>");
        assert_eq!(strip("{bx"), "x");
        assert_eq!(truncate("abcdef", 3, false), "abc");
        assert_eq!(visual_width("ab中"), 4);
    }
}
