#![forbid(unsafe_code)]

//! Inline markup engine for MUD web clients (headless).
//!
//! Game servers emit short in-band tokens (`{r` for red, `{h` for highlight, `{/` for a line
//! break, `{lc`/`{lt`/`{le` for command links). This crate turns them into:
//! - well-formed, escaped HTML ([`Renderer::convert`])
//! - plain text for sinks that cannot render HTML ([`Renderer::strip`])
//!
//! plus CJK-aware width accounting ([`width`]) and `$NAME` placeholder substitution
//! ([`escape::parse`]).
//!
//! All operations are synchronous and total: malformed markup is repaired, unknown tokens pass
//! through, and nothing returns an error once a [`Renderer`] has been built.

pub mod config;
pub mod convert;
pub mod error;
pub mod escape;
pub mod strip;
pub mod tokens;
pub mod width;

pub use config::{FallbackPolicy, MarkupConfig};
pub use convert::{MarkupConverter, OpenKind, ParseState};
pub use error::{Error, Result};
pub use strip::PlainStripper;
pub use tokens::{TableMode, Token, TokenKind, TokenTable};
pub use width::{WidthRule, truncate, truncate_with, visual_width};

/// A validated config together with the HTML and plain-text tables built from it.
///
/// Renderers are immutable and can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: MarkupConfig,
    converter: MarkupConverter,
    stripper: PlainStripper,
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_config(MarkupConfig::default()).expect("default markup config is valid")
    }

    pub fn with_config(config: MarkupConfig) -> Result<Self> {
        config.validate()?;
        let converter = MarkupConverter::new(&config)?;
        let stripper = PlainStripper::new(&config)?;
        tracing::debug!(
            html_tokens = converter.table().tokens().len(),
            plain_tokens = stripper.table().tokens().len(),
            "built markup renderer"
        );
        Ok(Self {
            config,
            converter,
            stripper,
        })
    }

    /// The process-wide renderer for [`MarkupConfig::default`].
    pub fn shared() -> &'static Renderer {
        static RENDERER: std::sync::OnceLock<Renderer> = std::sync::OnceLock::new();
        RENDERER.get_or_init(Renderer::new)
    }

    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    pub fn converter(&self) -> &MarkupConverter {
        &self.converter
    }

    pub fn stripper(&self) -> &PlainStripper {
        &self.stripper
    }

    /// Converts markup to HTML. Never fails: on an internal error the configured
    /// [`FallbackPolicy`] decides what is returned.
    pub fn convert(&self, raw: &str) -> String {
        match self.converter.try_convert(raw) {
            Ok(html) => html,
            Err(err) => self.fallback(raw, &err),
        }
    }

    fn fallback(&self, raw: &str, err: &Error) -> String {
        tracing::warn!(error = %err, policy = ?self.config.fallback, "markup conversion failed");
        match self.config.fallback {
            FallbackPolicy::Original => raw.to_string(),
            FallbackPolicy::Escaped => convert::escape_html(raw).unwrap_or_else(|_| raw.to_string()),
        }
    }

    pub fn strip(&self, raw: &str) -> String {
        self.stripper.strip(raw)
    }

    /// Truncates raw (pre-markup) text to `max_width` columns using the configured width rule
    /// and ellipsis.
    pub fn truncate(&self, raw: &str, max_width: usize, add_ellipsis: bool) -> String {
        let ellipsis = add_ellipsis.then_some(self.config.ellipsis.as_str());
        width::truncate_with(raw, max_width, ellipsis, self.config.width_rule)
    }

    pub fn visual_width(&self, text: &str) -> usize {
        self.config.width_rule.str_width(text)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts markup to HTML with the default configuration.
pub fn convert(raw: &str) -> String {
    Renderer::shared().convert(raw)
}

/// Strips markup to plain text with the default configuration.
pub fn strip(raw: &str) -> String {
    Renderer::shared().strip(raw)
}

#[cfg(test)]
mod tests;
