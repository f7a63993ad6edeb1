//! Markup to HTML conversion.
//!
//! The converter makes one left-to-right pass over the raw text. HTML special characters are
//! escaped as they are seen and markup tokens are replaced by their fragments; since no token
//! contains an escapable character, this is the same as escaping first and substituting second.
//!
//! Colors and highlights are never left dangling: a new token closes whatever run is open (with
//! the exception of a highlight opened inside a color), and the end of the input closes the rest.

use crate::Result;
use crate::config::MarkupConfig;
use crate::tokens::{TOKEN_PREFIX, Token, TokenKind, TokenTable};
use std::fmt::Write as _;

pub const SPAN_CLOSE: &str = "</span>";
pub const LINE_BREAK: &str = "<br>";
/// Two spaces in a row render as two figure spaces so column alignment survives HTML whitespace
/// collapsing.
const DOUBLE_SPACE: &str = "&#8199;&#8199;";

/// The innermost inline element left open by the text converted so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenKind {
    #[default]
    None,
    Span,
    Highlight,
}

/// Open-element state of a single conversion.
///
/// A highlight may sit inside a color span, so both flags can be set at once; the highlight is
/// always the inner element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseState {
    span_open: bool,
    highlight_open: bool,
}

impl ParseState {
    pub fn open_kind(&self) -> OpenKind {
        if self.highlight_open {
            OpenKind::Highlight
        } else if self.span_open {
            OpenKind::Span
        } else {
            OpenKind::None
        }
    }

    /// Emits `token` into `out`, closing runs it collides with first.
    fn apply(mut self, token: &Token, highlight_close: &str, out: &mut String) -> Self {
        if self.highlight_open && token.kind != TokenKind::CloseHighlight {
            out.push_str(highlight_close);
            self.highlight_open = false;
        }
        if self.span_open && !self.highlight_open && token.kind != TokenKind::OpenHighlight {
            out.push_str(SPAN_CLOSE);
            self.span_open = false;
        }

        match token.kind {
            TokenKind::OpenSpan => {
                out.push_str(&token.payload);
                self.span_open = true;
            }
            TokenKind::OpenHighlight => {
                out.push_str(&token.payload);
                self.highlight_open = true;
            }
            TokenKind::CloseHighlight => {
                // A close without a matching open is dropped.
                if self.highlight_open {
                    out.push_str(&token.payload);
                    self.highlight_open = false;
                }
            }
            TokenKind::CloseReset => {}
            TokenKind::LineBreak
            | TokenKind::Tab
            | TokenKind::Space
            | TokenKind::OpenLink
            | TokenKind::LinkMiddle
            | TokenKind::CloseLink
            | TokenKind::LiteralBrace => out.push_str(&token.payload),
        }
        self
    }

    /// Closes everything still open.
    fn flush(self, highlight_close: &str, out: &mut String) {
        if self.highlight_open {
            out.push_str(highlight_close);
        }
        if self.span_open {
            out.push_str(SPAN_CLOSE);
        }
    }
}

/// Converts markup into HTML with one HTML-mode [`TokenTable`].
#[derive(Debug, Clone)]
pub struct MarkupConverter {
    table: TokenTable,
    highlight_close: String,
}

impl MarkupConverter {
    pub fn new(config: &MarkupConfig) -> Result<Self> {
        Ok(Self::from_table(
            TokenTable::html(config)?,
            format!("</{}>", config.highlight_tag),
        ))
    }

    pub fn from_table(table: TokenTable, highlight_close: impl Into<String>) -> Self {
        Self {
            table,
            highlight_close: highlight_close.into(),
        }
    }

    pub fn table(&self) -> &TokenTable {
        &self.table
    }

    /// Converts `raw`, closing any run left open at the end.
    pub fn try_convert(&self, raw: &str) -> Result<String> {
        let mut out = String::with_capacity(raw.len() + raw.len() / 2);
        let state = self.scan(raw, ParseState::default(), &mut out)?;
        state.flush(&self.highlight_close, &mut out);
        Ok(out)
    }

    /// Appends the HTML for `raw` to `out`, starting from `state`, and returns the state left
    /// open at the end of `raw`. Nothing is flushed.
    pub fn scan(&self, raw: &str, mut state: ParseState, out: &mut String) -> Result<ParseState> {
        let mut pos = 0usize;
        while let Some(ch) = raw[pos..].chars().next() {
            let rest = &raw[pos..];
            if ch == TOKEN_PREFIX {
                if let Some(token) = self.table.longest_match(rest) {
                    state = state.apply(token, &self.highlight_close, out);
                    pos += token.pattern.len();
                    continue;
                }
            }
            if rest.starts_with("  ") {
                out.push_str(DOUBLE_SPACE);
                pos += 2;
                continue;
            }
            push_escaped(out, ch)?;
            pos += ch.len_utf8();
        }
        Ok(state)
    }
}

/// Escapes HTML special characters without interpreting markup.
pub fn escape_html(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len() + raw.len() / 4);
    let mut pos = 0usize;
    while let Some(ch) = raw[pos..].chars().next() {
        if raw[pos..].starts_with("  ") {
            out.push_str(DOUBLE_SPACE);
            pos += 2;
            continue;
        }
        push_escaped(&mut out, ch)?;
        pos += ch.len_utf8();
    }
    Ok(out)
}

fn push_escaped(out: &mut String, ch: char) -> std::fmt::Result {
    match ch {
        '"' | '&' | '\'' | '<' | '>' => write!(out, "&#{};", u32::from(ch)),
        '\n' => {
            out.push_str(LINE_BREAK);
            Ok(())
        }
        _ => {
            out.push(ch);
            Ok(())
        }
    }
}
