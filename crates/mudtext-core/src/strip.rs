//! Markup to plain text, for sinks that cannot render HTML (map labels, window titles).

use crate::Result;
use crate::config::MarkupConfig;
use crate::tokens::{TOKEN_PREFIX, TokenKind, TokenTable};

#[derive(Debug, Clone)]
pub struct PlainStripper {
    table: TokenTable,
}

impl PlainStripper {
    pub fn new(config: &MarkupConfig) -> Result<Self> {
        Ok(Self::from_table(TokenTable::plain(config)?))
    }

    pub fn from_table(table: TokenTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TokenTable {
        &self.table
    }

    /// Replaces every token with its plain-text substitute.
    ///
    /// The command target of a link (`{lc <target> {lt`) is dropped so only the label is kept. A
    /// target that is never followed by `{lt` is kept as text.
    pub fn strip(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut target: Option<String> = None;
        let mut pos = 0usize;
        while let Some(ch) = raw[pos..].chars().next() {
            if ch == TOKEN_PREFIX {
                if let Some(token) = self.table.longest_match(&raw[pos..]) {
                    match token.kind {
                        TokenKind::OpenLink => {
                            if let Some(pending) = target.take() {
                                out.push_str(&pending);
                            }
                            target = Some(String::new());
                        }
                        TokenKind::LinkMiddle => target = None,
                        TokenKind::CloseLink => {
                            if let Some(pending) = target.take() {
                                out.push_str(&pending);
                            }
                        }
                        _ => match target.as_mut() {
                            Some(pending) => pending.push_str(&token.payload),
                            None => out.push_str(&token.payload),
                        },
                    }
                    pos += token.pattern.len();
                    continue;
                }
            }
            match target.as_mut() {
                Some(pending) => pending.push(ch),
                None => out.push(ch),
            }
            pos += ch.len_utf8();
        }
        if let Some(pending) = target {
            out.push_str(&pending);
        }
        out
    }
}
