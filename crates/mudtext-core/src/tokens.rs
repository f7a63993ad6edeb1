//! The markup token table.
//!
//! One table type serves both output modes: [`TokenTable::html`] carries HTML fragments and
//! [`TokenTable::plain`] carries their plain-text substitutes. Lookups are longest-match-first.

use crate::config::{COLOR_LETTERS, MarkupConfig};
use crate::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};

pub const TOKEN_PREFIX: char = '{';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    OpenSpan,
    CloseReset,
    LineBreak,
    Tab,
    Space,
    OpenHighlight,
    CloseHighlight,
    OpenLink,
    LinkMiddle,
    CloseLink,
    LiteralBrace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    Html,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub pattern: String,
    pub kind: TokenKind,
    pub payload: String,
}

impl Token {
    pub fn new(pattern: impl Into<String>, kind: TokenKind, payload: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenTable {
    mode: TableMode,
    tokens: Vec<Token>,
    /// Character after `{` -> indices into `tokens`, longest pattern first.
    by_second_char: FxHashMap<char, Vec<usize>>,
}

impl TokenTable {
    /// Builds a table from arbitrary tokens.
    ///
    /// Patterns must start with `{`, have at least one character after it and be unique. Tokens
    /// are reordered longest pattern first; equal-length tokens keep their relative order.
    pub fn new(mode: TableMode, mut tokens: Vec<Token>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for token in &tokens {
            if !token.pattern.starts_with(TOKEN_PREFIX) {
                return Err(invalid_token(&token.pattern, "must start with `{`"));
            }
            if token.pattern.chars().count() < 2 {
                return Err(invalid_token(&token.pattern, "must be at least two characters"));
            }
            if !seen.insert(token.pattern.as_str()) {
                return Err(invalid_token(&token.pattern, "duplicate pattern"));
            }
        }

        tokens.sort_by_key(|t| std::cmp::Reverse(t.pattern.len()));

        let mut by_second_char: FxHashMap<char, Vec<usize>> = FxHashMap::default();
        for (idx, token) in tokens.iter().enumerate() {
            if let Some(second) = token.pattern.chars().nth(1) {
                by_second_char.entry(second).or_default().push(idx);
            }
        }

        Ok(Self {
            mode,
            tokens,
            by_second_char,
        })
    }

    /// The HTML-mode table for `config`.
    pub fn html(config: &MarkupConfig) -> Result<Self> {
        let tag = &config.highlight_tag;
        let tab = "&nbsp;".repeat(config.tab_width);
        let mut tokens = vec![
            Token::new("{{", TokenKind::LiteralBrace, "{"),
            Token::new("{n", TokenKind::CloseReset, ""),
            Token::new("{/", TokenKind::LineBreak, "<br>"),
            Token::new("{-", TokenKind::Tab, tab),
            Token::new("{_", TokenKind::Space, "&nbsp;"),
            Token::new("{h", TokenKind::OpenHighlight, format!("<{tag}>")),
            Token::new("{H", TokenKind::CloseHighlight, format!("</{tag}>")),
            Token::new(
                "{lc",
                TokenKind::OpenLink,
                format!(
                    "<a href=\"#\" class=\"{}\" {}=\"",
                    config.link_class, config.link_attribute
                ),
            ),
            Token::new("{lt", TokenKind::LinkMiddle, "\">"),
            Token::new("{le", TokenKind::CloseLink, "</a>"),
        ];
        for (letter, class) in palette(config) {
            tokens.push(Token::new(
                format!("{{{letter}"),
                TokenKind::OpenSpan,
                format!("<span class=\"{class}\">"),
            ));
            tokens.push(Token::new(
                format!("{{[{letter}"),
                TokenKind::OpenSpan,
                format!("<span class=\"{}{class}\">", config.background_prefix),
            ));
        }
        Self::new(TableMode::Html, tokens)
    }

    /// The plain-text table for `config`.
    pub fn plain(config: &MarkupConfig) -> Result<Self> {
        let mut tokens = vec![
            Token::new("{{", TokenKind::LiteralBrace, "{"),
            Token::new("{n", TokenKind::CloseReset, ""),
            Token::new("{/", TokenKind::LineBreak, " "),
            Token::new("{-", TokenKind::Tab, " ".repeat(config.tab_width)),
            Token::new("{_", TokenKind::Space, " "),
            Token::new("{h", TokenKind::OpenHighlight, ""),
            Token::new("{H", TokenKind::CloseHighlight, ""),
            Token::new("{lc", TokenKind::OpenLink, ""),
            Token::new("{lt", TokenKind::LinkMiddle, ""),
            Token::new("{le", TokenKind::CloseLink, ""),
        ];
        for (letter, _) in palette(config) {
            tokens.push(Token::new(format!("{{{letter}"), TokenKind::OpenSpan, ""));
            tokens.push(Token::new(format!("{{[{letter}"), TokenKind::OpenSpan, ""));
        }
        Self::new(TableMode::Plain, tokens)
    }

    pub fn mode(&self) -> TableMode {
        self.mode
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the longest token whose pattern is a prefix of `input`.
    pub fn longest_match(&self, input: &str) -> Option<&Token> {
        let mut chars = input.chars();
        if chars.next() != Some(TOKEN_PREFIX) {
            return None;
        }
        let second = chars.next()?;
        self.by_second_char
            .get(&second)?
            .iter()
            .map(|&idx| &self.tokens[idx])
            .find(|token| input.starts_with(token.pattern.as_str()))
    }
}

/// Palette entries in color-letter order, followed by any extra letters the config adds.
fn palette(config: &MarkupConfig) -> impl Iterator<Item = (char, &str)> {
    let known = COLOR_LETTERS
        .iter()
        .filter_map(move |&letter| config.palette_class(letter).map(|class| (letter, class)));
    let extra = config.palette.iter().filter_map(|(key, class)| {
        let letter = key.chars().next()?;
        (!COLOR_LETTERS.contains(&letter)).then_some((letter, class.as_str()))
    });
    known.chain(extra)
}

fn invalid_token(pattern: &str, reason: &str) -> Error {
    Error::InvalidToken {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
