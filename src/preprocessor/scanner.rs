//! Splits template text into literal spans and `@@...@@` markers.
//!
//! Every byte of the input ends up in exactly one token's `raw` slice, so
//! concatenating the raw slices reproduces the file.

use std::path::Path;

use crate::constants::{MARKER, NAME_SEPARATOR};
use crate::error::{LexError, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'a> {
    Literal,
    /// `@@if <condition>@@`
    Open { condition: &'a str },
    /// `@@elif <condition>@@`
    Elif { condition: &'a str },
    /// `@@else@@`
    Else,
    /// `@@endif@@`
    Close,
    /// `@@NAME@@`
    Variable { name: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Exact source text of the token.
    pub raw: &'a str,
    /// Where `raw` begins.
    pub position: Position,
    /// Nesting level of the conditional a directive belongs to; 0 for top level.
    pub depth: usize,
}

/// Tokenizes one file's content.
///
/// # Errors
/// * `LexError` at the first malformed marker; no partial token stream is returned
pub fn scan<'a>(file: &Path, source: &'a str) -> Result<Vec<Token<'a>>, LexError> {
    Scanner::new(file, source).run()
}

struct Scanner<'a, 'p> {
    file: &'p Path,
    source: &'a str,
    cursor: usize,
    position: Position,
    depth: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a, 'p> Scanner<'a, 'p> {
    fn new(file: &'p Path, source: &'a str) -> Self {
        Self {
            file,
            source,
            cursor: 0,
            position: Position::start(),
            depth: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token<'a>>, LexError> {
        let source = self.source;
        while self.cursor < source.len() {
            let rest = &source[self.cursor..];
            match rest.find(MARKER) {
                Some(0) => self.marker(rest)?,
                Some(offset) => self.push(TokenKind::Literal, &rest[..offset], self.depth),
                None => self.push(TokenKind::Literal, rest, self.depth),
            }
        }
        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind<'a>, raw: &'a str, depth: usize) {
        self.tokens.push(Token { kind, raw, position: self.position, depth });
        self.position.advance(raw);
        self.cursor += raw.len();
    }

    /// `rest` starts with an opening marker.
    fn marker(&mut self, rest: &'a str) -> Result<(), LexError> {
        let after_open = &rest[MARKER.len()..];
        let line = after_open.split('\n').next().unwrap_or_default();
        let Some(close) = line.find(MARKER) else {
            return Err(self.error("expected closing `@@` on the same line"));
        };

        let raw = &rest[..MARKER.len() + close + MARKER.len()];
        let body = after_open[..close].trim_matches([' ', '\t']);
        let kind = classify(body).map_err(|reason| self.error(reason))?;

        let depth = match kind {
            TokenKind::Open { .. } => {
                self.depth += 1;
                self.depth - 1
            }
            TokenKind::Close => {
                self.depth = self.depth.saturating_sub(1);
                self.depth
            }
            TokenKind::Elif { .. } | TokenKind::Else => self.depth.saturating_sub(1),
            TokenKind::Literal | TokenKind::Variable { .. } => self.depth,
        };

        self.push(kind, raw, depth);
        Ok(())
    }

    fn error<S: Into<String>>(&self, reason: S) -> LexError {
        LexError {
            location: Location::new(self.file, self.position.line, self.position.column),
            reason: reason.into(),
        }
    }
}

fn classify(body: &str) -> Result<TokenKind<'_>, String> {
    if body.is_empty() {
        return Err("empty marker".to_string());
    }

    // A condition may open with a parenthesis right after the keyword: `if(A)`.
    let keyword_end = body.find([' ', '\t', '(']).unwrap_or(body.len());
    let (keyword, argument) = body.split_at(keyword_end);
    let argument = argument.trim_matches([' ', '\t']);

    match keyword {
        "if" => Ok(TokenKind::Open { condition: argument }),
        "elif" => Ok(TokenKind::Elif { condition: argument }),
        "else" | "endif" if !argument.is_empty() => {
            Err(format!("unexpected `{argument}` after `{keyword}`"))
        }
        "else" => Ok(TokenKind::Else),
        "endif" => Ok(TokenKind::Close),
        _ if is_variable_name(body) => Ok(TokenKind::Variable { name: body }),
        _ => Err(format!("`{body}` is neither a directive nor a variable name")),
    }
}

/// Identifier segments joined by `:`, e.g. `ENV:LANGUAGE`.
pub fn is_variable_name(name: &str) -> bool {
    name.split(NAME_SEPARATOR).all(|segment| {
        let mut chars = segment.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}
