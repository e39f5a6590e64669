// src/tokenizer.rs
//! Lexical scanner for transcripts: numbers, words, punctuation and a catch-all class.
//!
//! A single alternation is compiled once; alternatives are tried in priority order at
//! every position (number, word, punctuation, whitespace, any other char). Whitespace
//! is consumed but never emitted, so every non-whitespace character of the input ends
//! up in exactly one token.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static SCANNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<number>[0-9]+(?:\.[0-9]+)?)|(?P<word>[A-Za-záéíóúñÁÉÍÓÚÑ]+)|(?P<punct>[.,;:!?])|(?P<space>\s+)|(?P<other>(?s:.))",
    )
    .expect("tokenizer regex")
});

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Number,
    Word,
    Punctuation,
    Other,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Word => "WORD",
            TokenKind::Punctuation => "PUNCTUATION",
            TokenKind::Other => "OTHER",
        }
    }
}

/// A scanned lexeme with its byte span in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token('{}', {})", self.lexeme, self.kind.as_str())
    }
}

/// Lazily scan `input`. Each call starts a fresh scan.
pub fn scan(input: &str) -> impl Iterator<Item = Token> + '_ {
    SCANNER.captures_iter(input).filter_map(|caps| {
        let (kind, m) = if let Some(m) = caps.name("number") {
            (TokenKind::Number, m)
        } else if let Some(m) = caps.name("word") {
            (TokenKind::Word, m)
        } else if let Some(m) = caps.name("punct") {
            (TokenKind::Punctuation, m)
        } else if let Some(m) = caps.name("other") {
            (TokenKind::Other, m)
        } else {
            // whitespace run
            return None;
        };
        Some(Token {
            lexeme: m.as_str().to_string(),
            kind,
            start: m.start(),
            end: m.end(),
        })
    })
}

/// Eager variant of [`scan`].
pub fn tokenize(input: &str) -> Vec<Token> {
    scan(input).collect()
}
