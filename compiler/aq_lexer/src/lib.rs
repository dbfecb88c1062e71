//! Lexer for ActionQuery using logos.
//!
//! Produces a lazy stream of [`Token`]s that covers the source with no gaps
//! and always ends with a [`TokenKind::End`] sentinel. The first byte range no
//! pattern matches is reported as a [`LexError`] and ends the stream.
//!
//! Matching is longest-match per position; keywords and the special literals
//! only win over identifiers on equal length, so `iffy` and `nullable` are
//! identifiers.

use std::borrow::Cow;
use std::fmt;
use std::iter::FusedIterator;

use logos::Logos;

/// Raw token from logos (before classification).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
    #[regex(r"\s+")]
    Whitespace,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[token("if")]
    If,
    #[token("while")]
    While,

    #[regex(r"[A-Za-z_][A-Za-z0-9_.]*")]
    Ident,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // `\'` is the only escape; any other backslash is literal
    #[regex(r"'(\\'|[^'])*'")]
    Str,

    #[regex(r"[+-]?[0-9]+(\.[0-9]*)?")]
    Number,

    #[token(",")]
    Comma,
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Whitespace => TokenKind::Whitespace,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::Null => TokenKind::Null,
            RawToken::If => TokenKind::Keyword(Keyword::If),
            RawToken::While => TokenKind::Keyword(Keyword::While),
            RawToken::Ident => TokenKind::Ident,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::Str => TokenKind::Str,
            RawToken::Number => TokenKind::Number,
            RawToken::Comma => TokenKind::Comma,
        }
    }
}

/// Operator keywords.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Keyword {
    If,
    While,
}

impl Keyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::While => "while",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token classification.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Whitespace,
    True,
    False,
    Null,
    Keyword(Keyword),
    /// Parameter name or procedure name; decided by the compiler.
    Ident,
    LParen,
    RParen,
    /// Single-quoted string, quotes included in the token text.
    Str,
    /// Signed decimal number, unparsed.
    Number,
    Comma,
    /// End-of-input sentinel with empty text.
    End,
}

impl TokenKind {
    /// Whether the token pushes a literal value (`true`, `'s'`, `12`, ...).
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::True | TokenKind::False | TokenKind::Null | TokenKind::Str | TokenKind::Number
        )
    }
}

/// A classified lexeme borrowing its text from the source.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    /// Byte offset of the first character in the source.
    pub offset: usize,
}

impl<'src> Token<'src> {
    /// The end-of-input sentinel for a source of `len` bytes.
    pub fn end(len: usize) -> Self {
        Token {
            kind: TokenKind::End,
            text: "",
            offset: len,
        }
    }

    /// Contents of a string literal with quotes removed and `\'` unescaped.
    ///
    /// For any other token kind this is the raw text.
    pub fn string_value(&self) -> Cow<'src, str> {
        if self.kind != TokenKind::Str {
            return Cow::Borrowed(self.text);
        }
        let inner = self
            .text
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .unwrap_or(self.text);
        if inner.contains("\\'") {
            Cow::Owned(inner.replace("\\'", "'"))
        } else {
            Cow::Borrowed(inner)
        }
    }
}

/// Text at `offset` that matches no token pattern.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unrecognized text at offset {offset}")]
pub struct LexError {
    pub offset: usize,
}

/// Lazy tokenizer over a source string.
pub struct Lexer<'src> {
    source: &'src str,
    raw: logos::Lexer<'src, RawToken>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            raw: RawToken::lexer(source),
            finished: false,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.raw.next() {
            Some(Ok(raw)) => Some(Ok(Token {
                kind: raw.into(),
                text: self.raw.slice(),
                offset: self.raw.span().start,
            })),
            Some(Err(())) => {
                self.finished = true;
                Some(Err(LexError {
                    offset: self.raw.span().start,
                }))
            }
            None => {
                self.finished = true;
                Some(Ok(Token::end(self.source.len())))
            }
        }
    }
}

impl FusedIterator for Lexer<'_> {}

/// Tokenize a whole source string.
///
/// On success the last token is always [`TokenKind::End`].
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(source).collect()
}
