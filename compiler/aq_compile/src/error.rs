//! Compile error types.
//!
//! Compilation stops at the first error, so a `CompileError` always describes
//! exactly one problem: WHAT went wrong (`kind`) and WHERE (`offset`).

use aq_lexer::{Keyword, LexError};

/// A compile failure at a byte offset in the source.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub offset: usize,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, offset: usize) -> Self {
        CompileError { kind, offset }
    }

    /// The message without the offset suffix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::new(CompileErrorKind::UnrecognizedText, err.offset)
    }
}

/// What kind of compile error occurred.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CompileErrorKind {
    #[error("unrecognized text")]
    UnrecognizedText,

    /// Two bare names in sequence (`a b`).
    #[error("syntax error: unexpected name `{name}`")]
    UnexpectedName { name: String },

    /// A bare name directly followed by a literal (`a 1`).
    #[error("syntax error: `{name}` cannot be followed by a literal")]
    LiteralAfterName { name: String },

    #[error("unmatched closing bracket")]
    UnmatchedClose,

    #[error("unbalanced brackets")]
    UnbalancedBrackets,

    #[error("invalid number `{text}`")]
    InvalidNumber { text: String },

    #[error("syntax error: `{keyword}` must be followed by `(`")]
    KeywordWithoutArguments { keyword: Keyword },

    #[error("`{keyword}` takes {expected} arguments, got {got}")]
    OperatorArity {
        keyword: Keyword,
        expected: &'static str,
        got: usize,
    },

    /// An `if`/`while` argument produced zero or several values.
    #[error("each `{keyword}` argument must produce exactly one value, got {got}")]
    OperatorArgument { keyword: Keyword, got: usize },

    /// Compiler bookkeeping went wrong; never caused by user input.
    #[error("internal compiler error: {message}")]
    Internal { message: String },
}

#[cold]
pub(crate) fn internal(message: impl ToString, offset: usize) -> CompileError {
    CompileError::new(
        CompileErrorKind::Internal {
            message: message.to_string(),
        },
        offset,
    )
}
