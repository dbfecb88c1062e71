//! Single-pass compiler: tokens in, bytecode out.
//!
//! There is no syntax tree. Each token either emits instructions right away
//! or updates the parse state:
//! - the undecided slot, holding a bare name until the next token tells
//!   whether it is a parameter reference or the start of a call
//! - a stack of pending contexts, one per unclosed bracket, collecting the
//!   addresses of the values produced for it
//!
//! A call's argument count is the number of values its context collected,
//! so `Add(1, Get('x'))` becomes `PushInt 1; PushString 'x'; Call Get (1 arg);
//! Call Add (2 args)`.

use aq_ir::{Instruction, Program, ProgramBuilder};
use aq_lexer::{Lexer, Token, TokenKind};
use tracing::trace;

use crate::context::{EntryKind, OperatorState, PendingEntry, Undecided};
use crate::error::{CompileError, CompileErrorKind};
use crate::operator;

/// Compiler for one source string.
pub struct Compiler<'src> {
    source: &'src str,
    builder: ProgramBuilder,
    undecided: Undecided<'src>,
    entries: Vec<PendingEntry<'src>>,
}

impl<'src> Compiler<'src> {
    pub fn new(source: &'src str) -> Self {
        Compiler {
            source,
            builder: ProgramBuilder::new(),
            undecided: Undecided::Empty,
            entries: Vec::new(),
        }
    }

    /// Compile the whole source, stopping at the first error.
    pub fn compile(mut self) -> Result<Program, CompileError> {
        for token in Lexer::new(self.source) {
            self.token(token?)?;
        }
        // A trailing `if` jumps past its last branch; give it somewhere to land
        let end = self.builder.address();
        if self.builder.is_jump_target(end) {
            self.emit(Instruction::no_op());
        }
        Ok(self.builder.seal())
    }

    fn token(&mut self, token: Token<'src>) -> Result<(), CompileError> {
        match token.kind {
            TokenKind::Whitespace => Ok(()),
            TokenKind::Ident => self.name(
                Undecided::Ident {
                    name: token.text,
                    offset: token.offset,
                },
                &token,
            ),
            TokenKind::Keyword(keyword) => self.name(
                Undecided::Keyword {
                    keyword,
                    offset: token.offset,
                },
                &token,
            ),
            TokenKind::LParen => {
                self.open(token.offset);
                Ok(())
            }
            TokenKind::RParen => self.close(token.offset),
            TokenKind::Comma => self.comma(token.offset),
            TokenKind::End => self.end(token.offset),
            TokenKind::True
            | TokenKind::False
            | TokenKind::Null
            | TokenKind::Str
            | TokenKind::Number => self.literal(&token),
        }
    }

    fn name(&mut self, name: Undecided<'src>, token: &Token<'src>) -> Result<(), CompileError> {
        if !self.undecided.is_empty() {
            return Err(CompileError::new(
                CompileErrorKind::UnexpectedName {
                    name: token.text.to_string(),
                },
                token.offset,
            ));
        }
        self.undecided = name;
        Ok(())
    }

    fn open(&mut self, offset: usize) {
        let pending = self.undecided.take();
        let name_offset = pending.offset().unwrap_or(offset);
        let kind = match pending {
            Undecided::Ident { name, .. } => EntryKind::Call { name },
            Undecided::Keyword { keyword, .. } => {
                EntryKind::Operator(OperatorState::new(keyword, self.builder.address()))
            }
            Undecided::Empty => EntryKind::Group,
        };
        self.entries.push(PendingEntry::new(kind, name_offset));
    }

    fn close(&mut self, offset: usize) -> Result<(), CompileError> {
        self.resolve_pending()?;
        let Some(entry) = self.entries.pop() else {
            return Err(CompileError::new(CompileErrorKind::UnmatchedClose, offset));
        };
        match entry.kind {
            EntryKind::Call { name } => {
                let at = self.emit(Instruction::call(name, entry.args.len()));
                self.register(at);
            }
            EntryKind::Operator(state) => {
                let at = operator::close(
                    &mut self.builder,
                    state,
                    entry.args.len(),
                    entry.offset,
                    offset,
                )?;
                self.register(at);
            }
            EntryKind::Group => {
                // Every value of the group becomes a value of the parent
                if let Some(parent) = self.entries.last_mut() {
                    parent.args.extend(entry.args);
                }
            }
        }
        Ok(())
    }

    fn comma(&mut self, offset: usize) -> Result<(), CompileError> {
        self.resolve_pending()?;
        if let Some(entry) = self.entries.last_mut() {
            if let EntryKind::Operator(state) = &mut entry.kind {
                operator::argument_boundary(&mut self.builder, state, entry.args.len(), offset)?;
            }
        }
        Ok(())
    }

    fn literal(&mut self, token: &Token<'src>) -> Result<(), CompileError> {
        if let Some(offset) = self.undecided.offset() {
            return Err(CompileError::new(
                CompileErrorKind::LiteralAfterName {
                    name: self.undecided.text().to_string(),
                },
                offset,
            ));
        }
        let instruction = match token.kind {
            TokenKind::True => Instruction::push_bool(true),
            TokenKind::False => Instruction::push_bool(false),
            TokenKind::Null => Instruction::push_null(),
            TokenKind::Str => Instruction::push_string(token.string_value()),
            _ => parse_number(token)?,
        };
        let at = self.emit(instruction);
        self.register(at);
        Ok(())
    }

    fn end(&mut self, offset: usize) -> Result<(), CompileError> {
        self.resolve_pending()?;
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(CompileError::new(
                CompileErrorKind::UnbalancedBrackets,
                offset,
            ))
        }
    }

    /// Resolve a pending identifier as a parameter reference.
    fn resolve_pending(&mut self) -> Result<(), CompileError> {
        match self.undecided.take() {
            Undecided::Empty => Ok(()),
            Undecided::Ident { name, .. } => {
                let at = self.emit(Instruction::push_param(name));
                self.register(at);
                Ok(())
            }
            Undecided::Keyword { keyword, offset } => Err(CompileError::new(
                CompileErrorKind::KeywordWithoutArguments { keyword },
                offset,
            )),
        }
    }

    fn emit(&mut self, instruction: Instruction) -> usize {
        trace!(address = self.builder.address(), %instruction, "emit");
        self.builder.emit(instruction)
    }

    /// Count the value produced at `address` as an argument of the innermost
    /// context. Top-level values are simply left on the stack.
    fn register(&mut self, address: usize) {
        if let Some(entry) = self.entries.last_mut() {
            entry.args.push(address);
        }
    }
}

/// Parse a number token: a `.` selects `f64`, otherwise `i64`.
fn parse_number(token: &Token<'_>) -> Result<Instruction, CompileError> {
    let invalid = || {
        CompileError::new(
            CompileErrorKind::InvalidNumber {
                text: token.text.to_string(),
            },
            token.offset,
        )
    };
    if token.text.contains('.') {
        token
            .text
            .parse::<f64>()
            .map(Instruction::push_double)
            .map_err(|_| invalid())
    } else {
        token
            .text
            .parse::<i64>()
            .map(Instruction::push_int)
            .map_err(|_| invalid())
    }
}
