//! Debug commands: `dump` and `lex` for inspecting compiler output.

use std::io::{self, Write};

use aq_compile::compile;
use aq_lexer::{Lexer, TokenKind};

use super::{exit_with, read_file, RunStatus};
use crate::report::render_compile_error;

/// Compile a file and print its disassembly.
pub fn dump_file(path: &str) {
    let source = read_file(path);
    let stdout = io::stdout();
    exit_with(dump_source(&source, path, &mut stdout.lock()));
}

pub fn dump_source<W: Write>(source: &str, path: &str, out: &mut W) -> io::Result<RunStatus> {
    match compile(source) {
        Ok(program) => {
            writeln!(out, "Program for '{path}' ({} instructions):", program.len())?;
            write!(out, "{program}")?;
            Ok(RunStatus::Completed)
        }
        Err(err) => {
            write!(out, "{}", render_compile_error(source, path, &err))?;
            Ok(RunStatus::CompileError)
        }
    }
}

/// Lex a file and display the token stream.
pub fn lex_file(path: &str) {
    let source = read_file(path);
    let stdout = io::stdout();
    exit_with(lex_source(&source, path, &mut stdout.lock()));
}

/// Print one token per line, skipping whitespace. Stops at the first
/// unrecognized text.
pub fn lex_source<W: Write>(source: &str, path: &str, out: &mut W) -> io::Result<RunStatus> {
    writeln!(out, "Tokens for '{path}':")?;
    for token in Lexer::new(source) {
        match token {
            Ok(token) if token.kind == TokenKind::Whitespace => {}
            Ok(token) if token.kind == TokenKind::End => {
                writeln!(out, "  {:?} @ {}", token.kind, token.offset)?;
            }
            Ok(token) => writeln!(out, "  {:?} {:?} @ {}", token.kind, token.text, token.offset)?,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                return Ok(RunStatus::CompileError);
            }
        }
    }
    Ok(RunStatus::Completed)
}
