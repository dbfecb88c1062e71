//! ActionQuery compiler.
//!
//! Turns an expression such as `Concat(name, ' has ', Add(a, b))` into a
//! [`Program`]. Compilation is a single pass over the token stream with no
//! intermediate syntax tree, and either yields a complete program or the first
//! error with its source offset; there are no partial programs.
//!
//! Grammar, informally:
//!
//! ```text
//! expr  := literal | name | name '(' list ')' | keyword '(' list ')' | '(' list ')'
//! list  := (expr (',' expr)*)?
//! ```
//!
//! Commas at the top level or inside a group keep every value, so `1, 2`
//! compiles to a program producing two results.

mod compiler;
mod context;
mod error;
mod operator;

pub use aq_ir::Program;
pub use compiler::Compiler;
pub use error::{CompileError, CompileErrorKind};

/// Compile an expression into a sealed program.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let result = Compiler::new(source).compile();
    match &result {
        Ok(program) => tracing::debug!(instructions = program.len(), "compiled"),
        Err(err) => tracing::debug!(%err, "compile failed"),
    }
    result
}
