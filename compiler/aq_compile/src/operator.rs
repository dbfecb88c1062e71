//! Lowering of `if` and `while` to jumps.
//!
//! Operators are compiled in the same single pass as calls: the jump for a
//! branch is emitted as soon as the comma ending the previous argument is
//! seen, and its target is patched once the branch has been emitted.
//!
//! ```text
//! if(c, a, b)        c; JumpIfNot ELSE; a; Jump END; ELSE: b; END:
//! if(c, a)           c; JumpIfNot ELSE; a; Jump END; ELSE: PushNull; END:
//! while(c, b1, b2)   HEAD: c; JumpIfNot EXIT; b1; drop; b2; drop; Jump HEAD;
//!                    EXIT: PushNull
//! ```
//!
//! `drop` is a `JumpIfNot` targeting the next address: it pops one value and
//! continues whichever way the value tests. Every operator leaves exactly one
//! value on the stack. When an `if` ends the program, the compiler appends a
//! `NoOp` at `END` so that every jump lands inside the program.

use aq_ir::{Instruction, ProgramBuilder};
use aq_lexer::Keyword;

use crate::context::OperatorState;
use crate::error::{internal, CompileError, CompileErrorKind};

/// Placeholder target of a jump that has not been patched yet.
const UNPATCHED: usize = usize::MAX;

/// Close the operator argument that ends at the comma at `offset`.
pub(crate) fn argument_boundary(
    builder: &mut ProgramBuilder,
    state: &mut OperatorState,
    args_len: usize,
    offset: usize,
) -> Result<(), CompileError> {
    single_value(state.keyword, args_len - state.mark, offset)?;
    match (state.keyword, state.completed) {
        (Keyword::If | Keyword::While, 0) => {
            let jump = builder.emit(Instruction::jump_if_not(UNPATCHED));
            state.pending_jumps.push(jump);
        }
        (Keyword::If, 1) => {
            let skip_else = builder.emit(Instruction::jump(UNPATCHED));
            patch_last(builder, state, offset)?;
            state.pending_jumps.push(skip_else);
        }
        (Keyword::If, completed) => {
            return Err(CompileError::new(
                CompileErrorKind::OperatorArity {
                    keyword: Keyword::If,
                    expected: "2 or 3",
                    got: completed + 2,
                },
                offset,
            ));
        }
        (Keyword::While, _) => drop_value(builder),
    }
    state.completed += 1;
    state.mark = args_len;
    Ok(())
}

/// Finish an operator at its closing bracket.
///
/// Returns the address of the last instruction emitted for the operator.
pub(crate) fn close(
    builder: &mut ProgramBuilder,
    mut state: OperatorState,
    args_len: usize,
    keyword_offset: usize,
    offset: usize,
) -> Result<usize, CompileError> {
    let trailing = args_len - state.mark;
    if state.completed == 0 && trailing == 0 {
        return Err(arity(state.keyword, 0, keyword_offset));
    }
    single_value(state.keyword, trailing, offset)?;
    let total = state.completed + 1;

    match state.keyword {
        Keyword::If => match total {
            2 => {
                let skip_else = builder.emit(Instruction::jump(UNPATCHED));
                patch_last(builder, &mut state, offset)?;
                builder.emit(Instruction::push_null());
                state.pending_jumps.push(skip_else);
                patch_last(builder, &mut state, offset)?;
            }
            3 => patch_last(builder, &mut state, offset)?,
            got => return Err(arity(Keyword::If, got, keyword_offset)),
        },
        Keyword::While => {
            if total == 1 {
                let exit = builder.emit(Instruction::jump_if_not(UNPATCHED));
                state.pending_jumps.push(exit);
            } else {
                drop_value(builder);
            }
            builder.emit(Instruction::jump(state.start));
            patch_last(builder, &mut state, offset)?;
            builder.emit(Instruction::push_null());
        }
    }

    tracing::trace!(
        keyword = %state.keyword,
        start = state.start,
        end = builder.address(),
        "lowered operator"
    );
    Ok(builder.address().saturating_sub(1))
}

fn single_value(keyword: Keyword, produced: usize, offset: usize) -> Result<(), CompileError> {
    if produced == 1 {
        Ok(())
    } else {
        Err(CompileError::new(
            CompileErrorKind::OperatorArgument {
                keyword,
                got: produced,
            },
            offset,
        ))
    }
}

fn arity(keyword: Keyword, got: usize, offset: usize) -> CompileError {
    let expected = match keyword {
        Keyword::If => "2 or 3",
        Keyword::While => "at least 1",
    };
    CompileError::new(
        CompileErrorKind::OperatorArity {
            keyword,
            expected,
            got,
        },
        offset,
    )
}

/// Pop one value unconditionally.
fn drop_value(builder: &mut ProgramBuilder) {
    let next = builder.address() + 1;
    builder.emit(Instruction::jump_if_not(next));
}

/// Point the most recent pending jump at the current address.
fn patch_last(
    builder: &mut ProgramBuilder,
    state: &mut OperatorState,
    offset: usize,
) -> Result<(), CompileError> {
    let at = state
        .pending_jumps
        .pop()
        .ok_or_else(|| internal("operator has no pending jump", offset))?;
    let target = builder.address();
    builder
        .patch_target(at, target)
        .map_err(|err| internal(err, offset))
}
