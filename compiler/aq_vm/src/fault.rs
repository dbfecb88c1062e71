//! Run outcomes and execution faults.

use std::fmt;

use aq_ir::{Instruction, Opcode, OperandKind};

/// How a run that did not fault ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome<T> {
    /// The program counter reached the end of the program.
    Completed(T),
    /// The trace hook or the step budget stopped the run.
    Aborted(Abort),
}

impl<T> RunOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            RunOutcome::Completed(value) => Some(value),
            RunOutcome::Aborted(_) => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RunOutcome::Aborted(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RunOutcome<U> {
        match self {
            RunOutcome::Completed(value) => RunOutcome::Completed(f(value)),
            RunOutcome::Aborted(abort) => RunOutcome::Aborted(abort),
        }
    }
}

/// A controlled stop before the end of the program.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Abort {
    /// Instructions executed, including the last one.
    pub steps: usize,
    /// Address of the instruction that would have run next.
    pub pc: usize,
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aborted after {} steps at #{}", self.steps, self.pc)
    }
}

/// Category of an execution fault.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FaultKind {
    #[error("stack underflow: needed {needed} values, {available} available")]
    StackUnderflow { needed: usize, available: usize },

    #[error("{opcode} expects {expected}, found {found}")]
    OperandMismatch {
        opcode: Opcode,
        expected: OperandKind,
        found: OperandKind,
    },

    #[error("jump target {target} is outside the program (length {len})")]
    JumpOutOfBounds { target: usize, len: usize },

    #[error("function not found: {name}")]
    FunctionNotFound { name: String },

    /// A host callback failed.
    #[error("{message}")]
    Host { message: String },
}

/// A run that failed at a specific instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionFault<V> {
    pub kind: FaultKind,
    pub instruction: Instruction,
    pub pc: usize,
    /// Stack at the time of the fault, bottom first, without the values the
    /// failing instruction consumed.
    pub stack: Vec<V>,
}

impl<V> ExecutionFault<V> {
    #[cold]
    pub fn new(kind: FaultKind, instruction: Instruction, pc: usize, stack: Vec<V>) -> Self {
        ExecutionFault {
            kind,
            instruction,
            pc,
            stack,
        }
    }
}

impl<V> fmt::Display for ExecutionFault<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at #{}: {}", self.kind, self.pc, self.instruction)
    }
}

impl<V: fmt::Debug> std::error::Error for ExecutionFault<V> {}
