//! ActionQuery virtual machine.
//!
//! Executes a sealed [`Program`] against a [`Host`]. The VM owns nothing but a
//! data stack and a program counter; every value is built, resolved, called
//! and tested for truth by the host.
//!
//! ```text
//! compile("Add(x, 2)") --> Program --> execute(&program, &mut host) --> [value]
//! ```
//!
//! A run ends in one of three ways:
//! - completion, yielding the remaining stack (top first) or, in scalar mode,
//!   the top value
//! - a controlled abort, requested by the host's trace hook or by a step
//!   budget
//! - an [`ExecutionFault`] describing the failing instruction
//!
//! Programs are shared read-only, so any number of runs may execute the same
//! program at once, each with its own host.

mod fault;
mod host;
mod vm;

pub use aq_ir::Program;
pub use fault::{Abort, ExecutionFault, FaultKind, RunOutcome};
pub use host::{Host, HostError, StepControl, TraceStep};
pub use vm::{execute, execute_scalar, execute_scalar_with_budget, execute_with_budget};
