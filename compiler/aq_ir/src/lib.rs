//! ActionQuery IR - Instructions and Programs
//!
//! This crate holds the bytecode model shared by the compiler and the VM:
//! - `Opcode` / `Operand` / `Instruction`: one fixed-shape bytecode step
//! - `ProgramBuilder`: append-only build buffer with backpatchable jumps
//! - `Program`: the sealed, immutable instruction sequence
//!
//! # Design Philosophy
//!
//! - **Host-independent**: nothing here knows the host's value type. Literals
//!   are stored as plain Rust scalars and turned into host values by the VM.
//! - **Arena-then-freeze**: programs are assembled in a `ProgramBuilder` and
//!   sealed by value, so a `Program` can never be mutated after compilation.
//! - **Cheap sharing**: `Program` clones share one allocation and are
//!   `Send + Sync`, so a single compile can back any number of runs.

mod instruction;
mod program;

pub use instruction::{Instruction, Opcode, Operand, OperandKind};
pub use program::{PatchError, Program, ProgramBuilder};
