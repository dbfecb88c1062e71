//! Program build buffer and sealed programs.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use crate::{Instruction, Operand};

/// Error when backpatching a jump operand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PatchError {
    /// No instruction exists at the address.
    OutOfRange { at: usize, len: usize },
    /// The instruction at the address is not a jump.
    NotAJump { at: usize },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::OutOfRange { at, len } => {
                write!(f, "cannot patch address {at}: program has {len} instructions")
            }
            PatchError::NotAJump { at } => {
                write!(f, "cannot patch address {at}: instruction is not a jump")
            }
        }
    }
}

impl std::error::Error for PatchError {}

/// Append-only instruction buffer used while compiling.
///
/// Addresses handed out by [`emit`](Self::emit) stay valid for the lifetime of
/// the builder. Jump operands may be rewritten with
/// [`patch_target`](Self::patch_target) until the builder is sealed.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    instructions: Vec<Instruction>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the next emitted instruction will receive.
    #[inline]
    pub fn address(&self) -> usize {
        self.instructions.len()
    }

    /// Append an instruction and return its address.
    pub fn emit(&mut self, instruction: Instruction) -> usize {
        let address = self.instructions.len();
        self.instructions.push(instruction);
        address
    }

    /// Rewrite the target of the jump at `at`.
    pub fn patch_target(&mut self, at: usize, target: usize) -> Result<(), PatchError> {
        let len = self.instructions.len();
        let instruction = self
            .instructions
            .get_mut(at)
            .ok_or(PatchError::OutOfRange { at, len })?;
        if !instruction.opcode.is_jump() {
            return Err(PatchError::NotAJump { at });
        }
        instruction.operand = Operand::Address(target);
        Ok(())
    }

    /// Whether any emitted jump targets `address`.
    pub fn is_jump_target(&self, address: usize) -> bool {
        self.instructions
            .iter()
            .any(|instruction| instruction.jump_target() == Some(address))
    }

    /// Freeze the buffer into an immutable program.
    pub fn seal(self) -> Program {
        Program {
            instructions: self.instructions.into(),
        }
    }
}

/// A sealed, immutable instruction sequence.
///
/// Programs produced by the compiler only jump to addresses inside the
/// program; the VM faults on any other target.
///
/// Cloning is cheap (the instructions are shared), and a program may be
/// executed any number of times, from any number of threads.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    instructions: Arc<[Instruction]>,
}

impl Program {
    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at a program counter.
    #[inline]
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Human-readable disassembly.
    ///
    /// One line per instruction, prefixed with its address. Addresses that
    /// are the target of some jump are marked with `>`. The format is for
    /// diagnostics only and may change.
    pub fn dump(&self) -> String {
        if self.is_empty() {
            return "(empty program)\n".to_string();
        }
        let targets: Vec<usize> = self.iter().filter_map(Instruction::jump_target).collect();
        let mut out = String::new();
        for (pc, instruction) in self.iter().enumerate() {
            let marker = if targets.contains(&pc) { '>' } else { ' ' };
            // Writing to a String cannot fail
            let _ = writeln!(out, "{pc:04} {marker} {instruction}");
        }
        out
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests;
