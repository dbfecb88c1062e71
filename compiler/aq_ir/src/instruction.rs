//! Bytecode instructions.
//!
//! Every instruction has the same shape: an opcode, an operand whose type is
//! fixed by the opcode, and the number of stack values it consumes.

use std::fmt;

/// The operation performed by an instruction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Opcode {
    /// Advance without effect.
    NoOp,
    /// Push a boolean literal.
    PushBool,
    /// Push an integer literal.
    PushInt,
    /// Push a double literal.
    PushDouble,
    /// Push a string literal.
    PushString,
    /// Push the host's null value.
    PushNull,
    /// Push the value of a named host parameter.
    PushParam,
    /// Call a named host procedure with `argc` stack values.
    Call,
    /// Unconditional jump to an absolute address.
    Jump,
    /// Pop one value; jump to the target when it is falsy.
    JumpIfNot,
    /// Reserved for diagnostics; behaves like `NoOp`.
    Dump,
}

impl Opcode {
    /// Mnemonic used in disassembly and trace output.
    pub const fn name(self) -> &'static str {
        match self {
            Opcode::NoOp => "NoOp",
            Opcode::PushBool => "PushBool",
            Opcode::PushInt => "PushInt",
            Opcode::PushDouble => "PushDouble",
            Opcode::PushString => "PushString",
            Opcode::PushNull => "PushNull",
            Opcode::PushParam => "PushParam",
            Opcode::Call => "Call",
            Opcode::Jump => "Jump",
            Opcode::JumpIfNot => "JumpIfNot",
            Opcode::Dump => "Dump",
        }
    }

    /// The operand shape this opcode requires.
    pub const fn operand_kind(self) -> OperandKind {
        match self {
            Opcode::NoOp | Opcode::PushNull | Opcode::Dump => OperandKind::None,
            Opcode::PushBool => OperandKind::Bool,
            Opcode::PushInt => OperandKind::Int,
            Opcode::PushDouble => OperandKind::Double,
            Opcode::PushString | Opcode::PushParam | Opcode::Call => OperandKind::Str,
            Opcode::Jump | Opcode::JumpIfNot => OperandKind::Address,
        }
    }

    /// Whether the operand is a program address (and thus patchable).
    #[inline]
    pub const fn is_jump(self) -> bool {
        matches!(self, Opcode::Jump | Opcode::JumpIfNot)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discriminant of an `Operand`, used for operand type checks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OperandKind {
    None,
    Bool,
    Int,
    Double,
    Str,
    Address,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperandKind::None => "no operand",
            OperandKind::Bool => "bool",
            OperandKind::Int => "int",
            OperandKind::Double => "double",
            OperandKind::Str => "string",
            OperandKind::Address => "address",
        };
        f.write_str(name)
    }
}

/// Instruction payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    None,
    Bool(bool),
    Int(i64),
    Double(f64),
    /// String literal, parameter name, or procedure name.
    Str(String),
    /// Absolute instruction address. `len` of the program means "halt".
    Address(usize),
}

impl Operand {
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::None => OperandKind::None,
            Operand::Bool(_) => OperandKind::Bool,
            Operand::Int(_) => OperandKind::Int,
            Operand::Double(_) => OperandKind::Double,
            Operand::Str(_) => OperandKind::Str,
            Operand::Address(_) => OperandKind::Address,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Bool(b) => write!(f, "{b}"),
            Operand::Int(n) => write!(f, "{n}"),
            // Debug keeps the fractional part visible (`3.0`, not `3`)
            Operand::Double(d) => write!(f, "{d:?}"),
            Operand::Str(s) => f.write_str(s),
            Operand::Address(target) => write!(f, "->{target}"),
        }
    }
}

/// One bytecode step.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Operand,
    /// Number of stack values this instruction consumes.
    pub argc: usize,
}

impl Instruction {
    /// Build an instruction from raw parts.
    ///
    /// No shape checking happens here; the VM reports an operand that does
    /// not match its opcode as a fault when the instruction executes.
    pub fn new(opcode: Opcode, operand: Operand, argc: usize) -> Self {
        Instruction {
            opcode,
            operand,
            argc,
        }
    }

    pub fn no_op() -> Self {
        Self::new(Opcode::NoOp, Operand::None, 0)
    }

    pub fn push_bool(value: bool) -> Self {
        Self::new(Opcode::PushBool, Operand::Bool(value), 0)
    }

    pub fn push_int(value: i64) -> Self {
        Self::new(Opcode::PushInt, Operand::Int(value), 0)
    }

    pub fn push_double(value: f64) -> Self {
        Self::new(Opcode::PushDouble, Operand::Double(value), 0)
    }

    pub fn push_string(value: impl Into<String>) -> Self {
        Self::new(Opcode::PushString, Operand::Str(value.into()), 0)
    }

    pub fn push_null() -> Self {
        Self::new(Opcode::PushNull, Operand::None, 0)
    }

    pub fn push_param(name: impl Into<String>) -> Self {
        Self::new(Opcode::PushParam, Operand::Str(name.into()), 0)
    }

    pub fn call(name: impl Into<String>, argc: usize) -> Self {
        Self::new(Opcode::Call, Operand::Str(name.into()), argc)
    }

    pub fn jump(target: usize) -> Self {
        Self::new(Opcode::Jump, Operand::Address(target), 0)
    }

    pub fn jump_if_not(target: usize) -> Self {
        Self::new(Opcode::JumpIfNot, Operand::Address(target), 1)
    }

    pub fn dump() -> Self {
        Self::new(Opcode::Dump, Operand::None, 0)
    }

    /// Jump target, if this is a jump with an address operand.
    pub fn jump_target(&self) -> Option<usize> {
        match (self.opcode.is_jump(), &self.operand) {
            (true, Operand::Address(target)) => Some(*target),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.name())?;
        match &self.operand {
            Operand::None => {}
            Operand::Str(s) if self.opcode == Opcode::PushString => {
                write!(f, " '{}'", s.replace('\'', "\\'"))?;
            }
            operand => write!(f, " {operand}")?,
        }
        match self.argc {
            0 => Ok(()),
            1 => write!(f, " (1 arg)"),
            n => write!(f, " ({n} args)"),
        }
    }
}
