//! The host contract.
//!
//! A host decides what a value is. The VM only moves values between the
//! stack and the host, so the same program can run against hosts with
//! completely different value models.

use std::fmt;

use aq_ir::{Instruction, Program};

use crate::fault::ExecutionFault;

/// Capabilities the VM needs from its embedding application.
#[allow(clippy::wrong_self_convention)]
pub trait Host {
    /// The host's value representation.
    type Value: Clone + fmt::Debug + 'static;

    fn from_null(&self) -> Self::Value;
    fn from_bool(&self, value: bool) -> Self::Value;
    fn from_int(&self, value: i64) -> Self::Value;
    fn from_double(&self, value: f64) -> Self::Value;
    fn from_string(&self, value: &str) -> Self::Value;

    /// Value standing in for "nothing": the result of an empty scalar run
    /// and of unknown parameters.
    fn absent(&self) -> Self::Value {
        self.from_null()
    }

    /// Resolve a named parameter. Unknown names should yield [`Host::absent`].
    fn eval_param(&self, name: &str) -> Result<Self::Value, HostError<Self::Value>>;

    /// Call a named procedure with its arguments in push order.
    ///
    /// Unknown names fail with [`HostError::FunctionNotFound`].
    fn call_proc(
        &mut self,
        name: &str,
        args: Vec<Self::Value>,
    ) -> Result<Self::Value, HostError<Self::Value>>;

    fn is_truthy(&self, value: &Self::Value) -> bool;

    /// Called once before the first step. Returning `true` enables
    /// [`Host::step`] for this run.
    fn start_trace(&mut self, program: &Program) -> bool {
        let _ = program;
        false
    }

    /// Observe one step before it executes.
    ///
    /// [`StepControl::Abort`] ends the run after this step completes. An
    /// abort on the program's last step has no effect.
    fn step(&mut self, step: &TraceStep<'_, Self::Value>) -> StepControl {
        let _ = step;
        StepControl::Continue
    }
}

/// One step as seen by the trace hook.
#[derive(Debug)]
pub struct TraceStep<'a, V> {
    pub pc: usize,
    pub instruction: &'a Instruction,
    /// Values consumed by this step, in push order.
    pub args: &'a [V],
    /// The stack below the consumed values, bottom first.
    pub stack: &'a [V],
}

/// Trace hook decision.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StepControl {
    Continue,
    Abort,
}

/// Failure reported by a host callback.
#[derive(Debug, thiserror::Error)]
pub enum HostError<V: fmt::Debug + 'static> {
    #[error("function not found: {name}")]
    FunctionNotFound { name: String },

    #[error("{message}")]
    Failed { message: String },

    /// A fault raised by a nested run; the VM re-raises it unchanged.
    #[error(transparent)]
    Fault(Box<ExecutionFault<V>>),
}

impl<V: fmt::Debug + 'static> HostError<V> {
    #[cold]
    pub fn not_found(name: impl Into<String>) -> Self {
        HostError::FunctionNotFound { name: name.into() }
    }

    #[cold]
    pub fn failed(message: impl Into<String>) -> Self {
        HostError::Failed {
            message: message.into(),
        }
    }
}

impl<V: fmt::Debug + 'static> From<ExecutionFault<V>> for HostError<V> {
    fn from(fault: ExecutionFault<V>) -> Self {
        HostError::Fault(Box::new(fault))
    }
}
