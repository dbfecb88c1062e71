//! Reference host.
//!
//! Procedures live in a name-to-function table; parameters are read-only and
//! come from the configuration, variables are read-write through `Set`/`Get`.
//! Everything the host prints (`Echo`, trace lines) goes to the output sink
//! `W`, which is stdout in the CLI and a `Vec<u8>` in tests.

use std::io::Write;

use aq_vm::{Host, HostError, Program, StepControl, TraceStep};
use rustc_hash::FxHashMap;

use crate::config::RunConfig;
use crate::value::AqValue;

mod procs;

/// A host procedure.
pub type Procedure<W> =
    fn(&mut ReferenceHost<W>, Vec<AqValue>) -> Result<AqValue, HostError<AqValue>>;

/// Stack values shown per trace step.
const TRACE_STACK_DEPTH: usize = 5;

pub struct ReferenceHost<W> {
    procs: FxHashMap<&'static str, Procedure<W>>,
    params: FxHashMap<String, AqValue>,
    vars: FxHashMap<String, AqValue>,
    trace: bool,
    trace_steps: usize,
    remaining_steps: usize,
    out: W,
}

impl<W: Write> ReferenceHost<W> {
    /// A host with the built-in procedures and no parameters.
    pub fn new(out: W) -> Self {
        let mut host = ReferenceHost {
            procs: FxHashMap::default(),
            params: FxHashMap::default(),
            vars: FxHashMap::default(),
            trace: false,
            trace_steps: 0,
            remaining_steps: 0,
            out,
        };
        host.register("Add", procs::add);
        host.register("Echo", procs::echo);
        host.register("Equal", procs::equal);
        host.register("Not", procs::not);
        host.register("Concat", procs::concat);
        host.register("Set", procs::set);
        host.register("Get", procs::get);
        host
    }

    /// A host seeded with the configuration's parameters, variables and
    /// trace settings.
    pub fn with_config(config: &RunConfig, out: W) -> Self {
        let mut host = Self::new(out);
        for (name, value) in &config.parameters {
            host.set_param(name.clone(), value.clone());
        }
        for (name, value) in &config.initial_variables {
            host.set_var(name.clone(), value.clone());
        }
        host.trace = config.trace;
        host.trace_steps = config.effective_trace_steps();
        host
    }

    pub fn register(&mut self, name: &'static str, procedure: Procedure<W>) {
        self.procs.insert(name, procedure);
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<AqValue>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<AqValue>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn var(&self, name: &str) -> Option<&AqValue> {
        self.vars.get(name)
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn write_line(&mut self, line: &str) -> Result<(), HostError<AqValue>> {
        writeln!(self.out, "{line}").map_err(|err| HostError::failed(format!("output failed: {err}")))
    }

    fn trace_step(&mut self, step: &TraceStep<'_, AqValue>) -> std::io::Result<()> {
        let top: Vec<String> = step
            .stack
            .iter()
            .rev()
            .take(TRACE_STACK_DEPTH)
            .map(ToString::to_string)
            .collect();
        writeln!(self.out, "ST:{}", top.join(" "))?;
        let args: Vec<String> = step.args.iter().map(ToString::to_string).collect();
        writeln!(
            self.out,
            "#{}: {}[{}] ({})",
            step.pc,
            step.instruction.opcode,
            step.instruction.operand,
            args.join(",")
        )
    }
}

impl<W: Write> Host for ReferenceHost<W> {
    type Value = AqValue;

    fn from_null(&self) -> AqValue {
        AqValue::Null
    }

    fn from_bool(&self, value: bool) -> AqValue {
        AqValue::Bool(value)
    }

    fn from_int(&self, value: i64) -> AqValue {
        AqValue::Int(value)
    }

    fn from_double(&self, value: f64) -> AqValue {
        AqValue::Double(value)
    }

    fn from_string(&self, value: &str) -> AqValue {
        AqValue::Str(value.to_string())
    }

    fn eval_param(&self, name: &str) -> Result<AqValue, HostError<AqValue>> {
        Ok(self.params.get(name).cloned().unwrap_or_default())
    }

    fn call_proc(
        &mut self,
        name: &str,
        args: Vec<AqValue>,
    ) -> Result<AqValue, HostError<AqValue>> {
        let Some(procedure) = self.procs.get(name).copied() else {
            return Err(HostError::not_found(name));
        };
        procedure(self, args)
    }

    fn is_truthy(&self, value: &AqValue) -> bool {
        value.is_truthy()
    }

    fn start_trace(&mut self, _program: &Program) -> bool {
        if !self.trace {
            return false;
        }
        self.remaining_steps = self.trace_steps;
        writeln!(self.out, "Tracing enabled.").is_ok()
    }

    fn step(&mut self, step: &TraceStep<'_, AqValue>) -> StepControl {
        if self.trace_step(step).is_err() {
            return StepControl::Abort;
        }
        self.remaining_steps = self.remaining_steps.saturating_sub(1);
        if self.remaining_steps == 0 {
            StepControl::Abort
        } else {
            StepControl::Continue
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
