//! The execution loop.
//!
//! Each step fetches the instruction at `pc`, pops exactly `argc` values,
//! shows the step to the trace hook when tracing is on, and dispatches.
//! Execution ends when `pc` reaches the program length.

use aq_ir::{Instruction, Opcode, Operand, Program};
use tracing::{debug, trace};

use crate::fault::{Abort, ExecutionFault, FaultKind, RunOutcome};
use crate::host::{Host, HostError, StepControl, TraceStep};

type Fault<H> = ExecutionFault<<H as Host>::Value>;

/// Run `program` to completion and return every value left on the stack,
/// top first.
#[tracing::instrument(level = "debug", skip_all, fields(len = program.len()))]
pub fn execute<H: Host>(
    program: &Program,
    host: &mut H,
) -> Result<RunOutcome<Vec<H::Value>>, Fault<H>> {
    Machine::new(program, host, None).run()
}

/// Like [`execute`], but abort once `budget` instructions have executed and
/// more remain.
#[tracing::instrument(level = "debug", skip_all, fields(len = program.len(), budget = budget))]
pub fn execute_with_budget<H: Host>(
    program: &Program,
    host: &mut H,
    budget: usize,
) -> Result<RunOutcome<Vec<H::Value>>, Fault<H>> {
    Machine::new(program, host, Some(budget)).run()
}

/// Run `program` and return only the last value produced, or the host's
/// absent value when the stack ends empty.
#[tracing::instrument(level = "debug", skip_all, fields(len = program.len()))]
pub fn execute_scalar<H: Host>(
    program: &Program,
    host: &mut H,
) -> Result<RunOutcome<H::Value>, Fault<H>> {
    Machine::new(program, host, None).run_scalar()
}

#[tracing::instrument(level = "debug", skip_all, fields(len = program.len(), budget = budget))]
pub fn execute_scalar_with_budget<H: Host>(
    program: &Program,
    host: &mut H,
    budget: usize,
) -> Result<RunOutcome<H::Value>, Fault<H>> {
    Machine::new(program, host, Some(budget)).run_scalar()
}

struct Machine<'a, H: Host> {
    program: &'a Program,
    host: &'a mut H,
    stack: Vec<H::Value>,
    pc: usize,
    steps: usize,
    budget: Option<usize>,
}

impl<'a, H: Host> Machine<'a, H> {
    fn new(program: &'a Program, host: &'a mut H, budget: Option<usize>) -> Self {
        Machine {
            program,
            host,
            stack: Vec::new(),
            pc: 0,
            steps: 0,
            budget,
        }
    }

    fn run(mut self) -> Result<RunOutcome<Vec<H::Value>>, Fault<H>> {
        Ok(self.run_loop()?.map(|()| {
            let mut values = self.stack;
            values.reverse();
            values
        }))
    }

    fn run_scalar(mut self) -> Result<RunOutcome<H::Value>, Fault<H>> {
        let outcome = self.run_loop()?;
        Ok(outcome.map(|()| match self.stack.pop() {
            Some(value) => value,
            None => self.host.absent(),
        }))
    }

    fn run_loop(&mut self) -> Result<RunOutcome<()>, Fault<H>> {
        let program = self.program;
        let tracing = self.host.start_trace(program);
        while let Some(instruction) = program.get(self.pc) {
            if self.budget.is_some_and(|budget| self.steps >= budget) {
                return Ok(self.abort());
            }
            let control = self.step(instruction, tracing)?;
            // An abort on the last step changes nothing; the run is complete
            if control == StepControl::Abort && program.get(self.pc).is_some() {
                return Ok(self.abort());
            }
        }
        debug!(steps = self.steps, values = self.stack.len(), "run completed");
        Ok(RunOutcome::Completed(()))
    }

    fn step(&mut self, instruction: &Instruction, tracing: bool) -> Result<StepControl, Fault<H>> {
        let pc = self.pc;
        let available = self.stack.len();
        if instruction.argc > available {
            return Err(self.fault(
                FaultKind::StackUnderflow {
                    needed: instruction.argc,
                    available,
                },
                instruction,
            ));
        }
        let args = self.stack.split_off(available - instruction.argc);
        trace!(pc, %instruction, depth = self.stack.len(), "step");

        let control = if tracing {
            self.host.step(&TraceStep {
                pc,
                instruction,
                args: &args,
                stack: &self.stack,
            })
        } else {
            StepControl::Continue
        };

        self.dispatch(instruction, args)?;
        self.steps += 1;
        Ok(control)
    }

    fn dispatch(&mut self, instruction: &Instruction, args: Vec<H::Value>) -> Result<(), Fault<H>> {
        let mut next = self.pc + 1;
        match (instruction.opcode, &instruction.operand) {
            (Opcode::NoOp | Opcode::Dump, Operand::None) => {}
            (Opcode::PushNull, Operand::None) => {
                let value = self.host.from_null();
                self.stack.push(value);
            }
            (Opcode::PushBool, Operand::Bool(b)) => {
                let value = self.host.from_bool(*b);
                self.stack.push(value);
            }
            (Opcode::PushInt, Operand::Int(n)) => {
                let value = self.host.from_int(*n);
                self.stack.push(value);
            }
            (Opcode::PushDouble, Operand::Double(d)) => {
                let value = self.host.from_double(*d);
                self.stack.push(value);
            }
            (Opcode::PushString, Operand::Str(s)) => {
                let value = self.host.from_string(s);
                self.stack.push(value);
            }
            (Opcode::PushParam, Operand::Str(name)) => {
                let value = self
                    .host
                    .eval_param(name)
                    .map_err(|err| self.host_fault(err, instruction))?;
                self.stack.push(value);
            }
            (Opcode::Call, Operand::Str(name)) => {
                let value = self
                    .host
                    .call_proc(name, args)
                    .map_err(|err| self.host_fault(err, instruction))?;
                self.stack.push(value);
            }
            (Opcode::Jump, Operand::Address(target)) => {
                next = self.check_target(*target, instruction)?;
            }
            (Opcode::JumpIfNot, Operand::Address(target)) => {
                let target = self.check_target(*target, instruction)?;
                let Some(condition) = args.last() else {
                    return Err(self.fault(
                        FaultKind::StackUnderflow {
                            needed: 1,
                            available: self.stack.len(),
                        },
                        instruction,
                    ));
                };
                if !self.host.is_truthy(condition) {
                    next = target;
                }
            }
            (opcode, operand) => {
                return Err(self.fault(
                    FaultKind::OperandMismatch {
                        opcode,
                        expected: opcode.operand_kind(),
                        found: operand.kind(),
                    },
                    instruction,
                ));
            }
        }
        self.pc = next;
        Ok(())
    }

    fn check_target(&self, target: usize, instruction: &Instruction) -> Result<usize, Fault<H>> {
        let len = self.program.len();
        if target >= len {
            return Err(self.fault(FaultKind::JumpOutOfBounds { target, len }, instruction));
        }
        Ok(target)
    }

    fn abort(&self) -> RunOutcome<()> {
        let abort = Abort {
            steps: self.steps,
            pc: self.pc,
        };
        debug!(steps = abort.steps, pc = abort.pc, "run aborted");
        RunOutcome::Aborted(abort)
    }

    #[cold]
    fn fault(&self, kind: FaultKind, instruction: &Instruction) -> Fault<H> {
        debug!(pc = self.pc, %kind, "execution fault");
        ExecutionFault::new(kind, instruction.clone(), self.pc, self.stack.clone())
    }

    /// Wrap a host failure; a fault from a nested run passes through as is.
    #[cold]
    fn host_fault(&self, err: HostError<H::Value>, instruction: &Instruction) -> Fault<H> {
        match err {
            HostError::FunctionNotFound { name } => {
                self.fault(FaultKind::FunctionNotFound { name }, instruction)
            }
            HostError::Failed { message } => self.fault(FaultKind::Host { message }, instruction),
            HostError::Fault(fault) => *fault,
        }
    }
}
