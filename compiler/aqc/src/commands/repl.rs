//! The `repl` command: evaluate one expression per input line.
//!
//! Every line is compiled, disassembled and run against the same host, so
//! variables set on one line are visible on the next. An empty line ends the
//! session.

use std::io::{self, BufRead, Write};

use aq_compile::compile;
use aq_vm::{execute_scalar, execute_scalar_with_budget, RunOutcome};

use super::{load_config, RunStatus};
use crate::config::RunConfig;
use crate::host::ReferenceHost;
use crate::report::render_compile_error;

pub fn repl(config: Option<&str>) {
    let config = load_config(config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = run_repl(stdin.lock(), &mut stdout.lock(), &config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Read lines from `input` until an empty line or end of input.
///
/// Errors on individual lines are printed and the session continues.
pub fn run_repl<R: BufRead, W: Write>(input: R, out: &mut W, config: &RunConfig) -> io::Result<()> {
    let mut host = ReferenceHost::with_config(config, out);
    writeln!(
        host.output_mut(),
        "Enter an expression, or an empty line to exit."
    )?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        eval_line(&line, config, &mut host)?;
        host.output_mut().flush()?;
    }

    writeln!(host.output_mut(), "Exiting ...")
}

fn eval_line<W: Write>(
    line: &str,
    config: &RunConfig,
    host: &mut ReferenceHost<W>,
) -> io::Result<RunStatus> {
    let program = match compile(line) {
        Ok(program) => program,
        Err(err) => {
            write!(host.output_mut(), "{}", render_compile_error(line, "<input>", &err))?;
            return Ok(RunStatus::CompileError);
        }
    };
    write!(host.output_mut(), "{program}")?;

    let result = match config.budget() {
        Some(budget) => execute_scalar_with_budget(&program, host, budget),
        None => execute_scalar(&program, host),
    };
    let out = host.output_mut();
    match result {
        Ok(RunOutcome::Completed(value)) => {
            writeln!(out, "result = {value}")?;
            Ok(RunStatus::Completed)
        }
        Ok(RunOutcome::Aborted(abort)) => {
            writeln!(out, "{abort}")?;
            Ok(RunStatus::Aborted)
        }
        Err(fault) => {
            writeln!(out, "runtime error: {fault}")?;
            Ok(RunStatus::Fault)
        }
    }
}
