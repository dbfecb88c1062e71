//! The `run` command: compile a script and execute it with the reference host.

use std::io::{self, Write};

use aq_compile::compile;
use aq_vm::{execute_scalar, execute_scalar_with_budget, RunOutcome};

use super::{exit_with, load_config, read_file, RunStatus};
use crate::config::RunConfig;
use crate::host::ReferenceHost;
use crate::report::render_compile_error;

/// Run a script file, optionally configured by a JSON file.
pub fn run_file(script: &str, config: Option<&str>) {
    let source = read_file(script);
    let config = load_config(config);
    let stdout = io::stdout();
    exit_with(run_source(&source, script, &config, &mut stdout.lock()));
}

/// Compile and run `source`, writing everything it prints to `out`.
///
/// With `DumpProgram` set the disassembly is printed instead of running.
pub fn run_source<W: Write>(
    source: &str,
    path: &str,
    config: &RunConfig,
    out: &mut W,
) -> io::Result<RunStatus> {
    let program = match compile(source) {
        Ok(program) => program,
        Err(err) => {
            write!(out, "{}", render_compile_error(source, path, &err))?;
            return Ok(RunStatus::CompileError);
        }
    };

    if config.dump_program {
        write!(out, "{program}")?;
        return Ok(RunStatus::Completed);
    }

    let mut host = ReferenceHost::with_config(config, &mut *out);
    let result = match config.budget() {
        Some(budget) => execute_scalar_with_budget(&program, &mut host, budget),
        None => execute_scalar(&program, &mut host),
    };

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
