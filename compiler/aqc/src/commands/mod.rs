//! Command handlers for the `aqc` CLI.
//!
//! Each submodule implements one command. The `*_source` functions do the
//! work against any writer and report a [`RunStatus`]; the `*_file` wrappers
//! read files, print to stdout and turn failures into exit code 1.

use crate::config::RunConfig;

mod debug;
mod repl;
mod run;

pub use debug::{dump_file, dump_source, lex_file, lex_source};
pub use repl::{repl, run_repl};
pub use run::{run_file, run_source};

/// How a command ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunStatus {
    /// Ran to completion (or only disassembled).
    Completed,
    /// Stopped by the trace step limit or the step budget.
    Aborted,
    CompileError,
    Fault,
}

impl RunStatus {
    /// Whether the process should exit successfully.
    pub fn is_success(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Aborted)
    }
}

/// Read a file to a string, exiting the process with a message on failure.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Load the optional configuration file, exiting the process on failure.
pub(crate) fn load_config(path: Option<&str>) -> RunConfig {
    let Some(path) = path else {
        return RunConfig::default();
    };
    match RunConfig::load(path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Exit with code 1 unless `status` is a success.
pub(crate) fn exit_with(status: std::io::Result<RunStatus>) {
    match status {
        Ok(status) if status.is_success() => {}
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: cannot write output: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
