//! JSON run configuration.
//!
//! ```json
//! {
//!   "Trace": true,
//!   "TraceSteps": 20,
//!   "Parameters": { "a": 1, "name": "world" },
//!   "InitialVariables": { "count": 0 },
//!   "HardLimit": 10000,
//!   "DumpProgram": false
//! }
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Trace steps printed before the trace stops the run, when unset.
pub const DEFAULT_TRACE_STEPS: usize = 100;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RunConfig {
    /// Print every executed step.
    pub trace: bool,
    /// Number of traced steps before the run is aborted; 0 means the default.
    pub trace_steps: usize,
    /// Read-only values resolved by bare names in the script.
    pub parameters: FxHashMap<String, serde_json::Value>,
    /// Starting contents of the `Set`/`Get` variable store.
    pub initial_variables: FxHashMap<String, serde_json::Value>,
    /// Step budget for a run; 0 means unlimited.
    pub hard_limit: usize,
    /// Print the disassembly instead of running.
    pub dump_program: bool,
}

impl RunConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), trace = config.trace, "loaded config");
        Ok(config)
    }

    pub fn effective_trace_steps(&self) -> usize {
        if self.trace_steps == 0 {
            DEFAULT_TRACE_STEPS
        } else {
            self.trace_steps
        }
    }

    /// The step budget, if any.
    pub fn budget(&self) -> Option<usize> {
        (self.hard_limit > 0).then_some(self.hard_limit)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read configuration '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}
