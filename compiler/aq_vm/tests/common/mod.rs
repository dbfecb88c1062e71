//! Host shared by the integration tests.

#![allow(dead_code)]

use aq_vm::{Host, HostError};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum V {
    Null,
    Bool(bool),
    Num(f64),
    Text(String),
}

/// Numbers are all `f64`; variables live in the host.
#[derive(Default)]
pub struct Calc {
    pub params: HashMap<String, V>,
    pub vars: HashMap<String, V>,
    pub calls: usize,
}

impl Calc {
    pub fn with_param(mut self, name: &str, value: V) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }
}

fn num(v: &V) -> f64 {
    match v {
        V::Num(n) => *n,
        V::Bool(true) => 1.0,
        _ => 0.0,
    }
}

impl Host for Calc {
    type Value = V;

    fn from_null(&self) -> V {
        V::Null
    }
    fn from_bool(&self, value: bool) -> V {
        V::Bool(value)
    }
    #[allow(clippy::cast_precision_loss)]
    fn from_int(&self, value: i64) -> V {
        V::Num(value as f64)
    }
    fn from_double(&self, value: f64) -> V {
        V::Num(value)
    }
    fn from_string(&self, value: &str) -> V {
        V::Text(value.to_string())
    }

    fn eval_param(&self, name: &str) -> Result<V, HostError<V>> {
        Ok(self.params.get(name).cloned().unwrap_or_else(|| self.absent()))
    }

    fn call_proc(&mut self, name: &str, args: Vec<V>) -> Result<V, HostError<V>> {
        self.calls += 1;
        match (name, args.as_slice()) {
            ("Add", args) => Ok(V::Num(args.iter().map(num).sum())),
            ("Less", [a, b]) => Ok(V::Bool(num(a) < num(b))),
            ("Set", [V::Text(var), value]) => {
                self.vars.insert(var.clone(), value.clone());
                Ok(value.clone())
            }
            ("Get", [V::Text(var)]) => Ok(self.vars.get(var).cloned().unwrap_or(V::Null)),
            ("Less" | "Set" | "Get", _) => Err(HostError::failed(format!("bad arguments to {name}"))),
            _ => Err(HostError::not_found(name)),
        }
    }

    fn is_truthy(&self, value: &V) -> bool {
        match value {
            V::Null => false,
            V::Bool(b) => *b,
            V::Num(n) => *n != 0.0,
            V::Text(s) => !s.is_empty(),
        }
    }
}
