//! Built-in procedures of the reference host.

use std::io::Write;

use aq_vm::HostError;

use super::ReferenceHost;
use crate::value::AqValue;

type ProcResult = Result<AqValue, HostError<AqValue>>;

#[cold]
fn arity(name: &str, expected: usize, got: usize) -> HostError<AqValue> {
    let word = if expected == 1 { "argument" } else { "arguments" };
    HostError::failed(format!("{name} expects {expected} {word}, got {got}"))
}

/// Sum of the arguments. Any double makes the sum a double; non-numbers
/// count as zero.
#[allow(clippy::cast_precision_loss, clippy::needless_pass_by_value)]
pub(super) fn add<W: Write>(_host: &mut ReferenceHost<W>, args: Vec<AqValue>) -> ProcResult {
    if args.iter().any(|v| matches!(v, AqValue::Double(_))) {
        let sum = args
            .iter()
            .map(|v| match v {
                AqValue::Int(n) => *n as f64,
                AqValue::Double(d) => *d,
                _ => 0.0,
            })
            .sum();
        return Ok(AqValue::Double(sum));
    }
    let mut sum: i64 = 0;
    for value in &args {
        if let AqValue::Int(n) = value {
            sum = sum
                .checked_add(*n)
                .ok_or_else(|| HostError::failed("integer overflow in Add"))?;
        }
    }
    Ok(AqValue::Int(sum))
}

/// Print each argument on its own line; returns the argument count.
pub(super) fn echo<W: Write>(host: &mut ReferenceHost<W>, args: Vec<AqValue>) -> ProcResult {
    for value in &args {
        let line = if value.is_null() {
            "echo: null".to_string()
        } else {
            format!("echo:{value}")
        };
        host.write_line(&line)?;
    }
    Ok(AqValue::Int(i64::try_from(args.len()).unwrap_or(i64::MAX)))
}

/// Loose equality: null never equals anything, numbers and booleans compare
/// numerically, everything else compares as text.
#[allow(clippy::float_cmp, clippy::needless_pass_by_value)]
pub(super) fn equal<W: Write>(_host: &mut ReferenceHost<W>, args: Vec<AqValue>) -> ProcResult {
    let [a, b] = args.as_slice() else {
        return Err(arity("Equal", 2, args.len()));
    };
    let equal = if a.is_null() || b.is_null() {
        false
    } else if matches!(a, AqValue::Double(_)) || matches!(b, AqValue::Double(_)) {
        as_f64(a)? == as_f64(b)?
    } else if is_integral(a) || is_integral(b) {
        as_i64(a)? == as_i64(b)?
    } else {
        a.text() == b.text()
    };
    Ok(AqValue::Bool(equal))
}

#[allow(clippy::needless_pass_by_value)]
pub(super) fn not<W: Write>(_host: &mut ReferenceHost<W>, args: Vec<AqValue>) -> ProcResult {
    match args.as_slice() {
        [value] => Ok(AqValue::Bool(!value.is_truthy())),
        _ => Err(arity("Not", 1, args.len())),
    }
}

#[allow(clippy::needless_pass_by_value)]
pub(super) fn concat<W: Write>(_host: &mut ReferenceHost<W>, args: Vec<AqValue>) -> ProcResult {
    Ok(AqValue::Str(args.iter().map(AqValue::text).collect()))
}

/// `Set(name, value)` stores a variable and returns the value.
pub(super) fn set<W: Write>(host: &mut ReferenceHost<W>, args: Vec<AqValue>) -> ProcResult {
    let got = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next(), args.next()) {
        (Some(AqValue::Str(name)), Some(value), None) => {
            host.set_var(name, value.clone());
            Ok(value)
        }
        (Some(other), Some(_), None) => Err(variable_name("Set", &other)),
        _ => Err(arity("Set", 2, got)),
    }
}

/// `Get(name)` reads a variable; unset variables are null.
#[allow(clippy::needless_pass_by_value)]
pub(super) fn get<W: Write>(host: &mut ReferenceHost<W>, args: Vec<AqValue>) -> ProcResult {
    match args.as_slice() {
        [AqValue::Str(name)] => Ok(host.var(name).cloned().unwrap_or_default()),
        [other] => Err(variable_name("Get", other)),
        _ => Err(arity("Get", 1, args.len())),
    }
}

#[cold]
fn variable_name(proc: &str, value: &AqValue) -> HostError<AqValue> {
    HostError::failed(format!(
        "{proc} expects a variable name, got {}",
        value.type_name()
    ))
}

fn is_integral(value: &AqValue) -> bool {
    matches!(value, AqValue::Int(_) | AqValue::Bool(_))
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(value: &AqValue) -> Result<f64, HostError<AqValue>> {
    match value {
        AqValue::Int(n) => Ok(*n as f64),
        AqValue::Double(d) => Ok(*d),
        AqValue::Bool(b) => Ok(f64::from(u8::from(*b))),
        AqValue::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| HostError::failed(format!("cannot compare '{s}' as a number"))),
        AqValue::Null => Ok(0.0),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn as_i64(value: &AqValue) -> Result<i64, HostError<AqValue>> {
    match value {
        AqValue::Int(n) => Ok(*n),
        AqValue::Bool(b) => Ok(i64::from(*b)),
        AqValue::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| HostError::failed(format!("cannot compare '{s}' as a number"))),
        AqValue::Double(_) | AqValue::Null => as_f64(value).map(|d| d as i64),
    }
}
