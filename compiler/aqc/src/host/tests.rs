use super::*;
use aq_compile::compile;
use aq_vm::{execute_scalar, FaultKind, RunOutcome};
use pretty_assertions::assert_eq;

fn host() -> ReferenceHost<Vec<u8>> {
    ReferenceHost::new(Vec::new())
}

fn eval(source: &str, host: &mut ReferenceHost<Vec<u8>>) -> AqValue {
    let program = compile(source).unwrap();
    execute_scalar(&program, host).unwrap().completed().unwrap()
}

fn output(host: &ReferenceHost<Vec<u8>>) -> String {
    String::from_utf8(host.output().clone()).unwrap()
}

// === Procedures ===

#[test]
fn add_integers_and_doubles() {
    assert_eq!(eval("Add(1, 2, 3)", &mut host()), AqValue::Int(6));
    assert_eq!(eval("Add(1, 2.5)", &mut host()), AqValue::Double(3.5));
    assert_eq!(eval("Add(1, 'x', true, null)", &mut host()), AqValue::Int(1));
    assert_eq!(eval("Add()", &mut host()), AqValue::Int(0));
}

#[test]
fn add_overflow_fails() {
    let program = compile("Add(9223372036854775807, 1)").unwrap();
    let fault = execute_scalar(&program, &mut host()).unwrap_err();
    assert_eq!(
        fault.kind,
        FaultKind::Host {
            message: "integer overflow in Add".to_string()
        }
    );
}

#[test]
fn echo_prints_each_argument() {
    let mut host = host();
    assert_eq!(eval("Echo('hi', 2, null)", &mut host), AqValue::Int(3));
    assert_eq!(output(&host), "echo:hi\necho:2\necho: null\n");
}

#[test]
fn equal_semantics() {
    let mut host = host();
    assert_eq!(eval("Equal(1, 1.0)", &mut host), AqValue::Bool(true));
    assert_eq!(eval("Equal(1, '1')", &mut host), AqValue::Bool(true));
    assert_eq!(eval("Equal(true, 1)", &mut host), AqValue::Bool(true));
    assert_eq!(eval("Equal('a', 'a')", &mut host), AqValue::Bool(true));
    assert_eq!(eval("Equal('a', 'b')", &mut host), AqValue::Bool(false));
    assert_eq!(eval("Equal(null, null)", &mut host), AqValue::Bool(false));
}

#[test]
fn equal_checks_arity() {
    let program = compile("Equal(1)").unwrap();
    let fault = execute_scalar(&program, &mut host()).unwrap_err();
    assert_eq!(
        fault.kind,
        FaultKind::Host {
            message: "Equal expects 2 arguments, got 1".to_string()
        }
    );
}

#[test]
fn not_negates_truthiness() {
    let mut host = host();
    assert_eq!(eval("Not(0)", &mut host), AqValue::Bool(true));
    assert_eq!(eval("Not('  ')", &mut host), AqValue::Bool(true));
    assert_eq!(eval("Not('x')", &mut host), AqValue::Bool(false));
    assert_eq!(eval("Not(0.5)", &mut host), AqValue::Bool(false));
}

#[test]
fn concat_uses_display_forms() {
    assert_eq!(
        eval("Concat('a', 1, null, true, 2.5)", &mut host()),
        AqValue::Str("a1true2.5".to_string())
    );
}

#[test]
fn variables_round_trip() {
    let mut host = host();
    assert_eq!(eval("Set('x', 5)", &mut host), AqValue::Int(5));
    assert_eq!(eval("Get('x')", &mut host), AqValue::Int(5));
    assert_eq!(eval("Get('unset')", &mut host), AqValue::Null);
    assert_eq!(host.var("x"), Some(&AqValue::Int(5)));
}

#[test]
fn set_requires_name() {
    let program = compile("Set(1, 2)").unwrap();
    let fault = execute_scalar(&program, &mut host()).unwrap_err();
    assert_eq!(fault.to_string(), "Set expects a variable name, got int at #2: Call Set (2 args)");
}

#[test]
fn unknown_procedure() {
    let program = compile("Missing()").unwrap();
    let fault = execute_scalar(&program, &mut host()).unwrap_err();
    assert_eq!(
        fault.kind,
        FaultKind::FunctionNotFound {
            name: "Missing".to_string()
        }
    );
}

#[test]
fn custom_procedures_can_be_registered() {
    fn twice(
        _host: &mut ReferenceHost<Vec<u8>>,
        args: Vec<AqValue>,
    ) -> Result<AqValue, HostError<AqValue>> {
        match args.as_slice() {
            [AqValue::Int(n)] => Ok(AqValue::Int(n * 2)),
            _ => Err(HostError::failed("Twice expects an int")),
        }
    }
    let mut host = host();
    host.register("Twice", twice);
    assert_eq!(eval("Twice(21)", &mut host), AqValue::Int(42));
}

// === Configuration ===

#[test]
fn parameters_and_variables_from_config() {
    let config = RunConfig::from_json(
        r#"{ "Parameters": { "a": 2, "name": "aq" }, "InitialVariables": { "n": 1.5 } }"#,
    )
    .unwrap();
    let mut host = ReferenceHost::with_config(&config, Vec::new());
    assert_eq!(eval("Add(a, Get('n'))", &mut host), AqValue::Double(3.5));
    assert_eq!(eval("Concat('hi ', name)", &mut host), AqValue::Str("hi aq".to_string()));
    assert_eq!(eval("missing", &mut host), AqValue::Null);
}

#[test]
fn loop_with_variables() {
    let mut host = host();
    let result = eval(
        "Set('i', 0), while(Not(Equal(Get('i'), 3)), Echo(Get('i')), Set('i', Add(Get('i'), 1))), Get('i')",
        &mut host,
    );
    assert_eq!(result, AqValue::Int(3));
    assert_eq!(output(&host), "echo:0\necho:1\necho:2\n");
}

// === Tracing ===

#[test]
fn trace_prints_steps_and_stops_after_limit() {
    let config = RunConfig::from_json(r#"{ "Trace": true, "TraceSteps": 3 }"#).unwrap();
    let mut host = ReferenceHost::with_config(&config, Vec::new());
    let program = compile("Add(1, 2), 'never'").unwrap();
    let outcome = execute_scalar(&program, &mut host).unwrap();
    assert!(matches!(outcome, RunOutcome::Aborted(abort) if abort.steps == 3));
    assert_eq!(
        output(&host),
        "Tracing enabled.\n\
         ST:\n\
         #0: PushInt[1] ()\n\
         ST:1\n\
         #1: PushInt[2] ()\n\
         ST:\n\
         #2: Call[Add] (1,2)\n"
    );
}

#[test]
fn trace_limit_reached_on_last_step_completes() {
    let config = RunConfig::from_json(r#"{ "Trace": true, "TraceSteps": 3 }"#).unwrap();
    let mut host = ReferenceHost::with_config(&config, Vec::new());
    assert_eq!(eval("Add(1, 2)", &mut host), AqValue::Int(3));
}

#[test]
fn trace_shows_top_five_values() {
    let config = RunConfig::from_json(r#"{ "Trace": true }"#).unwrap();
    let mut host = ReferenceHost::with_config(&config, Vec::new());
    let program = compile("1, 2, 3, 4, 5, 6, 7").unwrap();
    execute_scalar(&program, &mut host).unwrap();
    let out = output(&host);
    assert!(out.contains("ST:6 5 4 3 2\n#6: PushInt[7] ()\n"), "{out}");
}

#[test]
fn no_trace_output_by_default() {
    let mut host = ReferenceHost::with_config(&RunConfig::default(), Vec::new());
    eval("Add(1, 2)", &mut host);
    assert_eq!(output(&host), "");
}
