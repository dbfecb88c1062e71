use super::*;
use crate::config::RunConfig;
use pretty_assertions::assert_eq;

fn run(source: &str, config: &RunConfig) -> (RunStatus, String) {
    let mut out = Vec::new();
    let status = run_source(source, "script.aq", config, &mut out).unwrap();
    (status, String::from_utf8(out).unwrap())
}

// === run ===

#[test]
fn run_prints_result() {
    let (status, out) = run("Add(1,2)", &RunConfig::default());
    assert_eq!(status, RunStatus::Completed);
    assert_eq!(out, "result = 3\n");
}

#[test]
fn run_prints_host_output_before_result() {
    let (_, out) = run("Echo('a'), Concat('b', 'c')", &RunConfig::default());
    assert_eq!(out, "echo:a\nresult = bc\n");
}

#[test]
fn run_uses_parameters() {
    let config = RunConfig::from_json(r#"{ "Parameters": { "a": 40 } }"#).unwrap();
    let (_, out) = run("Add(a, 2)", &config);
    assert_eq!(out, "result = 42\n");
}

#[test]
fn run_compile_error_shows_caret() {
    let (status, out) = run("a b", &RunConfig::default());
    assert_eq!(status, RunStatus::CompileError);
    assert!(!status.is_success());
    assert_eq!(
        out,
        "error: syntax error: unexpected name `b`\n\
         \x20--> script.aq:1:3\n\
         \x20 |\n\
         1 | a b\n\
         \x20 |   ^\n"
    );
}

#[test]
fn run_fault_is_reported() {
    let (status, out) = run("Nope(1)", &RunConfig::default());
    assert_eq!(status, RunStatus::Fault);
    assert_eq!(
        out,
        "runtime error: function not found: Nope at #1: Call Nope (1 arg)\n"
    );
}

#[test]
fn run_hard_limit_aborts() {
    let config = RunConfig::from_json(r#"{ "HardLimit": 10 }"#).unwrap();
    let (status, out) = run("while(true)", &config);
    assert_eq!(status, RunStatus::Aborted);
    assert!(status.is_success());
    assert!(out.starts_with("aborted after 10 steps"), "{out}");
}

#[test]
fn run_trace_limit_on_last_step_prints_result() {
    let config = RunConfig::from_json(r#"{ "Trace": true, "TraceSteps": 3 }"#).unwrap();
    let (status, out) = run("Add(1, 2)", &config);
    assert_eq!(status, RunStatus::Completed);
    assert!(out.ends_with("#2: Call[Add] (1,2)\nresult = 3\n"), "{out}");
}

#[test]
fn run_dump_program_skips_execution() {
    let config = RunConfig::from_json(r#"{ "DumpProgram": true }"#).unwrap();
    let (status, out) = run("Echo(1)", &config);
    assert_eq!(status, RunStatus::Completed);
    assert_eq!(out, "0000   PushInt 1\n0001   Call Echo (1 arg)\n");
}

// === dump / lex ===

#[test]
fn dump_marks_jump_targets() {
    let mut out = Vec::new();
    let status = dump_source("if(c, 1)", "s.aq", &mut out).unwrap();
    assert_eq!(status, RunStatus::Completed);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Program for 's.aq' (6 instructions):\n\
         0000   PushParam c\n\
         0001   JumpIfNot ->4 (1 arg)\n\
         0002   PushInt 1\n\
         0003   Jump ->5\n\
         0004 > PushNull\n\
         0005 > NoOp\n"
    );
}

#[test]
fn lex_lists_tokens() {
    let mut out = Vec::new();
    let status = lex_source("Add(1)", "s.aq", &mut out).unwrap();
    assert_eq!(status, RunStatus::Completed);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Tokens for 's.aq':\n\
         \x20 Ident \"Add\" @ 0\n\
         \x20 LParen \"(\" @ 3\n\
         \x20 Number \"1\" @ 4\n\
         \x20 RParen \")\" @ 5\n\
         \x20 End @ 6\n"
    );
}

#[test]
fn lex_stops_at_unrecognized_text() {
    let mut out = Vec::new();
    let status = lex_source("a #", "s.aq", &mut out).unwrap();
    assert_eq!(status, RunStatus::CompileError);
    assert!(String::from_utf8(out)
        .unwrap()
        .ends_with("error: unrecognized text at offset 2\n"));
}

// === repl ===

#[test]
fn repl_keeps_variables_between_lines() {
    let input = "Set('x', 2)\nAdd(Get('x'), 1)\n\nEcho('never')\n";
    let mut out = Vec::new();
    run_repl(input.as_bytes(), &mut out, &RunConfig::default()).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("result = 2\n"), "{out}");
    assert!(out.contains("result = 3\n"), "{out}");
    assert!(!out.contains("never"), "{out}");
    assert!(out.ends_with("Exiting ...\n"), "{out}");
}

#[test]
fn repl_continues_after_errors() {
    let input = "Add(1\nAdd(1, 1)\n";
    let mut out = Vec::new();
    run_repl(input.as_bytes(), &mut out, &RunConfig::default()).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("error: unbalanced brackets\n"), "{out}");
    assert!(out.contains("result = 2\n"), "{out}");
}
