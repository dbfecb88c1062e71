use super::*;
use crate::Opcode;
use pretty_assertions::assert_eq;

// === Build buffer ===

#[test]
fn addresses_are_sequential() {
    let mut builder = ProgramBuilder::new();
    assert_eq!(builder.address(), 0);
    assert_eq!(builder.emit(Instruction::push_int(1)), 0);
    assert_eq!(builder.emit(Instruction::push_int(2)), 1);
    assert_eq!(builder.address(), 2);
}

#[test]
fn patch_rewrites_forward_jump() {
    let mut builder = ProgramBuilder::new();
    builder.emit(Instruction::push_bool(true));
    let jump = builder.emit(Instruction::jump_if_not(usize::MAX));
    builder.emit(Instruction::push_int(1));
    let end = builder.address();
    assert_eq!(builder.patch_target(jump, end), Ok(()));

    let program = builder.seal();
    assert_eq!(program.get(jump), Some(&Instruction::jump_if_not(3)));
}

#[test]
fn patch_rejects_bad_addresses() {
    let mut builder = ProgramBuilder::new();
    builder.emit(Instruction::push_int(1));
    assert_eq!(
        builder.patch_target(5, 0),
        Err(PatchError::OutOfRange { at: 5, len: 1 })
    );
    assert_eq!(builder.patch_target(0, 0), Err(PatchError::NotAJump { at: 0 }));
}

#[test]
fn patch_error_messages() {
    assert_eq!(
        PatchError::OutOfRange { at: 5, len: 1 }.to_string(),
        "cannot patch address 5: program has 1 instructions"
    );
    assert_eq!(
        PatchError::NotAJump { at: 0 }.to_string(),
        "cannot patch address 0: instruction is not a jump"
    );
}

#[test]
fn jump_targets_are_queryable_before_sealing() {
    let mut builder = ProgramBuilder::new();
    builder.emit(Instruction::push_bool(true));
    builder.emit(Instruction::jump_if_not(3));
    builder.emit(Instruction::push_int(1));
    assert!(builder.is_jump_target(3));
    assert!(!builder.is_jump_target(2));
}

// === Sealed program ===

#[test]
fn seal_preserves_order() {
    let mut builder = ProgramBuilder::new();
    builder.emit(Instruction::push_int(1));
    builder.emit(Instruction::push_int(2));
    builder.emit(Instruction::call("Add", 2));
    let program = builder.seal();

    let opcodes: Vec<Opcode> = program.iter().map(|i| i.opcode).collect();
    assert_eq!(opcodes, vec![Opcode::PushInt, Opcode::PushInt, Opcode::Call]);
    assert_eq!(program.len(), 3);
    assert!(program.get(3).is_none());
}

#[test]
fn clones_share_instructions() {
    let mut builder = ProgramBuilder::new();
    builder.emit(Instruction::push_null());
    let program = builder.seal();
    let copy = program.clone();
    assert!(std::ptr::eq(program.instructions(), copy.instructions()));
}

#[test]
fn program_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Program>();
}

// === Disassembly ===

#[test]
fn dump_empty_program() {
    assert_eq!(ProgramBuilder::new().seal().dump(), "(empty program)\n");
}

#[test]
fn dump_lists_instructions_with_addresses() {
    let mut builder = ProgramBuilder::new();
    builder.emit(Instruction::push_int(1));
    builder.emit(Instruction::push_int(2));
    builder.emit(Instruction::call("Add", 2));
    let program = builder.seal();

    assert_eq!(
        program.dump(),
        "0000   PushInt 1\n0001   PushInt 2\n0002   Call Add (2 args)\n"
    );
    assert_eq!(program.to_string(), program.dump());
}

#[test]
fn dump_marks_jump_targets() {
    let mut builder = ProgramBuilder::new();
    builder.emit(Instruction::push_bool(true)); // 0
    builder.emit(Instruction::jump_if_not(4)); // 1
    builder.emit(Instruction::push_int(1)); // 2
    builder.emit(Instruction::jump(5)); // 3
    builder.emit(Instruction::push_null()); // 4
    builder.emit(Instruction::no_op()); // 5
    let program = builder.seal();

    let dump = program.dump();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "0000   PushBool true");
    assert_eq!(lines[4], "0004 > PushNull");
    assert_eq!(lines[5], "0005 > NoOp");
}
