//! End-to-end boundary scenarios driving the assembler and the VM
//! together, the way a host actually would.

use svm::{CodeImage, NoopSyscallPort, Vm, REGISTER_COUNT};
use svm_asm::assemble;

fn run(source: &str, seed: [i32; REGISTER_COUNT]) -> Vm<NoopSyscallPort> {
    let words = assemble(source).unwrap();
    let mut vm = Vm::new(NoopSyscallPort);
    vm.load(CodeImage::with_defaults(words), seed).unwrap();
    while vm.running() {
        if vm.cycle().is_err() {
            break;
        }
    }
    vm
}

#[test]
fn smallest_halting_program() {
    let words = assemble("end").unwrap();
    assert_eq!(words, vec![0x0000_0001]);

    let mut vm = Vm::new(NoopSyscallPort);
    vm.load(CodeImage::with_defaults(words), [0; REGISTER_COUNT]).unwrap();
    assert!(vm.cycle().is_ok());
    assert!(!vm.running());
    assert_eq!(vm.cycles(), 1);
}

#[test]
fn predicate_suppresses_write_but_consumes_imm() {
    let vm = run("mov r0 5\ncmp r0 7\nmov.eq r0 99\nend\n", [0; REGISTER_COUNT]);
    let task = vm.current_task().unwrap();
    assert_eq!(task.registers[0], 5);
}

#[test]
fn call_return() {
    let vm = run("inv fn\nend\nfn\nmov r1 42\nret\n", [0; REGISTER_COUNT]);
    let task = vm.current_task().unwrap();
    assert_eq!(task.registers[1], 42);
    assert_eq!(task.rpc(), 0);
}

#[test]
fn stack_range_round_trip() {
    let mut seed = [0; REGISTER_COUNT];
    seed[0] = 1;
    seed[1] = 2;
    seed[2] = 3;
    let vm = run("push r0 r2\nmov r0 0\nmov r1 0\nmov r2 0\npop r0 r2\nend\n", seed);
    let task = vm.current_task().unwrap();
    assert_eq!(task.registers[0], 1);
    assert_eq!(task.registers[1], 2);
    assert_eq!(task.registers[2], 3);
    assert_eq!(task.sp(), 0);
}

#[test]
fn forward_label_patch() {
    let vm = run("jmp later\nmov r0 1\nlater\nmov r0 7\nend\n", [0; REGISTER_COUNT]);
    assert_eq!(vm.current_task().unwrap().registers[0], 7);
}

#[test]
fn undefined_label_fails_assembly() {
    assert!(assemble("jmp nowhere\nend\n").is_err());
}

#[test]
fn mov_with_immediate_destination_assembles_but_fails_at_execution() {
    // The assembler's constraint table is ANY,ANY for MOV, so `mov 5 r0`
    // assembles even though 5 can never be a write target; the runtime
    // rejects it with ArgNotReg when it tries to resolve the destination.
    let words = assemble("mov 5 r0\nend\n").unwrap();
    let mut vm = Vm::new(NoopSyscallPort);
    vm.load(CodeImage::with_defaults(words), [0; REGISTER_COUNT]).unwrap();
    assert!(matches!(vm.cycle(), Err(svm::VmError::ArgNotReg)));
}

#[test]
fn cooperative_round_robin_across_two_tasks() {
    let words = assemble("mov r0 1\nend\n").unwrap();
    let mut vm = Vm::new(NoopSyscallPort);
    let t0 = vm.load(CodeImage::with_defaults(words), [0; REGISTER_COUNT]).unwrap();
    let t1 = vm.create_task(0, [0; REGISTER_COUNT]).unwrap();

    assert_eq!(vm.current_task_id(), Some(t0));
    vm.switch_task().unwrap();
    assert_eq!(vm.current_task_id(), Some(t1));
    vm.switch_task().unwrap();
    assert_eq!(vm.current_task_id(), Some(t0));
}
