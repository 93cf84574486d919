//! Parametrized coverage of the two-operand ALU opcodes against a
//! freshly seeded register file.

use rstest::rstest;
use svm::{CodeImage, NoopSyscallPort, Vm, REGISTER_COUNT};
use svm_asm::assemble;

fn execute_one(mnemonic: &str, a: i32, b: i32) -> i32 {
    let source = format!("mov r0 {a}\nmov r1 {b}\n{mnemonic} r0 r1\nend\n");
    let words = assemble(&source).unwrap();
    let mut vm = Vm::new(NoopSyscallPort);
    vm.load(CodeImage::with_defaults(words), [0; REGISTER_COUNT]).unwrap();
    while vm.running() {
        vm.cycle().unwrap();
    }
    vm.current_task().unwrap().registers[0]
}

#[rstest]
#[case("add", 2, 3, 5)]
#[case("sub", 5, 3, 2)]
#[case("mul", 4, 3, 12)]
#[case("div", 12, 3, 4)]
#[case("and", 0b1100, 0b1010, 0b1000)]
#[case("or", 0b1100, 0b1010, 0b1110)]
#[case("xor", 0b1100, 0b1010, 0b0110)]
#[case("shl", 1, 4, 16)]
#[case("shr", 16, 4, 1)]
fn alu_opcode_produces_expected_result(#[case] mnemonic: &str, #[case] a: i32, #[case] b: i32, #[case] expected: i32) {
    assert_eq!(execute_one(mnemonic, a, b), expected);
}

#[test]
fn div_by_zero_does_not_abort_the_vm() {
    assert_eq!(execute_one("div", 10, 0), 0);
}
