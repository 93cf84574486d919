//! Parametrized coverage of the opcode constraint table (§4.7) and the
//! predicate-suffix vocabulary, one case per opcode/suffix rather than a
//! hand-rolled loop.

use rstest::rstest;
use svm_asm::{assemble, AsmError};

#[rstest]
#[case::nop("nop")]
#[case::end("end")]
#[case::ret("ret")]
#[case::clf("clf")]
fn nullary_opcodes_accept_zero_arguments(#[case] source: &str) {
    assert!(assemble(source).is_ok(), "{source:?} should assemble");
}

#[rstest]
#[case::jmp("jmp label\nlabel\nend")]
#[case::inv("inv label\nlabel\nend")]
#[case::sys("sys 1\nend")]
fn unary_opcodes_accept_one_argument(#[case] source: &str) {
    assert!(assemble(source).is_ok(), "{source:?} should assemble");
}

#[rstest]
#[case::mov("mov r0 r1")]
#[case::add("add r0 1")]
#[case::sub("sub r0 r1")]
#[case::mul("mul r0 1")]
#[case::div("div r0 r1")]
#[case::and("and r0 1")]
#[case::or("or r0 r1")]
#[case::xor("xor r0 1")]
#[case::shl("shl r0 r1")]
#[case::shr("shr r0 1")]
#[case::cmp("cmp r0 r1")]
fn binary_alu_opcodes_accept_any_any(#[case] operands: &str) {
    let source = format!("{operands}\nend");
    assert!(assemble(&source).is_ok(), "{source:?} should assemble");
}

#[rstest]
#[case("jmp")]
#[case("mov r0")]
#[case("cmp r0")]
fn missing_operands_fail_with_expected_token(#[case] source: &str) {
    assert!(matches!(assemble(source).unwrap_err(), AsmError::ExpectedToken { .. }));
}

#[rstest]
#[case::eq("eq")]
#[case::ne("ne")]
#[case::lt("lt")]
#[case::le("le")]
#[case::gt("gt")]
#[case::ge("ge")]
#[case::nz("nz")]
#[case::z("z")]
fn every_predicate_suffix_is_accepted(#[case] suffix: &str) {
    let source = format!("mov.{suffix} r0 1\nend\n");
    assert!(assemble(&source).is_ok(), "{source:?} should assemble");
}

#[rstest]
#[case::single_push("push r0\nend")]
#[case::imm_push("push 5\nend")]
#[case::range_push("push r0 r3\nend")]
#[case::single_pop("push r0\npop r0\nend")]
#[case::range_pop("push r0 r3\npop r0 r3\nend")]
fn push_pop_accept_their_documented_shapes(#[case] source: &str) {
    assert!(assemble(source).is_ok(), "{source:?} should assemble");
}

#[test]
fn pop_rejects_an_immediate_operand() {
    assert!(matches!(
        assemble("pop 5\nend").unwrap_err(),
        AsmError::ArgConstraintUnsatisfied { .. }
    ));
}
