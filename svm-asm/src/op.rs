//! Ergonomic Rust-side instruction constructors.
//!
//! Each function returns the full word sequence for one instruction
//! (the instruction word, followed by any immediate literals) so call
//! sites — chiefly tests and the assembler's own code generator — can
//! `.extend()` them straight into a code image without hand-packing
//! bytes. Mirrors the constructor-per-mnemonic style of a builder module,
//! generalized here to this ISA's variable-width (1-3 word) instructions.

use crate::{
    pack::pack,
    types::{ArgKind, Ext, Instruction, Opcode, RegId},
};

/// Either a register or a signed 32-bit immediate: the two shapes an
/// argument slot can take from Rust call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(RegId),
    Imm(i32),
}

impl From<RegId> for Operand {
    fn from(r: RegId) -> Self {
        Operand::Reg(r)
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Imm(v)
    }
}

impl Operand {
    fn kind(self) -> ArgKind {
        match self {
            Operand::Reg(r) => ArgKind::Reg(r),
            Operand::Imm(_) => ArgKind::Imm,
        }
    }

    fn literal(self) -> Option<u32> {
        match self {
            Operand::Reg(_) => None,
            Operand::Imm(v) => Some(v as u32),
        }
    }
}

fn emit(op: Opcode, ext: Ext, arg1: ArgKind, arg2: ArgKind, literals: [Option<u32>; 2]) -> Vec<u32> {
    let mut words = vec![pack(op, ext, arg1, arg2)];
    words.extend(literals.into_iter().flatten());
    words
}

/// Rewrites the predicate suffix of an already-built instruction in
/// place. Lets tests wrap an unconditional builder, e.g. `pred(Ext::Eq,
/// op::mov(RegId(0), 99))`.
pub fn pred(ext: Ext, mut words: Vec<u32>) -> Vec<u32> {
    if let Some(first) = words.first_mut() {
        *first = (*first & !0xff00) | (u32::from(ext.to_byte()) << 8);
    }
    words
}

macro_rules! nullary {
    ($name:ident, $op:expr) => {
        pub fn $name() -> Vec<u32> {
            emit($op, Ext::None, ArgKind::None, ArgKind::None, [None, None])
        }
    };
}

nullary!(nop, Opcode::Nop);
nullary!(end, Opcode::End);
nullary!(ret, Opcode::Ret);

macro_rules! unary {
    ($name:ident, $op:expr) => {
        pub fn $name(target: impl Into<Operand>) -> Vec<u32> {
            let target = target.into();
            emit($op, Ext::None, target.kind(), ArgKind::None, [target.literal(), None])
        }
    };
}

unary!(jmp, Opcode::Jmp);
unary!(inv, Opcode::Inv);
unary!(sys, Opcode::Sys);

macro_rules! binary {
    ($name:ident, $op:expr) => {
        pub fn $name(a: impl Into<Operand>, b: impl Into<Operand>) -> Vec<u32> {
            let a = a.into();
            let b = b.into();
            emit($op, Ext::None, a.kind(), b.kind(), [a.literal(), b.literal()])
        }
    };
}

binary!(mov, Opcode::Mov);
binary!(add, Opcode::Add);
binary!(sub, Opcode::Sub);
binary!(mul, Opcode::Mul);
binary!(div, Opcode::Div);
binary!(and, Opcode::And);
binary!(or, Opcode::Or);
binary!(xor, Opcode::Xor);
binary!(shl, Opcode::Shl);
binary!(shr, Opcode::Shr);
binary!(cmp, Opcode::Cmp);

/// `clf` with no suffix clears every flag.
pub fn clf() -> Vec<u32> {
    emit(Opcode::Clf, Ext::None, ArgKind::None, ArgKind::None, [None, None])
}

/// `clf.<ext>` clears only the named flag; the ext slot doubles as the
/// flag selector for this one opcode (§4.4).
pub fn clf_only(flag: Ext) -> Vec<u32> {
    emit(Opcode::Clf, flag, ArgKind::None, ArgKind::None, [None, None])
}

/// Single-register push.
pub fn push(r: RegId) -> Vec<u32> {
    emit(Opcode::Push, Ext::None, ArgKind::Reg(r), ArgKind::None, [None, None])
}

/// Immediate push.
pub fn push_imm(v: i32) -> Vec<u32> {
    emit(Opcode::Push, Ext::None, ArgKind::Imm, ArgKind::None, [Some(v as u32), None])
}

/// Inclusive register-range push, `lo..=hi`, pushed in ascending order.
pub fn push_range(lo: RegId, hi: RegId) -> Vec<u32> {
    emit(Opcode::Push, Ext::None, ArgKind::Reg(lo), ArgKind::Reg(hi), [None, None])
}

/// Single-register pop.
pub fn pop(r: RegId) -> Vec<u32> {
    emit(Opcode::Pop, Ext::None, ArgKind::Reg(r), ArgKind::None, [None, None])
}

/// Inclusive register-range pop, popped `hi..=lo` (highest first) so a
/// matching push/pop round-trips.
pub fn pop_range(lo: RegId, hi: RegId) -> Vec<u32> {
    emit(Opcode::Pop, Ext::None, ArgKind::Reg(lo), ArgKind::Reg(hi), [None, None])
}

/// Decodes the first word of a builder's output back into an
/// [`Instruction`], for tests that want to assert on the decoded shape
/// rather than the raw words.
pub fn decode_first(words: &[u32]) -> Instruction {
    crate::unpack::unpack(words[0]).expect("builder-produced words always decode")
}
