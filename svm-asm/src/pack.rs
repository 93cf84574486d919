//! Packs instruction fields into the 32-bit wire word.
//!
//! Layout (little-endian, byte 0 least significant): `op | ext<<8 |
//! arg1<<16 | arg2<<24`.

use crate::types::{ArgKind, Ext, Instruction, Opcode};

/// Packs an instruction's four byte fields into a single wire word. This
/// never fails: every [`Opcode`]/[`Ext`]/[`ArgKind`] value has a valid byte
/// encoding by construction.
pub fn pack(op: Opcode, ext: Ext, arg1: ArgKind, arg2: ArgKind) -> u32 {
    u32::from(op.to_byte())
        | u32::from(ext.to_byte()) << 8
        | u32::from(arg1.to_byte()) << 16
        | u32::from(arg2.to_byte()) << 24
}

/// Packs an already-decoded [`Instruction`].
pub fn pack_instruction(instr: Instruction) -> u32 {
    pack(instr.op, instr.ext, instr.arg1, instr.arg2)
}
