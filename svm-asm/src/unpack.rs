//! Unpacks the 32-bit wire word back into instruction fields.

use crate::{
    error::DecodeError,
    types::{ArgKind, Ext, Instruction, Opcode},
};

/// Decodes a wire word into an [`Instruction`].
///
/// Only the opcode byte is validated strictly: an unknown opcode is the
/// one decode failure the format spec calls out (§4.1). The extension and
/// argument-type bytes tolerantly decode to their "none" variants when out
/// of domain, since the assembler never emits an invalid one and the VM
/// only needs to treat stray bytes harmlessly rather than reject them.
pub fn unpack(word: u32) -> Result<Instruction, DecodeError> {
    let op_byte = (word & 0xff) as u8;
    let ext_byte = ((word >> 8) & 0xff) as u8;
    let arg1_byte = ((word >> 16) & 0xff) as u8;
    let arg2_byte = ((word >> 24) & 0xff) as u8;

    let op = Opcode::from_byte(op_byte).ok_or(DecodeError::UnknownOpcode(op_byte))?;

    Ok(Instruction {
        op,
        ext: Ext::from_byte(ext_byte),
        arg1: ArgKind::from_byte(arg1_byte),
        arg2: ArgKind::from_byte(arg2_byte),
    })
}
