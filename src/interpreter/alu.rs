//! Arithmetic and bitwise operand combination for the two-operand ALU
//! opcodes. Overflow wraps silently and division by zero returns zero —
//! trapping either is an explicit non-goal; the spec's own wording calls
//! out DIV-by-zero as "host-defined", and wrapping is the closest Rust
//! equivalent to the original's unchecked C arithmetic that doesn't
//! actually abort the process.

use svm_asm::Opcode;

pub(crate) fn apply(op: Opcode, a: i32, b: i32) -> i32 {
    match op {
        Opcode::Add => a.wrapping_add(b),
        Opcode::Sub => a.wrapping_sub(b),
        Opcode::Mul => a.wrapping_mul(b),
        Opcode::Div => {
            if b == 0 {
                0
            } else {
                a.wrapping_div(b)
            }
        }
        Opcode::And => a & b,
        Opcode::Or => a | b,
        Opcode::Xor => a ^ b,
        Opcode::Shl => a.wrapping_shl((b & 0x1f) as u32),
        Opcode::Shr => a.wrapping_shr((b & 0x1f) as u32),
        other => unreachable!("{other} is not an ALU opcode"),
    }
}
