//! Disassembler: the exact inverse of [`crate::assemble`], rendering one
//! mnemonic line per decoded instruction. Needed to state and test the
//! assembler round-trip property (§8 of the format spec): assembling the
//! output of `disassemble` must reproduce the original word stream
//! modulo whitespace/comments.

use crate::{error::AsmError, types::{ArgKind, Ext}, unpack::unpack};

fn render_ext(ext: Ext) -> String {
    match ext {
        Ext::None => String::new(),
        other => format!(".{other}"),
    }
}

fn render_arg(arg: ArgKind, literal: Option<u32>) -> String {
    match arg {
        ArgKind::None => String::new(),
        ArgKind::Reg(r) => r.to_string(),
        ArgKind::Imm => (literal.unwrap_or(0) as i32).to_string(),
    }
}

/// Disassembles a packed word stream into one source line per
/// instruction. Returns [`AsmError::Decode`] if a word's opcode byte is
/// unknown.
pub fn disassemble(code: &[u32]) -> Result<Vec<String>, AsmError> {
    let mut lines = Vec::new();
    let mut pc = 0usize;

    while pc < code.len() {
        let instr = unpack(code[pc])?;
        pc += 1;

        let lit1 = instr.arg1.is_imm().then(|| {
            let v = code[pc];
            pc += 1;
            v
        });
        let lit2 = instr.arg2.is_imm().then(|| {
            let v = code[pc];
            pc += 1;
            v
        });

        let mut line = format!("{}{}", instr.op, render_ext(instr.ext));
        let a1 = render_arg(instr.arg1, lit1);
        let a2 = render_arg(instr.arg2, lit2);
        if !a1.is_empty() {
            line.push(' ');
            line.push_str(&a1);
        }
        if !a2.is_empty() {
            line.push(' ');
            line.push_str(&a2);
        }
        lines.push(line);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;

    #[test]
    fn round_trips_through_reassembly() {
        let source = "mov r0 5\ncmp r0 7\nmov.eq r0 99\nend\n";
        let words = assemble(source).unwrap();
        let rendered = disassemble(&words).unwrap();
        let reassembled = assemble(&rendered.join("\n")).unwrap();
        assert_eq!(words, reassembled);
    }

    #[test]
    fn renders_predicate_suffix() {
        let words = assemble("mov.eq r0 1\nend\n").unwrap();
        let rendered = disassemble(&words).unwrap();
        assert_eq!(rendered[0], "mov.eq r0 1");
    }
}
