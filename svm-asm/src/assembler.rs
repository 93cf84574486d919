//! Two-pass assembler: tokenize, validate each instruction's argument
//! shape against the opcode's constraint table, emit packed words, and
//! patch forward label references in a second pass over the recorded
//! patch list.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    error::AsmError,
    pack::pack,
    tokenizer::{tokenize, Token, TokenCursor},
    types::{ArgKind, Ext, Opcode, RegId},
};

/// A single decoded argument on its way into the code stream: either it
/// resolved to a literal value immediately, or it is a label reference
/// awaiting the patch pass.
enum Literal {
    Resolved(u32),
    Pending(String),
}

/// Per-slot shape an opcode's argument must satisfy.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ArgConstraint {
    /// Slot must be absent.
    None,
    /// Slot may be a register or an immediate/label.
    Any,
    /// Slot must be a register.
    RegOnly,
    /// Slot must be an immediate or label (never used by the current
    /// opcode set, kept for parity with the full constraint domain named
    /// in §4.7).
    #[allow(dead_code)]
    ImmOnly,
}

/// Fixed argument arity and per-slot constraint for every opcode except
/// `PUSH`/`POP`, whose one-or-two-operand shape is handled separately in
/// [`parse_instruction`].
fn constraints(op: Opcode) -> &'static [ArgConstraint] {
    use ArgConstraint::*;
    match op {
        Opcode::Nop | Opcode::End | Opcode::Ret | Opcode::Clf => &[],
        Opcode::Jmp | Opcode::Inv | Opcode::Sys => &[Any],
        Opcode::Mov
        | Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Shl
        | Opcode::Shr
        | Opcode::Cmp => &[Any, Any],
        Opcode::Push | Opcode::Pop => unreachable!("push/pop have their own arg-shape handling"),
    }
}

fn parse_register(text: &str) -> Option<RegId> {
    text.strip_prefix('r').and_then(|n| n.parse::<u8>().ok()).and_then(RegId::new)
}

fn parse_numeric(text: &str) -> Option<i32> {
    if let Some(hex) = text.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok().map(|v| v as i32)
    } else if let Some(bin) = text.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok().map(|v| v as i32)
    } else {
        text.parse::<i32>().ok()
    }
}

/// Classifies one token as a register or an immediate/label, enforcing
/// `constraint`.
fn classify(
    token: &Token,
    constraint: ArgConstraint,
    mnemonic: &str,
    slot: u8,
) -> Result<(ArgKind, Option<Literal>), AsmError> {
    if let Some(reg) = parse_register(&token.text) {
        if constraint == ArgConstraint::ImmOnly {
            let err = AsmError::ArgConstraintUnsatisfied {
                mnemonic: mnemonic.into(),
                slot,
                found: format!("register {reg}"),
                expected: "immediate or label".into(),
                line: token.line,
            };
            debug!(%err, "assembler error");
            return Err(err);
        }
        return Ok((ArgKind::Reg(reg), None));
    }

    if constraint == ArgConstraint::RegOnly {
        let err = AsmError::ArgConstraintUnsatisfied {
            mnemonic: mnemonic.into(),
            slot,
            found: token.text.clone(),
            expected: "register".into(),
            line: token.line,
        };
        debug!(%err, "assembler error");
        return Err(err);
    }

    match parse_numeric(&token.text) {
        Some(value) => Ok((ArgKind::Imm, Some(Literal::Resolved(value as u32)))),
        None => Ok((ArgKind::Imm, Some(Literal::Pending(token.text.clone())))),
    }
}

struct Patch {
    name: String,
    word_index: u32,
    line: u32,
}

struct Builder {
    words: Vec<u32>,
    labels: HashMap<String, u32>,
    patches: Vec<Patch>,
}

impl Builder {
    fn push_word(&mut self, word: u32) -> u32 {
        let idx = self.words.len() as u32;
        self.words.push(word);
        idx
    }

    fn push_literal(&mut self, lit: Literal, line: u32) {
        match lit {
            Literal::Resolved(v) => {
                self.push_word(v);
            }
            Literal::Pending(name) => {
                let idx = self.push_word(0);
                self.patches.push(Patch { name, word_index: idx, line });
            }
        }
    }
}

/// Reads an opcode's argument tokens per its constraint table, returning
/// `(arg1, lit1, arg2, lit2)`.
fn read_fixed_args(
    cursor: &mut TokenCursor,
    mnemonic: &str,
    slots: &[ArgConstraint],
) -> Result<[(ArgKind, Option<Literal>); 2], AsmError> {
    let mut out: [(ArgKind, Option<Literal>); 2] = [(ArgKind::None, None), (ArgKind::None, None)];
    for (i, constraint) in slots.iter().enumerate() {
        let line = cursor.line();
        let token = cursor.next().ok_or_else(|| {
            let err = AsmError::ExpectedToken {
                expected: format!("argument {} of `{mnemonic}`", i + 1),
                line,
            };
            debug!(%err, "assembler error");
            err
        })?;
        out[i] = classify(token, *constraint, mnemonic, i as u8 + 1)?;
    }
    Ok(out)
}

/// Reads the one-or-two operand shape shared by `PUSH` and `POP`: a
/// single register/immediate (push) or register (pop), optionally
/// followed by a second register forming an ascending range.
fn read_push_pop_args(
    cursor: &mut TokenCursor,
    mnemonic: &str,
    first_constraint: ArgConstraint,
) -> Result<[(ArgKind, Option<Literal>); 2], AsmError> {
    let line = cursor.line();
    let first = cursor.next().ok_or_else(|| {
        let err = AsmError::ExpectedToken { expected: format!("argument to `{mnemonic}`"), line };
        debug!(%err, "assembler error");
        err
    })?;
    let arg1 = classify(first, first_constraint, mnemonic, 1)?;

    // A second register only continues the same instruction when the
    // first argument was itself a register (the range form); otherwise
    // the next token belongs to whatever comes after.
    if arg1.0.is_reg() {
        if let Some(next) = cursor.peek() {
            if let Some(reg) = parse_register(&next.text) {
                cursor.next();
                return Ok([arg1, (ArgKind::Reg(reg), None)]);
            }
        }
    }
    Ok([arg1, (ArgKind::None, None)])
}

/// Assembles a complete source program into a packed word stream.
///
/// Returns [`AsmError::NullArg`] for empty input, [`AsmError::ExpectedToken`]
/// when an instruction runs out of operands, [`AsmError::ArgConstraintUnsatisfied`]
/// when an operand's shape doesn't match the opcode, and
/// [`AsmError::UndefinedLabel`] when any `IMM` operand that wasn't a
/// numeric literal fails to resolve to a label by the end of the patch
/// pass.
pub fn assemble(src: &str) -> Result<Vec<u32>, AsmError> {
    if src.trim().is_empty() {
        debug!(err = %AsmError::NullArg, "assembler error");
        return Err(AsmError::NullArg);
    }

    let mut cursor = TokenCursor::new(tokenize(src));
    let mut out = Builder { words: Vec::new(), labels: HashMap::new(), patches: Vec::new() };

    while let Some(token) = cursor.next() {
        let text = token.text.clone();
        let line = token.line;

        match text.parse::<Opcode>() {
            Ok(op) => assemble_instruction(&mut cursor, &mut out, op)?,
            Err(_) => {
                // Not an opcode mnemonic: a label definition at the
                // current emit offset.
                let offset = out.words.len() as u32;
                out.labels.insert(text, offset);
                let _ = line;
            }
        }
    }

    for patch in std::mem::take(&mut out.patches) {
        let target = out.labels.get(&patch.name).copied().ok_or_else(|| {
            let err = AsmError::UndefinedLabel { name: patch.name.clone(), line: patch.line };
            debug!(%err, "assembler error");
            err
        })?;
        out.words[patch.word_index as usize] = target;
    }

    Ok(out.words)
}

fn assemble_instruction(cursor: &mut TokenCursor, out: &mut Builder, op: Opcode) -> Result<(), AsmError> {
    let mark = cursor.mark();
    let ext = match cursor.peek().and_then(|t| t.text.parse::<Ext>().ok()) {
        Some(ext) => {
            cursor.next();
            ext
        }
        None => {
            cursor.reset(mark);
            Ext::None
        }
    };

    let mnemonic = op.to_string();
    let [(arg1, lit1), (arg2, lit2)] = match op {
        Opcode::Push => read_push_pop_args(cursor, &mnemonic, ArgConstraint::Any)?,
        Opcode::Pop => read_push_pop_args(cursor, &mnemonic, ArgConstraint::RegOnly)?,
        _ => read_fixed_args(cursor, &mnemonic, constraints(op))?,
    };

    let line = cursor.line();
    out.push_word(pack(op, ext, arg1, arg2));
    if let Some(lit) = lit1 {
        out.push_literal(lit, line);
    }
    if let Some(lit) = lit2 {
        out.push_literal(lit, line);
    }

    Ok(())
}
