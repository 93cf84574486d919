//! Error taxonomies for this crate.
//!
//! Two independent enums, matching the two independent jobs this crate
//! does: decoding a wire word ([`DecodeError`]), and assembling or
//! disassembling a textual program ([`AsmError`]). A [`DecodeError`]
//! surfaced while the VM executes is translated into that crate's own
//! error type by the caller; it is not reused as-is outside this crate.

use thiserror::Error;

/// Failure to interpret a 32-bit word as an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Byte 0 of the word did not name a known opcode.
    #[error("unknown opcode byte {0:#04x}")]
    UnknownOpcode(u8),
}

/// Assembler error taxonomy (§7 of the format spec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AsmError {
    /// A null/empty source buffer or argument list was supplied.
    #[error("empty input")]
    NullArg,

    /// Reserved for allocation failure; unreachable under Rust's
    /// fallible-free `Vec`/`String` growth in practice, kept for parity
    /// with the source taxonomy and for callers that build with a custom
    /// allocator.
    #[error("allocation failed")]
    BadAlloc,

    /// An argument did not satisfy the opcode's arg-shape constraint
    /// (§4.7's constraint table).
    #[error(
        "`{mnemonic}` argument {slot} ({found}) does not satisfy constraint {expected} (line {line})"
    )]
    ArgConstraintUnsatisfied {
        mnemonic: String,
        slot: u8,
        found: String,
        expected: String,
        line: u32,
    },

    /// A label was referenced but never defined anywhere in the source.
    #[error("undefined label `{name}` (referenced on line {line})")]
    UndefinedLabel { name: String, line: u32 },

    /// A source file could not be opened. Only produced by file-based
    /// entry points (the CLI), never by [`crate::assemble`] itself.
    #[error("failed to open source file `{path}`: {source}")]
    FileOpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The tokenizer ran out of input where a token was required.
    #[error("expected {expected} on line {line}, found end of input")]
    ExpectedToken { expected: String, line: u32 },

    /// A decoded word (during disassembly) named an unknown opcode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
