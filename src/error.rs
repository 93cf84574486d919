//! VM error taxonomy (§7 of the format spec).

use thiserror::Error;

/// Every way a VM operation or a single execution cycle can fail.
///
/// `OK` from the source taxonomy has no variant here: success is the
/// `Ok` side of a `Result`, not a value of this enum.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum VmError {
    #[error("generic VM failure")]
    Generic,

    #[error("operation received a null argument")]
    NullArg,

    #[error("allocation failed")]
    BadAlloc,

    #[error("VM is not running")]
    NotRunning,

    #[error("program counter ran past the end of the code image")]
    CodeOverflow,

    #[error("operand is not a register where one was required")]
    ArgNotReg,

    #[error("push/pop range has low register >= high register")]
    PushArgBadOrder,

    #[error("jump target is outside the code image")]
    JmpOverflow,

    #[error("call stack is full")]
    CallStkOverflow,

    #[error("call stack is empty")]
    CallStkUnderflow,

    #[error("data stack is full")]
    StkOverflow,

    #[error("data stack is empty")]
    StkUnderflow,

    #[error("no task with that id exists")]
    TaskNotFound,

    #[error("task switching is blocked")]
    TaskSwitchBlocked,

    #[error("unknown instruction opcode")]
    UnknownInstruction,
}

impl From<svm_asm::DecodeError> for VmError {
    fn from(_: svm_asm::DecodeError) -> Self {
        VmError::UnknownInstruction
    }
}
