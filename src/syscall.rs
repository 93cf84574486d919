//! The syscall port: a single upcall invoked by SYS, carrying the active
//! task's register file and the syscall number forwarded verbatim from
//! the operand. Interpretation is entirely host-defined. Modeled as a
//! trait — constructor-injected into the VM — rather than a process-
//! global function pointer, so a host can carry its own state (the
//! "host context" of §4.6) as fields on its implementing type instead of
//! through an opaque pointer.

use crate::{consts::REGISTER_COUNT, error::VmError};

pub trait SyscallPort {
    /// Handles one SYS invocation. The handler may mutate `registers`
    /// directly — that's the only channel back into the task. Returning
    /// `Err` aborts the cycle that triggered the syscall exactly as any
    /// other execution error would.
    fn call(&mut self, registers: &mut [i32; REGISTER_COUNT], number: i32) -> Result<(), VmError>;
}

impl<F> SyscallPort for F
where
    F: FnMut(&mut [i32; REGISTER_COUNT], i32) -> Result<(), VmError>,
{
    fn call(&mut self, registers: &mut [i32; REGISTER_COUNT], number: i32) -> Result<(), VmError> {
        self(registers, number)
    }
}

/// A syscall port that ignores every call. Used where a host has no
/// syscalls to offer yet (tests, `svm-cli`'s default handler before a
/// real device is wired up).
pub struct NoopSyscallPort;

impl SyscallPort for NoopSyscallPort {
    fn call(&mut self, _registers: &mut [i32; REGISTER_COUNT], _number: i32) -> Result<(), VmError> {
        Ok(())
    }
}
