//! PUSH/POP: single-value and register-range forms over a task's data
//! stack. Capacity is checked for the whole range before anything is
//! pushed or popped, so a range that doesn't fit leaves the stack and
//! registers untouched rather than partially mutated.

use svm_asm::ArgKind;

use crate::{error::VmError, interpreter::Operand, task::Task};

pub(crate) fn push(task: &mut Task, arg1: Operand, arg2: Operand) -> Result<(), VmError> {
    match (arg1.kind, arg2.kind) {
        (ArgKind::Imm, ArgKind::None) | (ArgKind::Reg(_), ArgKind::None) => {
            task.data_stack.push(arg1.value).map_err(|_| VmError::StkOverflow)
        }
        (ArgKind::Reg(lo), ArgKind::Reg(hi)) => {
            let (lo, hi) = (lo.index() as usize, hi.index() as usize);
            if lo >= hi {
                return Err(VmError::PushArgBadOrder);
            }
            let count = hi - lo + 1;
            if task.data_stack.remaining() < count {
                return Err(VmError::StkOverflow);
            }
            for idx in lo..=hi {
                task.data_stack.push(task.registers[idx]).expect("capacity checked above");
            }
            Ok(())
        }
        _ => Err(VmError::ArgNotReg),
    }
}

pub(crate) fn pop(task: &mut Task, arg1: Operand, arg2: Operand) -> Result<(), VmError> {
    match (arg1.kind, arg2.kind) {
        (ArgKind::Reg(r), ArgKind::None) => {
            let value = task.data_stack.pop().ok_or(VmError::StkUnderflow)?;
            task.registers[r.index() as usize] = value;
            Ok(())
        }
        (ArgKind::Reg(lo), ArgKind::Reg(hi)) => {
            let (lo, hi) = (lo.index() as usize, hi.index() as usize);
            if lo >= hi {
                return Err(VmError::PushArgBadOrder);
            }
            let count = hi - lo + 1;
            if task.data_stack.len() < count {
                return Err(VmError::StkUnderflow);
            }
            for idx in (lo..=hi).rev() {
                task.registers[idx] = task.data_stack.pop().expect("length checked above");
            }
            Ok(())
        }
        _ => Err(VmError::ArgNotReg),
    }
}
