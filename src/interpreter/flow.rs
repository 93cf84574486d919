//! Control-flow and comparison opcodes: CMP, CLF, JMP, INV, RET.

use svm_asm::Ext;

use crate::{code::CodeImage, error::VmError, task::{FlagSet, Task}};

fn flag_for_ext(ext: Ext) -> Option<FlagSet> {
    match ext {
        Ext::None => None,
        Ext::Eq => Some(FlagSet::EQ),
        Ext::Ne => Some(FlagSet::NE),
        Ext::Lt => Some(FlagSet::LT),
        Ext::Le => Some(FlagSet::LE),
        Ext::Gt => Some(FlagSet::GT),
        Ext::Ge => Some(FlagSet::GE),
        Ext::Nz => Some(FlagSet::NZ),
        Ext::Z => Some(FlagSet::Z),
    }
}

/// `NONE` is always true; any other suffix gates on the named flag.
pub(crate) fn predicate_holds(ext: Ext, flags: FlagSet) -> bool {
    match flag_for_ext(ext) {
        None => true,
        Some(bit) => flags.contains(bit),
    }
}

/// CMP accumulates flags rather than overwriting them — successive CMPs
/// may leave more than one of EQ/NE/LT/LE/GT/GE simultaneously set.
pub(crate) fn compare(task: &mut Task, a: i32, b: i32) {
    task.flags.insert(if a == b { FlagSet::EQ } else { FlagSet::NE });
    if a < b {
        task.flags.insert(FlagSet::LT);
    }
    if a <= b {
        task.flags.insert(FlagSet::LE);
    }
    if a > b {
        task.flags.insert(FlagSet::GT);
    }
    if a >= b {
        task.flags.insert(FlagSet::GE);
    }
}

/// The predicate slot is reused as the flag selector here: `NONE` clears
/// every flag, any other suffix clears just that one.
pub(crate) fn clear_flags(task: &mut Task, ext: Ext) {
    match flag_for_ext(ext) {
        None => task.flags = FlagSet::empty(),
        Some(bit) => task.flags.remove(bit),
    }
}

pub(crate) fn jump(task: &mut Task, target: i32, code: &CodeImage) -> Result<(), VmError> {
    let target = target as u32;
    if target >= code.size() {
        return Err(VmError::JmpOverflow);
    }
    task.pc = target;
    Ok(())
}

/// Validates the target before pushing the return address, so a failed
/// jump never leaves a stray entry on the call stack.
pub(crate) fn invoke(task: &mut Task, target: i32, code: &CodeImage) -> Result<(), VmError> {
    let target_u = target as u32;
    if target_u >= code.size() {
        return Err(VmError::JmpOverflow);
    }
    task.call_stack.push(task.pc).map_err(|_| VmError::CallStkOverflow)?;
    task.pc = target_u;
    Ok(())
}

pub(crate) fn ret(task: &mut Task) -> Result<(), VmError> {
    let target = task.call_stack.pop().ok_or(VmError::CallStkUnderflow)?;
    task.pc = target;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REGISTER_COUNT;

    fn task() -> Task {
        Task::init(0, [0; REGISTER_COUNT], 8, 32)
    }

    #[test]
    fn compare_accumulates_across_calls() {
        let mut t = task();
        compare(&mut t, 5, 7);
        assert!(t.flags.contains(FlagSet::LT | FlagSet::LE | FlagSet::NE));
        compare(&mut t, 7, 7);
        // EQ from the second call joins LT/LE/NE from the first — sticky.
        assert!(t.flags.contains(FlagSet::EQ | FlagSet::LT));
    }

    #[test]
    fn clf_none_clears_everything() {
        let mut t = task();
        compare(&mut t, 1, 1);
        clear_flags(&mut t, Ext::None);
        assert!(t.flags.is_empty());
    }

    #[test]
    fn clf_with_suffix_clears_one_flag() {
        let mut t = task();
        compare(&mut t, 5, 7);
        clear_flags(&mut t, Ext::Lt);
        assert!(!t.flags.contains(FlagSet::LT));
        assert!(t.flags.contains(FlagSet::NE));
    }

    #[test]
    fn invoke_then_ret_restores_pc() {
        let mut t = task();
        t.pc = 7;
        let code = CodeImage::with_defaults(vec![0; 20]);
        invoke(&mut t, 3, &code).unwrap();
        assert_eq!(t.pc, 3);
        ret(&mut t).unwrap();
        assert_eq!(t.pc, 7);
    }

    #[test]
    fn invoke_past_code_end_leaves_call_stack_untouched() {
        let mut t = task();
        let code = CodeImage::with_defaults(vec![0; 2]);
        assert!(matches!(invoke(&mut t, 5, &code), Err(VmError::JmpOverflow)));
        assert_eq!(t.rpc(), 0);
    }
}
