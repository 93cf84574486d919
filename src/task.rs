//! Per-task execution context: registers, sticky flags, program counter,
//! and the two fixed-capacity stacks a task owns exclusively.

use crate::{consts::REGISTER_COUNT, stack::FixedStack};

bitflags::bitflags! {
    /// The eight sticky condition flags. Set by CMP and, for NZ/Z, as a
    /// side effect of any write to a destination register. Never
    /// auto-cleared at cycle boundaries — only CLF touches them.
    #[derive(Default)]
    pub struct FlagSet: u8 {
        const EQ = 0b0000_0001;
        const NE = 0b0000_0010;
        const LT = 0b0000_0100;
        const LE = 0b0000_1000;
        const GT = 0b0001_0000;
        const GE = 0b0010_0000;
        const NZ = 0b0100_0000;
        const Z  = 0b1000_0000;
    }
}

/// An independent execution context: register file, flags, program
/// counter, and its own data/call stacks. `next` is the ring link used
/// by the scheduler — an index into its slot table, not a pointer.
pub struct Task {
    pub(crate) next: Option<usize>,
    pub flags: FlagSet,
    pub pc: u32,
    pub registers: [i32; REGISTER_COUNT],
    pub data_stack: FixedStack<i32>,
    pub call_stack: FixedStack<u32>,
}

impl Task {
    /// Allocates a task's two stacks and seeds its register file. Flags,
    /// stack pointers, and `pc` start zeroed/at `entry_pc`.
    pub fn init(entry_pc: u32, seed_registers: [i32; REGISTER_COUNT], call_stack_size: u32, data_stack_size: u32) -> Self {
        Self {
            next: None,
            flags: FlagSet::empty(),
            pc: entry_pc,
            registers: seed_registers,
            data_stack: FixedStack::with_capacity(data_stack_size as usize),
            call_stack: FixedStack::with_capacity(call_stack_size as usize),
        }
    }

    /// Current call-stack depth, i.e. `rpc`.
    pub fn rpc(&self) -> usize {
        self.call_stack.len()
    }

    /// Current data-stack depth, i.e. `sp`.
    pub fn sp(&self) -> usize {
        self.data_stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_zeroes_flags_and_stacks() {
        let task = Task::init(0, [0; REGISTER_COUNT], 8, 32);
        assert!(task.flags.is_empty());
        assert_eq!(task.sp(), 0);
        assert_eq!(task.rpc(), 0);
        assert_eq!(task.pc, 0);
    }

    #[test]
    fn init_copies_seed_registers() {
        let mut seed = [0; REGISTER_COUNT];
        seed[3] = 42;
        let task = Task::init(0, seed, 8, 32);
        assert_eq!(task.registers[3], 42);
    }
}
