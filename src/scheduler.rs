//! Cooperative round-robin task scheduler.
//!
//! Tasks live in an indexed slot table rather than being linked through
//! raw pointers: a task's `next` link is the index of its successor in
//! the ring, and the scheduler's own cursor is just another index. This
//! sidesteps the removal edge case in the original pointer-based ring
//! (comparing a node's `next` against itself) entirely — unlinking a
//! slot is ordinary index bookkeeping.

use tracing::{debug, trace};

use crate::{
    consts::REGISTER_COUNT,
    error::VmError,
    task::Task,
};

/// Opaque handle to a task, valid until that task is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub(crate) usize);

pub struct Scheduler {
    slots: Vec<Option<Task>>,
    head: Option<usize>,
    tail: Option<usize>,
    current: Option<usize>,
    block: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { slots: Vec::new(), head: None, tail: None, current: None, block: false }
    }

    /// Allocates and links a new task at the tail of the ring.
    pub fn create(
        &mut self,
        entry_pc: u32,
        seed_registers: [i32; REGISTER_COUNT],
        call_stack_size: u32,
        data_stack_size: u32,
    ) -> TaskId {
        let task = Task::init(entry_pc, seed_registers, call_stack_size, data_stack_size);
        let index = self.slots.len();
        self.slots.push(Some(task));

        match self.tail {
            Some(tail) => {
                self.slots[tail].as_mut().expect("tail slot occupied").next = Some(index);
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);

        let id = TaskId(index);
        debug!(task = ?id, entry_pc, "task created");
        id
    }

    /// Unlinks and frees a task. The caller must switch away from a task
    /// before removing it; removing the current task is rejected.
    pub fn remove(&mut self, task: TaskId) -> Result<(), VmError> {
        if self.current == Some(task.0) {
            debug!(task = ?task, "task removal rejected: task is current");
            return Err(VmError::TaskNotFound);
        }
        if self.slots.get(task.0).map_or(true, Option::is_none) {
            debug!(task = ?task, "task removal rejected: no such task");
            return Err(VmError::TaskNotFound);
        }

        let next = self.slots[task.0].as_ref().unwrap().next;
        let predecessor = self.head.filter(|&h| h != task.0).and_then(|h| {
            let mut cursor = h;
            loop {
                if self.slots[cursor].as_ref().unwrap().next == Some(task.0) {
                    break Some(cursor);
                }
                match self.slots[cursor].as_ref().unwrap().next {
                    Some(n) => cursor = n,
                    None => break None,
                }
            }
        });

        match predecessor {
            Some(idx) => self.slots[idx].as_mut().unwrap().next = next,
            None => self.head = next,
        }
        if self.tail == Some(task.0) {
            self.tail = predecessor;
        }

        self.slots[task.0] = None;
        debug!(task = ?task, "task removed");
        Ok(())
    }

    /// Advances the cursor to the next task in the ring, wrapping to
    /// `head` past the terminator. A no-op (beyond the block check) when
    /// the ring is empty.
    pub fn switch(&mut self) -> Result<(), VmError> {
        if self.block {
            trace!("task switch blocked");
            return Err(VmError::TaskSwitchBlocked);
        }
        self.current = match self.current {
            None => self.head,
            Some(idx) => {
                let next = self.slots[idx].as_ref().and_then(|t| t.next);
                next.or(self.head)
            }
        };
        trace!(current = ?self.current.map(TaskId), "scheduler switched");
        Ok(())
    }

    pub fn block(&mut self, blocked: bool) {
        self.block = blocked;
        debug!(blocked, "scheduler block flag set");
    }

    pub fn current_id(&self) -> Option<TaskId> {
        self.current.map(TaskId)
    }

    pub fn current(&self) -> Option<&Task> {
        self.current.and_then(|idx| self.slots[idx].as_ref())
    }

    pub fn current_mut(&mut self) -> Option<&mut Task> {
        match self.current {
            Some(idx) => self.slots[idx].as_mut(),
            None => None,
        }
    }

    pub fn get(&self, task: TaskId) -> Option<&Task> {
        self.slots.get(task.0).and_then(Option::as_ref)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
