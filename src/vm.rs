//! The VM proper: code image, task scheduler, running flag, and the
//! injected syscall port, wired together behind the lifecycle described
//! in §3/§4.4 (uninitialized → loaded-stopped → running → halted).

use tracing::{debug, trace};

use crate::{
    code::CodeImage,
    consts::REGISTER_COUNT,
    error::VmError,
    interpreter,
    scheduler::{Scheduler, TaskId},
    syscall::SyscallPort,
    task::Task,
};

pub struct Vm<S: SyscallPort> {
    code: Option<CodeImage>,
    scheduler: Scheduler,
    running: bool,
    syscall: S,
    cycles: u64,
}

impl<S: SyscallPort> Vm<S> {
    /// Constructs an uninitialized VM around the given syscall port. No
    /// code is installed and no task exists until [`Vm::load`].
    pub fn new(syscall: S) -> Self {
        Self { code: None, scheduler: Scheduler::new(), running: false, syscall, cycles: 0 }
    }

    /// Installs `code`, spawns the initial task at PC 0 with the given
    /// seed registers, selects it as current, and sets the VM running.
    pub fn load(&mut self, code: CodeImage, seed_registers: [i32; REGISTER_COUNT]) -> Result<TaskId, VmError> {
        let call_stack_size = code.initial_call_stack_size();
        let data_stack_size = code.initial_data_stack_size();
        self.code = Some(code);

        let id = self.scheduler.create(0, seed_registers, call_stack_size, data_stack_size);
        self.scheduler.switch()?;
        self.running = true;
        self.cycles = 0;
        debug!(task = ?id, "vm loaded");
        Ok(id)
    }

    /// Frees every task and drops the code image, returning the VM to
    /// loaded-stopped (minus the code — a fresh [`Vm::load`] is needed to
    /// run again).
    pub fn unload(&mut self) {
        self.scheduler = Scheduler::new();
        self.code = None;
        self.running = false;
        debug!("vm unloaded");
    }

    /// Spawns an additional task sharing this VM's code image.
    pub fn create_task(&mut self, entry_pc: u32, seed_registers: [i32; REGISTER_COUNT]) -> Result<TaskId, VmError> {
        let code = self.code.as_ref().ok_or(VmError::NullArg)?;
        Ok(self.scheduler.create(
            entry_pc,
            seed_registers,
            code.initial_call_stack_size(),
            code.initial_data_stack_size(),
        ))
    }

    pub fn remove_task(&mut self, task: TaskId) -> Result<(), VmError> {
        self.scheduler.remove(task)
    }

    /// Advances the cursor to the next task in the ring.
    pub fn switch_task(&mut self) -> Result<(), VmError> {
        self.scheduler.switch()
    }

    pub fn block_switching(&mut self, blocked: bool) {
        self.scheduler.block(blocked);
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.scheduler.current()
    }

    pub fn current_task_id(&self) -> Option<TaskId> {
        self.scheduler.current_id()
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advances the current task by one instruction. See
    /// [`interpreter::step`] for the full contract.
    pub fn cycle(&mut self) -> Result<(), VmError> {
        let code = self.code.as_ref().ok_or(VmError::NotRunning)?;
        let task = self.scheduler.current_mut().ok_or(VmError::TaskNotFound)?;

        let result = interpreter::step(code, task, &mut self.running, &mut self.syscall);
        self.cycles += 1;
        trace!(cycle = self.cycles, result = ?result.is_ok(), "vm cycle");
        result
    }
}
