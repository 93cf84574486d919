//! The execution cycle: fetch, decode, read operands, check the
//! predicate, execute, update sticky NZ/Z flags. One call to [`step`]
//! advances the given task by exactly one instruction or returns an
//! error without advancing it further than the IMM words it already
//! consumed (§4.4 is explicit that IMM consumption happens regardless of
//! whether the predicate ends up suppressing the instruction's effect).

mod alu;
mod flow;
mod stack_ops;

use svm_asm::{ArgKind, Ext, Opcode};

use crate::{code::CodeImage, error::VmError, syscall::SyscallPort, task::{FlagSet, Task}};

/// One decoded argument's kind plus the value it resolved to this cycle
/// (a register's current contents, or the literal word that followed
/// the instruction for an IMM operand).
#[derive(Clone, Copy)]
pub(crate) struct Operand {
    pub(crate) kind: ArgKind,
    pub(crate) value: i32,
}

fn read_operand(code: &CodeImage, task: &mut Task, kind: ArgKind) -> Result<Operand, VmError> {
    match kind {
        ArgKind::None => Ok(Operand { kind, value: 0 }),
        ArgKind::Reg(r) => Ok(Operand { kind, value: task.registers[r.index() as usize] }),
        ArgKind::Imm => {
            let word = code.word_at(task.pc).ok_or(VmError::CodeOverflow)?;
            task.pc += 1;
            Ok(Operand { kind, value: word as i32 })
        }
    }
}

fn reg_index(kind: ArgKind) -> Result<usize, VmError> {
    match kind {
        ArgKind::Reg(r) => Ok(r.index() as usize),
        _ => Err(VmError::ArgNotReg),
    }
}

fn write_register(task: &mut Task, kind: ArgKind, value: i32) -> Result<(), VmError> {
    let idx = reg_index(kind)?;
    task.registers[idx] = value;
    Ok(())
}

fn is_alu_op(op: Opcode) -> bool {
    matches!(
        op,
        Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::And | Opcode::Or | Opcode::Xor | Opcode::Shl | Opcode::Shr
    )
}

/// Executes the opcode's semantics against already-read operands.
/// Returns the value written to a destination register, if any — the
/// caller applies the sticky NZ/Z update from that.
fn execute<S: SyscallPort>(
    op: Opcode,
    ext: Ext,
    predicate: bool,
    arg1: Operand,
    arg2: Operand,
    task: &mut Task,
    running: &mut bool,
    code: &CodeImage,
    syscall: &mut S,
) -> Result<Option<i32>, VmError> {
    match op {
        Opcode::Nop => Ok(None),
        Opcode::End => {
            *running = false;
            Ok(None)
        }
        Opcode::Mov => {
            if !predicate {
                return Ok(None);
            }
            write_register(task, arg1.kind, arg2.value)?;
            Ok(Some(arg2.value))
        }
        op if is_alu_op(op) => {
            if !predicate {
                return Ok(None);
            }
            let dest = reg_index(arg1.kind)?;
            let value = alu::apply(op, task.registers[dest], arg2.value);
            task.registers[dest] = value;
            Ok(Some(value))
        }
        Opcode::Cmp => {
            if predicate {
                flow::compare(task, arg1.value, arg2.value);
            }
            Ok(None)
        }
        Opcode::Clf => {
            flow::clear_flags(task, ext);
            Ok(None)
        }
        Opcode::Jmp => {
            if predicate {
                flow::jump(task, arg1.value, code)?;
            }
            Ok(None)
        }
        Opcode::Inv => {
            if predicate {
                flow::invoke(task, arg1.value, code)?;
            }
            Ok(None)
        }
        Opcode::Ret => {
            flow::ret(task)?;
            Ok(None)
        }
        Opcode::Push => {
            if predicate {
                stack_ops::push(task, arg1, arg2)?;
            }
            Ok(None)
        }
        Opcode::Pop => {
            if predicate {
                stack_ops::pop(task, arg1, arg2)?;
            }
            Ok(None)
        }
        Opcode::Sys => {
            if predicate {
                syscall.call(&mut task.registers, arg1.value)?;
            }
            Ok(None)
        }
    }
}

/// Advances `task` by one instruction. See the module docs for the
/// overall contract.
pub(crate) fn step<S: SyscallPort>(
    code: &CodeImage,
    task: &mut Task,
    running: &mut bool,
    syscall: &mut S,
) -> Result<(), VmError> {
    if !*running {
        return Err(VmError::NotRunning);
    }
    if task.pc >= code.size() {
        *running = false;
        return Err(VmError::CodeOverflow);
    }

    let word = code.word_at(task.pc).expect("pc bounds checked above");
    task.pc += 1;

    let instr = svm_asm::unpack(word)?;

    let arg1 = read_operand(code, task, instr.arg1)?;
    let arg2 = read_operand(code, task, instr.arg2)?;

    let predicate = flow::predicate_holds(instr.ext, task.flags);

    let written = execute(instr.op, instr.ext, predicate, arg1, arg2, task, running, code, syscall)?;

    if let Some(value) = written {
        task.flags.insert(if value != 0 { FlagSet::NZ } else { FlagSet::Z });
    }

    Ok(())
}
