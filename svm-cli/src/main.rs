//! Command-line driver for the SVM assembler and virtual machine.
//!
//! This binary is a thin collaborator around the `svm`/`svm-asm` core: it
//! owns file I/O, exit-code mapping, and the cycle-budget knob — none of
//! which belong in the core itself.

use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use svm::{CodeImage, SyscallPort, Vm, VmError, REGISTER_COUNT};
use svm_asm::AsmError;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CYCLES: u64 = 1_000_000;

/// A syscall number of `1` prints `R0` as a decimal integer to stdout;
/// every other number is a no-op. Stands in for a real device (the demo
/// screen peripheral is out of scope, §1) while still giving a guest
/// program a way to produce observable output under `svm run`.
struct PrintIntSyscallPort;

impl SyscallPort for PrintIntSyscallPort {
    fn call(&mut self, registers: &mut [i32; REGISTER_COUNT], number: i32) -> Result<(), VmError> {
        if number == 1 {
            println!("{}", registers[0]);
        }
        Ok(())
    }
}

#[derive(Parser)]
#[command(name = "svm", version, about = "Assembler and VM for the SVM bytecode format")]
struct Cli {
    /// Increase log verbosity (-v, -vv). Overrides RUST_LOG when given.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Caps total VM cycles before `run` gives up. Overrides MAX_CYCLES.
    #[arg(long, global = true)]
    max_cycles: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a source file and print its packed words to stdout.
    Asm { file: PathBuf },
    /// Assemble and run a source file until it halts or the cycle budget is exhausted.
    Run { file: PathBuf },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn max_cycles(cli_flag: Option<u64>) -> u64 {
    if let Some(n) = cli_flag {
        return n;
    }
    match std::env::var("MAX_CYCLES") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "MAX_CYCLES is not a valid number, using default");
            DEFAULT_MAX_CYCLES
        }),
        Err(_) => DEFAULT_MAX_CYCLES,
    }
}

fn read_source(path: &PathBuf) -> Result<String, AsmError> {
    fs::read_to_string(path).map_err(|source| AsmError::FileOpenFailed {
        path: path.display().to_string(),
        source,
    })
}

fn run_asm(file: PathBuf) -> Result<(), ExitCode> {
    let source = read_source(&file).map_err(|e| report_asm_error(&e))?;
    let words = svm_asm::assemble(&source).map_err(|e| report_asm_error(&e))?;
    for word in words {
        println!("{word:#010x}");
    }
    Ok(())
}

fn run_run(file: PathBuf, cycle_budget: u64) -> Result<(), ExitCode> {
    let source = read_source(&file).map_err(|e| report_asm_error(&e))?;
    let words = svm_asm::assemble(&source).map_err(|e| report_asm_error(&e))?;

    let mut vm = Vm::new(PrintIntSyscallPort);
    vm.load(CodeImage::with_defaults(words), [0; REGISTER_COUNT]).map_err(|e| report_vm_error(&e))?;

    let mut cycles = 0u64;
    while vm.running() {
        if cycles >= cycle_budget {
            eprintln!("svm: cycle budget of {cycle_budget} exceeded");
            return Err(ExitCode::from(1));
        }
        match vm.cycle() {
            Ok(()) => {}
            Err(VmError::CodeOverflow) => break,
            Err(e) => return Err(report_vm_error(&e)),
        }
        cycles += 1;
    }
    Ok(())
}

/// Error-ordinal exit codes: the taxonomy position plus one, so `0`
/// stays reserved for success.
fn report_asm_error(err: &AsmError) -> ExitCode {
    eprintln!("svm: assembly failed: {err}");
    let ordinal = match err {
        AsmError::NullArg => 1,
        AsmError::BadAlloc => 2,
        AsmError::ArgConstraintUnsatisfied { .. } => 3,
        AsmError::UndefinedLabel { .. } => 4,
        AsmError::FileOpenFailed { .. } => 5,
        AsmError::ExpectedToken { .. } => 6,
        AsmError::Decode(_) => 7,
        _ => 99,
    };
    ExitCode::from(ordinal)
}

fn report_vm_error(err: &VmError) -> ExitCode {
    eprintln!("svm: execution failed: {err}");
    let ordinal = match err {
        VmError::Generic => 1,
        VmError::NullArg => 2,
        VmError::BadAlloc => 3,
        VmError::NotRunning => 4,
        VmError::CodeOverflow => 5,
        VmError::ArgNotReg => 6,
        VmError::PushArgBadOrder => 7,
        VmError::JmpOverflow => 8,
        VmError::CallStkOverflow => 9,
        VmError::CallStkUnderflow => 10,
        VmError::StkOverflow => 11,
        VmError::StkUnderflow => 12,
        VmError::TaskNotFound => 13,
        VmError::TaskSwitchBlocked => 14,
        VmError::UnknownInstruction => 15,
        _ => 99,
    };
    ExitCode::from(ordinal)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Asm { file } => run_asm(file),
        Command::Run { file } => run_run(file, max_cycles(cli.max_cycles)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_cycles_defaults_when_unset() {
        std::env::remove_var("MAX_CYCLES");
        assert_eq!(max_cycles(None), DEFAULT_MAX_CYCLES);
    }

    #[test]
    fn max_cycles_prefers_cli_flag_over_env() {
        std::env::set_var("MAX_CYCLES", "50");
        assert_eq!(max_cycles(Some(10)), 10);
        std::env::remove_var("MAX_CYCLES");
    }

    #[test]
    fn print_int_port_only_reacts_to_syscall_one() {
        let mut port = PrintIntSyscallPort;
        let mut regs = [0; REGISTER_COUNT];
        regs[0] = 7;
        assert!(port.call(&mut regs, 1).is_ok());
        assert!(port.call(&mut regs, 99).is_ok());
        assert_eq!(regs[0], 7);
    }
}
