//! LS-8 virtual machine: executes byte-encoded programs.
//!
//! The machine is register based with:
//! - 256 bytes of memory, program loaded at address 0
//! - 8 byte-sized registers, register 7 doubling as the stack pointer
//! - a stack growing down from `0xF4`
//!
//! # Usage
//!
//! ```
//! use ls8_common::{Instruction, Program};
//! use ls8_vm::run_program;
//!
//! let program = Program::from_instructions(&[
//!     Instruction::ldi(0, 8),
//!     Instruction::prn(0),
//!     Instruction::hlt(),
//! ]);
//!
//! let mut printed = Vec::new();
//! let machine = run_program(&program, &mut printed).unwrap();
//! assert_eq!(printed, vec![8]);
//! assert!(machine.is_halted());
//! ```

pub mod config;
pub mod error;
pub mod machine;
pub mod output;

mod alu;
mod execute;
mod trace;

pub use config::{MachineConfig, MEMORY_SIZE, REGISTER_COUNT, SP, STACK_TOP};
pub use error::{Access, VmError};
pub use machine::{Machine, State};
pub use output::{OutputSink, StdoutSink};

use ls8_common::Program;

/// Load a program into a fresh default machine and run it to HLT.
///
/// Returns the halted machine so callers can inspect its final state.
///
/// # Errors
///
/// Returns [`VmError`] if the program does not fit in memory or
/// execution faults.
pub fn run_program(program: &Program, out: &mut dyn OutputSink) -> Result<Machine, VmError> {
    let mut machine = Machine::new();
    machine.load(program)?;
    machine.run(out)?;
    Ok(machine)
}
