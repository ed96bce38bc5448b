//! Runtime errors for the LS-8 machine.
//!
//! Every error raised while executing carries the program counter of the
//! faulting instruction (`at`) for debugging.

use std::fmt;

use thiserror::Error;

/// What an out-of-bounds access was trying to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Memory address outside `0..size`.
    Memory { address: usize, size: usize },
    /// Register index outside `0..count`.
    Register { index: usize, count: usize },
    /// PUSH with the stack pointer already at address 0.
    StackOverflow { sp: u8 },
    /// POP with the stack pointer at or above the top of the stack.
    StackUnderflow { sp: u8, top: u8 },
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Access::Memory { address, size } => {
                write!(f, "memory address {address:#04x} (size {size})")
            }
            Access::Register { index, count } => {
                write!(f, "register {index} (count {count})")
            }
            Access::StackOverflow { sp } => {
                write!(f, "stack overflow: push with stack pointer {sp:#04x}")
            }
            Access::StackUnderflow { sp, top } => write!(
                f,
                "stack underflow: pop with stack pointer {sp:#04x} (stack top {top:#04x})"
            ),
        }
    }
}

/// Errors that stop the machine.
///
/// None of these are recoverable: the run loop stops at the first one and
/// hands it to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// Memory, register or stack access outside its valid range.
    #[error("out-of-bounds access: {access} at pc {at:#04x}")]
    OutOfBoundsAccess { access: Access, at: usize },

    /// Opcode byte not in the instruction table.
    #[error("illegal instruction {opcode:#010b} at pc {at:#04x}")]
    IllegalInstruction { opcode: u8, at: usize },

    /// ALU selector outside the supported operations.
    #[error("unsupported ALU operation {selector} at pc {at:#04x}")]
    UnsupportedOperation { selector: u8, at: usize },

    /// Program does not fit in memory. Raised before any byte is written.
    #[error("program of {len} bytes exceeds memory capacity of {capacity} bytes")]
    ProgramTooLarge { len: usize, capacity: usize },

    /// The configured cycle budget ran out before HLT.
    #[error("step limit of {limit} cycles exceeded without halting")]
    StepLimitExceeded { limit: u64 },

    /// Rejected [`MachineConfig`](crate::MachineConfig).
    #[error("invalid machine configuration: {reason}")]
    InvalidConfig { reason: String },
}
