//! Decode errors for LS-8 instruction bytes.

use thiserror::Error;

/// Errors that occur while decoding instruction bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Byte does not name any opcode in the instruction table.
    #[error("unknown opcode: {0:#010b}")]
    UnknownOpcode(u8),

    /// ALU selector outside the supported operations.
    #[error("unsupported ALU operation selector: {0}")]
    UnsupportedAluOp(u8),

    /// Not enough bytes left for the opcode's operands.
    #[error("truncated instruction: needed {needed} byte(s), {available} available")]
    Truncated { needed: usize, available: usize },
}
