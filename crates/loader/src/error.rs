//! Error types for the LS-8 program loader.

use thiserror::Error;

/// Errors produced while loading binary-text programs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A binary literal wider than 8 bits.
    #[error("line {line}: binary literal '{token}' does not fit in a byte")]
    ByteOutOfRange { line: usize, token: String },

    /// More bytes than memory can hold.
    #[error("line {line}: program exceeds memory capacity of {capacity} bytes")]
    ProgramTooLarge { line: usize, capacity: usize },

    /// The program file could not be read.
    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },
}
