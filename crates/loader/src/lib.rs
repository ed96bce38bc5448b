//! LS-8 program loader: binary text to machine code.
//!
//! Programs are plain text with one byte per line, written as a base-2
//! literal. `#` starts a comment. Lines that hold no binary literal are
//! skipped.
//!
//! # Usage
//!
//! ```
//! use ls8_loader::parse;
//!
//! let text = "\
//! # print8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ";
//! let program = parse(text).unwrap();
//! assert_eq!(program.as_bytes(), &[0b1000_0010, 0, 8, 0b0100_0111, 0, 1]);
//! ```

pub mod error;

mod lexer;

pub use error::LoadError;

use std::fs;
use std::path::Path;

use lexer::parse_line;
use ls8_common::Program;
use tracing::debug;

/// Default load capacity: the LS-8 memory size.
pub const DEFAULT_CAPACITY: usize = 256;

/// Parse program text with the default 256-byte capacity.
pub fn parse(text: &str) -> Result<Program, LoadError> {
    parse_with_capacity(text, DEFAULT_CAPACITY)
}

/// Parse program text, failing once more than `capacity` bytes are seen.
///
/// Returns the first error encountered.
pub fn parse_with_capacity(text: &str, capacity: usize) -> Result<Program, LoadError> {
    let mut bytes = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        if let Some(byte) = parse_line(line, line_num)? {
            if bytes.len() == capacity {
                return Err(LoadError::ProgramTooLarge {
                    line: line_num,
                    capacity,
                });
            }
            bytes.push(byte);
        }
    }

    debug!(bytes = bytes.len(), "program parsed");
    Ok(Program::new(bytes))
}

/// Read and parse a program file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse(&text)
}
