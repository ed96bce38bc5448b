//! Program representation for LS-8 machine code.
//!
//! A program is the raw byte image copied into memory starting at
//! address 0. The text form (`.ls8` files) holds one 8-digit binary
//! literal per line with optional `#` comments.

use std::fmt::Write as _;

use crate::instruction::Instruction;

/// An LS-8 program: the bytes loaded into memory from address 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Create a program from raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Build a program by encoding a sequence of instructions back to back.
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        let bytes = instructions.iter().flat_map(|i| i.encode()).collect();
        Self { bytes }
    }

    /// The raw program bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes in the program.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the program has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render the program in the binary text encoding.
    ///
    /// Bytes that start a decodable instruction carry its mnemonic as a
    /// comment; operand bytes and undecodable bytes are emitted bare.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let mut pc = 0;

        while pc < self.bytes.len() {
            match Instruction::decode(&self.bytes[pc..]) {
                Ok(instr) => {
                    let _ = writeln!(out, "{:08b} # {instr}", self.bytes[pc]);
                    for byte in &self.bytes[pc + 1..pc + instr.encoded_len()] {
                        let _ = writeln!(out, "{byte:08b}");
                    }
                    pc += instr.encoded_len();
                }
                Err(_) => {
                    let _ = writeln!(out, "{:08b}", self.bytes[pc]);
                    pc += 1;
                }
            }
        }

        out
    }
}

impl From<Vec<u8>> for Program {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
