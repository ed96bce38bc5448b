//! Instruction decoding and encoding for the LS-8 instruction set.
//!
//! Instructions are variable length: one opcode byte followed by zero to
//! two operand bytes. Operands are register indices, except the second
//! operand of `LDI`, which is an immediate value.

use std::fmt;

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// A decoded LS-8 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Operand bytes. Slots beyond `opcode.operand_count()` are zero.
    pub operands: [u8; 2],
}

impl Instruction {
    /// Create a new instruction. Operands the opcode does not use are cleared.
    pub fn new(opcode: Opcode, a: u8, b: u8) -> Self {
        let mut operands = [a, b];
        for slot in operands.iter_mut().skip(opcode.operand_count()) {
            *slot = 0;
        }
        Self { opcode, operands }
    }

    /// `HLT`
    pub fn hlt() -> Self {
        Self::new(Opcode::Hlt, 0, 0)
    }

    /// `LDI reg, value`
    pub fn ldi(reg: u8, value: u8) -> Self {
        Self::new(Opcode::Ldi, reg, value)
    }

    /// `PRN reg`
    pub fn prn(reg: u8) -> Self {
        Self::new(Opcode::Prn, reg, 0)
    }

    /// `MUL reg_a, reg_b`
    pub fn mul(reg_a: u8, reg_b: u8) -> Self {
        Self::new(Opcode::Mul, reg_a, reg_b)
    }

    /// `PUSH reg`
    pub fn push(reg: u8) -> Self {
        Self::new(Opcode::Push, reg, 0)
    }

    /// `POP reg`
    pub fn pop(reg: u8) -> Self {
        Self::new(Opcode::Pop, reg, 0)
    }

    /// First operand byte.
    pub fn operand_a(&self) -> u8 {
        self.operands[0]
    }

    /// Second operand byte.
    pub fn operand_b(&self) -> u8 {
        self.operands[1]
    }

    /// Encoded length in bytes.
    pub fn encoded_len(&self) -> usize {
        self.opcode.encoded_len()
    }

    /// Encode this instruction to its byte form.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.push(self.opcode as u8);
        bytes.extend_from_slice(&self.operands[..self.opcode.operand_count()]);
        bytes
    }

    /// Decode the instruction at the start of `bytes`.
    ///
    /// Only the bytes the opcode needs are read; anything after them is
    /// ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let first = *bytes.first().ok_or(DecodeError::Truncated {
            needed: 1,
            available: 0,
        })?;
        let opcode = Opcode::try_from(first)?;

        let needed = opcode.encoded_len();
        if bytes.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                available: bytes.len(),
            });
        }

        let mut operands = [0u8; 2];
        operands[..needed - 1].copy_from_slice(&bytes[1..needed]);
        Ok(Self { opcode, operands })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode.mnemonic();
        let [a, b] = self.operands;
        match self.opcode {
            Opcode::Hlt => write!(f, "{name}"),
            Opcode::Prn | Opcode::Push | Opcode::Pop => write!(f, "{name} R{a}"),
            Opcode::Ldi => write!(f, "{name} R{a},{b}"),
            Opcode::Mul => write!(f, "{name} R{a},R{b}"),
        }
    }
}
