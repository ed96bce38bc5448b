//! Opcode and ALU operation definitions for the LS-8 instruction set.
//!
//! Opcode bytes follow the LS-8 layout `AABCDDDD`:
//! ```text
//! AA    number of operand bytes (0-2)
//! B     1 if the instruction is handled by the ALU
//! C     1 if the instruction sets the PC itself
//! DDDD  instruction identifier
//! ```

use crate::error::DecodeError;

/// Identifies the operation to perform.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Halt the machine.
    Hlt = 0b0000_0001,
    /// Load an immediate value into a register.
    Ldi = 0b1000_0010,
    /// Print a register's value as a decimal integer.
    Prn = 0b0100_0111,
    /// Multiply two registers, storing the result in the first.
    Mul = 0b1010_0010,
    /// Push a register onto the stack.
    Push = 0b0100_0101,
    /// Pop the top of the stack into a register.
    Pop = 0b0100_0110,
}

/// All valid opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 6] = [
    Opcode::Hlt,
    Opcode::Ldi,
    Opcode::Prn,
    Opcode::Mul,
    Opcode::Push,
    Opcode::Pop,
];

/// Bit 5 of an opcode byte marks ALU instructions.
const ALU_FLAG: u8 = 0b0010_0000;

/// Bit 4 of an opcode byte marks instructions that set the PC themselves.
const SETS_PC_FLAG: u8 = 0b0001_0000;

impl Opcode {
    /// Number of operand bytes following the opcode.
    pub fn operand_count(self) -> usize {
        match self {
            Opcode::Hlt => 0,
            Opcode::Prn | Opcode::Push | Opcode::Pop => 1,
            Opcode::Ldi | Opcode::Mul => 2,
        }
    }

    /// Total encoded length in bytes (opcode plus operands).
    pub fn encoded_len(self) -> usize {
        1 + self.operand_count()
    }

    /// Whether this instruction is routed through the ALU.
    pub fn is_alu(self) -> bool {
        (self as u8) & ALU_FLAG != 0
    }

    /// Whether this instruction manages the PC itself instead of falling
    /// through to the next instruction. No current opcode does.
    pub fn sets_pc(self) -> bool {
        (self as u8) & SETS_PC_FLAG != 0
    }

    /// The ALU operation this opcode performs, if it is an ALU instruction.
    pub fn alu_op(self) -> Option<AluOp> {
        match self {
            Opcode::Mul => Some(AluOp::Mul),
            _ => None,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ldi => "LDI",
            Opcode::Prn => "PRN",
            Opcode::Mul => "MUL",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0b0000_0001 => Ok(Opcode::Hlt),
            0b1000_0010 => Ok(Opcode::Ldi),
            0b0100_0111 => Ok(Opcode::Prn),
            0b1010_0010 => Ok(Opcode::Mul),
            0b0100_0101 => Ok(Opcode::Push),
            0b0100_0110 => Ok(Opcode::Pop),
            other => Err(DecodeError::UnknownOpcode(other)),
        }
    }
}

/// Binary operations performed by the arithmetic/logic unit.
///
/// The discriminant is the ALU selector: the low nibble of an ALU-class
/// opcode byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// Wrapping byte addition.
    Add = 0,
    /// Wrapping byte multiplication.
    Mul = 2,
}

impl AluOp {
    /// Apply the operation to two register values. Results wrap modulo 256.
    pub fn apply(self, x: u8, y: u8) -> u8 {
        match self {
            AluOp::Add => x.wrapping_add(y),
            AluOp::Mul => x.wrapping_mul(y),
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Mul => "MUL",
        }
    }
}

impl TryFrom<u8> for AluOp {
    type Error = DecodeError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(AluOp::Add),
            2 => Ok(AluOp::Mul),
            other => Err(DecodeError::UnsupportedAluOp(other)),
        }
    }
}
