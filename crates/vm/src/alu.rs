//! Arithmetic/logic unit.
//!
//! The ALU reads two registers, applies an [`AluOp`], and writes the
//! result back to the first register. It never touches the PC.

use ls8_common::AluOp;
use tracing::trace;

use crate::error::VmError;
use crate::machine::Machine;

impl Machine {
    /// `registers[reg_a] = op(registers[reg_a], registers[reg_b])`, wrapping.
    pub fn alu(&mut self, op: AluOp, reg_a: usize, reg_b: usize) -> Result<(), VmError> {
        let x = self.read_register(reg_a)?;
        let y = self.read_register(reg_b)?;
        let result = op.apply(x, y);
        trace!(op = op.mnemonic(), x, y, result, "alu");
        self.write_register(reg_a, result)
    }

    /// Like [`Machine::alu`], but takes a raw ALU selector byte.
    pub fn alu_raw(&mut self, selector: u8, reg_a: usize, reg_b: usize) -> Result<(), VmError> {
        let op = AluOp::try_from(selector).map_err(|_| VmError::UnsupportedOperation {
            selector,
            at: self.pc,
        })?;
        self.alu(op, reg_a, reg_b)
    }
}
