//! Diagnostic state dump.

use std::fmt::Write as _;

use crate::machine::Machine;

impl Machine {
    /// One-line hex dump of PC, the three bytes at PC, and every register:
    ///
    /// ```text
    /// TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4
    /// ```
    ///
    /// Bytes past the end of memory show as `00`.
    pub fn trace_line(&self) -> String {
        let byte = |offset: usize| self.memory.get(self.pc + offset).copied().unwrap_or(0);

        let mut line = format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc,
            byte(0),
            byte(1),
            byte(2)
        );
        for reg in &self.registers {
            let _ = write!(line, " {reg:02X}");
        }
        line
    }
}
