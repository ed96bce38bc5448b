//! Output sinks for the PRN instruction.

/// Receives values printed by PRN.
pub trait OutputSink {
    /// Emit one register value.
    fn emit(&mut self, value: u8);
}

/// Collects printed values in order.
impl OutputSink for Vec<u8> {
    fn emit(&mut self, value: u8) {
        self.push(value);
    }
}

/// Writes each value to stdout as a decimal integer on its own line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, value: u8) {
        println!("{value}");
    }
}
