//! Machine state: memory, register file, program counter and halted flag.

use ls8_common::Program;
use tracing::debug;

use crate::config::{MachineConfig, SP};
use crate::error::{Access, VmError};

/// Execution state of a [`Machine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The machine will execute the instruction at PC on the next step.
    Running,
    /// HLT has executed. Terminal.
    Halted,
}

/// The LS-8 virtual machine.
///
/// Owns its memory and registers exclusively. State only changes through
/// the primitives below, [`Machine::load`], and the step/run loop.
#[derive(Debug, Clone)]
pub struct Machine {
    /// Byte-addressed memory.
    pub(crate) memory: Vec<u8>,
    /// General-purpose registers. Register 7 is the stack pointer.
    pub(crate) registers: Vec<u8>,
    /// Address of the next instruction byte to fetch.
    pub(crate) pc: usize,
    /// Set by HLT, never cleared.
    pub(crate) halted: bool,
    /// Instructions executed so far.
    pub(crate) cycles: u64,
    pub(crate) config: MachineConfig,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Create a machine with the default LS-8 layout.
    pub fn new() -> Self {
        Self::build(MachineConfig::default())
    }

    /// Create a machine from a custom configuration.
    pub fn with_config(config: MachineConfig) -> Result<Self, VmError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MachineConfig) -> Self {
        let mut registers = vec![0; config.register_count];
        registers[SP] = config.stack_top;
        Self {
            memory: vec![0; config.memory_size],
            registers,
            pc: 0,
            halted: false,
            cycles: 0,
            config,
        }
    }

    /// Copy a program into memory starting at address 0.
    ///
    /// Fails without touching memory if the program does not fit.
    pub fn load(&mut self, program: &Program) -> Result<(), VmError> {
        let capacity = self.memory.len();
        if program.len() > capacity {
            return Err(VmError::ProgramTooLarge {
                len: program.len(),
                capacity,
            });
        }
        self.memory[..program.len()].copy_from_slice(program.as_bytes());
        debug!(bytes = program.len(), capacity, "program loaded");
        Ok(())
    }

    /// Read the byte at `address`.
    pub fn read_memory(&self, address: usize) -> Result<u8, VmError> {
        self.memory
            .get(address)
            .copied()
            .ok_or_else(|| self.memory_fault(address))
    }

    /// Store `value` at `address`.
    pub fn write_memory(&mut self, address: usize, value: u8) -> Result<(), VmError> {
        let fault = self.memory_fault(address);
        let cell = self.memory.get_mut(address).ok_or(fault)?;
        *cell = value;
        Ok(())
    }

    /// Read register `index`.
    pub fn read_register(&self, index: usize) -> Result<u8, VmError> {
        self.registers
            .get(index)
            .copied()
            .ok_or_else(|| self.register_fault(index))
    }

    /// Store `value` in register `index`.
    pub fn write_register(&mut self, index: usize, value: u8) -> Result<(), VmError> {
        let fault = self.register_fault(index);
        let reg = self.registers.get_mut(index).ok_or(fault)?;
        *reg = value;
        Ok(())
    }

    /// Program counter.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Current stack pointer (register 7).
    pub fn sp(&self) -> u8 {
        self.registers[SP]
    }

    /// Whether HLT has executed.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Execution state.
    pub fn state(&self) -> State {
        if self.halted {
            State::Halted
        } else {
            State::Running
        }
    }

    /// Instructions executed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Read-only view of memory.
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Read-only view of the register file.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// The configuration this machine was built with.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub(crate) fn memory_fault(&self, address: usize) -> VmError {
        VmError::OutOfBoundsAccess {
            access: Access::Memory {
                address,
                size: self.memory.len(),
            },
            at: self.pc,
        }
    }

    pub(crate) fn register_fault(&self, index: usize) -> VmError {
        VmError::OutOfBoundsAccess {
            access: Access::Register {
                index,
                count: self.registers.len(),
            },
            at: self.pc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_machine_initial_state() {
        let m = Machine::new();
        assert_eq!(m.memory().len(), 256);
        assert!(m.memory().iter().all(|&b| b == 0));
        assert_eq!(m.registers(), &[0, 0, 0, 0, 0, 0, 0, 0xF4]);
        assert_eq!(m.pc(), 0);
        assert_eq!(m.sp(), 0xF4);
        assert_eq!(m.state(), State::Running);
        assert_eq!(m.cycles(), 0);
    }

    #[test]
    fn with_config_rejects_invalid() {
        let config = MachineConfig {
            register_count: 4,
            ..MachineConfig::default()
        };
        assert!(matches!(
            Machine::with_config(config),
            Err(VmError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn with_config_custom_layout() {
        let config = MachineConfig {
            memory_size: 64,
            register_count: 16,
            stack_top: 0x40,
            ..MachineConfig::default()
        };
        let m = Machine::with_config(config).unwrap();
        assert_eq!(m.memory().len(), 64);
        assert_eq!(m.registers().len(), 16);
        assert_eq!(m.sp(), 0x40);
    }

    #[test]
    fn memory_read_write() {
        let mut m = Machine::new();
        m.write_memory(0, 1).unwrap();
        m.write_memory(255, 0xAB).unwrap();
        assert_eq!(m.read_memory(0), Ok(1));
        assert_eq!(m.read_memory(255), Ok(0xAB));
    }

    #[test]
    fn memory_out_of_bounds() {
        let mut m = Machine::new();
        let expected = VmError::OutOfBoundsAccess {
            access: Access::Memory {
                address: 256,
                size: 256,
            },
            at: 0,
        };
        assert_eq!(m.read_memory(256), Err(expected.clone()));
        assert_eq!(m.write_memory(256, 1), Err(expected));
    }

    #[test]
    fn register_read_write() {
        let mut m = Machine::new();
        for i in 0..8 {
            m.write_register(i, i as u8 * 10).unwrap();
        }
        for i in 0..8 {
            assert_eq!(m.read_register(i), Ok(i as u8 * 10));
        }
    }

    #[test]
    fn register_out_of_bounds() {
        let mut m = Machine::new();
        assert!(matches!(
            m.read_register(8),
            Err(VmError::OutOfBoundsAccess {
                access: Access::Register { index: 8, count: 8 },
                ..
            })
        ));
        assert!(m.write_register(200, 1).is_err());
        assert_eq!(m.registers(), &[0, 0, 0, 0, 0, 0, 0, 0xF4]);
    }

    #[test]
    fn load_copies_from_zero() {
        let mut m = Machine::new();
        m.load(&Program::new(vec![1, 2, 3])).unwrap();
        assert_eq!(&m.memory()[..4], &[1, 2, 3, 0]);
    }

    #[test]
    fn load_full_memory() {
        let mut m = Machine::new();
        m.load(&Program::new(vec![0xAA; 256])).unwrap();
        assert!(m.memory().iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn load_too_large_leaves_memory_untouched() {
        let mut m = Machine::new();
        let err = m.load(&Program::new(vec![0xAA; 257])).unwrap_err();
        assert_eq!(
            err,
            VmError::ProgramTooLarge {
                len: 257,
                capacity: 256
            }
        );
        assert!(m.memory().iter().all(|&b| b == 0));
    }
}
