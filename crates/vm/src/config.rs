//! Machine configuration.

use crate::error::VmError;

/// Default memory size in bytes.
pub const MEMORY_SIZE: usize = 256;

/// Default number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Register reserved as the stack pointer.
pub const SP: usize = 7;

/// Initial stack pointer value. The stack grows down from here.
pub const STACK_TOP: u8 = 0xF4;

/// Construction parameters for a [`Machine`](crate::Machine).
///
/// The defaults reproduce the fixed LS-8 layout: 256 bytes of memory,
/// 8 registers, stack pointer starting at `0xF4` with overflow and
/// underflow reported as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    /// Memory size in bytes. At most 256, since addresses are bytes.
    pub memory_size: usize,
    /// Number of registers. At least 8, since register 7 is the stack pointer.
    pub register_count: usize,
    /// Initial stack pointer value.
    pub stack_top: u8,
    /// Report PUSH at address 0 and POP at or above `stack_top` as
    /// out-of-bounds accesses. When off, the stack pointer wraps.
    pub stack_guard: bool,
    /// Cycle budget for [`Machine::run`](crate::Machine::run). `None` runs until HLT.
    pub step_limit: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: MEMORY_SIZE,
            register_count: REGISTER_COUNT,
            stack_top: STACK_TOP,
            stack_guard: true,
            step_limit: None,
        }
    }
}

impl MachineConfig {
    /// Set the cycle budget.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Enable or disable the stack guard.
    pub fn with_stack_guard(mut self, enabled: bool) -> Self {
        self.stack_guard = enabled;
        self
    }

    /// Check that the configuration describes a usable machine.
    pub fn validate(&self) -> Result<(), VmError> {
        if self.memory_size == 0 || self.memory_size > MEMORY_SIZE {
            return Err(VmError::InvalidConfig {
                reason: format!(
                    "memory size {} outside 1..={MEMORY_SIZE}",
                    self.memory_size
                ),
            });
        }
        if self.register_count < REGISTER_COUNT {
            return Err(VmError::InvalidConfig {
                reason: format!(
                    "register count {} below {REGISTER_COUNT} (register {SP} is the stack pointer)",
                    self.register_count
                ),
            });
        }
        if self.stack_top as usize > self.memory_size {
            return Err(VmError::InvalidConfig {
                reason: format!(
                    "stack top {:#04x} beyond memory size {}",
                    self.stack_top, self.memory_size
                ),
            });
        }
        Ok(())
    }
}
