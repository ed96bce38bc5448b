//! Fetch-decode-execute loop and opcode dispatch.

use ls8_common::{DecodeError, Instruction, Opcode};
use tracing::{debug, trace, warn};

use crate::config::SP;
use crate::error::{Access, VmError};
use crate::machine::{Machine, State};
use crate::output::OutputSink;

impl Machine {
    /// Run until HLT or error.
    ///
    /// With a configured step limit, fails with
    /// [`VmError::StepLimitExceeded`] once that many cycles have executed
    /// without halting.
    pub fn run(&mut self, out: &mut dyn OutputSink) -> Result<(), VmError> {
        self.run_with_hook(out, &mut |_| {})
    }

    /// Like [`Machine::run`], calling `hook` with the machine before each
    /// instruction executes. Used for tracing.
    pub fn run_with_hook(
        &mut self,
        out: &mut dyn OutputSink,
        hook: &mut dyn FnMut(&Machine),
    ) -> Result<(), VmError> {
        while !self.halted {
            if let Some(limit) = self.config.step_limit {
                if self.cycles >= limit {
                    return Err(VmError::StepLimitExceeded { limit });
                }
            }
            hook(self);
            self.step(out)?;
        }
        Ok(())
    }

    /// Execute one instruction.
    ///
    /// A halted machine is left untouched. On error the PC still points
    /// at the faulting instruction.
    pub fn step(&mut self, out: &mut dyn OutputSink) -> Result<State, VmError> {
        if self.halted {
            return Ok(State::Halted);
        }

        let at = self.pc;
        let instr = self.fetch()?;
        trace!(pc = at, %instr, "execute");

        match instr.opcode {
            Opcode::Hlt => {
                self.halted = true;
                debug!(pc = at, cycles = self.cycles + 1, "halted");
            }
            Opcode::Ldi => {
                self.write_register(instr.operand_a() as usize, instr.operand_b())?;
            }
            Opcode::Prn => {
                let value = self.read_register(instr.operand_a() as usize)?;
                out.emit(value);
            }
            Opcode::Mul => self.exec_alu(&instr)?,
            Opcode::Push => self.exec_push(instr.operand_a() as usize)?,
            Opcode::Pop => self.exec_pop(instr.operand_a() as usize)?,
        }

        self.cycles += 1;
        if !instr.opcode.sets_pc() {
            self.pc = at + instr.encoded_len();
        }
        Ok(self.state())
    }

    /// Decode the instruction at PC.
    ///
    /// The opcode byte must be in memory. The two bytes after it are read
    /// ahead when present, but only operands the opcode uses have to be.
    fn fetch(&self) -> Result<Instruction, VmError> {
        let opcode = self.read_memory(self.pc)?;
        let window_end = (self.pc + 3).min(self.memory.len());
        Instruction::decode(&self.memory[self.pc..window_end]).map_err(|e| match e {
            DecodeError::Truncated { available, .. } => self.memory_fault(self.pc + available),
            DecodeError::UnknownOpcode(_) | DecodeError::UnsupportedAluOp(_) => {
                VmError::IllegalInstruction {
                    opcode,
                    at: self.pc,
                }
            }
        })
    }

    fn exec_alu(&mut self, instr: &Instruction) -> Result<(), VmError> {
        let op = instr
            .opcode
            .alu_op()
            .ok_or(VmError::UnsupportedOperation {
                selector: instr.opcode as u8 & 0x0F,
                at: self.pc,
            })?;
        self.alu(op, instr.operand_a() as usize, instr.operand_b() as usize)
    }

    /// Pre-decrement SP, then store the register at the new SP.
    ///
    /// `PUSH R7` stores the already decremented stack pointer.
    fn exec_push(&mut self, reg: usize) -> Result<(), VmError> {
        self.read_register(reg)?;
        let sp = self.sp();
        if self.config.stack_guard && sp == 0 {
            return Err(self.stack_fault(Access::StackOverflow { sp }));
        }

        let (next, wrapped) = sp.overflowing_sub(1);
        if wrapped {
            warn!(pc = self.pc, "stack pointer wrapped below 0x00 on PUSH");
        }
        let value = if reg == SP { next } else { self.registers[reg] };
        self.write_memory(next as usize, value)?;
        self.registers[SP] = next;
        Ok(())
    }

    /// Load the value at SP into the register, then post-increment SP.
    ///
    /// `POP R7` increments the popped value, mirroring `PUSH R7`.
    fn exec_pop(&mut self, reg: usize) -> Result<(), VmError> {
        self.read_register(reg)?;
        let sp = self.sp();
        let top = self.config.stack_top;
        if self.config.stack_guard && sp >= top {
            return Err(self.stack_fault(Access::StackUnderflow { sp, top }));
        }

        let value = self.read_memory(sp as usize)?;
        self.registers[reg] = value;
        let (next, wrapped) = self.registers[SP].overflowing_add(1);
        if wrapped {
            warn!(pc = self.pc, "stack pointer wrapped past 0xff on POP");
        }
        self.registers[SP] = next;
        Ok(())
    }

    fn stack_fault(&self, access: Access) -> VmError {
        VmError::OutOfBoundsAccess {
            access,
            at: self.pc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use ls8_common::Program;

    fn machine(instrs: &[Instruction]) -> Machine {
        let mut m = Machine::new();
        m.load(&Program::from_instructions(instrs)).unwrap();
        m
    }

    #[test]
    fn ldi_sets_register_and_advances_3() {
        let mut m = machine(&[Instruction::ldi(3, 42)]);
        let mut out = Vec::new();
        assert_eq!(m.step(&mut out), Ok(State::Running));
        assert_eq!(m.read_register(3), Ok(42));
        assert_eq!(m.pc(), 3);
        assert_eq!(m.cycles(), 1);
    }

    #[test]
    fn prn_emits_and_advances_2() {
        let mut m = machine(&[Instruction::ldi(2, 99), Instruction::prn(2)]);
        let mut out = Vec::new();
        m.step(&mut out).unwrap();
        m.step(&mut out).unwrap();
        assert_eq!(out, vec![99]);
        assert_eq!(m.pc(), 5);
    }

    #[test]
    fn hlt_advances_1_and_halts() {
        let mut m = machine(&[Instruction::hlt()]);
        let mut out = Vec::new();
        assert_eq!(m.step(&mut out), Ok(State::Halted));
        assert_eq!(m.pc(), 1);
        assert!(m.is_halted());
    }

    #[test]
    fn step_after_halt_is_noop() {
        let mut m = machine(&[Instruction::hlt(), Instruction::ldi(0, 1)]);
        let mut out = Vec::new();
        m.step(&mut out).unwrap();
        assert_eq!(m.step(&mut out), Ok(State::Halted));
        assert_eq!(m.pc(), 1);
        assert_eq!(m.cycles(), 1);
        assert_eq!(m.read_register(0), Ok(0));
    }

    #[test]
    fn push_pre_decrements() {
        let mut m = machine(&[Instruction::ldi(0, 7), Instruction::push(0)]);
        let mut out = Vec::new();
        m.step(&mut out).unwrap();
        m.step(&mut out).unwrap();
        assert_eq!(m.sp(), 0xF3);
        assert_eq!(m.read_memory(0xF3), Ok(7));
        assert_eq!(m.pc(), 5);
    }

    #[test]
    fn pop_post_increments() {
        let mut m = machine(&[
            Instruction::ldi(0, 7),
            Instruction::push(0),
            Instruction::pop(1),
        ]);
        let mut out = Vec::new();
        for _ in 0..3 {
            m.step(&mut out).unwrap();
        }
        assert_eq!(m.read_register(1), Ok(7));
        assert_eq!(m.sp(), 0xF4);
        assert_eq!(m.pc(), 7);
    }

    #[test]
    fn push_pop_stack_pointer_roundtrips() {
        let mut m = machine(&[Instruction::push(7), Instruction::pop(7)]);
        let mut out = Vec::new();
        m.step(&mut out).unwrap();
        assert_eq!(m.read_memory(0xF3), Ok(0xF3));
        m.step(&mut out).unwrap();
        assert_eq!(m.sp(), 0xF4);
    }

    #[test]
    fn pop_on_empty_stack_underflows() {
        let mut m = machine(&[Instruction::pop(0)]);
        let mut out = Vec::new();
        assert_eq!(
            m.step(&mut out),
            Err(VmError::OutOfBoundsAccess {
                access: Access::StackUnderflow { sp: 0xF4, top: 0xF4 },
                at: 0
            })
        );
        assert_eq!(m.sp(), 0xF4);
        assert_eq!(m.pc(), 0);
    }

    #[test]
    fn push_at_zero_overflows() {
        let mut m = machine(&[Instruction::ldi(7, 0), Instruction::push(0)]);
        let mut out = Vec::new();
        m.step(&mut out).unwrap();
        assert_eq!(
            m.step(&mut out),
            Err(VmError::OutOfBoundsAccess {
                access: Access::StackOverflow { sp: 0 },
                at: 3
            })
        );
        assert_eq!(m.sp(), 0);
    }

    #[test]
    fn unguarded_stack_wraps() {
        let config = MachineConfig::default().with_stack_guard(false);
        let mut m = Machine::with_config(config).unwrap();
        m.load(&Program::from_instructions(&[
            Instruction::ldi(7, 0),
            Instruction::ldi(0, 0x55),
            Instruction::push(0),
            Instruction::pop(1),
        ]))
        .unwrap();
        let mut out = Vec::new();
        for _ in 0..3 {
            m.step(&mut out).unwrap();
        }
        assert_eq!(m.sp(), 0xFF);
        assert_eq!(m.read_memory(0xFF), Ok(0x55));
        m.step(&mut out).unwrap();
        assert_eq!(m.read_register(1), Ok(0x55));
        assert_eq!(m.sp(), 0x00);
    }

    #[test]
    fn unknown_opcode_is_illegal() {
        let mut m = Machine::new();
        m.load(&Program::new(vec![0b1111_1111])).unwrap();
        let mut out = Vec::new();
        assert_eq!(
            m.step(&mut out),
            Err(VmError::IllegalInstruction {
                opcode: 0xFF,
                at: 0
            })
        );
        assert!(!m.is_halted());
    }

    #[test]
    fn zeroed_memory_is_illegal() {
        let mut m = Machine::new();
        let mut out = Vec::new();
        assert!(matches!(
            m.run(&mut out),
            Err(VmError::IllegalInstruction { opcode: 0, at: 0 })
        ));
    }

    #[test]
    fn register_operand_out_of_range() {
        let mut m = machine(&[Instruction::prn(8)]);
        let mut out = Vec::new();
        assert!(matches!(
            m.step(&mut out),
            Err(VmError::OutOfBoundsAccess {
                access: Access::Register { index: 8, .. },
                at: 0
            })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn hlt_in_last_byte_needs_no_read_ahead() {
        let mut m = Machine::new();
        m.pc = 255;
        m.memory[255] = 0b0000_0001;
        let mut out = Vec::new();
        assert_eq!(m.step(&mut out), Ok(State::Halted));
        assert_eq!(m.pc(), 256);
    }

    #[test]
    fn operand_past_end_of_memory() {
        let mut m = Machine::new();
        m.pc = 254;
        m.memory[254] = Opcode::Ldi as u8;
        let mut out = Vec::new();
        assert_eq!(
            m.step(&mut out),
            Err(VmError::OutOfBoundsAccess {
                access: Access::Memory {
                    address: 256,
                    size: 256
                },
                at: 254
            })
        );
    }

    #[test]
    fn pc_past_end_of_memory() {
        let mut m = Machine::new();
        m.pc = 256;
        let mut out = Vec::new();
        assert!(matches!(
            m.step(&mut out),
            Err(VmError::OutOfBoundsAccess {
                access: Access::Memory { address: 256, .. },
                ..
            })
        ));
    }

    #[test]
    fn step_limit_stops_run() {
        let mut m = Machine::with_config(MachineConfig::default().with_step_limit(2)).unwrap();
        m.load(&Program::from_instructions(&[
            Instruction::ldi(0, 1),
            Instruction::ldi(1, 2),
            Instruction::ldi(2, 3),
            Instruction::hlt(),
        ]))
        .unwrap();
        let mut out = Vec::new();
        assert_eq!(
            m.run(&mut out),
            Err(VmError::StepLimitExceeded { limit: 2 })
        );
        assert_eq!(m.cycles(), 2);
        assert_eq!(m.pc(), 6);
    }

    #[test]
    fn hook_sees_each_instruction() {
        let mut m = machine(&[Instruction::ldi(0, 8), Instruction::prn(0), Instruction::hlt()]);
        let mut out = Vec::new();
        let mut seen = Vec::new();
        m.run_with_hook(&mut out, &mut |m| seen.push(m.trace_line()))
            .unwrap();
        assert_eq!(
            seen,
            vec![
                "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4",
                "TRACE: 03 | 47 00 01 | 08 00 00 00 00 00 00 F4",
                "TRACE: 05 | 01 00 00 | 08 00 00 00 00 00 00 F4",
            ]
        );
        assert_eq!(out, vec![8]);
    }

    #[test]
    fn step_limit_large_enough_halts() {
        let mut m = Machine::with_config(MachineConfig::default().with_step_limit(2)).unwrap();
        m.load(&Program::from_instructions(&[
            Instruction::ldi(0, 1),
            Instruction::hlt(),
        ]))
        .unwrap();
        let mut out = Vec::new();
        assert_eq!(m.run(&mut out), Ok(()));
    }
}
