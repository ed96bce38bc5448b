//! LS-8 common types and instruction encoding.
//!
//! This crate provides the foundational data structures for the LS-8
//! instruction set:
//!
//! - [`Opcode`]: the six opcodes of the machine
//! - [`AluOp`]: the closed set of arithmetic/logic operations
//! - [`Instruction`]: a decoded opcode plus operand bytes
//! - [`Program`]: the byte image loaded into memory
//! - [`DecodeError`]: errors from decoding instruction bytes

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use instruction::Instruction;
pub use opcode::{AluOp, Opcode, ALL_OPCODES};
pub use program::Program;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random valid Opcode.
    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(&ALL_OPCODES[..])
    }

    /// Strategy that generates a random valid Instruction.
    fn arb_instruction() -> impl Strategy<Value = Instruction> {
        (arb_opcode(), any::<u8>(), any::<u8>())
            .prop_map(|(op, a, b)| Instruction::new(op, a, b))
    }

    proptest! {
        /// For all valid instructions, encode then decode produces the original.
        #[test]
        fn encode_decode_roundtrip(instr in arb_instruction()) {
            let bytes = instr.encode();
            prop_assert_eq!(bytes.len(), instr.encoded_len());
            prop_assert_eq!(Instruction::decode(&bytes).unwrap(), instr);
        }

        /// Any byte either names an opcode or is reported as unknown.
        #[test]
        fn random_opcode_byte(byte in any::<u8>()) {
            match Opcode::try_from(byte) {
                Ok(op) => prop_assert_eq!(op as u8, byte),
                Err(e) => prop_assert_eq!(e, DecodeError::UnknownOpcode(byte)),
            }
        }

        /// MUL through the ALU always equals the product modulo 256.
        #[test]
        fn alu_mul_is_mod_256(x in any::<u8>(), y in any::<u8>()) {
            prop_assert_eq!(AluOp::Mul.apply(x, y) as u32, (x as u32 * y as u32) % 256);
        }
    }
}
