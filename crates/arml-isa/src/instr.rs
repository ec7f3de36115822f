//! Decoded instruction record.

use crate::opcode::Opcode;
use crate::operand::Operands;
use crate::register::{Condition, OperatingMode};

/// One decoded ARM/Thumb instruction, as handed over by the decoder.
///
/// Borrowed read-only by the lifter.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InstructionInfo {
    /// Instruction address.
    pub address: u64,
    /// Encoded length in bytes (4 for ARM, 2 or 4 for Thumb).
    pub num_bytes: u32,
    /// Condition code; `None` behaves as AL.
    pub condition: Option<Condition>,
    pub opcode: Opcode,
    pub operands: Operands,
    /// Base-register write-back (the `!` suffix on block transfers).
    pub write_back: bool,
    /// Instruction-set state this instruction was decoded in.
    pub mode: OperatingMode,
}

impl InstructionInfo {
    /// Address just past this instruction.
    pub const fn end_address(&self) -> u64 {
        self.address + self.num_bytes as u64
    }

    /// The value the PC reads as from this instruction: two instructions
    /// ahead of the current one in either instruction set.
    pub const fn pc_read_value(&self) -> u64 {
        match self.mode {
            OperatingMode::Arm => self.address + 8,
            OperatingMode::Thumb => self.address + 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::Operands;

    #[test]
    fn test_pc_read_value() {
        let mut ins = InstructionInfo {
            address: 0x1000,
            num_bytes: 4,
            condition: Some(Condition::AL),
            opcode: Opcode::NOP,
            operands: Operands::None,
            write_back: false,
            mode: OperatingMode::Arm,
        };
        assert_eq!(ins.pc_read_value(), 0x1008);
        assert_eq!(ins.end_address(), 0x1004);
        ins.mode = OperatingMode::Thumb;
        ins.num_bytes = 2;
        assert_eq!(ins.pc_read_value(), 0x1004);
        assert_eq!(ins.end_address(), 0x1002);
    }
}
