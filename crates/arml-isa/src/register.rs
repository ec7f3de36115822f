//! ARM32 register set, condition codes, and operating mode.

/// ARM core, status, and VFP registers.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    SP,
    LR,
    PC,
    // Status registers.
    APSR,
    CPSR,
    SPSR,
    FPSCR,
    // VFP single-precision registers.
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
    S10,
    S11,
    S12,
    S13,
    S14,
    S15,
    S16,
    S17,
    S18,
    S19,
    S20,
    S21,
    S22,
    S23,
    S24,
    S25,
    S26,
    S27,
    S28,
    S29,
    S30,
    S31,
    // VFP double-precision registers.
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
    D9,
    D10,
    D11,
    D12,
    D13,
    D14,
    D15,
    D16,
    D17,
    D18,
    D19,
    D20,
    D21,
    D22,
    D23,
    D24,
    D25,
    D26,
    D27,
    D28,
    D29,
    D30,
    D31,
}

impl Register {
    /// Static base register alias.
    pub const SB: Self = Self::R9;
    /// Stack limit alias.
    pub const SL: Self = Self::R10;
    /// Frame pointer alias.
    pub const FP: Self = Self::R11;
    /// Intra-procedure-call scratch alias.
    pub const IP: Self = Self::R12;

    /// ARM core-register number (R0 = 0 … PC = 15), if this is a core
    /// register. This numbering defines register-list mask bits.
    pub const fn number(self) -> Option<u32> {
        match self {
            Self::R0 => Some(0),
            Self::R1 => Some(1),
            Self::R2 => Some(2),
            Self::R3 => Some(3),
            Self::R4 => Some(4),
            Self::R5 => Some(5),
            Self::R6 => Some(6),
            Self::R7 => Some(7),
            Self::R8 => Some(8),
            Self::R9 => Some(9),
            Self::R10 => Some(10),
            Self::R11 => Some(11),
            Self::R12 => Some(12),
            Self::SP => Some(13),
            Self::LR => Some(14),
            Self::PC => Some(15),
            _ => None,
        }
    }

    /// Core register for an ARM register number.
    pub const fn from_number(n: u32) -> Option<Self> {
        match n {
            0 => Some(Self::R0),
            1 => Some(Self::R1),
            2 => Some(Self::R2),
            3 => Some(Self::R3),
            4 => Some(Self::R4),
            5 => Some(Self::R5),
            6 => Some(Self::R6),
            7 => Some(Self::R7),
            8 => Some(Self::R8),
            9 => Some(Self::R9),
            10 => Some(Self::R10),
            11 => Some(Self::R11),
            12 => Some(Self::R12),
            13 => Some(Self::SP),
            14 => Some(Self::LR),
            15 => Some(Self::PC),
            _ => None,
        }
    }

    pub const fn is_core(self) -> bool {
        self.number().is_some()
    }

    pub const fn is_status(self) -> bool {
        matches!(self, Self::APSR | Self::CPSR | Self::SPSR | Self::FPSCR)
    }

    pub const fn is_single_vfp(self) -> bool {
        (self as u32) >= (Self::S0 as u32) && (self as u32) <= (Self::S31 as u32)
    }

    pub const fn is_double_vfp(self) -> bool {
        (self as u32) >= (Self::D0 as u32) && (self as u32) <= (Self::D31 as u32)
    }

    /// Register width in bits.
    pub const fn width(self) -> u32 {
        if self.is_double_vfp() {
            64
        } else {
            32
        }
    }

    /// Canonical register name.
    pub const fn name(self) -> &'static str {
        REGISTER_NAMES[self as usize]
    }

    /// Every register, in declaration order. Indexing this array with
    /// `reg as usize` yields the register itself.
    pub const ALL: [Self; 84] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
        Self::R8,
        Self::R9,
        Self::R10,
        Self::R11,
        Self::R12,
        Self::SP,
        Self::LR,
        Self::PC,
        Self::APSR,
        Self::CPSR,
        Self::SPSR,
        Self::FPSCR,
        Self::S0,
        Self::S1,
        Self::S2,
        Self::S3,
        Self::S4,
        Self::S5,
        Self::S6,
        Self::S7,
        Self::S8,
        Self::S9,
        Self::S10,
        Self::S11,
        Self::S12,
        Self::S13,
        Self::S14,
        Self::S15,
        Self::S16,
        Self::S17,
        Self::S18,
        Self::S19,
        Self::S20,
        Self::S21,
        Self::S22,
        Self::S23,
        Self::S24,
        Self::S25,
        Self::S26,
        Self::S27,
        Self::S28,
        Self::S29,
        Self::S30,
        Self::S31,
        Self::D0,
        Self::D1,
        Self::D2,
        Self::D3,
        Self::D4,
        Self::D5,
        Self::D6,
        Self::D7,
        Self::D8,
        Self::D9,
        Self::D10,
        Self::D11,
        Self::D12,
        Self::D13,
        Self::D14,
        Self::D15,
        Self::D16,
        Self::D17,
        Self::D18,
        Self::D19,
        Self::D20,
        Self::D21,
        Self::D22,
        Self::D23,
        Self::D24,
        Self::D25,
        Self::D26,
        Self::D27,
        Self::D28,
        Self::D29,
        Self::D30,
        Self::D31,
    ];
}

const REGISTER_NAMES: [&str; 84] = [
    "R0", "R1", "R2", "R3", "R4", "R5", "R6", "R7", "R8", "R9", "R10", "R11", "R12", "SP", "LR",
    "PC", "APSR", "CPSR", "SPSR", "FPSCR", "S0", "S1", "S2", "S3", "S4", "S5", "S6", "S7", "S8",
    "S9", "S10", "S11", "S12", "S13", "S14", "S15", "S16", "S17", "S18", "S19", "S20", "S21",
    "S22", "S23", "S24", "S25", "S26", "S27", "S28", "S29", "S30", "S31", "D0", "D1", "D2", "D3",
    "D4", "D5", "D6", "D7", "D8", "D9", "D10", "D11", "D12", "D13", "D14", "D15", "D16", "D17",
    "D18", "D19", "D20", "D21", "D22", "D23", "D24", "D25", "D26", "D27", "D28", "D29", "D30",
    "D31",
];

/// The 16-bit register-list mask: bit n set iff register number n is listed.
pub fn register_mask(regs: &[Register]) -> u16 {
    let mut mask = 0u16;
    for reg in regs {
        if let Some(n) = reg.number() {
            mask |= 1 << n;
        }
    }
    mask
}

/// Condition codes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Condition {
    EQ,
    NE,
    CS,
    CC,
    MI,
    PL,
    VS,
    VC,
    HI,
    LS,
    GE,
    LT,
    GT,
    LE,
    AL,
    /// Unconditional (the 0b1111 encoding space).
    UN,
}

impl Condition {
    /// True when the condition never gates execution.
    pub const fn is_unconditional(self) -> bool {
        matches!(self, Self::AL | Self::UN)
    }
}

/// Instruction-set state of the processor.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OperatingMode {
    #[default]
    Arm,
    Thumb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_numbering() {
        assert_eq!(Register::R0.number(), Some(0));
        assert_eq!(Register::SP.number(), Some(13));
        assert_eq!(Register::LR.number(), Some(14));
        assert_eq!(Register::PC.number(), Some(15));
        assert_eq!(Register::CPSR.number(), None);
        assert_eq!(Register::from_number(9), Some(Register::R9));
        assert_eq!(Register::from_number(16), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Register::SB, Register::R9);
        assert_eq!(Register::SL, Register::R10);
        assert_eq!(Register::FP, Register::R11);
        assert_eq!(Register::IP, Register::R12);
    }

    #[test]
    fn test_register_mask() {
        let mask = register_mask(&[Register::R4, Register::R5, Register::LR]);
        assert_eq!(mask, (1 << 4) | (1 << 5) | (1 << 14));
        assert_eq!(register_mask(&[Register::PC]), 1 << 15);
    }

    #[test]
    fn test_vfp_classification() {
        assert!(Register::S0.is_single_vfp());
        assert!(Register::S31.is_single_vfp());
        assert!(!Register::D0.is_single_vfp());
        assert!(Register::D31.is_double_vfp());
        assert_eq!(Register::S3.width(), 32);
        assert_eq!(Register::D3.width(), 64);
    }

    #[test]
    fn test_names() {
        assert_eq!(Register::R0.name(), "R0");
        assert_eq!(Register::FPSCR.name(), "FPSCR");
        assert_eq!(Register::S31.name(), "S31");
        assert_eq!(Register::D31.name(), "D31");
    }

    #[test]
    fn test_all_indexing() {
        for (i, reg) in Register::ALL.iter().enumerate() {
            assert_eq!(*reg as usize, i);
        }
    }
}
