//! Statement IR.

use crate::expr::Expr;

/// An intra-instruction label.
///
/// The symbolic name is for readers; the index makes the label unique within
/// one instruction's statement list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Label {
    pub name: &'static str,
    pub index: u32,
}

/// Opaque side effects the IR cannot express as data flow.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SideEffect {
    /// Architecturally undefined instruction.
    UndefinedInstr,
    /// Floating-point semantics this lifter leaves opaque.
    UnsupportedFP,
    /// Supervisor call.
    SysCall,
    /// Software breakpoint.
    Breakpoint,
    /// Memory barrier (DMB/DSB/ISB).
    Fence,
}

/// Statement kinds.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Stmt {
    /// Instruction start marker: address and byte length.
    ISMark { addr: u64, len: u32 },
    /// Instruction end marker: address just past the instruction.
    IEMark { addr: u64 },
    /// Register or temporary write. `dst` must be `Var` or `Temp`.
    Put { dst: Expr, src: Expr },
    /// Little-endian memory write.
    Store { addr: Expr, value: Expr },
    /// Label definition.
    LMark(Label),
    /// Unconditional jump to a local label.
    Jmp(Label),
    /// Conditional branch on a 1-bit expression.
    CJmp {
        cond: Expr,
        taken: Label,
        not_taken: Label,
    },
    /// Jump out of the instruction to a computed address.
    InterJmp { pc: Expr, target: Expr },
    /// Opaque side effect.
    SideEffect(SideEffect),
}

impl Stmt {
    pub fn put(dst: Expr, src: Expr) -> Self {
        Self::Put { dst, src }
    }

    pub fn store(addr: Expr, value: Expr) -> Self {
        Self::Store { addr, value }
    }

    pub fn cjmp(cond: Expr, taken: Label, not_taken: Label) -> Self {
        Self::CJmp {
            cond,
            taken,
            not_taken,
        }
    }

    pub fn inter_jmp(pc: Expr, target: Expr) -> Self {
        Self::InterJmp { pc, target }
    }

    /// Check if this statement is an instruction boundary marker.
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::ISMark { .. } | Self::IEMark { .. })
    }
}
