//! Lifter error types.

use arml_bitvec::BitVecError;
use thiserror::Error;

/// Errors raised during instruction translation.
///
/// Architecturally-undefined inputs are not errors; they lift to
/// `SideEffect(UndefinedInstr)` or `Undef` expressions instead, so the IR
/// itself carries the unpredictability.
#[derive(Debug, Error)]
pub enum LiftError {
    #[error("operand tuple does not match {0}")]
    InvalidOperand(&'static str),

    #[error("unsupported register for {0}")]
    InvalidRegister(&'static str),

    #[error("inconsistent opcode: {0}")]
    InvalidOpcode(&'static str),

    #[error("shift amount must be nonzero")]
    InvalidShiftAmount,

    #[error("branch target mode is incompatible with the source mode")]
    InvalidTargetArchMode,

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error(transparent)]
    BitVec(#[from] BitVecError),
}

pub type Result<T> = std::result::Result<T, LiftError>;
