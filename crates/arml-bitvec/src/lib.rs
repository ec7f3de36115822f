//! Width-tagged bit-vector values.
//!
//! Every value carries its bit width and is kept masked to that width at all
//! times. Widths up to 64 bits use a `u64` fast path; wider values are backed
//! by `BigUint`. These values are the numeric backbone of IR constants and of
//! any downstream evaluator.

mod value;

pub use value::{BitVec, Repr};

use thiserror::Error;

/// Bit-vector error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitVecError {
    #[error("invalid bit width: {0}")]
    InvalidBitWidth(u32),

    #[error("operand width mismatch: {0} vs {1}")]
    ArithTypeMismatch(u32, u32),

    #[error("division by zero")]
    DivByZero,
}

pub type Result<T> = std::result::Result<T, BitVecError>;

/// Check that a width is one of the supported widths.
///
/// Supported: 1, 2 and 4 bits, and any positive multiple of 8 (which covers
/// 8 through 512 as well as byte-array widths).
pub const fn is_valid_width(width: u32) -> bool {
    matches!(width, 1 | 2 | 4) || (width >= 8 && width % 8 == 0)
}
