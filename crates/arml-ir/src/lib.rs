//! Low-level intermediate representation.
//!
//! This crate provides pure IR types with no ARM-specific knowledge: an
//! expression tree, a statement list, and the append-only builder used to
//! accumulate one instruction's worth of statements. The ARM32 instruction
//! lifting lives in `arml-lifter`.

mod builder;
mod expr;
mod stmt;

pub use builder::*;
pub use expr::*;
pub use stmt::*;
