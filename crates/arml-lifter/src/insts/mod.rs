//! Per-family instruction emitters.

pub(crate) mod alu;
pub(crate) mod branch;
pub(crate) mod extend;
pub(crate) mod mem;
pub(crate) mod misc;
pub(crate) mod mul;
pub(crate) mod multiple;
pub(crate) mod vfp;

use arml_ir::{Expr, StmtBuilder};
use arml_isa::{PsrField, Register};

use crate::arith::AddResult;
use crate::context::ArmContext;
use crate::error::Result;
use crate::psr;

/// Update N and Z from a result expression.
pub(crate) fn set_nz(ctx: &ArmContext, b: &mut StmtBuilder, result: &Expr) -> Result<()> {
    psr::set_psr(
        ctx,
        b,
        Register::CPSR,
        PsrField::N,
        Expr::extract_high(1, result.clone()),
    )?;
    psr::set_psr(
        ctx,
        b,
        Register::CPSR,
        PsrField::Z,
        Expr::eq(result.clone(), Expr::num0(result.width())),
    )
}

/// Update N, Z, and C; the carry comes from the shifter.
pub(crate) fn set_nzc(
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    result: &Expr,
    carry: Expr,
) -> Result<()> {
    set_nz(ctx, b, result)?;
    psr::set_psr(ctx, b, Register::CPSR, PsrField::C, carry)
}

/// Update N, Z, C, and V from an add-with-carry result.
pub(crate) fn set_nzcv(ctx: &ArmContext, b: &mut StmtBuilder, r: &AddResult) -> Result<()> {
    set_nzc(ctx, b, &r.result, r.carry_out.clone())?;
    psr::set_psr(ctx, b, Register::CPSR, PsrField::V, r.overflow.clone())
}
