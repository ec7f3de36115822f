//! Status-register field access.

use arml_ir::{Expr, StmtBuilder};
use arml_isa::{PsrField, Register};

use crate::context::ArmContext;
use crate::error::Result;

/// The field mask as a 32-bit constant.
pub fn psr_mask(field: PsrField) -> Expr {
    Expr::num_u64(u64::from(field.mask()), 32)
}

fn psr_mask_inverted(field: PsrField) -> Expr {
    Expr::num_u64(u64::from(!field.mask()), 32)
}

/// The PSR with everything but `field` masked off.
pub fn get_psr(ctx: &ArmContext, reg: Register, field: PsrField) -> Result<Expr> {
    Ok(Expr::and(ctx.reg(reg)?, psr_mask(field)))
}

/// Overwrite `field` with `value`: clear the field, then OR in the
/// zero-extended value shifted into position.
pub fn set_psr(
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    reg: Register,
    field: PsrField,
    value: Expr,
) -> Result<()> {
    let psr = ctx.reg(reg)?;
    let cleared = Expr::and(psr.clone(), psr_mask_inverted(field));
    let placed = Expr::shl(
        Expr::zext(32, value),
        Expr::num_u64(u64::from(field.shift()), 32),
    );
    b.put(psr, Expr::or(cleared, placed));
    Ok(())
}

/// Set every bit of `field`.
pub fn enable_psr(
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    reg: Register,
    field: PsrField,
) -> Result<()> {
    let psr = ctx.reg(reg)?;
    b.put(psr.clone(), Expr::or(psr, psr_mask(field)));
    Ok(())
}

/// Clear every bit of `field`.
pub fn disable_psr(
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    reg: Register,
    field: PsrField,
) -> Result<()> {
    let psr = ctx.reg(reg)?;
    b.put(psr.clone(), Expr::and(psr, psr_mask_inverted(field)));
    Ok(())
}

/// 1-bit test: is the (single-bit) CPSR field set?
pub fn flag_set(ctx: &ArmContext, field: PsrField) -> Result<Expr> {
    let masked = get_psr(ctx, Register::CPSR, field)?;
    Ok(Expr::eq(masked, psr_mask(field)))
}

/// The CPSR field as a 1-bit value.
pub fn flag_bit(ctx: &ArmContext, field: PsrField) -> Result<Expr> {
    Ok(Expr::extract(ctx.reg(Register::CPSR)?, 1, field.shift()))
}

/// The current carry flag, as the 1-bit carry-in for shifters.
pub fn carry_in(ctx: &ArmContext) -> Result<Expr> {
    flag_bit(ctx, PsrField::C)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arml_ir::Stmt;

    #[test]
    fn test_get_psr_masks() {
        let ctx = ArmContext::default();
        let e = get_psr(&ctx, Register::CPSR, PsrField::Z).unwrap();
        match e {
            Expr::Binary { right, .. } => {
                assert_eq!(*right, Expr::num_u64(0x4000_0000, 32));
            }
            e => panic!("unexpected shape: {e:?}"),
        }
    }

    #[test]
    fn test_set_psr_clears_then_ors() {
        let ctx = ArmContext::default();
        let mut b = StmtBuilder::with_capacity(1);
        set_psr(&ctx, &mut b, Register::CPSR, PsrField::Ge, Expr::num_u64(0b1010, 4)).unwrap();
        let stmts = b.finish();
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Stmt::Put { dst, src } => {
                assert_eq!(*dst, ctx.reg(Register::CPSR).unwrap());
                // or(and(cpsr, !mask), zext << 16)
                assert!(matches!(src, Expr::Binary { .. }));
            }
            s => panic!("unexpected statement: {s:?}"),
        }
    }

    #[test]
    fn test_flag_bit_position() {
        let ctx = ArmContext::default();
        match carry_in(&ctx).unwrap() {
            Expr::Extract { width: 1, pos: 29, .. } => {}
            e => panic!("unexpected shape: {e:?}"),
        }
    }
}
