//! Condition-code gating.
//!
//! Every conditional instruction is bracketed: after the instruction-start
//! marker comes a conditional branch over the body, and the skip label lands
//! just before the instruction-end marker.

use arml_ir::{Expr, Label, StmtBuilder};
use arml_isa::{Condition, InstructionInfo, PsrField};

use crate::context::ArmContext;
use crate::error::Result;
use crate::psr;

/// The condition as a 1-bit expression over the CPSR flags.
pub fn cond_expr(ctx: &ArmContext, cond: Condition) -> Result<Expr> {
    use Condition::*;
    let n = psr::flag_set(ctx, PsrField::N);
    let z = psr::flag_set(ctx, PsrField::Z);
    let c = psr::flag_set(ctx, PsrField::C);
    let v = psr::flag_set(ctx, PsrField::V);
    Ok(match cond {
        EQ => z?,
        NE => Expr::not(z?),
        CS => c?,
        CC => Expr::not(c?),
        MI => n?,
        PL => Expr::not(n?),
        VS => v?,
        VC => Expr::not(v?),
        HI => Expr::and(c?, Expr::not(z?)),
        LS => Expr::not(Expr::and(c?, Expr::not(z?))),
        GE => Expr::eq(n?, v?),
        LT => Expr::ne(n?, v?),
        GT => Expr::and(Expr::eq(n?, v?), Expr::not(z?)),
        LE => Expr::not(Expr::and(Expr::eq(n?, v?), Expr::not(z?))),
        AL | UN => Expr::b1(),
    })
}

/// An open condition gate; [`finish`] closes it.
pub struct CondGate {
    fail: Option<Label>,
}

/// Begin the gate: for a conditional instruction, branch over the body when
/// the condition fails. AL/UN (and absent conditions) emit nothing.
pub fn start(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<CondGate> {
    match ins.condition {
        Some(cond) if !cond.is_unconditional() => {
            let pass = b.label("condPass");
            let fail = b.label("condFail");
            b.cjmp(cond_expr(ctx, cond)?, pass, fail);
            b.lmark(pass);
            Ok(CondGate { fail: Some(fail) })
        }
        _ => Ok(CondGate { fail: None }),
    }
}

/// Close the gate by placing the skip label.
pub fn finish(b: &mut StmtBuilder, gate: CondGate) {
    if let Some(fail) = gate.fail {
        b.lmark(fail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arml_ir::RelOp;

    #[test]
    fn test_al_is_true() {
        let ctx = ArmContext::default();
        assert_eq!(cond_expr(&ctx, Condition::AL).unwrap(), Expr::b1());
        assert_eq!(cond_expr(&ctx, Condition::UN).unwrap(), Expr::b1());
    }

    #[test]
    fn test_eq_tests_zero_flag() {
        let ctx = ArmContext::default();
        let e = cond_expr(&ctx, Condition::EQ).unwrap();
        assert!(matches!(e, Expr::Rel { op: RelOp::Eq, .. }));
        assert_eq!(e, psr::flag_set(&ctx, PsrField::Z).unwrap());
    }

    #[test]
    fn test_ls_is_negated_hi() {
        let ctx = ArmContext::default();
        let hi = cond_expr(&ctx, Condition::HI).unwrap();
        let ls = cond_expr(&ctx, Condition::LS).unwrap();
        assert_eq!(ls, Expr::not(hi));
    }

    #[test]
    fn test_ge_compares_n_and_v() {
        let ctx = ArmContext::default();
        let ge = cond_expr(&ctx, Condition::GE).unwrap();
        let lt = cond_expr(&ctx, Condition::LT).unwrap();
        assert!(matches!(ge, Expr::Rel { op: RelOp::Eq, .. }));
        assert!(matches!(lt, Expr::Rel { op: RelOp::Ne, .. }));
    }
}
