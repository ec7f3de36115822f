//! Multiply emitters.

use arml_ir::{Expr, StmtBuilder};
use arml_isa::{InstructionInfo, Operand, Operands};

use super::set_nz;
use crate::context::ArmContext;
use crate::error::{LiftError, Result};

/// MUL: low 32 bits of the product. C and V are untouched (ARMv5 and
/// later).
pub(crate) fn mul(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    set_flags: bool,
) -> Result<()> {
    match &ins.operands {
        Operands::Three(Operand::Reg(rd), Operand::Reg(rn), Operand::Reg(rm)) => {
            let dst = ctx.reg(*rd)?;
            b.put(dst.clone(), Expr::mul(ctx.reg(*rn)?, ctx.reg(*rm)?));
            if set_flags {
                set_nz(ctx, b, &dst)?;
            }
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand("mul")),
    }
}

/// MLA/MLS: multiply-accumulate and multiply-subtract.
pub(crate) fn mla(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    subtract: bool,
    set_flags: bool,
) -> Result<()> {
    match &ins.operands {
        Operands::Four(
            Operand::Reg(rd),
            Operand::Reg(rn),
            Operand::Reg(rm),
            Operand::Reg(ra),
        ) => {
            let product = Expr::mul(ctx.reg(*rn)?, ctx.reg(*rm)?);
            let acc = ctx.reg(*ra)?;
            let value = if subtract {
                Expr::sub(acc, product)
            } else {
                Expr::add(product, acc)
            };
            let dst = ctx.reg(*rd)?;
            b.put(dst.clone(), value);
            if set_flags {
                set_nz(ctx, b, &dst)?;
            }
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    }
}

fn parse_long(
    ins: &InstructionInfo,
) -> Result<(
    arml_isa::Register,
    arml_isa::Register,
    arml_isa::Register,
    arml_isa::Register,
)> {
    match &ins.operands {
        Operands::Four(
            Operand::Reg(rdlo),
            Operand::Reg(rdhi),
            Operand::Reg(rn),
            Operand::Reg(rm),
        ) => Ok((*rdlo, *rdhi, *rn, *rm)),
        _ => Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    }
}

fn widen(signed: bool, e: Expr) -> Expr {
    if signed {
        Expr::sext(64, e)
    } else {
        Expr::zext(64, e)
    }
}

/// UMULL/SMULL: a full 64-bit product split across two registers.
pub(crate) fn mul_long(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    signed: bool,
    set_flags: bool,
) -> Result<()> {
    let (rdlo, rdhi, rn, rm) = parse_long(ins)?;
    let t = b.tmp_var(64);
    b.put(
        t.clone(),
        Expr::mul(widen(signed, ctx.reg(rn)?), widen(signed, ctx.reg(rm)?)),
    );
    b.put(ctx.reg(rdlo)?, Expr::extract_low(32, t.clone()));
    b.put(ctx.reg(rdhi)?, Expr::extract_high(32, t.clone()));
    if set_flags {
        set_nz(ctx, b, &t)?;
    }
    Ok(())
}

/// UMLAL/SMLAL: 64-bit multiply-accumulate onto a register pair.
pub(crate) fn mul_acc_long(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    signed: bool,
    set_flags: bool,
) -> Result<()> {
    let (rdlo, rdhi, rn, rm) = parse_long(ins)?;
    let acc = Expr::concat(ctx.reg(rdhi)?, ctx.reg(rdlo)?);
    let t = b.tmp_var(64);
    b.put(
        t.clone(),
        Expr::add(
            Expr::mul(widen(signed, ctx.reg(rn)?), widen(signed, ctx.reg(rm)?)),
            acc,
        ),
    );
    b.put(ctx.reg(rdlo)?, Expr::extract_low(32, t.clone()));
    b.put(ctx.reg(rdhi)?, Expr::extract_high(32, t.clone()));
    if set_flags {
        set_nz(ctx, b, &t)?;
    }
    Ok(())
}
