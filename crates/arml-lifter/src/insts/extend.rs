//! Extend, rotate-extend, and bit-field emitters.

use arml_ir::{Expr, StmtBuilder};
use arml_isa::{InstructionInfo, Operand, Operands, SrType};

use crate::context::ArmContext;
use crate::error::{LiftError, Result};
use crate::psr;
use crate::shift;

/// Rotate right by a multiple of eight; zero is the identity.
fn rotated(ctx: &ArmContext, rm: arml_isa::Register, rotation: u32) -> Result<Expr> {
    let value = ctx.reg(rm)?;
    if rotation == 0 {
        return Ok(value);
    }
    shift::shift(value, 32, SrType::ROR, rotation, psr::carry_in(ctx)?)
}

fn extended(width: u32, signed: bool, e: Expr) -> Expr {
    let low = Expr::extract_low(width, e);
    if signed {
        Expr::sext(32, low)
    } else {
        Expr::zext(32, low)
    }
}

/// SXTB/SXTH/UXTB/UXTH: rotate, narrow, extend.
pub(crate) fn extend(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    width: u32,
    signed: bool,
) -> Result<()> {
    let (rd, rm, rotation) = match &ins.operands {
        Operands::Two(Operand::Reg(rd), Operand::Reg(rm)) => (*rd, *rm, 0),
        Operands::Three(Operand::Reg(rd), Operand::Reg(rm), Operand::Shift(SrType::ROR, k)) => {
            (*rd, *rm, *k)
        }
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    let value = extended(width, signed, rotated(ctx, rm, rotation)?);
    b.put(ctx.reg(rd)?, value);
    Ok(())
}

/// SXTAB/SXTAH/UXTAB/UXTAH: extend, then accumulate onto rn.
pub(crate) fn extend_add(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    width: u32,
    signed: bool,
) -> Result<()> {
    let (rd, rn, rm, rotation) = match &ins.operands {
        Operands::Three(Operand::Reg(rd), Operand::Reg(rn), Operand::Reg(rm)) => {
            (*rd, *rn, *rm, 0)
        }
        Operands::Four(
            Operand::Reg(rd),
            Operand::Reg(rn),
            Operand::Reg(rm),
            Operand::Shift(SrType::ROR, k),
        ) => (*rd, *rn, *rm, *k),
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    let value = extended(width, signed, rotated(ctx, rm, rotation)?);
    b.put(ctx.reg(rd)?, Expr::add(ctx.reg(rn)?, value));
    Ok(())
}

fn field_mask(width: u32, lsb: u32) -> u64 {
    (((1u64 << width) - 1) << lsb) & 0xFFFF_FFFF
}

/// BFC: clear a bit field.
pub(crate) fn bfc(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::Three(Operand::Reg(rd), Operand::Imm(lsb), Operand::Imm(width)) => {
            let dst = ctx.reg(*rd)?;
            let keep = Expr::num_u64(!field_mask(*width as u32, *lsb as u32) & 0xFFFF_FFFF, 32);
            b.put(dst.clone(), Expr::and(dst, keep));
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand("bfc")),
    }
}

/// BFI: insert the low bits of rn into a field of rd.
pub(crate) fn bfi(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::Four(
            Operand::Reg(rd),
            Operand::Reg(rn),
            Operand::Imm(lsb),
            Operand::Imm(width),
        ) => {
            let (lsb, width) = (*lsb as u32, *width as u32);
            let dst = ctx.reg(*rd)?;
            let keep = Expr::num_u64(!field_mask(width, lsb) & 0xFFFF_FFFF, 32);
            let low_mask = Expr::num_u64((1u64 << width) - 1, 32);
            let inserted = Expr::shl(
                Expr::and(ctx.reg(*rn)?, low_mask),
                Expr::num_u64(u64::from(lsb), 32),
            );
            b.put(dst.clone(), Expr::or(Expr::and(dst, keep), inserted));
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand("bfi")),
    }
}

/// UBFX/SBFX: extract a bit field and zero/sign extend it.
pub(crate) fn bfx(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    signed: bool,
) -> Result<()> {
    match &ins.operands {
        Operands::Four(
            Operand::Reg(rd),
            Operand::Reg(rn),
            Operand::Imm(lsb),
            Operand::Imm(width),
        ) => {
            let field = Expr::extract(ctx.reg(*rn)?, *width as u32, *lsb as u32);
            let value = if signed {
                Expr::sext(32, field)
            } else {
                Expr::zext(32, field)
            };
            b.put(ctx.reg(*rd)?, value);
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    }
}
