//! Miscellaneous emitters: bit counting, byte reversal, status-register
//! moves, and opaque system instructions.

use arml_ir::{Expr, SideEffect, StmtBuilder};
use arml_isa::{InstructionInfo, Operand, Operands, PsrFlag, PsrField, Register};

use crate::context::ArmContext;
use crate::error::{LiftError, Result};
use crate::psr;

fn parse_rd_rm(ins: &InstructionInfo) -> Result<(Register, Register)> {
    match &ins.operands {
        Operands::Two(Operand::Reg(rd), Operand::Reg(rm)) => Ok((*rd, *rm)),
        _ => Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    }
}

/// CLZ via a shift-out loop: count how many doublings it takes to drain the
/// value, starting from 32.
pub(crate) fn clz(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (rd, rm) = parse_rd_rm(ins)?;
    let value = b.tmp_var(32);
    let count = b.tmp_var(32);
    b.put(value.clone(), ctx.reg(rm)?);
    b.put(count.clone(), Expr::num_u64(32, 32));

    let head = b.label("clzLoop");
    let body = b.label("clzShift");
    let done = b.label("clzDone");

    b.lmark(head);
    b.cjmp(Expr::eq(value.clone(), Expr::num0(32)), done, body);
    b.lmark(body);
    b.put(value.clone(), Expr::shr(value.clone(), Expr::num_u64(1, 32)));
    b.put(count.clone(), Expr::sub(count.clone(), Expr::num_u64(1, 32)));
    b.jmp(head);
    b.lmark(done);
    b.put(ctx.reg(rd)?, count);
    Ok(())
}

fn byte(e: &Expr, n: u32) -> Expr {
    Expr::extract(e.clone(), 8, n * 8)
}

/// REV: full byte reversal.
pub(crate) fn rev(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (rd, rm) = parse_rd_rm(ins)?;
    let v = ctx.reg(rm)?;
    let value = Expr::concat(
        Expr::concat(byte(&v, 0), byte(&v, 1)),
        Expr::concat(byte(&v, 2), byte(&v, 3)),
    );
    b.put(ctx.reg(rd)?, value);
    Ok(())
}

/// REV16: byte reversal within each halfword.
pub(crate) fn rev16(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (rd, rm) = parse_rd_rm(ins)?;
    let v = ctx.reg(rm)?;
    let value = Expr::concat(
        Expr::concat(byte(&v, 2), byte(&v, 3)),
        Expr::concat(byte(&v, 0), byte(&v, 1)),
    );
    b.put(ctx.reg(rd)?, value);
    Ok(())
}

/// REVSH: byte-reverse the low halfword and sign-extend.
pub(crate) fn revsh(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (rd, rm) = parse_rd_rm(ins)?;
    let v = ctx.reg(rm)?;
    let swapped = Expr::concat(byte(&v, 0), byte(&v, 1));
    b.put(ctx.reg(rd)?, Expr::sext(32, swapped));
    Ok(())
}

/// RBIT via a shift-in/shift-out loop.
pub(crate) fn rbit(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (rd, rm) = parse_rd_rm(ins)?;
    let value = b.tmp_var(32);
    let result = b.tmp_var(32);
    let remaining = b.tmp_var(32);
    b.put(value.clone(), ctx.reg(rm)?);
    b.put(result.clone(), Expr::num0(32));
    b.put(remaining.clone(), Expr::num_u64(32, 32));

    let head = b.label("rbitLoop");
    let body = b.label("rbitStep");
    let done = b.label("rbitDone");

    b.lmark(head);
    b.cjmp(Expr::eq(remaining.clone(), Expr::num0(32)), done, body);
    b.lmark(body);
    b.put(
        result.clone(),
        Expr::or(
            Expr::shl(result.clone(), Expr::num_u64(1, 32)),
            Expr::and(value.clone(), Expr::num_u64(1, 32)),
        ),
    );
    b.put(value.clone(), Expr::shr(value.clone(), Expr::num_u64(1, 32)));
    b.put(
        remaining.clone(),
        Expr::sub(remaining.clone(), Expr::num_u64(1, 32)),
    );
    b.jmp(head);
    b.lmark(done);
    b.put(ctx.reg(rd)?, result);
    Ok(())
}

/// MRS: read a status register.
pub(crate) fn mrs(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::Two(Operand::Reg(rd), Operand::SpecReg(psr, _)) => {
            b.put(ctx.reg(*rd)?, ctx.reg(*psr)?);
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand("mrs")),
    }
}

/// MSR: write the selected fields of a status register.
pub(crate) fn msr(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (target, flag, src) = match &ins.operands {
        Operands::Two(Operand::SpecReg(psr, flag), src) => (*psr, *flag, src),
        _ => return Err(LiftError::InvalidOperand("msr")),
    };
    let value = match src {
        Operand::Reg(rm) => ctx.reg(*rm)?,
        Operand::Imm(k) => Expr::num_i64(*k, 32),
        _ => return Err(LiftError::InvalidOperand("msr")),
    };
    let flag = flag.unwrap_or(PsrFlag::Cond);

    let cond = Expr::extract(value.clone(), 4, PsrField::Cond.shift());
    psr::set_psr(ctx, b, target, PsrField::Cond, cond)?;
    if matches!(flag, PsrFlag::CondSat | PsrFlag::CondSatGe) {
        let q = Expr::extract(value.clone(), 1, PsrField::Q.shift());
        psr::set_psr(ctx, b, target, PsrField::Q, q)?;
    }
    if matches!(flag, PsrFlag::Ge | PsrFlag::CondSatGe) {
        let ge = Expr::extract(value, 4, PsrField::Ge.shift());
        psr::set_psr(ctx, b, target, PsrField::Ge, ge)?;
    }
    Ok(())
}

/// SVC: supervisor call, left as a side effect.
pub(crate) fn svc(b: &mut StmtBuilder) {
    b.side_effect(SideEffect::SysCall);
}

/// BKPT: software breakpoint.
pub(crate) fn bkpt(b: &mut StmtBuilder) {
    b.side_effect(SideEffect::Breakpoint);
}

/// DMB/DSB/ISB: barriers are opaque to the IR.
pub(crate) fn barrier(b: &mut StmtBuilder) {
    b.side_effect(SideEffect::Fence);
}
