//! VFP load/store emitters, plus the opaque floating-point arithmetic.
//!
//! Single-precision registers move as one word; double-precision registers
//! move as two words composed with concat (low word at the low address).

use arml_ir::{Expr, SideEffect, StmtBuilder};
use arml_isa::{InstructionInfo, Operand, Operands, Register};

use crate::context::ArmContext;
use crate::error::{LiftError, Result};
use crate::operand::trans_mem;

fn vfp_reg(ins: &InstructionInfo, reg: Register) -> Result<Register> {
    if reg.is_single_vfp() || reg.is_double_vfp() {
        Ok(reg)
    } else {
        Err(LiftError::InvalidRegister(ins.opcode.mnemonic()))
    }
}

/// VLDR: one word for Sn, two words for Dn.
pub(crate) fn vldr(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (rd, mem) = match &ins.operands {
        Operands::Two(Operand::Reg(rd), Operand::Mem(mem)) => (vfp_reg(ins, *rd)?, mem),
        _ => return Err(LiftError::InvalidOperand("vldr")),
    };
    let access = trans_mem(ins, ctx, mem)?;
    if rd.is_single_vfp() {
        b.put(ctx.reg(rd)?, Expr::load(32, access.addr));
    } else {
        let hi = Expr::load(32, Expr::add(access.addr.clone(), Expr::num_u64(4, 32)));
        let lo = Expr::load(32, access.addr);
        b.put(ctx.reg(rd)?, Expr::concat(hi, lo));
    }
    Ok(())
}

/// VSTR: the reverse of VLDR.
pub(crate) fn vstr(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (rd, mem) = match &ins.operands {
        Operands::Two(Operand::Reg(rd), Operand::Mem(mem)) => (vfp_reg(ins, *rd)?, mem),
        _ => return Err(LiftError::InvalidOperand("vstr")),
    };
    let access = trans_mem(ins, ctx, mem)?;
    let value = ctx.reg(rd)?;
    if rd.is_single_vfp() {
        b.store(access.addr, value);
    } else {
        b.store(access.addr.clone(), Expr::extract_low(32, value.clone()));
        b.store(
            Expr::add(access.addr, Expr::num_u64(4, 32)),
            Expr::extract_high(32, value),
        );
    }
    Ok(())
}

fn vfp_list(ins: &InstructionInfo) -> Result<(&[Register], u64)> {
    match &ins.operands {
        Operands::One(Operand::RegList(regs)) if !regs.is_empty() => {
            let stride = if regs[0].is_single_vfp() { 4 } else { 8 };
            Ok((regs.as_slice(), stride))
        }
        _ => Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    }
}

/// VPUSH: descending stores of the register list, stride 4 or 8.
pub(crate) fn vpush(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (regs, stride) = vfp_list(ins)?;
    let sp = ctx.reg(Register::SP)?;
    let total = stride * regs.len() as u64;
    let start = b.tmp_var(32);
    b.put(start.clone(), Expr::sub(sp.clone(), Expr::num_u64(total, 32)));

    for (i, reg) in regs.iter().enumerate() {
        let reg = vfp_reg(ins, *reg)?;
        let addr = Expr::add(start.clone(), Expr::num_u64(stride * i as u64, 32));
        let value = ctx.reg(reg)?;
        if stride == 4 {
            b.store(addr, value);
        } else {
            b.store(addr.clone(), Expr::extract_low(32, value.clone()));
            b.store(
                Expr::add(addr, Expr::num_u64(4, 32)),
                Expr::extract_high(32, value),
            );
        }
    }
    b.put(sp.clone(), Expr::sub(sp, Expr::num_u64(total, 32)));
    Ok(())
}

/// VPOP: ascending loads of the register list, stride 4 or 8.
pub(crate) fn vpop(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let (regs, stride) = vfp_list(ins)?;
    let sp = ctx.reg(Register::SP)?;
    let total = stride * regs.len() as u64;
    let start = b.tmp_var(32);
    b.put(start.clone(), sp.clone());

    for (i, reg) in regs.iter().enumerate() {
        let reg = vfp_reg(ins, *reg)?;
        let addr = Expr::add(start.clone(), Expr::num_u64(stride * i as u64, 32));
        if stride == 4 {
            b.put(ctx.reg(reg)?, Expr::load(32, addr));
        } else {
            let hi = Expr::load(32, Expr::add(addr.clone(), Expr::num_u64(4, 32)));
            let lo = Expr::load(32, addr);
            b.put(ctx.reg(reg)?, Expr::concat(hi, lo));
        }
    }
    b.put(sp.clone(), Expr::add(sp, Expr::num_u64(total, 32)));
    Ok(())
}

/// Floating-point arithmetic the lifter leaves opaque; downstream sees a
/// single explicit side effect.
pub(crate) fn unsupported(b: &mut StmtBuilder) {
    b.side_effect(SideEffect::UnsupportedFP);
}
