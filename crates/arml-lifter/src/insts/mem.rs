//! Single load/store emitters.

use arml_ir::{Expr, StmtBuilder};
use arml_isa::{InstructionInfo, Operand, Operands, Register};

use crate::context::ArmContext;
use crate::error::{LiftError, Result};
use crate::operand::{trans_mem, MemAccess};
use crate::pcwrite;

fn apply_write_back(b: &mut StmtBuilder, access: &MemAccess) {
    if let Some((var, value)) = &access.write_back {
        b.put(Expr::var(*var), value.clone());
    }
}

/// LDR family. The loaded value lands in a temporary first, then the base
/// write-back runs, then the destination register is written; a PC
/// destination interworks instead.
pub(crate) fn load(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    width: u32,
    signed: bool,
) -> Result<()> {
    let (rt, mem) = match &ins.operands {
        Operands::Two(Operand::Reg(rt), Operand::Mem(mem)) => (*rt, mem),
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    let access = trans_mem(ins, ctx, mem)?;
    let t = b.tmp_var(width);
    b.put(t.clone(), Expr::load(width, access.addr.clone()));
    apply_write_back(b, &access);

    if rt == Register::PC && width == 32 {
        return pcwrite::load_write_pc(ins, ctx, b, t);
    }
    let value = if width == 32 {
        t
    } else if signed {
        Expr::sext(32, t)
    } else {
        Expr::zext(32, t)
    };
    b.put(ctx.reg(rt)?, value);
    Ok(())
}

/// STR family. The store happens at the resolved address, then write-back.
pub(crate) fn store(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    width: u32,
) -> Result<()> {
    let (rt, mem) = match &ins.operands {
        Operands::Two(Operand::Reg(rt), Operand::Mem(mem)) => (*rt, mem),
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    let access = trans_mem(ins, ctx, mem)?;
    let value = if width == 32 {
        ctx.reg(rt)?
    } else {
        Expr::extract_low(width, ctx.reg(rt)?)
    };
    b.store(access.addr.clone(), value);
    apply_write_back(b, &access);
    Ok(())
}

/// LDRD: two words into an even/odd register pair.
pub(crate) fn load_dual(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
) -> Result<()> {
    let (rt, rt2, mem) = match &ins.operands {
        Operands::Three(Operand::Reg(rt), Operand::Reg(rt2), Operand::Mem(mem)) => {
            (*rt, *rt2, mem)
        }
        _ => return Err(LiftError::InvalidOperand("ldrd")),
    };
    let access = trans_mem(ins, ctx, mem)?;
    let lo = b.tmp_var(32);
    let hi = b.tmp_var(32);
    b.put(lo.clone(), Expr::load(32, access.addr.clone()));
    b.put(
        hi.clone(),
        Expr::load(32, Expr::add(access.addr.clone(), Expr::num_u64(4, 32))),
    );
    apply_write_back(b, &access);
    b.put(ctx.reg(rt)?, lo);
    b.put(ctx.reg(rt2)?, hi);
    Ok(())
}

/// STRD: an even/odd register pair into two words.
pub(crate) fn store_dual(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
) -> Result<()> {
    let (rt, rt2, mem) = match &ins.operands {
        Operands::Three(Operand::Reg(rt), Operand::Reg(rt2), Operand::Mem(mem)) => {
            (*rt, *rt2, mem)
        }
        _ => return Err(LiftError::InvalidOperand("strd")),
    };
    let access = trans_mem(ins, ctx, mem)?;
    b.store(access.addr.clone(), ctx.reg(rt)?);
    b.store(
        Expr::add(access.addr.clone(), Expr::num_u64(4, 32)),
        ctx.reg(rt2)?,
    );
    apply_write_back(b, &access);
    Ok(())
}
