//! Block load/store (LDM/STM and friends).

use arml_ir::{Expr, StmtBuilder};
use arml_isa::{register_mask, InstructionInfo, Opcode, Operand, Operands, Register};

use crate::context::ArmContext;
use crate::error::{LiftError, Result};
use crate::operand::pc_expr;
use crate::pcwrite;

/// Address progression of a block transfer.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BlockMode {
    /// Increment after.
    IA,
    /// Increment before.
    IB,
    /// Decrement after.
    DA,
    /// Decrement before.
    DB,
}

fn block_mode(opcode: Opcode) -> Result<(bool, BlockMode)> {
    match opcode {
        Opcode::LDM | Opcode::LDMIA => Ok((true, BlockMode::IA)),
        Opcode::LDMIB => Ok((true, BlockMode::IB)),
        Opcode::LDMDA => Ok((true, BlockMode::DA)),
        Opcode::LDMDB => Ok((true, BlockMode::DB)),
        Opcode::STM | Opcode::STMIA => Ok((false, BlockMode::IA)),
        Opcode::STMIB => Ok((false, BlockMode::IB)),
        Opcode::STMDA => Ok((false, BlockMode::DA)),
        Opcode::STMDB => Ok((false, BlockMode::DB)),
        op => Err(LiftError::InvalidOpcode(op.mnemonic())),
    }
}

pub(crate) fn block_transfer(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
) -> Result<()> {
    let (is_load, mode) = block_mode(ins.opcode)?;
    let (rn, regs) = match &ins.operands {
        Operands::Two(Operand::Reg(rn), Operand::RegList(regs)) => (*rn, regs.as_slice()),
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    transfer(ins, ctx, b, is_load, mode, rn, regs, ins.write_back)
}

/// PUSH is STMDB SP!, {...}.
pub(crate) fn push(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::One(Operand::RegList(regs)) => {
            transfer(ins, ctx, b, false, BlockMode::DB, Register::SP, regs, true)
        }
        _ => Err(LiftError::InvalidOperand("push")),
    }
}

/// POP is LDMIA SP!, {...}.
pub(crate) fn pop(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::One(Operand::RegList(regs)) => {
            transfer(ins, ctx, b, true, BlockMode::IA, Register::SP, regs, true)
        }
        _ => Err(LiftError::InvalidOperand("pop")),
    }
}

#[allow(clippy::too_many_arguments)]
fn transfer(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    is_load: bool,
    mode: BlockMode,
    rn: Register,
    regs: &[Register],
    write_back: bool,
) -> Result<()> {
    let mask = register_mask(regs);
    let count = u64::from(mask.count_ones());
    if count == 0 {
        return Err(LiftError::InvalidOperand(ins.opcode.mnemonic()));
    }
    let base = ctx.reg(rn)?;

    let start = match mode {
        BlockMode::IA => base.clone(),
        BlockMode::IB => Expr::add(base.clone(), Expr::num_u64(4, 32)),
        BlockMode::DA => Expr::sub(base.clone(), Expr::num_u64(4 * count - 4, 32)),
        BlockMode::DB => Expr::sub(base.clone(), Expr::num_u64(4 * count, 32)),
    };
    let start_addr = b.tmp_var(32);
    b.put(start_addr.clone(), start);

    // One access per set bit, low register numbers at low addresses.
    let mut slot = 0u64;
    let mut pc_value = None;
    for n in 0..16u32 {
        if mask & (1 << n) == 0 {
            continue;
        }
        let Some(reg) = Register::from_number(n) else {
            continue;
        };
        let addr = Expr::add(start_addr.clone(), Expr::num_u64(4 * slot, 32));
        slot += 1;
        if is_load {
            if reg == Register::PC {
                let t = b.tmp_var(32);
                b.put(t.clone(), Expr::load(32, addr));
                pc_value = Some(t);
            } else {
                b.put(ctx.reg(reg)?, Expr::load(32, addr));
            }
        } else if reg == Register::PC {
            b.store(addr, pc_expr(ins));
        } else {
            b.store(addr, ctx.reg(reg)?);
        }
    }

    if write_back {
        let delta = Expr::num_u64(4 * count, 32);
        let updated = match mode {
            BlockMode::IA | BlockMode::IB => Expr::add(base, delta),
            BlockMode::DA | BlockMode::DB => Expr::sub(base, delta),
        };
        // A base that is also transferred leaves the base unknown.
        if regs.contains(&rn) {
            b.put(ctx.reg(rn)?, Expr::undef(32, "base register in list"));
        } else {
            b.put(ctx.reg(rn)?, updated);
        }
    }

    if let Some(t) = pc_value {
        pcwrite::load_write_pc(ins, ctx, b, t)?;
    }
    Ok(())
}
