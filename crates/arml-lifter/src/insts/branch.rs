//! Branch emitters.

use arml_ir::{Expr, StmtBuilder};
use arml_isa::{
    AddrMode, InstructionInfo, OffsetKind, Opcode, Operand, Operands, OperatingMode, PsrField,
    Register,
};

use crate::context::ArmContext;
use crate::error::{LiftError, Result};
use crate::operand::pc_expr;
use crate::pcwrite;
use crate::psr;

fn relative_target(ins: &InstructionInfo, offset: i64) -> Expr {
    let target = (ins.pc_read_value() as i64).wrapping_add(offset) as u64 & 0xFFFF_FFFF;
    Expr::num_u64(target, 32)
}

/// B: a plain relative branch within the current instruction set.
pub(crate) fn b_uncond(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
) -> Result<()> {
    match &ins.operands {
        Operands::One(Operand::Imm(offset)) => {
            pcwrite::branch_write_pc(ins, ctx, b, relative_target(ins, *offset))
        }
        _ => Err(LiftError::InvalidOperand("b")),
    }
}

/// The instruction set a BL/BLX immediate lands in.
fn link_target_mode(ins: &InstructionInfo) -> Result<OperatingMode> {
    match (ins.opcode, ins.mode) {
        (Opcode::BL, mode) => Ok(mode),
        (Opcode::BLX, OperatingMode::Arm) => Ok(OperatingMode::Thumb),
        (Opcode::BLX, OperatingMode::Thumb) => Ok(OperatingMode::Arm),
        _ => Err(LiftError::InvalidTargetArchMode),
    }
}

/// BL and immediate BLX: set the return address, switch instruction set for
/// BLX, and branch.
pub(crate) fn bl(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    let offset = match &ins.operands {
        Operands::One(Operand::Imm(offset)) => *offset,
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    let target_mode = link_target_mode(ins)?;

    // The return address keeps the current set's low-bit convention.
    let lr = match ins.mode {
        OperatingMode::Arm => ins.end_address(),
        OperatingMode::Thumb => ins.end_address() | 1,
    } & 0xFFFF_FFFF;
    b.put(ctx.reg(Register::LR)?, Expr::num_u64(lr, 32));

    // An ARM-state target is word-aligned relative to Align(PC, 4).
    let base = match target_mode {
        OperatingMode::Arm => ins.pc_read_value() & !0b11,
        OperatingMode::Thumb => ins.pc_read_value(),
    };
    let target = (base as i64).wrapping_add(offset) as u64 & 0xFFFF_FFFF;

    if target_mode != ins.mode {
        match target_mode {
            OperatingMode::Thumb => psr::enable_psr(ctx, b, Register::CPSR, PsrField::T)?,
            OperatingMode::Arm => psr::disable_psr(ctx, b, Register::CPSR, PsrField::T)?,
        }
    }
    b.inter_jmp(ctx.reg(Register::PC)?, Expr::num_u64(target, 32));
    Ok(())
}

/// Register BLX: link, then interwork on the register value.
pub(crate) fn blx_reg(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::One(Operand::Reg(rm)) => {
            let lr = match ins.mode {
                OperatingMode::Arm => ins.end_address(),
                OperatingMode::Thumb => ins.end_address() | 1,
            } & 0xFFFF_FFFF;
            let target = ctx.reg(*rm)?;
            b.put(ctx.reg(Register::LR)?, Expr::num_u64(lr, 32));
            pcwrite::bx_write_pc(ins, ctx, b, target)
        }
        _ => Err(LiftError::InvalidOperand("blx")),
    }
}

/// BX: interworking branch to a register.
pub(crate) fn bx(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::One(Operand::Reg(rm)) => {
            let target = ctx.reg(*rm)?;
            pcwrite::bx_write_pc(ins, ctx, b, target)
        }
        _ => Err(LiftError::InvalidOperand("bx")),
    }
}

/// CBZ/CBNZ: compare a register against zero and branch (Thumb only,
/// never conditional).
pub(crate) fn cbz(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    nonzero: bool,
) -> Result<()> {
    let (rn, offset) = match &ins.operands {
        Operands::Two(Operand::Reg(rn), Operand::Imm(offset)) => (*rn, *offset),
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    let zero_test = Expr::eq(ctx.reg(rn)?, Expr::num0(32));
    let cond = if nonzero {
        Expr::not(zero_test)
    } else {
        zero_test
    };
    let taken = b.label("cbTaken");
    let skip = b.label("cbSkip");
    b.cjmp(cond, taken, skip);
    b.lmark(taken);
    pcwrite::branch_write_pc(ins, ctx, b, relative_target(ins, offset))?;
    b.lmark(skip);
    Ok(())
}

/// TBB/TBH: a table of byte/halfword branch offsets, doubled and added to
/// the PC.
pub(crate) fn table_branch(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    halfwords: bool,
) -> Result<()> {
    let (rn, rm) = match &ins.operands {
        Operands::One(Operand::Mem(AddrMode::Offset(OffsetKind::Reg(rn, _, rm, _)))) => {
            (*rn, *rm)
        }
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    let index = if halfwords {
        Expr::shl(ctx.reg(rm)?, Expr::num_u64(1, 32))
    } else {
        ctx.reg(rm)?
    };
    let entry_width = if halfwords { 16 } else { 8 };
    let entry = Expr::load(entry_width, Expr::add(ctx.reg(rn)?, index));
    let target = Expr::add(
        pc_expr(ins),
        Expr::mul(Expr::zext(32, entry), Expr::num_u64(2, 32)),
    );
    pcwrite::branch_write_pc(ins, ctx, b, target)
}
