//! Data-processing emitters.

use arml_ir::{Expr, SideEffect, StmtBuilder};
use arml_isa::{InstructionInfo, Operand, Operands, PsrField, Register, SrType};

use super::{set_nzc, set_nzcv};
use crate::arith::add_with_carry;
use crate::context::ArmContext;
use crate::error::{LiftError, Result};
use crate::operand::{op2, shifted_op2};
use crate::pcwrite;
use crate::psr;
use crate::shift;

/// Add/subtract family selector.
#[derive(Clone, Copy)]
pub(crate) enum ArithKind {
    Add,
    Adc,
    Sub,
    Sbc,
    Rsb,
    Rsc,
}

/// Bitwise family selector.
#[derive(Clone, Copy)]
pub(crate) enum LogicKind {
    And,
    Orr,
    Eor,
    Bic,
    Orn,
}

/// Compare/test family selector.
#[derive(Clone, Copy)]
pub(crate) enum CmpKind {
    Cmp,
    Cmn,
    Tst,
    Teq,
}

/// Destructure a data-processing operand tuple into
/// (rd, rn-value, shifter-value, shifter-carry).
///
/// The two-operand Thumb form reuses the destination as the first source.
fn parse_data_proc(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    name: &'static str,
) -> Result<(Register, Expr, Expr, Expr)> {
    match &ins.operands {
        Operands::Two(Operand::Reg(rd), snd) => {
            let (m, c) = op2(ctx, snd)?;
            Ok((*rd, ctx.reg(*rd)?, m, c))
        }
        Operands::Three(Operand::Reg(rd), Operand::Reg(rn), third) => {
            let (m, c) = op2(ctx, third)?;
            Ok((*rd, ctx.reg(*rn)?, m, c))
        }
        Operands::Four(Operand::Reg(rd), Operand::Reg(rn), Operand::Reg(rm), sh) => {
            let (m, c) = shifted_op2(ctx, *rm, sh)?;
            Ok((*rd, ctx.reg(*rn)?, m, c))
        }
        _ => Err(LiftError::InvalidOperand(name)),
    }
}

pub(crate) fn arith(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    kind: ArithKind,
    set_flags: bool,
) -> Result<()> {
    let (rd, rn, m, _) = parse_data_proc(ins, ctx, ins.opcode.mnemonic())?;
    let c = psr::carry_in(ctx)?;
    let r = match kind {
        ArithKind::Add => add_with_carry(b, rn, m, Expr::b0()),
        ArithKind::Adc => add_with_carry(b, rn, m, c),
        ArithKind::Sub => add_with_carry(b, rn, Expr::not(m), Expr::b1()),
        ArithKind::Sbc => add_with_carry(b, rn, Expr::not(m), c),
        ArithKind::Rsb => add_with_carry(b, Expr::not(rn), m, Expr::b1()),
        ArithKind::Rsc => add_with_carry(b, Expr::not(rn), m, c),
    };
    if rd == Register::PC {
        if set_flags {
            return exception_return(ins, ctx, b, r.result);
        }
        return pcwrite::write_pc(ins, ctx, b, r.result);
    }
    b.put(ctx.reg(rd)?, r.result.clone());
    if set_flags {
        set_nzcv(ctx, b, &r)?;
    }
    Ok(())
}

pub(crate) fn logical(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    kind: LogicKind,
    set_flags: bool,
) -> Result<()> {
    let (rd, rn, m, carry) = parse_data_proc(ins, ctx, ins.opcode.mnemonic())?;
    let value = match kind {
        LogicKind::And => Expr::and(rn, m),
        LogicKind::Orr => Expr::or(rn, m),
        LogicKind::Eor => Expr::xor(rn, m),
        LogicKind::Bic => Expr::and(rn, Expr::not(m)),
        LogicKind::Orn => Expr::or(rn, Expr::not(m)),
    };
    if rd == Register::PC {
        if set_flags {
            return exception_return(ins, ctx, b, value);
        }
        return pcwrite::write_pc(ins, ctx, b, value);
    }
    let dst = ctx.reg(rd)?;
    b.put(dst.clone(), value);
    if set_flags {
        set_nzc(ctx, b, &dst, carry)?;
    }
    Ok(())
}

pub(crate) fn compare(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    kind: CmpKind,
) -> Result<()> {
    let (rn, m, carry) = match &ins.operands {
        Operands::Two(Operand::Reg(rn), snd) => {
            let (m, c) = op2(ctx, snd)?;
            (ctx.reg(*rn)?, m, c)
        }
        Operands::Three(Operand::Reg(rn), Operand::Reg(rm), sh) => {
            let (m, c) = shifted_op2(ctx, *rm, sh)?;
            (ctx.reg(*rn)?, m, c)
        }
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    match kind {
        CmpKind::Cmp => {
            let r = add_with_carry(b, rn, Expr::not(m), Expr::b1());
            set_nzcv(ctx, b, &r)
        }
        CmpKind::Cmn => {
            let r = add_with_carry(b, rn, m, Expr::b0());
            set_nzcv(ctx, b, &r)
        }
        CmpKind::Tst => {
            let t = b.tmp_var(32);
            b.put(t.clone(), Expr::and(rn, m));
            set_nzc(ctx, b, &t, carry)
        }
        CmpKind::Teq => {
            let t = b.tmp_var(32);
            b.put(t.clone(), Expr::xor(rn, m));
            set_nzc(ctx, b, &t, carry)
        }
    }
}

pub(crate) fn mov(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    set_flags: bool,
) -> Result<()> {
    let (rd, m, carry) = match &ins.operands {
        Operands::Two(Operand::Reg(rd), snd) => {
            let (m, c) = op2(ctx, snd)?;
            (*rd, m, c)
        }
        _ => return Err(LiftError::InvalidOperand("mov")),
    };
    if rd == Register::PC {
        if set_flags {
            return exception_return(ins, ctx, b, m);
        }
        return pcwrite::write_pc(ins, ctx, b, m);
    }
    let dst = ctx.reg(rd)?;
    b.put(dst.clone(), m);
    if set_flags {
        set_nzc(ctx, b, &dst, carry)?;
    }
    Ok(())
}

pub(crate) fn mvn(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    set_flags: bool,
) -> Result<()> {
    let (rd, m, carry) = match &ins.operands {
        Operands::Two(Operand::Reg(rd), snd) => {
            let (m, c) = op2(ctx, snd)?;
            (*rd, m, c)
        }
        Operands::Three(Operand::Reg(rd), Operand::Reg(rm), sh) => {
            let (m, c) = shifted_op2(ctx, *rm, sh)?;
            (*rd, m, c)
        }
        _ => return Err(LiftError::InvalidOperand("mvn")),
    };
    let value = Expr::not(m);
    if rd == Register::PC {
        if set_flags {
            return exception_return(ins, ctx, b, value);
        }
        return pcwrite::write_pc(ins, ctx, b, value);
    }
    let dst = ctx.reg(rd)?;
    b.put(dst.clone(), value);
    if set_flags {
        set_nzc(ctx, b, &dst, carry)?;
    }
    Ok(())
}

/// LSL/LSR/ASR/ROR/RRX as opcodes in their own right.
pub(crate) fn shift_op(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    styp: SrType,
    set_flags: bool,
) -> Result<()> {
    let cin = psr::carry_in(ctx)?;
    let (rd, result, carry) = match &ins.operands {
        // RRX only has the two-operand form; it always rotates by one.
        Operands::Two(Operand::Reg(rd), Operand::Reg(rm)) => {
            let (r, c) = shift::shift_c(ctx.reg(*rm)?, 32, styp, 1, cin)?;
            (*rd, r, c)
        }
        Operands::Three(Operand::Reg(rd), Operand::Reg(rm), Operand::Imm(k)) => {
            let (r, c) = shift::shift_c(ctx.reg(*rm)?, 32, styp, *k as u32, cin)?;
            (*rd, r, c)
        }
        Operands::Three(Operand::Reg(rd), Operand::Reg(rn), Operand::Reg(rm)) => {
            let amount = Expr::zext(32, Expr::extract_low(8, ctx.reg(*rm)?));
            let (r, c) = shift::shift_c_for_reg(ctx.reg(*rn)?, 32, styp, amount, cin)?;
            (*rd, r, c)
        }
        _ => return Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    };
    if rd == Register::PC {
        return pcwrite::write_pc(ins, ctx, b, result);
    }
    let dst = ctx.reg(rd)?;
    b.put(dst.clone(), result);
    if set_flags {
        set_nzc(ctx, b, &dst, carry)?;
    }
    Ok(())
}

/// MOVW: a plain 16-bit immediate into the low half, upper half cleared.
pub(crate) fn movw(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::Two(Operand::Reg(rd), Operand::Imm(k)) => {
            b.put(ctx.reg(*rd)?, Expr::num_u64(*k as u64 & 0xFFFF, 32));
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand("movw")),
    }
}

/// MOVT: a 16-bit immediate into the top half, low half preserved.
pub(crate) fn movt(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    match &ins.operands {
        Operands::Two(Operand::Reg(rd), Operand::Imm(k)) => {
            let dst = ctx.reg(*rd)?;
            let value = Expr::concat(
                Expr::num_u64(*k as u64 & 0xFFFF, 16),
                Expr::extract_low(16, dst.clone()),
            );
            b.put(dst, value);
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand("movt")),
    }
}

/// ADDW/SUBW: Thumb wide 12-bit immediates, never set flags.
pub(crate) fn wide_arith(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    add: bool,
) -> Result<()> {
    match &ins.operands {
        Operands::Three(Operand::Reg(rd), Operand::Reg(rn), Operand::Imm(k)) => {
            let rn = ctx.reg(*rn)?;
            let imm = Expr::num_i64(*k, 32);
            let value = if add {
                Expr::add(rn, imm)
            } else {
                Expr::sub(rn, imm)
            };
            if *rd == Register::PC {
                return pcwrite::write_pc(ins, ctx, b, value);
            }
            b.put(ctx.reg(*rd)?, value);
            Ok(())
        }
        _ => Err(LiftError::InvalidOperand(ins.opcode.mnemonic())),
    }
}

/// The SUBS PC, LR family: restore CPSR from SPSR and branch, with the
/// mode checks the manual requires. User and System mode have no SPSR,
/// Hyp mode must use ERET, and a return into Hyp state is equally
/// malformed; each of those takes the undefined path.
pub(crate) fn exception_return(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    result: Expr,
) -> Result<()> {
    const MODE_USR: u64 = 0b10000;
    const MODE_MON: u64 = 0b10110;
    const MODE_HYP: u64 = 0b11010;
    const MODE_SYS: u64 = 0b11111;

    let cpsr = ctx.reg(Register::CPSR)?;
    let spsr = ctx.reg(Register::SPSR)?;
    let cur_mode = psr::get_psr(ctx, Register::CPSR, PsrField::M)?;
    let spsr_mode = psr::get_psr(ctx, Register::SPSR, PsrField::M)?;
    let mode_num = |m: u64| Expr::num_u64(m, 32);

    let check_hyp = b.label("eretCheckHyp");
    let check_target = b.label("eretCheckTarget");
    let ret = b.label("eretReturn");
    let undef = b.label("eretUndef");

    let usr_or_sys = Expr::or(
        Expr::eq(cur_mode.clone(), mode_num(MODE_USR)),
        Expr::eq(cur_mode.clone(), mode_num(MODE_SYS)),
    );
    b.cjmp(usr_or_sys, undef, check_hyp);

    b.lmark(check_hyp);
    b.cjmp(Expr::eq(cur_mode, mode_num(MODE_HYP)), undef, check_target);

    b.lmark(check_target);
    let bad_target = Expr::or(
        Expr::eq(spsr_mode.clone(), mode_num(MODE_HYP)),
        Expr::eq(spsr_mode, mode_num(MODE_MON)),
    );
    b.cjmp(bad_target, undef, ret);

    b.lmark(ret);
    b.put(cpsr, spsr);
    pcwrite::branch_write_pc(ins, ctx, b, result)?;

    b.lmark(undef);
    b.side_effect(SideEffect::UndefinedInstr);
    Ok(())
}
