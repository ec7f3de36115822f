//! Operand lowering.

use arml_ir::{Expr, Var};
use arml_isa::{
    AddrMode, InstructionInfo, OffsetKind, Operand, Register, Sign, SrType, register_mask,
};

use crate::context::ArmContext;
use crate::error::{LiftError, Result};
use crate::psr;
use crate::shift;

/// The PC read value of this instruction as a 32-bit constant (two
/// instructions ahead of the current address).
pub fn pc_expr(ins: &InstructionInfo) -> Expr {
    Expr::num_u64(ins.pc_read_value() & 0xFFFF_FFFF, 32)
}

/// Lower a simple operand (register, special register, immediate, or
/// register list) to an expression.
pub fn trans_operand(ctx: &ArmContext, operand: &Operand) -> Result<Expr> {
    match operand {
        Operand::Reg(r) => ctx.reg(*r),
        Operand::SpecReg(r, _) => ctx.reg(*r),
        Operand::Imm(k) => Ok(Expr::num_i64(*k, 32)),
        Operand::RegList(regs) => Ok(Expr::num_u64(u64::from(register_mask(regs)), 16)),
        _ => Err(LiftError::InvalidOperand("operand")),
    }
}

/// The value-and-carry of a shifter operand: an immediate or a plain
/// register, both of which preserve the incoming carry.
pub fn op2(ctx: &ArmContext, operand: &Operand) -> Result<(Expr, Expr)> {
    match operand {
        Operand::Imm(k) => Ok((Expr::num_i64(*k, 32), psr::carry_in(ctx)?)),
        Operand::Reg(r) => {
            shift::shift_c(ctx.reg(*r)?, 32, SrType::LSL, 0, psr::carry_in(ctx)?)
        }
        _ => Err(LiftError::InvalidOperand("shifter operand")),
    }
}

/// The value-and-carry of a shifted-register operand pair.
pub fn shifted_op2(ctx: &ArmContext, rm: Register, sh: &Operand) -> Result<(Expr, Expr)> {
    let value = ctx.reg(rm)?;
    let cin = psr::carry_in(ctx)?;
    match sh {
        Operand::Shift(styp, amount) => shift::shift_c(value, 32, *styp, *amount, cin),
        Operand::RegShift(styp, rs) => {
            let amount = Expr::zext(32, Expr::extract_low(8, ctx.reg(*rs)?));
            shift::shift_c_for_reg(value, 32, *styp, amount, cin)
        }
        _ => Err(LiftError::InvalidOperand("shift operand")),
    }
}

/// A resolved memory operand: the address to access, and the deferred base
/// register update for pre/post-indexed modes.
pub struct MemAccess {
    pub addr: Expr,
    pub write_back: Option<(Var, Expr)>,
}

fn offset_addr(ctx: &ArmContext, offset: &OffsetKind) -> Result<Expr> {
    match offset {
        OffsetKind::Imm(rn, sign, imm) => {
            let base = ctx.reg(*rn)?;
            match imm {
                None => Ok(base),
                Some(k) => {
                    let k = Expr::num_i64(*k, 32);
                    match sign {
                        Some(Sign::Minus) => Ok(Expr::sub(base, k)),
                        _ => Ok(Expr::add(base, k)),
                    }
                }
            }
        }
        OffsetKind::Reg(rn, sign, rm, sh) => {
            let base = ctx.reg(*rn)?;
            // An absent shift is LSL #0; it still routes through the shift
            // helper, which threads the current carry.
            let (styp, amount) = sh.unwrap_or((SrType::LSL, 0));
            let idx = shift::shift(ctx.reg(*rm)?, 32, styp, amount, psr::carry_in(ctx)?)?;
            match sign {
                Some(Sign::Minus) => Ok(Expr::sub(base, idx)),
                _ => Ok(Expr::add(base, idx)),
            }
        }
    }
}

/// Lower a memory operand to its access address and write-back plan.
pub fn trans_mem(ins: &InstructionInfo, ctx: &ArmContext, mode: &AddrMode) -> Result<MemAccess> {
    match mode {
        AddrMode::Offset(offset) => Ok(MemAccess {
            addr: offset_addr(ctx, offset)?,
            write_back: None,
        }),
        AddrMode::PreIdx(offset) => {
            let addr = offset_addr(ctx, offset)?;
            Ok(MemAccess {
                addr: addr.clone(),
                write_back: Some((ctx.reg_var(offset.base())?, addr)),
            })
        }
        AddrMode::PostIdx(offset) => Ok(MemAccess {
            addr: ctx.reg(offset.base())?,
            write_back: Some((ctx.reg_var(offset.base())?, offset_addr(ctx, offset)?)),
        }),
        AddrMode::Literal(imm) => {
            let aligned = Expr::and(pc_expr(ins), Expr::num_u64(!0b11u64 & 0xFFFF_FFFF, 32));
            Ok(MemAccess {
                addr: Expr::add(aligned, Expr::num_i64(*imm, 32)),
                write_back: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arml_isa::{Condition, Opcode, OperatingMode, Operands};

    fn ins() -> InstructionInfo {
        InstructionInfo {
            address: 0x1000,
            num_bytes: 4,
            condition: Some(Condition::AL),
            opcode: Opcode::LDR,
            operands: Operands::None,
            write_back: false,
            mode: OperatingMode::Arm,
        }
    }

    #[test]
    fn test_reg_list_mask() {
        let ctx = ArmContext::default();
        let e = trans_operand(
            &ctx,
            &Operand::RegList(vec![Register::R0, Register::R7, Register::PC]),
        )
        .unwrap();
        assert_eq!(e, Expr::num_u64(0x8081, 16));
    }

    #[test]
    fn test_imm_offset() {
        let ctx = ArmContext::default();
        let acc = trans_mem(
            &ins(),
            &ctx,
            &AddrMode::Offset(OffsetKind::Imm(Register::R1, Some(Sign::Plus), Some(4))),
        )
        .unwrap();
        assert_eq!(
            acc.addr,
            Expr::add(ctx.reg(Register::R1).unwrap(), Expr::num_u64(4, 32))
        );
        assert!(acc.write_back.is_none());
    }

    #[test]
    fn test_pre_index_writes_offset_address_back() {
        let ctx = ArmContext::default();
        let acc = trans_mem(
            &ins(),
            &ctx,
            &AddrMode::PreIdx(OffsetKind::Imm(Register::R1, Some(Sign::Minus), Some(8))),
        )
        .unwrap();
        let expected = Expr::sub(ctx.reg(Register::R1).unwrap(), Expr::num_u64(8, 32));
        assert_eq!(acc.addr, expected);
        let (var, value) = acc.write_back.unwrap();
        assert_eq!(var, ctx.reg_var(Register::R1).unwrap());
        assert_eq!(value, expected);
    }

    #[test]
    fn test_post_index_accesses_base() {
        let ctx = ArmContext::default();
        let acc = trans_mem(
            &ins(),
            &ctx,
            &AddrMode::PostIdx(OffsetKind::Imm(Register::R2, Some(Sign::Plus), Some(4))),
        )
        .unwrap();
        assert_eq!(acc.addr, ctx.reg(Register::R2).unwrap());
        let (_, value) = acc.write_back.unwrap();
        assert_eq!(
            value,
            Expr::add(ctx.reg(Register::R2).unwrap(), Expr::num_u64(4, 32))
        );
    }

    #[test]
    fn test_literal_aligns_pc() {
        let ctx = ArmContext::default();
        // PC reads as 0x1008 in ARM state; align(·, 4) keeps it, then + 16.
        let acc = trans_mem(&ins(), &ctx, &AddrMode::Literal(16)).unwrap();
        assert_eq!(acc.addr, Expr::num_u64(0x1018, 32));
    }

    #[test]
    fn test_reg_offset_without_shift_uses_lsl_zero() {
        let ctx = ArmContext::default();
        let acc = trans_mem(
            &ins(),
            &ctx,
            &AddrMode::Offset(OffsetKind::Reg(Register::R1, None, Register::R2, None)),
        )
        .unwrap();
        // LSL #0 is the identity, so the index is the bare register.
        assert_eq!(
            acc.addr,
            Expr::add(ctx.reg(Register::R1).unwrap(), ctx.reg(Register::R2).unwrap())
        );
    }
}
