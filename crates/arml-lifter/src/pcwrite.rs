//! PC-writing helpers.
//!
//! ARM distinguishes three ways of writing the program counter: plain
//! branches that align the target to the current instruction set, BX-style
//! interworking branches that inspect the target's low bits to switch
//! between ARM and Thumb, and ALU writes that behave like BX in ARM state
//! (ARMv7 semantics).

use arml_ir::{Expr, SideEffect, StmtBuilder};
use arml_isa::{InstructionInfo, OperatingMode, PsrField, Register};

use crate::context::ArmContext;
use crate::error::Result;
use crate::psr;

/// Branch to `target`, aligned for the current instruction set: the low bit
/// is cleared in Thumb state, the low two bits in ARM state.
pub fn branch_write_pc(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    target: Expr,
) -> Result<()> {
    let mask = match ins.mode {
        OperatingMode::Arm => !0b11u64 & 0xFFFF_FFFF,
        OperatingMode::Thumb => !0b1u64 & 0xFFFF_FFFF,
    };
    let pc = ctx.reg(Register::PC)?;
    b.inter_jmp(pc, Expr::and(target, Expr::num_u64(mask, 32)));
    Ok(())
}

/// Interworking branch: bit 0 of the target selects Thumb, an even target
/// with bit 1 clear selects ARM, and anything else is architecturally
/// undefined.
pub fn bx_write_pc(
    _ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    target: Expr,
) -> Result<()> {
    let pc = ctx.reg(Register::PC)?;
    let addr = b.tmp_var(32);
    b.put(addr.clone(), target);

    let to_thumb = b.label("bxToThumb");
    let check_arm = b.label("bxCheckArm");
    let to_arm = b.label("bxToArm");
    let undef = b.label("bxUndef");

    b.cjmp(
        Expr::eq(Expr::extract_low(1, addr.clone()), Expr::b1()),
        to_thumb,
        check_arm,
    );

    b.lmark(to_thumb);
    psr::disable_psr(ctx, b, Register::CPSR, PsrField::J)?;
    psr::enable_psr(ctx, b, Register::CPSR, PsrField::T)?;
    b.inter_jmp(
        pc.clone(),
        Expr::and(addr.clone(), Expr::num_u64(!1u64 & 0xFFFF_FFFF, 32)),
    );

    b.lmark(check_arm);
    b.cjmp(
        Expr::eq(Expr::extract(addr.clone(), 1, 1), Expr::b0()),
        to_arm,
        undef,
    );

    b.lmark(to_arm);
    psr::disable_psr(ctx, b, Register::CPSR, PsrField::J)?;
    psr::disable_psr(ctx, b, Register::CPSR, PsrField::T)?;
    b.inter_jmp(pc, addr);

    b.lmark(undef);
    b.side_effect(SideEffect::UndefinedInstr);
    Ok(())
}

/// ARMv7 ALU write to the PC: interworking in ARM state, a plain branch in
/// Thumb state.
pub fn write_pc(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    target: Expr,
) -> Result<()> {
    match ins.mode {
        OperatingMode::Arm => bx_write_pc(ins, ctx, b, target),
        OperatingMode::Thumb => branch_write_pc(ins, ctx, b, target),
    }
}

/// Loads into the PC interwork (ARMv5T and later).
pub fn load_write_pc(
    ins: &InstructionInfo,
    ctx: &ArmContext,
    b: &mut StmtBuilder,
    target: Expr,
) -> Result<()> {
    bx_write_pc(ins, ctx, b, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arml_ir::Stmt;
    use arml_isa::{Opcode, Operands};

    fn ins(mode: OperatingMode) -> InstructionInfo {
        InstructionInfo {
            address: 0x1000,
            num_bytes: 4,
            condition: Some(arml_isa::Condition::AL),
            opcode: Opcode::BX,
            operands: Operands::None,
            write_back: false,
            mode,
        }
    }

    #[test]
    fn test_branch_write_pc_alignment() {
        let ctx = ArmContext::default();
        let mut b = StmtBuilder::with_capacity(1);
        branch_write_pc(&ins(OperatingMode::Arm), &ctx, &mut b, Expr::num_u64(0x2003, 32))
            .unwrap();
        match &b.finish()[0] {
            Stmt::InterJmp { target, .. } => {
                assert_eq!(*target, Expr::num_u64(0x2000, 32));
            }
            s => panic!("unexpected statement: {s:?}"),
        }

        let mut b = StmtBuilder::with_capacity(1);
        branch_write_pc(
            &ins(OperatingMode::Thumb),
            &ctx,
            &mut b,
            Expr::num_u64(0x2003, 32),
        )
        .unwrap();
        match &b.finish()[0] {
            Stmt::InterJmp { target, .. } => {
                assert_eq!(*target, Expr::num_u64(0x2002, 32));
            }
            s => panic!("unexpected statement: {s:?}"),
        }
    }

    #[test]
    fn test_bx_write_pc_layout() {
        let ctx = ArmContext::default();
        let mut b = StmtBuilder::with_capacity(16);
        bx_write_pc(&ins(OperatingMode::Arm), &ctx, &mut b, Expr::num_u64(0, 32)).unwrap();
        let stmts = b.finish();

        // One dispatch CJmp plus the ARM-vs-undefined CJmp.
        let cjmps = stmts
            .iter()
            .filter(|s| matches!(s, Stmt::CJmp { .. }))
            .count();
        assert_eq!(cjmps, 2);
        // Two InterJmps (Thumb path, ARM path).
        let jumps = stmts
            .iter()
            .filter(|s| matches!(s, Stmt::InterJmp { .. }))
            .count();
        assert_eq!(jumps, 2);
        // The undefined path is a side effect.
        assert!(stmts
            .iter()
            .any(|s| matches!(s, Stmt::SideEffect(SideEffect::UndefinedInstr))));
    }
}
