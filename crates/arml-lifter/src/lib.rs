//! ARM32/Thumb instruction-to-IR translation.
//!
//! The entry point is [`translate`]: it takes one decoded instruction and a
//! shared [`ArmContext`] and produces the instruction's statement list,
//! bracketed by start/end markers and gated on the condition code.
//!
//! ```
//! use arml_isa::{Condition, InstructionInfo, Opcode, Operand, Operands, OperatingMode, Register};
//! use arml_lifter::{translate, ArmContext};
//!
//! let ctx = ArmContext::new(OperatingMode::Arm);
//! let ins = InstructionInfo {
//!     address: 0x1_0000,
//!     num_bytes: 4,
//!     condition: Some(Condition::AL),
//!     opcode: Opcode::MOV,
//!     operands: Operands::Two(Operand::Reg(Register::R0), Operand::Imm(5)),
//!     write_back: false,
//!     mode: OperatingMode::Arm,
//! };
//! let stmts = translate(&ins, &ctx).unwrap();
//! assert_eq!(stmts.len(), 3); // ISMark, Put, IEMark
//! ```

mod arith;
mod cond;
mod context;
mod error;
mod insts;
mod operand;
mod pcwrite;
mod psr;
mod shift;

pub use arith::{add_with_carry, AddResult};
pub use cond::cond_expr;
pub use context::ArmContext;
pub use error::{LiftError, Result};
pub use operand::{pc_expr, trans_mem, trans_operand, MemAccess};
pub use pcwrite::{branch_write_pc, bx_write_pc, load_write_pc, write_pc};
pub use psr::{carry_in, disable_psr, enable_psr, get_psr, psr_mask, set_psr};
pub use shift::{shift, shift_c, shift_c_for_reg, shift_for_reg};

use arml_ir::{Stmt, StmtBuilder};
use arml_isa::{InstructionInfo, Opcode, Operand, Operands, SrType};
use tracing::{debug, trace};

use insts::alu::{ArithKind, CmpKind, LogicKind};

/// Builder capacity hint; generous enough for the block transfers.
const STMT_CAPACITY_HINT: usize = 41;

/// Lift one instruction to IR.
///
/// The output always starts with an `ISMark` and ends with an `IEMark`;
/// conditional instructions branch over their body on the failing path.
pub fn translate(ins: &InstructionInfo, ctx: &ArmContext) -> Result<Vec<Stmt>> {
    trace!(address = ins.address, opcode = ?ins.opcode, "lift");
    let mut b = StmtBuilder::with_capacity(STMT_CAPACITY_HINT);
    b.is_mark(ins.address, ins.num_bytes);
    let gate = cond::start(ins, ctx, &mut b)?;
    dispatch(ins, ctx, &mut b)?;
    cond::finish(&mut b, gate);
    b.ie_mark(ins.end_address());
    Ok(b.finish())
}

fn dispatch(ins: &InstructionInfo, ctx: &ArmContext, b: &mut StmtBuilder) -> Result<()> {
    use insts::{alu, branch, extend, mem, misc, mul, multiple, vfp};

    match ins.opcode {
        Opcode::ADD => alu::arith(ins, ctx, b, ArithKind::Add, false),
        Opcode::ADDS => alu::arith(ins, ctx, b, ArithKind::Add, true),
        Opcode::ADC => alu::arith(ins, ctx, b, ArithKind::Adc, false),
        Opcode::ADCS => alu::arith(ins, ctx, b, ArithKind::Adc, true),
        Opcode::SUB => alu::arith(ins, ctx, b, ArithKind::Sub, false),
        Opcode::SUBS => alu::arith(ins, ctx, b, ArithKind::Sub, true),
        Opcode::SBC => alu::arith(ins, ctx, b, ArithKind::Sbc, false),
        Opcode::SBCS => alu::arith(ins, ctx, b, ArithKind::Sbc, true),
        Opcode::RSB => alu::arith(ins, ctx, b, ArithKind::Rsb, false),
        Opcode::RSBS => alu::arith(ins, ctx, b, ArithKind::Rsb, true),
        Opcode::RSC => alu::arith(ins, ctx, b, ArithKind::Rsc, false),
        Opcode::RSCS => alu::arith(ins, ctx, b, ArithKind::Rsc, true),
        Opcode::ADDW => alu::wide_arith(ins, ctx, b, true),
        Opcode::SUBW => alu::wide_arith(ins, ctx, b, false),

        Opcode::AND => alu::logical(ins, ctx, b, LogicKind::And, false),
        Opcode::ANDS => alu::logical(ins, ctx, b, LogicKind::And, true),
        Opcode::ORR => alu::logical(ins, ctx, b, LogicKind::Orr, false),
        Opcode::ORRS => alu::logical(ins, ctx, b, LogicKind::Orr, true),
        Opcode::EOR => alu::logical(ins, ctx, b, LogicKind::Eor, false),
        Opcode::EORS => alu::logical(ins, ctx, b, LogicKind::Eor, true),
        Opcode::BIC => alu::logical(ins, ctx, b, LogicKind::Bic, false),
        Opcode::BICS => alu::logical(ins, ctx, b, LogicKind::Bic, true),
        Opcode::ORN => alu::logical(ins, ctx, b, LogicKind::Orn, false),
        Opcode::ORNS => alu::logical(ins, ctx, b, LogicKind::Orn, true),

        Opcode::MOV => alu::mov(ins, ctx, b, false),
        Opcode::MOVS => alu::mov(ins, ctx, b, true),
        Opcode::MVN => alu::mvn(ins, ctx, b, false),
        Opcode::MVNS => alu::mvn(ins, ctx, b, true),
        Opcode::MOVW => alu::movw(ins, ctx, b),
        Opcode::MOVT => alu::movt(ins, ctx, b),

        Opcode::CMP => alu::compare(ins, ctx, b, CmpKind::Cmp),
        Opcode::CMN => alu::compare(ins, ctx, b, CmpKind::Cmn),
        Opcode::TST => alu::compare(ins, ctx, b, CmpKind::Tst),
        Opcode::TEQ => alu::compare(ins, ctx, b, CmpKind::Teq),

        Opcode::LSL => alu::shift_op(ins, ctx, b, SrType::LSL, false),
        Opcode::LSLS => alu::shift_op(ins, ctx, b, SrType::LSL, true),
        Opcode::LSR => alu::shift_op(ins, ctx, b, SrType::LSR, false),
        Opcode::LSRS => alu::shift_op(ins, ctx, b, SrType::LSR, true),
        Opcode::ASR => alu::shift_op(ins, ctx, b, SrType::ASR, false),
        Opcode::ASRS => alu::shift_op(ins, ctx, b, SrType::ASR, true),
        Opcode::ROR => alu::shift_op(ins, ctx, b, SrType::ROR, false),
        Opcode::RORS => alu::shift_op(ins, ctx, b, SrType::ROR, true),
        Opcode::RRX => alu::shift_op(ins, ctx, b, SrType::RRX, false),
        Opcode::RRXS => alu::shift_op(ins, ctx, b, SrType::RRX, true),

        Opcode::MUL => mul::mul(ins, ctx, b, false),
        Opcode::MULS => mul::mul(ins, ctx, b, true),
        Opcode::MLA => mul::mla(ins, ctx, b, false, false),
        Opcode::MLAS => mul::mla(ins, ctx, b, false, true),
        Opcode::MLS => mul::mla(ins, ctx, b, true, false),
        Opcode::UMULL => mul::mul_long(ins, ctx, b, false, false),
        Opcode::UMULLS => mul::mul_long(ins, ctx, b, false, true),
        Opcode::SMULL => mul::mul_long(ins, ctx, b, true, false),
        Opcode::SMULLS => mul::mul_long(ins, ctx, b, true, true),
        Opcode::UMLAL => mul::mul_acc_long(ins, ctx, b, false, false),
        Opcode::UMLALS => mul::mul_acc_long(ins, ctx, b, false, true),
        Opcode::SMLAL => mul::mul_acc_long(ins, ctx, b, true, false),
        Opcode::SMLALS => mul::mul_acc_long(ins, ctx, b, true, true),

        Opcode::LDR => mem::load(ins, ctx, b, 32, false),
        Opcode::LDRB => mem::load(ins, ctx, b, 8, false),
        Opcode::LDRH => mem::load(ins, ctx, b, 16, false),
        Opcode::LDRSB => mem::load(ins, ctx, b, 8, true),
        Opcode::LDRSH => mem::load(ins, ctx, b, 16, true),
        Opcode::LDRD => mem::load_dual(ins, ctx, b),
        Opcode::STR => mem::store(ins, ctx, b, 32),
        Opcode::STRB => mem::store(ins, ctx, b, 8),
        Opcode::STRH => mem::store(ins, ctx, b, 16),
        Opcode::STRD => mem::store_dual(ins, ctx, b),

        Opcode::LDM
        | Opcode::LDMIA
        | Opcode::LDMIB
        | Opcode::LDMDA
        | Opcode::LDMDB
        | Opcode::STM
        | Opcode::STMIA
        | Opcode::STMIB
        | Opcode::STMDA
        | Opcode::STMDB => multiple::block_transfer(ins, ctx, b),
        Opcode::PUSH => multiple::push(ins, ctx, b),
        Opcode::POP => multiple::pop(ins, ctx, b),

        Opcode::B => branch::b_uncond(ins, ctx, b),
        Opcode::BL => branch::bl(ins, ctx, b),
        Opcode::BLX => match &ins.operands {
            Operands::One(Operand::Reg(_)) => branch::blx_reg(ins, ctx, b),
            _ => branch::bl(ins, ctx, b),
        },
        Opcode::BX => branch::bx(ins, ctx, b),
        Opcode::CBZ => branch::cbz(ins, ctx, b, false),
        Opcode::CBNZ => branch::cbz(ins, ctx, b, true),
        Opcode::TBB => branch::table_branch(ins, ctx, b, false),
        Opcode::TBH => branch::table_branch(ins, ctx, b, true),

        Opcode::SXTB => extend::extend(ins, ctx, b, 8, true),
        Opcode::SXTH => extend::extend(ins, ctx, b, 16, true),
        Opcode::UXTB => extend::extend(ins, ctx, b, 8, false),
        Opcode::UXTH => extend::extend(ins, ctx, b, 16, false),
        Opcode::SXTAB => extend::extend_add(ins, ctx, b, 8, true),
        Opcode::SXTAH => extend::extend_add(ins, ctx, b, 16, true),
        Opcode::UXTAB => extend::extend_add(ins, ctx, b, 8, false),
        Opcode::UXTAH => extend::extend_add(ins, ctx, b, 16, false),
        Opcode::BFC => extend::bfc(ins, ctx, b),
        Opcode::BFI => extend::bfi(ins, ctx, b),
        Opcode::SBFX => extend::bfx(ins, ctx, b, true),
        Opcode::UBFX => extend::bfx(ins, ctx, b, false),

        Opcode::CLZ => misc::clz(ins, ctx, b),
        Opcode::REV => misc::rev(ins, ctx, b),
        Opcode::REV16 => misc::rev16(ins, ctx, b),
        Opcode::REVSH => misc::revsh(ins, ctx, b),
        Opcode::RBIT => misc::rbit(ins, ctx, b),
        Opcode::MRS => misc::mrs(ins, ctx, b),
        Opcode::MSR => misc::msr(ins, ctx, b),
        Opcode::NOP => Ok(()),
        Opcode::SVC => {
            misc::svc(b);
            Ok(())
        }
        Opcode::BKPT => {
            misc::bkpt(b);
            Ok(())
        }
        Opcode::DMB | Opcode::DSB | Opcode::ISB => {
            misc::barrier(b);
            Ok(())
        }

        Opcode::VLDR => vfp::vldr(ins, ctx, b),
        Opcode::VSTR => vfp::vstr(ins, ctx, b),
        Opcode::VPUSH => vfp::vpush(ins, ctx, b),
        Opcode::VPOP => vfp::vpop(ins, ctx, b),
        Opcode::VADD
        | Opcode::VSUB
        | Opcode::VMUL
        | Opcode::VDIV
        | Opcode::VMOV
        | Opcode::VCMP
        | Opcode::VCVT
        | Opcode::VMLS => {
            vfp::unsupported(b);
            Ok(())
        }

        op => {
            debug!(address = ins.address, opcode = ?op, "no semantics for opcode");
            Err(LiftError::NotImplemented(op.mnemonic()))
        }
    }
}
