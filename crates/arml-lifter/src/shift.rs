//! Shift and rotate primitives with carry-out.
//!
//! Two families: compile-time amounts (`shift`, `shift_c`) for immediate
//! shifts, and runtime amounts (`shift_for_reg`, `shift_c_for_reg`) for
//! register-specified shifts, where the architectural shift-by-zero and
//! shift-by-large cases are made explicit in the IR with guards.

use arml_ir::Expr;
use arml_isa::SrType;

use crate::error::{LiftError, Result};

fn num(value: u32, width: u32) -> Expr {
    Expr::num_u64(u64::from(value), width)
}

/// Shift by a compile-time amount, returning `(result, carry_out)`.
///
/// A zero amount is only meaningful for LSL (identity, carry preserved) and
/// RRX (which always rotates by one); LSR/ASR/ROR must be given a nonzero
/// amount by the decoder.
pub fn shift_c(
    value: Expr,
    width: u32,
    styp: SrType,
    amount: u32,
    carry_in: Expr,
) -> Result<(Expr, Expr)> {
    match styp {
        SrType::RRX => {
            let carry = Expr::extract_low(1, value.clone());
            let result = Expr::concat(carry_in, Expr::extract(value, width - 1, 1));
            Ok((result, carry))
        }
        SrType::LSL if amount == 0 => Ok((value, carry_in)),
        _ if amount == 0 || amount > width => Err(LiftError::InvalidShiftAmount),
        SrType::LSL => {
            let carry = Expr::extract(value.clone(), 1, width - amount);
            let result = if amount == width {
                Expr::num0(width)
            } else {
                Expr::shl(value, num(amount, width))
            };
            Ok((result, carry))
        }
        SrType::LSR => {
            let carry = Expr::extract(value.clone(), 1, amount - 1);
            let result = if amount == width {
                Expr::num0(width)
            } else {
                Expr::shr(value, num(amount, width))
            };
            Ok((result, carry))
        }
        SrType::ASR => {
            let carry = Expr::extract(value.clone(), 1, amount - 1);
            // ASR by the full width saturates to the sign bit.
            let result = Expr::sar(value, num(amount.min(width - 1), width));
            Ok((result, carry))
        }
        SrType::ROR => {
            if amount == width {
                let carry = Expr::extract_high(1, value.clone());
                return Ok((value, carry));
            }
            let result = Expr::or(
                Expr::shr(value.clone(), num(amount, width)),
                Expr::shl(value, num(width - amount, width)),
            );
            let carry = Expr::extract_high(1, result.clone());
            Ok((result, carry))
        }
    }
}

/// Shift by a compile-time amount, discarding the carry.
pub fn shift(value: Expr, width: u32, styp: SrType, amount: u32, carry_in: Expr) -> Result<Expr> {
    let (result, _) = shift_c(value, width, styp, amount, carry_in)?;
    Ok(result)
}

fn raw_shift_for_reg(value: &Expr, width: u32, styp: SrType, amount: &Expr) -> Result<Expr> {
    match styp {
        SrType::LSL => Ok(Expr::shl(value.clone(), amount.clone())),
        SrType::LSR => Ok(Expr::shr(value.clone(), amount.clone())),
        SrType::ASR => Ok(Expr::sar(value.clone(), amount.clone())),
        SrType::ROR => {
            let masked = Expr::and(amount.clone(), num(width - 1, width));
            Ok(Expr::or(
                Expr::shr(value.clone(), masked.clone()),
                Expr::shl(value.clone(), Expr::sub(num(width, width), masked)),
            ))
        }
        // RRX has no register-specified form.
        SrType::RRX => Err(LiftError::InvalidShiftAmount),
    }
}

/// Shift by a runtime amount, returning `(result, carry_out)`.
///
/// The result is guarded so the architectural edge cases stay visible:
/// a zero amount passes the value (and carry) through unchanged, and a
/// non-positive amount would be undefined.
pub fn shift_c_for_reg(
    value: Expr,
    width: u32,
    styp: SrType,
    amount: Expr,
    carry_in: Expr,
) -> Result<(Expr, Expr)> {
    let raw = raw_shift_for_reg(&value, width, styp, &amount)?;
    let raw_carry = match styp {
        SrType::LSL => Expr::extract_low(
            1,
            Expr::shr(value.clone(), Expr::sub(num(width, width), amount.clone())),
        ),
        // Carry-out is bit (amount - 1) of the input.
        SrType::LSR | SrType::ASR => Expr::extract_low(
            1,
            Expr::shr(value.clone(), Expr::sub(amount.clone(), num(1, width))),
        ),
        SrType::ROR => Expr::extract_high(1, raw.clone()),
        SrType::RRX => return Err(LiftError::InvalidShiftAmount),
    };

    let zero = Expr::num0(width);
    let guarded = Expr::ite(
        Expr::ugt(amount.clone(), zero.clone()),
        raw,
        Expr::undef(width, "shift amount"),
    );
    let result = Expr::ite(
        Expr::eq(amount.clone(), zero.clone()),
        value,
        guarded,
    );
    let carry = Expr::ite(Expr::eq(amount, zero), carry_in, raw_carry);
    Ok((result, carry))
}

/// Shift by a runtime amount, discarding the carry.
pub fn shift_for_reg(
    value: Expr,
    width: u32,
    styp: SrType,
    amount: Expr,
    carry_in: Expr,
) -> Result<Expr> {
    let (result, _) = shift_c_for_reg(value, width, styp, amount, carry_in)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arml_ir::Var;

    fn r0() -> Expr {
        Expr::var(Var::new("R0", 0, 32))
    }

    fn cin() -> Expr {
        Expr::var(Var::new("c", 99, 1))
    }

    #[test]
    fn test_lsl_carry_position() {
        let (result, carry) = shift_c(r0(), 32, SrType::LSL, 4, cin()).unwrap();
        assert_eq!(result, Expr::shl(r0(), Expr::num_u64(4, 32)));
        assert_eq!(carry, Expr::extract(r0(), 1, 28));
    }

    #[test]
    fn test_lsr_carry_is_last_bit_out() {
        let (_, carry) = shift_c(r0(), 32, SrType::LSR, 4, cin()).unwrap();
        assert_eq!(carry, Expr::extract(r0(), 1, 3));
        // LSR #32 drains the value; carry is the top bit.
        let (result, carry) = shift_c(r0(), 32, SrType::LSR, 32, cin()).unwrap();
        assert_eq!(result, Expr::num0(32));
        assert_eq!(carry, Expr::extract(r0(), 1, 31));
    }

    #[test]
    fn test_shift_by_zero_keeps_carry() {
        let (result, carry) = shift_c(r0(), 32, SrType::LSL, 0, cin()).unwrap();
        assert_eq!(result, r0());
        assert_eq!(carry, cin());
    }

    #[test]
    fn test_zero_amount_rejected_for_right_shifts() {
        assert!(matches!(
            shift_c(r0(), 32, SrType::LSR, 0, cin()),
            Err(LiftError::InvalidShiftAmount)
        ));
        assert!(matches!(
            shift_c(r0(), 32, SrType::ROR, 0, cin()),
            Err(LiftError::InvalidShiftAmount)
        ));
    }

    #[test]
    fn test_rrx_shape() {
        let (result, carry) = shift_c(r0(), 32, SrType::RRX, 1, cin()).unwrap();
        assert_eq!(carry, Expr::extract(r0(), 1, 0));
        assert_eq!(result, Expr::concat(cin(), Expr::extract(r0(), 31, 1)));
        assert_eq!(result.width(), 32);
    }

    #[test]
    fn test_ror_carry_is_msb_of_result() {
        let (result, carry) = shift_c(r0(), 32, SrType::ROR, 8, cin()).unwrap();
        assert_eq!(carry, Expr::extract(result.clone(), 1, 31));
    }

    #[test]
    fn test_reg_amount_is_guarded() {
        let amount = Expr::var(Var::new("R1", 1, 32));
        let (result, carry) =
            shift_c_for_reg(r0(), 32, SrType::LSL, amount.clone(), cin()).unwrap();
        // ite(amount == 0, value, ite(amount > 0, shifted, undef))
        match result {
            Expr::Ite { cond, then_expr, else_expr } => {
                assert_eq!(*cond, Expr::eq(amount.clone(), Expr::num0(32)));
                assert_eq!(*then_expr, r0());
                assert!(matches!(*else_expr, Expr::Ite { .. }));
            }
            e => panic!("unexpected shape: {e:?}"),
        }
        match carry {
            Expr::Ite { then_expr, .. } => assert_eq!(*then_expr, cin()),
            e => panic!("unexpected shape: {e:?}"),
        }
    }

    #[test]
    fn test_reg_amount_right_shift_carry_uses_amount_minus_one() {
        let amount = Expr::var(Var::new("R1", 1, 32));
        let (_, carry) = shift_c_for_reg(r0(), 32, SrType::LSR, amount.clone(), cin()).unwrap();
        let expected = Expr::extract_low(
            1,
            Expr::shr(r0(), Expr::sub(amount.clone(), Expr::num_u64(1, 32))),
        );
        match carry {
            Expr::Ite { else_expr, .. } => assert_eq!(*else_expr, expected),
            e => panic!("unexpected shape: {e:?}"),
        }
    }
}
