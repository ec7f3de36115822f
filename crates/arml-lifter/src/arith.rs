//! Addition with carry, the shared core of the add/subtract family.

use arml_ir::{Expr, StmtBuilder};

/// Result triple of [`add_with_carry`].
pub struct AddResult {
    /// Temporary holding `(a + b + cin) mod 2^32`.
    pub result: Expr,
    /// 1-bit carry out.
    pub carry_out: Expr,
    /// 1-bit signed overflow.
    pub overflow: Expr,
}

/// Compute `a + b + cin` into a fresh temporary and derive the carry and
/// overflow bits from it.
///
/// Subtraction runs through here with `b` complemented and `cin = 1`;
/// ADC/SBC pass the current carry flag as `cin`.
pub fn add_with_carry(b: &mut StmtBuilder, a: Expr, x: Expr, cin: Expr) -> AddResult {
    let result = b.tmp_var(32);
    let sum = Expr::add(Expr::add(a.clone(), x.clone()), Expr::zext(32, cin));
    b.put(result.clone(), sum);

    let carry_out = Expr::ult(result.clone(), a.clone());
    let overflow = Expr::and(
        Expr::eq(Expr::extract_high(1, a.clone()), Expr::extract_high(1, x)),
        Expr::ne(Expr::extract_high(1, a), Expr::extract_high(1, result.clone())),
    );
    AddResult {
        result,
        carry_out,
        overflow,
    }
}
