//! Expression IR.

use arml_bitvec::BitVec;

/// Unary operations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnOp {
    Not,
    Neg,
}

/// Binary operations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Sar,
    UDiv,
    SDiv,
    URem,
    SRem,
}

/// Relational operations; results are 1-bit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RelOp {
    Eq,
    Ne,
    Ult,
    Ule,
    Ugt,
    Uge,
    Slt,
    Sle,
    Sgt,
    Sge,
}

/// Width-changing cast kinds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastKind {
    ZExt,
    SExt,
}

/// Why an expression is undefined.
///
/// `Unpredictable` marks inputs the architecture leaves unspecified;
/// `Unimplemented` marks semantics this lifter does not model. Downstream
/// consumers treat the two differently, so they are distinct tags.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UndefKind {
    Unpredictable,
    Unimplemented,
}

/// A named register variable handle.
///
/// Handles are long-lived and owned by the translation context; the lifter
/// only copies them into expressions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Var {
    pub name: &'static str,
    pub index: u32,
    pub width: u32,
}

impl Var {
    pub const fn new(name: &'static str, index: u32, width: u32) -> Self {
        Self { name, index, width }
    }
}

/// Expression tree node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expr {
    Num(BitVec),
    Var(Var),
    /// Translation-local temporary, unique within one instruction's output.
    Temp {
        width: u32,
        idx: u32,
    },
    Unary {
        op: UnOp,
        expr: Box<Self>,
    },
    Binary {
        op: BinOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    Rel {
        op: RelOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    Cast {
        kind: CastKind,
        width: u32,
        expr: Box<Self>,
    },
    Extract {
        width: u32,
        pos: u32,
        expr: Box<Self>,
    },
    Concat {
        high: Box<Self>,
        low: Box<Self>,
    },
    Ite {
        cond: Box<Self>,
        then_expr: Box<Self>,
        else_expr: Box<Self>,
    },
    /// Little-endian memory load.
    Load {
        width: u32,
        addr: Box<Self>,
    },
    Undef {
        width: u32,
        kind: UndefKind,
        reason: &'static str,
    },
}

// These are factory methods, not trait implementations
#[allow(clippy::should_implement_trait)]
impl Expr {
    /// Create a constant expression.
    pub const fn num(value: BitVec) -> Self {
        Self::Num(value)
    }

    /// Create a register variable reference.
    pub const fn var(var: Var) -> Self {
        Self::Var(var)
    }

    /// Zero constant of the given width.
    pub fn num0(width: u32) -> Self {
        Self::Num(BitVec::zero(width).expect("valid width"))
    }

    /// One constant of the given width.
    pub fn num1(width: u32) -> Self {
        Self::Num(BitVec::one(width).expect("valid width"))
    }

    /// A `u64` constant truncated to the given width.
    pub fn num_u64(value: u64, width: u32) -> Self {
        Self::Num(BitVec::of_u64(value, width).expect("valid width"))
    }

    /// An `i64` constant sign-extended into the given width.
    pub fn num_i64(value: i64, width: u32) -> Self {
        Self::Num(BitVec::of_i64(value, width).expect("valid width"))
    }

    /// 1-bit false.
    pub fn b0() -> Self {
        Self::Num(BitVec::f())
    }

    /// 1-bit true.
    pub fn b1() -> Self {
        Self::Num(BitVec::t())
    }

    fn unary(op: UnOp, expr: Self) -> Self {
        Self::Unary {
            op,
            expr: Box::new(expr),
        }
    }

    fn binary(op: BinOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn rel(op: RelOp, left: Self, right: Self) -> Self {
        Self::Rel {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn is_zero(&self) -> bool {
        matches!(self, Self::Num(v) if v.is_zero())
    }

    /// Fold two constants, falling back to an expression node when the
    /// operands are not both constants of matching width.
    fn fold2<F>(op: BinOp, left: Self, right: Self, f: F) -> Self
    where
        F: FnOnce(&BitVec, &BitVec) -> arml_bitvec::Result<BitVec>,
    {
        if let (Self::Num(l), Self::Num(r)) = (&left, &right) {
            if let Ok(v) = f(l, r) {
                return Self::Num(v);
            }
        }
        Self::binary(op, left, right)
    }

    pub fn add(left: Self, right: Self) -> Self {
        if right.is_zero() {
            return left;
        }
        if left.is_zero() {
            return right;
        }
        Self::fold2(BinOp::Add, left, right, BitVec::add)
    }

    pub fn sub(left: Self, right: Self) -> Self {
        if right.is_zero() {
            return left;
        }
        Self::fold2(BinOp::Sub, left, right, BitVec::sub)
    }

    pub fn mul(left: Self, right: Self) -> Self {
        Self::binary(BinOp::Mul, left, right)
    }

    pub fn and(left: Self, right: Self) -> Self {
        Self::fold2(BinOp::And, left, right, BitVec::band)
    }

    pub fn or(left: Self, right: Self) -> Self {
        if right.is_zero() {
            return left;
        }
        if left.is_zero() {
            return right;
        }
        Self::fold2(BinOp::Or, left, right, BitVec::bor)
    }

    pub fn xor(left: Self, right: Self) -> Self {
        if right.is_zero() {
            return left;
        }
        if left.is_zero() {
            return right;
        }
        Self::fold2(BinOp::Xor, left, right, BitVec::bxor)
    }

    pub fn shl(left: Self, right: Self) -> Self {
        if right.is_zero() {
            return left;
        }
        Self::binary(BinOp::Shl, left, right)
    }

    pub fn shr(left: Self, right: Self) -> Self {
        if right.is_zero() {
            return left;
        }
        Self::binary(BinOp::Shr, left, right)
    }

    pub fn sar(left: Self, right: Self) -> Self {
        if right.is_zero() {
            return left;
        }
        Self::binary(BinOp::Sar, left, right)
    }

    pub fn udiv(left: Self, right: Self) -> Self {
        Self::binary(BinOp::UDiv, left, right)
    }

    pub fn sdiv(left: Self, right: Self) -> Self {
        Self::binary(BinOp::SDiv, left, right)
    }

    pub fn urem(left: Self, right: Self) -> Self {
        Self::binary(BinOp::URem, left, right)
    }

    pub fn srem(left: Self, right: Self) -> Self {
        Self::binary(BinOp::SRem, left, right)
    }

    pub fn not(expr: Self) -> Self {
        Self::unary(UnOp::Not, expr)
    }

    pub fn neg(expr: Self) -> Self {
        Self::unary(UnOp::Neg, expr)
    }

    // ===== Relational =====

    pub fn eq(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Eq, left, right)
    }

    pub fn ne(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Ne, left, right)
    }

    pub fn ult(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Ult, left, right)
    }

    pub fn ule(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Ule, left, right)
    }

    pub fn ugt(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Ugt, left, right)
    }

    pub fn uge(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Uge, left, right)
    }

    pub fn slt(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Slt, left, right)
    }

    pub fn sle(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Sle, left, right)
    }

    pub fn sgt(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Sgt, left, right)
    }

    pub fn sge(left: Self, right: Self) -> Self {
        Self::rel(RelOp::Sge, left, right)
    }

    // ===== Structural =====

    pub fn zext(width: u32, expr: Self) -> Self {
        if let Self::Num(v) = &expr {
            if let Ok(v) = v.zext(width) {
                return Self::Num(v);
            }
        }
        Self::Cast {
            kind: CastKind::ZExt,
            width,
            expr: Box::new(expr),
        }
    }

    pub fn sext(width: u32, expr: Self) -> Self {
        if let Self::Num(v) = &expr {
            if let Ok(v) = v.sext(width) {
                return Self::Num(v);
            }
        }
        Self::Cast {
            kind: CastKind::SExt,
            width,
            expr: Box::new(expr),
        }
    }

    /// `width` bits of `expr` starting at bit `pos`.
    pub fn extract(expr: Self, width: u32, pos: u32) -> Self {
        if let Self::Num(v) = &expr {
            if let Ok(v) = v.extract(width, pos) {
                return Self::Num(v);
            }
        }
        Self::Extract {
            width,
            pos,
            expr: Box::new(expr),
        }
    }

    /// The low `width` bits.
    pub fn extract_low(width: u32, expr: Self) -> Self {
        Self::extract(expr, width, 0)
    }

    /// The high `width` bits.
    pub fn extract_high(width: u32, expr: Self) -> Self {
        let pos = expr.width() - width;
        Self::extract(expr, width, pos)
    }

    pub fn concat(high: Self, low: Self) -> Self {
        Self::Concat {
            high: Box::new(high),
            low: Box::new(low),
        }
    }

    /// Ternary select on a 1-bit condition.
    pub fn ite(cond: Self, then_expr: Self, else_expr: Self) -> Self {
        Self::Ite {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    /// Little-endian load of `width` bits at `addr`.
    pub fn load(width: u32, addr: Self) -> Self {
        Self::Load {
            width,
            addr: Box::new(addr),
        }
    }

    /// Architecturally-unpredictable value.
    pub fn undef(width: u32, reason: &'static str) -> Self {
        Self::Undef {
            width,
            kind: UndefKind::Unpredictable,
            reason,
        }
    }

    /// Placeholder for semantics the lifter does not model.
    pub fn unimplemented(width: u32, reason: &'static str) -> Self {
        Self::Undef {
            width,
            kind: UndefKind::Unimplemented,
            reason,
        }
    }

    /// Result width of this expression.
    pub fn width(&self) -> u32 {
        match self {
            Self::Num(v) => v.width(),
            Self::Var(v) => v.width,
            Self::Temp { width, .. } => *width,
            Self::Unary { expr, .. } => expr.width(),
            Self::Binary { left, .. } => left.width(),
            Self::Rel { .. } => 1,
            Self::Cast { width, .. } => *width,
            Self::Extract { width, .. } => *width,
            Self::Concat { high, low } => high.width() + low.width(),
            Self::Ite { then_expr, .. } => then_expr.width(),
            Self::Load { width, .. } => *width,
            Self::Undef { width, .. } => *width,
        }
    }
}

#[cfg(test)]
mod tests;
