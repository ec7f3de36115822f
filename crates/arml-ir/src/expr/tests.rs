use super::*;
use arml_bitvec::BitVec;

#[test]
fn test_num_constructors() {
    assert!(matches!(Expr::num_u64(42, 32), Expr::Num(v) if v.to_u64() == 42));
    assert_eq!(Expr::b1(), Expr::Num(BitVec::t()));
    assert_eq!(Expr::b0(), Expr::Num(BitVec::f()));
    assert!(matches!(Expr::num_i64(-1, 32), Expr::Num(v) if v.to_u64() == 0xFFFF_FFFF));
}

#[test]
fn test_add_folds_constants() {
    let e = Expr::add(Expr::num_u64(40, 32), Expr::num_u64(2, 32));
    assert_eq!(e, Expr::num_u64(42, 32));
}

#[test]
fn test_add_zero_identity() {
    let v = Expr::var(Var::new("R0", 0, 32));
    assert_eq!(Expr::add(v.clone(), Expr::num0(32)), v);
    assert_eq!(Expr::add(Expr::num0(32), v.clone()), v);
}

#[test]
fn test_mismatched_fold_keeps_node() {
    // Width mismatch is left to the consumer rather than folded away.
    let e = Expr::add(Expr::num_u64(1, 32), Expr::num_u64(1, 16));
    assert!(matches!(e, Expr::Binary { op: BinOp::Add, .. }));
}

#[test]
fn test_sub_and_shift_identities() {
    let v = Expr::var(Var::new("R1", 1, 32));
    assert_eq!(Expr::sub(v.clone(), Expr::num0(32)), v);
    assert_eq!(Expr::shl(v.clone(), Expr::num0(32)), v);
    assert_eq!(Expr::shr(v.clone(), Expr::num0(32)), v);
    assert!(matches!(
        Expr::sub(Expr::num0(32), v.clone()),
        Expr::Binary { op: BinOp::Sub, .. }
    ));
}

#[test]
fn test_rel_width_is_one() {
    let a = Expr::var(Var::new("R0", 0, 32));
    let b = Expr::var(Var::new("R1", 1, 32));
    assert_eq!(Expr::eq(a.clone(), b.clone()).width(), 1);
    assert_eq!(Expr::slt(a, b).width(), 1);
}

#[test]
fn test_widths() {
    let r0 = Expr::var(Var::new("R0", 0, 32));
    assert_eq!(r0.width(), 32);
    assert_eq!(Expr::zext(64, r0.clone()).width(), 64);
    assert_eq!(Expr::extract_low(8, r0.clone()).width(), 8);
    assert_eq!(Expr::extract_high(1, r0.clone()).width(), 1);
    assert_eq!(
        Expr::concat(r0.clone(), Expr::num_u64(0, 32)).width(),
        64
    );
    assert_eq!(Expr::load(16, r0.clone()).width(), 16);
    assert_eq!(Expr::undef(32, "flag").width(), 32);
    assert_eq!(
        Expr::ite(Expr::b1(), r0.clone(), Expr::num0(32)).width(),
        32
    );
}

#[test]
fn test_extract_high_position() {
    let r0 = Expr::var(Var::new("R0", 0, 32));
    match Expr::extract_high(1, r0) {
        Expr::Extract { width: 1, pos: 31, .. } => {}
        e => panic!("unexpected shape: {e:?}"),
    }
}

#[test]
fn test_undef_kinds_are_distinct() {
    let a = Expr::undef(32, "x");
    let b = Expr::unimplemented(32, "x");
    assert_ne!(a, b);
}
