use super::*;

fn bv(v: u64, w: u32) -> BitVec {
    BitVec::of_u64(v, w).unwrap()
}

#[test]
fn test_round_trip_masks_to_width() {
    for &w in &[1u32, 2, 4, 8, 16, 32, 64] {
        let x = 0xDEAD_BEEF_CAFE_F00Du64;
        let v = BitVec::of_u64(x, w).unwrap();
        let mask = if w == 64 { u64::MAX } else { (1u64 << w) - 1 };
        assert_eq!(v.to_u64(), x & mask, "width {w}");
    }
}

#[test]
fn test_wide_round_trip() {
    let v = BitVec::of_u64(u64::MAX, 128).unwrap();
    assert_eq!(v.to_u64(), u64::MAX);
    assert_eq!(v.width(), 128);
    assert!(!v.msb());
}

#[test]
fn test_invalid_width() {
    assert_eq!(
        BitVec::of_u64(0, 3).unwrap_err(),
        BitVecError::InvalidBitWidth(3)
    );
    assert_eq!(
        BitVec::of_u64(0, 0).unwrap_err(),
        BitVecError::InvalidBitWidth(0)
    );
    // Byte-array widths are fine even outside the enumerated set.
    assert!(BitVec::of_u64(0, 24).is_ok());
}

#[test]
fn test_width_mismatch() {
    let a = bv(1, 32);
    let b = bv(1, 16);
    assert_eq!(
        a.add(&b).unwrap_err(),
        BitVecError::ArithTypeMismatch(32, 16)
    );
}

#[test]
fn test_add_wraps() {
    let a = bv(0xFFFF_FFFF, 32);
    assert_eq!(a.add(&bv(1, 32)).unwrap(), bv(0, 32));
    let a = BitVec::max_num(128).unwrap();
    assert!(a.add(&BitVec::one(128).unwrap()).unwrap().is_zero());
}

#[test]
fn test_sub_is_add_neg() {
    let a = bv(17, 32);
    let b = bv(42, 32);
    assert_eq!(a.sub(&b).unwrap(), a.add(&b.neg()).unwrap());
    let a = BitVec::of_u64(3, 128).unwrap();
    let b = BitVec::of_u64(9, 128).unwrap();
    assert_eq!(a.sub(&b).unwrap(), a.add(&b.neg()).unwrap());
}

#[test]
fn test_neg() {
    assert_eq!(bv(1, 32).neg(), bv(0xFFFF_FFFF, 32));
    assert_eq!(bv(0, 32).neg(), bv(0, 32));
    assert_eq!(bv(0x80, 8).neg(), bv(0x80, 8));
}

#[test]
fn test_de_morgan() {
    let a = bv(0b1100, 8);
    let b = bv(0b1010, 8);
    let or = a.bor(&b).unwrap();
    let other = a.bnot().band(&b.bnot()).unwrap().bnot();
    assert_eq!(or, other);
}

#[test]
fn test_xor_is_not_or() {
    // The source implementation wired XOR to OR on wide values; make sure
    // that never comes back.
    let a = BitVec::of_u64(0b1100, 128).unwrap();
    let b = BitVec::of_u64(0b1010, 128).unwrap();
    assert_eq!(a.bxor(&b).unwrap(), BitVec::of_u64(0b0110, 128).unwrap());
}

#[test]
fn test_sdiv_sign_rules() {
    let minus6 = BitVec::of_i64(-6, 32).unwrap();
    let two = bv(2, 32);
    let minus2 = BitVec::of_i64(-2, 32).unwrap();
    assert_eq!(minus6.sdiv(&two).unwrap(), BitVec::of_i64(-3, 32).unwrap());
    assert_eq!(minus6.sdiv(&minus2).unwrap(), bv(3, 32));
    assert_eq!(bv(7, 32).sdiv(&two).unwrap(), bv(3, 32));
    // Remainder sign follows the dividend.
    let minus7 = BitVec::of_i64(-7, 32).unwrap();
    assert_eq!(minus7.srem(&two).unwrap(), BitVec::of_i64(-1, 32).unwrap());
    assert_eq!(bv(7, 32).srem(&minus2).unwrap(), bv(1, 32));
}

#[test]
fn test_div_by_zero() {
    assert_eq!(bv(1, 32).udiv(&bv(0, 32)).unwrap_err(), BitVecError::DivByZero);
    assert_eq!(bv(1, 32).urem(&bv(0, 32)).unwrap_err(), BitVecError::DivByZero);
    assert_eq!(bv(1, 32).sdiv(&bv(0, 32)).unwrap_err(), BitVecError::DivByZero);
}

#[test]
fn test_shifts() {
    let x = bv(0x8000_0001, 32);
    assert_eq!(x.shl(&bv(1, 32)).unwrap(), bv(2, 32));
    assert_eq!(x.shr(&bv(1, 32)).unwrap(), bv(0x4000_0000, 32));
    assert_eq!(x.sar(&bv(1, 32)).unwrap(), bv(0xC000_0000, 32));
    // Shift amounts at or past the width drain the value.
    assert_eq!(x.shl(&bv(32, 32)).unwrap(), bv(0, 32));
    assert_eq!(x.shr(&bv(55, 32)).unwrap(), bv(0, 32));
    assert_eq!(x.sar(&bv(55, 32)).unwrap(), bv(0xFFFF_FFFF, 32));
}

#[test]
fn test_sar_wide_negative() {
    let top = BitVec::one(128).unwrap().shl(&bv(127, 128)).unwrap();
    let shifted = top.sar(&BitVec::of_u64(64, 128).unwrap()).unwrap();
    // The high 65 bits are ones.
    assert!(shifted.msb());
    assert_eq!(shifted.extract(64, 63).unwrap(), BitVec::max_num(64).unwrap());
    assert!(shifted.extract(32, 0).unwrap().is_zero());
}

#[test]
fn test_concat_extract_inverse() {
    for &w in &[8u32, 16, 32, 64] {
        let x = BitVec::of_u64(0x1234_5678_9ABC_DEF0, w).unwrap();
        let hi = x.extract(w / 2, w / 2).unwrap();
        let lo = x.extract(w / 2, 0).unwrap();
        assert_eq!(hi.concat(&lo).unwrap(), x, "width {w}");
    }
}

#[test]
fn test_concat_widths() {
    let hi = bv(0xAB, 8);
    let lo = bv(0xCD, 8);
    let v = hi.concat(&lo).unwrap();
    assert_eq!(v.width(), 16);
    assert_eq!(v.to_u64(), 0xABCD);
}

#[test]
fn test_sext_zext() {
    let minus1 = BitVec::of_i64(-1, 8).unwrap();
    assert_eq!(minus1.sext(32).unwrap(), BitVec::of_i64(-1, 32).unwrap());
    assert_eq!(minus1.zext(32).unwrap(), bv(0xFF, 32));
    let pos = bv(0x7F, 8);
    assert_eq!(pos.sext(32).unwrap(), bv(0x7F, 32));
    // Sign extension into a wide value.
    let wide = minus1.sext(128).unwrap();
    assert_eq!(wide, BitVec::max_num(128).unwrap());
}

#[test]
fn test_of_i64_sign_extends() {
    assert_eq!(BitVec::of_i64(-1, 16).unwrap(), bv(0xFFFF, 16));
    assert_eq!(BitVec::of_i64(-2, 128).unwrap().to_u64(), u64::MAX - 1);
    assert!(BitVec::of_i64(-2, 128).unwrap().msb());
}

#[test]
fn test_of_bytes() {
    let v = BitVec::of_bytes(&[0x78, 0x56, 0x34, 0x12]).unwrap();
    assert_eq!(v, bv(0x1234_5678, 32));
    let wide = BitVec::of_bytes(&[0xFF; 16]).unwrap();
    assert_eq!(wide.width(), 128);
    assert_eq!(wide, BitVec::max_num(128).unwrap());
}

#[test]
fn test_comparisons() {
    let a = bv(1, 32);
    let b = bv(0xFFFF_FFFF, 32);
    assert_eq!(a.ult(&b).unwrap(), BitVec::t());
    assert_eq!(a.slt(&b).unwrap(), BitVec::f()); // b is -1 signed
    assert_eq!(b.slt(&a).unwrap(), BitVec::t());
    assert_eq!(a.eq_bv(&a).unwrap(), BitVec::t());
    assert_eq!(a.ne_bv(&b).unwrap(), BitVec::t());
    assert_eq!(a.sge(&b).unwrap(), BitVec::t());
}

#[test]
fn test_sign_predicates() {
    assert!(bv(0x7FFF_FFFF, 32).is_positive());
    assert!(bv(0x8000_0000, 32).is_negative());
    assert!(BitVec::mid_num(32).unwrap().is_negative());
}

#[test]
fn test_mid_and_max() {
    assert_eq!(BitVec::mid_num(8).unwrap(), bv(0x80, 8));
    assert_eq!(BitVec::max_num(8).unwrap(), bv(0xFF, 8));
    assert_eq!(
        BitVec::mid_num(48).unwrap_err(),
        BitVecError::InvalidBitWidth(48)
    );
}

#[test]
fn test_display() {
    assert_eq!(bv(0x2A, 32).to_string(), "0x2a:32");
    assert_eq!(BitVec::t().to_string(), "0x1:1");
}

#[test]
fn test_equality_requires_width() {
    assert_ne!(bv(1, 32), bv(1, 16));
    assert_eq!(bv(0x1_0000_0001 & 0xFFFF_FFFF, 32), bv(1, 32));
}
