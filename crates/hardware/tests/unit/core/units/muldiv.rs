//! Multiply/Divide Unit Tests.

use pipesim_core::core::units::muldiv::MulDivUnit;
use rstest::rstest;

#[rstest]
#[case::signed(-3_i32 as u32, 7, true, (0xFFFF_FFFF, -21_i32 as u32))]
#[case::unsigned(0xFFFF_FFFF, 2, false, (1, 0xFFFF_FFFE))]
#[case::signed_min(0x8000_0000, 0x8000_0000, true, (0x4000_0000, 0))]
fn multiply(#[case] a: u32, #[case] b: u32, #[case] signed: bool, #[case] expected: (u32, u32)) {
    let mut unit = MulDivUnit::new(4, 32);
    assert_eq!(unit.multiply(a, b, signed), expected);
}

#[rstest]
#[case::signed(7, -3_i32 as u32, true, (1, -2_i32 as u32))]
#[case::unsigned(7, 3, false, (1, 2))]
#[case::by_zero(7, 0, true, (0, 0))]
#[case::overflow(0x8000_0000, -1_i32 as u32, true, (0, 0x8000_0000))]
fn divide(#[case] a: u32, #[case] b: u32, #[case] signed: bool, #[case] expected: (u32, u32)) {
    let mut unit = MulDivUnit::new(4, 32);
    assert_eq!(unit.divide(a, b, signed), expected);
}

#[test]
fn busy_counts_down_and_saturates() {
    let mut unit = MulDivUnit::new(4, 32);
    assert!(!unit.is_busy());
    let _ = unit.multiply(2, 3, false);
    assert_eq!(unit.remaining(), 4);
    for _ in 0..4 {
        assert!(unit.is_busy());
        unit.tick();
    }
    assert!(!unit.is_busy());
    unit.tick();
    assert_eq!(unit.remaining(), 0);
}

#[test]
fn divide_uses_divide_latency() {
    let mut unit = MulDivUnit::new(4, 32);
    let _ = unit.divide(10, 0, false);
    assert_eq!(unit.remaining(), 32);
}
