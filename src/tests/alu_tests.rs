//   Copyright 2026 Martin Åkesson
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.

//! Unit tests for ALU operations.

use crate::alu;
use crate::registers::Flags;

#[test]
fn add_basic() {
    let mut f = Flags::new();
    let r = alu::add(0x10, 0x20, false, &mut f);
    assert_eq!(r, 0x30);
    assert!(!f.cf);
    assert!(!f.zf);
    assert!(!f.sf);
    assert!(!f.acf);
}

#[test]
fn add_carry_out() {
    let mut f = Flags::new();
    let r = alu::add(0xFF, 0x01, false, &mut f);
    assert_eq!(r, 0x00);
    assert!(f.cf);
    assert!(f.zf);
    assert!(!f.sf);
}

#[test]
fn add_half_carry() {
    let mut f = Flags::new();
    alu::add(0x0F, 0x01, false, &mut f);
    assert!(f.acf);
}

#[test]
fn adc_with_carry_in() {
    let mut f = Flags::new();
    let r = alu::add(0x10, 0x20, true, &mut f);
    assert_eq!(r, 0x31);
    assert!(!f.cf);
}

#[test]
fn sub_basic() {
    let mut f = Flags::new();
    let r = alu::sub(0x30, 0x10, false, &mut f);
    assert_eq!(r, 0x20);
    assert!(!f.cf);
    assert!(!f.zf);
}

#[test]
fn sub_borrow() {
    let mut f = Flags::new();
    let r = alu::sub(0x00, 0x01, false, &mut f);
    assert_eq!(r, 0xFF);
    assert!(f.cf); // borrow out
    assert!(f.sf);
}

#[test]
fn sub_equal_sets_zero() {
    let mut f = Flags::new();
    let r = alu::sub(0x42, 0x42, false, &mut f);
    assert_eq!(r, 0x00);
    assert!(f.zf);
    assert!(!f.cf);
}

#[test]
fn sbb_with_borrow_in() {
    let mut f = Flags::new();
    let r = alu::sub(0x20, 0x10, true, &mut f);
    assert_eq!(r, 0x0F); // 0x20 - 0x10 - 1
    assert!(!f.cf);
}

#[test]
fn cmp_does_not_return_a_value_change() {
    // CMP only affects flags; verified at the opcode level, this just
    // confirms the flag outcome matches a subtraction.
    let mut f = Flags::new();
    alu::cmp(0x42, 0x42, &mut f);
    assert!(f.zf);
}

#[test]
fn inr_wraps_and_sets_zero_and_half_carry() {
    let mut f = Flags::new();
    let r = alu::inr(0xFF, &mut f);
    assert_eq!(r, 0x00);
    assert!(f.zf);
    assert!(f.acf);
}

#[test]
fn inr_does_not_affect_carry() {
    let mut f = Flags::new();
    f.cf = true;
    alu::inr(0x01, &mut f);
    assert!(f.cf);
}

#[test]
fn dcr_wraps_and_sets_sign() {
    let mut f = Flags::new();
    let r = alu::dcr(0x00, &mut f);
    assert_eq!(r, 0xFF);
    assert!(f.sf);
    // Documented quirk: ACF clears when the low nibble borrows (was 0).
    assert!(!f.acf);
}

#[test]
fn dcr_acf_quirk_no_nibble_borrow() {
    // Low nibble 0 borrows from the high nibble -> acf clear.
    let mut f = Flags::new();
    alu::dcr(0x10, &mut f);
    assert!(!f.acf);
    // Nonzero low nibble needs no borrow -> acf set.
    let mut f2 = Flags::new();
    alu::dcr(0x11, &mut f2);
    assert!(f2.acf);
}

#[test]
fn ana_acf_quirk() {
    let mut f = Flags::new();
    let r = alu::ana(0xFC, 0x0F, &mut f);
    assert_eq!(r, 0x0C);
    assert!(!f.cf);
    // (0xFC | 0x0F) & 0x08 != 0
    assert!(f.acf);
}

#[test]
fn xra_clears_carry_and_acf() {
    let mut f = Flags::new();
    f.cf = true;
    let r = alu::xra(0xFF, 0xFF, &mut f);
    assert_eq!(r, 0x00);
    assert!(f.zf);
    assert!(!f.cf);
    assert!(!f.acf);
}

#[test]
fn ora_basic() {
    let mut f = Flags::new();
    let r = alu::ora(0xF0, 0x0F, &mut f);
    assert_eq!(r, 0xFF);
    assert!(f.sf);
    assert!(!f.cf);
}

#[test]
fn rlc_rotates_bit7_into_bit0_and_carry() {
    let mut f = Flags::new();
    let r = alu::rlc(0x80, &mut f);
    assert_eq!(r, 0x01);
    assert!(f.cf);
}

#[test]
fn rrc_rotates_bit0_into_bit7_and_carry() {
    let mut f = Flags::new();
    let r = alu::rrc(0x01, &mut f);
    assert_eq!(r, 0x80);
    assert!(f.cf);
}

#[test]
fn ral_rotates_through_carry() {
    let mut f = Flags::new();
    f.cf = true;
    let r = alu::ral(0x00, &mut f);
    assert_eq!(r, 0x01); // old carry entered bit 0
    assert!(!f.cf); // bit 7 was 0
}

#[test]
fn rar_rotates_through_carry() {
    let mut f = Flags::new();
    f.cf = true;
    let r = alu::rar(0x00, &mut f);
    assert_eq!(r, 0x80); // old carry entered bit 7
    assert!(!f.cf); // bit 0 was 0
}

#[test]
fn dad_sets_carry_on_overflow() {
    let mut f = Flags::new();
    let r = alu::dad(0xFFFF, 0x0001, &mut f);
    assert_eq!(r, 0x0000);
    assert!(f.cf);
}

#[test]
fn dad_does_not_touch_zero_or_sign() {
    let mut f = Flags::new();
    f.zf = true;
    f.sf = true;
    alu::dad(0x0001, 0x0001, &mut f);
    assert!(f.zf);
    assert!(f.sf);
}

#[test]
fn daa_scenario() {
    // A=0x9B, CF=0, ACF=0 -> DAA -> A=0x01, CF=1, ACF=1
    let mut f = Flags::new();
    let r = alu::daa(0x9B, &mut f);
    assert_eq!(r, 0x01);
    assert!(f.cf);
    assert!(f.acf);
    assert!(!f.zf);
    assert!(!f.sf);
    assert!(!f.pf);
}

#[test]
fn daa_no_correction_needed() {
    let mut f = Flags::new();
    let r = alu::daa(0x44, &mut f);
    assert_eq!(r, 0x44);
    assert!(!f.cf);
    assert!(!f.acf);
}

#[test]
fn daa_carry_is_sticky() {
    let mut f = Flags::new();
    f.cf = true;
    let r = alu::daa(0x05, &mut f);
    // high nibble correction always applied because CF was already set
    assert_eq!(r, 0x65);
    assert!(f.cf);
}

#[test]
fn cma_complements_without_touching_flags() {
    let r = alu::cma(0x55);
    assert_eq!(r, 0xAA);
}

#[test]
fn cmc_toggles_carry() {
    let mut f = Flags::new();
    alu::cmc(&mut f);
    assert!(f.cf);
    alu::cmc(&mut f);
    assert!(!f.cf);
}

#[test]
fn stc_sets_carry() {
    let mut f = Flags::new();
    alu::stc(&mut f);
    assert!(f.cf);
}
