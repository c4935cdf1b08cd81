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

//! Opcode dispatch and cycle table for the 8080: the dense 256-way decode
//! of `step`'s fetched byte.
//!
//! 8080 opcodes are regular enough (`01DDDSSS` for MOV, `10ALUooo` for the
//! ALU-over-register block, `11RRxxxx` for stack/branch groups) that most
//! handlers decode the destination/source/register-pair/condition straight
//! out of the opcode bits rather than being spelled out 256 times.

use crate::alu;
use crate::bus::Bus;
use crate::cpu::Cpu;

/// Base cycle counts for all 256 opcodes. Conditional CALL/RET add 6 more
/// cycles when the branch is taken (handled inline); conditional JMP always
/// costs the same 10 cycles because the target is read unconditionally.
#[rustfmt::skip]
const CYCLES: [u8; 256] = [
//  0   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    4, 10,  7,  5,  5,  5,  7,  4,  4, 10,  7,  5,  5,  5,  7,  4, // 0x
    4, 10,  7,  5,  5,  5,  7,  4,  4, 10,  7,  5,  5,  5,  7,  4, // 1x
    4, 10, 16,  5,  5,  5,  7,  4,  4, 10, 16,  5,  5,  5,  7,  4, // 2x
    4, 10, 13,  5, 10, 10, 10,  4,  4, 10, 13,  5,  5,  5,  7,  4, // 3x
    5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5, // 4x
    5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5, // 5x
    5,  5,  5,  5,  5,  5,  7,  5,  5,  5,  5,  5,  5,  5,  7,  5, // 6x
    7,  7,  7,  7,  7,  7,  7,  7,  5,  5,  5,  5,  5,  5,  7,  5, // 7x (0x76 = HLT)
    4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4, // 8x
    4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4, // 9x
    4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4, // Ax
    4,  4,  4,  4,  4,  4,  7,  4,  4,  4,  4,  4,  4,  4,  7,  4, // Bx
    5, 10, 10, 10, 11, 11,  7, 11,  5, 10, 10,  4, 11, 17,  7, 11, // Cx
    5, 10, 10, 10, 11, 11,  7, 11,  5,  4, 10, 10, 11,  4,  7, 11, // Dx
    5, 10, 10, 18, 11, 11,  7, 11,  5,  5, 10,  5, 11,  4,  7, 11, // Ex
    5, 10, 10,  4, 11, 11,  7, 11,  5,  5, 10,  4, 11,  4,  7, 11, // Fx
];

/// Extra cycles added when a conditional CALL/RET is actually taken.
const COND_TAKEN_EXTRA: u64 = 6;

pub(crate) fn execute(cpu: &mut Cpu, bus: &mut impl Bus, opcode: u8) {
    cpu.cycles += CYCLES[opcode as usize] as u64;

    match opcode {
        0x00 => {} // NOP
        0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => {} // undocumented, NOP
        0xCB | 0xD9 | 0xDD | 0xED | 0xFD => {} // undocumented, NOP

        // =================================================================
        // 0x01/0x11/0x21/0x31 — LXI rp, d16
        // =================================================================
        0x01 | 0x11 | 0x21 | 0x31 => {
            let val = cpu.fetch_word(bus);
            set_rp(cpu, (opcode >> 4) & 0x03, val);
        }

        // 0x02/0x12 — STAX BC/DE ; 0x0A/0x1A — LDAX BC/DE
        0x02 => bus.write_byte(cpu.reg.bc(), cpu.reg.a),
        0x12 => bus.write_byte(cpu.reg.de(), cpu.reg.a),
        0x0A => cpu.reg.a = bus.read_byte(cpu.reg.bc()),
        0x1A => cpu.reg.a = bus.read_byte(cpu.reg.de()),

        // 0x03/0x13/0x23/0x33 — INX rp ; 0x0B/0x1B/0x2B/0x3B — DCX rp
        0x03 | 0x13 | 0x23 | 0x33 => {
            let rp = (opcode >> 4) & 0x03;
            let val = get_rp(cpu, rp).wrapping_add(1);
            set_rp(cpu, rp, val);
        }
        0x0B | 0x1B | 0x2B | 0x3B => {
            let rp = (opcode >> 4) & 0x03;
            let val = get_rp(cpu, rp).wrapping_sub(1);
            set_rp(cpu, rp, val);
        }

        // 0x09/0x19/0x29/0x39 — DAD rp
        0x09 | 0x19 | 0x29 | 0x39 => {
            let rp = (opcode >> 4) & 0x03;
            let val = get_rp(cpu, rp);
            let result = alu::dad(cpu.reg.hl(), val, &mut cpu.reg.flags);
            cpu.reg.set_hl(result);
        }

        // =================================================================
        // INR r / DCR r (low 3 bits 100/101 of a 00RRR1xx opcode)
        // =================================================================
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            let r = (opcode >> 3) & 0x07;
            let val = get_reg(cpu, bus, r);
            let result = alu::inr(val, &mut cpu.reg.flags);
            set_reg(cpu, bus, r, result);
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            let r = (opcode >> 3) & 0x07;
            let val = get_reg(cpu, bus, r);
            let result = alu::dcr(val, &mut cpu.reg.flags);
            set_reg(cpu, bus, r, result);
        }

        // MVI r, d8
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let r = (opcode >> 3) & 0x07;
            let val = cpu.fetch_byte(bus);
            set_reg(cpu, bus, r, val);
        }

        // Rotates
        0x07 => cpu.reg.a = alu::rlc(cpu.reg.a, &mut cpu.reg.flags),
        0x0F => cpu.reg.a = alu::rrc(cpu.reg.a, &mut cpu.reg.flags),
        0x17 => cpu.reg.a = alu::ral(cpu.reg.a, &mut cpu.reg.flags),
        0x1F => cpu.reg.a = alu::rar(cpu.reg.a, &mut cpu.reg.flags),

        // 16-bit load/store direct
        0x22 => {
            // SHLD a16
            let addr = cpu.fetch_word(bus);
            bus.write_word(addr, cpu.reg.hl());
        }
        0x2A => {
            // LHLD a16
            let addr = cpu.fetch_word(bus);
            let val = bus.read_word(addr);
            cpu.reg.set_hl(val);
        }
        0x32 => {
            // STA a16
            let addr = cpu.fetch_word(bus);
            bus.write_byte(addr, cpu.reg.a);
        }
        0x3A => {
            // LDA a16
            let addr = cpu.fetch_word(bus);
            cpu.reg.a = bus.read_byte(addr);
        }

        0x27 => cpu.reg.a = alu::daa(cpu.reg.a, &mut cpu.reg.flags),
        0x2F => cpu.reg.a = alu::cma(cpu.reg.a),
        0x37 => alu::stc(&mut cpu.reg.flags),
        0x3F => alu::cmc(&mut cpu.reg.flags),

        // =================================================================
        // 0x76 — HLT
        // =================================================================
        0x76 => {
            // Unlike a normal opcode, HLT leaves PC pointing at itself
            // rather than at the following instruction: fetch already
            // advanced PC past the opcode byte, so roll it back by one.
            cpu.halted = true;
            cpu.reg.pc = cpu.reg.pc.wrapping_sub(1);
        }

        // 0x40..0x7F — MOV r, r' (0x76 handled above)
        0x40..=0x7F => {
            let dst = (opcode >> 3) & 0x07;
            let src = opcode & 0x07;
            let val = get_reg(cpu, bus, src);
            set_reg(cpu, bus, dst, val);
        }

        // =================================================================
        // 0x80..0xBF — ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP, source r
        // =================================================================
        0x80..=0xBF => {
            let src = opcode & 0x07;
            let val = get_reg(cpu, bus, src);
            let a = cpu.reg.a;
            let cf = cpu.reg.flags.cf;
            cpu.reg.a = match (opcode >> 3) & 0x07 {
                0 => alu::add(a, val, false, &mut cpu.reg.flags),
                1 => alu::add(a, val, cf, &mut cpu.reg.flags),
                2 => alu::sub(a, val, false, &mut cpu.reg.flags),
                3 => alu::sub(a, val, cf, &mut cpu.reg.flags),
                4 => alu::ana(a, val, &mut cpu.reg.flags),
                5 => alu::xra(a, val, &mut cpu.reg.flags),
                6 => alu::ora(a, val, &mut cpu.reg.flags),
                7 => {
                    alu::cmp(a, val, &mut cpu.reg.flags);
                    a
                }
                _ => unreachable!(),
            };
        }

        // =================================================================
        // Conditional / unconditional return, jump, call
        // =================================================================
        0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
            let cc = (opcode >> 3) & 0x07;
            if condition(cpu, cc) {
                cpu.ret(bus);
                cpu.cycles += COND_TAKEN_EXTRA;
            }
        }
        0xC9 => cpu.ret(bus),

        0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
            let cc = (opcode >> 3) & 0x07;
            let target = cpu.fetch_word(bus);
            if condition(cpu, cc) {
                cpu.reg.pc = target;
            }
        }
        0xC3 => {
            let target = cpu.fetch_word(bus);
            cpu.reg.pc = target;
        }

        0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
            let cc = (opcode >> 3) & 0x07;
            let target = cpu.fetch_word(bus);
            if condition(cpu, cc) {
                cpu.call(bus, target);
                cpu.cycles += COND_TAKEN_EXTRA;
            }
        }
        0xCD => {
            let target = cpu.fetch_word(bus);
            cpu.call(bus, target);
        }

        // POP/PUSH rp (BC, DE, HL, PSW)
        0xC1 | 0xD1 | 0xE1 | 0xF1 => {
            let rp = (opcode >> 4) & 0x03;
            let val = cpu.pop_word(bus);
            set_rp_stack(cpu, rp, val);
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => {
            let rp = (opcode >> 4) & 0x03;
            let val = get_rp_stack(cpu, rp);
            cpu.push_word(bus, val);
        }

        // Immediate-d8 ALU forms
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
            let val = cpu.fetch_byte(bus);
            let a = cpu.reg.a;
            let cf = cpu.reg.flags.cf;
            cpu.reg.a = match (opcode >> 3) & 0x07 {
                0 => alu::add(a, val, false, &mut cpu.reg.flags),
                1 => alu::add(a, val, cf, &mut cpu.reg.flags),
                2 => alu::sub(a, val, false, &mut cpu.reg.flags),
                3 => alu::sub(a, val, cf, &mut cpu.reg.flags),
                4 => alu::ana(a, val, &mut cpu.reg.flags),
                5 => alu::xra(a, val, &mut cpu.reg.flags),
                6 => alu::ora(a, val, &mut cpu.reg.flags),
                7 => {
                    alu::cmp(a, val, &mut cpu.reg.flags);
                    a
                }
                _ => unreachable!(),
            };
        }

        // RST 0..7
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            let n = (opcode >> 3) & 0x07;
            cpu.rst(bus, n);
        }

        // I/O
        0xD3 => {
            let port = cpu.fetch_byte(bus);
            bus.port_out(port, cpu.reg.a);
        }
        0xDB => {
            let port = cpu.fetch_byte(bus);
            cpu.reg.a = bus.port_in(port);
        }

        // Misc inherent
        0xE3 => {
            // XTHL: swap HL with the word at [SP]
            let tmp = bus.read_word(cpu.reg.sp);
            bus.write_word(cpu.reg.sp, cpu.reg.hl());
            cpu.reg.set_hl(tmp);
        }
        0xE9 => cpu.reg.pc = cpu.reg.hl(), // PCHL
        0xEB => {
            // XCHG: swap HL and DE
            let hl = cpu.reg.hl();
            let de = cpu.reg.de();
            cpu.reg.set_hl(de);
            cpu.reg.set_de(hl);
        }
        0xF9 => cpu.reg.sp = cpu.reg.hl(), // SPHL

        0xF3 => cpu.disable_interrupts(), // DI
        0xFB => cpu.arm_enable_interrupts(), // EI

        // Every one of the 256 slots is accounted for above.
        _ => unreachable!("opcode {:#04X} not covered by dispatch", opcode),
    }
}

// ---------------------------------------------------------------------------
// Register / register-pair helpers
// ---------------------------------------------------------------------------

/// Read register `code` (0..7 = B,C,D,E,H,L,M,A). M is `memory[HL]`.
fn get_reg(cpu: &Cpu, bus: &impl Bus, code: u8) -> u8 {
    match code {
        0 => cpu.reg.b,
        1 => cpu.reg.c,
        2 => cpu.reg.d,
        3 => cpu.reg.e,
        4 => cpu.reg.h,
        5 => cpu.reg.l,
        6 => bus.read_byte(cpu.reg.hl()),
        7 => cpu.reg.a,
        _ => unreachable!(),
    }
}

/// Write register `code` (0..7 = B,C,D,E,H,L,M,A).
fn set_reg(cpu: &mut Cpu, bus: &mut impl Bus, code: u8, val: u8) {
    match code {
        0 => cpu.reg.b = val,
        1 => cpu.reg.c = val,
        2 => cpu.reg.d = val,
        3 => cpu.reg.e = val,
        4 => cpu.reg.h = val,
        5 => cpu.reg.l = val,
        6 => bus.write_byte(cpu.reg.hl(), val),
        7 => cpu.reg.a = val,
        _ => unreachable!(),
    }
}

/// Read register pair `rp` (0=BC, 1=DE, 2=HL, 3=SP) for LXI/DAD/INX/DCX.
fn get_rp(cpu: &Cpu, rp: u8) -> u16 {
    match rp {
        0 => cpu.reg.bc(),
        1 => cpu.reg.de(),
        2 => cpu.reg.hl(),
        3 => cpu.reg.sp,
        _ => unreachable!(),
    }
}

/// Write register pair `rp` (0=BC, 1=DE, 2=HL, 3=SP).
fn set_rp(cpu: &mut Cpu, rp: u8, val: u16) {
    match rp {
        0 => cpu.reg.set_bc(val),
        1 => cpu.reg.set_de(val),
        2 => cpu.reg.set_hl(val),
        3 => cpu.reg.sp = val,
        _ => unreachable!(),
    }
}

/// Read register pair `rp` (0=BC, 1=DE, 2=HL, 3=PSW) for PUSH.
fn get_rp_stack(cpu: &Cpu, rp: u8) -> u16 {
    match rp {
        0 => cpu.reg.bc(),
        1 => cpu.reg.de(),
        2 => cpu.reg.hl(),
        3 => ((cpu.reg.a as u16) << 8) | cpu.reg.flags.to_psw() as u16,
        _ => unreachable!(),
    }
}

/// Write register pair `rp` (0=BC, 1=DE, 2=HL, 3=PSW) for POP.
fn set_rp_stack(cpu: &mut Cpu, rp: u8, val: u16) {
    match rp {
        0 => cpu.reg.set_bc(val),
        1 => cpu.reg.set_de(val),
        2 => cpu.reg.set_hl(val),
        3 => {
            cpu.reg.a = (val >> 8) as u8;
            cpu.reg.flags = crate::registers::Flags::from_psw(val as u8);
        }
        _ => unreachable!(),
    }
}

/// Evaluate condition code `cc` (0=NZ,1=Z,2=NC,3=C,4=PO,5=PE,6=P,7=M).
fn condition(cpu: &Cpu, cc: u8) -> bool {
    match cc {
        0 => !cpu.reg.flags.zf,
        1 => cpu.reg.flags.zf,
        2 => !cpu.reg.flags.cf,
        3 => cpu.reg.flags.cf,
        4 => !cpu.reg.flags.pf,
        5 => cpu.reg.flags.pf,
        6 => !cpu.reg.flags.sf,
        7 => cpu.reg.flags.sf,
        _ => unreachable!(),
    }
}
