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

use std::fmt;

use crate::bus::Bus;
use crate::registers::Registers;

mod opcodes;

// ---------------------------------------------------------------------------
// CPU state
// ---------------------------------------------------------------------------

/// Intel 8080 CPU emulator.
///
/// Holds the programmer-visible registers plus the halt/interrupt latches
/// and cycle counter described in the core's data model. The CPU does not
/// own memory or I/O devices: every [`step`](Cpu::step) call borrows a
/// [`Bus`] implementation supplied by the host.
pub struct Cpu {
    /// Programmer-visible registers.
    pub reg: Registers,
    /// Total machine cycles executed since [`Cpu::new`]/[`Cpu::init`].
    pub cycles: u64,
    /// Set by `HLT`, cleared by an accepted interrupt.
    pub halted: bool,

    /// An interrupt opcode is latched and awaits execution.
    interrupt_pending: bool,
    /// The opcode to execute when the latch is consumed (typically an RST).
    interrupt_opcode: u8,
    /// Interrupt-enable flip-flop, toggled by DI/EI and cleared on accept.
    interrupt_enabled: bool,
    /// Countdown until EI's effect takes hold (one-instruction hardware
    /// delay): 2 when just armed, ticks to 1 after the next instruction
    /// executes, and to 0 (enabling interrupts) after the instruction
    /// following that. This guarantees the instruction immediately after
    /// EI — conventionally a RET — always runs before an interrupt can
    /// preempt it.
    ei_delay: u8,
}

impl Cpu {
    /// Create a new CPU with all state zeroed, matching [`Cpu::init`].
    pub fn new() -> Self {
        Self {
            reg: Registers::new(),
            cycles: 0,
            halted: false,
            interrupt_pending: false,
            interrupt_opcode: 0,
            interrupt_enabled: true,
            ei_delay: 0,
        }
    }

    /// Reset all CPU state to zero: registers, flags, PC, SP, cycle count,
    /// halt and interrupt latches. Does not touch the bus — the host is
    /// expected to supply it fresh on the next `step`/`interrupt` call.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    /// Queue an interrupt opcode (typically one of the RST family). The
    /// core consumes it at the top of the next [`step`](Cpu::step), but
    /// only if interrupts are currently enabled; otherwise it remains
    /// latched until they are.
    ///
    /// The host must not call this concurrently with `step` without
    /// external synchronisation (see the crate's concurrency notes).
    pub fn interrupt(&mut self, opcode: u8) {
        self.interrupt_pending = true;
        self.interrupt_opcode = opcode;
    }

    /// Execute exactly one instruction, or consume one pending interrupt.
    /// Returns the number of machine cycles consumed.
    pub fn step(&mut self, bus: &mut impl Bus) -> u64 {
        let start_cycles = self.cycles;

        if self.interrupt_pending && self.interrupt_enabled {
            self.interrupt_pending = false;
            self.interrupt_enabled = false;
            self.halted = false;
            let opcode = self.interrupt_opcode;
            self.execute(bus, opcode);
            self.advance_ei_delay();
            return self.cycles - start_cycles;
        }

        if self.halted {
            self.cycles += 4;
            return self.cycles - start_cycles;
        }

        let opcode = self.fetch_byte(bus);
        self.execute(bus, opcode);
        self.advance_ei_delay();

        self.cycles - start_cycles
    }

    fn advance_ei_delay(&mut self) {
        if self.ei_delay > 0 {
            self.ei_delay -= 1;
            if self.ei_delay == 0 {
                self.interrupt_enabled = true;
            }
        }
    }

    // ---- DI/EI, used by the opcode dispatcher ----

    pub(crate) fn disable_interrupts(&mut self) {
        self.interrupt_enabled = false;
        self.ei_delay = 0;
    }

    pub(crate) fn arm_enable_interrupts(&mut self) {
        self.ei_delay = 2;
    }

    // ---- instruction fetch helpers ----

    /// Fetch a byte from `[PC]` and advance PC.
    pub(crate) fn fetch_byte(&mut self, bus: &impl Bus) -> u8 {
        let val = bus.read_byte(self.reg.pc);
        self.reg.pc = self.reg.pc.wrapping_add(1);
        val
    }

    /// Fetch a little-endian 16-bit word from `[PC]` and advance PC by 2.
    pub(crate) fn fetch_word(&mut self, bus: &impl Bus) -> u16 {
        let lo = self.fetch_byte(bus) as u16;
        let hi = self.fetch_byte(bus) as u16;
        (hi << 8) | lo
    }

    // ---- stack helpers ----

    /// Push a 16-bit word: decrement SP, write the high byte, decrement SP
    /// again, write the low byte. The high byte hits the bus first.
    pub(crate) fn push_word(&mut self, bus: &mut impl Bus, val: u16) {
        self.reg.sp = self.reg.sp.wrapping_sub(1);
        bus.write_byte(self.reg.sp, (val >> 8) as u8);
        self.reg.sp = self.reg.sp.wrapping_sub(1);
        bus.write_byte(self.reg.sp, val as u8);
    }

    /// Pop a 16-bit word: read the low byte, increment SP, read the high
    /// byte, increment SP again.
    pub(crate) fn pop_word(&mut self, bus: &impl Bus) -> u16 {
        let lo = bus.read_byte(self.reg.sp) as u16;
        self.reg.sp = self.reg.sp.wrapping_add(1);
        let hi = bus.read_byte(self.reg.sp) as u16;
        self.reg.sp = self.reg.sp.wrapping_add(1);
        (hi << 8) | lo
    }

    // ---- control-flow primitives ----

    /// CALL: push the current PC, then jump to `target`.
    pub(crate) fn call(&mut self, bus: &mut impl Bus, target: u16) {
        self.push_word(bus, self.reg.pc);
        self.reg.pc = target;
    }

    /// RET: pop PC from the stack.
    pub(crate) fn ret(&mut self, bus: &impl Bus) {
        self.reg.pc = self.pop_word(bus);
    }

    /// RST n: call to `n * 8`.
    pub(crate) fn rst(&mut self, bus: &mut impl Bus, n: u8) {
        self.call(bus, (n as u16) * 8);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cyc={} halted={} int_pending={} ie={}",
            self.reg, self.cycles, self.halted, self.interrupt_pending, self.interrupt_enabled
        )
    }
}
