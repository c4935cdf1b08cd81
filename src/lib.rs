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

//! # intel8080-core
//!
//! An Intel 8080 CPU emulator core.
//!
//! Provides a [`Cpu`] that executes 8080 instructions one at a time against
//! any memory and I/O system implementing the [`Bus`] trait.
//!
//! ## Example
//!
//! ```rust
//! use intel8080_core::{Bus, Cpu};
//!
//! struct FlatRam([u8; 65536]);
//!
//! impl Bus for FlatRam {
//!     fn read_byte(&self, addr: u16) -> u8 { self.0[addr as usize] }
//!     fn write_byte(&mut self, addr: u16, val: u8) { self.0[addr as usize] = val; }
//!     fn port_in(&mut self, _port: u8) -> u8 { 0 }
//!     fn port_out(&mut self, _port: u8, _val: u8) {}
//! }
//!
//! let mut bus = FlatRam([0; 65536]);
//! // MVI A,0x42 ; HLT
//! bus.0[0] = 0x3E;
//! bus.0[1] = 0x42;
//! bus.0[2] = 0x76;
//!
//! let mut cpu = Cpu::new();
//! cpu.step(&mut bus);
//! assert_eq!(cpu.reg.a, 0x42);
//! cpu.step(&mut bus);
//! assert!(cpu.halted);
//! ```

pub mod alu;
pub mod bus;
mod cpu;
pub mod registers;

pub use bus::Bus;
pub use cpu::Cpu;
pub use registers::{Flags, Registers};

#[cfg(test)]
mod tests;
