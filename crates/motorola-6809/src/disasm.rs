//! Mnemonic lookup for debuggers.

use emu_core::Bus;

use crate::cpu::Cpu6809;
use crate::opcodes::{self, AddrMode};

impl Cpu6809 {
    /// Return the mnemonic of the opcode at `addr`, resolving the
    /// 0x10/0x11 prefix pages. Illegal opcodes read back as `"???"`.
    pub fn mnemonic_at<B: Bus>(&self, bus: &mut B, addr: u16) -> &'static str {
        let opcode = bus.read(addr);
        match opcode {
            0x10 => {
                let sub = bus.read(addr.wrapping_add(1));
                opcodes::page10(sub).map_or("???", |info| info.mnemonic)
            }
            0x11 => {
                let sub = bus.read(addr.wrapping_add(1));
                opcodes::page11(sub).map_or("???", |info| info.mnemonic)
            }
            _ => {
                let info = opcodes::PAGE0[usize::from(opcode)];
                if info.mode == AddrMode::Illegal {
                    "???"
                } else {
                    info.mnemonic
                }
            }
        }
    }
}
