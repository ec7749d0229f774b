//! Instruction fetch and dispatch.
//!
//! The opcode table supplies the addressing mode and base costs; the
//! effective address is resolved first and each instruction body then
//! reads or writes through it. The 0x10/0x11 prefixes select the two
//! extended pages.

use emu_core::Bus;

use crate::cpu::{Cpu6809, ExceptionKind};
use crate::opcodes::{self, AddrMode};
use crate::stack::Swi;

impl Cpu6809 {
    /// Fetch and execute one instruction at PC.
    pub(crate) fn execute<B: Bus>(&mut self, bus: &mut B) {
        let opcode = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);

        match opcode {
            0x10 => {
                let sub = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.execute_page10(bus, sub);
            }
            0x11 => {
                let sub = bus.read(self.regs.pc);
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.execute_page11(bus, sub);
            }
            _ => self.execute_page0(bus, opcode),
        }
    }

    /// Evaluate the condition of a (long) conditional branch opcode
    /// 0x22..=0x2F (low byte shared between the short and long forms).
    fn branch_taken(&self, opcode: u8) -> bool {
        let cc = self.regs.cc;
        match opcode {
            0x22 => !cc.c && !cc.z,        // bhi
            0x23 => cc.c || cc.z,          // bls
            0x24 => !cc.c,                 // bcc / bhs
            0x25 => cc.c,                  // bcs / blo
            0x26 => !cc.z,                 // bne
            0x27 => cc.z,                  // beq
            0x28 => !cc.v,                 // bvc
            0x29 => cc.v,                  // bvs
            0x2A => !cc.n,                 // bpl
            0x2B => cc.n,                  // bmi
            0x2C => cc.n == cc.v,          // bge
            0x2D => cc.n != cc.v,          // blt
            0x2E => cc.n == cc.v && !cc.z, // bgt
            _ => cc.n != cc.v || cc.z,     // ble (0x2F)
        }
    }

    fn execute_page0<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let info = opcodes::PAGE0[usize::from(opcode)];
        if info.mode == AddrMode::Illegal {
            self.raise(ExceptionKind::IllegalOpcode, opcode);
            return;
        }
        self.cycles = info.cycles;
        self.bytes = info.bytes;

        let Some(ea) = self.effective_address(bus, info.mode) else {
            return;
        };

        match opcode {
            // ABX
            0x3A => self.regs.x = self.regs.x.wrapping_add(u16::from(self.regs.b)),

            // ADCA / ADCB
            0x89 | 0x99 | 0xA9 | 0xB9 => {
                let operand = bus.read(ea);
                self.regs.a = self.adc8(self.regs.a, operand);
            }
            0xC9 | 0xD9 | 0xE9 | 0xF9 => {
                let operand = bus.read(ea);
                self.regs.b = self.adc8(self.regs.b, operand);
            }

            // ADDA / ADDB / ADDD
            0x8B | 0x9B | 0xAB | 0xBB => {
                let operand = bus.read(ea);
                self.regs.a = self.add8(self.regs.a, operand);
            }
            0xCB | 0xDB | 0xEB | 0xFB => {
                let operand = bus.read(ea);
                self.regs.b = self.add8(self.regs.b, operand);
            }
            0xC3 | 0xD3 | 0xE3 | 0xF3 => {
                let operand = bus.read_word(ea);
                self.addd(operand);
            }

            // ANDA / ANDB / ANDCC
            0x84 | 0x94 | 0xA4 | 0xB4 => {
                let operand = bus.read(ea);
                self.regs.a = self.and8(self.regs.a, operand);
            }
            0xC4 | 0xD4 | 0xE4 | 0xF4 => {
                let operand = bus.read(ea);
                self.regs.b = self.and8(self.regs.b, operand);
            }
            0x1C => {
                let operand = bus.read(ea);
                let masked = self.regs.cc.to_byte() & operand;
                self.regs.cc = crate::flags::Flags::from_byte(masked);
            }

            // ASL / ASLA / ASLB
            0x08 | 0x68 | 0x78 => {
                let operand = bus.read(ea);
                let result = self.asl8(operand);
                bus.write(ea, result);
            }
            0x48 => self.regs.a = self.asl8(self.regs.a),
            0x58 => self.regs.b = self.asl8(self.regs.b),

            // ASR / ASRA / ASRB
            0x07 | 0x67 | 0x77 => {
                let operand = bus.read(ea);
                let result = self.asr8(operand);
                bus.write(ea, result);
            }
            0x47 => self.regs.a = self.asr8(self.regs.a),
            0x57 => self.regs.b = self.asr8(self.regs.b),

            // BITA / BITB
            0x85 | 0x95 | 0xA5 | 0xB5 => {
                let operand = bus.read(ea);
                self.bit8(self.regs.a, operand);
            }
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                let operand = bus.read(ea);
                self.bit8(self.regs.b, operand);
            }

            // CLR / CLRA / CLRB
            0x0F | 0x6F | 0x7F => {
                let result = self.clr8();
                bus.write(ea, result);
            }
            0x4F => self.regs.a = self.clr8(),
            0x5F => self.regs.b = self.clr8(),

            // CMPA / CMPB / CMPX
            0x81 | 0x91 | 0xA1 | 0xB1 => {
                let operand = bus.read(ea);
                self.cmp8(self.regs.a, operand);
            }
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let operand = bus.read(ea);
                self.cmp8(self.regs.b, operand);
            }
            0x8C | 0x9C | 0xAC | 0xBC => {
                let operand = bus.read_word(ea);
                self.cmp16(self.regs.x, operand);
            }

            // COM / COMA / COMB
            0x03 | 0x63 | 0x73 => {
                let operand = bus.read(ea);
                let result = self.com8(operand);
                bus.write(ea, result);
            }
            0x43 => self.regs.a = self.com8(self.regs.a),
            0x53 => self.regs.b = self.com8(self.regs.b),

            // CWAI
            0x3C => {
                let operand = bus.read(ea);
                self.cwai(bus, operand);
            }

            // DAA
            0x19 => self.daa(),

            // DEC / DECA / DECB
            0x0A | 0x6A | 0x7A => {
                let operand = bus.read(ea);
                let result = self.dec8(operand);
                bus.write(ea, result);
            }
            0x4A => self.regs.a = self.dec8(self.regs.a),
            0x5A => self.regs.b = self.dec8(self.regs.b),

            // EORA / EORB
            0x88 | 0x98 | 0xA8 | 0xB8 => {
                let operand = bus.read(ea);
                self.regs.a = self.eor8(self.regs.a, operand);
            }
            0xC8 | 0xD8 | 0xE8 | 0xF8 => {
                let operand = bus.read(ea);
                self.regs.b = self.eor8(self.regs.b, operand);
            }

            // EXG
            0x1E => {
                let postbyte = bus.read(ea);
                self.exg(postbyte);
            }

            // INC / INCA / INCB
            0x0C | 0x6C | 0x7C => {
                let operand = bus.read(ea);
                let result = self.inc8(operand);
                bus.write(ea, result);
            }
            0x4C => self.regs.a = self.inc8(self.regs.a),
            0x5C => self.regs.b = self.inc8(self.regs.b),

            // JMP
            0x0E | 0x6E | 0x7E => self.regs.pc = ea,

            // JSR
            0x9D | 0xAD | 0xBD => {
                let return_addr = self.regs.pc;
                self.push_s(bus, return_addr as u8);
                self.push_s(bus, (return_addr >> 8) as u8);
                self.regs.pc = ea;
            }

            // LDA / LDB / LDD / LDU / LDX
            0x86 | 0x96 | 0xA6 | 0xB6 => {
                self.regs.a = bus.read(ea);
                self.regs.cc.set_nz8(self.regs.a);
                self.regs.cc.v = false;
            }
            0xC6 | 0xD6 | 0xE6 | 0xF6 => {
                self.regs.b = bus.read(ea);
                self.regs.cc.set_nz8(self.regs.b);
                self.regs.cc.v = false;
            }
            0xCC | 0xDC | 0xEC | 0xFC => {
                let value = bus.read_word(ea);
                self.regs.set_d(value);
                self.regs.cc.set_nz16(value);
                self.regs.cc.v = false;
            }
            0xCE | 0xDE | 0xEE | 0xFE => {
                self.regs.u = bus.read_word(ea);
                self.regs.cc.set_nz16(self.regs.u);
                self.regs.cc.v = false;
            }
            0x8E | 0x9E | 0xAE | 0xBE => {
                self.regs.x = bus.read_word(ea);
                self.regs.cc.set_nz16(self.regs.x);
                self.regs.cc.v = false;
            }

            // LEAX / LEAY / LEAS / LEAU
            0x30 => {
                self.regs.x = ea;
                self.regs.cc.z = self.regs.x == 0;
            }
            0x31 => {
                self.regs.y = ea;
                self.regs.cc.z = self.regs.y == 0;
            }
            0x32 => {
                self.regs.s = ea;
                self.nmi_armed = true;
            }
            0x33 => self.regs.u = ea,

            // LSR / LSRA / LSRB
            0x04 | 0x64 | 0x74 => {
                let operand = bus.read(ea);
                let result = self.lsr8(operand);
                bus.write(ea, result);
            }
            0x44 => self.regs.a = self.lsr8(self.regs.a),
            0x54 => self.regs.b = self.lsr8(self.regs.b),

            // MUL
            0x3D => self.mul(),

            // NEG / NEGA / NEGB
            0x00 | 0x60 | 0x70 => {
                let operand = bus.read(ea);
                let result = self.neg8(operand);
                bus.write(ea, result);
            }
            0x40 => self.regs.a = self.neg8(self.regs.a),
            0x50 => self.regs.b = self.neg8(self.regs.b),

            // NOP
            0x12 => {}

            // ORA / ORB / ORCC
            0x8A | 0x9A | 0xAA | 0xBA => {
                let operand = bus.read(ea);
                self.regs.a = self.or8(self.regs.a, operand);
            }
            0xCA | 0xDA | 0xEA | 0xFA => {
                let operand = bus.read(ea);
                self.regs.b = self.or8(self.regs.b, operand);
            }
            0x1A => {
                let operand = bus.read(ea);
                let merged = self.regs.cc.to_byte() | operand;
                self.regs.cc = crate::flags::Flags::from_byte(merged);
            }

            // PSHS / PULS / PSHU / PULU
            0x34 => {
                let mask = bus.read(ea);
                self.pshs(bus, mask);
            }
            0x35 => {
                let mask = bus.read(ea);
                self.puls(bus, mask);
            }
            0x36 => {
                let mask = bus.read(ea);
                self.pshu(bus, mask);
            }
            0x37 => {
                let mask = bus.read(ea);
                self.pulu(bus, mask);
            }

            // ROL / ROLA / ROLB
            0x09 | 0x69 | 0x79 => {
                let operand = bus.read(ea);
                let result = self.rol8(operand);
                bus.write(ea, result);
            }
            0x49 => self.regs.a = self.rol8(self.regs.a),
            0x59 => self.regs.b = self.rol8(self.regs.b),

            // ROR / RORA / RORB
            0x06 | 0x66 | 0x76 => {
                let operand = bus.read(ea);
                let result = self.ror8(operand);
                bus.write(ea, result);
            }
            0x46 => self.regs.a = self.ror8(self.regs.a),
            0x56 => self.regs.b = self.ror8(self.regs.b),

            // RTI / RTS
            0x3B => self.rti(bus),
            0x39 => self.rts(bus),

            // SBCA / SBCB
            0x82 | 0x92 | 0xA2 | 0xB2 => {
                let operand = bus.read(ea);
                self.regs.a = self.sbc8(self.regs.a, operand);
            }
            0xC2 | 0xD2 | 0xE2 | 0xF2 => {
                let operand = bus.read(ea);
                self.regs.b = self.sbc8(self.regs.b, operand);
            }

            // SEX
            0x1D => self.sex(),

            // STA / STB / STD / STU / STX
            0x97 | 0xA7 | 0xB7 => {
                bus.write(ea, self.regs.a);
                self.regs.cc.set_nz8(self.regs.a);
                self.regs.cc.v = false;
            }
            0xD7 | 0xE7 | 0xF7 => {
                bus.write(ea, self.regs.b);
                self.regs.cc.set_nz8(self.regs.b);
                self.regs.cc.v = false;
            }
            0xDD | 0xED | 0xFD => {
                bus.write(ea, self.regs.a);
                bus.write(ea.wrapping_add(1), self.regs.b);
                self.regs.cc.set_nz16(self.regs.d());
                self.regs.cc.v = false;
            }
            0xDF | 0xEF | 0xFF => {
                bus.write(ea, (self.regs.u >> 8) as u8);
                bus.write(ea.wrapping_add(1), self.regs.u as u8);
                self.regs.cc.set_nz16(self.regs.u);
                self.regs.cc.v = false;
            }
            0x9F | 0xAF | 0xBF => {
                bus.write(ea, (self.regs.x >> 8) as u8);
                bus.write(ea.wrapping_add(1), self.regs.x as u8);
                self.regs.cc.set_nz16(self.regs.x);
                self.regs.cc.v = false;
            }

            // SUBA / SUBB / SUBD
            0x80 | 0x90 | 0xA0 | 0xB0 => {
                let operand = bus.read(ea);
                self.regs.a = self.sub8(self.regs.a, operand);
            }
            0xC0 | 0xD0 | 0xE0 | 0xF0 => {
                let operand = bus.read(ea);
                self.regs.b = self.sub8(self.regs.b, operand);
            }
            0x83 | 0x93 | 0xA3 | 0xB3 => {
                let operand = bus.read_word(ea);
                self.subd(operand);
            }

            // SWI
            0x3F => self.swi(bus, Swi::Swi1),

            // SYNC
            0x13 => self.run_state = crate::cpu::RunState::Sync,

            // TFR
            0x1F => {
                let postbyte = bus.read(ea);
                self.tfr(postbyte);
            }

            // TSTA / TSTB / TST
            0x4D => self.tst8(self.regs.a),
            0x5D => self.tst8(self.regs.b),
            0x0D | 0x6D | 0x7D => {
                let operand = bus.read(ea);
                self.tst8(operand);
            }

            // BRA / LBRA
            0x20 | 0x16 => self.regs.pc = ea,

            // BRN
            0x21 => {}

            // BSR / LBSR
            0x8D | 0x17 => {
                let return_addr = self.regs.pc;
                self.push_s(bus, return_addr as u8);
                self.push_s(bus, (return_addr >> 8) as u8);
                self.regs.pc = ea;
            }

            // Conditional short branches
            0x22..=0x2F => {
                if self.branch_taken(opcode) {
                    self.regs.pc = ea;
                }
            }

            _ => self.raise(ExceptionKind::IllegalOpcode, opcode),
        }
    }

    fn execute_page10<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let Some(info) = opcodes::page10(opcode) else {
            self.raise(ExceptionKind::IllegalOpcode, opcode);
            return;
        };
        self.cycles = info.cycles;
        self.bytes = info.bytes;

        let Some(ea) = self.effective_address(bus, info.mode) else {
            return;
        };

        match opcode {
            // CMPD / CMPY
            0x83 | 0x93 | 0xA3 | 0xB3 => {
                let operand = bus.read_word(ea);
                self.cmp16(self.regs.d(), operand);
            }
            0x8C | 0x9C | 0xAC | 0xBC => {
                let operand = bus.read_word(ea);
                self.cmp16(self.regs.y, operand);
            }

            // LDS / LDY
            0xCE | 0xDE | 0xEE | 0xFE => {
                self.regs.s = bus.read_word(ea);
                self.regs.cc.set_nz16(self.regs.s);
                self.regs.cc.v = false;
                self.nmi_armed = true;
            }
            0x8E | 0x9E | 0xAE | 0xBE => {
                self.regs.y = bus.read_word(ea);
                self.regs.cc.set_nz16(self.regs.y);
                self.regs.cc.v = false;
            }

            // STS / STY
            0xDF | 0xEF | 0xFF => {
                bus.write(ea, (self.regs.s >> 8) as u8);
                bus.write(ea.wrapping_add(1), self.regs.s as u8);
                self.regs.cc.set_nz16(self.regs.s);
                self.regs.cc.v = false;
            }
            0x9F | 0xAF | 0xBF => {
                bus.write(ea, (self.regs.y >> 8) as u8);
                bus.write(ea.wrapping_add(1), self.regs.y as u8);
                self.regs.cc.set_nz16(self.regs.y);
                self.regs.cc.v = false;
            }

            // LBRN
            0x21 => {}

            // Long conditional branches
            0x22..=0x2F => {
                if self.branch_taken(opcode) {
                    self.regs.pc = ea;
                }
            }

            // SWI2
            0x3F => self.swi(bus, Swi::Swi2),

            _ => self.raise(ExceptionKind::IllegalOpcode, opcode),
        }
    }

    fn execute_page11<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let Some(info) = opcodes::page11(opcode) else {
            self.raise(ExceptionKind::IllegalOpcode, opcode);
            return;
        };
        self.cycles = info.cycles;
        self.bytes = info.bytes;

        let Some(ea) = self.effective_address(bus, info.mode) else {
            return;
        };

        match opcode {
            // CMPU / CMPS
            0x83 | 0x93 | 0xA3 | 0xB3 => {
                let operand = bus.read_word(ea);
                self.cmp16(self.regs.u, operand);
            }
            0x8C | 0x9C | 0xAC | 0xBC => {
                let operand = bus.read_word(ea);
                self.cmp16(self.regs.s, operand);
            }

            // SWI3
            0x3F => self.swi(bus, Swi::Swi3),

            _ => self.raise(ExceptionKind::IllegalOpcode, opcode),
        }
    }

    /// EXG: exchange the two registers named by the postbyte nibbles.
    fn exg(&mut self, postbyte: u8) {
        let src = (postbyte >> 4) & 0x0F;
        let dst = postbyte & 0x0F;

        let (Some(a), Some(b)) = (self.read_register(src), self.read_register(dst)) else {
            self.raise(ExceptionKind::IllegalRegisterCode, postbyte);
            return;
        };
        self.write_register(dst, a);
        self.write_register(src, b);
    }

    /// TFR: copy the source register into the destination register.
    fn tfr(&mut self, postbyte: u8) {
        let src = (postbyte >> 4) & 0x0F;
        let dst = postbyte & 0x0F;

        let Some(value) = self.read_register(src) else {
            self.raise(ExceptionKind::IllegalRegisterCode, postbyte);
            return;
        };
        if !self.write_register(dst, value) {
            self.raise(ExceptionKind::IllegalRegisterCode, postbyte);
        }
    }
}
