//! MC6809E execution engine: run-state machine, interrupt sampling,
//! and the inter-register transfer file.
//!
//! `step()` is the only forward-progress primitive. Each call samples
//! the asynchronous inputs (RESET, HALT, NMI, FIRQ, IRQ) in priority
//! order, services at most one interrupt, then fetches and executes one
//! instruction — unless the CPU is held in reset, halted, waiting in
//! SYNC, or stopped on an exception.

use emu_core::{Bus, Observable, Value};

use crate::flags::Flags;
use crate::registers::Registers;
use crate::vectors;

/// CPU run state, returned by [`Cpu6809::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Fetching and executing instructions.
    Exec,
    /// Held by the HALT input.
    Halted,
    /// Waiting for an interrupt (SYNC or CWAI).
    Sync,
    /// Held by the RESET input.
    Reset,
    /// Stopped on an illegal opcode or undecodable operand. Terminal
    /// until reset.
    Exception,
}

/// Cause of an [`RunState::Exception`] transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionKind {
    /// Unassigned opcode (either page).
    IllegalOpcode,
    /// Indexed postbyte named a reserved submode.
    IllegalIndexedSubmode,
    /// EXG/TFR postbyte named a reserved register code.
    IllegalRegisterCode,
}

/// Details of the decode failure that stopped the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exception {
    /// Failure category.
    pub kind: ExceptionKind,
    /// Address of the failing instruction.
    pub pc: u16,
    /// The opcode byte (for prefixed forms, the page byte).
    pub opcode: u8,
}

/// Interrupt sources, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interrupt {
    Nmi,
    Firq,
    Irq,
}

/// Snapshot of the register file and execution bookkeeping, for
/// debuggers and single-step front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    /// Register file after the last executed instruction.
    pub regs: Registers,
    /// Run state after the last step.
    pub run_state: RunState,
    /// Address of the last executed instruction.
    pub last_pc: u16,
    /// Byte count of the last executed instruction.
    pub last_bytes: u8,
    /// Cycle count of the last executed instruction.
    pub last_cycles: u8,
    /// Whether NMI has been armed by a program load of S.
    pub nmi_armed: bool,
}

/// The Motorola MC6809E.
pub struct Cpu6809 {
    /// Register file.
    pub regs: Registers,

    pub(crate) run_state: RunState,

    // Asynchronous input latches. HALT/RESET/IRQ/FIRQ are levels
    // sampled once per step; NMI is an edge latch cleared on service.
    halt_line: bool,
    reset_line: bool,
    irq_line: bool,
    firq_line: bool,
    nmi_latched: bool,

    /// NMI is inhibited until the first program load of S.
    pub(crate) nmi_armed: bool,

    /// CWAI already pushed the full frame; the next service must not
    /// push again.
    pub(crate) frame_stacked: bool,

    pub(crate) exception: Option<Exception>,

    // Accounting for the instruction in flight.
    pub(crate) cycles: u8,
    pub(crate) bytes: u8,

    last_pc: u16,
    last_cycles: u8,
    last_bytes: u8,
    total_cycles: u64,
}

impl Default for Cpu6809 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu6809 {
    /// Create a CPU with everything zeroed, halted at address 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            run_state: RunState::Halted,
            halt_line: false,
            reset_line: false,
            irq_line: false,
            firq_line: false,
            nmi_latched: false,
            nmi_armed: false,
            frame_stacked: false,
            exception: None,
            cycles: 0,
            bytes: 0,
            last_pc: 0,
            last_cycles: 0,
            last_bytes: 0,
            total_cycles: 0,
        }
    }

    /// Reinitialise for execution at `start`: registers and latches
    /// cleared, run state HALTED, PC set.
    pub fn init(&mut self, start: u16) {
        *self = Self::new();
        self.regs.pc = start;
        self.last_pc = start;
    }

    /// Drive the HALT input level.
    pub fn halt(&mut self, asserted: bool) {
        self.halt_line = asserted;
    }

    /// Drive the RESET input level.
    pub fn reset(&mut self, asserted: bool) {
        self.reset_line = asserted;
    }

    /// Drive the IRQ input level.
    pub fn irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    /// Drive the FIRQ input level.
    pub fn firq(&mut self, asserted: bool) {
        self.firq_line = asserted;
    }

    /// Latch an NMI edge. Consumed at the next input sample once NMI is
    /// armed by a program load of S.
    pub fn nmi_trigger(&mut self) {
        self.nmi_latched = true;
    }

    /// Current run state.
    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Decode failure details, if the CPU stopped on one.
    #[must_use]
    pub fn exception(&self) -> Option<Exception> {
        self.exception
    }

    /// Address of the most recently executed instruction.
    #[must_use]
    pub fn last_pc(&self) -> u16 {
        self.last_pc
    }

    /// Cycle count of the most recently executed instruction.
    #[must_use]
    pub fn last_cycles(&self) -> u8 {
        self.last_cycles
    }

    /// Byte count of the most recently executed instruction.
    #[must_use]
    pub fn last_bytes(&self) -> u8 {
        self.last_bytes
    }

    /// Total cycles executed since init.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Copy out the register file and last-instruction bookkeeping.
    #[must_use]
    pub fn state(&self) -> CpuState {
        CpuState {
            regs: self.regs,
            run_state: self.run_state,
            last_pc: self.last_pc,
            last_bytes: self.last_bytes,
            last_cycles: self.last_cycles,
            nmi_armed: self.nmi_armed,
        }
    }

    /// Advance one instruction (or one state-machine transition when
    /// not executing) and return the new run state.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> RunState {
        // RESET responds asynchronously: while the line is held, the
        // CPU reloads the vector and stays in the RESET state.
        if self.reset_line {
            self.regs.cc.f = true;
            self.regs.cc.i = true;
            self.regs.dp = 0;
            self.nmi_armed = false;
            self.nmi_latched = false;
            self.frame_stacked = false;
            self.exception = None;
            self.last_cycles = 0;
            self.last_bytes = 0;
            self.run_state = RunState::Reset;
            self.regs.pc = bus.read_word(vectors::RESET);
            self.last_pc = self.regs.pc;
            return self.run_state;
        }

        self.last_pc = self.regs.pc;

        if self.halt_line {
            self.run_state = RunState::Halted;
            return self.run_state;
        }

        if self.run_state == RunState::Exception {
            return self.run_state;
        }

        // Sample the interrupt inputs. NMI is an edge latch; FIRQ and
        // IRQ are levels that must still be asserted at sample time.
        let nmi_pending = self.nmi_latched;
        let firq_pending = self.firq_line;
        let irq_pending = self.irq_line;

        let mut serviced = false;
        if self.nmi_armed && nmi_pending {
            self.service(bus, Interrupt::Nmi);
            serviced = true;
        } else if !self.regs.cc.f && firq_pending {
            self.service(bus, Interrupt::Firq);
            serviced = true;
        } else if !self.regs.cc.i && irq_pending {
            self.service(bus, Interrupt::Irq);
            serviced = true;
        }

        if self.run_state == RunState::Sync && !serviced {
            // A masked-but-asserted line ends a SYNC wait and execution
            // resumes at the next instruction. A CWAI wait (frame
            // already stacked) holds until an interrupt is serviced.
            let line_asserted = nmi_pending || firq_pending || irq_pending;
            if self.frame_stacked || !line_asserted {
                return RunState::Sync;
            }
        }

        self.run_state = RunState::Exec;
        self.cycles = 0;
        self.bytes = 0;
        self.execute(bus);

        self.last_cycles = self.cycles;
        self.last_bytes = self.bytes;
        self.total_cycles += u64::from(self.cycles);
        self.run_state
    }

    /// Interrupt entry: stack the frame (unless CWAI already did), set
    /// the mask bits, and load PC from the vector.
    fn service<B: Bus>(&mut self, bus: &mut B, interrupt: Interrupt) {
        self.run_state = RunState::Exec;
        let stacked = std::mem::take(&mut self.frame_stacked);

        match interrupt {
            Interrupt::Nmi => {
                if !stacked {
                    self.regs.cc.e = true;
                    self.push_machine_state(bus);
                }
                self.nmi_latched = false;
                self.regs.cc.f = true;
                self.regs.cc.i = true;
                self.regs.pc = bus.read_word(vectors::NMI);
            }
            Interrupt::Firq => {
                if !stacked {
                    self.regs.cc.e = false;
                    self.push_pc_cc(bus);
                }
                self.regs.cc.f = true;
                self.regs.cc.i = true;
                self.regs.pc = bus.read_word(vectors::FIRQ);
            }
            Interrupt::Irq => {
                if !stacked {
                    self.regs.cc.e = true;
                    self.push_machine_state(bus);
                }
                self.regs.cc.i = true;
                self.regs.pc = bus.read_word(vectors::IRQ);
            }
        }
    }

    pub(crate) fn raise(&mut self, kind: ExceptionKind, opcode: u8) {
        self.exception = Some(Exception {
            kind,
            pc: self.last_pc,
            opcode,
        });
        self.run_state = RunState::Exception;
    }

    /// Read a register by its EXG/TFR code. 8-bit registers widen.
    pub(crate) fn read_register(&mut self, code: u8) -> Option<u16> {
        let value = match code {
            0 => self.regs.d(),
            1 => self.regs.x,
            2 => self.regs.y,
            3 => self.regs.u,
            4 => self.regs.s,
            5 => self.regs.pc,
            8 => u16::from(self.regs.a),
            9 => u16::from(self.regs.b),
            10 => u16::from(self.regs.cc.to_byte()),
            11 => u16::from(self.regs.dp),
            _ => return None,
        };
        Some(value)
    }

    /// Write a register by its EXG/TFR code. 16-bit values truncate
    /// into 8-bit registers. Loading S arms NMI.
    pub(crate) fn write_register(&mut self, code: u8, value: u16) -> bool {
        match code {
            0 => self.regs.set_d(value),
            1 => self.regs.x = value,
            2 => self.regs.y = value,
            3 => self.regs.u = value,
            4 => {
                self.regs.s = value;
                self.nmi_armed = true;
            }
            5 => self.regs.pc = value,
            8 => self.regs.a = value as u8,
            9 => self.regs.b = value as u8,
            10 => self.regs.cc = Flags::from_byte(value as u8),
            11 => self.regs.dp = value as u8,
            _ => return false,
        }
        true
    }
}

impl Observable for Cpu6809 {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(flag) = path.strip_prefix("flags.") {
            let cc = self.regs.cc;
            let value = match flag {
                "c" => cc.c,
                "v" => cc.v,
                "z" => cc.z,
                "n" => cc.n,
                "i" => cc.i,
                "h" => cc.h,
                "f" => cc.f,
                "e" => cc.e,
                _ => return None,
            };
            return Some(value.into());
        }

        match path {
            "a" => Some(self.regs.a.into()),
            "b" => Some(self.regs.b.into()),
            "d" => Some(self.regs.d().into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "u" => Some(self.regs.u.into()),
            "s" => Some(self.regs.s.into()),
            "pc" => Some(self.regs.pc.into()),
            "dp" => Some(self.regs.dp.into()),
            "cc" => Some(self.regs.cc.to_byte().into()),
            "state" => Some(format!("{:?}", self.run_state).into()),
            "last_pc" => Some(self.last_pc.into()),
            "total_cycles" => Some(self.total_cycles.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "a",
            "b",
            "d",
            "x",
            "y",
            "u",
            "s",
            "pc",
            "dp",
            "cc",
            "flags.<c|v|z|n|i|h|f|e>",
            "state",
            "last_pc",
            "total_cycles",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat 64KB RAM for CPU-only tests.
    pub(crate) struct FlatRam {
        pub bytes: Vec<u8>,
    }

    impl FlatRam {
        pub(crate) fn new() -> Self {
            Self {
                bytes: vec![0; 0x1_0000],
            }
        }
    }

    impl Bus for FlatRam {
        fn read(&mut self, address: u16) -> u8 {
            self.bytes[usize::from(address)]
        }

        fn write(&mut self, address: u16, value: u8) {
            self.bytes[usize::from(address)] = value;
        }
    }

    fn cpu_and_ram() -> (Cpu6809, FlatRam) {
        let mut ram = FlatRam::new();
        // Reset vector → 0x1000.
        ram.bytes[0xFFFE] = 0x10;
        ram.bytes[0xFFFF] = 0x00;
        let mut cpu = Cpu6809::new();
        cpu.init(0x1000);
        (cpu, ram)
    }

    #[test]
    fn reset_loads_vector_and_masks() {
        let (mut cpu, mut ram) = cpu_and_ram();
        cpu.regs.dp = 0x55;
        cpu.reset(true);
        let state = cpu.step(&mut ram);
        assert_eq!(state, RunState::Reset);
        assert_eq!(cpu.regs.pc, 0x1000);
        assert_eq!(cpu.regs.dp, 0);
        assert!(cpu.regs.cc.f);
        assert!(cpu.regs.cc.i);
        assert!(!cpu.nmi_armed);
    }

    #[test]
    fn reset_held_stays_in_reset() {
        let (mut cpu, mut ram) = cpu_and_ram();
        cpu.reset(true);
        assert_eq!(cpu.step(&mut ram), RunState::Reset);
        assert_eq!(cpu.step(&mut ram), RunState::Reset);
        cpu.reset(false);
        ram.bytes[0x1000] = 0x12; // nop
        assert_eq!(cpu.step(&mut ram), RunState::Exec);
    }

    #[test]
    fn halt_pauses_execution() {
        let (mut cpu, mut ram) = cpu_and_ram();
        cpu.reset(true);
        cpu.step(&mut ram);
        cpu.reset(false);
        cpu.halt(true);
        let pc = cpu.regs.pc;
        assert_eq!(cpu.step(&mut ram), RunState::Halted);
        assert_eq!(cpu.regs.pc, pc);
        cpu.halt(false);
        ram.bytes[usize::from(pc)] = 0x12; // nop
        assert_eq!(cpu.step(&mut ram), RunState::Exec);
        assert_eq!(cpu.regs.pc, pc.wrapping_add(1));
    }

    #[test]
    fn irq_masked_by_i_flag() {
        let (mut cpu, mut ram) = cpu_and_ram();
        ram.bytes[0x1000] = 0x12; // nop
        cpu.regs.cc.i = true;
        cpu.irq(true);
        cpu.step(&mut ram);
        assert_eq!(cpu.regs.pc, 0x1001);
    }

    #[test]
    fn irq_enters_service_and_masks_i() {
        let (mut cpu, mut ram) = cpu_and_ram();
        ram.bytes[0xFFF8] = 0x20;
        ram.bytes[0xFFF9] = 0x00;
        ram.bytes[0x2000] = 0x12; // nop at the service routine
        cpu.regs.s = 0x7FFF;
        cpu.irq(true);
        cpu.step(&mut ram);
        assert!(cpu.regs.cc.i);
        assert!(!cpu.regs.cc.f, "IRQ must leave F alone");
        assert_eq!(cpu.regs.s, 0x7FFF - 12);
        // First ISR instruction ran within the same step.
        assert_eq!(cpu.regs.pc, 0x2001);
    }

    #[test]
    fn firq_pushes_short_frame() {
        let (mut cpu, mut ram) = cpu_and_ram();
        ram.bytes[0xFFF6] = 0x20;
        ram.bytes[0xFFF7] = 0x00;
        ram.bytes[0x2000] = 0x12;
        cpu.regs.s = 0x7FFF;
        cpu.firq(true);
        cpu.step(&mut ram);
        assert_eq!(cpu.regs.s, 0x7FFF - 3);
        assert!(cpu.regs.cc.f);
        assert!(cpu.regs.cc.i);
        // CC on the stack has E clear.
        assert_eq!(ram.bytes[usize::from(cpu.regs.s)] & 0x80, 0);
    }

    #[test]
    fn nmi_ignored_until_armed() {
        let (mut cpu, mut ram) = cpu_and_ram();
        ram.bytes[0x1000] = 0x12; // nop
        ram.bytes[0x1001] = 0x10; // lds #$7fff
        ram.bytes[0x1002] = 0xCE;
        ram.bytes[0x1003] = 0x7F;
        ram.bytes[0x1004] = 0xFF;
        ram.bytes[0xFFFC] = 0x30;
        ram.bytes[0xFFFD] = 0x00;
        ram.bytes[0x3000] = 0x12;

        cpu.nmi_trigger();
        cpu.step(&mut ram);
        // Not armed: the nop ran, the latch survives.
        assert_eq!(cpu.regs.pc, 0x1001);

        cpu.step(&mut ram); // lds arms NMI
        assert_eq!(cpu.regs.s, 0x7FFF);

        cpu.step(&mut ram); // latched NMI now services
        assert_eq!(cpu.regs.pc, 0x3001);
        assert!(cpu.regs.cc.f);
        assert!(cpu.regs.cc.i);
    }

    #[test]
    fn exception_is_terminal_until_reset() {
        let (mut cpu, mut ram) = cpu_and_ram();
        ram.bytes[0x1000] = 0x01; // illegal
        assert_eq!(cpu.step(&mut ram), RunState::Exception);
        let ex = cpu.exception().unwrap();
        assert_eq!(ex.kind, ExceptionKind::IllegalOpcode);
        assert_eq!(ex.pc, 0x1000);
        assert_eq!(cpu.step(&mut ram), RunState::Exception);

        cpu.reset(true);
        assert_eq!(cpu.step(&mut ram), RunState::Reset);
        assert!(cpu.exception().is_none());
    }

    #[test]
    fn observable_paths() {
        let (mut cpu, mut ram) = cpu_and_ram();
        cpu.regs.a = 0xAB;
        cpu.regs.cc.z = true;
        assert_eq!(cpu.query("a"), Some(Value::U8(0xAB)));
        assert_eq!(cpu.query("flags.z"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("pc"), Some(Value::U16(0x1000)));
        assert!(cpu.query("nonsense").is_none());

        // The cycle counter surfaces as a 64-bit value.
        ram.bytes[0x1000] = 0x12; // nop
        cpu.step(&mut ram);
        assert_eq!(cpu.query("total_cycles"), Some(Value::U64(2)));
    }
}
