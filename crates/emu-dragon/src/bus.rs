//! Machine bus: the memory fabric plus inline device dispatch.
//!
//! The CPU sees a flat 64 KiB address space through `emu_core::Bus`.
//! Every access consults the cell attribute: ROM discards writes, IO
//! cells run their device handler inline with the access — reads store
//! the handler's return value back into the cell, writes store first
//! and dispatch after, matching the fabric contract. Device handlers
//! may re-enter the bus for other addresses (the SAM vector redirect
//! does); none recurses into its own range.

use emu_core::Bus;

use crate::host::Host;
use crate::memory::{CellKind, IoPort, MemOp, Memory};
use crate::pia0::Pia0;
use crate::pia1::Pia1;
use crate::sam::Sam;
use crate::vdg::Vdg;

/// PIA0 register addresses.
pub const PIA0_PA: u16 = 0xFF00;
pub const PIA0_CRA: u16 = 0xFF01;
pub const PIA0_PB: u16 = 0xFF02;
pub const PIA0_CRB: u16 = 0xFF03;

/// PIA1 register addresses.
pub const PIA1_PA: u16 = 0xFF20;
pub const PIA1_CRA: u16 = 0xFF21;
pub const PIA1_PB: u16 = 0xFF22;
pub const PIA1_CRB: u16 = 0xFF23;

/// SAM control block.
pub const SAM_CONTROL_START: u16 = 0xFFC0;
pub const SAM_CONTROL_END: u16 = 0xFFDF;

/// Vector page redirected by the SAM.
pub const VECTOR_REDIRECT_START: u16 = 0xFFF2;
pub const VECTOR_REDIRECT_END: u16 = 0xFFFF;

/// The Dragon bus: fabric, devices, and host.
pub struct DragonBus<H: Host> {
    pub mem: Memory,
    pub sam: Sam,
    pub vdg: Vdg,
    pub pia0: Pia0,
    pub pia1: Pia1,
    pub host: H,
    /// Two-bit audio multiplexer select shared by both PIAs.
    audio_mux: u8,
    /// Level of the IRQ line into the CPU, owned here because the
    /// PIA handlers run inside bus dispatch.
    irq_line: bool,
}

impl<H: Host> DragonBus<H> {
    /// Build the bus with the full Dragon IO map attached.
    pub fn new(host: H) -> Self {
        let mut mem = Memory::new();

        // The PIA0 data register idles with all rows high before the
        // IO attribute takes over the cell.
        mem.poke(PIA0_PA, 0x7F);

        mem.define_io(PIA0_PA..=PIA0_PA, IoPort::Pia0Pa);
        mem.define_io(PIA0_CRA..=PIA0_CRA, IoPort::Pia0Cra);
        mem.define_io(PIA0_PB..=PIA0_PB, IoPort::Pia0Pb);
        mem.define_io(PIA0_CRB..=PIA0_CRB, IoPort::Pia0Crb);

        mem.define_io(PIA1_PA..=PIA1_PA, IoPort::Pia1Pa);
        mem.define_io(PIA1_CRA..=PIA1_CRA, IoPort::Pia1Cra);
        mem.define_io(PIA1_PB..=PIA1_PB, IoPort::Pia1Pb);
        mem.define_io(PIA1_CRB..=PIA1_CRB, IoPort::Pia1Crb);

        mem.define_io(SAM_CONTROL_START..=SAM_CONTROL_END, IoPort::SamControl);
        mem.define_io(
            VECTOR_REDIRECT_START..=VECTOR_REDIRECT_END,
            IoPort::VectorRedirect,
        );

        Self {
            mem,
            sam: Sam::new(),
            vdg: Vdg::new(),
            pia0: Pia0::new(),
            pia1: Pia1::new(),
            host,
            audio_mux: 0,
            irq_line: false,
        }
    }

    /// Current level of the IRQ line.
    #[must_use]
    pub fn irq_line(&self) -> bool {
        self.irq_line
    }

    /// Field-sync tick: assert the IRQ line at the 50 Hz cadence when
    /// PIA0 has the interrupt enabled.
    pub fn vsync_irq(&mut self) {
        let now = self.host.system_time_us();
        if self.pia0.vsync_tick(now) {
            self.irq_line = true;
        }
    }

    /// Render the display if the refresh interval has elapsed.
    ///
    /// # Errors
    ///
    /// Fatal on unsupported video modes and framebuffer failures.
    pub fn render(&mut self) -> Result<(), String> {
        self.vdg.render(&self.mem, &mut self.host)
    }

    fn set_audio_mux_bit(&mut self, bit: u8, set: bool) {
        if set {
            self.audio_mux |= 1 << bit;
        } else {
            self.audio_mux &= !(1 << bit);
        }
        self.host.audio_mux_set(self.audio_mux);
    }

    /// Run the device behind `port` for an access to `addr`. `data`
    /// is the cell's byte on a read and the value written on a write;
    /// the return value is what the access yields.
    fn io_access(&mut self, port: IoPort, addr: u16, data: u8, op: MemOp) -> u8 {
        match port {
            IoPort::SamControl => {
                if op == MemOp::Write {
                    self.sam.control_write(addr);
                    self.vdg.set_sam_mode(self.sam.vdg_mode());
                    self.vdg.set_video_offset(self.sam.display_offset());
                }
                0
            }

            IoPort::VectorRedirect => match op {
                MemOp::Read => self.read(Sam::vector_redirect(addr)),
                MemOp::Write => data,
            },

            IoPort::Pia0Pa => match op {
                MemOp::Read => self.pia0.pa_read(data, &mut self.host),
                MemOp::Write => data,
            },

            IoPort::Pia0Pb => match op {
                MemOp::Write => {
                    let row_bits = self.pia0.pb_write(data, &mut self.host);
                    self.mem.poke(PIA0_PA, row_bits);
                    data
                }
                MemOp::Read => {
                    if self.pia0.pb_read() {
                        self.irq_line = false;
                    }
                    data
                }
            },

            IoPort::Pia0Cra => match op {
                MemOp::Write => {
                    let mux_low = self.pia0.cra_write(data);
                    self.set_audio_mux_bit(0, mux_low);
                    data
                }
                MemOp::Read => self.pia0.cra(),
            },

            IoPort::Pia0Crb => match op {
                MemOp::Write => {
                    self.pia0.crb_write(data);
                    data
                }
                MemOp::Read => self.pia0.crb(),
            },

            IoPort::Pia1Pa => match op {
                MemOp::Write => {
                    self.pia1.pa_write(data, &mut self.host);
                    data
                }
                MemOp::Read => self.pia1.pa_read(data, &mut self.host),
            },

            // The VDG mode bits track the port value on both
            // directions of access.
            IoPort::Pia1Pb => {
                self.vdg.set_pia_mode(Pia1::pb_mode_bits(data));
                data
            }

            IoPort::Pia1Cra => match op {
                MemOp::Write => {
                    self.pia1.cra_write(data, &mut self.host);
                    data
                }
                MemOp::Read => self.pia1.cra(),
            },

            IoPort::Pia1Crb => match op {
                MemOp::Write => {
                    let mux_high = self.pia1.crb_write(data);
                    self.set_audio_mux_bit(1, mux_high);
                    data
                }
                MemOp::Read => self.pia1.crb(),
            },
        }
    }
}

impl<H: Host> Bus for DragonBus<H> {
    fn read(&mut self, address: u16) -> u8 {
        match self.mem.kind(address) {
            CellKind::Ram | CellKind::Rom => self.mem.peek(address),
            CellKind::Io(port) => {
                let stored = self.mem.peek(address);
                let value = self.io_access(port, address, stored, MemOp::Read);
                self.mem.poke(address, value);
                value
            }
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        match self.mem.kind(address) {
            CellKind::Rom => {
                self.mem.store(address, value);
            }
            CellKind::Ram => {
                self.mem.poke(address, value);
            }
            CellKind::Io(port) => {
                self.mem.poke(address, value);
                self.io_access(port, address, value, MemOp::Write);
            }
        }
    }
}
