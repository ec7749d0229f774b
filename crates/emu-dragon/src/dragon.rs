//! Top-level Dragon 32 system.
//!
//! Wires the MC6809E to the bus and drives the per-tick duties of the
//! main loop: one CPU step, reset-button sampling (with the long-press
//! cold-start), the 50 Hz display render, and the field-sync IRQ. The
//! function-key escape is reported to the caller, which owns whatever
//! loader or menu lives outside the core.

use emu_core::{Bus, Observable, Value};
use motorola_6809::{Cpu6809, RunState};

use crate::bus::DragonBus;
use crate::config::{DragonConfig, ROM_SIZE};
use crate::host::Host;

/// System ROM base address.
const ROM_START: u16 = 0x8000;
/// Last system ROM address.
const ROM_END: u16 = 0xFEFF;

/// Cartridge window.
const CARTRIDGE_START: u16 = 0xC000;
const CARTRIDGE_END: u16 = 0xFEEF;

/// Holding reset this long forces a cold start.
const LONG_PRESS_US: u32 = 2_000_000;

/// The BASIC warm-start flag byte; zeroing it forces the ROM through
/// its cold-start path on the next reset.
const WARM_START_FLAG: u16 = 0x0071;

/// The Dragon 32.
pub struct Dragon<H: Host> {
    pub cpu: Cpu6809,
    pub bus: DragonBus<H>,
    reset_press_start: Option<u32>,
}

impl<H: Host> Dragon<H> {
    /// Build the machine: install the ROM image, seal it, attach the
    /// device map, and hold the CPU in reset for the first tick.
    ///
    /// # Errors
    ///
    /// Rejects a ROM image that is not exactly 16 KiB, and propagates
    /// host framebuffer failures.
    pub fn new(config: &DragonConfig, host: H) -> Result<Self, String> {
        if config.rom.len() != ROM_SIZE {
            return Err(format!(
                "system ROM must be exactly {ROM_SIZE} bytes, got {}",
                config.rom.len()
            ));
        }

        let mut bus = DragonBus::new(host);
        bus.mem.load(ROM_START, &config.rom)?;
        bus.mem.define_rom(ROM_START..=ROM_END);
        bus.vdg.init_display(&mut bus.host)?;

        let mut cpu = Cpu6809::new();
        cpu.init(ROM_START);
        cpu.reset(true);

        Ok(Self {
            cpu,
            bus,
            reset_press_start: None,
        })
    }

    /// Install a cartridge image in the 0xC000..0xFEEF window.
    ///
    /// # Errors
    ///
    /// Rejects an image larger than the window.
    pub fn load_cartridge(&mut self, data: &[u8]) -> Result<(), String> {
        let window = usize::from(CARTRIDGE_END - CARTRIDGE_START) + 1;
        if data.len() > window {
            return Err(format!(
                "cartridge image of {} bytes exceeds the {window}-byte window",
                data.len()
            ));
        }
        self.bus.mem.load(CARTRIDGE_START, data)
    }

    /// One main-loop tick: step the CPU, sample the reset button,
    /// render, and run the field-sync generator.
    ///
    /// # Errors
    ///
    /// Fatal render failures (unsupported video mode, framebuffer
    /// loss) propagate; the caller decides whether to halt.
    pub fn tick(&mut self) -> Result<RunState, String> {
        let state = self.cpu.step(&mut self.bus);

        self.sample_reset_button();
        self.bus.render()?;
        self.bus.vsync_irq();
        self.cpu.irq(self.bus.irq_line());

        Ok(state)
    }

    /// Run `count` ticks, stopping early on a fatal render error.
    ///
    /// # Errors
    ///
    /// See [`Dragon::tick`].
    pub fn run(&mut self, count: u32) -> Result<RunState, String> {
        let mut state = self.cpu.run_state();
        for _ in 0..count {
            state = self.tick()?;
        }
        Ok(state)
    }

    /// Latched function-key value (1..10), cleared by the query. The
    /// caller uses 1 as the loader escape.
    pub fn function_key(&mut self) -> u8 {
        self.bus.pia0.function_key()
    }

    /// Reset-button handling: a press asserts reset; holding it past
    /// the long-press window also scribbles the warm-start flag so
    /// the ROM cold-starts.
    fn sample_reset_button(&mut self) {
        if self.bus.host.reset_button() {
            let now = self.bus.host.system_time_us();
            let start = *self.reset_press_start.get_or_insert(now);
            if now.wrapping_sub(start) >= LONG_PRESS_US {
                self.bus.write(WARM_START_FLAG, 0);
            }
            self.cpu.reset(true);
        } else {
            self.reset_press_start = None;
            self.cpu.reset(false);
        }
    }
}

impl<H: Host> Observable for Dragon<H> {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            return self.cpu.query(rest);
        }
        if let Some(rest) = path.strip_prefix("memory.") {
            let addr = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X"))
            {
                u16::from_str_radix(hex, 16).ok()
            } else {
                rest.parse().ok()
            };
            return addr.map(|a| Value::U8(self.bus.mem.peek(a)));
        }
        match path {
            "vdg.mode" => Some(format!("{:?}", self.bus.vdg.mode()).into()),
            "vdg.base" => Some(self.bus.vdg.video_base().into()),
            "irq_line" => Some(self.bus.irq_line().into()),
            _ => self.cpu.query(path),
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<register>",
            "memory.<address>",
            "vdg.mode",
            "vdg.base",
            "irq_line",
        ]
    }
}
