//! Dragon 32 emulator.
//!
//! A cycle-counted emulation of the Dragon 32 home computer: MC6809E
//! CPU, MC6883 SAM, MC6847 VDG, and two MC6821 PIAs on a 64 KiB memory
//! fabric with per-address attributes and inline IO dispatch. The
//! machine boots the 16 KiB system ROM and drives a host-provided
//! framebuffer, keyboard, audio DAC, joystick comparator, and cassette
//! byte stream through the [`Host`] trait.
//!
//! Instruction-stepped: [`Dragon::tick`] executes one instruction and
//! the per-tick duties of the main loop (reset button, 50 Hz render,
//! field-sync IRQ). Timing is paced by the caller against the host's
//! microsecond clock.

mod bus;
pub mod capture;
mod cassette;
mod config;
mod dragon;
mod font;
mod host;
mod keyboard;
pub mod mcp;
mod memory;
pub mod palette;
mod pia0;
mod pia1;
mod sam;
mod semigraphics;
mod vdg;

pub use bus::DragonBus;
pub use cassette::CassetteStream;
pub use config::{DragonConfig, ROM_SIZE};
pub use dragon::Dragon;
pub use host::{HeadlessHost, Host};
pub use keyboard::Keyboard;
pub use memory::{CellKind, IoPort, MemOp, Memory};
pub use palette::{PALETTE_BGR, VDG_COLORS};
pub use pia0::Pia0;
pub use pia1::Pia1;
pub use sam::Sam;
pub use vdg::{Vdg, VideoMode};
