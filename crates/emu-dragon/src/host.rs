//! Host abstraction.
//!
//! The machine consumes a narrow interface to the physical platform:
//! an indexed framebuffer, a microsecond clock, the keyboard scan-code
//! stream, joystick inputs, the reset button, the audio path, and the
//! cassette byte source. Real platform drivers live outside this
//! crate; [`HeadlessHost`] is the in-crate implementation used for
//! tests, capture, and the control server.

use std::collections::VecDeque;

/// Platform services consumed by the machine core.
pub trait Host {
    /// Negotiate a framebuffer resolution ahead of rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be provided; the machine
    /// treats this as fatal.
    fn fb_resolution(&mut self, width: u32, height: u32) -> Result<(), String>;

    /// Present a rendered frame. `framebuffer` holds one palette index
    /// per pixel, row-major.
    fn fb_present(&mut self, framebuffer: &[u8], width: u32, height: u32);

    /// Monotonic microsecond counter (wraps at 2^32).
    fn system_time_us(&mut self) -> u32;

    /// Next keyboard event: bits 0..6 scan code, bit 7 break. Zero
    /// when no event is pending.
    fn keyboard_read(&mut self) -> u8;

    /// Joystick comparator level.
    fn joystick_comparator(&mut self) -> bool;

    /// Right joystick fire button, true while pressed.
    fn right_joystick_button(&mut self) -> bool;

    /// Reset button level, true while pressed.
    fn reset_button(&mut self) -> bool;

    /// Drive the 2-bit audio multiplexer select.
    fn audio_mux_set(&mut self, select: u8);

    /// Drive the 6-bit DAC.
    fn write_dac(&mut self, value: u8);

    /// The ROM turned the cassette motor on: open the mounted file.
    /// Returns false when nothing is mounted.
    fn cassette_mount(&mut self) -> bool;

    /// Next byte of the mounted cassette stream, `None` at end of
    /// file. The stream stays open; the caller pads with filler.
    fn cassette_read_byte(&mut self) -> Option<u8>;
}

/// Host implementation with no physical platform behind it.
///
/// Time advances by a fixed step per query so the 50 Hz render and
/// field-sync gates open deterministically. Keyboard events are fed
/// from a queue; the framebuffer of the last presented frame is
/// retained for capture.
pub struct HeadlessHost {
    now_us: u32,
    /// Microseconds added per `system_time_us` query.
    time_step_us: u32,
    key_events: VecDeque<u8>,
    framebuffer: Vec<u8>,
    fb_width: u32,
    fb_height: u32,
    frames_presented: u64,
    comparator: bool,
    fire_button: bool,
    reset_pressed: bool,
    audio_mux: u8,
    dac_last: u8,
    cassette: Option<Vec<u8>>,
    cassette_pos: usize,
    cassette_open: bool,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_us: 0,
            time_step_us: 20,
            key_events: VecDeque::new(),
            framebuffer: Vec::new(),
            fb_width: 0,
            fb_height: 0,
            frames_presented: 0,
            comparator: false,
            fire_button: false,
            reset_pressed: false,
            audio_mux: 0,
            dac_last: 0,
            cassette: None,
            cassette_pos: 0,
            cassette_open: false,
        }
    }

    /// Change how far the clock advances per query.
    pub fn set_time_step(&mut self, step_us: u32) {
        self.time_step_us = step_us;
    }

    /// Queue a make/break scan-code event.
    pub fn push_key_event(&mut self, event: u8) {
        self.key_events.push_back(event);
    }

    /// Press and release helpers for plain scan codes.
    pub fn press_key(&mut self, scan_code: u8) {
        self.push_key_event(scan_code & 0x7F);
    }

    pub fn release_key(&mut self, scan_code: u8) {
        self.push_key_event(scan_code | 0x80);
    }

    /// Mount a cassette byte stream (replaces any previous one).
    pub fn mount_cassette(&mut self, data: Vec<u8>) {
        self.cassette = Some(data);
        self.cassette_pos = 0;
        self.cassette_open = false;
    }

    /// Hold or release the reset button.
    pub fn set_reset_button(&mut self, pressed: bool) {
        self.reset_pressed = pressed;
    }

    /// Drive the joystick comparator level.
    pub fn set_comparator(&mut self, level: bool) {
        self.comparator = level;
    }

    /// Press or release the right joystick button.
    pub fn set_fire_button(&mut self, pressed: bool) {
        self.fire_button = pressed;
    }

    /// Last presented frame, if any.
    #[must_use]
    pub fn framebuffer(&self) -> (&[u8], u32, u32) {
        (&self.framebuffer, self.fb_width, self.fb_height)
    }

    /// Number of frames presented so far.
    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Last value written to the DAC.
    #[must_use]
    pub fn dac_last(&self) -> u8 {
        self.dac_last
    }

    /// Current audio multiplexer select.
    #[must_use]
    pub fn audio_mux(&self) -> u8 {
        self.audio_mux
    }

    /// Whether the cassette was opened by a motor-on request.
    #[must_use]
    pub fn cassette_open(&self) -> bool {
        self.cassette_open
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for HeadlessHost {
    fn fb_resolution(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.fb_width = width;
        self.fb_height = height;
        self.framebuffer = vec![0; (width * height) as usize];
        Ok(())
    }

    fn fb_present(&mut self, framebuffer: &[u8], width: u32, height: u32) {
        self.fb_width = width;
        self.fb_height = height;
        self.framebuffer.clear();
        self.framebuffer.extend_from_slice(framebuffer);
        self.frames_presented += 1;
    }

    fn system_time_us(&mut self) -> u32 {
        self.now_us = self.now_us.wrapping_add(self.time_step_us);
        self.now_us
    }

    fn keyboard_read(&mut self) -> u8 {
        self.key_events.pop_front().unwrap_or(0)
    }

    fn joystick_comparator(&mut self) -> bool {
        self.comparator
    }

    fn right_joystick_button(&mut self) -> bool {
        self.fire_button
    }

    fn reset_button(&mut self) -> bool {
        self.reset_pressed
    }

    fn audio_mux_set(&mut self, select: u8) {
        self.audio_mux = select & 0x03;
    }

    fn write_dac(&mut self, value: u8) {
        self.dac_last = value & 0x3F;
    }

    fn cassette_mount(&mut self) -> bool {
        if self.cassette.is_some() {
            self.cassette_open = true;
            true
        } else {
            false
        }
    }

    fn cassette_read_byte(&mut self) -> Option<u8> {
        let data = self.cassette.as_ref()?;
        let byte = data.get(self.cassette_pos).copied()?;
        self.cassette_pos += 1;
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_per_query() {
        let mut host = HeadlessHost::new();
        host.set_time_step(100);
        let first = host.system_time_us();
        let second = host.system_time_us();
        assert_eq!(second - first, 100);
    }

    #[test]
    fn key_queue_drains_to_zero() {
        let mut host = HeadlessHost::new();
        host.press_key(16);
        host.release_key(16);
        assert_eq!(host.keyboard_read(), 16);
        assert_eq!(host.keyboard_read(), 16 | 0x80);
        assert_eq!(host.keyboard_read(), 0);
    }

    #[test]
    fn cassette_reads_then_eof() {
        let mut host = HeadlessHost::new();
        assert!(!host.cassette_mount());
        host.mount_cassette(vec![0xAA, 0xBB]);
        assert!(host.cassette_mount());
        assert_eq!(host.cassette_read_byte(), Some(0xAA));
        assert_eq!(host.cassette_read_byte(), Some(0xBB));
        assert_eq!(host.cassette_read_byte(), None);
    }
}
