//! MC6847 Video Display Generator (VDG).
//!
//! The active display mode is composed from the SAM's 3-bit mode field
//! and the five PIA1 port B mode bits (G/^A, GM2..GM0, CSS). The
//! renderer owns an 8-bit indexed framebuffer, reads video RAM through
//! the fabric's side-effect-free path, and presents the finished frame
//! to the host at a 50 Hz cadence gated by the host clock.
//!
//! # Mode composition
//!
//! | SAM | ^G | GM[2:0] | ^INT | mode            |
//! |-----|----|---------|------|-----------------|
//! | 0   | 0  | —       | 0    | ALPHA_INTERNAL  |
//! | 0   | 0  | —       | 1    | ALPHA_EXTERNAL  |
//! | 2   | 0  | —       | 0    | SEMI_GRAPHICS_8 |
//! | 4   | 0  | —       | 0    | SEMI_GRAPHICS_12|
//! | 6   | 0  | —       | 0    | SEMI_GRAPHICS_24|
//! | —   | 1  | 000..111| —    | GRAPHICS_1C..6R |
//! | 7   | —  | —       | —    | DMA             |
//!
//! A combination matching no row leaves the current mode in place; the
//! ROM briefly produces such states while it walks the SAM pair-set
//! addresses.

use crate::font::{FONT, FONT_HEIGHT, FONT_WIDTH};
use crate::host::Host;
use crate::memory::Memory;
use crate::palette::{BLACK, CSS_OFFSET, VDG_COLORS};
use crate::semigraphics::{SEMIGRAPHICS_4, SEMIGRAPHICS_6};

/// Render cadence in microseconds (50 Hz).
const REFRESH_INTERVAL_US: u32 = 1_000_000 / 50;

/// Character-cell screen geometry.
const SCREEN_WIDTH_CHARS: usize = 32;
const SCREEN_HEIGHT_CHARS: usize = 16;

/// Character-cell flag bits.
const CHAR_SEMI_GRAPHICS: u8 = 0x80;
const CHAR_INVERSE: u8 = 0x40;

/// PIA mode bits (already shifted down by three).
const PIA_GRAPHICS: u8 = 0x10;
const PIA_GM_MASK: u8 = 0x0E;
const PIA_ALPHA_EXT: u8 = 0x02;
const PIA_COLOR_SET: u8 = 0x01;

/// Composite display modes of the VDG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoMode {
    /// 2-color 32×16 text; cell bit 7 selects semigraphics-4.
    AlphaInternal,
    /// External character generator (not fitted; fatal).
    AlphaExternal,
    /// Semigraphics-4 (rendered within `AlphaInternal`).
    SemiGraphics4,
    /// Semigraphics-6 cells (the external-alpha counterpart).
    SemiGraphics6,
    SemiGraphics8,
    SemiGraphics12,
    SemiGraphics24,
    /// 64×64, 4-color.
    Graphics1C,
    /// 128×64, 2-color.
    Graphics1R,
    /// 128×64, 4-color.
    Graphics2C,
    /// 128×96, 2-color.
    Graphics2R,
    /// 128×96, 4-color.
    Graphics3C,
    /// 128×192, 2-color, doubled to 256 wide.
    Graphics3R,
    /// 128×192, 4-color, doubled to 256 wide.
    Graphics6C,
    /// 256×192, 2-color.
    Graphics6R,
    /// Direct memory access video (not supported; fatal).
    Dma,
}

impl VideoMode {
    /// Framebuffer resolution and video-RAM footprint of the mode.
    #[must_use]
    pub fn resolution(self) -> (u32, u32, usize) {
        match self {
            VideoMode::AlphaInternal
            | VideoMode::AlphaExternal
            | VideoMode::SemiGraphics4
            | VideoMode::SemiGraphics6 => (256, 192, 512),
            VideoMode::SemiGraphics8 => (64, 64, 2048),
            VideoMode::SemiGraphics12 => (64, 96, 3072),
            VideoMode::SemiGraphics24 => (64, 192, 6144),
            VideoMode::Graphics1C => (64, 64, 1024),
            VideoMode::Graphics1R => (128, 64, 1024),
            VideoMode::Graphics2C => (128, 64, 2048),
            VideoMode::Graphics2R => (128, 96, 1536),
            VideoMode::Graphics3C => (128, 96, 3072),
            VideoMode::Graphics3R => (256, 192, 3072),
            VideoMode::Graphics6C | VideoMode::Graphics6R => (256, 192, 6144),
            VideoMode::Dma => (256, 192, 6144),
        }
    }
}

/// VDG device state and renderer.
pub struct Vdg {
    sam_mode: u8,
    pia_mode: u8,
    video_offset: u8,
    mode: VideoMode,
    framebuffer: Vec<u8>,
    width: u32,
    height: u32,
    last_refresh_us: u32,
}

impl Vdg {
    /// Power-on state: alphanumeric mode on the 0x0400 text page.
    #[must_use]
    pub fn new() -> Self {
        let (width, height, _) = VideoMode::AlphaInternal.resolution();
        Self {
            sam_mode: 0,
            pia_mode: 0,
            video_offset: 0x02,
            mode: VideoMode::AlphaInternal,
            framebuffer: vec![0; (width * height) as usize],
            width,
            height,
            last_refresh_us: 0,
        }
    }

    /// Negotiate the initial host surface.
    ///
    /// # Errors
    ///
    /// Propagates the host's framebuffer failure.
    pub fn init_display(&mut self, host: &mut dyn Host) -> Result<(), String> {
        host.fb_resolution(self.width, self.height)
    }

    /// SAM pushed a new 3-bit mode.
    pub fn set_sam_mode(&mut self, mode: u8) {
        self.sam_mode = mode & 0x07;
    }

    /// PIA1 pushed new mode bits (G/^A, GM2..GM0, CSS).
    pub fn set_pia_mode(&mut self, mode: u8) {
        self.pia_mode = mode & 0x1F;
    }

    /// SAM pushed a new 7-bit display offset.
    pub fn set_video_offset(&mut self, offset: u8) {
        self.video_offset = offset & 0x7F;
    }

    /// Video RAM base address (offset << 9).
    #[must_use]
    pub fn video_base(&self) -> u16 {
        u16::from(self.video_offset) << 9
    }

    /// Currently active mode.
    #[must_use]
    pub fn mode(&self) -> VideoMode {
        self.mode
    }

    /// Last rendered frame.
    #[must_use]
    pub fn framebuffer(&self) -> (&[u8], u32, u32) {
        (&self.framebuffer, self.width, self.height)
    }

    /// Compose the mode selected by the current SAM and PIA bits, or
    /// `None` when the combination matches no table row.
    fn compose(&self) -> Option<VideoMode> {
        if self.sam_mode == 7 {
            return Some(VideoMode::Dma);
        }

        if self.pia_mode & PIA_GRAPHICS != 0 {
            return Some(match self.pia_mode & PIA_GM_MASK {
                0x00 => VideoMode::Graphics1C,
                0x02 => VideoMode::Graphics1R,
                0x04 => VideoMode::Graphics2C,
                0x06 => VideoMode::Graphics2R,
                0x08 => VideoMode::Graphics3C,
                0x0A => VideoMode::Graphics3R,
                0x0C => VideoMode::Graphics6C,
                _ => VideoMode::Graphics6R,
            });
        }

        let external = self.pia_mode & PIA_ALPHA_EXT != 0;
        match (self.sam_mode, external) {
            (0, false) => Some(VideoMode::AlphaInternal),
            (0, true) => Some(VideoMode::AlphaExternal),
            (2, false) => Some(VideoMode::SemiGraphics8),
            (4, false) => Some(VideoMode::SemiGraphics12),
            (6, false) => Some(VideoMode::SemiGraphics24),
            _ => None,
        }
    }

    /// The mode that the next render will use: the composed mode, or
    /// the current one while the register state is mid-transition.
    #[must_use]
    pub fn composed_mode(&self) -> VideoMode {
        self.compose().unwrap_or(self.mode)
    }

    /// Render if the 50 Hz interval has elapsed.
    ///
    /// # Errors
    ///
    /// Fatal on unsupported modes and host framebuffer failures.
    pub fn render(&mut self, memory: &Memory, host: &mut dyn Host) -> Result<(), String> {
        let now = host.system_time_us();
        if now.wrapping_sub(self.last_refresh_us) < REFRESH_INTERVAL_US {
            return Ok(());
        }
        self.last_refresh_us = now;
        self.render_frame(memory, host)
    }

    /// Render one frame immediately.
    ///
    /// # Errors
    ///
    /// Fatal on unsupported modes and host framebuffer failures.
    pub fn render_frame(&mut self, memory: &Memory, host: &mut dyn Host) -> Result<(), String> {
        let mode = self.composed_mode();
        if mode != self.mode {
            let (width, height, _) = mode.resolution();
            host.fb_resolution(width, height)?;
            self.width = width;
            self.height = height;
            self.framebuffer = vec![0; (width * height) as usize];
            self.mode = mode;
        }

        let base = self.video_base();

        match mode {
            VideoMode::AlphaInternal | VideoMode::SemiGraphics4 => {
                for row in 0..SCREEN_HEIGHT_CHARS {
                    for col in 0..SCREEN_WIDTH_CHARS {
                        let addr = base.wrapping_add((col + row * SCREEN_WIDTH_CHARS) as u16);
                        let code = memory.peek(addr);
                        self.draw_alpha_cell(code, col, row);
                    }
                }
            }

            VideoMode::SemiGraphics6 => {
                for row in 0..SCREEN_HEIGHT_CHARS {
                    for col in 0..SCREEN_WIDTH_CHARS {
                        let addr = base.wrapping_add((col + row * SCREEN_WIDTH_CHARS) as u16);
                        let code = memory.peek(addr);
                        self.draw_semi6_cell(code, col, row);
                    }
                }
            }

            VideoMode::Graphics1C
            | VideoMode::Graphics2C
            | VideoMode::Graphics3C
            | VideoMode::Graphics6C => {
                let (_, _, byte_count) = mode.resolution();
                let double = mode == VideoMode::Graphics6C;
                let css = usize::from(self.pia_mode & PIA_COLOR_SET) * CSS_OFFSET;
                let mut offset = 0;
                for index in 0..byte_count {
                    let data = memory.peek(base.wrapping_add(index as u16));
                    for element in 0..4 {
                        let bits = usize::from((data >> (2 * (3 - element))) & 0x03);
                        let color = VDG_COLORS[bits + css];
                        self.framebuffer[offset] = color;
                        offset += 1;
                        if double {
                            self.framebuffer[offset] = color;
                            offset += 1;
                        }
                    }
                }
            }

            VideoMode::Graphics1R
            | VideoMode::Graphics2R
            | VideoMode::Graphics3R
            | VideoMode::Graphics6R => {
                let (_, _, byte_count) = mode.resolution();
                let double = mode == VideoMode::Graphics3R;
                let css = self.pia_mode & PIA_COLOR_SET != 0;
                let lit = if css {
                    VDG_COLORS[CSS_OFFSET]
                } else {
                    VDG_COLORS[0]
                };
                let mut offset = 0;
                for index in 0..byte_count {
                    let data = memory.peek(base.wrapping_add(index as u16));
                    for element in 0..8 {
                        let color = if (data >> (7 - element)) & 0x01 != 0 {
                            lit
                        } else {
                            BLACK
                        };
                        self.framebuffer[offset] = color;
                        offset += 1;
                        if double {
                            self.framebuffer[offset] = color;
                            offset += 1;
                        }
                    }
                }
            }

            VideoMode::AlphaExternal
            | VideoMode::SemiGraphics8
            | VideoMode::SemiGraphics12
            | VideoMode::SemiGraphics24
            | VideoMode::Dma => {
                return Err(format!("unsupported video mode {mode:?}"));
            }
        }

        host.fb_present(&self.framebuffer, self.width, self.height);
        Ok(())
    }

    /// Draw one text-page cell: semigraphics-4 when bit 7 is set,
    /// otherwise a font glyph with optional inverse video.
    fn draw_alpha_cell(&mut self, code: u8, col: usize, row: usize) {
        if code & CHAR_SEMI_GRAPHICS != 0 {
            let fg = VDG_COLORS[usize::from((code & 0x70) >> 4)];
            let cell = SEMIGRAPHICS_4[usize::from(code & 0x0F)];
            self.draw_cell_bitmap(&cell, col, row, fg, BLACK);
            return;
        }

        let mut fg = if self.pia_mode & PIA_COLOR_SET != 0 {
            VDG_COLORS[CSS_OFFSET]
        } else {
            VDG_COLORS[0]
        };
        let mut bg = BLACK;
        if code & CHAR_INVERSE != 0 {
            std::mem::swap(&mut fg, &mut bg);
        }

        let cell = FONT[usize::from(code & 0x3F)];
        self.draw_cell_bitmap(&cell, col, row, fg, bg);
    }

    /// Draw one semigraphics-6 cell: 2-bit color field in bits 6..7
    /// plus the CSS offset, 6-bit pattern.
    fn draw_semi6_cell(&mut self, code: u8, col: usize, row: usize) {
        let css = usize::from(self.pia_mode & PIA_COLOR_SET) * CSS_OFFSET;
        let fg = VDG_COLORS[usize::from((code & 0xC0) >> 6) + css];
        let cell = SEMIGRAPHICS_6[usize::from(code & 0x1F)];
        self.draw_cell_bitmap(&cell, col, row, fg, BLACK);
    }

    fn draw_cell_bitmap(
        &mut self,
        cell: &[u8; FONT_HEIGHT],
        col: usize,
        row: usize,
        fg: u8,
        bg: u8,
    ) {
        let px = col * FONT_WIDTH;
        let py = row * FONT_HEIGHT;
        for (cell_row, pattern) in cell.iter().enumerate() {
            for cell_col in 0..FONT_WIDTH {
                let lit = pattern & (0x80 >> cell_col) != 0;
                self.put_pixel(px + cell_col, py + cell_row, if lit { fg } else { bg });
            }
        }
    }

    fn put_pixel(&mut self, x: usize, y: usize, color: u8) {
        self.framebuffer[x + y * self.width as usize] = color;
    }
}

impl Default for Vdg {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    use crate::palette;

    #[test]
    fn composition_table() {
        let mut vdg = Vdg::new();

        // Text family.
        vdg.set_sam_mode(0);
        vdg.set_pia_mode(0x00);
        assert_eq!(vdg.composed_mode(), VideoMode::AlphaInternal);
        vdg.set_pia_mode(0x02);
        assert_eq!(vdg.composed_mode(), VideoMode::AlphaExternal);
        vdg.set_pia_mode(0x00);
        vdg.set_sam_mode(2);
        assert_eq!(vdg.composed_mode(), VideoMode::SemiGraphics8);
        vdg.set_sam_mode(4);
        assert_eq!(vdg.composed_mode(), VideoMode::SemiGraphics12);
        vdg.set_sam_mode(6);
        assert_eq!(vdg.composed_mode(), VideoMode::SemiGraphics24);

        // Graphics family: GM bits select the mode regardless of SAM.
        let expectations = [
            (0x10, VideoMode::Graphics1C),
            (0x12, VideoMode::Graphics1R),
            (0x14, VideoMode::Graphics2C),
            (0x16, VideoMode::Graphics2R),
            (0x18, VideoMode::Graphics3C),
            (0x1A, VideoMode::Graphics3R),
            (0x1C, VideoMode::Graphics6C),
            (0x1E, VideoMode::Graphics6R),
        ];
        vdg.set_sam_mode(1);
        for (pia, expected) in expectations {
            vdg.set_pia_mode(pia);
            assert_eq!(vdg.composed_mode(), expected, "pia mode {pia:#04x}");
        }

        // DMA wins over everything.
        vdg.set_sam_mode(7);
        assert_eq!(vdg.composed_mode(), VideoMode::Dma);
    }

    #[test]
    fn unmatched_composition_keeps_current_mode() {
        let mut vdg = Vdg::new();
        vdg.set_sam_mode(1); // text path with SAM mid-transition
        vdg.set_pia_mode(0x00);
        assert_eq!(vdg.composed_mode(), VideoMode::AlphaInternal);
    }

    #[test]
    fn renders_text_page_glyph() {
        let mut vdg = Vdg::new();
        let mut memory = Memory::new();
        let mut host = HeadlessHost::new();

        // 'A' (code 1) in the top-left cell of the 0x0400 text page.
        memory.poke(0x0400, 0x01);
        vdg.render_frame(&memory, &mut host).unwrap();

        let (fb, width, _) = vdg.framebuffer();
        // Glyph row 2 of 'A' is 0b01110 in bits 7..3: pixel (1, 2) lit.
        assert_eq!(fb[1 + 2 * width as usize], palette::LIGHT_GREEN);
        assert_eq!(fb[0], palette::BLACK);
    }

    #[test]
    fn inverse_video_swaps_colors() {
        let mut vdg = Vdg::new();
        let mut memory = Memory::new();
        let mut host = HeadlessHost::new();

        memory.poke(0x0400, 0x20 | CHAR_INVERSE); // inverse space
        vdg.render_frame(&memory, &mut host).unwrap();

        let (fb, _, _) = vdg.framebuffer();
        assert_eq!(fb[0], palette::LIGHT_GREEN, "background lit in inverse");
    }

    #[test]
    fn semigraphics4_cell_colors() {
        let mut vdg = Vdg::new();
        let mut memory = Memory::new();
        let mut host = HeadlessHost::new();

        // Pattern 0xF (all blocks), color field 3 (light red).
        memory.poke(0x0400, 0x80 | 0x30 | 0x0F);
        vdg.render_frame(&memory, &mut host).unwrap();

        let (fb, _, _) = vdg.framebuffer();
        assert_eq!(fb[0], palette::LIGHT_RED);
    }

    #[test]
    fn semigraphics6_cell_draws() {
        let mut vdg = Vdg::new();
        vdg.mode = VideoMode::SemiGraphics6;
        vdg.set_sam_mode(1); // no table row matches, current mode sticks
        let mut memory = Memory::new();
        let mut host = HeadlessHost::new();

        // Color field 1, all six blocks lit.
        memory.poke(0x0400, 0x40 | 0x3F);
        vdg.render_frame(&memory, &mut host).unwrap();

        let (fb, _, _) = vdg.framebuffer();
        assert_eq!(fb[0], palette::YELLOW);
    }

    #[test]
    fn graphics_mode_resizes_and_draws() {
        let mut vdg = Vdg::new();
        let mut memory = Memory::new();
        let mut host = HeadlessHost::new();

        vdg.set_pia_mode(0x1E); // GRAPHICS_6R
        memory.poke(vdg.video_base(), 0x80); // leftmost pixel lit
        vdg.render_frame(&memory, &mut host).unwrap();

        let (fb, width, height) = vdg.framebuffer();
        assert_eq!((width, height), (256, 192));
        assert_eq!(fb[0], palette::LIGHT_GREEN);
        assert_eq!(fb[1], palette::BLACK);
    }

    #[test]
    fn css_selects_second_palette() {
        let mut vdg = Vdg::new();
        let mut memory = Memory::new();
        let mut host = HeadlessHost::new();

        vdg.set_pia_mode(0x1E | 0x01); // GRAPHICS_6R with CSS
        memory.poke(vdg.video_base(), 0x80);
        vdg.render_frame(&memory, &mut host).unwrap();

        let (fb, _, _) = vdg.framebuffer();
        assert_eq!(fb[0], palette::WHITE);
    }

    #[test]
    fn color_graphics_doubling() {
        let mut vdg = Vdg::new();
        let mut memory = Memory::new();
        let mut host = HeadlessHost::new();

        vdg.set_pia_mode(0x1C); // GRAPHICS_6C, doubled horizontally
        memory.poke(vdg.video_base(), 0b0111_0000);
        vdg.render_frame(&memory, &mut host).unwrap();

        let (fb, _, _) = vdg.framebuffer();
        assert_eq!(fb[0], palette::YELLOW, "first 2-bit pixel = 01");
        assert_eq!(fb[1], palette::YELLOW, "doubled");
        assert_eq!(fb[2], palette::LIGHT_RED, "second 2-bit pixel = 11");
        assert_eq!(fb[3], palette::LIGHT_RED);
    }

    #[test]
    fn resolution_graphics_doubling() {
        let mut vdg = Vdg::new();
        let mut memory = Memory::new();
        let mut host = HeadlessHost::new();

        // GRAPHICS_3R: 3072 bytes of 128×192 content doubled to 256
        // wide — the byte count and doubling must fill the buffer
        // exactly.
        vdg.set_pia_mode(0x1A);
        memory.poke(vdg.video_base(), 0x80);
        vdg.render_frame(&memory, &mut host).unwrap();

        let (fb, width, height) = vdg.framebuffer();
        assert_eq!((width, height), (256, 192));
        assert_eq!(fb.len(), 256 * 192);
        assert_eq!(fb[0], palette::LIGHT_GREEN);
        assert_eq!(fb[1], palette::LIGHT_GREEN, "doubled");
        assert_eq!(fb[2], palette::BLACK);
    }

    #[test]
    fn unsupported_modes_are_fatal() {
        let mut vdg = Vdg::new();
        let memory = Memory::new();
        let mut host = HeadlessHost::new();

        vdg.set_sam_mode(7); // DMA
        assert!(vdg.render_frame(&memory, &mut host).is_err());

        let mut vdg = Vdg::new();
        vdg.set_pia_mode(0x02); // ALPHA_EXTERNAL
        assert!(vdg.render_frame(&memory, &mut host).is_err());
    }

    #[test]
    fn render_is_gated_by_host_clock() {
        let mut vdg = Vdg::new();
        let memory = Memory::new();
        let mut host = HeadlessHost::new();
        host.set_time_step(1000);

        for _ in 0..10 {
            vdg.render(&memory, &mut host).unwrap();
        }
        assert!(host.frames_presented() < 10, "gate must skip most calls");
    }
}
