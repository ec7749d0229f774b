//! Framebuffer palette and VDG color mapping.
//!
//! The host surface is 8-bit indexed with a fixed 16-entry BGR
//! palette. The VDG itself only produces eight colors; `VDG_COLORS`
//! maps its 3-bit color field onto the host palette, and the CSS bit
//! switches between the two four-entry halves in graphics modes.

/// Host palette indices.
pub const BLACK: u8 = 0;
pub const BLUE: u8 = 1;
pub const GREEN: u8 = 2;
pub const CYAN: u8 = 3;
pub const RED: u8 = 4;
pub const MAGENTA: u8 = 5;
pub const BROWN: u8 = 6;
pub const GRAY: u8 = 7;
pub const DARK_GRAY: u8 = 8;
pub const LIGHT_BLUE: u8 = 9;
pub const LIGHT_GREEN: u8 = 10;
pub const LIGHT_CYAN: u8 = 11;
pub const LIGHT_RED: u8 = 12;
pub const LIGHT_MAGENTA: u8 = 13;
pub const YELLOW: u8 = 14;
pub const WHITE: u8 = 15;

/// Fixed 16-entry BGR palette backing the indexed framebuffer.
pub const PALETTE_BGR: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00], // 0: Black
    [0xAA, 0x00, 0x00], // 1: Blue
    [0x00, 0xAA, 0x00], // 2: Green
    [0xAA, 0xAA, 0x00], // 3: Cyan
    [0x00, 0x00, 0xAA], // 4: Red
    [0xAA, 0x00, 0xAA], // 5: Magenta
    [0x00, 0x55, 0xAA], // 6: Brown
    [0xAA, 0xAA, 0xAA], // 7: Gray
    [0x55, 0x55, 0x55], // 8: Dark gray
    [0xFF, 0x55, 0x55], // 9: Light blue
    [0x55, 0xFF, 0x55], // 10: Light green
    [0xFF, 0xFF, 0x55], // 11: Light cyan
    [0x55, 0x55, 0xFF], // 12: Light red
    [0xFF, 0x55, 0xFF], // 13: Light magenta
    [0x55, 0xFF, 0xFF], // 14: Yellow
    [0xFF, 0xFF, 0xFF], // 15: White
];

/// VDG 3-bit color field → host palette index. Green set first, buff
/// set second; the CSS bit offsets by four in graphics modes.
pub const VDG_COLORS: [u8; 8] = [
    LIGHT_GREEN,
    YELLOW,
    LIGHT_BLUE,
    LIGHT_RED,
    WHITE, // stands in for buff
    CYAN,
    LIGHT_MAGENTA,
    BROWN,
];

/// Palette offset applied when CSS selects the second color set.
pub const CSS_OFFSET: usize = 4;
