//! Headless capture: PNG screenshots of the indexed framebuffer.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::palette::PALETTE_BGR;

/// Expand an indexed framebuffer to RGBA bytes through the fixed
/// palette.
#[must_use]
pub fn indexed_to_rgba(framebuffer: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(framebuffer.len() * 4);
    for &index in framebuffer {
        let [b, g, r] = PALETTE_BGR[usize::from(index & 0x0F)];
        rgba.push(r);
        rgba.push(g);
        rgba.push(b);
        rgba.push(0xFF);
    }
    rgba
}

/// Save a framebuffer as a PNG file.
///
/// # Errors
///
/// File and encoder errors propagate.
pub fn save_screenshot(
    framebuffer: &[u8],
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&indexed_to_rgba(framebuffer))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;

    #[test]
    fn expansion_follows_palette() {
        let rgba = indexed_to_rgba(&[palette::BLACK, palette::WHITE, palette::RED]);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0xFF]);
        assert_eq!(&rgba[4..8], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&rgba[8..12], &[0xAA, 0x00, 0x00, 0xFF]);
    }
}
