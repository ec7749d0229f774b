//! Machine configuration.

/// System ROM image size (16 KiB at 0x8000).
pub const ROM_SIZE: usize = 0x4000;

/// Configuration for creating a Dragon instance.
pub struct DragonConfig {
    /// System ROM image. Must be exactly [`ROM_SIZE`] bytes.
    pub rom: Vec<u8>,
}
