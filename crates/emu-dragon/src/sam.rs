//! MC6883 Synchronous Address Multiplexer (SAM).
//!
//! The SAM's registers are write-only and use the pair-set idiom: each
//! register bit has two addresses in 0xFFC0..0xFFDF, the even one
//! clearing it and the odd one setting it. Address bits 1..4 select
//! the target bit:
//!
//! | bit index | field               |
//! |-----------|---------------------|
//! | 0..2      | VDG mode (3 bits)   |
//! | 3..9      | display offset (7)  |
//! | 10        | page                |
//! | 11..12    | MPU rate            |
//! | 13..14    | memory size         |
//! | 15        | map type            |
//!
//! Page, rate, size, and map type are stored for completeness but
//! nothing in this machine consumes them. The SAM also redirects reads
//! of the vector page 0xFFF2..0xFFFF down to 0xBFF2..0xBFFF so the CPU
//! fetches vectors from the ROM image.

/// SAM register state.
pub struct Sam {
    vdg_mode: u8,
    vdg_display_offset: u8,
    page: u8,
    mpu_rate: u8,
    memory_size: u8,
    map_type: u8,
}

impl Sam {
    /// Power-on state: alphanumeric mode, display offset 2 (the
    /// 0x0400 text page), compatibility values elsewhere.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vdg_mode: 0,
            vdg_display_offset: 2,
            page: 1,
            mpu_rate: 0,
            memory_size: 2,
            map_type: 0,
        }
    }

    /// 3-bit VDG mode as driven by the ROM.
    #[must_use]
    pub fn vdg_mode(&self) -> u8 {
        self.vdg_mode
    }

    /// 7-bit display offset (video base address >> 9).
    #[must_use]
    pub fn display_offset(&self) -> u8 {
        self.vdg_display_offset
    }

    /// Stored page field (unused by this machine).
    #[must_use]
    pub fn page(&self) -> u8 {
        self.page
    }

    /// Stored MPU rate field (unused by this machine).
    #[must_use]
    pub fn mpu_rate(&self) -> u8 {
        self.mpu_rate
    }

    /// Stored memory size field (unused by this machine).
    #[must_use]
    pub fn memory_size(&self) -> u8 {
        self.memory_size
    }

    /// Stored map type field (unused by this machine).
    #[must_use]
    pub fn map_type(&self) -> u8 {
        self.map_type
    }

    /// Decode a write into the control block. Only the low five
    /// address bits matter: bit 0 is the new bit value, bits 1..4 the
    /// register-bit index.
    pub fn control_write(&mut self, addr: u16) {
        let reg = addr & 0x001F;
        let bit = (reg >> 1) as u8;
        let set = reg & 1 == 1;

        match bit {
            0..=2 => Self::put_bit(&mut self.vdg_mode, bit, set),
            3..=9 => Self::put_bit(&mut self.vdg_display_offset, bit - 3, set),
            10 => Self::put_bit(&mut self.page, 0, set),
            11..=12 => Self::put_bit(&mut self.mpu_rate, bit - 11, set),
            13..=14 => Self::put_bit(&mut self.memory_size, bit - 13, set),
            _ => Self::put_bit(&mut self.map_type, 0, set),
        }
    }

    /// Rewrite a vector-page read address into the ROM image copy
    /// 0x4000 below.
    #[must_use]
    pub fn vector_redirect(addr: u16) -> u16 {
        addr & 0xBFFF
    }

    fn put_bit(field: &mut u8, bit: u8, set: bool) {
        if set {
            *field |= 1 << bit;
        } else {
            *field &= !(1 << bit);
        }
    }
}

impl Default for Sam {
    fn default() -> Self {
        Self::new()
    }
}
