//! MC6809E opcode table.
//!
//! One entry per primary opcode: mnemonic, addressing mode, base cycle
//! count, and byte count, transcribed from the MC6809E data sheet
//! (DS9846-R2). The 0x10 and 0x11 prefixes open the two extended pages,
//! looked up by [`page10`] and [`page11`]; their byte counts include
//! the prefix byte.
//!
//! Base cycles are the column-1 figures; indexed addressing adds its
//! postbyte-dependent cycles during effective-address resolution, and
//! the stack-transfer instructions add per-register cycles as they run.

/// Addressing modes of the MC6809E.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// No operand; the instruction names its registers.
    Inherent,
    /// 8-bit immediate operand.
    Immediate,
    /// 16-bit immediate operand.
    LImmediate,
    /// Direct page: DP forms the high address byte.
    Direct,
    /// 16-bit absolute address.
    Extended,
    /// 8-bit signed PC-relative branch offset.
    Relative,
    /// 16-bit signed PC-relative branch offset.
    LRelative,
    /// Postbyte-described indexed addressing.
    Indexed,
    /// 0x10 / 0x11 page prefix.
    Prefix,
    /// Unassigned opcode.
    Illegal,
}

/// One opcode-table entry.
#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    /// Assembler mnemonic (lowercase, `"???"` for illegal opcodes).
    pub mnemonic: &'static str,
    /// Addressing mode.
    pub mode: AddrMode,
    /// Base cycle count.
    pub cycles: u8,
    /// Instruction length in bytes, including any prefix.
    pub bytes: u8,
}

const fn op(mnemonic: &'static str, mode: AddrMode, cycles: u8, bytes: u8) -> OpInfo {
    OpInfo {
        mnemonic,
        mode,
        cycles,
        bytes,
    }
}

const fn ill() -> OpInfo {
    op("???", AddrMode::Illegal, 0, 1)
}

use AddrMode::{
    Direct, Extended, Illegal, Immediate, Indexed, Inherent, LImmediate, LRelative, Prefix,
    Relative,
};

/// Primary opcode page (no prefix).
#[rustfmt::skip]
pub static PAGE0: [OpInfo; 256] = [
    /* 0x00 */ op("neg",   Direct,     6, 2),
    /* 0x01 */ ill(),
    /* 0x02 */ ill(),
    /* 0x03 */ op("com",   Direct,     6, 2),
    /* 0x04 */ op("lsr",   Direct,     6, 2),
    /* 0x05 */ ill(),
    /* 0x06 */ op("ror",   Direct,     6, 2),
    /* 0x07 */ op("asr",   Direct,     6, 2),
    /* 0x08 */ op("asl",   Direct,     6, 2),
    /* 0x09 */ op("rol",   Direct,     6, 2),
    /* 0x0a */ op("dec",   Direct,     6, 2),
    /* 0x0b */ ill(),
    /* 0x0c */ op("inc",   Direct,     6, 2),
    /* 0x0d */ op("tst",   Direct,     6, 2),
    /* 0x0e */ op("jmp",   Direct,     3, 2),
    /* 0x0f */ op("clr",   Direct,     6, 2),
    /* 0x10 */ op("0x10",  Prefix,     0, 0),
    /* 0x11 */ op("0x11",  Prefix,     0, 0),
    /* 0x12 */ op("nop",   Inherent,   2, 1),
    /* 0x13 */ op("sync",  Inherent,   4, 1),
    /* 0x14 */ ill(),
    /* 0x15 */ ill(),
    /* 0x16 */ op("lbra",  LRelative,  5, 3),
    /* 0x17 */ op("lbsr",  LRelative,  9, 3),
    /* 0x18 */ ill(),
    /* 0x19 */ op("daa",   Inherent,   2, 1),
    /* 0x1a */ op("orcc",  Immediate,  3, 2),
    /* 0x1b */ ill(),
    /* 0x1c */ op("andcc", Immediate,  3, 2),
    /* 0x1d */ op("sex",   Inherent,   2, 1),
    /* 0x1e */ op("exg",   Immediate,  8, 2),
    /* 0x1f */ op("tfr",   Immediate,  6, 2),
    /* 0x20 */ op("bra",   Relative,   3, 2),
    /* 0x21 */ op("brn",   Relative,   3, 2),
    /* 0x22 */ op("bhi",   Relative,   3, 2),
    /* 0x23 */ op("bls",   Relative,   3, 2),
    /* 0x24 */ op("bcc",   Relative,   3, 2),
    /* 0x25 */ op("bcs",   Relative,   3, 2),
    /* 0x26 */ op("bne",   Relative,   3, 2),
    /* 0x27 */ op("beq",   Relative,   3, 2),
    /* 0x28 */ op("bvc",   Relative,   3, 2),
    /* 0x29 */ op("bvs",   Relative,   3, 2),
    /* 0x2a */ op("bpl",   Relative,   3, 2),
    /* 0x2b */ op("bmi",   Relative,   3, 2),
    /* 0x2c */ op("bge",   Relative,   3, 2),
    /* 0x2d */ op("blt",   Relative,   3, 2),
    /* 0x2e */ op("bgt",   Relative,   3, 2),
    /* 0x2f */ op("ble",   Relative,   3, 2),
    /* 0x30 */ op("leax",  Indexed,    4, 2),
    /* 0x31 */ op("leay",  Indexed,    4, 2),
    /* 0x32 */ op("leas",  Indexed,    4, 2),
    /* 0x33 */ op("leau",  Indexed,    4, 2),
    /* 0x34 */ op("pshs",  Immediate,  5, 2),
    /* 0x35 */ op("puls",  Immediate,  5, 2),
    /* 0x36 */ op("pshu",  Immediate,  5, 2),
    /* 0x37 */ op("pulu",  Immediate,  5, 2),
    /* 0x38 */ ill(),
    /* 0x39 */ op("rts",   Inherent,   5, 1),
    /* 0x3a */ op("abx",   Inherent,   3, 1),
    /* 0x3b */ op("rti",   Inherent,   6, 1),
    /* 0x3c */ op("cwai",  Immediate, 20, 2),
    /* 0x3d */ op("mul",   Inherent,  11, 1),
    /* 0x3e */ ill(),
    /* 0x3f */ op("swi",   Inherent,  19, 1),
    /* 0x40 */ op("nega",  Inherent,   2, 1),
    /* 0x41 */ ill(),
    /* 0x42 */ ill(),
    /* 0x43 */ op("coma",  Inherent,   2, 1),
    /* 0x44 */ op("lsra",  Inherent,   2, 1),
    /* 0x45 */ ill(),
    /* 0x46 */ op("rora",  Inherent,   2, 1),
    /* 0x47 */ op("asra",  Inherent,   2, 1),
    /* 0x48 */ op("asla",  Inherent,   2, 1),
    /* 0x49 */ op("rola",  Inherent,   2, 1),
    /* 0x4a */ op("deca",  Inherent,   2, 1),
    /* 0x4b */ ill(),
    /* 0x4c */ op("inca",  Inherent,   2, 1),
    /* 0x4d */ op("tsta",  Inherent,   2, 1),
    /* 0x4e */ ill(),
    /* 0x4f */ op("clra",  Inherent,   2, 1),
    /* 0x50 */ op("negb",  Inherent,   2, 1),
    /* 0x51 */ ill(),
    /* 0x52 */ ill(),
    /* 0x53 */ op("comb",  Inherent,   2, 1),
    /* 0x54 */ op("lsrb",  Inherent,   2, 1),
    /* 0x55 */ ill(),
    /* 0x56 */ op("rorb",  Inherent,   2, 1),
    /* 0x57 */ op("asrb",  Inherent,   2, 1),
    /* 0x58 */ op("aslb",  Inherent,   2, 1),
    /* 0x59 */ op("rolb",  Inherent,   2, 1),
    /* 0x5a */ op("decb",  Inherent,   2, 1),
    /* 0x5b */ ill(),
    /* 0x5c */ op("incb",  Inherent,   2, 1),
    /* 0x5d */ op("tstb",  Inherent,   2, 1),
    /* 0x5e */ ill(),
    /* 0x5f */ op("clrb",  Inherent,   2, 1),
    /* 0x60 */ op("neg",   Indexed,    6, 2),
    /* 0x61 */ ill(),
    /* 0x62 */ ill(),
    /* 0x63 */ op("com",   Indexed,    6, 2),
    /* 0x64 */ op("lsr",   Indexed,    6, 2),
    /* 0x65 */ ill(),
    /* 0x66 */ op("ror",   Indexed,    6, 2),
    /* 0x67 */ op("asr",   Indexed,    6, 2),
    /* 0x68 */ op("asl",   Indexed,    6, 2),
    /* 0x69 */ op("rol",   Indexed,    6, 2),
    /* 0x6a */ op("dec",   Indexed,    6, 2),
    /* 0x6b */ ill(),
    /* 0x6c */ op("inc",   Indexed,    6, 2),
    /* 0x6d */ op("tst",   Indexed,    6, 2),
    /* 0x6e */ op("jmp",   Indexed,    3, 2),
    /* 0x6f */ op("clr",   Indexed,    6, 2),
    /* 0x70 */ op("neg",   Extended,   7, 3),
    /* 0x71 */ ill(),
    /* 0x72 */ ill(),
    /* 0x73 */ op("com",   Extended,   7, 3),
    /* 0x74 */ op("lsr",   Extended,   7, 3),
    /* 0x75 */ ill(),
    /* 0x76 */ op("ror",   Extended,   7, 3),
    /* 0x77 */ op("asr",   Extended,   7, 3),
    /* 0x78 */ op("asl",   Extended,   7, 3),
    /* 0x79 */ op("rol",   Extended,   7, 3),
    /* 0x7a */ op("dec",   Extended,   7, 3),
    /* 0x7b */ ill(),
    /* 0x7c */ op("inc",   Extended,   7, 3),
    /* 0x7d */ op("tst",   Extended,   7, 3),
    /* 0x7e */ op("jmp",   Extended,   4, 3),
    /* 0x7f */ op("clr",   Extended,   7, 3),
    /* 0x80 */ op("suba",  Immediate,  2, 2),
    /* 0x81 */ op("cmpa",  Immediate,  2, 2),
    /* 0x82 */ op("sbca",  Immediate,  2, 2),
    /* 0x83 */ op("subd",  LImmediate, 4, 3),
    /* 0x84 */ op("anda",  Immediate,  2, 2),
    /* 0x85 */ op("bita",  Immediate,  2, 2),
    /* 0x86 */ op("lda",   Immediate,  2, 2),
    /* 0x87 */ ill(),
    /* 0x88 */ op("eora",  Immediate,  2, 2),
    /* 0x89 */ op("adca",  Immediate,  2, 2),
    /* 0x8a */ op("ora",   Immediate,  2, 2),
    /* 0x8b */ op("adda",  Immediate,  2, 2),
    /* 0x8c */ op("cmpx",  LImmediate, 4, 3),
    /* 0x8d */ op("bsr",   Relative,   7, 2),
    /* 0x8e */ op("ldx",   LImmediate, 3, 3),
    /* 0x8f */ ill(),
    /* 0x90 */ op("suba",  Direct,     4, 2),
    /* 0x91 */ op("cmpa",  Direct,     4, 2),
    /* 0x92 */ op("sbca",  Direct,     4, 2),
    /* 0x93 */ op("subd",  Direct,     6, 2),
    /* 0x94 */ op("anda",  Direct,     4, 2),
    /* 0x95 */ op("bita",  Direct,     4, 2),
    /* 0x96 */ op("lda",   Direct,     4, 2),
    /* 0x97 */ op("sta",   Direct,     4, 2),
    /* 0x98 */ op("eora",  Direct,     4, 2),
    /* 0x99 */ op("adca",  Direct,     4, 2),
    /* 0x9a */ op("ora",   Direct,     4, 2),
    /* 0x9b */ op("adda",  Direct,     4, 2),
    /* 0x9c */ op("cmpx",  Direct,     6, 2),
    /* 0x9d */ op("jsr",   Direct,     7, 2),
    /* 0x9e */ op("ldx",   Direct,     5, 2),
    /* 0x9f */ op("stx",   Direct,     5, 2),
    /* 0xa0 */ op("suba",  Indexed,    4, 2),
    /* 0xa1 */ op("cmpa",  Indexed,    4, 2),
    /* 0xa2 */ op("sbca",  Indexed,    4, 2),
    /* 0xa3 */ op("subd",  Indexed,    6, 2),
    /* 0xa4 */ op("anda",  Indexed,    4, 2),
    /* 0xa5 */ op("bita",  Indexed,    4, 2),
    /* 0xa6 */ op("lda",   Indexed,    4, 2),
    /* 0xa7 */ op("sta",   Indexed,    4, 2),
    /* 0xa8 */ op("eora",  Indexed,    4, 2),
    /* 0xa9 */ op("adca",  Indexed,    4, 2),
    /* 0xaa */ op("ora",   Indexed,    4, 2),
    /* 0xab */ op("adda",  Indexed,    4, 2),
    /* 0xac */ op("cmpx",  Indexed,    6, 2),
    /* 0xad */ op("jsr",   Indexed,    7, 2),
    /* 0xae */ op("ldx",   Indexed,    5, 2),
    /* 0xaf */ op("stx",   Indexed,    5, 2),
    /* 0xb0 */ op("suba",  Extended,   5, 3),
    /* 0xb1 */ op("cmpa",  Extended,   5, 3),
    /* 0xb2 */ op("sbca",  Extended,   5, 3),
    /* 0xb3 */ op("subd",  Extended,   7, 3),
    /* 0xb4 */ op("anda",  Extended,   5, 3),
    /* 0xb5 */ op("bita",  Extended,   5, 3),
    /* 0xb6 */ op("lda",   Extended,   5, 3),
    /* 0xb7 */ op("sta",   Extended,   5, 3),
    /* 0xb8 */ op("eora",  Extended,   5, 3),
    /* 0xb9 */ op("adca",  Extended,   5, 3),
    /* 0xba */ op("ora",   Extended,   5, 3),
    /* 0xbb */ op("adda",  Extended,   5, 3),
    /* 0xbc */ op("cmpx",  Extended,   7, 3),
    /* 0xbd */ op("jsr",   Extended,   8, 3),
    /* 0xbe */ op("ldx",   Extended,   6, 3),
    /* 0xbf */ op("stx",   Extended,   6, 3),
    /* 0xc0 */ op("subb",  Immediate,  2, 2),
    /* 0xc1 */ op("cmpb",  Immediate,  2, 2),
    /* 0xc2 */ op("sbcb",  Immediate,  2, 2),
    /* 0xc3 */ op("addd",  LImmediate, 4, 3),
    /* 0xc4 */ op("andb",  Immediate,  2, 2),
    /* 0xc5 */ op("bitb",  Immediate,  2, 2),
    /* 0xc6 */ op("ldb",   Immediate,  2, 2),
    /* 0xc7 */ ill(),
    /* 0xc8 */ op("eorb",  Immediate,  2, 2),
    /* 0xc9 */ op("adcb",  Immediate,  2, 2),
    /* 0xca */ op("orb",   Immediate,  2, 2),
    /* 0xcb */ op("addb",  Immediate,  2, 2),
    /* 0xcc */ op("ldd",   LImmediate, 3, 3),
    /* 0xcd */ ill(),
    /* 0xce */ op("ldu",   LImmediate, 3, 3),
    /* 0xcf */ ill(),
    /* 0xd0 */ op("subb",  Direct,     4, 2),
    /* 0xd1 */ op("cmpb",  Direct,     4, 2),
    /* 0xd2 */ op("sbcb",  Direct,     4, 2),
    /* 0xd3 */ op("addd",  Direct,     6, 2),
    /* 0xd4 */ op("andb",  Direct,     4, 2),
    /* 0xd5 */ op("bitb",  Direct,     4, 2),
    /* 0xd6 */ op("ldb",   Direct,     4, 2),
    /* 0xd7 */ op("stb",   Direct,     4, 2),
    /* 0xd8 */ op("eorb",  Direct,     4, 2),
    /* 0xd9 */ op("adcb",  Direct,     4, 2),
    /* 0xda */ op("orb",   Direct,     4, 2),
    /* 0xdb */ op("addb",  Direct,     4, 2),
    /* 0xdc */ op("ldd",   Direct,     5, 2),
    /* 0xdd */ op("std",   Direct,     5, 2),
    /* 0xde */ op("ldu",   Direct,     5, 2),
    /* 0xdf */ op("stu",   Direct,     5, 2),
    /* 0xe0 */ op("subb",  Indexed,    4, 2),
    /* 0xe1 */ op("cmpb",  Indexed,    4, 2),
    /* 0xe2 */ op("sbcb",  Indexed,    4, 2),
    /* 0xe3 */ op("addd",  Indexed,    6, 2),
    /* 0xe4 */ op("andb",  Indexed,    4, 2),
    /* 0xe5 */ op("bitb",  Indexed,    4, 2),
    /* 0xe6 */ op("ldb",   Indexed,    4, 2),
    /* 0xe7 */ op("stb",   Indexed,    4, 2),
    /* 0xe8 */ op("eorb",  Indexed,    4, 2),
    /* 0xe9 */ op("adcb",  Indexed,    4, 2),
    /* 0xea */ op("orb",   Indexed,    4, 2),
    /* 0xeb */ op("addb",  Indexed,    4, 2),
    /* 0xec */ op("ldd",   Indexed,    5, 2),
    /* 0xed */ op("std",   Indexed,    5, 2),
    /* 0xee */ op("ldu",   Indexed,    5, 2),
    /* 0xef */ op("stu",   Indexed,    5, 2),
    /* 0xf0 */ op("subb",  Extended,   5, 3),
    /* 0xf1 */ op("cmpb",  Extended,   5, 3),
    /* 0xf2 */ op("sbcb",  Extended,   5, 3),
    /* 0xf3 */ op("addd",  Extended,   7, 3),
    /* 0xf4 */ op("andb",  Extended,   5, 3),
    /* 0xf5 */ op("bitb",  Extended,   5, 3),
    /* 0xf6 */ op("ldb",   Extended,   5, 3),
    /* 0xf7 */ op("stb",   Extended,   5, 3),
    /* 0xf8 */ op("eorb",  Extended,   5, 3),
    /* 0xf9 */ op("adcb",  Extended,   5, 3),
    /* 0xfa */ op("orb",   Extended,   5, 3),
    /* 0xfb */ op("addb",  Extended,   5, 3),
    /* 0xfc */ op("ldd",   Extended,   6, 3),
    /* 0xfd */ op("std",   Extended,   6, 3),
    /* 0xfe */ op("ldu",   Extended,   6, 3),
    /* 0xff */ op("stu",   Extended,   6, 3),
];

/// Look up a 0x10-page opcode. Byte counts include the prefix byte.
#[must_use]
pub fn page10(opcode: u8) -> Option<OpInfo> {
    let info = match opcode {
        0x21 => op("lbrn", LRelative, 5, 4),
        0x22 => op("lbhi", LRelative, 5, 4),
        0x23 => op("lbls", LRelative, 5, 4),
        0x24 => op("lbcc", LRelative, 5, 4),
        0x25 => op("lbcs", LRelative, 5, 4),
        0x26 => op("lbne", LRelative, 5, 4),
        0x27 => op("lbeq", LRelative, 5, 4),
        0x28 => op("lbvc", LRelative, 5, 4),
        0x29 => op("lbvs", LRelative, 5, 4),
        0x2a => op("lbpl", LRelative, 5, 4),
        0x2b => op("lbmi", LRelative, 5, 4),
        0x2c => op("lbge", LRelative, 5, 4),
        0x2d => op("lblt", LRelative, 5, 4),
        0x2e => op("lbgt", LRelative, 5, 4),
        0x2f => op("lble", LRelative, 5, 4),
        0x3f => op("swi2", Inherent, 20, 2),
        0x83 => op("cmpd", LImmediate, 5, 4),
        0x8c => op("cmpy", LImmediate, 5, 4),
        0x8e => op("ldy", LImmediate, 4, 4),
        0x93 => op("cmpd", Direct, 7, 3),
        0x9c => op("cmpy", Direct, 7, 3),
        0x9e => op("ldy", Direct, 6, 3),
        0x9f => op("sty", Direct, 6, 3),
        0xa3 => op("cmpd", Indexed, 7, 3),
        0xac => op("cmpy", Indexed, 7, 3),
        0xae => op("ldy", Indexed, 6, 3),
        0xaf => op("sty", Indexed, 6, 3),
        0xb3 => op("cmpd", Extended, 8, 4),
        0xbc => op("cmpy", Extended, 8, 4),
        0xbe => op("ldy", Extended, 7, 4),
        0xbf => op("sty", Extended, 7, 4),
        0xce => op("lds", LImmediate, 4, 4),
        0xde => op("lds", Direct, 6, 3),
        0xdf => op("sts", Direct, 6, 3),
        0xee => op("lds", Indexed, 6, 3),
        0xef => op("sts", Indexed, 6, 3),
        0xfe => op("lds", Extended, 7, 4),
        0xff => op("sts", Extended, 7, 4),
        _ => return None,
    };
    Some(info)
}

/// Look up a 0x11-page opcode. Byte counts include the prefix byte.
#[must_use]
pub fn page11(opcode: u8) -> Option<OpInfo> {
    let info = match opcode {
        0x3f => op("swi3", Inherent, 20, 2),
        0x83 => op("cmpu", LImmediate, 5, 4),
        0x8c => op("cmps", LImmediate, 5, 4),
        0x93 => op("cmpu", Direct, 7, 3),
        0x9c => op("cmps", Direct, 7, 3),
        0xa3 => op("cmpu", Indexed, 7, 3),
        0xac => op("cmps", Indexed, 7, 3),
        0xb3 => op("cmpu", Extended, 8, 4),
        0xbc => op("cmps", Extended, 8, 4),
        _ => return None,
    };
    Some(info)
}
