//! Keyboard cross-matrix.
//!
//! The keyboard is a 7-row × 8-column switch matrix. The ROM drives
//! columns low through PIA0 port B and reads the rows back on port A
//! bits 1..6. Host scan codes arrive as AT-style make/break events and
//! are folded into a per-row bitmap of currently closed switches
//! (0 = closed, matching the active-low matrix).
//!
//! ```text
//!       | PB0   PB1   PB2   PB3   PB4   PB5   PB6   PB7 |
//!   ----|------------------------------------------------|
//!   PA0 |   0     1     2     3     4     5     6     7  |
//!   PA1 |   8     9     :     ;     ,     -     .     /  |
//!   PA2 |   @     A     B     C     D     E     F     G  |
//!   PA3 |   H     I     J     K     L     M     N     O  |
//!   PA4 |   P     Q     R     S     T     U     V     W  |
//!   PA5 |   X     Y     Z    Up  Down  Left Right Space  |
//!   PA6 | ENT   CLR   BRK                          SHFT  |
//! ```

/// Number of matrix rows.
pub const KBD_ROWS: usize = 7;

/// First function-key scan code minus one (F1 = 59 → value 1).
const SCAN_CODE_F1: u8 = 58;

/// Row entry marking a scan code with no matrix position.
const NO_ROW: u8 = 255;

/// Scan code → (column mask, row). The mask has a 0 in the column the
/// key sits on; `NO_ROW` rows are codes this machine ignores.
#[rustfmt::skip]
static SCAN_CODE_TABLE: [(u8, u8); 81] = [
    (0xFF,        NO_ROW), // 0
    (0b1111_1011, 6),      // Break (Esc)
    (0b1111_1101, 0),      // 1
    (0b1111_1011, 0),      // 2
    (0b1111_0111, 0),      // 3
    (0b1110_1111, 0),      // 4
    (0b1101_1111, 0),      // 5
    (0b1011_1111, 0),      // 6
    (0b0111_1111, 0),      // 7
    (0b1111_1110, 1),      // 8
    (0b1111_1101, 1),      // 9
    (0b1111_1110, 0),      // 0
    (0b1101_1111, 1),      // -
    (0b1111_1011, 1),      // :
    (0b1111_1101, 6),      // Clear
    (0xFF,        NO_ROW),
    (0b1111_1101, 4),      // Q
    (0b0111_1111, 4),      // W
    (0b1101_1111, 2),      // E
    (0b1111_1011, 4),      // R
    (0b1110_1111, 4),      // T
    (0b1111_1101, 5),      // Y
    (0b1101_1111, 4),      // U
    (0b1111_1101, 3),      // I
    (0b0111_1111, 3),      // O
    (0b1111_1110, 4),      // P
    (0b1111_1110, 2),      // @
    (0xFF,        NO_ROW),
    (0b1111_1110, 6),      // Enter
    (0xFF,        NO_ROW),
    (0b1111_1101, 2),      // A
    (0b1111_0111, 4),      // S
    (0b1110_1111, 2),      // D
    (0b1011_1111, 2),      // F
    (0b0111_1111, 2),      // G
    (0b1111_1110, 3),      // H
    (0b1111_1011, 3),      // J
    (0b1111_0111, 3),      // K
    (0b1110_1111, 3),      // L
    (0b1111_0111, 1),      // ;
    (0xFF,        NO_ROW), // 40
    (0xFF,        NO_ROW),
    (0b0111_1111, 6),      // Shift
    (0xFF,        NO_ROW),
    (0b1111_1011, 5),      // Z
    (0b1111_1110, 5),      // X
    (0b1111_0111, 2),      // C
    (0b1011_1111, 4),      // V
    (0b1111_1011, 2),      // B
    (0b1011_1111, 3),      // N
    (0b1101_1111, 3),      // M
    (0b1110_1111, 1),      // ,
    (0b1011_1111, 1),      // .
    (0b0111_1111, 1),      // /
    (0xFF,        NO_ROW),
    (0xFF,        NO_ROW),
    (0xFF,        NO_ROW),
    (0b0111_1111, 5),      // Space
    (0xFF,        NO_ROW),
    (0xFF,        NO_ROW), // F1
    (0xFF,        NO_ROW), // F2
    (0xFF,        NO_ROW), // F3
    (0xFF,        NO_ROW), // F4
    (0xFF,        NO_ROW), // F5
    (0xFF,        NO_ROW), // F6
    (0xFF,        NO_ROW), // F7
    (0xFF,        NO_ROW), // F8
    (0xFF,        NO_ROW), // F9
    (0xFF,        NO_ROW), // F10
    (0xFF,        NO_ROW),
    (0xFF,        NO_ROW), // 70
    (0xFF,        NO_ROW),
    (0b1111_0111, 5),      // Up
    (0xFF,        NO_ROW),
    (0xFF,        NO_ROW),
    (0b1101_1111, 5),      // Left
    (0xFF,        NO_ROW),
    (0b1011_1111, 5),      // Right
    (0xFF,        NO_ROW),
    (0xFF,        NO_ROW),
    (0b1110_1111, 5),      // Down (80)
];

/// Matrix state plus the function-key escape latch.
pub struct Keyboard {
    /// Closed-switch bitmap per row, 1 = open (active low).
    rows: [u8; KBD_ROWS],
    /// Latched F1..F10 value (1..10), 0 when empty.
    function_key: u8,
}

impl Keyboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: [0xFF; KBD_ROWS],
            function_key: 0,
        }
    }

    /// Fold a make/break scan-code event into the matrix. F1..F10
    /// makes latch the function-key value instead of touching the
    /// matrix; unknown codes are ignored.
    pub fn process_scan_code(&mut self, event: u8) {
        if event == 0 {
            return;
        }

        if (59..=68).contains(&event) {
            if self.function_key == 0 {
                self.function_key = event - SCAN_CODE_F1;
            }
            return;
        }

        let index = usize::from(event & 0x7F);
        let Some(&(column_mask, row)) = SCAN_CODE_TABLE.get(index) else {
            return;
        };
        if row == NO_ROW {
            return;
        }

        let row = usize::from(row);
        if event & 0x80 != 0 {
            // Break: reopen the switch.
            self.rows[row] |= !column_mask;
        } else {
            // Make: close the switch.
            self.rows[row] &= column_mask;
        }
    }

    /// Compute the PA row bits for a column-scan byte on PB. A row
    /// reads 1 when none of its closed switches sit on a driven
    /// (low) column.
    #[must_use]
    pub fn row_scan(&self, column_drive: u8) -> u8 {
        let driven = !column_drive;
        let mut result = 0;
        for (row, &row_bits) in self.rows.iter().enumerate() {
            if driven & row_bits == driven {
                result |= 1 << row;
            }
        }
        result
    }

    /// Take the latched function-key value (1..10), clearing it.
    pub fn take_function_key(&mut self) -> u8 {
        std::mem::take(&mut self.function_key)
    }

    /// Current row bitmaps (for diagnostics).
    #[must_use]
    pub fn rows(&self) -> [u8; KBD_ROWS] {
        self.rows
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}
