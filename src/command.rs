//! SSD1357 command set.
//!
//! Opcodes and the power-on configuration sequence from the controller
//! datasheet. The init bytes are sent over the command channel, operands
//! included, and their order is load-bearing: the controller only accepts
//! some register writes in specific sequence windows.

pub(crate) const DISPLAY_ON: u8 = 0xAF;
pub(crate) const SET_LOW_COLUMN: u8 = 0x00;
pub(crate) const SET_HIGH_COLUMN: u8 = 0x10;
pub(crate) const MEMORY_ADDR_MODE: u8 = 0x20;
pub(crate) const MODE_HORIZONTAL: u8 = 0x00;
pub(crate) const MULTIPLEX_RATIO: u8 = 0xA8;
pub(crate) const DISPLAY_OFFSET: u8 = 0xD3;
pub(crate) const CLOCK_DIVIDE: u8 = 0xD5;
pub(crate) const PRECHARGE_PERIOD: u8 = 0xD9;
pub(crate) const COM_PIN_CONFIG: u8 = 0xDA;
pub(crate) const VCOMH_LEVEL: u8 = 0xDB;
pub(crate) const SEGMENT_REMAP: u8 = 0xA1;

/// Full-panel addressing path, used by flush.
pub(crate) const SET_COLUMN_ADDRESS: u8 = 0x15;
pub(crate) const SET_ROW_ADDRESS: u8 = 0x75;
pub(crate) const WRITE_RAM: u8 = 0x5C;

/// Generic windowed addressing path.
pub(crate) const CASET: u8 = 0x2A;
pub(crate) const RASET: u8 = 0x2B;
pub(crate) const RAMWR: u8 = 0x2C;

/// The panel's power-on configuration, in the order the controller requires.
#[rustfmt::skip]
pub(crate) const INIT_SEQUENCE: [u8; 18] = [
    DISPLAY_ON,
    SET_LOW_COLUMN,
    SET_HIGH_COLUMN,
    MEMORY_ADDR_MODE, MODE_HORIZONTAL,
    MULTIPLEX_RATIO,  0x3F,
    DISPLAY_OFFSET,   0x00,
    CLOCK_DIVIDE,     0x80,
    PRECHARGE_PERIOD, 0x22,
    COM_PIN_CONFIG,   0x12,
    VCOMH_LEVEL,      0x40,
    SEGMENT_REMAP,
];

/// A sub-rectangle of the panel, inclusive on both ends, in pixel coordinates.
///
/// Callers must uphold `x_start <= x_end < WIDTH` and
/// `y_start <= y_end < HEIGHT`; out-of-range windows are not validated and
/// leave the controller's address pointer in an undefined state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub x_start: u16,
    pub y_start: u16,
    pub x_end: u16,
    pub y_end: u16,
}

impl Window {
    pub fn new(x_start: u16, y_start: u16, x_end: u16, y_end: u16) -> Self {
        Self {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }
}
