//! Raw color constants for the panel.
//!
//! Colors are RGB565, stored pre-byte-swapped so that writing the `u16` as
//! little-endian bytes puts the high RGB565 byte first on the wire. Use them
//! as-is with the raw drawing primitives; `Rgb565` values from
//! `embedded-graphics` are converted with [`from_rgb565`].

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;

pub const RED: u16 = 0x00F8;
pub const GREEN: u16 = 0xE007;
pub const BLUE: u16 = 0x1F00;
pub const WHITE: u16 = 0xFFFF;
pub const BLACK: u16 = 0x0000;
pub const YELLOW: u16 = 0xE0FF;

/// Convert an `embedded-graphics` color to the panel's raw pixel format.
pub fn from_rgb565(color: Rgb565) -> u16 {
    let raw: RawU16 = color.into();
    raw.into_inner().swap_bytes()
}
