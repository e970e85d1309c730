//! Driver for SSD1357-based 128x128 RGB OLED panels on a 4-wire SPI bus.
//!
//! Drawing happens in an in-memory framebuffer; nothing reaches the panel
//! until [`Ssd1357::flush`] streams the whole buffer into controller RAM.
#![cfg_attr(not(test), no_std)]

extern crate embedded_graphics;
extern crate embedded_hal as hal;

pub mod color;
mod command;
mod font;
mod framebuffer;
mod interface;

pub use command::Window;
pub use framebuffer::Framebuffer;
pub use interface::{DisplayInterface, Error};

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{OriginDimensions, Size};
use embedded_graphics::Pixel;
use hal::blocking::delay::DelayMs;
use hal::blocking::spi::Write;
use hal::digital::v2::OutputPin;
use hal::spi::{Mode, Phase, Polarity};

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 128;
pub(crate) const BUFFER_LEN: usize = WIDTH * HEIGHT * 2;

/// SPI mode 0. The reference wiring clocks the bus at 16 MHz, write-only.
pub const MODE: Mode = Mode {
    polarity: Polarity::IdleLow,
    phase: Phase::CaptureOnFirstTransition,
};

/// An SSD1357 display: an owned [`Framebuffer`] plus the bus transport.
///
/// Drawing methods delegate to the framebuffer and never touch the bus;
/// [`flush`](Self::flush) pushes the entire buffer to the panel.
pub struct Ssd1357<SPI, CS, DC, RST> {
    iface: DisplayInterface<SPI, CS, DC, RST>,
    framebuffer: Framebuffer,
}

impl<SPI, CS, DC, RST, SpiE, PinE> Ssd1357<SPI, CS, DC, RST>
where
    SPI: Write<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
    DC: OutputPin<Error = PinE>,
    RST: OutputPin<Error = PinE>,
{
    /// Create a new Ssd1357 and bring the panel into an addressable state.
    ///
    /// Pulses the reset line (blocks for the controller's reset timing) and
    /// issues the power-on configuration sequence. The framebuffer starts
    /// zero-filled; nothing is pushed to the panel until [`flush`](Self::flush).
    pub fn new<D: DelayMs<u8>>(
        spi: SPI,
        cs: CS,
        dc: DC,
        rst: RST,
        delay: &mut D,
    ) -> Result<Self, Error<SpiE, PinE>> {
        let mut iface = DisplayInterface::new(spi, cs, dc, rst);
        iface.pulse_reset(delay)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("Initializing SSD1357");
        for &byte in command::INIT_SEQUENCE.iter() {
            iface.send_command(byte)?;
        }
        Ok(Self {
            iface,
            framebuffer: Framebuffer::new(),
        })
    }

    /// Long-form hardware reset. The configuration sequence is not re-issued.
    pub fn reset<D: DelayMs<u8>>(&mut self, delay: &mut D) -> Result<(), Error<SpiE, PinE>> {
        self.iface.hard_reset(delay)
    }

    /// Push the entire framebuffer to controller RAM.
    ///
    /// Addresses the full panel through the fixed column/row commands, then
    /// streams the buffer in a single data transmission.
    pub fn flush(&mut self) -> Result<(), Error<SpiE, PinE>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Flushing framebuffer");
        self.iface.send_command(command::SET_COLUMN_ADDRESS)?;
        self.iface.send_data(&[0x00, (WIDTH - 1) as u8])?;
        self.iface.send_command(command::SET_ROW_ADDRESS)?;
        self.iface.send_data(&[0x00, (HEIGHT - 1) as u8])?;
        self.iface.send_command(command::WRITE_RAM)?;
        self.iface.send_data(self.framebuffer.data())
    }

    /// Fill the framebuffer with `color` and push it to the panel.
    pub fn fill_screen(&mut self, color: u16) -> Result<(), Error<SpiE, PinE>> {
        self.framebuffer.fill(color);
        self.flush()
    }

    /// Address an arbitrary sub-rectangle of controller RAM and trigger a
    /// RAM write; subsequent data bytes land inside the window.
    ///
    /// This controller's RAM origin is offset from the panel: X bounds are
    /// shifted by +2 and Y bounds by +1 before being sent. The window must
    /// satisfy `x_start <= x_end < WIDTH` and `y_start <= y_end < HEIGHT`;
    /// out-of-range windows are not validated (see [`Window`]).
    pub fn set_window(&mut self, window: Window) -> Result<(), Error<SpiE, PinE>> {
        let xs = window.x_start + 2;
        let xe = window.x_end + 2;
        let ys = window.y_start + 1;
        let ye = window.y_end + 1;

        self.iface.send_command(command::CASET)?;
        self.iface.send_data(&[
            (xs >> 8) as u8,
            xs as u8,
            ((xe - 1) >> 8) as u8,
            (xe - 1) as u8,
        ])?;

        self.iface.send_command(command::RASET)?;
        self.iface
            .send_data(&[(ys >> 8) as u8, ys as u8, (ye >> 8) as u8, ye as u8])?;

        self.iface.send_command(command::RAMWR)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u16) {
        self.framebuffer.set_pixel(x, y, color);
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u16> {
        self.framebuffer.get_pixel(x, y)
    }

    pub fn fill(&mut self, color: u16) {
        self.framebuffer.fill(color);
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u16) {
        self.framebuffer.fill_rect(x, y, w, h, color);
    }

    pub fn rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u16) {
        self.framebuffer.rect(x, y, w, h, color);
    }

    pub fn draw_text(&mut self, text: &str, x: usize, y: usize, color: u16) {
        self.framebuffer.draw_text(text, x, y, color);
    }

    pub fn scaled_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u16) {
        self.framebuffer.scaled_text(text, x, y, scale, color);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }
}

impl<SPI, CS, DC, RST> OriginDimensions for Ssd1357<SPI, CS, DC, RST> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<SPI, CS, DC, RST> DrawTarget for Ssd1357<SPI, CS, DC, RST> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }
}
