//! SPI bus transport for the 4-wire interface.
//!
//! The controller shares one SPI bus with a chip-select line, a data/command
//! select line and a hardware reset line. Every transmission is wrapped in a
//! chip-select acquire/release; the release happens even when the SPI write
//! fails, so a transport error never leaves the bus asserted.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

/// Errors raised by the bus transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE, PinE> {
    /// The underlying SPI transmission failed.
    Spi(SpiE),
    /// Driving a control line failed.
    Pin(PinE),
}

/// The SPI channel plus the three discrete control lines.
pub struct DisplayInterface<SPI, CS, DC, RST> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
}

impl<SPI, CS, DC, RST, SpiE, PinE> DisplayInterface<SPI, CS, DC, RST>
where
    SPI: Write<u8, Error = SpiE>,
    CS: OutputPin<Error = PinE>,
    DC: OutputPin<Error = PinE>,
    RST: OutputPin<Error = PinE>,
{
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST) -> Self {
        Self { spi, cs, dc, rst }
    }

    /// Transmit a single opcode byte with the data/command line in command
    /// state.
    pub fn send_command(&mut self, cmd: u8) -> Result<(), Error<SpiE, PinE>> {
        self.cs.set_low().map_err(Error::Pin)?;
        self.dc.set_low().map_err(Error::Pin)?;
        let res = self.spi.write(&[cmd]);
        self.cs.set_high().map_err(Error::Pin)?;
        res.map_err(Error::Spi)
    }

    /// Transmit bytes verbatim with the data/command line in data state.
    pub fn send_data(&mut self, data: &[u8]) -> Result<(), Error<SpiE, PinE>> {
        self.cs.set_low().map_err(Error::Pin)?;
        self.dc.set_high().map_err(Error::Pin)?;
        let res = self.spi.write(data);
        self.cs.set_high().map_err(Error::Pin)?;
        res.map_err(Error::Spi)
    }

    /// Pulse the hardware reset line.
    ///
    /// Blocks for the controller's minimum reset timing; no command may be
    /// issued until this returns.
    pub fn pulse_reset<D: DelayMs<u8>>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Error<SpiE, PinE>> {
        self.rst.set_high().map_err(Error::Pin)?;
        delay.delay_ms(20);
        self.rst.set_low().map_err(Error::Pin)?;
        delay.delay_ms(200);
        self.rst.set_high().map_err(Error::Pin)
    }

    /// Long-form reset, holding each level for 200ms.
    pub fn hard_reset<D: DelayMs<u8>>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), Error<SpiE, PinE>> {
        self.rst.set_high().map_err(Error::Pin)?;
        delay.delay_ms(200);
        self.rst.set_low().map_err(Error::Pin)?;
        delay.delay_ms(200);
        self.rst.set_high().map_err(Error::Pin)?;
        delay.delay_ms(200);
        Ok(())
    }
}
