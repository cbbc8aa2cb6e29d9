use embedded_hal::digital::v2::OutputPin;
use embedded_hal::spi::FullDuplex;

use super::{Bus, Speed};

/// Clock-divider control for the SPI peripheral behind [`SpiBus`].
/// `embedded-hal` has no portable way to retune a live peripheral, so the
/// platform supplies this capability separately.
pub trait Clock {
    type Error;
    fn set_speed(&mut self, speed: Speed) -> Result<(), Self::Error>;
}

#[derive(Debug)]
pub enum Error<SPI, CS, CLK> {
    SPI(SPI),
    CS(CS),
    Clock(CLK),
}

/// [`Bus`] over any `embedded-hal` full-duplex SPI peripheral with a
/// dedicated chip-select pin.
pub struct SpiBus<SPI, CS, CLK> {
    spi: SPI,
    cs: CS,
    clock: CLK,
}

impl<SPI, CS, CLK> SpiBus<SPI, CS, CLK> {
    pub fn new(spi: SPI, cs: CS, clock: CLK) -> Self {
        Self { spi, cs, clock }
    }
}

impl<E, F, G, SPI, CS, CLK> Bus for SpiBus<SPI, CS, CLK>
where
    SPI: FullDuplex<u8, Error = E>,
    CS: OutputPin<Error = F>,
    CLK: Clock<Error = G>,
{
    type Error = Error<E, F, G>;

    fn exchange(&mut self, byte: u8) -> Result<u8, Self::Error> {
        nb::block!(self.spi.send(byte)).map_err(Error::SPI)?;
        nb::block!(self.spi.read()).map_err(Error::SPI)
    }

    fn select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(Error::CS)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(Error::CS)
    }

    fn set_speed(&mut self, speed: Speed) -> Result<(), Self::Error> {
        self.clock.set_speed(speed).map_err(Error::Clock)
    }
}
