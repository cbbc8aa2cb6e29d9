use std::io;

use gpio::{sysfs::SysFsGpioOutput, GpioOut};
use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};

use super::{Bus, Speed};

/// `spidev` + sysfs-GPIO bus for prototyping on Linux boards.
pub struct LinuxBus {
    spi: Spidev,
    cs: SysFsGpioOutput,
}

impl LinuxBus {
    pub fn open(spi: &str, cs: u16) -> io::Result<Self> {
        let mut spi = Spidev::open(spi)?;
        spi.configure(&Self::options(Speed::Init))?;
        let cs = SysFsGpioOutput::open(cs)?;
        Ok(Self { spi, cs })
    }

    fn options(speed: Speed) -> SpidevOptions {
        let max_speed_hz = match speed {
            Speed::Init => 200_000,
            Speed::Transfer => 8_000_000,
        };
        SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(max_speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build()
    }
}

impl Bus for LinuxBus {
    type Error = io::Error;

    fn exchange(&mut self, byte: u8) -> io::Result<u8> {
        let tx = [byte];
        let mut rx = [0u8];
        self.spi.transfer(&mut SpidevTransfer::read_write(&tx, &mut rx))?;
        Ok(rx[0])
    }

    fn select(&mut self) -> io::Result<()> {
        self.cs.set_value(false)
    }

    fn deselect(&mut self) -> io::Result<()> {
        self.cs.set_value(true)
    }

    fn set_speed(&mut self, speed: Speed) -> io::Result<()> {
        self.spi.configure(&Self::options(speed))
    }
}
