pub mod command;
pub mod data;
pub mod response;

mod init;
mod read;
mod write;

use crate::bus::Bus;
use crate::Error;

use self::command::Command;
use self::response::{Response, R1};

pub const BLOCK_SIZE: usize = 512;

/// Idle-level byte clocked out whenever the host only needs to receive.
pub(crate) const FILL: u8 = 0xFF;

/// Poll budget for the primary response byte after a command frame.
const RESPONSE_ATTEMPTS: usize = 500;

/// SDHC cards are block addressed, SDSC cards take byte offsets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CapacityClass {
    SDSC,
    SDHC,
}

impl CapacityClass {
    pub fn encode_address(self, sector: u32) -> u32 {
        match self {
            Self::SDHC => sector,
            Self::SDSC => sector * BLOCK_SIZE as u32,
        }
    }
}

/// Written only by [`SdCard::init`]; read by the transfer engine to pick
/// the address encoding.
#[derive(Copy, Clone, Debug)]
pub struct CardState {
    pub class: CapacityClass,
    pub initialized: bool,
}

impl Default for CardState {
    fn default() -> Self {
        Self { class: CapacityClass::SDSC, initialized: false }
    }
}

/// SPI-mode SD/SDHC driver over any [`Bus`]. Owns the bus and the select
/// line exclusively; calls must not be re-entered.
pub struct SdCard<BUS> {
    bus: BUS,
    card: CardState,
}

impl<E, BUS: Bus<Error = E>> SdCard<BUS> {
    pub fn new(bus: BUS) -> Self {
        Self { bus, card: CardState::default() }
    }

    pub fn card(&self) -> CardState {
        self.card
    }

    pub fn bus<R>(&mut self, f: impl FnOnce(&mut BUS) -> R) -> R {
        f(&mut self.bus)
    }

    fn exchange(&mut self, byte: u8) -> Result<u8, Error<E>> {
        self.bus.exchange(byte).map_err(Error::Bus)
    }

    fn fill(&mut self) -> Result<u8, Error<E>> {
        self.exchange(FILL)
    }

    /// Deselect and clock one filler byte so the card releases its output
    /// line.
    fn release(&mut self) -> Result<(), Error<E>> {
        self.bus.deselect().map_err(Error::Bus)?;
        self.fill()?;
        Ok(())
    }

    /// Frame and transmit a command, poll for its R1, then read any
    /// fixed-length trailing payload. The card stays selected; callers own
    /// the select line around data phases. Only bus failures are errors
    /// here — whatever the last poll read becomes R1, valid or not.
    fn send_command(&mut self, command: Command) -> Result<Response, Error<E>> {
        self.bus.select().map_err(Error::Bus)?;
        let frame: [u8; 6] = command.into();
        for byte in frame {
            self.exchange(byte)?;
        }

        let mut r1 = R1::default();
        for _ in 0..RESPONSE_ATTEMPTS {
            r1 = R1(self.fill()?);
            if r1.valid() {
                break;
            }
        }

        let mut response = Response { r1, ex: 0 };
        for _ in 0..command.trailing_len() {
            response.ex = response.ex << 8 | self.fill()? as u32;
        }
        Ok(response)
    }
}
