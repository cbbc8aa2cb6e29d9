//! # sdspi
//!
//! > A byte-serial (SPI mode) SD/SDHC block driver for embedded systems with `no_std` support
//!
//! The card is reached through the [`bus::Bus`] trait: full-duplex one-byte
//! exchanges, select-line control and a two-step clock switch. Anything able
//! to do that can carry the driver — [`bus::spi::SpiBus`] adapts an
//! `embedded-hal` SPI peripheral, and the `linux-spi` feature adds a
//! `spidev`-backed bus for prototyping.
//!
//! ## Using this crate
//!
//! ```ignore
//! let mut disk = Disk::new(
//!     SdCard::new(bus),
//!     Geometry { sector_count: 32768, erase_block_size: 1 },
//! );
//! disk.initialize()?;
//!
//! let mut sector = [0u8; 512];
//! disk.read(&mut sector, 0, 1)?;
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
extern crate log;

pub mod bus;
pub mod disk;
mod sd;

pub use sd::response::R1;
pub use sd::{CapacityClass, CardState, SdCard, BLOCK_SIZE};

#[derive(Debug)]
pub enum Error<BUS> {
    /// Underlying bus failed
    Bus(BUS),
    /// CMD0 never produced the idle-state response, card missing or dead
    Cmd0Failed(R1),
    /// Non-zero R1 on a data command
    CommandRejected(R1),
    /// Start-of-data token never appeared within the poll budget
    DataTokenTimeout,
    /// Card did not accept a written payload
    WriteResponseRejected,
    /// Card held its output busy past the poll budget
    WriteBusyTimeout,
}
