//! Block-device shim between the card driver and a filesystem layer.

use crate::bus::Bus;
use crate::sd::{SdCard, BLOCK_SIZE};
use crate::Error;

/// Fixed transfer unit; the driver neither splits nor merges sectors.
pub const SECTOR_SIZE: usize = BLOCK_SIZE;

/// Geometry reported to the filesystem layer. The card is not interrogated
/// for its real size; the shim supplies these as configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    pub sector_count: u32,
    /// Erase granularity in sectors.
    pub erase_block_size: u32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Status {
    Ready,
    NotInitialized,
}

/// Capability interface a filesystem layer depends on abstractly. The SD
/// driver is the only implementation in this crate.
pub trait BlockDevice {
    type Error;

    fn status(&self) -> Status;

    fn initialize(&mut self) -> Result<(), Self::Error>;

    fn read(&mut self, buffer: &mut [u8], start_sector: u32, count: u32)
        -> Result<(), Self::Error>;

    fn write(&mut self, buffer: &[u8], start_sector: u32, count: u32)
        -> Result<(), Self::Error>;

    fn geometry(&self) -> Geometry;
}

pub struct Disk<BUS> {
    driver: SdCard<BUS>,
    geometry: Geometry,
}

impl<BUS> Disk<BUS> {
    pub fn new(driver: SdCard<BUS>, geometry: Geometry) -> Self {
        Self { driver, geometry }
    }
}

impl<E, BUS: Bus<Error = E>> BlockDevice for Disk<BUS> {
    type Error = Error<E>;

    fn status(&self) -> Status {
        match self.driver.card().initialized {
            true => Status::Ready,
            false => Status::NotInitialized,
        }
    }

    fn initialize(&mut self) -> Result<(), Error<E>> {
        self.driver.init()
    }

    fn read(&mut self, buffer: &mut [u8], start_sector: u32, count: u32) -> Result<(), Error<E>> {
        self.driver.read_blocks(buffer, start_sector, count)
    }

    fn write(&mut self, buffer: &[u8], start_sector: u32, count: u32) -> Result<(), Error<E>> {
        self.driver.write_blocks(buffer, start_sector, count)
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }
}
