#[cfg(feature = "linux-spi")]
pub mod linux;
#[cfg(test)]
pub(crate) mod scripted;
pub mod spi;

/// Bus clock selection. SD cards must be clocked at 100-400KHz until the
/// power-up handshake completes, then may run at full rate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Speed {
    Init,
    Transfer,
}

/// The one abstraction allowed to touch the physical bus. No buffering,
/// no retries; every exchange costs exactly one byte period.
pub trait Bus {
    type Error;

    /// Transmit one byte and return the byte sampled from the card during
    /// the same clock period.
    fn exchange(&mut self, byte: u8) -> Result<u8, Self::Error>;

    fn select(&mut self) -> Result<(), Self::Error>;

    fn deselect(&mut self) -> Result<(), Self::Error>;

    fn set_speed(&mut self, speed: Speed) -> Result<(), Self::Error>;
}
