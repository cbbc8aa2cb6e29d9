use crate::bus::Bus;
use crate::Error;

use super::command::Command;
use super::data::Token;
use super::{SdCard, BLOCK_SIZE, FILL};

/// Poll budget for the start-of-data token after CMD17 is accepted.
const START_TOKEN_ATTEMPTS: usize = 65535;

impl<E, BUS: Bus<Error = E>> SdCard<BUS> {
    /// Read `count` 512-byte sectors starting at `sector` into `buffer`.
    /// Sectors transfer one at a time in ascending order; the first failure
    /// aborts the remainder of the call.
    pub fn read_blocks(
        &mut self,
        buffer: &mut [u8],
        sector: u32,
        count: u32,
    ) -> Result<(), Error<E>> {
        debug_assert!(buffer.len() >= count as usize * BLOCK_SIZE);
        let blocks = buffer.chunks_exact_mut(BLOCK_SIZE).take(count as usize);
        for (index, block) in blocks.enumerate() {
            let address = self.card.class.encode_address(sector + index as u32);
            let response = self.send_command(Command::ReadSingleBlock(address))?;
            if !response.r1.ready() {
                self.release()?;
                return Err(Error::CommandRejected(response.r1));
            }

            let mut byte = FILL;
            for _ in 0..START_TOKEN_ATTEMPTS {
                byte = self.fill()?;
                if byte == Token::Start as u8 {
                    break;
                }
            }
            if byte != Token::Start as u8 {
                self.release()?;
                return Err(Error::DataTokenTimeout);
            }

            for slot in block.iter_mut() {
                *slot = self.fill()?;
            }
            self.fill()?; // CRC, exchanged but never checked
            self.fill()?;

            self.release()?;
        }
        Ok(())
    }
}
