use crate::bus::Bus;
use crate::Error;

use super::command::Command;
use super::data::{Response as DataResponse, Token};
use super::{SdCard, BLOCK_SIZE};

/// Busy-poll budget while the card holds its output low after a write.
/// Bounded so a dead card cannot hang the caller.
pub(crate) const BUSY_ATTEMPTS: usize = 500_000;

impl<E, BUS: Bus<Error = E>> SdCard<BUS> {
    /// Write `count` 512-byte sectors from `buffer` starting at `sector`.
    /// Sectors transfer one at a time in ascending order; the first failure
    /// aborts the remainder of the call.
    pub fn write_blocks(&mut self, buffer: &[u8], sector: u32, count: u32) -> Result<(), Error<E>> {
        debug_assert!(buffer.len() >= count as usize * BLOCK_SIZE);
        let blocks = buffer.chunks_exact(BLOCK_SIZE).take(count as usize);
        for (index, block) in blocks.enumerate() {
            let address = self.card.class.encode_address(sector + index as u32);
            let response = self.send_command(Command::WriteBlock(address))?;
            if !response.r1.ready() {
                self.release()?;
                return Err(Error::CommandRejected(response.r1));
            }

            self.fill()?;
            self.bus.select().map_err(Error::Bus)?;
            self.exchange(Token::Start as u8)?;
            for &byte in block {
                self.exchange(byte)?;
            }
            self.fill()?; // CRC placeholders, the card ignores them
            self.fill()?;

            let status = self.fill()?;
            match DataResponse::try_from(status) {
                Some(DataResponse::Accepted) => (),
                _ => {
                    self.release()?;
                    return Err(Error::WriteResponseRejected);
                }
            }

            // Card holds its output low until the block is programmed.
            let mut busy = 0;
            while self.fill()? == 0x00 {
                busy += 1;
                if busy >= BUSY_ATTEMPTS {
                    self.release()?;
                    return Err(Error::WriteBusyTimeout);
                }
            }

            self.release()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::bus::scripted::{Event, ScriptedBus};
    use crate::sd::{CapacityClass, CardState, SdCard};
    use crate::Error;

    fn sdsc(bus: ScriptedBus) -> SdCard<ScriptedBus> {
        SdCard { bus, card: CardState { class: CapacityClass::SDSC, initialized: true } }
    }

    /// Script everything up to and including the data-response token.
    fn accept_until_response(script: &mut Vec<u8>, data_response: u8) {
        script.extend_from_slice(&[0xFF; 6]); // frame clocks out
        script.push(0x00); // R1
        script.push(0xFF); // pre-data filler
        script.push(0xFF); // start token slot
        script.extend_from_slice(&[0xFF; 512]); // data slots
        script.extend_from_slice(&[0xFF, 0xFF]); // CRC slots
        script.push(data_response);
    }

    #[test]
    fn write_sends_block_and_waits_for_busy_release() {
        let mut script = Vec::new();
        accept_until_response(&mut script, 0x05);
        script.extend_from_slice(&[0x00, 0x00, 0xFF]); // busy, then released
        script.push(0xFF); // release

        // High-bit-set payload keeps the transmit stream free of bytes that
        // parse like frame starts.
        let data: Vec<u8> = (0..512).map(|index| (index & 0x7F) as u8 | 0x80).collect();
        let mut sd = sdsc(ScriptedBus::new(&script));
        sd.write_blocks(&data, 2, 1).unwrap();

        let sent = sd.bus(|bus| bus.sent());
        // frame(6) + R1 poll + filler + start token puts the payload at 9.
        assert_eq!(&sent[9..521], &data[..]);

        let frames = sd.bus(|bus| bus.frames());
        assert_eq!(frames[0], [0x58, 0x00, 0x00, 0x04, 0x00, 0x01]); // 2 * 512
    }

    #[test]
    fn rejected_data_response_skips_busy_poll() {
        let mut script = Vec::new();
        accept_until_response(&mut script, 0x0B); // CRC-error pattern
        script.push(0xFF); // release

        let mut sd = sdsc(ScriptedBus::new(&script));
        let result = sd.write_blocks(&[0x80; 512], 0, 1);
        assert!(matches!(result, Err(Error::WriteResponseRejected)));

        // Exactly one exchange (the release filler) after the response byte.
        let exchanges = sd.bus(|bus| bus.exchanges());
        assert_eq!(exchanges, 6 + 1 + 1 + 1 + 512 + 2 + 1 + 1);
        let events = sd.bus(|bus| bus.events.clone());
        assert_eq!(events[events.len() - 2], Event::Deselect);
    }

    #[test]
    fn rejected_command_aborts_sector_sequence() {
        let mut script = vec![0xFF; 6];
        script.push(0x04); // CMD24 rejected outright
        script.push(0xFF); // release

        let mut sd = sdsc(ScriptedBus::new(&script));
        let result = sd.write_blocks(&[0x80; 1024], 0, 2);
        assert!(matches!(result, Err(Error::CommandRejected(_))));

        let frames = sd.bus(|bus| bus.frames());
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn endless_busy_times_out() {
        let mut script = Vec::new();
        accept_until_response(&mut script, 0x05);
        script.extend(std::iter::repeat(0x00).take(super::BUSY_ATTEMPTS));

        let mut sd = sdsc(ScriptedBus::new(&script));
        let result = sd.write_blocks(&[0x80; 512], 0, 1);
        assert!(matches!(result, Err(Error::WriteBusyTimeout)));
    }
}
