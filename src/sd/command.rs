/// CMD8 argument: supply-voltage window plus an arbitrary pattern the card
/// must echo back.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SendInterfaceCondition {
    pub voltage_supplied: bool, // 2.7-3.6V
    pub check_pattern: u8,
}

impl SendInterfaceCondition {
    pub fn spi() -> Self {
        Self { voltage_supplied: true, check_pattern: 0xAA }
    }
}

impl Into<u32> for SendInterfaceCondition {
    fn into(self) -> u32 {
        (self.voltage_supplied as u32) << 8 | self.check_pattern as u32
    }
}

pub type Address = u32;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AppCommand {
    SDSendOpCond(bool), // host-capacity-support
}

impl AppCommand {
    pub fn index(self) -> u8 {
        match self {
            Self::SDSendOpCond(_) => 41,
        }
    }

    pub fn argument(self) -> u32 {
        match self {
            Self::SDSendOpCond(hcs) => (hcs as u32) << 30,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    GoIdleState,
    SendIfCond(SendInterfaceCondition),
    ReadSingleBlock(Address),
    WriteBlock(Address),
    AppCommandPrefix,
    ReadOCR,
    App(AppCommand),
}

impl Command {
    pub fn index(self) -> u8 {
        match self {
            Self::GoIdleState => 0,
            Self::SendIfCond(_) => 8,
            Self::ReadSingleBlock(_) => 17,
            Self::WriteBlock(_) => 24,
            Self::AppCommandPrefix => 55,
            Self::ReadOCR => 58,
            Self::App(command) => command.index(),
        }
    }

    pub fn argument(self) -> u32 {
        match self {
            Self::GoIdleState | Self::AppCommandPrefix | Self::ReadOCR => 0,
            Self::SendIfCond(condition) => condition.into(),
            Self::ReadSingleBlock(address) | Self::WriteBlock(address) => address,
            Self::App(command) => command.argument(),
        }
    }

    /// The card only validates CRC for CMD0 and CMD8 in SPI mode; every
    /// other frame carries a placeholder, passed through unverified.
    pub fn crc(self) -> u8 {
        match self {
            Self::GoIdleState => 0x95,
            Self::SendIfCond(_) => 0x87,
            _ => 0x01,
        }
    }

    /// Fixed-length payload following R1: 4 bytes for R3/R7.
    pub fn trailing_len(self) -> usize {
        match self {
            Self::SendIfCond(_) | Self::ReadOCR => 4,
            _ => 0,
        }
    }
}

impl Into<[u8; 6]> for Command {
    fn into(self) -> [u8; 6] {
        let argument = u32::to_be_bytes(self.argument());
        [0x40 | self.index(), argument[0], argument[1], argument[2], argument[3], self.crc()]
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::{AppCommand, Command, SendInterfaceCondition};

    #[test]
    fn test_command_to_bytes() {
        let bytes: [u8; 6] = Command::GoIdleState.into();
        assert_eq!(bytes, hex!("40 00 00 00 00 95"));

        let bytes: [u8; 6] = Command::SendIfCond(SendInterfaceCondition::spi()).into();
        assert_eq!(bytes, hex!("48 00 00 01 AA 87"));

        let bytes: [u8; 6] = Command::App(AppCommand::SDSendOpCond(true)).into();
        assert_eq!(bytes, hex!("69 40 00 00 00 01"));

        let bytes: [u8; 6] = Command::App(AppCommand::SDSendOpCond(false)).into();
        assert_eq!(bytes, hex!("69 00 00 00 00 01"));

        let bytes: [u8; 6] = Command::ReadSingleBlock(0x0A).into();
        assert_eq!(bytes, hex!("51 00 00 00 0A 01"));

        let bytes: [u8; 6] = Command::WriteBlock(0x400).into();
        assert_eq!(bytes, hex!("58 00 00 04 00 01"));

        let bytes: [u8; 6] = Command::ReadOCR.into();
        assert_eq!(bytes, hex!("7A 00 00 00 00 01"));
    }
}
