use bitfield::Bit;

#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct R1(pub u8);

impl Default for R1 {
    fn default() -> Self {
        Self(0xFF)
    }
}

impl R1 {
    /// A response byte has bit 7 clear; anything else is the idle line.
    pub fn valid(self) -> bool {
        !self.0.bit(7)
    }

    /// In-idle-state pattern, expected while the card is still resetting.
    pub fn idle(self) -> bool {
        self.0 == 0x01
    }

    /// All state and error bits clear; the card takes data commands.
    pub fn ready(self) -> bool {
        self.0 == 0x00
    }
}

/// OCR contents as returned by CMD58.
#[derive(Copy, Clone, Default, Debug)]
#[repr(C)]
pub struct R3(pub u32);

impl R3 {
    pub fn card_capacity_status(self) -> bool {
        self.0.bit(30)
    }
}

/// CMD8 echo: accepted voltage window in the second byte from the bottom,
/// check pattern in the lowest.
#[derive(Copy, Clone, Default, Debug)]
pub struct R7(pub u32);

impl R7 {
    pub fn voltage_accepted(self) -> bool {
        (self.0 >> 8) & 0xFF == 0x01
    }

    pub fn echo_back_check_pattern(self) -> u8 {
        self.0 as u8
    }
}

#[derive(Copy, Clone, Default)]
pub struct Response {
    pub r1: R1,
    pub ex: u32,
}
