/// Sentinel the card emits ahead of each data block, and the host ahead of
/// each written block.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(u8)]
pub enum Token {
    Start = 0xFE,
}

/// Data-response token returned after a write payload; only the low five
/// bits carry information.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Response {
    Accepted,
    CRCError,
    WriteError,
}

impl Response {
    pub fn try_from(byte: u8) -> Option<Self> {
        if byte & 0b10001 != 0b00001 {
            return None;
        }
        match (byte >> 1) & 0b111 {
            0b010 => Some(Self::Accepted),
            0b101 => Some(Self::CRCError),
            0b110 => Some(Self::WriteError),
            _ => None,
        }
    }
}
