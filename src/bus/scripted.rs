//! Deterministic bus double for driver tests: canned reply bytes plus a
//! recording of everything the driver did to the bus.

use std::collections::VecDeque;

use super::{Bus, Speed};
use crate::sd::FILL;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    Select,
    Deselect,
    Speed(Speed),
    Exchange { tx: u8, rx: u8 },
}

pub struct ScriptedBus {
    replies: VecDeque<u8>,
    pub events: Vec<Event>,
}

impl ScriptedBus {
    pub fn new(replies: &[u8]) -> Self {
        Self { replies: replies.iter().copied().collect(), events: Vec::new() }
    }

    /// Bytes the driver transmitted, in order.
    pub fn sent(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Exchange { tx, .. } => Some(*tx),
                _ => None,
            })
            .collect()
    }

    /// Command frames recovered from the transmit stream. Reliable only
    /// while no raw data phase has been clocked out, or up to the first one.
    pub fn frames(&self) -> Vec<[u8; 6]> {
        let sent = self.sent();
        let mut frames = Vec::new();
        let mut index = 0;
        while index < sent.len() {
            if sent[index] & 0xC0 == 0x40 && index + 6 <= sent.len() {
                let mut frame = [0u8; 6];
                frame.copy_from_slice(&sent[index..index + 6]);
                frames.push(frame);
                index += 6;
            } else {
                index += 1;
            }
        }
        frames
    }

    pub fn exchanges(&self) -> usize {
        self.events.iter().filter(|event| matches!(event, Event::Exchange { .. })).count()
    }
}

impl Bus for ScriptedBus {
    type Error = core::convert::Infallible;

    fn exchange(&mut self, byte: u8) -> Result<u8, Self::Error> {
        // An exhausted script behaves like an idle line.
        let rx = self.replies.pop_front().unwrap_or(FILL);
        self.events.push(Event::Exchange { tx: byte, rx });
        Ok(rx)
    }

    fn select(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::Select);
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::Deselect);
        Ok(())
    }

    fn set_speed(&mut self, speed: Speed) -> Result<(), Self::Error> {
        self.events.push(Event::Speed(speed));
        Ok(())
    }
}
