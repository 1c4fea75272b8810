//! Simulated card used by the scanner tests

#![allow(dead_code, unreachable_pub)]

use std::fmt;

use scout_apdu_core::{Bytes, CardExecutor, CardTransport, Command, TransportError};

type Responder = Box<dyn FnMut(&Command) -> Vec<u8>>;

/// Card whose answers come from a closure over the decoded command
pub struct SimulatedCard {
    respond: Responder,
    /// Every command received, in order
    pub commands: Vec<Command>,
}

impl fmt::Debug for SimulatedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedCard")
            .field("commands", &self.commands.len())
            .finish()
    }
}

impl SimulatedCard {
    pub fn new(respond: impl FnMut(&Command) -> Vec<u8> + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            commands: Vec::new(),
        }
    }

    /// Commands received with the given instruction byte
    pub fn sent_with_ins(&self, ins: u8) -> Vec<&Command> {
        self.commands.iter().filter(|c| c.ins == ins).collect()
    }
}

impl CardTransport for SimulatedCard {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        let command = Command::from_bytes(command)
            .map_err(|e| TransportError::other(format!("unparsable command: {e}")))?;
        let response = (self.respond)(&command);
        self.commands.push(command);
        Ok(Bytes::from(response))
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.commands.clear();
        Ok(())
    }
}

/// Status-only response
pub fn sw(status: u16) -> Vec<u8> {
    status.to_be_bytes().to_vec()
}

/// Response carrying data followed by `9000`
pub fn ok_with(data: &[u8]) -> Vec<u8> {
    let mut response = data.to_vec();
    response.extend_from_slice(&[0x90, 0x00]);
    response
}

pub fn executor(respond: impl FnMut(&Command) -> Vec<u8> + 'static) -> CardExecutor<SimulatedCard> {
    CardExecutor::new(SimulatedCard::new(respond))
}

/// Commands the simulated card received through `executor`
pub fn sent(executor: &CardExecutor<SimulatedCard>) -> &[Command] {
    &executor.transport().commands
}
