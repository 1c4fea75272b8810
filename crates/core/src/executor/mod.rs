//! Executor for APDU command execution
//!
//! An executor is the single entry point through which probes reach a card:
//! it encodes a [`Command`], exchanges it over a [`CardTransport`] and parses
//! the answer. Status words are returned as data, never turned into errors.

pub mod ext;

use std::fmt;

use bytes::{Bytes, BytesMut};
use tracing::{debug, instrument, trace};

use crate::command::{Command, iso7816};
use crate::error::ResultExt;
use crate::response::Response;
use crate::transport::CardTransport;
use crate::{Error, Result};

pub use ext::Iso7816Ext;

/// Trait for APDU command execution
pub trait Executor: fmt::Debug {
    /// Transmit raw APDU bytes
    #[instrument(level = "trace", skip(self), fields(executor = std::any::type_name::<Self>()))]
    fn transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        trace!(command = %hex::encode_upper(command), "Transmitting command");
        let response = self.do_transmit(command);
        match &response {
            Ok(bytes) => {
                trace!(response = %hex::encode_upper(bytes), "Received response");
            }
            Err(err) => {
                debug!(error = ?err, "Error during transmission");
            }
        }
        response
    }

    /// Internal implementation of transmit
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes>;

    /// Whether commands are encoded in extended form when they need it
    fn extended_apdu(&self) -> bool {
        false
    }

    /// Execute a command and return the card's response, whatever its status
    fn execute(&mut self, command: &Command) -> Result<Response> {
        let command_bytes = command.encode(self.extended_apdu())?;
        let response_bytes = self.transmit(&command_bytes)?;
        let response = Response::from_bytes(&response_bytes)?;
        trace!(
            %command,
            status = %response.status(),
            category = %response.category(),
            "Executed command"
        );
        Ok(response)
    }

    /// Reset the executor, including the transport
    fn reset(&mut self) -> Result<()>;
}

/// Configuration for [`CardExecutor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Encode commands in extended form when they need it
    pub extended_apdu: bool,
    /// Follow `61XX` with GET RESPONSE
    pub get_response: bool,
    /// Maximum number of chained GET RESPONSE commands
    pub max_chain: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            extended_apdu: false,
            get_response: true,
            max_chain: 10,
        }
    }
}

impl ExecutorConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether extended APDUs are allowed
    pub const fn with_extended_apdu(mut self, extended_apdu: bool) -> Self {
        self.extended_apdu = extended_apdu;
        self
    }

    /// Set whether `61XX` is followed by GET RESPONSE
    pub const fn with_get_response(mut self, get_response: bool) -> Self {
        self.get_response = get_response;
        self
    }

    /// Set the GET RESPONSE chain limit
    pub const fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }
}

/// Card executor combining a transport with GET RESPONSE handling
#[derive(Debug)]
pub struct CardExecutor<T: CardTransport> {
    /// The transport used for communication
    transport: T,
    /// Executor configuration
    config: ExecutorConfig,
    /// The last response received
    last_response: Option<Bytes>,
}

impl<T: CardTransport> CardExecutor<T> {
    /// Create a new card executor with the given transport
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ExecutorConfig::default())
    }

    /// Create a new card executor with a custom configuration
    pub const fn with_config(transport: T, config: ExecutorConfig) -> Self {
        Self {
            transport,
            config,
            last_response: None,
        }
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Get the executor configuration
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Get the last response received
    pub const fn last_response(&self) -> Option<&Bytes> {
        self.last_response.as_ref()
    }

    /// Collect the remainder of a `61XX` response with GET RESPONSE
    ///
    /// GET RESPONSE is sent on the logical channel of the command that
    /// produced the first response, identified by its class byte `cla`.
    fn follow_get_response(&mut self, cla: u8, mut response: Response) -> Result<Response> {
        let get_response_cla = iso7816::get_response_class(cla);
        let mut chain_count = 0;

        while let Some(available) = response.status().remaining_bytes() {
            if chain_count >= self.config.max_chain {
                return Err(Error::ChainLimitExceeded(chain_count));
            }

            let get_response = iso7816::get_response(get_response_cla, available);
            let bytes = get_response.to_bytes()?;
            let response_bytes = self
                .transport
                .transmit_raw(&bytes)
                .context("Failed to transmit GET RESPONSE command")?;
            let next = Response::from_bytes(&response_bytes)
                .context("Failed to parse GET RESPONSE response")?;

            let mut buffer = BytesMut::new();
            buffer.extend_from_slice(response.data());
            buffer.extend_from_slice(next.data());
            let payload = (!buffer.is_empty()).then(|| buffer.freeze());

            response = Response::new(payload, next.status());
            chain_count += 1;
        }

        Ok(response)
    }
}

impl<T: CardTransport> Executor for CardExecutor<T> {
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        let response_bytes = self.transport.transmit_raw(command)?;

        let response_bytes = if self.config.get_response {
            let response = Response::from_bytes(&response_bytes)?;
            if response.status().is_more_data_available() {
                let cla = command.first().copied().unwrap_or_default();
                self.follow_get_response(cla, response)?.into()
            } else {
                response_bytes
            }
        } else {
            response_bytes
        };

        self.last_response = Some(response_bytes.clone());
        Ok(response_bytes)
    }

    fn extended_apdu(&self) -> bool {
        self.config.extended_apdu
    }

    fn reset(&mut self) -> Result<()> {
        self.transport.reset()?;
        self.last_response = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ExpectedLength;
    use crate::response::status::StatusCategory;
    use crate::transport::MockTransport;
    use hex_literal::hex;

    #[test]
    fn test_executor_basic_transmit() {
        let transport = MockTransport::with_response(Bytes::from_static(&[0x90, 0x00]));
        let mut executor = CardExecutor::new(transport);

        let response = executor.transmit(&[0x00, 0xA4, 0x04, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);
        assert_eq!(executor.last_response().unwrap().as_ref(), &[0x90, 0x00]);
    }

    #[test]
    fn test_executor_error_status_is_not_an_error() {
        let transport = MockTransport::with_response(Bytes::copy_from_slice(&hex!("6E00")));
        let mut executor = CardExecutor::new(transport);

        let response = executor.execute(&Command::new(0x80, 0x00, 0x00, 0x00)).unwrap();
        assert_eq!(response.category(), StatusCategory::ClassNotSupported);
    }

    #[test]
    fn test_executor_get_response_chain() {
        let transport = MockTransport::new(vec![
            Bytes::copy_from_slice(&hex!("0102 6102")),
            Bytes::copy_from_slice(&hex!("0304 9000")),
        ]);
        let mut executor = CardExecutor::new(transport);

        let response = executor.execute(&iso7816::read_binary(0x00)).unwrap();
        assert!(response.is_success());
        assert_eq!(response.data(), &hex!("01020304"));

        let sent = &executor.transport().commands;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].as_ref(), &hex!("00C0000002"));
    }

    #[test]
    fn test_executor_get_response_keeps_logical_channel() {
        let transport = MockTransport::new(vec![
            Bytes::copy_from_slice(&hex!("6101")),
            Bytes::copy_from_slice(&hex!("AA 9000")),
            Bytes::copy_from_slice(&hex!("6101")),
            Bytes::copy_from_slice(&hex!("BB 9000")),
        ]);
        let mut executor = CardExecutor::new(transport);

        executor.execute(&iso7816::read_binary(0x03)).unwrap();
        let response = executor.execute(&iso7816::read_binary(0x4D)).unwrap();
        assert_eq!(response.data(), &hex!("BB"));

        let sent = &executor.transport().commands;
        assert_eq!(sent[1].as_ref(), &hex!("03C0000001"));
        assert_eq!(sent[3].as_ref(), &hex!("4DC0000001"));
    }

    #[test]
    fn test_executor_get_response_limit() {
        let transport = MockTransport::with_response(Bytes::copy_from_slice(&hex!("6101")));
        let config = ExecutorConfig::new().with_max_chain(2);
        let mut executor = CardExecutor::with_config(transport, config);

        let result = executor.execute(&iso7816::read_binary(0x00));
        assert_eq!(result.unwrap_err(), Error::ChainLimitExceeded(2));
    }

    #[test]
    fn test_executor_without_get_response() {
        let transport = MockTransport::with_response(Bytes::copy_from_slice(&hex!("6110")));
        let config = ExecutorConfig::new().with_get_response(false);
        let mut executor = CardExecutor::with_config(transport, config);

        let response = executor.execute(&iso7816::read_binary(0x00)).unwrap();
        assert_eq!(response.status().remaining_bytes(), Some(0x10));
        assert_eq!(executor.transport().commands.len(), 1);
    }

    #[test]
    fn test_executor_extended_encoding() {
        let transport = MockTransport::with_response(Bytes::copy_from_slice(&hex!("9000")));
        let config = ExecutorConfig::new().with_extended_apdu(true);
        let mut executor = CardExecutor::with_config(transport, config);

        let command = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, ExpectedLength::Max);
        executor.execute(&command).unwrap();
        assert_eq!(
            executor.transport().commands[0].as_ref(),
            &hex!("00B00000000000")
        );
    }

    #[test]
    fn test_executor_transport_failure() {
        let mut transport = MockTransport::new(Vec::new());
        transport.connected = false;
        let mut executor = CardExecutor::new(transport);

        let result = executor.execute(&iso7816::read_record(0x00));
        assert_eq!(
            result.unwrap_err(),
            Error::Transport(crate::transport::TransportError::Connection)
        );
    }
}
