//! Core types for probing smart cards with APDUs
//!
//! This crate provides the foundational pieces used to talk to ISO/IEC 7816-4
//! cards one command at a time:
//!
//! - Encoding commands in short or extended form, with an optional
//!   trailing-length directive
//! - Parsing responses and classifying their status words into
//!   [`StatusCategory`] values
//! - The [`CardTransport`] abstraction over physical readers
//! - The [`Executor`] probe dispatcher and its inter-industry helpers
//!   ([`Iso7816Ext`])
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod executor;
pub mod response;
pub mod transport;

mod error;
pub use error::{Error, Result, ResultExt};

pub use command::iso7816::{DataObjectTag, FileId};
pub use command::{Command, CommandError, ExpectedLength};
pub use executor::{CardExecutor, Executor, ExecutorConfig, Iso7816Ext};
pub use response::status::{StatusCategory, StatusWord};
pub use response::{Response, utils};
pub use transport::{CardTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, CardTransport, Command, DataObjectTag, Error, ExpectedLength, FileId,
        Iso7816Ext, Response, Result, StatusCategory, StatusWord, TransportError,
        executor::Executor,
    };
}
