//! PC/SC transport implementation for APDU probing
//!
//! This crate provides an implementation of the `CardTransport` trait from
//! `scout-apdu-core` using the PC/SC API for communication with smart cards.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use scout_apdu_core::{CardExecutor, Executor, FileId, Iso7816Ext};
//! use scout_apdu_transport_pcsc::{ConnectStrategy, PcscConfig, PcscDeviceManager};
//!
//! let manager = PcscDeviceManager::new()?;
//! let transport = manager.connect_strategy(ConnectStrategy::AnyCard, PcscConfig::default())?;
//! let mut executor = CardExecutor::new(transport);
//!
//! let response = executor.select_ef(FileId::new(0x2F01), 0x00)?;
//! println!("SELECT returned {} ({})", response.status(), response.category());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod reader;
mod transport;
mod util;

pub use config::{ConnectStrategy, PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
