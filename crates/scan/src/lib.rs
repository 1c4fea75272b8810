//! Command-space discovery for ISO/IEC 7816-4 cards
//!
//! A [`Scanner`] drives an [`Executor`](scout_apdu_core::Executor) through
//! bounded numeric ranges and reports which of them the card recognizes:
//!
//! - class/instruction pairs ([`Scanner::list_cla_ins`])
//! - parameter pairs of one instruction ([`Scanner::list_p1_p2`])
//! - elementary files, with inferred [`FileAttributes`] ([`Scanner::list_ef`])
//! - data objects reachable with GET DATA ([`Scanner::list_do`])
//!
//! Every scan is sequential: one probe in flight, results in probe order.
//! Absence is never an error. Only out-of-range arguments and unexpected
//! statuses during file selection abort a scan.
//!
//! ```no_run
//! # fn run<T: scout_apdu_core::CardTransport>(transport: T) -> Result<(), scout_scan::ScanError> {
//! use scout_apdu_core::CardExecutor;
//! use scout_scan::Scanner;
//!
//! let mut executor = CardExecutor::new(transport);
//! let mut scanner = Scanner::new(&mut executor);
//! for entry in scanner.list_ef(0x00, 0x0000..0x0100)? {
//!     println!("{entry}");
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attribute;
mod cla_ins;
mod data_object;
mod ef;
mod error;
mod p1_p2;
mod policy;
mod progress;
mod scanner;

pub use attribute::{FileAttributes, SIGNATURE_PROBE};
pub use cla_ins::ClaInsEntry;
pub use data_object::{DataObjectEntry, ONE_BYTE_TAGS, TWO_BYTE_TAGS};
pub use ef::EfEntry;
pub use error::{Result, ScanError};
pub use p1_p2::P1P2Entry;
pub use policy::Action;
pub use progress::{NoProgress, ScanProgress};
pub use scanner::{BYTE_RANGE_MAX, FILE_ID_RANGE_MAX, Scanner};
