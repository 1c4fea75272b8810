//! File attribute inference
//!
//! The card is never asked what a file is. Instead a fixed sequence of
//! probes runs against the selected file and the statuses they provoke
//! decide the attributes:
//!
//! 1. VERIFY without reference data. A verification mismatch marks a PIN
//!    and ends the inference.
//! 2. EXTERNAL AUTHENTICATE without data. A verification mismatch marks an
//!    authentication key; inference continues.
//! 3. COMPUTE DIGITAL SIGNATURE over [`SIGNATURE_PROBE`]. Success, or a
//!    security status not satisfied, marks a signature key. Any key found
//!    in steps 2 and 3 ends the inference.
//! 4. READ BINARY, then 5. READ RECORD, each resolving to a file type or
//!    to "verification required".

use bitflags::bitflags;
use scout_apdu_core::{Executor, FileId, Iso7816Ext, Response, StatusCategory, StatusWord};
use tracing::{debug, instrument};

use crate::error::{Result, ScanError};
use crate::scanner::Scanner;

bitflags! {
    /// Inferred attributes of an elementary file
    ///
    /// The empty set is [`FileAttributes::UNKNOWN`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileAttributes: u32 {
        /// Nothing could be inferred
        const UNKNOWN = 0x0000_0000;
        /// Readable with READ BINARY
        const TRANSPARENT_FILE = 0x0000_0001;
        /// Readable with READ RECORD
        const RECORD_FILE = 0x0000_0002;
        /// Reference data for VERIFY (a PIN)
        const VERIFY_KEY = 0x0000_0010;
        /// Key for INTERNAL AUTHENTICATE (never inferred)
        const INTERNAL_AUTH_KEY = 0x0000_0020;
        /// Key for EXTERNAL AUTHENTICATE
        const EXTERNAL_AUTH_KEY = 0x0000_0040;
        /// No attempts left
        const LOCKED = 0x0000_0100;
        /// Access requires a prior verification
        const VERIFICATION_REQUIRED = 0x0000_0200;
        /// The card reports no retry counter
        const VERIFICATION_UNLIMITED = 0x0000_0400;
        /// Private key usable for COMPUTE DIGITAL SIGNATURE
        const SIGNATURE_KEY = 0x0000_1000;
    }
}

impl FileAttributes {
    /// Whether nothing could be inferred
    pub const fn is_unknown(&self) -> bool {
        self.is_empty()
    }

    /// Key flag plus the retry counter flags reported by a verification mismatch
    fn key_with_counter(key: Self, status: StatusWord) -> Self {
        match status.remaining_attempts() {
            None => key | Self::VERIFICATION_UNLIMITED,
            Some(0) => key | Self::LOCKED,
            Some(_) => key,
        }
    }
}

impl std::fmt::Display for FileAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("UNKNOWN");
        }
        bitflags::parser::to_writer(self, f)
    }
}

/// DigestInfo handed to the signature probe: a SHA-256 prefix followed by
/// the digest of the empty string
pub const SIGNATURE_PROBE: [u8; 51] = [
    0x30, 0x31, 0x30, 0x0B, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20, 0xE3, 0xB0, 0xC4, 0x42, 0x98, 0xFC, 0x1C, 0x14, 0x9A, 0xFB, 0xF4,
    0xC8, 0x99, 0x6F, 0xB9, 0x24, 0x27, 0xAE, 0x41, 0xE4, 0x64, 0x9B, 0x93, 0x4C, 0xA4, 0x95,
    0x99, 0x1B, 0x78, 0x52, 0xB8, 0x55,
];

/// Whether a SELECT status means the file exists
pub(crate) const fn is_selectable(category: StatusCategory) -> bool {
    matches!(
        category,
        StatusCategory::NormalEnd | StatusCategory::FileControlInfoFailure
    )
}

/// Outcome of a read probe: the file type on success, "verification
/// required" when access is denied
fn read_outcome(response: &Response, file_type: FileAttributes) -> Option<FileAttributes> {
    match response.category() {
        StatusCategory::NormalEnd => Some(file_type),
        StatusCategory::SecurityNotSatisfied => Some(FileAttributes::VERIFICATION_REQUIRED),
        _ => None,
    }
}

impl<E: Executor + ?Sized> Scanner<'_, E> {
    /// Select `file_id` and infer its attributes
    ///
    /// Fails with [`ScanError::UnexpectedStatus`] when the file cannot be
    /// selected.
    #[instrument(level = "debug", skip(self), fields(file_id = %file_id))]
    pub fn attribute_ef(&mut self, file_id: FileId, cla: u8) -> Result<FileAttributes> {
        let selected = self.executor.select_ef(file_id, cla)?;
        if !is_selectable(selected.category()) {
            return Err(ScanError::unexpected_status(file_id, selected.status()));
        }
        self.classify_selected(cla)
    }

    /// Infer the attributes of the currently selected file
    pub(crate) fn classify_selected(&mut self, cla: u8) -> Result<FileAttributes> {
        let verify = self.executor.verify(None, cla)?;
        debug!(status = %verify.status(), "VERIFY probe");
        if verify.category() == StatusCategory::VerificationMismatch {
            return Ok(FileAttributes::key_with_counter(
                FileAttributes::VERIFY_KEY,
                verify.status(),
            ));
        }

        let mut attributes = FileAttributes::UNKNOWN;

        let authenticate = self.executor.external_authenticate(None, cla)?;
        debug!(status = %authenticate.status(), "EXTERNAL AUTHENTICATE probe");
        if authenticate.category() == StatusCategory::VerificationMismatch {
            attributes = FileAttributes::key_with_counter(
                FileAttributes::EXTERNAL_AUTH_KEY,
                authenticate.status(),
            );
        }

        let signature = self.executor.compute_signature(&SIGNATURE_PROBE)?;
        debug!(status = %signature.status(), "COMPUTE DIGITAL SIGNATURE probe");
        match signature.category() {
            StatusCategory::NormalEnd => attributes |= FileAttributes::SIGNATURE_KEY,
            StatusCategory::SecurityNotSatisfied => {
                attributes |= FileAttributes::SIGNATURE_KEY | FileAttributes::VERIFICATION_REQUIRED;
            }
            _ => {}
        }
        if !attributes.is_unknown() {
            return Ok(attributes);
        }

        let binary = self.executor.read_binary(cla)?;
        debug!(status = %binary.status(), "READ BINARY probe");
        if let Some(attributes) = read_outcome(&binary, FileAttributes::TRANSPARENT_FILE) {
            return Ok(attributes);
        }

        let record = self.executor.read_record(cla)?;
        debug!(status = %record.status(), "READ RECORD probe");
        Ok(read_outcome(&record, FileAttributes::RECORD_FILE).unwrap_or(FileAttributes::UNKNOWN))
    }
}
