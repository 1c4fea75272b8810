//! Error types for scans

use scout_apdu_core::{FileId, StatusCategory, StatusWord};

/// Errors that abort a scan
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// A range bound lies outside its domain; raised before any probe
    #[error("Argument `{name}` out of range: {value:#X} (0x00 <= {name} <= {max:#X})")]
    OutOfRange {
        /// Name of the offending bound
        name: &'static str,
        /// Value supplied
        value: u32,
        /// Largest accepted value
        max: u32,
    },

    /// Selecting a file returned a status that is neither success nor "no such file"
    #[error("Unexpected status {status} ({category}) while selecting EF {file_id}")]
    UnexpectedStatus {
        /// File being selected
        file_id: FileId,
        /// Status returned by the card
        status: StatusWord,
        /// Category of the status
        category: StatusCategory,
    },

    /// Probe could not be exchanged with the card
    #[error(transparent)]
    Apdu(#[from] scout_apdu_core::Error),
}

impl ScanError {
    /// Create an unexpected status error for a file selection
    pub const fn unexpected_status(file_id: FileId, status: StatusWord) -> Self {
        Self::UnexpectedStatus {
            file_id,
            status,
            category: status.category(),
        }
    }
}

/// Result type for scans
pub type Result<T, E = ScanError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScanError::OutOfRange {
            name: "cla_end",
            value: 0x101,
            max: 0x100,
        };
        assert_eq!(
            err.to_string(),
            "Argument `cla_end` out of range: 0x101 (0x00 <= cla_end <= 0x100)"
        );

        let err = ScanError::unexpected_status(FileId::new(0x2F01), StatusWord::new(0x69, 0x82));
        assert_eq!(
            err.to_string(),
            "Unexpected status 6982 (SecurityNotSatisfied) while selecting EF 2F01"
        );
    }
}
