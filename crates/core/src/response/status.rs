//! Status word definitions and classification for APDU responses

use std::fmt;

/// Semantic category of a status word (ISO/IEC 7816-4, clause 5.6)
///
/// Several raw status words share a category; scanners only ever reason in
/// categories and keep the raw word for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    /// 90 00, 61 XX
    NormalEnd,
    /// 62 81
    ReturnedDataCorrupted,
    /// 62 82
    EndOfFileReached,
    /// 62 83
    SelectedFileInvalidated,
    /// 62 84
    FileControlInfoFailure,
    /// 62 XX
    WarningUnchanged,
    /// 63 00, 63 CX
    VerificationMismatch,
    /// 63 81
    FileFilledUp,
    /// 63 XX
    WarningChanged,
    /// 64 XX
    ExecutionErrorUnchanged,
    /// 65 81
    MemoryFailure,
    /// 65 XX
    ExecutionErrorChanged,
    /// 67 00
    IncorrectLengthField,
    /// 68 81
    LogicalChannelFeatureNotSupported,
    /// 68 82
    SecureMessagingFeatureNotSupported,
    /// 68 83
    LastCommandOfChainExpected,
    /// 68 84
    CommandChainingNotSupported,
    /// 69 81
    CommandIncompatibleWithFileStructure,
    /// 69 82
    SecurityNotSatisfied,
    /// 69 83
    AuthenticationMethodBlocked,
    /// 69 84
    ReferencedDataInvalidated,
    /// 69 85
    ConditionsOfUseNotSatisfied,
    /// 69 86
    CommandNotAllowed,
    /// 69 87
    SecureMessagingDataMissing,
    /// 69 88
    SecureMessagingDataIncorrect,
    /// 6A 80
    IncorrectDataField,
    /// 6A 81
    FunctionNotSupported,
    /// 6A 82
    FileNotAccessible,
    /// 6A 83
    RecordNotFound,
    /// 6A 84
    InsufficientMemory,
    /// 6A 85
    LcInconsistentWithTlv,
    /// 6A 86, 6B 00
    IncorrectParameterBytes,
    /// 6A 87
    LcInconsistentWithParameters,
    /// 6A 88
    ReferencedDataNotFound,
    /// 6A 89
    FileAlreadyExists,
    /// 6A 8A
    DfNameAlreadyExists,
    /// 6C XX
    WrongLeField,
    /// 6D 00
    InstructionNotSupported,
    /// 6E 00
    ClassNotSupported,
    /// 6F 00
    NoPreciseDiagnosis,
    /// Anything not covered above
    Unknown,
}

impl StatusCategory {
    /// Name of the category
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NormalEnd => "NormalEnd",
            Self::ReturnedDataCorrupted => "ReturnedDataCorrupted",
            Self::EndOfFileReached => "EndOfFileReached",
            Self::SelectedFileInvalidated => "SelectedFileInvalidated",
            Self::FileControlInfoFailure => "FileControlInfoFailure",
            Self::WarningUnchanged => "WarningUnchanged",
            Self::VerificationMismatch => "VerificationMismatch",
            Self::FileFilledUp => "FileFilledUp",
            Self::WarningChanged => "WarningChanged",
            Self::ExecutionErrorUnchanged => "ExecutionErrorUnchanged",
            Self::MemoryFailure => "MemoryFailure",
            Self::ExecutionErrorChanged => "ExecutionErrorChanged",
            Self::IncorrectLengthField => "IncorrectLengthField",
            Self::LogicalChannelFeatureNotSupported => "LogicalChannelFeatureNotSupported",
            Self::SecureMessagingFeatureNotSupported => "SecureMessagingFeatureNotSupported",
            Self::LastCommandOfChainExpected => "LastCommandOfChainExpected",
            Self::CommandChainingNotSupported => "CommandChainingNotSupported",
            Self::CommandIncompatibleWithFileStructure => "CommandIncompatibleWithFileStructure",
            Self::SecurityNotSatisfied => "SecurityNotSatisfied",
            Self::AuthenticationMethodBlocked => "AuthenticationMethodBlocked",
            Self::ReferencedDataInvalidated => "ReferencedDataInvalidated",
            Self::ConditionsOfUseNotSatisfied => "ConditionsOfUseNotSatisfied",
            Self::CommandNotAllowed => "CommandNotAllowed",
            Self::SecureMessagingDataMissing => "SecureMessagingDataMissing",
            Self::SecureMessagingDataIncorrect => "SecureMessagingDataIncorrect",
            Self::IncorrectDataField => "IncorrectDataField",
            Self::FunctionNotSupported => "FunctionNotSupported",
            Self::FileNotAccessible => "FileNotAccessible",
            Self::RecordNotFound => "RecordNotFound",
            Self::InsufficientMemory => "InsufficientMemory",
            Self::LcInconsistentWithTlv => "LcInconsistentWithTlv",
            Self::IncorrectParameterBytes => "IncorrectParameterBytes",
            Self::LcInconsistentWithParameters => "LcInconsistentWithParameters",
            Self::ReferencedDataNotFound => "ReferencedDataNotFound",
            Self::FileAlreadyExists => "FileAlreadyExists",
            Self::DfNameAlreadyExists => "DfNameAlreadyExists",
            Self::WrongLeField => "WrongLeField",
            Self::InstructionNotSupported => "InstructionNotSupported",
            Self::ClassNotSupported => "ClassNotSupported",
            Self::NoPreciseDiagnosis => "NoPreciseDiagnosis",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Status Word (SW1-SW2) from an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create from a u16 value (SW1 | SW2)
    pub const fn from_u16(status: u16) -> Self {
        Self {
            sw1: (status >> 8) as u8,
            sw2: status as u8,
        }
    }

    /// Convert to a u16 value (SW1 | SW2)
    pub const fn to_u16(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Check if this status word indicates more data is available (61 XX)
    pub const fn is_more_data_available(&self) -> bool {
        self.sw1 == 0x61
    }

    /// Get the number of remaining bytes when SW1 = 61
    pub const fn remaining_bytes(&self) -> Option<u8> {
        if self.sw1 == 0x61 {
            Some(self.sw2)
        } else {
            None
        }
    }

    /// Classify this status word
    pub const fn category(&self) -> StatusCategory {
        use StatusCategory::*;

        match (self.sw1, self.sw2) {
            (0x90, 0x00) | (0x61, _) => NormalEnd,
            (0x62, 0x81) => ReturnedDataCorrupted,
            (0x62, 0x82) => EndOfFileReached,
            (0x62, 0x83) => SelectedFileInvalidated,
            (0x62, 0x84) => FileControlInfoFailure,
            (0x62, _) => WarningUnchanged,
            (0x63, 0x00) => VerificationMismatch,
            (0x63, n) if (n & 0xF0) == 0xC0 => VerificationMismatch,
            (0x63, 0x81) => FileFilledUp,
            (0x63, _) => WarningChanged,
            (0x64, _) => ExecutionErrorUnchanged,
            (0x65, 0x81) => MemoryFailure,
            (0x65, _) => ExecutionErrorChanged,
            (0x67, 0x00) => IncorrectLengthField,
            (0x68, 0x81) => LogicalChannelFeatureNotSupported,
            (0x68, 0x82) => SecureMessagingFeatureNotSupported,
            (0x68, 0x83) => LastCommandOfChainExpected,
            (0x68, 0x84) => CommandChainingNotSupported,
            (0x69, 0x81) => CommandIncompatibleWithFileStructure,
            (0x69, 0x82) => SecurityNotSatisfied,
            (0x69, 0x83) => AuthenticationMethodBlocked,
            (0x69, 0x84) => ReferencedDataInvalidated,
            (0x69, 0x85) => ConditionsOfUseNotSatisfied,
            (0x69, 0x86) => CommandNotAllowed,
            (0x69, 0x87) => SecureMessagingDataMissing,
            (0x69, 0x88) => SecureMessagingDataIncorrect,
            (0x6A, 0x80) => IncorrectDataField,
            (0x6A, 0x81) => FunctionNotSupported,
            (0x6A, 0x82) => FileNotAccessible,
            (0x6A, 0x83) => RecordNotFound,
            (0x6A, 0x84) => InsufficientMemory,
            (0x6A, 0x85) => LcInconsistentWithTlv,
            (0x6A, 0x86) | (0x6B, 0x00) => IncorrectParameterBytes,
            (0x6A, 0x87) => LcInconsistentWithParameters,
            (0x6A, 0x88) => ReferencedDataNotFound,
            (0x6A, 0x89) => FileAlreadyExists,
            (0x6A, 0x8A) => DfNameAlreadyExists,
            (0x6C, _) => WrongLeField,
            (0x6D, 0x00) => InstructionNotSupported,
            (0x6E, 0x00) => ClassNotSupported,
            (0x6F, 0x00) => NoPreciseDiagnosis,
            _ => Unknown,
        }
    }

    /// Retry counter carried by a verification failure (63 CX)
    ///
    /// `None` means the card reports no bounded counter.
    pub const fn remaining_attempts(&self) -> Option<u8> {
        if self.sw1 == 0x63 && (self.sw2 & 0xF0) == 0xC0 {
            Some(self.sw2 & 0x0F)
        } else {
            None
        }
    }

    /// Get a description of this status word
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "Success",
            (0x61, _) => "More data available",
            (0x62, 0x00) => "No information given",
            (0x62, 0x81) => "Part of returned data may be corrupted",
            (0x62, 0x82) => "End of file/record reached before reading Le bytes",
            (0x62, 0x83) => "Selected file invalidated",
            (0x62, 0x84) => "FCI not formatted according to specification",
            (0x63, 0x00) => "Verification failed",
            (0x63, 0x81) => "File filled up by the last write",
            (0x63, n) if (n & 0xF0) == 0xC0 => "Verification failed, counter value",
            (0x64, 0x00) => "State of non-volatile memory unchanged",
            (0x65, 0x00) => "State of non-volatile memory changed",
            (0x65, 0x81) => "Memory failure",
            (0x67, 0x00) => "Wrong length",
            (0x68, 0x81) => "Logical channel not supported",
            (0x68, 0x82) => "Secure messaging not supported",
            (0x68, 0x83) => "Last command of the chain expected",
            (0x68, 0x84) => "Command chaining not supported",
            (0x69, 0x81) => "Command incompatible with file structure",
            (0x69, 0x82) => "Security status not satisfied",
            (0x69, 0x83) => "Authentication method blocked",
            (0x69, 0x84) => "Referenced data invalidated",
            (0x69, 0x85) => "Conditions of use not satisfied",
            (0x69, 0x86) => "Command not allowed",
            (0x69, 0x87) => "Expected SM data objects missing",
            (0x69, 0x88) => "SM data objects incorrect",
            (0x6A, 0x80) => "Incorrect parameters in the data field",
            (0x6A, 0x81) => "Function not supported",
            (0x6A, 0x82) => "File not found",
            (0x6A, 0x83) => "Record not found",
            (0x6A, 0x84) => "Not enough memory space in the file",
            (0x6A, 0x85) => "Lc inconsistent with TLV structure",
            (0x6A, 0x86) => "Incorrect parameters P1-P2",
            (0x6A, 0x87) => "Lc inconsistent with P1-P2",
            (0x6A, 0x88) => "Referenced data not found",
            (0x6A, 0x89) => "File already exists",
            (0x6A, 0x8A) => "DF name already exists",
            (0x6B, 0x00) => "Wrong parameters P1-P2",
            (0x6C, _) => "Wrong Le field",
            (0x6D, 0x00) => "Instruction code not supported or invalid",
            (0x6E, 0x00) => "Class not supported",
            (0x6F, 0x00) => "No precise diagnosis",
            _ => "Unknown status word",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from(tuple: (u8, u8)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self::from_u16(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.sw1, self.sw2)
    }
}

/// Common status words
pub mod common {
    use super::StatusWord;

    /// Success (90 00)
    pub const SUCCESS: StatusWord = StatusWord::new(0x90, 0x00);

    /// Selected file's FCI not formatted according to ISO 7816-4 (62 84)
    pub const FCI_FORMAT_ERROR: StatusWord = StatusWord::new(0x62, 0x84);

    /// Verification failed without a counter (63 00)
    pub const VERIFICATION_FAILED: StatusWord = StatusWord::new(0x63, 0x00);

    /// Wrong length (67 00)
    pub const WRONG_LENGTH: StatusWord = StatusWord::new(0x67, 0x00);

    /// Logical channel not supported (68 81)
    pub const LOGICAL_CHANNEL_NOT_SUPPORTED: StatusWord = StatusWord::new(0x68, 0x81);

    /// Secure messaging not supported (68 82)
    pub const SECURE_MESSAGING_NOT_SUPPORTED: StatusWord = StatusWord::new(0x68, 0x82);

    /// Command incompatible with file structure (69 81)
    pub const COMMAND_INCOMPATIBLE: StatusWord = StatusWord::new(0x69, 0x81);

    /// Security condition not satisfied (69 82)
    pub const SECURITY_CONDITION_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x82);

    /// Command not allowed (69 86)
    pub const COMMAND_NOT_ALLOWED: StatusWord = StatusWord::new(0x69, 0x86);

    /// Function not supported (6A 81)
    pub const FUNCTION_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6A, 0x81);

    /// File not found (6A 82)
    pub const FILE_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x82);

    /// Record not found (6A 83)
    pub const RECORD_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x83);

    /// Incorrect parameters P1-P2 (6A 86)
    pub const INCORRECT_P1P2: StatusWord = StatusWord::new(0x6A, 0x86);

    /// Referenced data not found (6A 88)
    pub const REFERENCED_DATA_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x88);

    /// Invalid instruction (6D 00)
    pub const INVALID_INSTRUCTION: StatusWord = StatusWord::new(0x6D, 0x00);

    /// Class not supported (6E 00)
    pub const CLASS_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6E, 0x00);
}
