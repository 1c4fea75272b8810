//! APDU command definitions
//!
//! This module provides the generic [`Command`] type and its encoding
//! according to ISO/IEC 7816-4, in both short and extended form.

pub mod error;
pub mod iso7816;

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

pub use error::CommandError;

/// Largest data field a short APDU can carry
pub const SHORT_MAX_DATA: usize = 0xFF;

/// Largest data field an extended APDU can carry
pub const EXTENDED_MAX_DATA: usize = 0xFFFF;

/// Trailing-length directive (Le) of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpectedLength {
    /// Ask for an exact number of response bytes (1..=65535)
    Exact(u16),
    /// Ask for as many bytes as the encoding allows (256 short, 65536 extended)
    Max,
}

impl ExpectedLength {
    /// Decode a short-form Le byte, where `00` stands for 256
    pub const fn from_short(le: u8) -> Self {
        if le == 0 { Self::Max } else { Self::Exact(le as u16) }
    }

    /// Decode an extended-form Le field, where `0000` stands for 65536
    pub const fn from_extended(le: u16) -> Self {
        if le == 0 { Self::Max } else { Self::Exact(le) }
    }

    /// Whether this directive can only be expressed in extended form
    const fn needs_extended(&self) -> bool {
        match self {
            Self::Exact(n) => *n > 0x100,
            Self::Max => false,
        }
    }
}

impl fmt::Display for ExpectedLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Max => f.write_str("max"),
        }
    }
}

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Trailing-length directive (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with a trailing-length directive
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the trailing-length directive
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Command data, if any
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Encode as a short APDU
    pub fn to_bytes(&self) -> Result<Bytes, CommandError> {
        self.encode(false)
    }

    /// Encode the command, using the extended form when allowed and needed
    ///
    /// With `extended` set, a `Max` trailing length, an exact length above 256
    /// or a data field longer than 255 bytes selects the extended form; both
    /// Lc and Le then use the extended encoding.
    pub fn encode(&self, extended: bool) -> Result<Bytes, CommandError> {
        let data_len = self.data.as_ref().map_or(0, |d| d.len());

        let use_extended = extended
            && (data_len > SHORT_MAX_DATA
                || matches!(self.le, Some(ExpectedLength::Max))
                || self.le.is_some_and(|le| le.needs_extended()));

        if use_extended {
            if data_len > EXTENDED_MAX_DATA {
                return Err(CommandError::data_too_long(data_len, EXTENDED_MAX_DATA));
            }
        } else {
            if data_len > SHORT_MAX_DATA {
                return Err(CommandError::data_too_long(data_len, SHORT_MAX_DATA));
            }
            if self.le.is_some_and(|le| le.needs_extended()) {
                return Err(CommandError::parse("Le exceeds short APDU maximum"));
            }
        }

        let mut buffer = BytesMut::with_capacity(4 + 3 + data_len + 3);

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        if use_extended {
            buffer.put_u8(0x00);
            if let Some(data) = self.data.as_ref().filter(|d| !d.is_empty()) {
                buffer.put_u16(data.len() as u16);
                buffer.put_slice(data);
            }
            match self.le {
                Some(ExpectedLength::Exact(n)) => buffer.put_u16(n),
                Some(ExpectedLength::Max) => buffer.put_u16(0x0000),
                None => {}
            }
        } else {
            if let Some(data) = self.data.as_ref().filter(|d| !d.is_empty()) {
                buffer.put_u8(data.len() as u8);
                buffer.put_slice(data);
            }
            match self.le {
                // 256 wraps to 00
                Some(ExpectedLength::Exact(n)) => buffer.put_u8(n as u8),
                Some(ExpectedLength::Max) => buffer.put_u8(0x00),
                None => {}
            }
        }

        Ok(buffer.freeze())
    }

    /// Parse a command from raw bytes (short or extended form)
    pub fn from_bytes(data: &[u8]) -> Result<Self, CommandError> {
        if data.len() < 4 {
            return Err(CommandError::InvalidLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        match &data[4..] {
            // Case 1
            [] => {}
            // Case 2S
            [le] => command.le = Some(ExpectedLength::from_short(*le)),
            // Extended cases; a short Lc is never zero
            [0x00, rest @ ..] if rest.len() >= 2 => {
                if let [le1, le2] = rest {
                    command.le = Some(ExpectedLength::from_extended(u16::from_be_bytes([
                        *le1, *le2,
                    ])));
                    return Ok(command);
                }

                let lc = u16::from_be_bytes([rest[0], rest[1]]) as usize;
                let body = &rest[2..];
                if body.len() < lc {
                    return Err(CommandError::InvalidLength(data.len()));
                }
                command.data = Some(Bytes::copy_from_slice(&body[..lc]));
                match &body[lc..] {
                    [] => {}
                    [le1, le2] => {
                        command.le = Some(ExpectedLength::from_extended(u16::from_be_bytes([
                            *le1, *le2,
                        ])));
                    }
                    _ => return Err(CommandError::InvalidLength(data.len())),
                }
            }
            // Cases 3S and 4S
            [lc, body @ ..] => {
                let lc = *lc as usize;
                if body.len() < lc {
                    return Err(CommandError::InvalidLength(data.len()));
                }
                command.data = Some(Bytes::copy_from_slice(&body[..lc]));
                match &body[lc..] {
                    [] => {}
                    [le] => command.le = Some(ExpectedLength::from_short(*le)),
                    _ => return Err(CommandError::InvalidLength(data.len())),
                }
            }
        }

        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CLA={:02X} INS={:02X} P1={:02X} P2={:02X}",
            self.cla, self.ins, self.p1, self.p2
        )?;
        if let Some(data) = &self.data {
            write!(f, " DATA={}", hex::encode_upper(data))?;
        }
        if let Some(le) = &self.le {
            write!(f, " LE={le}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_short_serialization() {
        let cmd = Command::new(0x00, 0xA4, 0x02, 0x0C).with_data(hex!("2F01").to_vec());
        assert_eq!(cmd.to_bytes().unwrap().as_ref(), hex!("00A4020C022F01"));

        let cmd = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, ExpectedLength::Max);
        assert_eq!(cmd.to_bytes().unwrap().as_ref(), hex!("00B0000000"));

        let cmd = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, ExpectedLength::Exact(256));
        assert_eq!(cmd.to_bytes().unwrap().as_ref(), hex!("00B0000000"));

        let cmd = Command::new(0x00, 0x20, 0x00, 0x80);
        assert_eq!(cmd.to_bytes().unwrap().as_ref(), hex!("00200080"));
    }

    #[test]
    fn test_extended_serialization() {
        // Case 2E
        let cmd = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, ExpectedLength::Max);
        assert_eq!(cmd.encode(true).unwrap().as_ref(), hex!("00B00000000000"));

        // Case 4E
        let cmd = Command::new(0x80, 0x2A, 0x00, 0x80)
            .with_data(hex!("0102").to_vec())
            .with_le(ExpectedLength::Max);
        assert_eq!(
            cmd.encode(true).unwrap().as_ref(),
            hex!("802A0080 000002 0102 0000")
        );

        // Nothing needs the extended form, so it stays short
        let cmd = Command::new(0x00, 0xA4, 0x02, 0x0C).with_data(hex!("2F01").to_vec());
        assert_eq!(cmd.encode(true).unwrap().as_ref(), hex!("00A4020C022F01"));
    }

    #[test]
    fn test_short_limits() {
        let cmd = Command::new(0x00, 0xD6, 0x00, 0x00).with_data(vec![0u8; 300]);
        assert!(matches!(
            cmd.to_bytes(),
            Err(CommandError::DataTooLong(300, SHORT_MAX_DATA))
        ));
        assert_eq!(cmd.encode(true).unwrap().len(), 4 + 3 + 300);

        let cmd = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, ExpectedLength::Exact(1024));
        assert!(cmd.to_bytes().is_err());
        assert_eq!(cmd.encode(true).unwrap().as_ref(), hex!("00B00000000400"));
    }

    #[test]
    fn test_command_from_bytes() {
        // Case 1
        let cmd = Command::from_bytes(&hex!("00A40400")).unwrap();
        assert_eq!((cmd.cla, cmd.ins, cmd.p1, cmd.p2), (0x00, 0xA4, 0x04, 0x00));
        assert!(cmd.data.is_none());
        assert!(cmd.le.is_none());

        // Case 2S with Le=00
        let cmd = Command::from_bytes(&hex!("00B0000000")).unwrap();
        assert_eq!(cmd.le, Some(ExpectedLength::Max));

        // Case 3S
        let cmd = Command::from_bytes(&hex!("00A4020C022F01")).unwrap();
        assert_eq!(cmd.data(), Some(hex!("2F01").as_ref()));
        assert!(cmd.le.is_none());

        // Case 4S
        let cmd = Command::from_bytes(&hex!("00A4040003010203FF")).unwrap();
        assert_eq!(cmd.data(), Some(hex!("010203").as_ref()));
        assert_eq!(cmd.le, Some(ExpectedLength::Exact(0xFF)));

        // Case 2E and 4E
        let cmd = Command::from_bytes(&hex!("00B00000000000")).unwrap();
        assert_eq!(cmd.le, Some(ExpectedLength::Max));
        let cmd = Command::from_bytes(&hex!("802A00800000020102 0000")).unwrap();
        assert_eq!(cmd.data(), Some(hex!("0102").as_ref()));
        assert_eq!(cmd.le, Some(ExpectedLength::Max));

        // Truncated data field
        assert!(Command::from_bytes(&hex!("00A4040005 0102")).is_err());
        assert!(Command::from_bytes(&hex!("00A4")).is_err());
    }

    #[test]
    fn test_command_display() {
        let cmd = Command::new(0x00, 0xCA, 0x02, 0x5F).with_le(ExpectedLength::Max);
        assert_eq!(cmd.to_string(), "CLA=00 INS=CA P1=02 P2=5F LE=max");
    }
}
