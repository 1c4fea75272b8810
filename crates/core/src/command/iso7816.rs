//! ISO/IEC 7816-4 inter-industry commands used for probing
//!
//! Every builder returns a plain [`Command`]; none of them interpret the
//! card's answer.

use std::fmt;

use bytes::Bytes;

use super::{Command, ExpectedLength};

/// Instruction codes
pub mod ins {
    /// VERIFY
    pub const VERIFY: u8 = 0x20;
    /// PERFORM SECURITY OPERATION: COMPUTE DIGITAL SIGNATURE (proprietary class)
    pub const COMPUTE_DIGITAL_SIGNATURE: u8 = 0x2A;
    /// EXTERNAL AUTHENTICATE
    pub const EXTERNAL_AUTHENTICATE: u8 = 0x82;
    /// SELECT
    pub const SELECT: u8 = 0xA4;
    /// READ BINARY
    pub const READ_BINARY: u8 = 0xB0;
    /// READ RECORD
    pub const READ_RECORD: u8 = 0xB2;
    /// GET RESPONSE
    pub const GET_RESPONSE: u8 = 0xC0;
    /// GET DATA
    pub const GET_DATA: u8 = 0xCA;
}

/// Parameter values for SELECT (P1)
pub mod select_p1 {
    /// Select EF under the current DF
    pub const EF_UNDER_CURRENT_DF: u8 = 0x02;
    /// Select by DF name
    pub const BY_NAME: u8 = 0x04;
}

/// Parameter values for SELECT (P2)
pub mod select_p2 {
    /// Return no response data
    pub const NO_RESPONSE_DATA: u8 = 0x0C;
}

/// Reference qualifier (P2) for VERIFY and EXTERNAL AUTHENTICATE:
/// specific reference data of the currently selected EF
pub const CURRENT_EF_REFERENCE: u8 = 0x80;

/// Class byte of the proprietary signature command
pub const SIGNATURE_CLA: u8 = 0x80;

/// P2 of READ RECORD addressing record number P1 of the current EF
const READ_RECORD_CURRENT_EF: u8 = 0x04;

/// P1 of GET DATA selecting a SIMPLE-TLV tag in P2
const GET_DATA_SIMPLE_TLV: u8 = 0x02;

/// 2-byte file identifier, most significant byte first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub [u8; 2]);

impl FileId {
    /// Create a file identifier from its numeric value
    pub const fn new(id: u16) -> Self {
        Self(id.to_be_bytes())
    }

    /// Numeric value of the identifier
    pub const fn value(&self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    /// Raw identifier bytes
    pub const fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl From<u16> for FileId {
    fn from(id: u16) -> Self {
        Self::new(id)
    }
}

impl From<[u8; 2]> for FileId {
    fn from(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.0[0], self.0[1])
    }
}

/// Tag of a data object retrievable with GET DATA
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataObjectTag {
    /// 1-byte tag
    OneByte(u8),
    /// 2-byte tag
    TwoByte(u16),
}

impl DataObjectTag {
    /// Tag bytes, most significant first
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::OneByte(tag) => vec![*tag],
            Self::TwoByte(tag) => tag.to_be_bytes().to_vec(),
        }
    }
}

impl fmt::Display for DataObjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneByte(tag) => write!(f, "{tag:02X}"),
            Self::TwoByte(tag) => write!(f, "{tag:04X}"),
        }
    }
}

/// SELECT an EF under the current DF by file identifier, without response data
pub fn select_ef(file_id: FileId, cla: u8) -> Command {
    Command::new(
        cla,
        ins::SELECT,
        select_p1::EF_UNDER_CURRENT_DF,
        select_p2::NO_RESPONSE_DATA,
    )
    .with_data(Bytes::copy_from_slice(file_id.as_bytes()))
}

/// SELECT a DF by name (AID), without response data
pub fn select_df_by_name(aid: impl Into<Bytes>, cla: u8) -> Command {
    Command::new(cla, ins::SELECT, select_p1::BY_NAME, select_p2::NO_RESPONSE_DATA)
        .with_data(aid)
}

/// VERIFY against the current EF; without reference data this only queries the retry counter
pub fn verify(reference: Option<&[u8]>, cla: u8) -> Command {
    let command = Command::new(cla, ins::VERIFY, 0x00, CURRENT_EF_REFERENCE);
    match reference {
        Some(data) => command.with_data(Bytes::copy_from_slice(data)),
        None => command,
    }
}

/// EXTERNAL AUTHENTICATE against the current EF
pub fn external_authenticate(data: Option<&[u8]>, cla: u8) -> Command {
    let command = Command::new(cla, ins::EXTERNAL_AUTHENTICATE, 0x00, CURRENT_EF_REFERENCE);
    match data {
        Some(data) => command.with_data(Bytes::copy_from_slice(data)),
        None => command,
    }
}

/// COMPUTE DIGITAL SIGNATURE over a DigestInfo with the key of the current EF
pub fn compute_signature(digest_info: &[u8]) -> Command {
    Command::new(
        SIGNATURE_CLA,
        ins::COMPUTE_DIGITAL_SIGNATURE,
        0x00,
        CURRENT_EF_REFERENCE,
    )
    .with_data(Bytes::copy_from_slice(digest_info))
    .with_le(ExpectedLength::Max)
}

/// READ BINARY from offset zero of the current EF
pub const fn read_binary(cla: u8) -> Command {
    Command::new_with_le(cla, ins::READ_BINARY, 0x00, 0x00, ExpectedLength::Max)
}

/// READ RECORD of the first record of the current EF
pub const fn read_record(cla: u8) -> Command {
    Command::new_with_le(
        cla,
        ins::READ_RECORD,
        0x01,
        READ_RECORD_CURRENT_EF,
        ExpectedLength::Max,
    )
}

/// GET DATA for a tag
///
/// 1-byte tags go into P2 with P1 `00`, or P1 `02` under the simplified
/// (SIMPLE-TLV) encoding. 2-byte tags fill P1-P2; the simplified flag does not
/// apply to them.
pub const fn get_data(tag: DataObjectTag, simplified_encoding: bool, cla: u8) -> Command {
    let (p1, p2) = match tag {
        DataObjectTag::OneByte(tag) if simplified_encoding => (GET_DATA_SIMPLE_TLV, tag),
        DataObjectTag::OneByte(tag) => (0x00, tag),
        DataObjectTag::TwoByte(tag) => ((tag >> 8) as u8, tag as u8),
    };
    Command::new_with_le(cla, ins::GET_DATA, p1, p2, ExpectedLength::Max)
}

/// Class byte for a GET RESPONSE following a command sent with `cla`
///
/// Keeps the logical channel number and drops secure messaging and chaining
/// indications. Classes with `0x40` set use the further interindustry layout
/// (channels 4 to 19).
pub const fn get_response_class(cla: u8) -> u8 {
    if cla & 0x40 == 0 {
        cla & 0x03
    } else {
        0x40 | (cla & 0x0F)
    }
}

/// GET RESPONSE for the number of bytes announced by `61XX`
pub const fn get_response(cla: u8, available: u8) -> Command {
    Command::new_with_le(
        cla,
        ins::GET_RESPONSE,
        0x00,
        0x00,
        ExpectedLength::from_short(available),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_select_ef() {
        let cmd = select_ef(FileId::new(0x2F01), 0x00);
        assert_eq!(cmd.to_bytes().unwrap().as_ref(), hex!("00A4020C022F01"));
    }

    #[test]
    fn test_verify_without_reference() {
        assert_eq!(verify(None, 0x00).to_bytes().unwrap().as_ref(), hex!("00200080"));
        assert_eq!(
            verify(Some(b"1234".as_slice()), 0x00).to_bytes().unwrap().as_ref(),
            hex!("002000800431323334")
        );
    }

    #[test]
    fn test_read_commands() {
        assert_eq!(read_binary(0x00).to_bytes().unwrap().as_ref(), hex!("00B0000000"));
        assert_eq!(read_record(0x00).to_bytes().unwrap().as_ref(), hex!("00B2010400"));
    }

    #[test]
    fn test_get_data_encodings() {
        let cmd = get_data(DataObjectTag::OneByte(0x5A), false, 0x00);
        assert_eq!((cmd.p1, cmd.p2), (0x00, 0x5A));

        let cmd = get_data(DataObjectTag::OneByte(0x5A), true, 0x00);
        assert_eq!((cmd.p1, cmd.p2), (0x02, 0x5A));

        let cmd = get_data(DataObjectTag::TwoByte(0x5F20), false, 0x00);
        assert_eq!(cmd.to_bytes().unwrap().as_ref(), hex!("00CA5F2000"));
    }

    #[test]
    fn test_get_response_class() {
        assert_eq!(get_response_class(0x00), 0x00);
        assert_eq!(get_response_class(0x0C), 0x00);
        assert_eq!(get_response_class(0x02), 0x02);
        assert_eq!(get_response_class(0x1B), 0x03);
        assert_eq!(get_response_class(0x84), 0x00);
        assert_eq!(get_response_class(0x81), 0x01);
        assert_eq!(get_response_class(0x4D), 0x4D);
        assert_eq!(get_response_class(0x7F), 0x4F);
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(FileId::new(0x000A).to_string(), "000A");
        assert_eq!(DataObjectTag::OneByte(0x5A).to_string(), "5A");
        assert_eq!(DataObjectTag::TwoByte(0x1F1F).to_string(), "1F1F");
        assert_eq!(DataObjectTag::TwoByte(0x5F20).to_bytes(), vec![0x5F, 0x20]);
    }
}
