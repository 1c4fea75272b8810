//! Utility functions for the scout CLI

pub mod reader;

/// Raw bytes given as a hex string on the command line
pub type HexBytes = Vec<u8>;

/// Parse an integer given in decimal or as `0x`-prefixed hex
pub fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, String> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => value.parse::<u64>(),
    }
    .map_err(|e| format!("invalid number `{value}`: {e}"))?;

    T::try_from(parsed).map_err(|_| format!("{value} is out of range"))
}

/// Parse a hex string, ignoring spaces and colons
pub fn parse_hex(value: &str) -> Result<HexBytes, hex::FromHexError> {
    let digits: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(digits)
}
