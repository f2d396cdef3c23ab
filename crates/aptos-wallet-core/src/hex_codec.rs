//! Hex/byte codec.
//!
//! Inputs are accepted with or without a `0x` prefix. Output is always `0x`
//! followed by even-length lower-case hex.

use crate::error::{WalletError, WalletResult};
use std::fmt;

/// A byte buffer that knows how to move between its raw and hex forms.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Hex(Vec<u8>);

impl Hex {
    /// Wraps raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parses a hex string, with or without the `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Hex`] on odd length or non-hex characters.
    pub fn from_hex_input(input: &str) -> WalletResult<Self> {
        Ok(Self(decode(input)?))
    }

    /// Returns true if `input` parses as hex. An empty body is rejected.
    pub fn is_valid(input: &str) -> bool {
        let body = strip_prefix(input);
        !body.is_empty() && hex::decode(body).is_ok()
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the wrapper and returns the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Hex without the `0x` prefix.
    pub fn to_string_without_prefix(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hex({self})")
    }
}

impl AsRef<[u8]> for Hex {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Hex {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Strips a leading `0x` or `0X`.
pub(crate) fn strip_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decodes hex with an optional `0x` prefix.
pub fn decode(input: &str) -> WalletResult<Vec<u8>> {
    hex::decode(strip_prefix(input)).map_err(WalletError::from)
}

/// Encodes bytes as `0x`-prefixed lower-case hex.
pub fn encode_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes.as_ref()))
}

/// Decodes hex into a fixed-size array, rejecting any other length.
pub(crate) fn decode_fixed<const N: usize>(
    what: &'static str,
    input: &str,
) -> WalletResult<[u8; N]> {
    let bytes = decode(input)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| WalletError::length_mismatch(what, N, bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_optional() {
        let with = Hex::from_hex_input("0xdeadBEEF").unwrap();
        let without = Hex::from_hex_input("deadbeef").unwrap();
        assert_eq!(with, without);
        assert_eq!(with.as_bytes(), &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_output_is_prefixed_lower_case() {
        let h = Hex::from_bytes(vec![0xAB, 0x01]);
        assert_eq!(h.to_string(), "0xab01");
        assert_eq!(h.to_string_without_prefix(), "ab01");
        assert_eq!(encode_prefixed([0u8; 2]), "0x0000");
    }

    #[test]
    fn test_rejects_odd_length_and_garbage() {
        assert!(Hex::from_hex_input("0xabc").is_err());
        assert!(Hex::from_hex_input("0xzz").is_err());
        assert!(!Hex::is_valid("0x"));
        assert!(!Hex::is_valid("hello"));
        assert!(Hex::is_valid("0x00"));
    }

    #[test]
    fn test_decode_fixed() {
        let arr: [u8; 2] = decode_fixed("pair", "0x0102").unwrap();
        assert_eq!(arr, [1, 2]);
        let err = decode_fixed::<3>("triple", "0x0102").unwrap_err();
        assert!(matches!(
            err,
            WalletError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_round_trip() {
        let h = Hex::from_hex_input("0x").unwrap();
        assert!(h.as_bytes().is_empty());
        assert_eq!(h.to_string(), "0x");
    }
}
