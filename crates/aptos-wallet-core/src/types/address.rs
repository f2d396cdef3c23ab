//! Account address type.
//!
//! Aptos account addresses are 32-byte values. Textual input may be short
//! (`0x1`) or long (64 hex digits); short input is zero-padded on the left.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{WalletError, WalletResult};
use crate::hex_codec;
use crate::move_values::{EntryFunctionArgument, ScriptFunctionArgument};
use crate::transaction::ScriptArgument;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte Aptos account address.
///
/// # Display Format
///
/// Special addresses (`0x0` through `0xf`) render in their short form. Every
/// other address renders as `0x` followed by all 64 lower-case hex digits.
/// Equality, ordering and hashing use the raw bytes.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::types::AccountAddress;
///
/// let one = AccountAddress::from_str_relaxed("0x1").unwrap();
/// assert_eq!(one.to_string(), "0x1");
/// assert_eq!(one, AccountAddress::ONE);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    /// The "zero" address (all zeros).
    pub const ZERO: Self = Self::from_u8(0);

    /// The core framework address (0x1).
    pub const ONE: Self = Self::from_u8(1);

    /// The token framework address (0x3).
    pub const THREE: Self = Self::from_u8(3);

    /// The fungible asset framework address (0x4).
    pub const FOUR: Self = Self::from_u8(4);

    /// The native APT fungible asset metadata address (0xa).
    pub const A: Self = Self::from_u8(0xa);

    /// Creates an address from a byte array.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    const fn from_u8(value: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = value;
        Self(bytes)
    }

    /// Parses 1 to 64 hex digits, with or without `0x`, zero-padding on the left.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::InvalidAddress`] for empty input, more than 64
    /// digits or non-hex characters.
    pub fn from_str_relaxed(input: &str) -> WalletResult<Self> {
        let digits = hex_codec::strip_prefix(input.trim());
        if digits.is_empty() {
            return Err(WalletError::InvalidAddress(format!(
                "'{input}' must contain at least one hex digit"
            )));
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(WalletError::InvalidAddress(format!(
                "'{input}' is {} hex digits long (max {})",
                digits.len(),
                ADDRESS_LENGTH * 2
            )));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(WalletError::InvalidAddress(format!(
                "'{input}' contains non-hex characters"
            )));
        }
        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(padded, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Creates an address from exactly 32 bytes.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> WalletResult<Self> {
        let bytes = bytes.as_ref();
        let array: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| WalletError::length_mismatch("account address", ADDRESS_LENGTH, bytes.len()))?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Always `0x` followed by 64 hex digits.
    pub fn to_long_string(&self) -> String {
        hex_codec::encode_prefixed(self.0)
    }

    /// Trims every leading zero, e.g. `0x0000...0abc` becomes `0xabc`.
    pub fn to_short_string(&self) -> String {
        let hex = hex::encode(self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }

    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    /// True when the first 31 bytes are zero and the last byte is below 0x10.
    pub fn is_special(&self) -> bool {
        self.0[..ADDRESS_LENGTH - 1].iter().all(|&b| b == 0) && self.0[ADDRESS_LENGTH - 1] < 0x10
    }
}

impl Default for AccountAddress {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({self})")
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_special() {
            write!(f, "0x{:x}", self.0[ADDRESS_LENGTH - 1])
        } else {
            write!(f, "{}", self.to_long_string())
        }
    }
}

impl FromStr for AccountAddress {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_relaxed(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_relaxed(&value)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.to_string()
    }
}

impl From<[u8; ADDRESS_LENGTH]> for AccountAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serializable for AccountAddress {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_fixed_bytes(&self.0);
    }
}

impl Deserializable for AccountAddress {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_fixed_array().map(Self)
    }
}

impl EntryFunctionArgument for AccountAddress {}

impl ScriptFunctionArgument for AccountAddress {
    fn to_script_argument(&self) -> ScriptArgument {
        ScriptArgument::Address(*self)
    }
}
