//! Move identifiers and the paths built from them.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{WalletError, WalletResult};
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for identifier strings.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// An identifier in Move (module name, function name, struct name).
///
/// Identifiers match `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Creates a new identifier, validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::TypeTagParse`] if the identifier is empty, longer
    /// than 128 characters, does not start with a letter or underscore, or
    /// contains anything other than alphanumerics and underscores.
    pub fn new(s: impl Into<String>) -> WalletResult<Self> {
        let s = s.into();
        if s.len() > MAX_IDENTIFIER_LENGTH {
            return Err(WalletError::TypeTagParse(format!(
                "identifier too long: {} bytes (max {MAX_IDENTIFIER_LENGTH})",
                s.len()
            )));
        }
        let Some(first) = s.chars().next() else {
            return Err(WalletError::TypeTagParse(
                "identifier cannot be empty".into(),
            ));
        };
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(WalletError::TypeTagParse(format!(
                "identifier must start with letter or underscore: '{s}'"
            )));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(WalletError::TypeTagParse(format!(
                "identifier contains invalid characters: '{s}'"
            )));
        }
        Ok(Self(s))
    }

    /// Identifiers baked into this crate; callers must pass a valid literal.
    pub(crate) fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl Serializable for Identifier {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_str(&self.0);
    }
}

impl Deserializable for Identifier {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Self::new(deserializer.deserialize_str()?)
            .map_err(|e| WalletError::deserialization(e.to_string()))
    }
}

/// A Move module identifier (`address::module_name`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveModuleId {
    pub address: AccountAddress,
    pub name: Identifier,
}

impl MoveModuleId {
    pub fn new(address: AccountAddress, name: Identifier) -> Self {
        Self { address, name }
    }
}

impl fmt::Display for MoveModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

impl FromStr for MoveModuleId {
    type Err = WalletError;

    /// Parses `address::module`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        let [address, name] = parts.as_slice() else {
            return Err(WalletError::TypeTagParse(format!(
                "invalid module id (expected address::module): '{s}'"
            )));
        };
        Ok(Self {
            address: parse_path_address(address)?,
            name: Identifier::new(*name)?,
        })
    }
}

impl Serializable for MoveModuleId {
    fn serialize(&self, serializer: &mut Serializer) {
        Serializable::serialize(&self.address, serializer);
        Serializable::serialize(&self.name, serializer);
    }
}

impl Deserializable for MoveModuleId {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            address: <AccountAddress as Deserializable>::deserialize(deserializer)?,
            name: <Identifier as Deserializable>::deserialize(deserializer)?,
        })
    }
}

/// A fully qualified entry function (`address::module::function`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryFunctionId {
    pub module: MoveModuleId,
    pub name: Identifier,
}

impl EntryFunctionId {
    pub fn new(module: MoveModuleId, name: Identifier) -> Self {
        Self { module, name }
    }
}

impl fmt::Display for EntryFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

impl FromStr for EntryFunctionId {
    type Err = WalletError;

    /// Parses `address::module::function`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        let [address, module, name] = parts.as_slice() else {
            return Err(WalletError::TypeTagParse(format!(
                "invalid function id (expected address::module::function): '{s}'"
            )));
        };
        Ok(Self {
            module: MoveModuleId::new(parse_path_address(address)?, Identifier::new(*module)?),
            name: Identifier::new(*name)?,
        })
    }
}

/// Address segment of a Move path; failures surface as parse errors.
pub(crate) fn parse_path_address(text: &str) -> WalletResult<AccountAddress> {
    if !text.starts_with("0x") {
        return Err(WalletError::TypeTagParse(format!(
            "address '{text}' must start with 0x"
        )));
    }
    AccountAddress::from_str_relaxed(text)
        .map_err(|e| WalletError::TypeTagParse(format!("invalid address '{text}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs::{from_bytes, to_bytes};

    #[test]
    fn test_identifier_rules() {
        assert!(Identifier::new("coin").is_ok());
        assert!(Identifier::new("_private").is_ok());
        assert!(Identifier::new("Coin2").is_ok());
        assert!(Identifier::new("").is_err());
        assert!(Identifier::new("2coin").is_err());
        assert!(Identifier::new("co-in").is_err());
        assert!(Identifier::new("a".repeat(129)).is_err());
    }

    #[test]
    fn test_module_id_parse_and_display() {
        let id: MoveModuleId = "0x1::coin".parse().unwrap();
        assert_eq!(id.address, AccountAddress::ONE);
        assert_eq!(id.to_string(), "0x1::coin");
        assert!("0x1::coin::extra".parse::<MoveModuleId>().is_err());
        assert!("1::coin".parse::<MoveModuleId>().is_err());
    }

    #[test]
    fn test_entry_function_id() {
        let f: EntryFunctionId = "0x1::aptos_account::transfer".parse().unwrap();
        assert_eq!(f.module.name.as_str(), "aptos_account");
        assert_eq!(f.name.as_str(), "transfer");
        assert_eq!(f.to_string(), "0x1::aptos_account::transfer");
        assert!("0x1::aptos_account".parse::<EntryFunctionId>().is_err());
        assert!("0xzz::m::f".parse::<EntryFunctionId>().is_err());
    }

    #[test]
    fn test_module_id_bcs() {
        let id: MoveModuleId = "0x1::coin".parse().unwrap();
        let bytes = to_bytes(&id);
        assert_eq!(bytes.len(), 32 + 1 + 4);
        assert_eq!(&bytes[32..], &[4, b'c', b'o', b'i', b'n']);
        assert_eq!(from_bytes::<MoveModuleId>(&bytes).unwrap(), id);
    }

    #[test]
    fn test_identifier_deserialize_validates() {
        let bytes = to_bytes(&"9bad".to_string());
        assert!(from_bytes::<Identifier>(&bytes).is_err());
    }
}
