//! Chain identifier.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::WalletResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The one-byte id that pins a transaction to a single network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u8);

impl ChainId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn mainnet() -> Self {
        Self(1)
    }

    pub const fn testnet() -> Self {
        Self(2)
    }

    /// The id used by local test networks.
    pub const fn localnet() -> Self {
        Self(4)
    }

    pub fn id(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ChainId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl Serializable for ChainId {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_u8(self.0);
    }
}

impl Deserializable for ChainId {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_u8().map(Self)
    }
}
