//! Transaction types.

use crate::bcs::{self, Deserializable, Deserializer, Serializable, Serializer};
use crate::config::PROTOCOL;
use crate::crypto::sha3_256_of;
use crate::error::{WalletError, WalletResult};
use crate::transaction::authenticator::TransactionAuthenticator;
use crate::transaction::payload::TransactionPayload;
use crate::types::{AccountAddress, ChainId};

/// The raw transaction that a client signs.
///
/// Its BCS bytes are the preimage of every signature over it, so the field
/// order below is the wire order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    /// The transaction payload (entry function, script, etc.).
    pub payload: TransactionPayload,
    /// Maximum gas units the sender is willing to pay.
    pub max_gas_amount: u64,
    /// Price per gas unit in octas.
    pub gas_unit_price: u64,
    /// Expiration time in seconds since Unix epoch.
    pub expiration_timestamp_secs: u64,
    /// Chain ID to prevent cross-chain replay.
    pub chain_id: ChainId,
}

impl RawTransaction {
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// Serializes this transaction to BCS bytes.
    pub fn to_bcs(&self) -> Vec<u8> {
        bcs::to_bytes(self)
    }
}

impl Serializable for RawTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        self.sender.serialize(serializer);
        serializer.serialize_u64(self.sequence_number);
        self.payload.serialize(serializer);
        serializer.serialize_u64(self.max_gas_amount);
        serializer.serialize_u64(self.gas_unit_price);
        serializer.serialize_u64(self.expiration_timestamp_secs);
        self.chain_id.serialize(serializer);
    }
}

impl Deserializable for RawTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            sender: AccountAddress::deserialize(deserializer)?,
            sequence_number: deserializer.deserialize_u64()?,
            payload: TransactionPayload::deserialize(deserializer)?,
            max_gas_amount: deserializer.deserialize_u64()?,
            gas_unit_price: deserializer.deserialize_u64()?,
            expiration_timestamp_secs: deserializer.deserialize_u64()?,
            chain_id: ChainId::deserialize(deserializer)?,
        })
    }
}

/// A single-signer transaction, optionally sponsored by a fee payer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleTransaction {
    pub raw_transaction: RawTransaction,
    pub fee_payer_address: Option<AccountAddress>,
}

impl SimpleTransaction {
    pub fn new(raw_transaction: RawTransaction, fee_payer_address: Option<AccountAddress>) -> Self {
        Self {
            raw_transaction,
            fee_payer_address,
        }
    }
}

impl Serializable for SimpleTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        self.raw_transaction.serialize(serializer);
        serializer.serialize_option(self.fee_payer_address.as_ref());
    }
}

impl Deserializable for SimpleTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            raw_transaction: RawTransaction::deserialize(deserializer)?,
            fee_payer_address: deserializer.deserialize_option()?,
        })
    }
}

/// A transaction that secondary signers co-authorize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiAgentTransaction {
    pub raw_transaction: RawTransaction,
    pub secondary_signer_addresses: Vec<AccountAddress>,
    pub fee_payer_address: Option<AccountAddress>,
}

impl MultiAgentTransaction {
    pub fn new(
        raw_transaction: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: Option<AccountAddress>,
    ) -> Self {
        Self {
            raw_transaction,
            secondary_signer_addresses,
            fee_payer_address,
        }
    }
}

impl Serializable for MultiAgentTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        self.raw_transaction.serialize(serializer);
        serializer.serialize_vector(&self.secondary_signer_addresses);
        serializer.serialize_option(self.fee_payer_address.as_ref());
    }
}

impl Deserializable for MultiAgentTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            raw_transaction: RawTransaction::deserialize(deserializer)?,
            secondary_signer_addresses: deserializer.deserialize_vector()?,
            fee_payer_address: deserializer.deserialize_option()?,
        })
    }
}

/// Either submission shape. Signing and assembly branch on this.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyRawTransaction {
    Simple(SimpleTransaction),
    MultiAgent(MultiAgentTransaction),
}

impl AnyRawTransaction {
    pub fn raw_transaction(&self) -> &RawTransaction {
        match self {
            Self::Simple(txn) => &txn.raw_transaction,
            Self::MultiAgent(txn) => &txn.raw_transaction,
        }
    }

    /// Empty for simple transactions.
    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            Self::Simple(_) => &[],
            Self::MultiAgent(txn) => &txn.secondary_signer_addresses,
        }
    }

    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            Self::Simple(txn) => txn.fee_payer_address,
            Self::MultiAgent(txn) => txn.fee_payer_address,
        }
    }

    /// Sets the fee payer. A sender signs with `0x0` as a placeholder and the
    /// sponsor fills in its own address before signing.
    #[must_use]
    pub fn with_fee_payer_address(mut self, fee_payer_address: AccountAddress) -> Self {
        match &mut self {
            Self::Simple(txn) => txn.fee_payer_address = Some(fee_payer_address),
            Self::MultiAgent(txn) => txn.fee_payer_address = Some(fee_payer_address),
        }
        self
    }
}

impl From<SimpleTransaction> for AnyRawTransaction {
    fn from(txn: SimpleTransaction) -> Self {
        Self::Simple(txn)
    }
}

impl From<MultiAgentTransaction> for AnyRawTransaction {
    fn from(txn: MultiAgentTransaction) -> Self {
        Self::MultiAgent(txn)
    }
}

impl From<RawTransaction> for AnyRawTransaction {
    fn from(raw_transaction: RawTransaction) -> Self {
        Self::Simple(SimpleTransaction::new(raw_transaction, None))
    }
}

impl Serializable for AnyRawTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::Simple(txn) => {
                serializer.serialize_variant_index(0);
                txn.serialize(serializer);
            }
            Self::MultiAgent(txn) => {
                serializer.serialize_variant_index(1);
                txn.serialize(serializer);
            }
        }
    }
}

impl Deserializable for AnyRawTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        match deserializer.deserialize_variant_index()? {
            0 => Ok(Self::Simple(SimpleTransaction::deserialize(deserializer)?)),
            1 => Ok(Self::MultiAgent(MultiAgentTransaction::deserialize(
                deserializer,
            )?)),
            other => Err(WalletError::unknown_variant("AnyRawTransaction", other)),
        }
    }
}

/// What secondary signers and fee payers sign, under the
/// `APTOS::RawTransactionWithData` salt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawTransactionWithData {
    MultiAgent {
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    },
    MultiAgentWithFeePayer {
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    },
}

impl Serializable for RawTransactionWithData {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            } => {
                serializer.serialize_variant_index(0);
                raw_txn.serialize(serializer);
                serializer.serialize_vector(secondary_signer_addresses);
            }
            Self::MultiAgentWithFeePayer {
                raw_txn,
                secondary_signer_addresses,
                fee_payer_address,
            } => {
                serializer.serialize_variant_index(1);
                raw_txn.serialize(serializer);
                serializer.serialize_vector(secondary_signer_addresses);
                fee_payer_address.serialize(serializer);
            }
        }
    }
}

impl Deserializable for RawTransactionWithData {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        match deserializer.deserialize_variant_index()? {
            0 => Ok(Self::MultiAgent {
                raw_txn: RawTransaction::deserialize(deserializer)?,
                secondary_signer_addresses: deserializer.deserialize_vector()?,
            }),
            1 => Ok(Self::MultiAgentWithFeePayer {
                raw_txn: RawTransaction::deserialize(deserializer)?,
                secondary_signer_addresses: deserializer.deserialize_vector()?,
                fee_payer_address: AccountAddress::deserialize(deserializer)?,
            }),
            other => Err(WalletError::unknown_variant("RawTransactionWithData", other)),
        }
    }
}

/// A signed transaction ready for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw_txn: RawTransaction,
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// The submittable bytes: `bcs(raw_txn) ‖ bcs(authenticator)`.
    pub fn to_bytes(&self) -> Vec<u8> {
        bcs::to_bytes(self)
    }

    pub fn sender(&self) -> AccountAddress {
        self.raw_txn.sender
    }

    /// The transaction id the chain assigns:
    /// `SHA3-256(SHA3-256("APTOS::Transaction") ‖ 0x00 ‖ bcs)`, where `0x00`
    /// marks a user transaction.
    pub fn hash(&self) -> [u8; 32] {
        let bytes = self.to_bytes();
        sha3_256_of([
            PROTOCOL.transaction_prefix.as_slice(),
            &[0u8][..],
            bytes.as_slice(),
        ])
    }
}

impl Serializable for SignedTransaction {
    fn serialize(&self, serializer: &mut Serializer) {
        self.raw_txn.serialize(serializer);
        self.authenticator.serialize(serializer);
    }
}

impl Deserializable for SignedTransaction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            raw_txn: RawTransaction::deserialize(deserializer)?,
            authenticator: TransactionAuthenticator::deserialize(deserializer)?,
        })
    }
}
