//! Transaction authenticators.
//!
//! An [`AccountAuthenticator`] proves one account approved a transaction. A
//! [`TransactionAuthenticator`] arranges the authenticators of every party
//! according to the transaction's shape. Both are tagged unions whose variant
//! index is the first byte on the wire.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::crypto::{
    create_bitmap, AccountPublicKey, AccountSignature, AnyPublicKey, AnySignature,
    Ed25519PublicKey, Ed25519Signature, MultiEd25519PublicKey, MultiEd25519Signature,
    MultiKeyPublicKey, MultiKeySignature,
};
use crate::error::{WalletError, WalletResult};
use crate::types::AccountAddress;

/// The authenticator of a single account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountAuthenticator {
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    MultiEd25519 {
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    },
    SingleKey {
        public_key: AnyPublicKey,
        signature: AnySignature,
    },
    MultiKey {
        public_key: MultiKeyPublicKey,
        signature: MultiKeySignature,
    },
    /// Stands in for a party that has not signed, e.g. an unknown sponsor
    /// during simulation.
    NoAccountAuthenticator,
    /// Authentication delegated to a Move function.
    Abstraction {
        function_info: FunctionInfo,
        auth_data: AbstractionAuthData,
    },
}

impl AccountAuthenticator {
    const ED25519: u32 = 0;
    const MULTI_ED25519: u32 = 1;
    const SINGLE_KEY: u32 = 2;
    const MULTI_KEY: u32 = 3;
    const NO_ACCOUNT_AUTHENTICATOR: u32 = 4;
    const ABSTRACTION: u32 = 5;

    fn variant(&self) -> u32 {
        match self {
            Self::Ed25519 { .. } => Self::ED25519,
            Self::MultiEd25519 { .. } => Self::MULTI_ED25519,
            Self::SingleKey { .. } => Self::SINGLE_KEY,
            Self::MultiKey { .. } => Self::MULTI_KEY,
            Self::NoAccountAuthenticator => Self::NO_ACCOUNT_AUTHENTICATOR,
            Self::Abstraction { .. } => Self::ABSTRACTION,
        }
    }

    /// Pairs a public key with a signature of the same scheme.
    ///
    /// # Errors
    ///
    /// [`WalletError::InvalidSignature`] when the schemes differ.
    pub fn new(public_key: AccountPublicKey, signature: AccountSignature) -> WalletResult<Self> {
        Ok(match (public_key, signature) {
            (AccountPublicKey::Ed25519(public_key), AccountSignature::Ed25519(signature)) => {
                Self::Ed25519 {
                    public_key,
                    signature,
                }
            }
            (
                AccountPublicKey::MultiEd25519(public_key),
                AccountSignature::MultiEd25519(signature),
            ) => Self::MultiEd25519 {
                public_key,
                signature,
            },
            (AccountPublicKey::SingleKey(public_key), AccountSignature::SingleKey(signature)) => {
                Self::SingleKey {
                    public_key,
                    signature,
                }
            }
            (AccountPublicKey::MultiKey(public_key), AccountSignature::MultiKey(signature)) => {
                Self::MultiKey {
                    public_key,
                    signature,
                }
            }
            (public_key, signature) => {
                return Err(WalletError::InvalidSignature(format!(
                    "signature {signature:?} does not match the scheme of {public_key:?}"
                )))
            }
        })
    }

    /// An authenticator with the real public key and an all-zero signature of
    /// the right size, so simulation sees the same byte cost as submission.
    pub fn placeholder(public_key: &AccountPublicKey) -> WalletResult<Self> {
        Ok(match public_key {
            AccountPublicKey::Ed25519(public_key) => Self::Ed25519 {
                public_key: *public_key,
                signature: Ed25519Signature::new([0u8; 64]),
            },
            AccountPublicKey::MultiEd25519(public_key) => {
                let count = public_key.threshold();
                let positions: Vec<u8> = (0..count).collect();
                Self::MultiEd25519 {
                    public_key: public_key.clone(),
                    signature: MultiEd25519Signature::new(
                        vec![Ed25519Signature::new([0u8; 64]); usize::from(count)],
                        &positions,
                    )?,
                }
            }
            AccountPublicKey::SingleKey(public_key) => Self::SingleKey {
                public_key: public_key.clone(),
                signature: AnySignature::zeroed_for(public_key),
            },
            AccountPublicKey::MultiKey(public_key) => {
                let count = public_key.signatures_required();
                let positions: Vec<u8> = (0..count).collect();
                let signatures = public_key.public_keys()[..usize::from(count)]
                    .iter()
                    .map(AnySignature::zeroed_for)
                    .collect();
                Self::MultiKey {
                    public_key: public_key.clone(),
                    signature: MultiKeySignature::new(signatures, create_bitmap(&positions)?)?,
                }
            }
        })
    }

    /// The public key inside, if this variant carries one.
    pub fn public_key(&self) -> Option<AccountPublicKey> {
        match self {
            Self::Ed25519 { public_key, .. } => Some(AccountPublicKey::Ed25519(*public_key)),
            Self::MultiEd25519 { public_key, .. } => {
                Some(AccountPublicKey::MultiEd25519(public_key.clone()))
            }
            Self::SingleKey { public_key, .. } => {
                Some(AccountPublicKey::SingleKey(public_key.clone()))
            }
            Self::MultiKey { public_key, .. } => {
                Some(AccountPublicKey::MultiKey(public_key.clone()))
            }
            Self::NoAccountAuthenticator | Self::Abstraction { .. } => None,
        }
    }

    /// Checks the signature against `message`.
    ///
    /// `NoAccountAuthenticator` and `Abstraction` cannot be checked locally
    /// and always fail.
    pub fn verify(&self, message: &[u8]) -> WalletResult<()> {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::SingleKey {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::MultiKey {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            Self::NoAccountAuthenticator => Err(WalletError::MissingAuthenticator("account")),
            Self::Abstraction { .. } => Err(WalletError::InvalidSignature(
                "abstraction authenticators are checked on-chain".into(),
            )),
        }
    }
}

impl Serializable for AccountAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.variant());
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                public_key.serialize(serializer);
                signature.serialize(serializer);
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                public_key.serialize(serializer);
                signature.serialize(serializer);
            }
            Self::SingleKey {
                public_key,
                signature,
            } => {
                public_key.serialize(serializer);
                signature.serialize(serializer);
            }
            Self::MultiKey {
                public_key,
                signature,
            } => {
                public_key.serialize(serializer);
                signature.serialize(serializer);
            }
            Self::NoAccountAuthenticator => {}
            Self::Abstraction {
                function_info,
                auth_data,
            } => {
                function_info.serialize(serializer);
                auth_data.serialize(serializer);
            }
        }
    }
}

impl Deserializable for AccountAuthenticator {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(match deserializer.deserialize_variant_index()? {
            Self::ED25519 => Self::Ed25519 {
                public_key: Ed25519PublicKey::deserialize(deserializer)?,
                signature: Ed25519Signature::deserialize(deserializer)?,
            },
            Self::MULTI_ED25519 => Self::MultiEd25519 {
                public_key: MultiEd25519PublicKey::deserialize(deserializer)?,
                signature: MultiEd25519Signature::deserialize(deserializer)?,
            },
            Self::SINGLE_KEY => Self::SingleKey {
                public_key: AnyPublicKey::deserialize(deserializer)?,
                signature: AnySignature::deserialize(deserializer)?,
            },
            Self::MULTI_KEY => Self::MultiKey {
                public_key: MultiKeyPublicKey::deserialize(deserializer)?,
                signature: MultiKeySignature::deserialize(deserializer)?,
            },
            Self::NO_ACCOUNT_AUTHENTICATOR => Self::NoAccountAuthenticator,
            Self::ABSTRACTION => Self::Abstraction {
                function_info: FunctionInfo::deserialize(deserializer)?,
                auth_data: AbstractionAuthData::deserialize(deserializer)?,
            },
            other => return Err(WalletError::unknown_variant("AccountAuthenticator", other)),
        })
    }
}

/// The Move function an abstracted account authenticates with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionInfo {
    pub module_address: AccountAddress,
    pub module_name: String,
    pub function_name: String,
}

impl Serializable for FunctionInfo {
    fn serialize(&self, serializer: &mut Serializer) {
        self.module_address.serialize(serializer);
        serializer.serialize_str(&self.module_name);
        serializer.serialize_str(&self.function_name);
    }
}

impl Deserializable for FunctionInfo {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            module_address: AccountAddress::deserialize(deserializer)?,
            module_name: deserializer.deserialize_str()?,
            function_name: deserializer.deserialize_str()?,
        })
    }
}

/// Data handed to the authentication function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbstractionAuthData {
    V1 {
        signing_message_digest: Vec<u8>,
        authenticator: Vec<u8>,
    },
    DerivableV1 {
        signing_message_digest: Vec<u8>,
        abstract_signature: Vec<u8>,
        abstract_public_key: Vec<u8>,
    },
}

impl Serializable for AbstractionAuthData {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::V1 {
                signing_message_digest,
                authenticator,
            } => {
                serializer.serialize_variant_index(0);
                serializer.serialize_bytes(signing_message_digest);
                serializer.serialize_bytes(authenticator);
            }
            Self::DerivableV1 {
                signing_message_digest,
                abstract_signature,
                abstract_public_key,
            } => {
                serializer.serialize_variant_index(1);
                serializer.serialize_bytes(signing_message_digest);
                serializer.serialize_bytes(abstract_signature);
                serializer.serialize_bytes(abstract_public_key);
            }
        }
    }
}

impl Deserializable for AbstractionAuthData {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        match deserializer.deserialize_variant_index()? {
            0 => Ok(Self::V1 {
                signing_message_digest: deserializer.deserialize_bytes()?,
                authenticator: deserializer.deserialize_bytes()?,
            }),
            1 => Ok(Self::DerivableV1 {
                signing_message_digest: deserializer.deserialize_bytes()?,
                abstract_signature: deserializer.deserialize_bytes()?,
                abstract_public_key: deserializer.deserialize_bytes()?,
            }),
            other => Err(WalletError::unknown_variant("AbstractionAuthData", other)),
        }
    }
}

/// The authenticator of a whole transaction.
///
/// `Ed25519` and `MultiEd25519` are the legacy single-sender encodings;
/// every other sender key travels in `SingleSender`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    MultiEd25519 {
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    },
    MultiAgent {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    },
    FeePayer {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    },
    SingleSender {
        sender: AccountAuthenticator,
    },
}

impl TransactionAuthenticator {
    const ED25519: u32 = 0;
    const MULTI_ED25519: u32 = 1;
    const MULTI_AGENT: u32 = 2;
    const FEE_PAYER: u32 = 3;
    const SINGLE_SENDER: u32 = 4;

    /// The authenticator for a transaction with only a sender.
    ///
    /// Ed25519 and MultiEd25519 senders use their legacy variants.
    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        match sender {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => Self::Ed25519 {
                public_key,
                signature,
            },
            AccountAuthenticator::MultiEd25519 {
                public_key,
                signature,
            } => Self::MultiEd25519 {
                public_key,
                signature,
            },
            sender => Self::SingleSender { sender },
        }
    }

    fn variant(&self) -> u32 {
        match self {
            Self::Ed25519 { .. } => Self::ED25519,
            Self::MultiEd25519 { .. } => Self::MULTI_ED25519,
            Self::MultiAgent { .. } => Self::MULTI_AGENT,
            Self::FeePayer { .. } => Self::FEE_PAYER,
            Self::SingleSender { .. } => Self::SINGLE_SENDER,
        }
    }
}

impl Serializable for TransactionAuthenticator {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.variant());
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                public_key.serialize(serializer);
                signature.serialize(serializer);
            }
            Self::MultiEd25519 {
                public_key,
                signature,
            } => {
                public_key.serialize(serializer);
                signature.serialize(serializer);
            }
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                sender.serialize(serializer);
                serializer.serialize_vector(secondary_signer_addresses);
                serializer.serialize_vector(secondary_signers);
            }
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                sender.serialize(serializer);
                serializer.serialize_vector(secondary_signer_addresses);
                serializer.serialize_vector(secondary_signers);
                fee_payer_address.serialize(serializer);
                fee_payer_signer.serialize(serializer);
            }
            Self::SingleSender { sender } => sender.serialize(serializer),
        }
    }
}

impl Deserializable for TransactionAuthenticator {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(match deserializer.deserialize_variant_index()? {
            Self::ED25519 => Self::Ed25519 {
                public_key: Ed25519PublicKey::deserialize(deserializer)?,
                signature: Ed25519Signature::deserialize(deserializer)?,
            },
            Self::MULTI_ED25519 => Self::MultiEd25519 {
                public_key: MultiEd25519PublicKey::deserialize(deserializer)?,
                signature: MultiEd25519Signature::deserialize(deserializer)?,
            },
            Self::MULTI_AGENT => Self::MultiAgent {
                sender: AccountAuthenticator::deserialize(deserializer)?,
                secondary_signer_addresses: deserializer.deserialize_vector()?,
                secondary_signers: deserializer.deserialize_vector()?,
            },
            Self::FEE_PAYER => Self::FeePayer {
                sender: AccountAuthenticator::deserialize(deserializer)?,
                secondary_signer_addresses: deserializer.deserialize_vector()?,
                secondary_signers: deserializer.deserialize_vector()?,
                fee_payer_address: AccountAddress::deserialize(deserializer)?,
                fee_payer_signer: AccountAuthenticator::deserialize(deserializer)?,
            },
            Self::SINGLE_SENDER => Self::SingleSender {
                sender: AccountAuthenticator::deserialize(deserializer)?,
            },
            other => {
                return Err(WalletError::unknown_variant(
                    "TransactionAuthenticator",
                    other,
                ))
            }
        })
    }
}
