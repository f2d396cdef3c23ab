//! Transaction construction, signing messages and assembly.
//!
//! The flow for every transaction shape is the same:
//!
//! 1. build an [`AnyRawTransaction`], usually with [`TransactionBuilder`];
//! 2. every party signs [`generate_signing_message_for_transaction`];
//! 3. [`generate_signed_transaction`] wraps the resulting
//!    [`AccountAuthenticator`]s into the submittable bytes.
//!
//! # Example: Sponsored Transaction
//!
//! ```rust
//! use aptos_wallet_core::crypto::Ed25519PrivateKey;
//! use aptos_wallet_core::transaction::{
//!     generate_signed_transaction, generate_signing_message_for_transaction,
//!     AccountAuthenticator, EntryFunction, SignedTransactionInput, TransactionBuilder,
//! };
//! use aptos_wallet_core::types::ChainId;
//!
//! let sender = Ed25519PrivateKey::generate();
//! let sponsor = Ed25519PrivateKey::generate();
//!
//! let payload = EntryFunction::from_function_id("0x1::m::f", vec![], vec![]).unwrap();
//! let txn = TransactionBuilder::new()
//!     .sender(sender.public_key().to_address())
//!     .sequence_number(0)
//!     .payload(payload.into())
//!     .chain_id(ChainId::testnet())
//!     .sponsored()
//!     .build()
//!     .unwrap();
//!
//! // The sender signs over the 0x0 placeholder fee payer.
//! let message = generate_signing_message_for_transaction(&txn);
//! let sender_auth =
//!     AccountAuthenticator::new(sender.public_key().into(), sender.sign(&message).into())
//!         .unwrap();
//!
//! // The sponsor fills in its address and signs.
//! let txn = txn.with_fee_payer_address(sponsor.public_key().to_address());
//! let message = generate_signing_message_for_transaction(&txn);
//! let sponsor_auth =
//!     AccountAuthenticator::new(sponsor.public_key().into(), sponsor.sign(&message).into())
//!         .unwrap();
//!
//! let bytes = generate_signed_transaction(
//!     SignedTransactionInput::new(txn, sender_auth).with_fee_payer(sponsor_auth),
//! )
//! .unwrap();
//! assert!(!bytes.is_empty());
//! ```

mod assembler;
pub mod authenticator;
mod builder;
pub mod payload;
mod signing_message;
pub mod types;

pub use assembler::{
    generate_signed_transaction, generate_signed_transaction_for_simulation,
    SignedTransactionInput, SimulationInput,
};
pub use authenticator::{
    AbstractionAuthData, AccountAuthenticator, FunctionInfo, TransactionAuthenticator,
};
pub use builder::TransactionBuilder;
pub use payload::{
    EntryFunction, Multisig, MultisigTransactionPayload, Script, ScriptArgument,
    TransactionPayload,
};
pub use signing_message::{
    generate_signing_message, generate_signing_message_for_serializable,
    generate_signing_message_for_transaction,
};
pub use types::{
    AnyRawTransaction, MultiAgentTransaction, RawTransaction, RawTransactionWithData,
    SignedTransaction, SimpleTransaction,
};
