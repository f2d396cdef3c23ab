//! Wallet-facing intents resolved into transaction payloads.
//!
//! Plain transfers map onto fixed framework entry functions. Anything a dapp
//! asks for goes through [`build_entry_function_payload`], which checks the
//! request against the module ABI and encodes each argument for its
//! parameter type.
//!
//! # Example
//!
//! ```rust
//! use aptos_wallet_core::intent::{build_entry_function_payload, EntryFunctionIntent, MoveModuleAbi};
//!
//! let abi = MoveModuleAbi::from_json(r#"{
//!     "address": "0x1",
//!     "name": "aptos_account",
//!     "exposed_functions": [{
//!         "name": "transfer",
//!         "visibility": "public",
//!         "is_entry": true,
//!         "is_view": false,
//!         "generic_type_params": [],
//!         "params": ["&signer", "address", "u64"],
//!         "return": []
//!     }],
//!     "structs": []
//! }"#).unwrap();
//!
//! let intent: EntryFunctionIntent = serde_json::from_str(r#"{
//!     "function": "0x1::aptos_account::transfer",
//!     "arguments": ["0xb0b", "1000"]
//! }"#).unwrap();
//!
//! let payload = build_entry_function_payload(&intent, &abi).unwrap();
//! ```

mod abi;
mod args;

pub use abi::{
    MoveFunctionAbi, MoveFunctionGenericTypeParam, MoveFunctionVisibility, MoveModuleAbi,
    MoveStructAbi, MoveStructField, MoveStructGenericTypeParam,
};
pub use args::ArgumentValue;

use crate::account::Signer;
use crate::error::{WalletError, WalletResult};
use crate::move_values::U64;
use crate::transaction::{
    AccountAuthenticator, AnyRawTransaction, EntryFunction, Multisig,
    MultisigTransactionPayload, TransactionPayload,
};
use crate::types::{
    parse_type_tag, AccountAddress, EntryFunctionId, ParseOptions, StructTag, TypeTag,
};
use serde::Deserialize;
use tracing::debug;

/// A request to call an entry function, as a dapp would send it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EntryFunctionIntent {
    /// `address::module::function`
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentValue>,
}

impl EntryFunctionIntent {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn type_argument(mut self, type_argument: impl Into<String>) -> Self {
        self.type_arguments.push(type_argument.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: impl Into<ArgumentValue>) -> Self {
        self.arguments.push(argument.into());
        self
    }
}

/// Resolves `intent` against the ABI of the module it targets.
///
/// Leading `signer` and `&signer` parameters are not supplied by the caller.
/// Generic parameters in the remaining types are replaced by the intent's
/// type arguments before each argument is encoded.
///
/// # Errors
///
/// [`WalletError::AbiMismatch`] when `abi` describes another module, the
/// function is missing or not an entry function, or the type argument or
/// argument counts differ from the ABI. Argument encoding errors are passed
/// through, with mismatches prefixed by the argument position.
pub fn build_entry_function_payload(
    intent: &EntryFunctionIntent,
    abi: &MoveModuleAbi,
) -> WalletResult<TransactionPayload> {
    let EntryFunctionId { module, name } = intent.function.parse()?;
    let abi_module = abi.module_id()?;
    if module != abi_module {
        return Err(WalletError::AbiMismatch(format!(
            "{} targets module {module} but the ABI describes {abi_module}",
            intent.function
        )));
    }

    let function = abi.function(name.as_str())?;
    if !function.is_entry {
        return Err(WalletError::AbiMismatch(format!(
            "{} is not an entry function",
            intent.function
        )));
    }

    let type_args = intent
        .type_arguments
        .iter()
        .map(|text| parse_type_tag(text, ParseOptions::default()))
        .collect::<WalletResult<Vec<_>>>()?;
    if type_args.len() != function.generic_type_params.len() {
        return Err(WalletError::AbiMismatch(format!(
            "{} expects {} type arguments, got {}",
            intent.function,
            function.generic_type_params.len(),
            type_args.len()
        )));
    }

    let param_types = function.argument_types()?;
    if param_types.len() != intent.arguments.len() {
        return Err(WalletError::AbiMismatch(format!(
            "{} expects {} arguments, got {}",
            intent.function,
            param_types.len(),
            intent.arguments.len()
        )));
    }

    let args = param_types
        .iter()
        .zip(&intent.arguments)
        .enumerate()
        .map(|(position, (param, value))| {
            value
                .encode(&param.substitute(&type_args)?)
                .map_err(|err| match err {
                    WalletError::AbiMismatch(msg) => {
                        WalletError::AbiMismatch(format!("argument {position}: {msg}"))
                    }
                    other => other,
                })
        })
        .collect::<WalletResult<Vec<_>>>()?;

    debug!(function = %intent.function, args = args.len(), "resolved entry function intent");
    Ok(EntryFunction::new(module, name, type_args, args).into())
}

/// Transfers `amount` of a coin to `recipient`, creating the recipient
/// account if needed.
///
/// Without `coin_type` this is an APT transfer through
/// `0x1::aptos_account::transfer`; otherwise
/// `0x1::aptos_account::transfer_coins<coin_type>`.
pub fn transfer_coin_payload(
    recipient: AccountAddress,
    amount: u64,
    coin_type: Option<&str>,
) -> WalletResult<TransactionPayload> {
    let entry_function = match coin_type {
        None => EntryFunction::build(
            "0x1::aptos_account::transfer",
            vec![],
            &[&recipient, &U64(amount)],
        )?,
        Some(coin_type) => EntryFunction::build(
            "0x1::aptos_account::transfer_coins",
            vec![parse_type_tag(coin_type, ParseOptions::default())?],
            &[&recipient, &U64(amount)],
        )?,
    };
    debug!(%recipient, amount, ?coin_type, "built coin transfer");
    Ok(entry_function.into())
}

/// Transfers `amount` of the fungible asset described by the metadata
/// object at `metadata` through `0x1::primary_fungible_store::transfer`.
pub fn transfer_fungible_asset_payload(
    metadata: AccountAddress,
    recipient: AccountAddress,
    amount: u64,
) -> WalletResult<TransactionPayload> {
    let entry_function = EntryFunction::build(
        "0x1::primary_fungible_store::transfer",
        vec![TypeTag::struct_tag(StructTag::fungible_metadata())],
        &[&metadata, &recipient, &U64(amount)],
    )?;
    debug!(%metadata, %recipient, amount, "built fungible asset transfer");
    Ok(entry_function.into())
}

/// Wraps an entry function so a multisig account executes it.
///
/// `None` executes the payload the owners already stored on-chain.
pub fn multisig_payload(
    multisig_address: AccountAddress,
    entry_function: Option<EntryFunction>,
) -> TransactionPayload {
    Multisig::new(
        multisig_address,
        entry_function.map(MultisigTransactionPayload::EntryFunction),
    )
    .into()
}

/// Collects one authenticator per co-signer over the same transaction, in
/// the order given.
pub fn co_sign_transaction(
    transaction: &AnyRawTransaction,
    signers: &[&dyn Signer],
) -> WalletResult<Vec<AccountAuthenticator>> {
    debug!(signers = signers.len(), "co-signing transaction");
    signers
        .iter()
        .map(|signer| signer.sign_transaction_with_authenticator(transaction))
        .collect()
}
