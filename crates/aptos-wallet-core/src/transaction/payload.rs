//! Transaction payloads.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{WalletError, WalletResult};
use crate::move_values::EntryFunctionArgument;
use crate::types::{AccountAddress, EntryFunctionId, Identifier, MoveModuleId, TypeTag};
use std::str::FromStr;

/// The payload of a transaction, specifying what action to take.
///
/// Variant `1` is the retired module bundle; it is rejected when decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Execute a script with bytecode.
    Script(Script),
    /// Call an entry function on a module.
    EntryFunction(EntryFunction),
    /// Execute, or vote through, a multisig account transaction.
    Multisig(Multisig),
}

impl TransactionPayload {
    const SCRIPT: u32 = 0;
    const ENTRY_FUNCTION: u32 = 2;
    const MULTISIG: u32 = 3;
}

impl Serializable for TransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::Script(script) => {
                serializer.serialize_variant_index(Self::SCRIPT);
                script.serialize(serializer);
            }
            Self::EntryFunction(entry_function) => {
                serializer.serialize_variant_index(Self::ENTRY_FUNCTION);
                entry_function.serialize(serializer);
            }
            Self::Multisig(multisig) => {
                serializer.serialize_variant_index(Self::MULTISIG);
                multisig.serialize(serializer);
            }
        }
    }
}

impl Deserializable for TransactionPayload {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        match deserializer.deserialize_variant_index()? {
            Self::SCRIPT => Ok(Self::Script(Script::deserialize(deserializer)?)),
            Self::ENTRY_FUNCTION => Ok(Self::EntryFunction(EntryFunction::deserialize(
                deserializer,
            )?)),
            Self::MULTISIG => Ok(Self::Multisig(Multisig::deserialize(deserializer)?)),
            other => Err(WalletError::unknown_variant("TransactionPayload", other)),
        }
    }
}

impl From<EntryFunction> for TransactionPayload {
    fn from(entry_function: EntryFunction) -> Self {
        TransactionPayload::EntryFunction(entry_function)
    }
}

impl From<Script> for TransactionPayload {
    fn from(script: Script) -> Self {
        TransactionPayload::Script(script)
    }
}

impl From<Multisig> for TransactionPayload {
    fn from(multisig: Multisig) -> Self {
        TransactionPayload::Multisig(multisig)
    }
}

/// A script payload with inline bytecode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    /// The Move bytecode to execute.
    pub code: Vec<u8>,
    pub type_args: Vec<TypeTag>,
    pub args: Vec<ScriptArgument>,
}

impl Script {
    pub fn new(code: Vec<u8>, type_args: Vec<TypeTag>, args: Vec<ScriptArgument>) -> Self {
        Self {
            code,
            type_args,
            args,
        }
    }
}

impl Serializable for Script {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.code);
        serializer.serialize_vector(&self.type_args);
        serializer.serialize_vector(&self.args);
    }
}

impl Deserializable for Script {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            code: deserializer.deserialize_bytes()?,
            type_args: deserializer.deserialize_vector()?,
            args: deserializer.deserialize_vector()?,
        })
    }
}

/// An argument to a script, tagged with its Move type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptArgument {
    U8(u8),
    U64(u64),
    U128(u128),
    Address(AccountAddress),
    U8Vector(Vec<u8>),
    Bool(bool),
    U16(u16),
    U32(u32),
    /// A u256 value as 32 little-endian bytes.
    U256([u8; 32]),
    /// A value already in BCS form, for types without a dedicated tag.
    Serialized(Vec<u8>),
}

impl ScriptArgument {
    fn variant(&self) -> u32 {
        match self {
            Self::U8(_) => 0,
            Self::U64(_) => 1,
            Self::U128(_) => 2,
            Self::Address(_) => 3,
            Self::U8Vector(_) => 4,
            Self::Bool(_) => 5,
            Self::U16(_) => 6,
            Self::U32(_) => 7,
            Self::U256(_) => 8,
            Self::Serialized(_) => 9,
        }
    }
}

impl Serializable for ScriptArgument {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_variant_index(self.variant());
        match self {
            Self::U8(v) => serializer.serialize_u8(*v),
            Self::U64(v) => serializer.serialize_u64(*v),
            Self::U128(v) => serializer.serialize_u128(*v),
            Self::Address(address) => address.serialize(serializer),
            Self::U8Vector(bytes) | Self::Serialized(bytes) => serializer.serialize_bytes(bytes),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::U16(v) => serializer.serialize_u16(*v),
            Self::U32(v) => serializer.serialize_u32(*v),
            Self::U256(bytes) => serializer.serialize_fixed_bytes(bytes),
        }
    }
}

impl Deserializable for ScriptArgument {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(match deserializer.deserialize_variant_index()? {
            0 => Self::U8(deserializer.deserialize_u8()?),
            1 => Self::U64(deserializer.deserialize_u64()?),
            2 => Self::U128(deserializer.deserialize_u128()?),
            3 => Self::Address(AccountAddress::deserialize(deserializer)?),
            4 => Self::U8Vector(deserializer.deserialize_bytes()?),
            5 => Self::Bool(deserializer.deserialize_bool()?),
            6 => Self::U16(deserializer.deserialize_u16()?),
            7 => Self::U32(deserializer.deserialize_u32()?),
            8 => Self::U256(deserializer.deserialize_fixed_array()?),
            9 => Self::Serialized(deserializer.deserialize_bytes()?),
            other => return Err(WalletError::unknown_variant("ScriptArgument", other)),
        })
    }
}

/// An entry function call payload.
///
/// Each argument is kept as its plain BCS encoding; the payload wraps every
/// one in a length prefix on the wire.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::move_values::U64;
/// use aptos_wallet_core::transaction::EntryFunction;
/// use aptos_wallet_core::types::AccountAddress;
///
/// let recipient = AccountAddress::from_str_relaxed("0x123").unwrap();
/// let entry_function = EntryFunction::build(
///     "0x1::aptos_account::transfer",
///     vec![],
///     &[&recipient, &U64(1000)],
/// )
/// .unwrap();
/// assert_eq!(entry_function.args[1], 1000u64.to_le_bytes().to_vec());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunction {
    /// The module containing the function.
    pub module: MoveModuleId,
    pub function: Identifier,
    /// Type arguments for generic functions.
    pub type_args: Vec<TypeTag>,
    /// BCS-encoded arguments.
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    pub fn new(
        module: MoveModuleId,
        function: Identifier,
        type_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            module,
            function,
            type_args,
            args,
        }
    }

    /// Creates an entry function from `address::module::function` and
    /// already encoded arguments.
    pub fn from_function_id(
        function_id: &str,
        type_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> WalletResult<Self> {
        let EntryFunctionId { module, name } = EntryFunctionId::from_str(function_id)?;
        Ok(Self::new(module, name, type_args, args))
    }

    /// Creates an entry function from typed Move values.
    pub fn build(
        function_id: &str,
        type_args: Vec<TypeTag>,
        args: &[&dyn EntryFunctionArgument],
    ) -> WalletResult<Self> {
        let args = args.iter().map(|arg| arg.to_entry_function_bytes()).collect();
        Self::from_function_id(function_id, type_args, args)
    }

    /// `address::module::function`.
    pub fn function_id(&self) -> EntryFunctionId {
        EntryFunctionId::new(self.module.clone(), self.function.clone())
    }
}

impl Serializable for EntryFunction {
    fn serialize(&self, serializer: &mut Serializer) {
        self.module.serialize(serializer);
        self.function.serialize(serializer);
        serializer.serialize_vector(&self.type_args);
        serializer.serialize_vector(&self.args);
    }
}

impl Deserializable for EntryFunction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            module: MoveModuleId::deserialize(deserializer)?,
            function: Identifier::deserialize(deserializer)?,
            type_args: deserializer.deserialize_vector()?,
            args: deserializer.deserialize_vector()?,
        })
    }
}

/// A payload executed on behalf of a multisig account.
///
/// Without an inner payload the chain executes the transaction the owners
/// already stored on-chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Multisig {
    pub multisig_address: AccountAddress,
    pub transaction_payload: Option<MultisigTransactionPayload>,
}

impl Multisig {
    pub fn new(
        multisig_address: AccountAddress,
        transaction_payload: Option<MultisigTransactionPayload>,
    ) -> Self {
        Self {
            multisig_address,
            transaction_payload,
        }
    }
}

impl Serializable for Multisig {
    fn serialize(&self, serializer: &mut Serializer) {
        self.multisig_address.serialize(serializer);
        serializer.serialize_option(self.transaction_payload.as_ref());
    }
}

impl Deserializable for Multisig {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Self {
            multisig_address: AccountAddress::deserialize(deserializer)?,
            transaction_payload: deserializer.deserialize_option()?,
        })
    }
}

/// The payload a multisig account executes. Only entry functions exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultisigTransactionPayload {
    EntryFunction(EntryFunction),
}

impl Serializable for MultisigTransactionPayload {
    fn serialize(&self, serializer: &mut Serializer) {
        match self {
            Self::EntryFunction(entry_function) => {
                serializer.serialize_variant_index(0);
                entry_function.serialize(serializer);
            }
        }
    }
}

impl Deserializable for MultisigTransactionPayload {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        match deserializer.deserialize_variant_index()? {
            0 => Ok(Self::EntryFunction(EntryFunction::deserialize(deserializer)?)),
            other => Err(WalletError::unknown_variant(
                "MultisigTransactionPayload",
                other,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs::{from_bytes, to_bytes};
    use crate::move_values::{MoveString, U64};

    fn transfer() -> EntryFunction {
        let recipient = AccountAddress::from_str_relaxed("0x123").unwrap();
        EntryFunction::build(
            "0x1::aptos_account::transfer",
            vec![],
            &[&recipient, &U64(1000)],
        )
        .unwrap()
    }

    #[test]
    fn test_entry_function_layout() {
        let payload = TransactionPayload::from(transfer());
        let bytes = to_bytes(&payload);
        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[1..33], AccountAddress::ONE.as_bytes());
        assert_eq!(bytes[33] as usize, "aptos_account".len());
        // type args, then two args of 32 and 8 bytes
        let tail = &bytes[bytes.len() - (1 + 1 + 1 + 32 + 1 + 8)..];
        assert_eq!(&tail[..3], &[0, 2, 32]);
        assert_eq!(&tail[35..], &[8, 0xe8, 0x03, 0, 0, 0, 0, 0, 0]);
        assert_eq!(from_bytes::<TransactionPayload>(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_matches_bcs_crate() {
        let entry = transfer();
        let oracle = bcs::to_bytes(&(
            (entry.module.address.to_bytes(), "aptos_account"),
            "transfer",
            Vec::<u8>::new(),
            &entry.args,
        ))
        .unwrap();
        assert_eq!(to_bytes(&entry), oracle);
    }

    #[test]
    fn test_module_bundle_rejected() {
        assert!(matches!(
            from_bytes::<TransactionPayload>(&[1, 0]),
            Err(WalletError::UnknownVariant { what: "TransactionPayload", index: 1 })
        ));
    }

    #[test]
    fn test_script_arguments() {
        let script = Script::new(
            vec![0xa1, 0x1c],
            vec![TypeTag::U64],
            vec![
                ScriptArgument::U8(7),
                ScriptArgument::U256([1; 32]),
                ScriptArgument::Address(AccountAddress::ONE),
                ScriptArgument::Serialized(to_bytes(&MoveString::new("hi"))),
            ],
        );
        let bytes = to_bytes(&TransactionPayload::from(script.clone()));
        assert_eq!(&bytes[..6], &[0, 2, 0xa1, 0x1c, 1, 2]);
        assert_eq!(&bytes[6..9], &[4, 0, 7]);
        assert_eq!(bytes[9], 8);
        let decoded: TransactionPayload = from_bytes(&bytes).unwrap();
        assert_eq!(decoded, TransactionPayload::Script(script));
    }

    #[test]
    fn test_multisig_payload() {
        let multisig = Multisig::new(
            AccountAddress::A,
            Some(MultisigTransactionPayload::EntryFunction(transfer())),
        );
        let bytes = to_bytes(&TransactionPayload::from(multisig.clone()));
        assert_eq!(bytes[0], 3);
        assert_eq!(&bytes[33..35], &[1, 0]);
        assert_eq!(
            from_bytes::<TransactionPayload>(&bytes).unwrap(),
            TransactionPayload::Multisig(multisig)
        );

        let empty = to_bytes(&Multisig::new(AccountAddress::A, None));
        assert_eq!(empty.len(), 33);
        assert_eq!(empty[32], 0);
    }
}
