//! Move module ABIs as served by a full node's `/accounts/{addr}/module/{name}`.

use crate::error::{WalletError, WalletResult};
use crate::types::{parse_type_tag, AccountAddress, Identifier, MoveModuleId, ParseOptions, TypeTag};
use serde::{Deserialize, Serialize};

/// Move module ABI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveModuleAbi {
    /// The module address.
    pub address: String,
    /// The module name.
    pub name: String,
    #[serde(default)]
    pub friends: Vec<String>,
    /// Exposed functions.
    pub exposed_functions: Vec<MoveFunctionAbi>,
    /// Structs defined in the module.
    #[serde(default)]
    pub structs: Vec<MoveStructAbi>,
}

impl MoveModuleAbi {
    /// Parses an ABI from the node's JSON.
    pub fn from_json(json: &str) -> WalletResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The `address::name` identifier of this module.
    pub fn module_id(&self) -> WalletResult<MoveModuleId> {
        Ok(MoveModuleId::new(
            AccountAddress::from_str_relaxed(&self.address)?,
            Identifier::new(self.name.as_str())?,
        ))
    }

    /// Looks up an exposed function by name.
    ///
    /// # Errors
    ///
    /// [`WalletError::AbiMismatch`] if the module exposes no such function.
    pub fn function(&self, name: &str) -> WalletResult<&MoveFunctionAbi> {
        self.exposed_functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| {
                WalletError::AbiMismatch(format!(
                    "function '{name}' not found in module {}::{}",
                    self.address, self.name
                ))
            })
    }
}

/// Function visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveFunctionVisibility {
    Private,
    Public,
    Friend,
}

/// A function defined in a Move module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFunctionAbi {
    /// Function name.
    pub name: String,
    pub visibility: MoveFunctionVisibility,
    /// Whether this is an entry function.
    pub is_entry: bool,
    /// Whether this is a view function.
    #[serde(default)]
    pub is_view: bool,
    /// Generic type parameters.
    pub generic_type_params: Vec<MoveFunctionGenericTypeParam>,
    /// Parameter types, including any leading `signer`s.
    pub params: Vec<String>,
    /// Return types.
    #[serde(rename = "return")]
    pub returns: Vec<String>,
}

impl MoveFunctionAbi {
    /// Every parameter type, parsed. May contain `&signer` and `T{n}`.
    pub fn parameter_types(&self) -> WalletResult<Vec<TypeTag>> {
        self.params
            .iter()
            .map(|param| parse_type_tag(param, ParseOptions::abi()))
            .collect()
    }

    /// The parameters a caller supplies: everything after the leading
    /// `signer` / `&signer` run, which the VM fills in from the transaction.
    pub fn argument_types(&self) -> WalletResult<Vec<TypeTag>> {
        Ok(self
            .parameter_types()?
            .into_iter()
            .skip_while(TypeTag::is_signer)
            .collect())
    }
}

/// Generic type parameter in a function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFunctionGenericTypeParam {
    /// Constraints on the type parameter.
    pub constraints: Vec<String>,
}

/// A struct defined in a Move module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveStructAbi {
    pub name: String,
    pub is_native: bool,
    pub abilities: Vec<String>,
    pub generic_type_params: Vec<MoveStructGenericTypeParam>,
    pub fields: Vec<MoveStructField>,
}

/// Generic type parameter in a struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveStructGenericTypeParam {
    pub constraints: Vec<String>,
}

/// A field in a Move struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveStructField {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
}
