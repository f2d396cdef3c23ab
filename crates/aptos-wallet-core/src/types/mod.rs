//! Core on-chain identifier types.
//!
//! Addresses, chain ids, Move identifiers and type tags. Every type here has
//! a canonical BCS encoding and a canonical textual form.

mod address;
mod chain_id;
mod identifier;
mod type_tag;

pub use address::{AccountAddress, ADDRESS_LENGTH};
pub use chain_id::ChainId;
pub use identifier::{EntryFunctionId, Identifier, MoveModuleId};
pub(crate) use identifier::parse_path_address;
pub use type_tag::{parse_type_tag, ParseOptions, StructTag, TypeTag};
