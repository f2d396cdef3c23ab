//! Loosely typed entry function arguments and their BCS encoding.
//!
//! Dapps hand the wallet arguments as JSON. The encoding of each value is only
//! known once it is paired with the parameter type from the module ABI, so
//! [`ArgumentValue`] stays untyped until [`ArgumentValue::encode`] is called.

use crate::bcs::{Serializable, Serializer};
use crate::error::{WalletError, WalletResult};
use crate::hex_codec::Hex;
use crate::move_values::{Bool, U128, U16, U256, U32, U64, U8};
use crate::types::{AccountAddress, TypeTag};
use num_bigint::BigInt;
use serde::Deserialize;

/// An argument value before it is matched against a parameter type.
///
/// | Parameter type                  | Accepted values                          |
/// |---------------------------------|------------------------------------------|
/// | `bool`                          | `Bool`, `"true"` / `"false"`             |
/// | `u8` ... `u256`                 | `Integer`, decimal `String`              |
/// | `address`, `Object<T>`          | `String` holding an address              |
/// | `0x1::string::String`           | `String`                                 |
/// | `vector<u8>`                    | `0x`-hex `String`, `Vector`              |
/// | `vector<T>`                     | `Vector`                                 |
/// | `0x1::option::Option<T>`        | `Option`, or any value accepted by `T`   |
///
/// `Raw` is copied through untouched for every type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum ArgumentValue {
    Bool(bool),
    /// Integers beyond `i128` must be passed as decimal strings.
    Integer(i128),
    String(String),
    Vector(Vec<ArgumentValue>),
    Option(Option<Box<ArgumentValue>>),
    /// Bytes already in BCS form.
    Raw(Vec<u8>),
}

impl ArgumentValue {
    pub fn none() -> Self {
        Self::Option(None)
    }

    pub fn some(value: impl Into<ArgumentValue>) -> Self {
        Self::Option(Some(Box::new(value.into())))
    }

    /// Encodes the value as a `type_tag`, ready to be stored in
    /// [`EntryFunction::args`](crate::transaction::EntryFunction).
    ///
    /// `type_tag` must be concrete: generics are substituted by the caller.
    ///
    /// # Errors
    ///
    /// [`WalletError::AbiMismatch`] when the value's shape does not fit the
    /// type, [`WalletError::OutOfRange`] for integers that overflow it, and
    /// the address or hex errors of malformed strings.
    pub fn encode(&self, type_tag: &TypeTag) -> WalletResult<Vec<u8>> {
        let mut serializer = Serializer::new();
        self.encode_into(type_tag, &mut serializer)?;
        Ok(serializer.into_bytes())
    }

    fn encode_into(&self, type_tag: &TypeTag, out: &mut Serializer) -> WalletResult<()> {
        if let Self::Raw(bytes) = self {
            out.serialize_fixed_bytes(bytes);
            return Ok(());
        }
        match type_tag {
            TypeTag::Bool => Bool(self.as_bool(type_tag)?).serialize(out),
            TypeTag::U8 => self.uint(type_tag, U8::from_big_int)?.serialize(out),
            TypeTag::U16 => self.uint(type_tag, U16::from_big_int)?.serialize(out),
            TypeTag::U32 => self.uint(type_tag, U32::from_big_int)?.serialize(out),
            TypeTag::U64 => self.uint(type_tag, U64::from_big_int)?.serialize(out),
            TypeTag::U128 => self.uint(type_tag, U128::from_big_int)?.serialize(out),
            TypeTag::U256 => self.uint(type_tag, U256::from_big_int)?.serialize(out),
            TypeTag::Address => self.as_address(type_tag)?.serialize(out),
            TypeTag::Vector(element) => match (self, &**element) {
                (Self::String(text), TypeTag::U8) => {
                    out.serialize_bytes(Hex::from_hex_input(text)?.as_bytes());
                }
                (Self::Vector(items), element) => {
                    out.serialize_len(items.len());
                    for item in items {
                        item.encode_into(element, out)?;
                    }
                }
                _ => return Err(self.mismatch(type_tag)),
            },
            TypeTag::Struct(tag) if tag.is_framework("string", "String") => match self {
                Self::String(text) => out.serialize_str(text),
                _ => return Err(self.mismatch(type_tag)),
            },
            TypeTag::Struct(tag) if tag.is_framework("object", "Object") => {
                self.as_address(type_tag)?.serialize(out);
            }
            TypeTag::Struct(tag) if tag.is_framework("option", "Option") => {
                let inner = tag.type_args.first().ok_or_else(|| self.mismatch(type_tag))?;
                match self {
                    Self::Option(None) => out.serialize_len(0),
                    Self::Option(Some(value)) => {
                        out.serialize_len(1);
                        value.encode_into(inner, out)?;
                    }
                    value => {
                        out.serialize_len(1);
                        value.encode_into(inner, out)?;
                    }
                }
            }
            TypeTag::Struct(_)
            | TypeTag::Signer
            | TypeTag::Reference(_)
            | TypeTag::Generic(_) => {
                return Err(WalletError::AbiMismatch(format!(
                    "parameters of type {type_tag} cannot be passed as arguments"
                )))
            }
        }
        Ok(())
    }

    fn as_bool(&self, type_tag: &TypeTag) -> WalletResult<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            Self::String(text) if text == "true" => Ok(true),
            Self::String(text) if text == "false" => Ok(false),
            _ => Err(self.mismatch(type_tag)),
        }
    }

    fn uint<T>(
        &self,
        type_tag: &TypeTag,
        convert: impl Fn(&BigInt) -> WalletResult<T>,
    ) -> WalletResult<T> {
        let value = match self {
            Self::Integer(value) => BigInt::from(*value),
            Self::String(text) => text
                .trim()
                .parse::<BigInt>()
                .map_err(|_| self.mismatch(type_tag))?,
            _ => return Err(self.mismatch(type_tag)),
        };
        convert(&value)
    }

    fn as_address(&self, type_tag: &TypeTag) -> WalletResult<AccountAddress> {
        match self {
            Self::String(text) => AccountAddress::from_str_relaxed(text),
            _ => Err(self.mismatch(type_tag)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::Vector(_) => "vector",
            Self::Option(_) => "option",
            Self::Raw(_) => "raw bytes",
        }
    }

    fn mismatch(&self, type_tag: &TypeTag) -> WalletError {
        WalletError::AbiMismatch(format!("expected {type_tag}, got {} {self:?}", self.kind()))
    }
}

impl TryFrom<serde_json::Value> for ArgumentValue {
    type Error = WalletError;

    fn try_from(value: serde_json::Value) -> WalletResult<Self> {
        use serde_json::Value;

        Ok(match value {
            Value::Null => Self::Option(None),
            Value::Bool(value) => Self::Bool(value),
            Value::Number(number) => {
                if let Some(value) = number.as_u64() {
                    Self::Integer(i128::from(value))
                } else if let Some(value) = number.as_i64() {
                    Self::Integer(i128::from(value))
                } else {
                    return Err(WalletError::AbiMismatch(format!(
                        "{number} is not an integer"
                    )));
                }
            }
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::Vector(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<WalletResult<_>>()?,
            ),
            Value::Object(_) => {
                return Err(WalletError::AbiMismatch(
                    "JSON objects are not valid arguments".into(),
                ))
            }
        })
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for ArgumentValue {
    fn from(value: u64) -> Self {
        Self::Integer(i128::from(value))
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<AccountAddress> for ArgumentValue {
    fn from(address: AccountAddress) -> Self {
        Self::String(address.to_string())
    }
}

impl From<Vec<ArgumentValue>> for ArgumentValue {
    fn from(items: Vec<ArgumentValue>) -> Self {
        Self::Vector(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_type_tag, ParseOptions};

    fn ty(text: &str) -> TypeTag {
        parse_type_tag(text, ParseOptions::default()).unwrap()
    }

    fn encode(value: ArgumentValue, text: &str) -> WalletResult<Vec<u8>> {
        value.encode(&ty(text))
    }

    #[test]
    fn test_integers_from_numbers_and_strings() {
        assert_eq!(encode(7u64.into(), "u8").unwrap(), vec![7]);
        assert_eq!(encode("513".into(), "u16").unwrap(), vec![1, 2]);
        assert_eq!(
            encode(1000u64.into(), "u64").unwrap(),
            ::bcs::to_bytes(&1000u64).unwrap()
        );
        assert_eq!(
            encode("340282366920938463463374607431768211455".into(), "u128").unwrap(),
            ::bcs::to_bytes(&u128::MAX).unwrap()
        );
        let mut max = vec![0xff; 32];
        assert_eq!(
            encode(
                "115792089237316195423570985008687907853269984665640564039457584007913129639935"
                    .into(),
                "u256"
            )
            .unwrap(),
            max
        );
        max[0] = 1;
        max[1..].fill(0);
        assert_eq!(encode(1u64.into(), "u256").unwrap(), max);
    }

    #[test]
    fn test_integer_range_errors() {
        assert!(matches!(
            encode(256u64.into(), "u8"),
            Err(WalletError::OutOfRange(_))
        ));
        assert!(matches!(
            encode(ArgumentValue::Integer(-1), "u64"),
            Err(WalletError::OutOfRange(_))
        ));
        assert!(matches!(
            encode("twelve".into(), "u64"),
            Err(WalletError::AbiMismatch(_))
        ));
        assert!(matches!(
            encode(true.into(), "u64"),
            Err(WalletError::AbiMismatch(_))
        ));
    }

    #[test]
    fn test_bool_and_address() {
        assert_eq!(encode(true.into(), "bool").unwrap(), vec![1]);
        assert_eq!(encode("false".into(), "bool").unwrap(), vec![0]);
        assert_eq!(
            encode("0x1".into(), "address").unwrap(),
            AccountAddress::ONE.to_bytes().to_vec()
        );
        assert!(matches!(
            encode("0xzz".into(), "address"),
            Err(WalletError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_vectors() {
        assert_eq!(encode("0x0102ff".into(), "vector<u8>").unwrap(), vec![3, 1, 2, 0xff]);
        let values: Vec<ArgumentValue> = vec![1u64.into(), 2u64.into()];
        assert_eq!(
            encode(values.into(), "vector<u64>").unwrap(),
            ::bcs::to_bytes(&vec![1u64, 2]).unwrap()
        );
        let nested: ArgumentValue = vec![ArgumentValue::from(vec![ArgumentValue::from("a")])].into();
        assert_eq!(
            encode(nested, "vector<vector<0x1::string::String>>").unwrap(),
            ::bcs::to_bytes(&vec![vec!["a".to_string()]]).unwrap()
        );
        assert!(matches!(
            encode("0x01".into(), "vector<u64>"),
            Err(WalletError::AbiMismatch(_))
        ));
    }

    #[test]
    fn test_framework_structs() {
        assert_eq!(
            encode("hi".into(), "0x1::string::String").unwrap(),
            ::bcs::to_bytes("hi").unwrap()
        );
        assert_eq!(
            encode("0xa".into(), "0x1::object::Object<0x1::fungible_asset::Metadata>").unwrap(),
            AccountAddress::from_str_relaxed("0xa").unwrap().to_bytes().to_vec()
        );
        assert_eq!(
            encode(ArgumentValue::none(), "0x1::option::Option<u64>").unwrap(),
            ::bcs::to_bytes(&None::<u64>).unwrap()
        );
        assert_eq!(
            encode(ArgumentValue::some(5u64), "0x1::option::Option<u64>").unwrap(),
            ::bcs::to_bytes(&Some(5u64)).unwrap()
        );
        assert_eq!(
            encode(5u64.into(), "0x1::option::Option<u64>").unwrap(),
            ::bcs::to_bytes(&Some(5u64)).unwrap()
        );
        assert!(matches!(
            encode("x".into(), "0x1::coin::Coin<0x1::aptos_coin::AptosCoin>"),
            Err(WalletError::AbiMismatch(_))
        ));
    }

    #[test]
    fn test_raw_passthrough() {
        let raw = ArgumentValue::Raw(vec![9, 9]);
        assert_eq!(encode(raw.clone(), "u16").unwrap(), vec![9, 9]);
        assert_eq!(
            encode(vec![raw].into(), "vector<u16>").unwrap(),
            vec![1, 9, 9]
        );
    }

    #[test]
    fn test_non_argument_types_rejected() {
        assert!(ArgumentValue::from("0x1").encode(&TypeTag::Signer).is_err());
        assert!(ArgumentValue::from(1u64).encode(&TypeTag::Generic(0)).is_err());
    }

    #[test]
    fn test_from_json() {
        let values: Vec<ArgumentValue> =
            serde_json::from_str(r#"[true, 12, -3, "0x1", [1, 2], null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ArgumentValue::Bool(true),
                ArgumentValue::Integer(12),
                ArgumentValue::Integer(-3),
                ArgumentValue::String("0x1".into()),
                ArgumentValue::Vector(vec![ArgumentValue::Integer(1), ArgumentValue::Integer(2)]),
                ArgumentValue::Option(None),
            ]
        );
        assert!(serde_json::from_str::<ArgumentValue>("1.5").is_err());
        assert!(serde_json::from_str::<ArgumentValue>("{\"a\": 1}").is_err());
    }
}
