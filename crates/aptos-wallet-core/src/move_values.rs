//! Typed Move values.
//!
//! Each wrapper knows its plain BCS form (used when the value is a struct field
//! or vector element) and its entry-function argument form, which wraps the
//! plain bytes in one more length prefix because arguments travel as opaque
//! byte blobs.

use crate::bcs::{Deserializable, Deserializer, Serializable, Serializer};
use crate::error::{WalletError, WalletResult};
use crate::transaction::ScriptArgument;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use std::fmt;

/// A value that can be passed to an entry function.
pub trait EntryFunctionArgument: Serializable {
    /// Writes the plain BCS bytes as one length-prefixed byte string.
    fn serialize_for_entry_function(&self, serializer: &mut Serializer) {
        serializer.serialize_bytes(&self.bcs_bytes());
    }

    /// The encoded argument as it is stored in `EntryFunction::args`.
    fn to_entry_function_bytes(&self) -> Vec<u8> {
        self.bcs_bytes()
    }
}

/// A value that can be passed to a script payload.
pub trait ScriptFunctionArgument {
    /// The tagged script argument for this value.
    fn to_script_argument(&self) -> ScriptArgument;

    /// Writes the tagged script argument.
    fn serialize_for_script_function(&self, serializer: &mut Serializer) {
        self.to_script_argument().serialize(serializer);
    }
}

fn parse_big_int(text: &str) -> WalletResult<BigInt> {
    text.trim()
        .parse::<BigInt>()
        .map_err(|e| WalletError::out_of_range(format!("'{text}' is not an integer: {e}")))
}

macro_rules! move_uint {
    ($name:ident, $inner:ty, $label:literal, $to:ident, $ser:ident, $de:ident, $script:ident) => {
        #[doc = concat!("A Move `", $label, "`.")]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub $inner);

        impl $name {
            #[doc = concat!("Range-checked conversion into a `", $label, "`.")]
            pub fn from_big_int(value: &BigInt) -> WalletResult<Self> {
                value.$to().map(Self).ok_or_else(|| {
                    WalletError::out_of_range(format!("{value} does not fit in {}", $label))
                })
            }

            /// Parses a decimal string, rejecting negatives and overflow.
            pub fn from_dec_str(text: &str) -> WalletResult<Self> {
                Self::from_big_int(&parse_big_int(text)?)
            }

            pub fn value(&self) -> $inner {
                self.0
            }
        }

        impl TryFrom<i128> for $name {
            type Error = WalletError;

            fn try_from(value: i128) -> WalletResult<Self> {
                Self::from_big_int(&BigInt::from(value))
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serializable for $name {
            fn serialize(&self, serializer: &mut Serializer) {
                serializer.$ser(self.0);
            }
        }

        impl Deserializable for $name {
            fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
                deserializer.$de().map(Self)
            }
        }

        impl EntryFunctionArgument for $name {}

        impl ScriptFunctionArgument for $name {
            fn to_script_argument(&self) -> ScriptArgument {
                ScriptArgument::$script(self.0)
            }
        }
    };
}

move_uint!(U8, u8, "u8", to_u8, serialize_u8, deserialize_u8, U8);
move_uint!(U16, u16, "u16", to_u16, serialize_u16, deserialize_u16, U16);
move_uint!(U32, u32, "u32", to_u32, serialize_u32, deserialize_u32, U32);
move_uint!(U64, u64, "u64", to_u64, serialize_u64, deserialize_u64, U64);
move_uint!(U128, u128, "u128", to_u128, serialize_u128, deserialize_u128, U128);

/// A Move `u256`, held as an arbitrary-precision integer known to fit 256 bits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct U256(BigUint);

impl U256 {
    /// The largest `u256`.
    pub fn max_value() -> Self {
        Self((BigUint::from(1u8) << 256) - 1u8)
    }

    /// Range-checked conversion from an unsigned big integer.
    pub fn new(value: BigUint) -> WalletResult<Self> {
        if value.bits() > 256 {
            return Err(WalletError::out_of_range(format!(
                "{value} does not fit in u256"
            )));
        }
        Ok(Self(value))
    }

    /// Range-checked conversion from a signed big integer.
    pub fn from_big_int(value: &BigInt) -> WalletResult<Self> {
        match value.to_biguint() {
            Some(unsigned) if value.sign() != Sign::Minus => Self::new(unsigned),
            _ => Err(WalletError::out_of_range(format!(
                "{value} does not fit in u256"
            ))),
        }
    }

    /// Parses a decimal string, rejecting negatives and overflow.
    pub fn from_dec_str(text: &str) -> WalletResult<Self> {
        Self::from_big_int(&parse_big_int(text)?)
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// The 32-byte little-endian wire form.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        let bytes = self.0.to_bytes_le();
        out[..bytes.len()].copy_from_slice(&bytes);
        out
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serializable for U256 {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_fixed_bytes(&self.to_le_bytes());
    }
}

impl Deserializable for U256 {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_u256().map(Self)
    }
}

impl EntryFunctionArgument for U256 {}

impl ScriptFunctionArgument for U256 {
    fn to_script_argument(&self) -> ScriptArgument {
        ScriptArgument::U256(self.to_le_bytes())
    }
}

/// A Move `bool`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bool(pub bool);

impl Serializable for Bool {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_bool(self.0);
    }
}

impl Deserializable for Bool {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_bool().map(Self)
    }
}

impl EntryFunctionArgument for Bool {}

impl ScriptFunctionArgument for Bool {
    fn to_script_argument(&self) -> ScriptArgument {
        ScriptArgument::Bool(self.0)
    }
}

/// A Move `0x1::string::String`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct MoveString(pub String);

impl MoveString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl Serializable for MoveString {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_str(&self.0);
    }
}

impl Deserializable for MoveString {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_str().map(Self)
    }
}

impl EntryFunctionArgument for MoveString {}

impl ScriptFunctionArgument for MoveString {
    fn to_script_argument(&self) -> ScriptArgument {
        ScriptArgument::U8Vector(self.0.as_bytes().to_vec())
    }
}

/// A Move `vector<T>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct MoveVector<T>(pub Vec<T>);

impl<T> MoveVector<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl MoveVector<U8> {
    /// The canonical representation of a raw byte argument.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().copied().map(U8).collect())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().map(U8::value).collect()
    }
}

impl<T: Serializable> Serializable for MoveVector<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_vector(&self.0);
    }
}

impl<T: Deserializable> Deserializable for MoveVector<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_vector().map(Self)
    }
}

impl<T: Serializable> EntryFunctionArgument for MoveVector<T> {}

impl ScriptFunctionArgument for MoveVector<U8> {
    fn to_script_argument(&self) -> ScriptArgument {
        ScriptArgument::U8Vector(self.to_bytes())
    }
}

/// A Move `0x1::option::Option<T>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveOption<T>(pub Option<T>);

impl<T> MoveOption<T> {
    pub fn some(value: T) -> Self {
        Self(Some(value))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the inner value.
    ///
    /// # Errors
    ///
    /// Fails when the option is empty.
    pub fn unwrap_value(&self) -> WalletResult<&T> {
        self.0
            .as_ref()
            .ok_or_else(|| WalletError::OutOfRange("called unwrap_value on None".into()))
    }
}

impl<T> Default for MoveOption<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: Serializable> Serializable for MoveOption<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_option(self.0.as_ref());
    }
}

impl<T: Deserializable> Deserializable for MoveOption<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_option().map(Self)
    }
}

impl<T: Serializable> EntryFunctionArgument for MoveOption<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs::{from_bytes, to_bytes};
    use proptest::prelude::*;

    fn entry_bytes<T: EntryFunctionArgument>(value: &T) -> Vec<u8> {
        let mut s = Serializer::new();
        value.serialize_for_entry_function(&mut s);
        s.into_bytes()
    }

    #[test]
    fn test_entry_function_form_adds_length_prefix() {
        assert_eq!(to_bytes(&U64(1)), vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(entry_bytes(&U64(1)), vec![8, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(entry_bytes(&Bool(true)), vec![1, 1]);
        assert_eq!(entry_bytes(&MoveString::new("hi")), vec![3, 2, b'h', b'i']);
    }

    #[test]
    fn test_option_encoding() {
        assert_eq!(to_bytes(&MoveOption::<U8>::none()), vec![0]);
        assert_eq!(to_bytes(&MoveOption::some(U8(5))), vec![1, 5]);
        assert_eq!(entry_bytes(&MoveOption::some(U8(5))), vec![2, 1, 5]);
    }

    #[test]
    fn test_byte_vector() {
        let v = MoveVector::<U8>::from_bytes(&[0xde, 0xad]);
        assert_eq!(to_bytes(&v), vec![2, 0xde, 0xad]);
        assert_eq!(v.to_bytes(), vec![0xde, 0xad]);
    }

    #[test]
    fn test_width_boundaries() {
        assert_eq!(U8::from_dec_str("255").unwrap(), U8(255));
        assert!(U8::from_dec_str("256").is_err());
        assert!(U8::try_from(-1i128).is_err());
        assert_eq!(U16::try_from(65535i128).unwrap(), U16(u16::MAX));
        assert!(U16::try_from(65536i128).is_err());
        assert!(U32::from_dec_str("4294967296").is_err());
        assert_eq!(
            U64::from_dec_str("18446744073709551615").unwrap(),
            U64(u64::MAX)
        );
        assert!(U64::from_dec_str("18446744073709551616").is_err());
        assert!(U128::from_dec_str("340282366920938463463374607431768211456").is_err());
        assert!(U128::from_dec_str("-1").is_err());
        assert!(U64::from_dec_str("1.5").is_err());
    }

    #[test]
    fn test_out_of_range_kind() {
        assert!(matches!(
            U8::from_dec_str("300"),
            Err(WalletError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_u256_boundaries() {
        let max = U256::max_value();
        assert_eq!(max.to_le_bytes(), [0xff; 32]);
        let max_text = max.to_string();
        assert_eq!(U256::from_dec_str(&max_text).unwrap(), max);
        let over = (BigUint::from(1u8) << 256usize).to_string();
        assert!(U256::from_dec_str(&over).is_err());
        assert!(U256::from_dec_str("-5").is_err());
        assert_eq!(to_bytes(&U256::from(1u128))[0], 1);
        assert_eq!(to_bytes(&U256::from(1u128)).len(), 32);
    }

    #[test]
    fn test_script_arguments() {
        assert!(matches!(U8(1).to_script_argument(), ScriptArgument::U8(1)));
        assert!(matches!(
            MoveString::new("ab").to_script_argument(),
            ScriptArgument::U8Vector(ref b) if b == b"ab"
        ));
    }

    #[test]
    fn test_nested_vector_round_trip() {
        let v = MoveVector::new(vec![
            MoveVector::new(vec![U16(1), U16(2)]),
            MoveVector::new(vec![]),
        ]);
        let bytes = to_bytes(&v);
        assert_eq!(bytes, vec![2, 2, 1, 0, 2, 0, 0]);
        assert_eq!(from_bytes::<MoveVector<MoveVector<U16>>>(&bytes).unwrap(), v);
    }

    proptest! {
        #[test]
        fn prop_u128_round_trip(v in any::<u128>()) {
            let bytes = to_bytes(&U128(v));
            prop_assert_eq!(bytes.len(), 16);
            prop_assert_eq!(from_bytes::<U128>(&bytes).unwrap(), U128(v));
        }

        #[test]
        fn prop_u256_round_trip(bytes in proptest::array::uniform32(any::<u8>())) {
            let value = U256::new(BigUint::from_bytes_le(&bytes)).unwrap();
            let encoded = to_bytes(&value);
            prop_assert_eq!(&encoded[..], &bytes[..]);
            prop_assert_eq!(from_bytes::<U256>(&encoded).unwrap(), value);
        }

        #[test]
        fn prop_option_string_round_trip(s in proptest::option::of(".{0,40}")) {
            let value = MoveOption(s.map(MoveString));
            let bytes = to_bytes(&value);
            prop_assert_eq!(from_bytes::<MoveOption<MoveString>>(&bytes).unwrap(), value);
        }

        #[test]
        fn prop_u8_vector_round_trip(v in proptest::collection::vec(any::<u8>(), 0..200)) {
            let value = MoveVector::<U8>::from_bytes(&v);
            let bytes = to_bytes(&value);
            prop_assert_eq!(&bytes, &::bcs::to_bytes(&v).unwrap());
            prop_assert_eq!(from_bytes::<MoveVector<U8>>(&bytes).unwrap(), value);
        }
    }
}
