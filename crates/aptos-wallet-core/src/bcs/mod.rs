//! Binary Canonical Serialization (BCS).
//!
//! BCS is the wire format for every on-chain value and transaction:
//!
//! - fixed-width integers are little-endian (`u128` is 16 bytes, `u256` is 32)
//! - `bool` is one byte, `0` or `1`
//! - sequences, byte strings and UTF-8 strings carry a ULEB128 length prefix
//! - `Option<T>` is a sequence of zero or one `T`
//! - enums start with a ULEB128 variant index
//! - struct fields are written in declaration order with no framing
//!
//! Types opt in by implementing [`Serializable`] and [`Deserializable`].

mod deserializer;
mod serializer;

pub use deserializer::{Deserializer, MAX_SEQUENCE_LENGTH};
pub use serializer::Serializer;

use crate::error::WalletResult;

/// A value with a canonical BCS encoding.
pub trait Serializable {
    /// Appends this value's BCS encoding.
    fn serialize(&self, serializer: &mut Serializer);

    /// Returns this value's BCS encoding.
    fn bcs_bytes(&self) -> Vec<u8> {
        let mut serializer = Serializer::new();
        self.serialize(&mut serializer);
        serializer.into_bytes()
    }
}

/// A value that can be read back from its BCS encoding.
pub trait Deserializable: Sized {
    /// Reads one value from the cursor.
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self>;
}

/// Serializes a value to BCS bytes.
pub fn to_bytes<T: Serializable + ?Sized>(value: &T) -> Vec<u8> {
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer);
    serializer.into_bytes()
}

/// Deserializes a value, failing if any input is left over.
pub fn from_bytes<T: Deserializable>(bytes: &[u8]) -> WalletResult<T> {
    let mut deserializer = Deserializer::new(bytes);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.assert_finished()?;
    Ok(value)
}

macro_rules! impl_primitive {
    ($ty:ty, $ser:ident, $de:ident) => {
        impl Serializable for $ty {
            fn serialize(&self, serializer: &mut Serializer) {
                serializer.$ser(*self);
            }
        }

        impl Deserializable for $ty {
            fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
                deserializer.$de()
            }
        }
    };
}

impl_primitive!(u8, serialize_u8, deserialize_u8);
impl_primitive!(u16, serialize_u16, deserialize_u16);
impl_primitive!(u32, serialize_u32, deserialize_u32);
impl_primitive!(u64, serialize_u64, deserialize_u64);
impl_primitive!(u128, serialize_u128, deserialize_u128);
impl_primitive!(bool, serialize_bool, deserialize_bool);

impl Serializable for str {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_str(self);
    }
}

impl Serializable for String {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_str(self);
    }
}

impl Deserializable for String {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_str()
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_vector(self);
    }
}

impl<T: Serializable> Serializable for [T] {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_vector(self);
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_vector()
    }
}

impl<T: Serializable> Serializable for Option<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.serialize_option(self.as_ref());
    }
}

impl<T: Deserializable> Deserializable for Option<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        deserializer.deserialize_option()
    }
}

impl<T: Serializable + ?Sized> Serializable for Box<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        (**self).serialize(serializer);
    }
}

impl<T: Deserializable> Deserializable for Box<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> WalletResult<Self> {
        Ok(Box::new(T::deserialize(deserializer)?))
    }
}

impl<T: Serializable + ?Sized> Serializable for &T {
    fn serialize(&self, serializer: &mut Serializer) {
        (**self).serialize(serializer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_bytes_rejects_leftover() {
        let bytes = to_bytes(&7u16);
        assert!(from_bytes::<u8>(&bytes).is_err());
        assert_eq!(from_bytes::<u16>(&bytes).unwrap(), 7);
    }

    #[test]
    fn test_nested_containers() {
        let value: Vec<Option<String>> = vec![Some("a".into()), None];
        let bytes = to_bytes(&value);
        assert_eq!(bytes, vec![2, 1, 1, b'a', 0]);
        assert_eq!(from_bytes::<Vec<Option<String>>>(&bytes).unwrap(), value);
    }

    #[test]
    fn test_byte_vector_matches_serialize_bytes() {
        let mut s = Serializer::new();
        s.serialize_bytes(&[1, 2, 3]);
        assert_eq!(to_bytes(&vec![1u8, 2, 3]), s.into_bytes());
    }

    #[test]
    fn test_matches_reference_encoder() {
        assert_eq!(to_bytes(&u64::MAX), ::bcs::to_bytes(&u64::MAX).unwrap());
        assert_eq!(
            to_bytes(&0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10u128),
            ::bcs::to_bytes(&0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10u128).unwrap()
        );
        let text = "héllo wörld".to_string();
        assert_eq!(to_bytes(&text), ::bcs::to_bytes(&text).unwrap());
        let nested = vec![vec![1u32, 2], vec![], vec![u32::MAX]];
        assert_eq!(to_bytes(&nested), ::bcs::to_bytes(&nested).unwrap());
        let opt: Option<bool> = Some(true);
        assert_eq!(to_bytes(&opt), ::bcs::to_bytes(&opt).unwrap());
    }

    #[test]
    fn test_long_sequence_prefix_matches_reference() {
        let long = vec![0u8; 300];
        assert_eq!(to_bytes(&long), ::bcs::to_bytes(&long).unwrap());
    }

    proptest! {
        #[test]
        fn prop_u64_round_trip(v in any::<u64>()) {
            let bytes = to_bytes(&v);
            prop_assert_eq!(bytes.len(), 8);
            prop_assert_eq!(from_bytes::<u64>(&bytes).unwrap(), v);
        }

        #[test]
        fn prop_string_round_trip(s in ".*") {
            let bytes = to_bytes(&s);
            prop_assert_eq!(&bytes, &::bcs::to_bytes(&s).unwrap());
            prop_assert_eq!(from_bytes::<String>(&bytes).unwrap(), s);
        }

        #[test]
        fn prop_uleb128_round_trip(v in any::<u32>()) {
            let mut s = Serializer::new();
            s.serialize_u32_as_uleb128(v);
            let bytes = s.into_bytes();
            let mut d = Deserializer::new(&bytes);
            prop_assert_eq!(d.deserialize_uleb128_as_u32().unwrap(), v);
            prop_assert_eq!(d.remaining(), 0);
        }

        #[test]
        fn prop_byte_vectors_round_trip(v in proptest::collection::vec(any::<u8>(), 0..512)) {
            let bytes = to_bytes(&v);
            prop_assert_eq!(from_bytes::<Vec<u8>>(&bytes).unwrap(), v);
        }
    }
}
