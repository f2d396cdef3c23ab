//! Append-only BCS writer.

use crate::error::{WalletError, WalletResult};
use num_bigint::BigUint;

/// Appends BCS-encoded values to an owned byte buffer.
///
/// A serializer is a single-use cursor; build one per value and take the bytes
/// with [`Serializer::into_bytes`].
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    buffer: Vec<u8>,
}

impl Serializer {
    /// Creates an empty serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a serializer with a pre-allocated buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn serialize_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn serialize_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn serialize_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn serialize_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn serialize_u128(&mut self, value: u128) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a 256-bit unsigned integer as 32 little-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::OutOfRange`] if the value needs more than 256 bits.
    pub fn serialize_u256(&mut self, value: &BigUint) -> WalletResult<()> {
        if value.bits() > 256 {
            return Err(WalletError::out_of_range(format!(
                "{value} does not fit in u256"
            )));
        }
        let mut bytes = value.to_bytes_le();
        bytes.resize(32, 0);
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn serialize_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    /// Writes a ULEB128 value: 7 value bits per byte, low group first, high bit
    /// set on every byte but the last.
    pub fn serialize_u32_as_uleb128(&mut self, value: u32) {
        self.write_uleb128(u64::from(value));
    }

    /// Writes a sequence length prefix.
    pub fn serialize_len(&mut self, len: usize) {
        self.write_uleb128(len as u64);
    }

    /// Writes a ULEB128 length followed by the raw bytes.
    pub fn serialize_bytes(&mut self, bytes: &[u8]) {
        self.serialize_len(bytes.len());
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes a UTF-8 string as length-prefixed bytes.
    pub fn serialize_str(&mut self, value: &str) {
        self.serialize_bytes(value.as_bytes());
    }

    /// Writes raw bytes with no length prefix.
    pub fn serialize_fixed_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes a ULEB128 item count followed by each item.
    pub fn serialize_vector<T: super::Serializable>(&mut self, items: &[T]) {
        self.serialize_len(items.len());
        for item in items {
            item.serialize(self);
        }
    }

    /// Writes `None` as a zero-length vector and `Some(v)` as a one-item vector.
    pub fn serialize_option<T: super::Serializable>(&mut self, value: Option<&T>) {
        match value {
            None => self.serialize_len(0),
            Some(v) => {
                self.serialize_len(1);
                v.serialize(self);
            }
        }
    }

    /// Writes an enum discriminant.
    pub fn serialize_variant_index(&mut self, index: u32) {
        self.serialize_u32_as_uleb128(index);
    }

    /// Borrows the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn write_uleb128(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }
}
