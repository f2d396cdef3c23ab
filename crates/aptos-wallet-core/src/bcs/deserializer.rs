//! Cursor-based BCS reader.

use crate::error::{WalletError, WalletResult};
use num_bigint::BigUint;

/// BCS caps sequence lengths at 2^31 - 1.
pub const MAX_SEQUENCE_LENGTH: u32 = (1 << 31) - 1;

/// Reads BCS values from a borrowed buffer, failing on any read past the end.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Deserializer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    /// Fails unless every byte has been consumed.
    pub fn assert_finished(&self) -> WalletResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(WalletError::deserialization(format!(
                "{n} unexpected trailing bytes"
            ))),
        }
    }

    fn read(&mut self, len: usize) -> WalletResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(WalletError::deserialization(format!(
                "reached end of buffer: wanted {len} bytes at offset {}, {} left",
                self.offset,
                self.remaining()
            )));
        }
        let slice = &self.input[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> WalletResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    pub fn deserialize_u8(&mut self) -> WalletResult<u8> {
        Ok(self.read(1)?[0])
    }

    pub fn deserialize_u16(&mut self) -> WalletResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn deserialize_u32(&mut self) -> WalletResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn deserialize_u64(&mut self) -> WalletResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn deserialize_u128(&mut self) -> WalletResult<u128> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    pub fn deserialize_u256(&mut self) -> WalletResult<BigUint> {
        Ok(BigUint::from_bytes_le(self.read(32)?))
    }

    /// Reads a bool; any byte other than 0 or 1 is rejected.
    pub fn deserialize_bool(&mut self) -> WalletResult<bool> {
        match self.deserialize_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(WalletError::deserialization(format!(
                "invalid bool byte {other:#04x}"
            ))),
        }
    }

    /// Reads a canonical ULEB128 value that fits in a u32.
    pub fn deserialize_uleb128_as_u32(&mut self) -> WalletResult<u32> {
        let mut value: u64 = 0;
        for shift in (0..32).step_by(7) {
            let byte = self.deserialize_u8()?;
            let digit = u64::from(byte & 0x7f);
            value |= digit << shift;
            if byte & 0x80 == 0 {
                if shift > 0 && digit == 0 {
                    return Err(WalletError::deserialization(
                        "non-canonical ULEB128 encoding",
                    ));
                }
                return u32::try_from(value).map_err(|_| {
                    WalletError::deserialization(format!("ULEB128 value {value} overflows u32"))
                });
            }
        }
        Err(WalletError::deserialization("ULEB128 value overflows u32"))
    }

    /// Reads a sequence length prefix.
    pub fn deserialize_len(&mut self) -> WalletResult<usize> {
        let len = self.deserialize_uleb128_as_u32()?;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(WalletError::deserialization(format!(
                "sequence length {len} exceeds maximum"
            )));
        }
        Ok(len as usize)
    }

    /// Reads an enum discriminant.
    pub fn deserialize_variant_index(&mut self) -> WalletResult<u32> {
        self.deserialize_uleb128_as_u32()
    }

    /// Reads length-prefixed bytes.
    pub fn deserialize_bytes(&mut self) -> WalletResult<Vec<u8>> {
        let len = self.deserialize_len()?;
        Ok(self.read(len)?.to_vec())
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn deserialize_str(&mut self) -> WalletResult<String> {
        let bytes = self.deserialize_bytes()?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Reads exactly `len` bytes with no length prefix.
    pub fn deserialize_fixed_bytes(&mut self, len: usize) -> WalletResult<Vec<u8>> {
        Ok(self.read(len)?.to_vec())
    }

    /// Reads exactly `N` bytes into an array.
    pub fn deserialize_fixed_array<const N: usize>(&mut self) -> WalletResult<[u8; N]> {
        self.read_array()
    }

    /// Reads a ULEB128 item count then that many items.
    pub fn deserialize_vector<T: super::Deserializable>(&mut self) -> WalletResult<Vec<T>> {
        let len = self.deserialize_len()?;
        // Every item takes at least one byte.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(T::deserialize(self)?);
        }
        Ok(items)
    }

    /// Reads an option encoded as a zero- or one-item vector.
    pub fn deserialize_option<T: super::Deserializable>(&mut self) -> WalletResult<Option<T>> {
        match self.deserialize_len()? {
            0 => Ok(None),
            1 => Ok(Some(T::deserialize(self)?)),
            n => Err(WalletError::deserialization(format!(
                "option encoded with {n} elements"
            ))),
        }
    }
}
