//! Signer bitmaps for multi-signature schemes.
//!
//! A bitmap is four bytes. Bit `i` marks that the key at index `i` signed,
//! with bit 0 the most significant bit of byte 0.

use crate::error::{WalletError, WalletResult};

/// Length of a signer bitmap in bytes.
pub const BITMAP_LENGTH: usize = 4;

/// Largest number of keys a bitmap can address.
pub const MAX_BITMAP_BITS: usize = BITMAP_LENGTH * 8;

/// A four-byte signer bitmap.
pub type Bitmap = [u8; BITMAP_LENGTH];

/// Builds a bitmap from strictly ascending bit positions.
///
/// # Errors
///
/// Returns [`WalletError::BitmapInconsistency`] if a position is 32 or more,
/// repeats, or is smaller than the one before it.
///
/// # Example
///
/// ```rust
/// use aptos_wallet_core::crypto::create_bitmap;
///
/// assert_eq!(create_bitmap(&[0, 2, 31]).unwrap(), [0b1010_0000, 0, 0, 0b0000_0001]);
/// assert!(create_bitmap(&[2, 0]).is_err());
/// ```
pub fn create_bitmap(bits: &[u8]) -> WalletResult<Bitmap> {
    let mut bitmap = [0u8; BITMAP_LENGTH];
    let mut previous: Option<u8> = None;
    for &bit in bits {
        if usize::from(bit) >= MAX_BITMAP_BITS {
            return Err(WalletError::BitmapInconsistency(format!(
                "bit {bit} is out of range (max {})",
                MAX_BITMAP_BITS - 1
            )));
        }
        match previous {
            Some(p) if p == bit => {
                return Err(WalletError::BitmapInconsistency(format!(
                    "duplicate bit {bit}"
                )))
            }
            Some(p) if p > bit => {
                return Err(WalletError::BitmapInconsistency(format!(
                    "bits must be ascending, {bit} follows {p}"
                )))
            }
            _ => {}
        }
        set_bit(&mut bitmap, bit);
        previous = Some(bit);
    }
    Ok(bitmap)
}

fn set_bit(bitmap: &mut Bitmap, bit: u8) {
    bitmap[usize::from(bit / 8)] |= 0x80 >> (bit % 8);
}

/// True if `bit` is set.
pub fn is_bit_set(bitmap: &Bitmap, bit: u8) -> bool {
    usize::from(bit) < MAX_BITMAP_BITS && bitmap[usize::from(bit / 8)] & (0x80 >> (bit % 8)) != 0
}

/// The set positions in ascending order.
pub fn bitmap_set_bits(bitmap: &Bitmap) -> Vec<u8> {
    (0..MAX_BITMAP_BITS as u8)
        .filter(|&bit| is_bit_set(bitmap, bit))
        .collect()
}

/// Number of set bits.
pub fn bitmap_count(bitmap: &Bitmap) -> usize {
    bitmap.iter().map(|b| b.count_ones() as usize).sum()
}

/// Reads a bitmap from exactly four bytes.
pub(crate) fn bitmap_from_slice(bytes: &[u8]) -> WalletResult<Bitmap> {
    bytes
        .try_into()
        .map_err(|_| WalletError::length_mismatch("signer bitmap", BITMAP_LENGTH, bytes.len()))
}

/// Checks that `signature_count` signatures line up with a bitmap over
/// `key_count` keys with the given threshold.
pub(crate) fn check_bitmap(
    bitmap: &Bitmap,
    signature_count: usize,
    key_count: usize,
    threshold: usize,
) -> WalletResult<Vec<u8>> {
    let bits = bitmap_set_bits(bitmap);
    if bits.len() != signature_count {
        return Err(WalletError::SignatureMismatch(format!(
            "{signature_count} signatures but {} bits set",
            bits.len()
        )));
    }
    if bits.len() < threshold {
        return Err(WalletError::InsufficientSignatures {
            required: threshold,
            provided: bits.len(),
        });
    }
    if let Some(&last) = bits.last() {
        if usize::from(last) >= key_count {
            return Err(WalletError::BitmapInconsistency(format!(
                "bit {last} has no key ({key_count} keys)"
            )));
        }
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bit_zero_is_msb() {
        assert_eq!(create_bitmap(&[0]).unwrap(), [0x80, 0, 0, 0]);
        assert_eq!(create_bitmap(&[7]).unwrap(), [0x01, 0, 0, 0]);
        assert_eq!(create_bitmap(&[8]).unwrap(), [0, 0x80, 0, 0]);
        assert_eq!(create_bitmap(&[31]).unwrap(), [0, 0, 0, 0x01]);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            create_bitmap(&[32]),
            Err(WalletError::BitmapInconsistency(_))
        ));
        assert!(matches!(
            create_bitmap(&[1, 1]),
            Err(WalletError::BitmapInconsistency(_))
        ));
        assert!(matches!(
            create_bitmap(&[3, 1]),
            Err(WalletError::BitmapInconsistency(_))
        ));
    }

    #[test]
    fn test_empty_bitmap() {
        let bitmap = create_bitmap(&[]).unwrap();
        assert_eq!(bitmap, [0; 4]);
        assert_eq!(bitmap_count(&bitmap), 0);
        assert!(bitmap_set_bits(&bitmap).is_empty());
    }

    #[test]
    fn test_check_bitmap() {
        let bitmap = create_bitmap(&[0, 2]).unwrap();
        assert_eq!(check_bitmap(&bitmap, 2, 3, 2).unwrap(), vec![0, 2]);
        assert!(matches!(
            check_bitmap(&bitmap, 1, 3, 1),
            Err(WalletError::SignatureMismatch(_))
        ));
        assert!(matches!(
            check_bitmap(&bitmap, 2, 3, 3),
            Err(WalletError::InsufficientSignatures { .. })
        ));
        assert!(matches!(
            check_bitmap(&bitmap, 2, 2, 1),
            Err(WalletError::BitmapInconsistency(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_set_bits_round_trip(bits in proptest::collection::btree_set(0u8..32, 0..32)) {
            let bits: Vec<u8> = bits.into_iter().collect();
            let bitmap = create_bitmap(&bits).unwrap();
            prop_assert_eq!(bitmap_set_bits(&bitmap), bits.clone());
            prop_assert_eq!(bitmap_count(&bitmap), bits.len());
        }
    }
}
