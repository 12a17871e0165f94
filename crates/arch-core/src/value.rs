//! Fixed-width concrete values shared by the register and memory stores.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{ArchError, Endianness, Result};

/// Concrete value of a register or multi-byte memory cell.
///
/// Values are unsigned and never wider than [`MAX_VALUE_BITS`].
pub type ConcreteValue = BigUint;

/// Widest value the stores accept (`uint512`).
pub const MAX_VALUE_BITS: u32 = 512;

/// Widest memory access in bytes.
pub const MAX_ACCESS_BYTES: usize = (MAX_VALUE_BITS / 8) as usize;

/// Returns a value with the low `bits` bits set.
#[must_use]
pub fn mask(bits: u32) -> ConcreteValue {
    (ConcreteValue::one() << bits) - ConcreteValue::one()
}

/// Number of significant bits in `value` (zero for zero).
#[must_use]
pub fn bit_width(value: &ConcreteValue) -> u32 {
    u32::try_from(value.bits()).unwrap_or(u32::MAX)
}

/// Checks that `value` is representable in `max_bits` bits.
///
/// # Errors
///
/// Returns [`ArchError::InvalidSize`] when `value` needs more bits.
pub fn ensure_fits(value: &ConcreteValue, max_bits: u32) -> Result<()> {
    let needed = bit_width(value);
    if needed > max_bits {
        return Err(ArchError::InvalidSize {
            requested_bits: needed,
            max_bits,
        });
    }
    Ok(())
}

/// Reads the bit slice `[lsb, lsb + bits)` of `value`.
#[must_use]
pub fn extract_bits(value: &ConcreteValue, lsb: u32, bits: u32) -> ConcreteValue {
    (value >> lsb) & mask(bits)
}

/// Returns `target` with the bit slice `[lsb, lsb + bits)` replaced by the
/// low `bits` bits of `slice`. Every other bit of `target` is preserved.
#[must_use]
pub fn insert_bits(
    target: &ConcreteValue,
    lsb: u32,
    bits: u32,
    slice: &ConcreteValue,
) -> ConcreteValue {
    let field = mask(bits) << lsb;
    let cleared = target ^ (target & &field);
    cleared | ((slice & mask(bits)) << lsb)
}

/// Assembles a value from memory-order bytes.
#[must_use]
pub fn from_memory_bytes(bytes: &[u8], endianness: Endianness) -> ConcreteValue {
    match endianness {
        Endianness::Little => ConcreteValue::from_bytes_le(bytes),
        Endianness::Big => ConcreteValue::from_bytes_be(bytes),
    }
}

/// Splits `value` into exactly `size` memory-order bytes.
///
/// The caller must already have checked that `value` fits in `size` bytes;
/// surplus high-order bytes are dropped.
#[must_use]
pub fn to_memory_bytes(value: &ConcreteValue, size: usize, endianness: Endianness) -> Vec<u8> {
    let mut bytes = if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_le()
    };
    bytes.resize(size, 0);
    if endianness == Endianness::Big {
        bytes.reverse();
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::{
        bit_width, ensure_fits, extract_bits, from_memory_bytes, insert_bits, mask,
        to_memory_bytes, ConcreteValue, MAX_ACCESS_BYTES, MAX_VALUE_BITS,
    };
    use crate::{ArchError, Endianness};
    use proptest::prelude::*;

    #[test]
    fn max_access_matches_max_value_width() {
        assert_eq!(MAX_ACCESS_BYTES, 64);
        assert_eq!(bit_width(&mask(MAX_VALUE_BITS)), MAX_VALUE_BITS);
    }

    #[test]
    fn ensure_fits_reports_needed_width() {
        assert!(ensure_fits(&ConcreteValue::from(0xFFu8), 8).is_ok());
        assert_eq!(
            ensure_fits(&ConcreteValue::from(0x100u16), 8),
            Err(ArchError::InvalidSize {
                requested_bits: 9,
                max_bits: 8
            })
        );
    }

    #[test]
    fn insert_touches_only_the_slice() {
        let target = ConcreteValue::from(0x1234_5678u32);
        let patched = insert_bits(&target, 8, 8, &ConcreteValue::from(0xABu8));
        assert_eq!(patched, ConcreteValue::from(0x1234_AB78u32));
    }

    #[test]
    fn memory_byte_order_follows_endianness() {
        let value = ConcreteValue::from(0x0102_0304u32);
        assert_eq!(
            to_memory_bytes(&value, 4, Endianness::Little),
            vec![0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(
            to_memory_bytes(&value, 4, Endianness::Big),
            vec![0x01, 0x02, 0x03, 0x04]
        );
        assert_eq!(
            from_memory_bytes(&[0x01, 0x02], Endianness::Big),
            ConcreteValue::from(0x0102u16)
        );
        assert_eq!(
            to_memory_bytes(&ConcreteValue::default(), 2, Endianness::Big),
            vec![0, 0]
        );
    }

    proptest! {
        #[test]
        fn extract_after_insert_returns_slice(
            target in any::<u64>(),
            slice in any::<u64>(),
            lsb in 0u32..64,
            bits in 1u32..=64,
        ) {
            let target = ConcreteValue::from(target);
            let slice = ConcreteValue::from(slice) & mask(bits);
            let patched = insert_bits(&target, lsb, bits, &slice);
            prop_assert_eq!(extract_bits(&patched, lsb, bits), slice);
            prop_assert_eq!(extract_bits(&patched, 0, lsb), extract_bits(&target, 0, lsb));
            prop_assert_eq!(&patched >> (lsb + bits), &target >> (lsb + bits));
        }
    }
}
