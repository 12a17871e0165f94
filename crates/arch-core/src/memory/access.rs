//! Memory access descriptors and deterministic range validation.

use std::fmt;
use std::ops::RangeInclusive;

use crate::{ArchError, Result, MAX_ACCESS_BYTES, MAX_VALUE_BITS};

/// A multi-byte memory cell: base address plus width in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemoryAccess {
    /// Lowest address covered.
    pub address: u64,
    /// Width in bytes.
    pub size: usize,
}

impl MemoryAccess {
    /// Describes `size` bytes starting at `address`.
    #[must_use]
    pub const fn new(address: u64, size: usize) -> Self {
        Self { address, size }
    }

    /// Width in bits, saturating for absurd sizes.
    #[must_use]
    pub fn bit_size(&self) -> u32 {
        u32::try_from(self.size)
            .ok()
            .and_then(|size| size.checked_mul(8))
            .unwrap_or(u32::MAX)
    }

    /// Validated address range covered by this access.
    ///
    /// # Errors
    ///
    /// See [`validate_range`].
    pub fn range(&self) -> Result<RangeInclusive<u64>> {
        validate_range(self.address, self.size)
    }

    /// Checks that this access can be assembled into a single concrete value.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidSize`] when wider than [`MAX_ACCESS_BYTES`],
    /// or the errors of [`validate_range`].
    pub fn validate_width(&self) -> Result<RangeInclusive<u64>> {
        if self.size > MAX_ACCESS_BYTES {
            return Err(ArchError::InvalidSize {
                requested_bits: self.bit_size(),
                max_bits: MAX_VALUE_BITS,
            });
        }
        self.range()
    }
}

impl fmt::Display for MemoryAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[@{:#x}]:{}", self.address, self.bit_size())
    }
}

/// Validates a byte range and returns its inclusive bounds.
///
/// # Errors
///
/// Returns [`ArchError::InvalidArgument`] when `size` is zero or the range
/// runs past the end of the 64-bit address space.
pub fn validate_range(address: u64, size: usize) -> Result<RangeInclusive<u64>> {
    if size == 0 {
        return Err(ArchError::InvalidArgument(format!(
            "zero-sized memory range at {address:#x}"
        )));
    }

    let last = u64::try_from(size - 1)
        .ok()
        .and_then(|span| address.checked_add(span))
        .ok_or_else(|| {
            ArchError::InvalidArgument(format!(
                "memory range of {size} byte(s) at {address:#x} overflows the address space"
            ))
        })?;

    Ok(address..=last)
}

/// Largest bulk read, in bytes, that materializes its result.
pub const MAX_AREA_BYTES: usize = 1 << 30;

/// Validates a bulk read that returns one byte per address.
///
/// # Errors
///
/// Returns [`ArchError::InvalidArgument`] when `size` exceeds
/// [`MAX_AREA_BYTES`], plus the errors of [`validate_range`].
pub fn validate_area(address: u64, size: usize) -> Result<RangeInclusive<u64>> {
    if size > MAX_AREA_BYTES {
        return Err(ArchError::InvalidArgument(format!(
            "memory area of {size} byte(s) at {address:#x} exceeds {MAX_AREA_BYTES} bytes"
        )));
    }
    validate_range(address, size)
}
