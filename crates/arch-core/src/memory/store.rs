//! Sparse concrete memory.
//!
//! Only bytes that were explicitly written are stored; a byte is *defined*
//! exactly when it has an entry. Clearing a range removes the entries, so the
//! store never holds more cells than addresses actually touched.

use std::collections::BTreeMap;

use crate::value::{ensure_fits, from_memory_bytes, to_memory_bytes};
use crate::{validate_area, validate_range, ConcreteValue, Endianness, MemoryAccess, Result};

/// Value returned for undefined bytes.
pub const UNDEFINED_BYTE: u8 = 0;

/// Sparse address -> byte map with definedness tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcreteMemory {
    cells: BTreeMap<u64, u8>,
}

impl ConcreteMemory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one byte; undefined bytes read as [`UNDEFINED_BYTE`].
    #[must_use]
    pub fn read_byte(&self, address: u64) -> u8 {
        self.cells.get(&address).copied().unwrap_or(UNDEFINED_BYTE)
    }

    /// Stored byte, or `None` when `address` is undefined.
    #[must_use]
    pub fn get(&self, address: u64) -> Option<u8> {
        self.cells.get(&address).copied()
    }

    /// Writes one byte and marks it defined.
    pub fn write_byte(&mut self, address: u64, value: u8) {
        self.cells.insert(address, value);
    }

    /// Reads `size` bytes starting at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ArchError::InvalidArgument`] for a zero-sized or
    /// overflowing range, or one larger than [`crate::MAX_AREA_BYTES`].
    pub fn read_area(&self, base: u64, size: usize) -> Result<Vec<u8>> {
        let range = validate_area(base, size)?;
        Ok(range.map(|address| self.read_byte(address)).collect())
    }

    /// Writes `values` starting at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ArchError::InvalidArgument`] for an empty slice or a
    /// range that overflows the address space. Nothing is written on error.
    pub fn write_area(&mut self, base: u64, values: &[u8]) -> Result<()> {
        let range = validate_range(base, values.len())?;
        for (address, value) in range.zip(values) {
            self.cells.insert(address, *value);
        }
        Ok(())
    }

    /// Reads `access` as one value assembled in `endianness` order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ArchError::InvalidSize`] for accesses wider than
    /// [`crate::MAX_ACCESS_BYTES`], or the range errors of [`validate_range`].
    pub fn read_access(&self, access: &MemoryAccess, endianness: Endianness) -> Result<ConcreteValue> {
        let range = access.validate_width()?;
        let bytes: Vec<u8> = range.map(|address| self.read_byte(address)).collect();
        Ok(from_memory_bytes(&bytes, endianness))
    }

    /// Writes `value` over `access`, split in `endianness` order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ArchError::InvalidSize`] when the access is too wide
    /// or `value` does not fit in it, or the range errors of [`validate_range`].
    pub fn write_access(
        &mut self,
        access: &MemoryAccess,
        value: &ConcreteValue,
        endianness: Endianness,
    ) -> Result<()> {
        access.validate_width()?;
        ensure_fits(value, access.bit_size())?;
        let bytes = to_memory_bytes(value, access.size, endianness);
        self.write_area(access.address, &bytes)
    }

    /// `true` when every byte of the range is defined.
    ///
    /// # Errors
    ///
    /// Returns the range errors of [`validate_range`].
    pub fn is_defined(&self, base: u64, size: usize) -> Result<bool> {
        let range = validate_range(base, size)?;
        // Entries are unique per address, so a full count means no holes.
        let defined = self.cells.range(range).count();
        Ok(defined == size)
    }

    /// Drops definedness for every byte of the range.
    ///
    /// # Errors
    ///
    /// Returns the range errors of [`validate_range`].
    pub fn clear_range(&mut self, base: u64, size: usize) -> Result<()> {
        let range = validate_range(base, size)?;
        let touched: Vec<u64> = self.cells.range(range).map(|(address, _)| *address).collect();
        for address in touched {
            self.cells.remove(&address);
        }
        Ok(())
    }

    /// Drops every defined byte.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Defined `(address, byte)` pairs in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.cells.iter().map(|(address, value)| (*address, *value))
    }

    /// Number of defined bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` when no byte is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
