use std::collections::BTreeMap;

use num_traits::Zero;

use crate::value::{ensure_fits, extract_bits, insert_bits};
use crate::{ArchError, ConcreteValue, NarrowWritePolicy, RegisterId, RegisterKind, RegisterTable, Result};

/// Concrete register file.
///
/// Holds exactly one backing value per root register. Aliases have no
/// storage of their own: reads extract their slice of the root and writes
/// patch only that slice, so aliases can never diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteRegisters {
    roots: BTreeMap<RegisterId, ConcreteValue>,
}

impl ConcreteRegisters {
    /// Creates a zeroed backing value for every root of `table`.
    #[must_use]
    pub fn new(table: &RegisterTable) -> Self {
        Self {
            roots: table
                .roots()
                .map(|root| (root.id(), ConcreteValue::zero()))
                .collect(),
        }
    }

    /// Reads `id`, extracting its slice of the backing root value.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] when `id` is not in `table`.
    pub fn read(&self, table: &RegisterTable, id: RegisterId) -> Result<ConcreteValue> {
        let slot = table.slot(id)?;
        let backing = self.backing(slot.parent)?;
        if slot.is_full() {
            return Ok(backing.clone());
        }
        Ok(extract_bits(backing, slot.lsb, slot.bits))
    }

    /// Writes `value` to `id`, patching only the covered bits of its root.
    ///
    /// Under [`NarrowWritePolicy::ZeroExtendWord`] a write to the low 32 bits
    /// of a 64-bit root clears the root first. Writes to hardwired zero
    /// registers are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] when `id` is not in `table`, or
    /// [`ArchError::InvalidSize`] when `value` is wider than the register.
    pub fn write(
        &mut self,
        table: &RegisterTable,
        id: RegisterId,
        value: &ConcreteValue,
        policy: NarrowWritePolicy,
    ) -> Result<()> {
        let register = table.get(id)?;
        ensure_fits(value, register.bit_size())?;
        if register.kind() == RegisterKind::Zero {
            return Ok(());
        }

        let slot = table.slot(id)?;
        let backing = self
            .roots
            .get_mut(&slot.parent)
            .ok_or_else(|| ArchError::unknown_register(slot.parent))?;

        if slot.is_full() || policy.clears_parent(slot.lsb, slot.bits, slot.parent_bits) {
            *backing = value.clone();
        } else {
            *backing = insert_bits(backing, slot.lsb, slot.bits, value);
        }
        Ok(())
    }

    fn backing(&self, root: RegisterId) -> Result<&ConcreteValue> {
        self.roots
            .get(&root)
            .ok_or_else(|| ArchError::unknown_register(root))
    }

    /// Resets every root to zero.
    pub fn clear(&mut self) {
        for value in self.roots.values_mut() {
            value.set_zero();
        }
    }

    /// Number of physical backing values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// `true` when the table had no roots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
