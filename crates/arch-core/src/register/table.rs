//! Register arena owned by one architecture instance.
//!
//! Aliases are resolved with a single hop: every register names its root
//! parent directly, so a read or write of any register becomes a bit-slice
//! operation on exactly one backing value.

use std::collections::HashMap;

use log::trace;

use crate::{
    ArchError, Architecture, Register, RegisterId, RegisterKind, RegisterSpec, Result,
    MAX_VALUE_BITS,
};

/// Resolved placement of a register inside its root parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterSlot {
    /// Root register holding the backing value.
    pub parent: RegisterId,
    /// Width of the root register in bits.
    pub parent_bits: u32,
    /// Bit offset of the slice, counted from the LSB.
    pub lsb: u32,
    /// Width of the slice in bits.
    pub bits: u32,
}

impl RegisterSlot {
    /// `true` when the slice spans the whole parent.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.lsb == 0 && self.bits == self.parent_bits
    }
}

/// Contiguous, immutable register table indexed by [`RegisterId`].
///
/// Ids of any other architecture are unknown to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterTable {
    architecture: Architecture,
    registers: Vec<Register>,
    by_name: HashMap<&'static str, RegisterId>,
    roots: Vec<RegisterId>,
}

impl RegisterTable {
    /// Builds and validates the table of `architecture` from declarations in
    /// id order.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidArgument`] when a name repeats, a width is
    /// zero or wider than [`MAX_VALUE_BITS`], a root does not name its own
    /// position, a parent is unknown, foreign or itself an alias, a slice
    /// leaves its parent, or a flag is not a one-bit alias.
    pub fn new(architecture: Architecture, specs: &[RegisterSpec]) -> Result<Self> {
        if specs.len() > usize::from(u16::MAX) {
            return Err(ArchError::InvalidArgument(format!(
                "register table has {} entries, at most {} supported",
                specs.len(),
                u16::MAX
            )));
        }

        let mut registers = Vec::with_capacity(specs.len());
        let mut by_name = HashMap::with_capacity(specs.len());
        let mut roots = Vec::new();

        for (index, spec) in (0_u16..).zip(specs) {
            let id = RegisterId::new(architecture, index);
            Self::validate(id, spec, specs)?;

            if by_name.insert(spec.name, id).is_some() {
                return Err(ArchError::InvalidArgument(format!(
                    "duplicate register name {}",
                    spec.name
                )));
            }
            if spec.root {
                roots.push(id);
            }
            registers.push(Register::from_spec(id, spec));
        }

        trace!(
            "{architecture} register table built: {} register(s), {} root(s)",
            registers.len(),
            roots.len()
        );

        Ok(Self {
            architecture,
            registers,
            by_name,
            roots,
        })
    }

    fn validate(id: RegisterId, spec: &RegisterSpec, specs: &[RegisterSpec]) -> Result<()> {
        let invalid = |reason: &str| {
            Err(ArchError::InvalidArgument(format!(
                "register {} ({id}): {reason}",
                spec.name
            )))
        };

        if spec.name.is_empty() {
            return invalid("empty name");
        }
        if spec.bits == 0 || spec.bits > MAX_VALUE_BITS {
            return invalid("width must be between 1 and 512 bits");
        }

        if spec.parent.architecture() != id.architecture() {
            return invalid("parent belongs to another architecture");
        }
        let Some(parent) = specs.get(spec.parent.index()) else {
            return invalid("parent is not declared");
        };

        if spec.root {
            if spec.parent != id {
                return invalid("root must be declared at its own id");
            }
            if spec.lsb != 0 {
                return invalid("root register must start at bit 0");
            }
            if spec.kind == RegisterKind::Flag {
                return invalid("flag must alias a status register");
            }
            return Ok(());
        }

        if spec.parent == id {
            return invalid("alias cannot be its own parent");
        }
        if !parent.root {
            return invalid("parent is itself an alias");
        }
        let fits = spec
            .lsb
            .checked_add(spec.bits)
            .is_some_and(|end| end <= parent.bits);
        if !fits {
            return invalid("slice exceeds parent width");
        }
        if spec.kind == RegisterKind::Flag && spec.bits != 1 {
            return invalid("flag must be one bit wide");
        }
        Ok(())
    }

    /// Looks up a register by id.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for ids outside the table.
    pub fn get(&self, id: RegisterId) -> Result<&Register> {
        self.lookup(id).ok_or_else(|| ArchError::unknown_register(id))
    }

    fn lookup(&self, id: RegisterId) -> Option<&Register> {
        if id.architecture() != self.architecture {
            return None;
        }
        self.registers.get(id.index())
    }

    /// Architecture whose ids this table resolves.
    #[must_use]
    pub const fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Looks up a register by name.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for unknown names.
    pub fn by_name(&self, name: &str) -> Result<&Register> {
        self.by_name
            .get(name)
            .map(|id| &self.registers[id.index()])
            .ok_or_else(|| ArchError::unknown_register(name))
    }

    /// Returns the root register backing `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for ids outside the table.
    pub fn parent(&self, id: RegisterId) -> Result<&Register> {
        let register = self.get(id)?;
        self.get(register.parent())
    }

    /// Resolves the bit slice `id` occupies in its root.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for ids outside the table.
    pub fn slot(&self, id: RegisterId) -> Result<RegisterSlot> {
        let register = self.get(id)?;
        let parent = self.get(register.parent())?;
        Ok(RegisterSlot {
            parent: parent.id(),
            parent_bits: parent.bit_size(),
            lsb: register.lsb(),
            bits: register.bit_size(),
        })
    }

    /// All registers in id order; position `n` holds [`RegisterId`] `n`.
    #[must_use]
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Root registers only, in id order.
    pub fn roots(&self) -> impl Iterator<Item = &Register> + '_ {
        self.roots.iter().map(|id| &self.registers[id.index()])
    }

    /// Number of root registers.
    #[must_use]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// `true` when `id` names any register or flag in this table.
    #[must_use]
    pub fn contains(&self, id: RegisterId) -> bool {
        self.lookup(id).is_some()
    }

    /// `true` when `id` names a register that is not a single-bit flag.
    #[must_use]
    pub fn is_register(&self, id: RegisterId) -> bool {
        self.lookup(id).is_some_and(|register| !register.is_flag())
    }

    /// `true` when `id` names a single-bit flag.
    #[must_use]
    pub fn is_flag(&self, id: RegisterId) -> bool {
        self.lookup(id).is_some_and(Register::is_flag)
    }

    /// First register of the given kind, in id order.
    #[must_use]
    pub fn first_of_kind(&self, kind: RegisterKind) -> Option<&Register> {
        self.registers.iter().find(|register| register.kind() == kind)
    }

    /// Total number of ids, aliases and flags included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// `true` for an empty table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }
}
