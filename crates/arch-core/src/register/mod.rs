//! Register descriptors and identifiers.

/// Register arena with parent/child aliasing resolution.
pub mod table;

pub use table::{RegisterSlot, RegisterTable};

use std::fmt;

use crate::Architecture;

/// Architecture-scoped register identifier.
///
/// Ids pair the owning [`Architecture`] with a dense index into its
/// [`RegisterTable`]. A table only resolves ids of its own architecture, so an
/// id minted for one ISA never aliases a register of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterId {
    architecture: Architecture,
    index: u16,
}

impl RegisterId {
    /// Wraps a raw table index of `architecture`.
    #[must_use]
    pub const fn new(architecture: Architecture, raw: u16) -> Self {
        Self {
            architecture,
            index: raw,
        }
    }

    /// Architecture this id belongs to.
    #[must_use]
    pub const fn architecture(self) -> Architecture {
        self.architecture
    }

    /// Returns the raw table index.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.index
    }

    /// Returns the table index for this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.architecture, self.index)
    }
}

impl From<&Register> for RegisterId {
    fn from(register: &Register) -> Self {
        register.id
    }
}

/// Register classification used by the `is_register`/`is_flag` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RegisterKind {
    /// General-purpose register or one of its aliases.
    General,
    /// Program counter.
    ProgramCounter,
    /// Stack pointer.
    StackPointer,
    /// Status register holding condition flags.
    Status,
    /// Single-bit condition flag aliasing a status register.
    Flag,
    /// Segment or selector register.
    Segment,
    /// Hardwired zero register.
    Zero,
}

/// Static declaration of one register, as written in an architecture table.
///
/// Tables declare registers in id order: the entry at position `n` becomes
/// [`RegisterId`] `n`, and a root must name exactly that id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSpec {
    /// Lower-case architectural name.
    pub name: &'static str,
    /// Classification.
    pub kind: RegisterKind,
    /// Root register backing this one (its own id for roots).
    pub parent: RegisterId,
    /// Bit offset of the slice inside the parent, counted from the LSB.
    pub lsb: u32,
    /// Width of the register in bits.
    pub bits: u32,
    /// Declared as a root rather than an alias.
    pub root: bool,
}

impl RegisterSpec {
    /// Declares a root register.
    #[must_use]
    pub const fn root(name: &'static str, kind: RegisterKind, id: RegisterId, bits: u32) -> Self {
        Self {
            name,
            kind,
            parent: id,
            lsb: 0,
            bits,
            root: true,
        }
    }

    /// Declares an alias covering `[lsb, lsb + bits)` of `parent`.
    #[must_use]
    pub const fn alias(
        name: &'static str,
        kind: RegisterKind,
        parent: RegisterId,
        lsb: u32,
        bits: u32,
    ) -> Self {
        Self {
            name,
            kind,
            parent,
            lsb,
            bits,
            root: false,
        }
    }
}

/// Immutable description of one architectural register.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Register {
    id: RegisterId,
    name: &'static str,
    kind: RegisterKind,
    parent: RegisterId,
    lsb: u32,
    bits: u32,
    root: bool,
}

impl Register {
    pub(crate) const fn from_spec(id: RegisterId, spec: &RegisterSpec) -> Self {
        Self {
            id,
            name: spec.name,
            kind: spec.kind,
            parent: spec.parent,
            lsb: spec.lsb,
            bits: spec.bits,
            root: spec.root,
        }
    }

    /// Identifier within the owning table.
    #[must_use]
    pub const fn id(&self) -> RegisterId {
        self.id
    }

    /// Architectural name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Classification.
    #[must_use]
    pub const fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// Id of the root register physically backing this one.
    #[must_use]
    pub const fn parent(&self) -> RegisterId {
        self.parent
    }

    /// Bit offset of this register inside its parent.
    #[must_use]
    pub const fn lsb(&self) -> u32 {
        self.lsb
    }

    /// Highest bit covered inside the parent.
    #[must_use]
    pub const fn msb(&self) -> u32 {
        self.lsb + self.bits - 1
    }

    /// Width in bits.
    #[must_use]
    pub const fn bit_size(&self) -> u32 {
        self.bits
    }

    /// Width in bytes, rounded up for flags.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.bits.div_ceil(8)
    }

    /// `true` when this register is its own parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.root
    }

    /// `true` for single-bit condition flags.
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        matches!(self.kind, RegisterKind::Flag)
    }

    /// `true` when both registers share a parent and their bit ranges intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.parent == other.parent && self.lsb <= other.msb() && other.lsb <= self.msb()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} bv[{}..{}]", self.name, self.bits, self.msb(), self.lsb)
    }
}
