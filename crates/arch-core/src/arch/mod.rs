//! Supported architectures and their register tables.
//!
//! The architecture set is closed: [`Architecture`] dispatches to the
//! per-ISA tables below with exhaustive matches, so adding a backend is a
//! compile-time change.

#[macro_use]
mod macros;

/// AArch64 register table.
pub mod aarch64;
/// 32-bit ARM (A32/T32) register table.
pub mod arm32;
/// IA-32 register table.
pub mod x86;
/// x86-64 register table.
pub mod x86_64;

use std::fmt;

use crate::RegisterSpec;

/// Byte order used to assemble multi-byte memory values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Endianness {
    /// Least significant byte at the lowest address.
    #[default]
    Little,
    /// Most significant byte at the lowest address.
    Big,
}

/// How a write to an alias affects the rest of its parent's bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum NarrowWritePolicy {
    /// Only the covered bits change; the rest of the parent is preserved.
    #[default]
    PreserveParent,
    /// A write to the low 32 bits of a 64-bit parent clears the upper half
    /// (x86-64 `eax` into `rax`, AArch64 `w0` into `x0`). Narrower aliases
    /// still preserve the parent.
    ZeroExtendWord,
}

impl NarrowWritePolicy {
    /// `true` when a write to `[lsb, lsb + bits)` of a `parent_bits`-wide
    /// root must clear the whole root first.
    #[must_use]
    pub const fn clears_parent(self, lsb: u32, bits: u32, parent_bits: u32) -> bool {
        match self {
            Self::PreserveParent => false,
            Self::ZeroExtendWord => lsb == 0 && bits == 32 && parent_bits == 64,
        }
    }
}

/// Closed set of supported CPU architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Architecture {
    /// IA-32.
    X86,
    /// x86-64.
    #[allow(non_camel_case_types)]
    X86_64,
    /// 32-bit ARM, A32 and T32 (Thumb) encodings.
    Arm32,
    /// AArch64.
    AArch64,
}

impl Architecture {
    /// Every supported architecture.
    pub const ALL: [Self; 4] = [Self::X86, Self::X86_64, Self::Arm32, Self::AArch64];

    /// Short lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86-64",
            Self::Arm32 => "arm32",
            Self::AArch64 => "aarch64",
        }
    }

    /// Register declarations in id order.
    #[must_use]
    pub const fn register_specs(self) -> &'static [RegisterSpec] {
        match self {
            Self::X86 => x86::X86Register::SPECS,
            Self::X86_64 => x86_64::X8664Register::SPECS,
            Self::Arm32 => arm32::Arm32Register::SPECS,
            Self::AArch64 => aarch64::AArch64Register::SPECS,
        }
    }

    /// Default byte order.
    #[must_use]
    pub const fn endianness(self) -> Endianness {
        match self {
            Self::X86 | Self::X86_64 | Self::Arm32 | Self::AArch64 => Endianness::Little,
        }
    }

    /// Width of a general-purpose register in bits.
    #[must_use]
    pub const fn gpr_bit_size(self) -> u32 {
        match self {
            Self::X86 | Self::Arm32 => 32,
            Self::X86_64 | Self::AArch64 => 64,
        }
    }

    /// Width of a general-purpose register in bytes.
    #[must_use]
    pub const fn gpr_size(self) -> u32 {
        self.gpr_bit_size() / 8
    }

    /// Default treatment of narrow alias writes.
    #[must_use]
    pub const fn narrow_write_policy(self) -> NarrowWritePolicy {
        match self {
            Self::X86 | Self::Arm32 => NarrowWritePolicy::PreserveParent,
            Self::X86_64 | Self::AArch64 => NarrowWritePolicy::ZeroExtendWord,
        }
    }

    /// `true` when the Thumb mode bit is meaningful.
    #[must_use]
    pub const fn supports_thumb(self) -> bool {
        matches!(self, Self::Arm32)
    }

    /// `true` when load-exclusive/store-exclusive pairs exist.
    #[must_use]
    pub const fn supports_exclusive_access(self) -> bool {
        matches!(self, Self::Arm32 | Self::AArch64)
    }

    /// Longest instruction encoding in bytes.
    #[must_use]
    pub const fn max_instruction_size(self) -> usize {
        match self {
            Self::X86 | Self::X86_64 => 15,
            Self::Arm32 | Self::AArch64 => 4,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{Architecture, Endianness, NarrowWritePolicy};
    use crate::{RegisterKind, RegisterTable};
    use rstest::rstest;

    #[rstest]
    #[case(Architecture::X86)]
    #[case(Architecture::X86_64)]
    #[case(Architecture::Arm32)]
    #[case(Architecture::AArch64)]
    fn every_table_is_valid(#[case] arch: Architecture) {
        let table = RegisterTable::new(arch, arch.register_specs()).expect("valid table");
        assert!(table.first_of_kind(RegisterKind::ProgramCounter).is_some());
        assert!(table.first_of_kind(RegisterKind::StackPointer).is_some());
        assert!(table.first_of_kind(RegisterKind::Status).is_some());
        assert!(table.registers().iter().any(crate::Register::is_flag));
        assert_eq!(arch.endianness(), Endianness::Little);
    }

    #[rstest]
    #[case(Architecture::X86, 4, false, false)]
    #[case(Architecture::X86_64, 8, false, false)]
    #[case(Architecture::Arm32, 4, true, true)]
    #[case(Architecture::AArch64, 8, false, true)]
    fn architecture_traits(
        #[case] arch: Architecture,
        #[case] gpr_size: u32,
        #[case] thumb: bool,
        #[case] exclusive: bool,
    ) {
        assert_eq!(arch.gpr_size(), gpr_size);
        assert_eq!(arch.gpr_bit_size(), gpr_size * 8);
        assert_eq!(arch.supports_thumb(), thumb);
        assert_eq!(arch.supports_exclusive_access(), exclusive);
    }

    #[test]
    fn zero_extension_only_applies_to_low_word_of_64_bit_roots() {
        let policy = NarrowWritePolicy::ZeroExtendWord;
        assert!(policy.clears_parent(0, 32, 64));
        assert!(!policy.clears_parent(0, 16, 64));
        assert!(!policy.clears_parent(8, 8, 64));
        assert!(!policy.clears_parent(0, 32, 32));
        assert!(!NarrowWritePolicy::PreserveParent.clears_parent(0, 32, 64));
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Architecture::X86_64.to_string(), "x86-64");
        assert_eq!(Architecture::ALL.len(), 4);
    }
}
