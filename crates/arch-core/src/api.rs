//! Configuration surface for constructing a [`crate::Cpu`].

use crate::{Architecture, Endianness, NarrowWritePolicy};

/// Immutable configuration for one CPU instance.
///
/// Overrides left as `None` fall back to the architecture defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CpuConfig {
    /// Architecture to instantiate.
    pub architecture: Architecture,
    /// Byte order override for multi-byte memory values.
    pub endianness: Option<Endianness>,
    /// Alias write policy override.
    pub narrow_write_policy: Option<NarrowWritePolicy>,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self::new(Architecture::X86_64)
    }
}

impl CpuConfig {
    /// Configuration using every default of `architecture`.
    #[must_use]
    pub const fn new(architecture: Architecture) -> Self {
        Self {
            architecture,
            endianness: None,
            narrow_write_policy: None,
        }
    }

    /// Replaces the byte order.
    #[must_use]
    pub const fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = Some(endianness);
        self
    }

    /// Replaces the alias write policy.
    #[must_use]
    pub const fn with_narrow_write_policy(mut self, policy: NarrowWritePolicy) -> Self {
        self.narrow_write_policy = Some(policy);
        self
    }

    /// Effective byte order.
    #[must_use]
    pub const fn resolved_endianness(&self) -> Endianness {
        match self.endianness {
            Some(endianness) => endianness,
            None => self.architecture.endianness(),
        }
    }

    /// Effective alias write policy.
    #[must_use]
    pub const fn resolved_narrow_write_policy(&self) -> NarrowWritePolicy {
        match self.narrow_write_policy {
            Some(policy) => policy,
            None => self.architecture.narrow_write_policy(),
        }
    }
}
