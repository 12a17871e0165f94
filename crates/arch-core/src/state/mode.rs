use crate::Architecture;

/// The two architecture-scoped mode bits: Thumb and exclusive memory access.
///
/// Bits an architecture does not support stay `false`; setting them is a
/// no-op there. Supported bits follow last-write-wins with no validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ModeFlags {
    thumb: bool,
    exclusive_access: bool,
}

impl ModeFlags {
    /// `true` when decoding T32 (Thumb) encodings.
    #[must_use]
    pub const fn thumb(self) -> bool {
        self.thumb
    }

    /// `true` while an exclusive load is waiting for its store.
    #[must_use]
    pub const fn exclusive_access(self) -> bool {
        self.exclusive_access
    }

    /// Sets the Thumb bit if `arch` has one.
    pub const fn set_thumb(&mut self, arch: Architecture, state: bool) {
        self.thumb = state && arch.supports_thumb();
    }

    /// Sets the exclusive-access bit if `arch` has load/store-exclusive.
    pub const fn set_exclusive_access(&mut self, arch: Architecture, state: bool) {
        self.exclusive_access = state && arch.supports_exclusive_access();
    }

    /// Returns to non-Thumb, non-exclusive.
    pub const fn reset(&mut self) {
        self.thumb = false;
        self.exclusive_access = false;
    }
}
