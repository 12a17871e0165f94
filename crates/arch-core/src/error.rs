use thiserror::Error;

use crate::Architecture;

/// Result alias used by every fallible architecture operation.
pub type Result<T> = std::result::Result<T, ArchError>;

/// Error taxonomy surfaced by the architecture contract.
///
/// All variants describe programming or input errors. None of them are
/// transient, so nothing in this crate retries after producing one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchError {
    /// Unknown register id or name, or a missing conventional register.
    #[error("not found: {0}")]
    NotFound(String),
    /// Zero-sized request, overflowing address range or malformed table.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Requested or supplied value width exceeds what the target can hold.
    #[error("invalid size: {requested_bits} bit(s) requested, at most {max_bits} supported")]
    InvalidSize {
        /// Width in bits that was requested or needed.
        requested_bits: u32,
        /// Largest width in bits the target accepts.
        max_bits: u32,
    },
    /// The decoder rejected the instruction bytes.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ArchError {
    /// Builds a [`ArchError::NotFound`] for an unknown register identifier.
    #[must_use]
    pub fn unknown_register(what: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("register {what} is not valid for this architecture"))
    }

    /// Returns `true` for [`ArchError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Failure reported by an instruction decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Bytes do not form a valid encoding under the active mode.
    #[error("invalid instruction encoding at {address:#x} ({mode})")]
    InvalidEncoding {
        /// Address of the rejected instruction.
        address: u64,
        /// Human-readable description of the decode mode.
        mode: String,
    },
    /// Fewer bytes were supplied than the encoding requires.
    #[error("truncated instruction at {address:#x}: needed {needed} byte(s), got {available}")]
    Truncated {
        /// Address of the truncated instruction.
        address: u64,
        /// Number of bytes the encoding requires.
        needed: usize,
        /// Number of bytes that were available.
        available: usize,
    },
    /// No decoder is attached to the CPU instance.
    #[error("no instruction decoder attached")]
    Unavailable,
    /// The attached decoder does not handle this architecture.
    #[error("decoder does not support {0}")]
    Unsupported(Architecture),
}
