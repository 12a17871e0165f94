//! Decoder seam.
//!
//! Instruction decoding belongs to an external backend. This module defines
//! what the contract hands to that backend and what it expects back.

use std::fmt;

use crate::{Architecture, DecodeError, MemoryAccess, RegisterId};

/// Decoder inputs that depend on CPU state rather than on the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeMode {
    /// Active architecture.
    pub architecture: Architecture,
    /// Selects the T32 tables on ARM32; always `false` elsewhere.
    pub thumb: bool,
}

impl fmt::Display for DecodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.thumb {
            write!(f, "{}/thumb", self.architecture)
        } else {
            write!(f, "{}", self.architecture)
        }
    }
}

/// A decoded operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Operand {
    /// Immediate value with its encoded width in bits.
    Immediate {
        /// Raw immediate bits.
        value: u64,
        /// Encoded width in bits.
        bits: u32,
    },
    /// Register operand.
    Register(RegisterId),
    /// Memory operand with a resolved address.
    Memory(MemoryAccess),
}

/// Decoded form of one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Lower-case mnemonic.
    pub mnemonic: String,
    /// Operands in assembly order.
    pub operands: Vec<Operand>,
    /// Encoded length in bytes.
    pub size: usize,
}

/// Raw instruction bytes at an address, plus their decoded form once
/// [`crate::Cpu::disassembly`] has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    address: u64,
    opcode: Vec<u8>,
    decoded: Option<DecodedInstruction>,
}

impl Instruction {
    /// Wraps `opcode` fetched from `address`.
    #[must_use]
    pub fn new(address: u64, opcode: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            opcode: opcode.into(),
            decoded: None,
        }
    }

    /// Address the bytes were fetched from.
    #[must_use]
    pub const fn address(&self) -> u64 {
        self.address
    }

    /// Raw bytes; trimmed to the encoded length after decoding.
    #[must_use]
    pub fn opcode(&self) -> &[u8] {
        &self.opcode
    }

    /// Decoded form, if decoding succeeded.
    #[must_use]
    pub const fn decoded(&self) -> Option<&DecodedInstruction> {
        self.decoded.as_ref()
    }

    /// Mnemonic, if decoded.
    #[must_use]
    pub fn mnemonic(&self) -> Option<&str> {
        self.decoded.as_ref().map(|decoded| decoded.mnemonic.as_str())
    }

    /// Encoded length, if decoded.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        self.decoded.as_ref().map(|decoded| decoded.size)
    }

    /// Address of the following instruction, if decoded.
    #[must_use]
    pub fn next_address(&self) -> Option<u64> {
        let size = u64::try_from(self.size()?).ok()?;
        self.address.checked_add(size)
    }

    pub(crate) fn set_decoded(&mut self, decoded: DecodedInstruction) {
        self.opcode.truncate(decoded.size);
        self.decoded = Some(decoded);
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.decoded {
            Some(decoded) => write!(f, "{:#x}: {}", self.address, decoded.mnemonic),
            None => write!(f, "{:#x}: <undecoded>", self.address),
        }
    }
}

/// Architecture-specific decoder backend.
pub trait InstructionDecoder: Send {
    /// Decodes the instruction at the start of `bytes`.
    ///
    /// `bytes` may extend past the instruction; the returned
    /// [`DecodedInstruction::size`] says how many were consumed.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidEncoding`] when the bytes are not a valid
    /// encoding under `mode`, or [`DecodeError::Truncated`] when more bytes
    /// are needed.
    fn decode(
        &self,
        bytes: &[u8],
        address: u64,
        mode: DecodeMode,
    ) -> Result<DecodedInstruction, DecodeError>;
}

impl<F> InstructionDecoder for F
where
    F: Fn(&[u8], u64, DecodeMode) -> Result<DecodedInstruction, DecodeError> + Send,
{
    fn decode(
        &self,
        bytes: &[u8],
        address: u64,
        mode: DecodeMode,
    ) -> Result<DecodedInstruction, DecodeError> {
        self(bytes, address, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeMode, DecodedInstruction, Instruction, InstructionDecoder};
    use crate::{Architecture, DecodeError};

    fn nop(size: usize) -> DecodedInstruction {
        DecodedInstruction {
            mnemonic: "nop".to_string(),
            operands: Vec::new(),
            size,
        }
    }

    #[test]
    fn closures_are_decoders() {
        let decoder = |bytes: &[u8], _address: u64, _mode: DecodeMode| {
            if bytes.first() == Some(&0x90) {
                Ok(nop(1))
            } else {
                Err(DecodeError::Unavailable)
            }
        };
        let mode = DecodeMode {
            architecture: Architecture::X86,
            thumb: false,
        };
        assert_eq!(decoder.decode(&[0x90], 0, mode), Ok(nop(1)));
        assert_eq!(decoder.decode(&[0x0F], 0, mode), Err(DecodeError::Unavailable));
    }

    #[test]
    fn decoding_trims_opcode_and_exposes_next_address() {
        let mut instruction = Instruction::new(0x1000, vec![0x90, 0x90, 0x90]);
        assert_eq!(instruction.to_string(), "0x1000: <undecoded>");
        assert_eq!(instruction.next_address(), None);

        instruction.set_decoded(nop(1));
        assert_eq!(instruction.opcode(), &[0x90]);
        assert_eq!(instruction.mnemonic(), Some("nop"));
        assert_eq!(instruction.next_address(), Some(0x1001));
        assert_eq!(instruction.to_string(), "0x1000: nop");
    }

    #[test]
    fn mode_display_marks_thumb() {
        let mode = DecodeMode {
            architecture: Architecture::Arm32,
            thumb: true,
        };
        assert_eq!(mode.to_string(), "arm32/thumb");
    }
}
