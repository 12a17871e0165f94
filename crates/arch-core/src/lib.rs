//! Architecture-abstraction core for binary analysis.
//!
//! A [`Cpu`] is one execution context of a fixed [`Architecture`]: its
//! register table with parent/child aliasing, a sparse concrete memory store,
//! a concrete register store, the Thumb and exclusive-access mode bits and a
//! read-observer gate. Instruction decoding plugs in through
//! [`InstructionDecoder`].

/// Error taxonomy and crate result alias.
pub mod error;
pub use error::{ArchError, DecodeError, Result};

/// Fixed-width concrete values and bit-slice helpers.
pub mod value;
pub use value::{ConcreteValue, MAX_ACCESS_BYTES, MAX_VALUE_BITS};

/// Register descriptors, identifiers and the aliasing table.
pub mod register;
pub use register::{Register, RegisterId, RegisterKind, RegisterSlot, RegisterSpec, RegisterTable};

/// Supported architectures, byte order and narrow-write policy.
pub mod arch;
pub use arch::{Architecture, Endianness, NarrowWritePolicy};

/// Memory access descriptors and the sparse concrete memory store.
pub mod memory;
pub use memory::{validate_area, validate_range, ConcreteMemory, MemoryAccess, MAX_AREA_BYTES};

/// Concrete register values and mode bits.
pub mod state;
pub use state::{ConcreteRegisters, ModeFlags};

/// Read observers and the reentrancy guard.
pub mod callbacks;
pub use callbacks::{CallbackGate, ObserverId, ReadObserver, ReadTarget};

/// Instruction decoder seam.
pub mod decoder;
pub use decoder::{DecodeMode, DecodedInstruction, Instruction, InstructionDecoder, Operand};

/// CPU configuration.
pub mod api;
pub use api::CpuConfig;

/// The architecture contract façade.
pub mod cpu;
pub use cpu::Cpu;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
