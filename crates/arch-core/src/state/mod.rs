//! Concrete CPU state owned by one architecture instance.

/// Architecture-scoped mode bits.
pub mod mode;
/// Concrete register values, one backing value per root register.
pub mod registers;

pub use mode::ModeFlags;
pub use registers::ConcreteRegisters;
