//! Concrete memory model: access descriptors and the sparse byte store.

/// Memory access descriptors and range validation.
pub mod access;
/// Sparse byte store with definedness tracking.
pub mod store;

pub use access::{validate_area, validate_range, MemoryAccess, MAX_AREA_BYTES};
pub use store::ConcreteMemory;
