//! The architecture contract.
//!
//! [`Cpu`] owns one register table, one concrete memory store, one concrete
//! register store and the two mode bits of a single execution context.
//! Analysis code reaches all of them through the methods below; nothing
//! hands out mutable access to the stores themselves.
//!
//! Reads take an `exec_callbacks` switch. When set, the value is routed
//! through the registered read observers before it is returned and then
//! truncated back to the width of the target. Writes go straight to the
//! stores. A direct concrete write does not reconcile any symbolic state an
//! embedding engine keeps alongside; re-concretizing is the caller's job.

use std::fmt;

use log::{debug, trace};
use num_traits::ToPrimitive;

use crate::value::mask;
use crate::{
    validate_area, ArchError, Architecture, CallbackGate, ConcreteMemory, ConcreteRegisters,
    ConcreteValue, CpuConfig, DecodeError, DecodeMode, Endianness, Instruction,
    InstructionDecoder, MemoryAccess, ModeFlags, ObserverId, ReadTarget, Register, RegisterId,
    RegisterKind, RegisterTable, Result,
};

/// One virtual CPU of a fixed architecture.
pub struct Cpu {
    config: CpuConfig,
    table: RegisterTable,
    memory: ConcreteMemory,
    registers: ConcreteRegisters,
    modes: ModeFlags,
    gate: CallbackGate<Self>,
    decoder: Option<Box<dyn InstructionDecoder>>,
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("architecture", &self.config.architecture)
            .field("registers", &self.table.len())
            .field("defined_bytes", &self.memory.len())
            .field("modes", &self.modes)
            .field("gate", &self.gate)
            .field("decoder", &self.decoder.is_some())
            .finish()
    }
}

impl Cpu {
    /// Builds a CPU with zeroed registers, empty memory and no decoder.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidArgument`] if the architecture's register
    /// table is malformed.
    pub fn new(config: CpuConfig) -> Result<Self> {
        let architecture = config.architecture;
        let table = RegisterTable::new(architecture, architecture.register_specs())?;
        let registers = ConcreteRegisters::new(&table);
        debug!(
            "{} cpu created: {} registers, {} roots",
            config.architecture,
            table.len(),
            table.root_count()
        );
        Ok(Self {
            config,
            table,
            memory: ConcreteMemory::new(),
            registers,
            modes: ModeFlags::default(),
            gate: CallbackGate::new(),
            decoder: None,
        })
    }

    /// Builds a CPU with every default of `architecture`.
    ///
    /// # Errors
    ///
    /// See [`Cpu::new`].
    pub fn for_architecture(architecture: Architecture) -> Result<Self> {
        Self::new(CpuConfig::new(architecture))
    }

    /// Attaches `decoder` and returns the CPU.
    #[must_use]
    pub fn with_decoder(mut self, decoder: impl InstructionDecoder + 'static) -> Self {
        self.set_decoder(decoder);
        self
    }

    /// Attaches `decoder`, replacing any previous one.
    pub fn set_decoder(&mut self, decoder: impl InstructionDecoder + 'static) {
        self.decoder = Some(Box::new(decoder));
        debug!("{} decoder attached", self.config.architecture);
    }

    /// `true` when a decoder is attached.
    #[must_use]
    pub const fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }

    /// Active architecture.
    #[must_use]
    pub const fn architecture(&self) -> Architecture {
        self.config.architecture
    }

    /// Configuration this CPU was built from.
    #[must_use]
    pub const fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Register table of the active architecture.
    #[must_use]
    pub const fn register_table(&self) -> &RegisterTable {
        &self.table
    }

    /// Resets the mode bits, drops every defined memory byte and zeroes
    /// every register. Observers and the decoder stay attached.
    pub fn clear(&mut self) {
        self.modes.reset();
        self.memory.clear();
        self.registers.clear();
        debug!("{} cpu cleared", self.config.architecture);
    }

    /// Byte order used for multi-byte memory values.
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.config.resolved_endianness()
    }

    // Register introspection.

    /// `true` for single-bit flag registers.
    #[must_use]
    pub fn is_flag(&self, id: RegisterId) -> bool {
        self.table.is_flag(id)
    }

    /// `true` for known registers that are not flag bits.
    #[must_use]
    pub fn is_register(&self, id: RegisterId) -> bool {
        self.table.is_register(id)
    }

    /// `true` for any id the architecture recognizes, flags included.
    #[must_use]
    pub fn is_register_valid(&self, id: RegisterId) -> bool {
        self.table.contains(id)
    }

    /// Width in bytes of a general-purpose register.
    #[must_use]
    pub const fn gpr_size(&self) -> u32 {
        self.config.architecture.gpr_size()
    }

    /// Width in bits of a general-purpose register.
    #[must_use]
    pub const fn gpr_bit_size(&self) -> u32 {
        self.config.architecture.gpr_bit_size()
    }

    /// Number of recognized ids, aliases and flags included.
    #[must_use]
    pub fn number_of_registers(&self) -> usize {
        self.table.len()
    }

    /// Every register in id order.
    #[must_use]
    pub fn all_registers(&self) -> &[Register] {
        self.table.registers()
    }

    /// Root registers only, one per independent storage slot.
    #[must_use]
    pub fn parent_registers(&self) -> Vec<&Register> {
        self.table.roots().collect()
    }

    /// Register by id.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for an unknown id.
    pub fn register(&self, id: impl Into<RegisterId>) -> Result<&Register> {
        self.table.get(id.into())
    }

    /// Register by architectural name.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for an unknown name.
    pub fn register_by_name(&self, name: &str) -> Result<&Register> {
        self.table.by_name(name)
    }

    /// Root register backing `id`; a root is its own parent.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for an unknown id.
    pub fn parent_register(&self, id: impl Into<RegisterId>) -> Result<&Register> {
        self.table.parent(id.into())
    }

    /// Conventional program counter.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] if the table declares none.
    pub fn program_counter(&self) -> Result<&Register> {
        self.conventional(RegisterKind::ProgramCounter, "program counter")
    }

    /// Conventional stack pointer.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] if the table declares none.
    pub fn stack_pointer(&self) -> Result<&Register> {
        self.conventional(RegisterKind::StackPointer, "stack pointer")
    }

    fn conventional(&self, kind: RegisterKind, what: &str) -> Result<&Register> {
        self.table.first_of_kind(kind).ok_or_else(|| {
            ArchError::NotFound(format!("{} has no {what}", self.config.architecture))
        })
    }

    // Mode bits.

    /// Current mode bits.
    #[must_use]
    pub const fn modes(&self) -> ModeFlags {
        self.modes
    }

    /// `true` in Thumb state. Always `false` outside ARM32.
    #[must_use]
    pub const fn is_thumb(&self) -> bool {
        self.modes.thumb()
    }

    /// Enters or leaves Thumb state. A no-op outside ARM32.
    pub fn set_thumb(&mut self, state: bool) {
        self.modes.set_thumb(self.config.architecture, state);
        trace!("thumb = {}", self.modes.thumb());
    }

    /// `true` while an exclusive load waits for its store.
    #[must_use]
    pub const fn is_memory_exclusive_access(&self) -> bool {
        self.modes.exclusive_access()
    }

    /// Sets the exclusive-access bit. A no-op on architectures without
    /// load/store-exclusive.
    pub fn set_memory_exclusive_access(&mut self, state: bool) {
        self.modes
            .set_exclusive_access(self.config.architecture, state);
        trace!("exclusive access = {}", self.modes.exclusive_access());
    }

    // Disassembly.

    /// Decodes `instruction` in place with the attached decoder.
    ///
    /// On ARM32 the current Thumb bit selects the encoding tables. On success
    /// the opcode is trimmed to the decoded length.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::Decode`] when no decoder is attached, the opcode
    /// is empty or shorter than the decoded length, or the decoder rejects
    /// the bytes.
    pub fn disassembly(&self, instruction: &mut Instruction) -> Result<()> {
        let decoder = self.decoder.as_ref().ok_or(DecodeError::Unavailable)?;
        let address = instruction.address();
        let available = instruction.opcode().len();
        if available == 0 {
            return Err(DecodeError::Truncated {
                address,
                needed: 1,
                available,
            }
            .into());
        }

        let mode = self.decode_mode();
        let decoded = decoder.decode(instruction.opcode(), address, mode)?;
        if decoded.size == 0 {
            return Err(DecodeError::InvalidEncoding {
                address,
                mode: mode.to_string(),
            }
            .into());
        }
        if decoded.size > available {
            return Err(DecodeError::Truncated {
                address,
                needed: decoded.size,
                available,
            }
            .into());
        }

        trace!("{address:#x}: {} ({} bytes)", decoded.mnemonic, decoded.size);
        instruction.set_decoded(decoded);
        Ok(())
    }

    /// Decodes up to `count` consecutive instructions from concrete memory.
    ///
    /// Bytes are fetched without observers, and only while defined. Once at
    /// least one instruction is decoded, running out of defined bytes (or
    /// hitting a trailing partial instruction) ends the listing early.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Truncated`] when `address` itself is undefined,
    /// plus any error of [`Cpu::disassembly`].
    pub fn disassemble_memory(&self, address: u64, count: usize) -> Result<Vec<Instruction>> {
        let mut instructions = Vec::new();
        let mut current = address;
        while instructions.len() < count {
            let bytes = self.fetch(current);
            if bytes.is_empty() {
                if instructions.is_empty() {
                    return Err(DecodeError::Truncated {
                        address: current,
                        needed: 1,
                        available: 0,
                    }
                    .into());
                }
                break;
            }

            let mut instruction = Instruction::new(current, bytes);
            match self.disassembly(&mut instruction) {
                Ok(()) => {}
                Err(ArchError::Decode(DecodeError::Truncated { .. }))
                    if !instructions.is_empty() =>
                {
                    break;
                }
                Err(err) => return Err(err),
            }
            let next = instruction.next_address();
            instructions.push(instruction);
            match next {
                Some(next) => current = next,
                None => break,
            }
        }
        Ok(instructions)
    }

    fn fetch(&self, address: u64) -> Vec<u8> {
        (address..=u64::MAX)
            .take(self.config.architecture.max_instruction_size())
            .map_while(|at| self.memory.get(at))
            .collect()
    }

    const fn decode_mode(&self) -> DecodeMode {
        DecodeMode {
            architecture: self.config.architecture,
            thumb: self.modes.thumb(),
        }
    }

    // Concrete memory reads.

    /// Reads one byte; undefined bytes read as zero.
    #[must_use]
    pub fn get_concrete_memory_value(&self, address: u64, exec_callbacks: bool) -> u8 {
        let raw = self.memory.read_byte(address);
        if !exec_callbacks {
            return raw;
        }
        let target = ReadTarget::Memory(MemoryAccess::new(address, 1));
        let value = self.gate.run(self, target, ConcreteValue::from(raw)) & mask(8);
        value.to_u8().unwrap_or_default()
    }

    /// Reads `access` as one value assembled in [`Cpu::endianness`] order.
    ///
    /// Observers see the whole access once.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidSize`] for accesses wider than
    /// [`crate::MAX_ACCESS_BYTES`], or [`ArchError::InvalidArgument`] for a
    /// zero-sized or overflowing range.
    pub fn get_concrete_memory_access_value(
        &self,
        access: &MemoryAccess,
        exec_callbacks: bool,
    ) -> Result<ConcreteValue> {
        let raw = self.memory.read_access(access, self.endianness())?;
        if !exec_callbacks {
            return Ok(raw);
        }
        let value = self.gate.run(self, ReadTarget::Memory(*access), raw);
        Ok(value & mask(access.bit_size()))
    }

    /// Reads `size` bytes from `base`, each gated on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidArgument`] for a zero-sized or overflowing
    /// range, or one larger than [`crate::MAX_AREA_BYTES`].
    pub fn get_concrete_memory_area_value(
        &self,
        base: u64,
        size: usize,
        exec_callbacks: bool,
    ) -> Result<Vec<u8>> {
        let range = validate_area(base, size)?;
        Ok(range
            .map(|address| self.get_concrete_memory_value(address, exec_callbacks))
            .collect())
    }

    // Concrete memory writes.

    /// Writes one byte and marks it defined.
    pub fn set_concrete_memory_value(&mut self, address: u64, value: u8) {
        self.memory.write_byte(address, value);
    }

    /// Writes `value` over `access`, split in [`Cpu::endianness`] order.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidSize`] when the access is too wide or
    /// `value` does not fit in it, or [`ArchError::InvalidArgument`] for a
    /// zero-sized or overflowing range. Nothing is written on error.
    pub fn set_concrete_memory_access_value(
        &mut self,
        access: &MemoryAccess,
        value: &ConcreteValue,
    ) -> Result<()> {
        let endianness = self.endianness();
        self.memory.write_access(access, value, endianness)
    }

    /// Writes `values` starting at `base` and marks them defined.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidArgument`] for an empty slice or a range
    /// that overflows the address space. Nothing is written on error.
    pub fn set_concrete_memory_area_value(&mut self, base: u64, values: &[u8]) -> Result<()> {
        self.memory.write_area(base, values)
    }

    /// Writes the first `size` bytes of `buffer` starting at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidArgument`] when `size` is zero, exceeds
    /// `buffer.len()` or overflows the address space. Nothing is written on
    /// error.
    pub fn set_concrete_memory_area_raw(
        &mut self,
        base: u64,
        buffer: &[u8],
        size: usize,
    ) -> Result<()> {
        let values = buffer.get(..size).ok_or_else(|| {
            ArchError::InvalidArgument(format!(
                "{size} byte(s) requested from a {}-byte buffer",
                buffer.len()
            ))
        })?;
        self.memory.write_area(base, values)
    }

    // Definedness.

    /// `true` when every byte in `[base, base + size)` is defined.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidArgument`] for a zero-sized or overflowing
    /// range.
    pub fn is_concrete_memory_value_defined(&self, base: u64, size: usize) -> Result<bool> {
        self.memory.is_defined(base, size)
    }

    /// `true` when every byte of `access` is defined.
    ///
    /// # Errors
    ///
    /// See [`Cpu::is_concrete_memory_value_defined`].
    pub fn is_concrete_memory_access_defined(&self, access: &MemoryAccess) -> Result<bool> {
        self.memory.is_defined(access.address, access.size)
    }

    /// Drops definedness for `[base, base + size)`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::InvalidArgument`] for a zero-sized or overflowing
    /// range.
    pub fn clear_concrete_memory_value(&mut self, base: u64, size: usize) -> Result<()> {
        self.memory.clear_range(base, size)
    }

    /// Drops definedness for every byte of `access`.
    ///
    /// # Errors
    ///
    /// See [`Cpu::clear_concrete_memory_value`].
    pub fn clear_concrete_memory_access_value(&mut self, access: &MemoryAccess) -> Result<()> {
        self.memory.clear_range(access.address, access.size)
    }

    /// Defined `(address, byte)` pairs in ascending address order.
    pub fn defined_memory(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.memory.iter()
    }

    // Concrete registers.

    /// Reads a register or alias.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for an unknown id.
    pub fn get_concrete_register_value(
        &self,
        id: impl Into<RegisterId>,
        exec_callbacks: bool,
    ) -> Result<ConcreteValue> {
        let id = id.into();
        let bits = self.table.get(id)?.bit_size();
        let raw = self.registers.read(&self.table, id)?;
        if !exec_callbacks {
            return Ok(raw);
        }
        let value = self.gate.run(self, ReadTarget::Register(id), raw);
        Ok(value & mask(bits))
    }

    /// Writes a register or alias, patching only its slice of the root
    /// according to the configured [`crate::NarrowWritePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] for an unknown id, or
    /// [`ArchError::InvalidSize`] when `value` is wider than the register.
    pub fn set_concrete_register_value(
        &mut self,
        id: impl Into<RegisterId>,
        value: &ConcreteValue,
    ) -> Result<()> {
        let policy = self.config.resolved_narrow_write_policy();
        self.registers.write(&self.table, id.into(), value, policy)
    }

    // Observers.

    /// Registers a read observer; observers run in registration order.
    ///
    /// Observers receive the CPU itself and may issue further reads. A read
    /// of the slot currently being observed bypasses the observers.
    pub fn register_observer<F>(&mut self, observer: F) -> ObserverId
    where
        F: Fn(&Self, &ReadTarget, &mut ConcreteValue) + Send + 'static,
    {
        self.gate.register(observer)
    }

    /// Unregisters one observer.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::NotFound`] when `id` is not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> Result<()> {
        self.gate.remove(id)
    }

    /// Unregisters every observer.
    pub fn clear_observers(&mut self) {
        self.gate.clear();
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.gate.len()
    }
}
