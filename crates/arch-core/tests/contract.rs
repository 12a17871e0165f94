//! End-to-end coverage of the architecture contract through the public API.

use arch_core::arch::arm32::Arm32Register;
use arch_core::arch::x86::X86Register;
use arch_core::{
    ArchError, Architecture, ConcreteValue, Cpu, CpuConfig, DecodeError, DecodeMode,
    DecodedInstruction, Instruction, MemoryAccess, Operand, ReadTarget, Register, RegisterId,
};
use log as _;
use num_bigint as _;
use num_traits as _;
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Decoder double: 2-byte encodings in Thumb state, 4-byte otherwise, and
/// `0xFF` as a leading byte is never valid.
fn mock_decoder(
    bytes: &[u8],
    address: u64,
    mode: DecodeMode,
) -> Result<DecodedInstruction, DecodeError> {
    if bytes.first() == Some(&0xFF) {
        return Err(DecodeError::InvalidEncoding {
            address,
            mode: mode.to_string(),
        });
    }
    let size = if mode.thumb { 2 } else { 4 };
    if bytes.len() < size {
        return Err(DecodeError::Truncated {
            address,
            needed: size,
            available: bytes.len(),
        });
    }
    Ok(DecodedInstruction {
        mnemonic: if mode.thumb { "movs" } else { "mov" }.to_string(),
        operands: vec![
            Operand::Register(Arm32Register::R0.id()),
            Operand::Immediate {
                value: u64::from(bytes[0]),
                bits: 8,
            },
        ],
        size,
    })
}

#[test]
fn eax_al_scenario() {
    let mut cpu = Cpu::for_architecture(Architecture::X86).expect("valid table");

    cpu.set_concrete_register_value(X86Register::Eax, &ConcreteValue::from(0x1234_5678u32))
        .expect("write eax");
    assert_eq!(
        cpu.get_concrete_register_value(X86Register::Al, true),
        Ok(ConcreteValue::from(0x78u8))
    );

    cpu.set_concrete_register_value(X86Register::Al, &ConcreteValue::from(0xFFu8))
        .expect("write al");
    assert_eq!(
        cpu.get_concrete_register_value(X86Register::Eax, true),
        Ok(ConcreteValue::from(0x1234_56FFu32))
    );
}

#[test]
fn mode_reset_drops_every_concrete_value() {
    let mut cpu = Cpu::for_architecture(Architecture::Arm32).expect("valid table");
    cpu.set_thumb(true);
    cpu.set_memory_exclusive_access(true);
    cpu.set_concrete_memory_area_value(0x8000, &[1, 2, 3, 4])
        .expect("valid area");
    for register in cpu.parent_registers().iter().map(|r| r.id()).collect::<Vec<_>>() {
        cpu.set_concrete_register_value(register, &ConcreteValue::from(1u8))
            .expect("one fits every root");
    }
    assert!(cpu.is_thumb());
    assert!(cpu.is_memory_exclusive_access());

    cpu.clear();

    assert!(!cpu.is_thumb());
    assert!(!cpu.is_memory_exclusive_access());
    assert_eq!(cpu.is_concrete_memory_value_defined(0x8000, 4), Ok(false));
    assert_eq!(cpu.defined_memory().next(), None);
    for register in cpu.all_registers() {
        assert_eq!(
            cpu.get_concrete_register_value(register.id(), false),
            Ok(ConcreteValue::default()),
            "{register} survived clear"
        );
    }
}

#[test]
fn unknown_registers_are_not_found() {
    let cpu = Cpu::for_architecture(Architecture::X86).expect("valid table");
    let bogus = RegisterId::new(Architecture::X86, u16::MAX);

    assert!(cpu.register(bogus).is_err_and(|e| e.is_not_found()));
    assert!(cpu.parent_register(bogus).is_err_and(|e| e.is_not_found()));
    assert!(cpu
        .get_concrete_register_value(bogus, true)
        .is_err_and(|e| e.is_not_found()));
    assert!(cpu.register_by_name("xmm0").is_err_and(|e| e.is_not_found()));
}

#[test]
fn foreign_architecture_ids_are_not_found() {
    let mut cpu = Cpu::for_architecture(Architecture::Arm32).expect("valid table");
    cpu.set_concrete_register_value(Arm32Register::R0, &ConcreteValue::from(0xAAu8))
        .expect("write r0");

    // Eax and r0 share an index, so only the architecture tells them apart.
    assert_eq!(X86Register::Eax.id().index(), Arm32Register::R0.id().index());
    assert!(cpu.register(X86Register::Eax).is_err_and(|e| e.is_not_found()));
    assert!(cpu.parent_register(X86Register::Eax).is_err_and(|e| e.is_not_found()));
    assert!(cpu
        .get_concrete_register_value(X86Register::Eax, false)
        .is_err_and(|e| e.is_not_found()));
    assert!(cpu
        .set_concrete_register_value(X86Register::Eax, &ConcreteValue::from(1u8))
        .is_err_and(|e| e.is_not_found()));
    assert!(!cpu.is_register_valid(X86Register::Eax.id()));
    assert!(!cpu.is_register(X86Register::Eax.id()));
    assert!(!cpu.is_flag(X86Register::Zf.id()));

    assert_eq!(
        cpu.get_concrete_register_value(Arm32Register::R0, false),
        Ok(ConcreteValue::from(0xAAu8))
    );
}

#[rstest]
#[case::x86(Architecture::X86, "ah", "eax", 8, 8)]
#[case::x86_64_word(Architecture::X86_64, "r9d", "r9", 0, 32)]
#[case::x86_64_byte(Architecture::X86_64, "sil", "rsi", 0, 8)]
#[case::arm32_flag(Architecture::Arm32, "z", "apsr", 30, 1)]
#[case::aarch64_word(Architecture::AArch64, "w7", "x7", 0, 32)]
fn aliases_resolve_to_their_root(
    #[case] architecture: Architecture,
    #[case] alias: &str,
    #[case] root: &str,
    #[case] lsb: u32,
    #[case] bits: u32,
) {
    let cpu = Cpu::for_architecture(architecture).expect("valid table");
    let register = cpu.register_by_name(alias).expect("known alias");
    assert_eq!(register.lsb(), lsb);
    assert_eq!(register.bit_size(), bits);
    assert_eq!(
        cpu.parent_register(register.id()).map(Register::name),
        Ok(root)
    );
    assert!(cpu
        .parent_registers()
        .iter()
        .any(|parent| parent.name() == root));
}

#[test]
fn observers_chain_in_order_and_only_on_gated_reads() {
    let mut cpu = Cpu::for_architecture(Architecture::X86).expect("valid table");
    let calls = Arc::new(AtomicUsize::new(0));
    cpu.set_concrete_register_value(X86Register::Ecx, &ConcreteValue::from(10u8))
        .expect("write ecx");

    let counter = Arc::clone(&calls);
    cpu.register_observer(move |_, _, value| {
        counter.fetch_add(1, Ordering::SeqCst);
        *value = &*value * 3u8;
    });
    cpu.register_observer(|_, target, value| {
        if *target == ReadTarget::Register(X86Register::Ecx.id()) {
            *value = &*value + 1u8;
        }
    });

    assert_eq!(
        cpu.get_concrete_register_value(X86Register::Ecx, true),
        Ok(ConcreteValue::from(31u8))
    );
    assert_eq!(
        cpu.get_concrete_register_value(X86Register::Ecx, false),
        Ok(ConcreteValue::from(10u8))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Writes never reach the observers.
    cpu.set_concrete_memory_value(0x10, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn observers_can_materialize_undefined_memory_lazily() {
    let mut cpu = Cpu::for_architecture(Architecture::X86_64).expect("valid table");
    cpu.register_observer(|cpu, target, value| {
        if let ReadTarget::Memory(access) = target {
            if cpu.is_concrete_memory_access_defined(access) == Ok(false) {
                *value = ConcreteValue::from(0xCCu8);
            }
        }
    });
    cpu.set_concrete_memory_value(0x1000, 0x11);

    assert_eq!(
        cpu.get_concrete_memory_area_value(0x0FFF, 3, true),
        Ok(vec![0xCC, 0x11, 0xCC])
    );
    assert_eq!(
        cpu.get_concrete_memory_area_value(0x0FFF, 3, false),
        Ok(vec![0x00, 0x11, 0x00])
    );
}

#[test]
fn reentrant_observer_reads_do_not_recurse() {
    let mut cpu = Cpu::for_architecture(Architecture::X86).expect("valid table");
    let access = MemoryAccess::new(0x2000, 4);
    cpu.set_concrete_memory_access_value(&access, &ConcreteValue::from(0x0102_0304u32))
        .expect("fits");
    cpu.register_observer(move |cpu, target, value| {
        if *target == ReadTarget::Memory(access) {
            let raw = cpu
                .get_concrete_memory_access_value(&access, true)
                .expect("valid access");
            *value = raw + 1u8;
        }
    });

    assert_eq!(
        cpu.get_concrete_memory_access_value(&access, true),
        Ok(ConcreteValue::from(0x0102_0305u32))
    );
}

#[test]
fn thumb_selects_the_decode_width() {
    let mut cpu = Cpu::for_architecture(Architecture::Arm32)
        .expect("valid table")
        .with_decoder(mock_decoder);
    assert!(cpu.has_decoder());

    let mut arm = Instruction::new(0x100, vec![0x01, 0x00, 0xA0, 0xE3]);
    cpu.disassembly(&mut arm).expect("arm encoding");
    assert_eq!(arm.size(), Some(4));
    assert_eq!(arm.to_string(), "0x100: mov");

    cpu.set_thumb(true);
    let mut thumb = Instruction::new(0x100, vec![0x01, 0x20, 0x00, 0x00]);
    cpu.disassembly(&mut thumb).expect("thumb encoding");
    assert_eq!(thumb.size(), Some(2));
    assert_eq!(thumb.opcode(), &[0x01, 0x20]);
    assert_eq!(thumb.next_address(), Some(0x102));
    assert_eq!(thumb.mnemonic(), Some("movs"));
}

#[test]
fn decode_errors_propagate_unchanged() {
    let cpu = Cpu::for_architecture(Architecture::Arm32)
        .expect("valid table")
        .with_decoder(mock_decoder);
    let mut instruction = Instruction::new(0x40, vec![0xFF, 0, 0, 0]);
    assert_eq!(
        cpu.disassembly(&mut instruction),
        Err(ArchError::Decode(DecodeError::InvalidEncoding {
            address: 0x40,
            mode: "arm32".to_string(),
        }))
    );
    assert!(instruction.decoded().is_none());
}

#[test]
fn disassemble_memory_follows_decoded_sizes() {
    let mut cpu = Cpu::new(CpuConfig::new(Architecture::Arm32))
        .expect("valid table")
        .with_decoder(mock_decoder);
    cpu.set_concrete_memory_area_value(0x0, &[0x01; 10])
        .expect("valid area");

    let listing = cpu.disassemble_memory(0x0, 8).expect("decodes");
    let addresses: Vec<u64> = listing.iter().map(Instruction::address).collect();
    // Two full words, then only two defined bytes remain.
    assert_eq!(addresses, vec![0x0, 0x4]);

    assert!(matches!(
        cpu.disassemble_memory(0x8, 1),
        Err(ArchError::Decode(DecodeError::Truncated {
            needed: 4,
            available: 2,
            ..
        }))
    ));
}
