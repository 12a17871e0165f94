//! IA-32 registers: eight 32-bit GPRs with their 16/8-bit aliases, `eip`,
//! `eflags` with its condition flags, and the segment selectors.

register_table! {
    /// IA-32 register identifiers.
    pub enum X86Register: X86 {
        Eax => root("eax", General, 32),
        Ebx => root("ebx", General, 32),
        Ecx => root("ecx", General, 32),
        Edx => root("edx", General, 32),
        Esi => root("esi", General, 32),
        Edi => root("edi", General, 32),
        Ebp => root("ebp", General, 32),
        Esp => root("esp", StackPointer, 32),
        Eip => root("eip", ProgramCounter, 32),
        Eflags => root("eflags", Status, 32),
        Cs => root("cs", Segment, 16),
        Ds => root("ds", Segment, 16),
        Es => root("es", Segment, 16),
        Fs => root("fs", Segment, 16),
        Gs => root("gs", Segment, 16),
        Ss => root("ss", Segment, 16),

        Ax => alias("ax", General, Eax, 0, 16),
        Bx => alias("bx", General, Ebx, 0, 16),
        Cx => alias("cx", General, Ecx, 0, 16),
        Dx => alias("dx", General, Edx, 0, 16),
        Si => alias("si", General, Esi, 0, 16),
        Di => alias("di", General, Edi, 0, 16),
        Bp => alias("bp", General, Ebp, 0, 16),
        Sp => alias("sp", StackPointer, Esp, 0, 16),
        Ip => alias("ip", ProgramCounter, Eip, 0, 16),

        Ah => alias("ah", General, Eax, 8, 8),
        Bh => alias("bh", General, Ebx, 8, 8),
        Ch => alias("ch", General, Ecx, 8, 8),
        Dh => alias("dh", General, Edx, 8, 8),
        Al => alias("al", General, Eax, 0, 8),
        Bl => alias("bl", General, Ebx, 0, 8),
        Cl => alias("cl", General, Ecx, 0, 8),
        Dl => alias("dl", General, Edx, 0, 8),

        Cf => alias("cf", Flag, Eflags, 0, 1),
        Pf => alias("pf", Flag, Eflags, 2, 1),
        Af => alias("af", Flag, Eflags, 4, 1),
        Zf => alias("zf", Flag, Eflags, 6, 1),
        Sf => alias("sf", Flag, Eflags, 7, 1),
        Tf => alias("tf", Flag, Eflags, 8, 1),
        If => alias("if", Flag, Eflags, 9, 1),
        Df => alias("df", Flag, Eflags, 10, 1),
        Of => alias("of", Flag, Eflags, 11, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::X86Register;
    use crate::{Architecture, RegisterId};

    #[test]
    fn ids_follow_declaration_order() {
        for (index, register) in (0_u16..).zip(X86Register::ALL.iter().copied()) {
            assert_eq!(register.id(), RegisterId::new(Architecture::X86, index));
        }
        assert_eq!(X86Register::ALL.len(), X86Register::SPECS.len());
    }

    #[test]
    fn byte_aliases_split_the_low_word() {
        let al = X86Register::SPECS[X86Register::Al as usize];
        let ah = X86Register::SPECS[X86Register::Ah as usize];
        assert_eq!(al.parent, X86Register::Eax.id());
        assert_eq!((al.lsb, al.bits), (0, 8));
        assert_eq!((ah.lsb, ah.bits), (8, 8));
        assert_eq!(X86Register::Zf.name(), "zf");
    }
}
