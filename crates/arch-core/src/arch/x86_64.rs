//! x86-64 registers: sixteen 64-bit GPRs with their 32/16/8-bit aliases,
//! `rip`, `eflags` with its condition flags, and the segment selectors.
//!
//! Writes through the 32-bit aliases zero-extend into the full register under
//! the default [`crate::NarrowWritePolicy::ZeroExtendWord`] policy.

register_table! {
    /// x86-64 register identifiers.
    pub enum X8664Register: X86_64 {
        Rax => root("rax", General, 64),
        Rbx => root("rbx", General, 64),
        Rcx => root("rcx", General, 64),
        Rdx => root("rdx", General, 64),
        Rsi => root("rsi", General, 64),
        Rdi => root("rdi", General, 64),
        Rbp => root("rbp", General, 64),
        Rsp => root("rsp", StackPointer, 64),
        R8 => root("r8", General, 64),
        R9 => root("r9", General, 64),
        R10 => root("r10", General, 64),
        R11 => root("r11", General, 64),
        R12 => root("r12", General, 64),
        R13 => root("r13", General, 64),
        R14 => root("r14", General, 64),
        R15 => root("r15", General, 64),
        Rip => root("rip", ProgramCounter, 64),
        Eflags => root("eflags", Status, 32),
        Cs => root("cs", Segment, 16),
        Ds => root("ds", Segment, 16),
        Es => root("es", Segment, 16),
        Fs => root("fs", Segment, 16),
        Gs => root("gs", Segment, 16),
        Ss => root("ss", Segment, 16),

        Eax => alias("eax", General, Rax, 0, 32),
        Ebx => alias("ebx", General, Rbx, 0, 32),
        Ecx => alias("ecx", General, Rcx, 0, 32),
        Edx => alias("edx", General, Rdx, 0, 32),
        Esi => alias("esi", General, Rsi, 0, 32),
        Edi => alias("edi", General, Rdi, 0, 32),
        Ebp => alias("ebp", General, Rbp, 0, 32),
        Esp => alias("esp", StackPointer, Rsp, 0, 32),
        R8d => alias("r8d", General, R8, 0, 32),
        R9d => alias("r9d", General, R9, 0, 32),
        R10d => alias("r10d", General, R10, 0, 32),
        R11d => alias("r11d", General, R11, 0, 32),
        R12d => alias("r12d", General, R12, 0, 32),
        R13d => alias("r13d", General, R13, 0, 32),
        R14d => alias("r14d", General, R14, 0, 32),
        R15d => alias("r15d", General, R15, 0, 32),

        Ax => alias("ax", General, Rax, 0, 16),
        Bx => alias("bx", General, Rbx, 0, 16),
        Cx => alias("cx", General, Rcx, 0, 16),
        Dx => alias("dx", General, Rdx, 0, 16),
        Si => alias("si", General, Rsi, 0, 16),
        Di => alias("di", General, Rdi, 0, 16),
        Bp => alias("bp", General, Rbp, 0, 16),
        Sp => alias("sp", StackPointer, Rsp, 0, 16),
        R8w => alias("r8w", General, R8, 0, 16),
        R9w => alias("r9w", General, R9, 0, 16),
        R10w => alias("r10w", General, R10, 0, 16),
        R11w => alias("r11w", General, R11, 0, 16),
        R12w => alias("r12w", General, R12, 0, 16),
        R13w => alias("r13w", General, R13, 0, 16),
        R14w => alias("r14w", General, R14, 0, 16),
        R15w => alias("r15w", General, R15, 0, 16),

        Al => alias("al", General, Rax, 0, 8),
        Bl => alias("bl", General, Rbx, 0, 8),
        Cl => alias("cl", General, Rcx, 0, 8),
        Dl => alias("dl", General, Rdx, 0, 8),
        Sil => alias("sil", General, Rsi, 0, 8),
        Dil => alias("dil", General, Rdi, 0, 8),
        Bpl => alias("bpl", General, Rbp, 0, 8),
        Spl => alias("spl", StackPointer, Rsp, 0, 8),
        R8b => alias("r8b", General, R8, 0, 8),
        R9b => alias("r9b", General, R9, 0, 8),
        R10b => alias("r10b", General, R10, 0, 8),
        R11b => alias("r11b", General, R11, 0, 8),
        R12b => alias("r12b", General, R12, 0, 8),
        R13b => alias("r13b", General, R13, 0, 8),
        R14b => alias("r14b", General, R14, 0, 8),
        R15b => alias("r15b", General, R15, 0, 8),
        Ah => alias("ah", General, Rax, 8, 8),
        Bh => alias("bh", General, Rbx, 8, 8),
        Ch => alias("ch", General, Rcx, 8, 8),
        Dh => alias("dh", General, Rdx, 8, 8),

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
