//! 32-bit ARM core registers and the APSR condition flags.

register_table! {
    /// 32-bit ARM register identifiers.
    pub enum Arm32Register: Arm32 {
        R0 => root("r0", General, 32),
        R1 => root("r1", General, 32),
        R2 => root("r2", General, 32),
        R3 => root("r3", General, 32),
        R4 => root("r4", General, 32),
        R5 => root("r5", General, 32),
        R6 => root("r6", General, 32),
        R7 => root("r7", General, 32),
        R8 => root("r8", General, 32),
        R9 => root("r9", General, 32),
        R10 => root("r10", General, 32),
        R11 => root("r11", General, 32),
        R12 => root("r12", General, 32),
        Sp => root("sp", StackPointer, 32),
        Lr => root("lr", General, 32),
        Pc => root("pc", ProgramCounter, 32),
        Apsr => root("apsr", Status, 32),

        N => alias("n", Flag, Apsr, 31, 1),
        Z => alias("z", Flag, Apsr, 30, 1),
        C => alias("c", Flag, Apsr, 29, 1),
        V => alias("v", Flag, Apsr, 28, 1),
        Q => alias("q", Flag, Apsr, 27, 1),
    }
}
