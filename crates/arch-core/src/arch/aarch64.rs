//! AArch64 registers: `x0`-`x30` with their `w` views, `sp`/`wsp`, `pc`, the
//! zero register and `nzcv` with its condition flags.

register_table! {
    /// AArch64 register identifiers.
    pub enum AArch64Register: AArch64 {
        X0 => root("x0", General, 64),
        X1 => root("x1", General, 64),
        X2 => root("x2", General, 64),
        X3 => root("x3", General, 64),
        X4 => root("x4", General, 64),
        X5 => root("x5", General, 64),
        X6 => root("x6", General, 64),
        X7 => root("x7", General, 64),
        X8 => root("x8", General, 64),
        X9 => root("x9", General, 64),
        X10 => root("x10", General, 64),
        X11 => root("x11", General, 64),
        X12 => root("x12", General, 64),
        X13 => root("x13", General, 64),
        X14 => root("x14", General, 64),
        X15 => root("x15", General, 64),
        X16 => root("x16", General, 64),
        X17 => root("x17", General, 64),
        X18 => root("x18", General, 64),
        X19 => root("x19", General, 64),
        X20 => root("x20", General, 64),
        X21 => root("x21", General, 64),
        X22 => root("x22", General, 64),
        X23 => root("x23", General, 64),
        X24 => root("x24", General, 64),
        X25 => root("x25", General, 64),
        X26 => root("x26", General, 64),
        X27 => root("x27", General, 64),
        X28 => root("x28", General, 64),
        X29 => root("x29", General, 64),
        X30 => root("x30", General, 64),
        Sp => root("sp", StackPointer, 64),
        Pc => root("pc", ProgramCounter, 64),
        Xzr => root("xzr", Zero, 64),
        Nzcv => root("nzcv", Status, 32),

        W0 => alias("w0", General, X0, 0, 32),
        W1 => alias("w1", General, X1, 0, 32),
        W2 => alias("w2", General, X2, 0, 32),
        W3 => alias("w3", General, X3, 0, 32),
        W4 => alias("w4", General, X4, 0, 32),
        W5 => alias("w5", General, X5, 0, 32),
        W6 => alias("w6", General, X6, 0, 32),
        W7 => alias("w7", General, X7, 0, 32),
        W8 => alias("w8", General, X8, 0, 32),
        W9 => alias("w9", General, X9, 0, 32),
        W10 => alias("w10", General, X10, 0, 32),
        W11 => alias("w11", General, X11, 0, 32),
        W12 => alias("w12", General, X12, 0, 32),
        W13 => alias("w13", General, X13, 0, 32),
        W14 => alias("w14", General, X14, 0, 32),
        W15 => alias("w15", General, X15, 0, 32),
        W16 => alias("w16", General, X16, 0, 32),
        W17 => alias("w17", General, X17, 0, 32),
        W18 => alias("w18", General, X18, 0, 32),
        W19 => alias("w19", General, X19, 0, 32),
        W20 => alias("w20", General, X20, 0, 32),
        W21 => alias("w21", General, X21, 0, 32),
        W22 => alias("w22", General, X22, 0, 32),
        W23 => alias("w23", General, X23, 0, 32),
        W24 => alias("w24", General, X24, 0, 32),
        W25 => alias("w25", General, X25, 0, 32),
        W26 => alias("w26", General, X26, 0, 32),
        W27 => alias("w27", General, X27, 0, 32),
        W28 => alias("w28", General, X28, 0, 32),
        W29 => alias("w29", General, X29, 0, 32),
        W30 => alias("w30", General, X30, 0, 32),
        Wsp => alias("wsp", StackPointer, Sp, 0, 32),
        Wzr => alias("wzr", Zero, Xzr, 0, 32),

        N => alias("n", Flag, Nzcv, 31, 1),
        Z => alias("z", Flag, Nzcv, 30, 1),
        C => alias("c", Flag, Nzcv, 29, 1),
        V => alias("v", Flag, Nzcv, 28, 1),
    }
}
