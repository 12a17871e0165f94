//! Register table declaration macro.

/// Declares an architecture-scoped register enum together with its table.
///
/// Variants are numbered in declaration order and `SPECS[n]` describes the
/// variant with discriminant `n`, so the enum doubles as the id space of the
/// table built from `SPECS`. Every id is tagged with the architecture named
/// after the enum. Roots must be declared before their aliases.
macro_rules! register_table {
    (@spec $arch:ident, $name:ident, $variant:ident, root($label:literal, $kind:ident, $bits:literal)) => {
        $crate::RegisterSpec::root(
            $label,
            $crate::RegisterKind::$kind,
            $crate::RegisterId::new($crate::Architecture::$arch, $name::$variant as u16),
            $bits,
        )
    };
    (@spec $arch:ident, $name:ident, $variant:ident, alias($label:literal, $kind:ident, $parent:ident, $lsb:literal, $bits:literal)) => {
        $crate::RegisterSpec::alias(
            $label,
            $crate::RegisterKind::$kind,
            $crate::RegisterId::new($crate::Architecture::$arch, $name::$parent as u16),
            $lsb,
            $bits,
        )
    };
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $arch:ident {
            $( $variant:ident => $form:ident ( $($args:tt)* ) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        #[allow(missing_docs)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Every register, in id order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Table declarations, indexed by discriminant.
            pub const SPECS: &'static [$crate::RegisterSpec] = &[
                $( register_table!(@spec $arch, $name, $variant, $form($($args)*)) ),+
            ];

            /// Table id of this register.
            #[must_use]
            pub const fn id(self) -> $crate::RegisterId {
                $crate::RegisterId::new($crate::Architecture::$arch, self as u16)
            }

            /// Architectural name of this register.
            #[must_use]
            pub const fn name(self) -> &'static str {
                Self::SPECS[self as usize].name
            }
        }

        impl From<$name> for $crate::RegisterId {
            fn from(register: $name) -> Self {
                register.id()
            }
        }
    };
}
