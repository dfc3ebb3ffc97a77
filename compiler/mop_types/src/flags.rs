//! Descriptor flags.
//!
//! Fixed at declaration time. Kind (class vs role) is not a flag; it lives
//! in `TypeKind` because it changes which edges a descriptor may carry.

use bitflags::bitflags;

bitflags! {
    /// Declaration-time properties of a type descriptor.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u8 {
        /// Class cannot be instantiated, only extended.
        const ABSTRACT = 1 << 0;
        /// Declared without a name; excluded from name-based lookup.
        const ANONYMOUS = 1 << 1;
        /// Role created implicitly by a `Role?` tag.
        const TAG = 1 << 2;
    }
}

impl TypeFlags {
    /// Check if the descriptor may be looked up by name.
    #[inline]
    pub fn is_named(self) -> bool {
        !self.contains(Self::ANONYMOUS)
    }
}
