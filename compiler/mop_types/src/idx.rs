//! Type descriptor handle.
//!
//! `TypeIdx` is the identity of a class or role. Every declare call returns
//! one, and `Registry::resolve` returns the same handle for named types.
//! Anonymous types are reachable only through their handle.
//!
//! - 32-bit index into the registry's descriptor arena
//! - Equality is O(1) index comparison, never a name comparison
//! - Copy, lightweight passing

use std::fmt;

/// A 32-bit index into a registry's descriptor arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeIdx(u32);

impl TypeIdx {
    /// Create an index from a raw u32 value.
    ///
    /// The index is only meaningful for the registry that produced it;
    /// lookups with a foreign index return `None`.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position in the descriptor arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdx({})", self.0)
    }
}
