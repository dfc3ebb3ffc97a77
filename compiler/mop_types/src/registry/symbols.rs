//! Qualified name -> type handle table.
//!
//! Only named descriptors live here; anonymous ones are reachable through
//! their handle alone.

use std::collections::BTreeMap;

use mop_ir::Name;

use crate::TypeIdx;

/// Name table for one registry.
///
/// `BTreeMap` keeps iteration deterministic (ordered by interned name).
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    by_name: BTreeMap<Name, TypeIdx>,
}

/// A name is already bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DuplicateName {
    pub name: Name,
    pub existing: TypeIdx,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `idx`. Fails if the name is already bound.
    pub fn register(&mut self, name: Name, idx: TypeIdx) -> Result<(), DuplicateName> {
        if let Some(&existing) = self.by_name.get(&name) {
            return Err(DuplicateName { name, existing });
        }
        self.by_name.insert(name, idx);
        Ok(())
    }

    #[inline]
    pub fn resolve(&self, name: Name) -> Option<TypeIdx> {
        self.by_name.get(&name).copied()
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.by_name.contains_key(&name)
    }

    /// Unbind a name. Used when rolling back a half-finished edit.
    pub(crate) fn remove(&mut self, name: Name) {
        self.by_name.remove(&name);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, TypeIdx)> + '_ {
        self.by_name.iter().map(|(&n, &i)| (n, i))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests;
