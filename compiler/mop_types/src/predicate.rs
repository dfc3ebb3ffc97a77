//! Type-check predicates.
//!
//! The `is_<Class>` / `does_<Role>` helpers a declaration generates are
//! values here: a `Predicate` pairs a target handle with the test to run.
//! The same predicate works whether its target came from `resolve(name)` or
//! from an anonymous declaration.

use std::collections::BTreeMap;

use mop_ir::local_name;

use crate::instance::Instance;
use crate::{Registry, TypeIdx};

/// What a predicate (or a type query) is asked about.
#[derive(Clone, Copy, Debug)]
pub enum Subject<'a> {
    /// An object; its class is tested.
    Instance(&'a Instance),
    /// A type handle, tested directly.
    Type(TypeIdx),
}

impl Subject<'_> {
    /// The type under test.
    #[inline]
    pub fn ty(self) -> TypeIdx {
        match self {
            Subject::Instance(obj) => obj.ty(),
            Subject::Type(ty) => ty,
        }
    }
}

impl<'a> From<&'a Instance> for Subject<'a> {
    fn from(obj: &'a Instance) -> Self {
        Subject::Instance(obj)
    }
}

impl From<TypeIdx> for Subject<'_> {
    fn from(ty: TypeIdx) -> Self {
        Subject::Type(ty)
    }
}

/// Which query a predicate runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Test {
    /// Class ancestry (`is_a`).
    IsA,
    /// Role membership (`does`).
    Does,
}

/// A boolean type check against a fixed target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Predicate {
    target: TypeIdx,
    test: Test,
}

impl Predicate {
    /// `is_a(_, target)`.
    pub fn is_a(target: TypeIdx) -> Self {
        Self {
            target,
            test: Test::IsA,
        }
    }

    /// `does(_, target)`.
    pub fn does(target: TypeIdx) -> Self {
        Self {
            target,
            test: Test::Does,
        }
    }

    #[inline]
    pub fn target(self) -> TypeIdx {
        self.target
    }

    #[inline]
    pub fn test(self) -> Test {
        self.test
    }

    /// Run the check.
    pub fn check<'a>(self, registry: &Registry, subject: impl Into<Subject<'a>>) -> bool {
        match self.test {
            Test::IsA => registry.is_a(subject, self.target),
            Test::Does => registry.does(subject, self.target),
        }
    }
}

impl Registry {
    /// The natural predicate for `ty`: `is_a` for classes, `does` for roles.
    pub fn predicate_for(&self, ty: TypeIdx) -> Option<Predicate> {
        let desc = self.get(ty)?;
        Some(if desc.is_role() {
            Predicate::does(ty)
        } else {
            Predicate::is_a(ty)
        })
    }

    /// The natural predicate for the type named `name`.
    pub fn predicate_named(&self, name: &str) -> Option<Predicate> {
        self.predicate_for(self.resolve(name)?)
    }
}

/// Generated predicate helpers, keyed by helper name.
///
/// Every named class `Pkg::Cow` yields `is_Cow`; every named role
/// `Pkg::Milkable` yields `does_Milkable`. Anonymous types get no helper.
/// When two types would produce the same helper name, neither is kept.
#[derive(Clone, Debug, Default)]
pub struct PredicateTable {
    by_name: BTreeMap<String, Predicate>,
}

impl PredicateTable {
    /// Build the helpers for every named type in `registry`.
    pub fn build(registry: &Registry) -> Self {
        let mut by_name = BTreeMap::new();
        let mut ambiguous = Vec::new();

        for desc in registry.iter().filter(|d| !d.is_anonymous()) {
            let Some(qualified) = registry.type_name(desc.idx()) else {
                continue;
            };
            let (helper, predicate) = if desc.is_role() {
                (format!("does_{}", local_name(qualified)), Predicate::does(desc.idx()))
            } else {
                (format!("is_{}", local_name(qualified)), Predicate::is_a(desc.idx()))
            };

            if by_name.contains_key(&helper) {
                ambiguous.push(helper);
            } else {
                by_name.insert(helper, predicate);
            }
        }

        for helper in ambiguous {
            if by_name.remove(&helper).is_some() {
                tracing::warn!(helper = helper.as_str(), "predicate helper is ambiguous; not generated");
            }
        }

        Self { by_name }
    }

    pub fn get(&self, helper: &str) -> Option<Predicate> {
        self.by_name.get(helper).copied()
    }

    /// Run the helper `helper` against `subject`.
    ///
    /// `None` if there is no such helper.
    pub fn check<'a>(
        &self,
        registry: &Registry,
        helper: &str,
        subject: impl Into<Subject<'a>>,
    ) -> Option<bool> {
        Some(self.get(helper)?.check(registry, subject))
    }

    /// Helper names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
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
