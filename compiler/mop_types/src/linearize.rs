//! Linearization: ancestry, role membership and member resolution.
//!
//! The method resolution order of a type is:
//!
//! ```text
//! [ty, parent, grandparent, ...]            class chain, nearest first
//!   ++ roles reachable from ty              breadth-first, consumption order
//!   ++ roles reachable from parent, ...     skipping roles already listed
//! ```
//!
//! Member lookup walks that order and the first match wins, so a class's own
//! members shadow inherited ones, and inherited class members shadow role
//! members.

use std::collections::VecDeque;

use mop_ir::Name;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{smallvec, SmallVec};

use crate::error::DeclareError;
use crate::predicate::Subject;
use crate::value::MemberDef;
use crate::{Registry, TypeIdx};

/// A member found by resolution, with the type that declared it.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedMember<'a> {
    /// The class or role that declares the member.
    pub owner: TypeIdx,
    pub member: &'a MemberDef,
}

/// A member name that several consumed roles provide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleConflict {
    pub member: Name,
    /// Distinct providing roles, in resolution order.
    pub roles: Vec<TypeIdx>,
}

type Providers = Vec<(Name, SmallVec<[TypeIdx; 2]>)>;

impl Registry {
    /// The class chain of `ty`: itself, then each parent in turn.
    ///
    /// A role's chain is just the role. Unknown handles yield an empty chain.
    pub fn class_chain(&self, ty: TypeIdx) -> Vec<TypeIdx> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut cursor = Some(ty);
        while let Some(idx) = cursor {
            let Some(desc) = self.get(idx) else { break };
            if !seen.insert(idx) {
                break;
            }
            chain.push(idx);
            cursor = desc.parent;
        }
        chain
    }

    /// Full resolution order of `ty`, starting with `ty` itself.
    pub fn ancestors(&self, ty: TypeIdx) -> Vec<TypeIdx> {
        let chain = self.class_chain(ty);
        let mut visited: FxHashSet<TypeIdx> = chain.iter().copied().collect();
        let mut order = chain.clone();
        let mut queue = VecDeque::new();

        for &class in &chain {
            self.enqueue_roles(class, &mut visited, &mut queue);
            while let Some(role) = queue.pop_front() {
                order.push(role);
                self.enqueue_roles(role, &mut visited, &mut queue);
            }
        }

        order
    }

    fn enqueue_roles(
        &self,
        ty: TypeIdx,
        visited: &mut FxHashSet<TypeIdx>,
        queue: &mut VecDeque<TypeIdx>,
    ) {
        if let Some(desc) = self.get(ty) {
            for &role in &desc.roles {
                if visited.insert(role) {
                    queue.push_back(role);
                }
            }
        }
    }

    /// Every role reachable from `ty` or its ancestor classes.
    ///
    /// Excludes `ty` itself.
    pub fn role_closure(&self, ty: TypeIdx) -> Vec<TypeIdx> {
        let chain_len = self.class_chain(ty).len();
        self.ancestors(ty).into_iter().skip(chain_len).collect()
    }

    /// `target` is in the class chain of the subject (reflexive).
    pub fn is_a<'a>(&self, subject: impl Into<Subject<'a>>, target: TypeIdx) -> bool {
        self.class_chain(subject.into().ty()).contains(&target)
    }

    /// `target` is a role the subject consumes, directly or through any
    /// role or ancestor class.
    ///
    /// Reflexive for roles only: a role does itself, a class never does.
    pub fn does<'a>(&self, subject: impl Into<Subject<'a>>, target: TypeIdx) -> bool {
        let ty = subject.into().ty();
        if !self.get(target).is_some_and(|d| d.is_role()) {
            return false;
        }
        if ty == target {
            return true;
        }
        self.role_closure(ty).contains(&target)
    }

    /// Resolve a member by interned name.
    pub fn resolve_member(&self, ty: TypeIdx, name: Name) -> Option<ResolvedMember<'_>> {
        self.ancestors(ty).into_iter().find_map(|owner| {
            let member = self.get(owner)?.member(name)?;
            Some(ResolvedMember { owner, member })
        })
    }

    /// Resolve a member by name string. Never interns.
    pub fn find_member(&self, ty: TypeIdx, name: &str) -> Option<ResolvedMember<'_>> {
        let name = self.interner().get(name)?;
        self.resolve_member(ty, name)
    }

    /// Check if `ty` has a member called `name` (Perl's `can`).
    pub fn can<'a>(&self, subject: impl Into<Subject<'a>>, name: &str) -> bool {
        self.find_member(subject.into().ty(), name).is_some()
    }

    /// The merged member set of `ty` in resolution order.
    ///
    /// Each name appears once, with the member that resolution picks.
    pub fn members(&self, ty: TypeIdx) -> Vec<ResolvedMember<'_>> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for owner in self.ancestors(ty) {
            let Some(desc) = self.get(owner) else {
                continue;
            };
            for member in desc.members() {
                if seen.insert(member.name) {
                    out.push(ResolvedMember { owner, member });
                }
            }
        }
        out
    }

    // === Role conflicts ===

    /// Which roles provide each member name of `role`.
    ///
    /// A role's own members shadow those of the roles it consumes. Names the
    /// role does not define itself may have several providers; that is left
    /// for the consuming class to settle.
    fn role_providers(&self, role: TypeIdx) -> Providers {
        let Some(desc) = self.get(role) else {
            return Vec::new();
        };

        let mut out: Providers = desc
            .members()
            .iter()
            .map(|m| (m.name, smallvec![role]))
            .collect();
        let own_len = out.len();
        let mut index: FxHashMap<Name, usize> =
            out.iter().enumerate().map(|(i, (n, _))| (*n, i)).collect();

        for &consumed in &desc.roles {
            merge_providers(&mut out, &mut index, own_len, self.role_providers(consumed));
        }
        out
    }

    /// Member names provided by more than one of the roles `class` consumes
    /// and not defined anywhere in its class chain.
    ///
    /// Always empty for roles; their conflicts surface in consuming classes.
    pub fn role_conflicts(&self, class: TypeIdx) -> Vec<RoleConflict> {
        let Some(desc) = self.get(class) else {
            return Vec::new();
        };
        if !desc.is_class() {
            return Vec::new();
        }

        let mut merged: Providers = Vec::new();
        let mut index = FxHashMap::default();
        for &role in &desc.roles {
            merge_providers(&mut merged, &mut index, 0, self.role_providers(role));
        }

        let chain = self.class_chain(class);
        let defined_in_chain = |name: Name| {
            chain
                .iter()
                .any(|&c| self.get(c).is_some_and(|d| d.has_member(name)))
        };

        merged
            .into_iter()
            .filter(|(name, roles)| roles.len() > 1 && !defined_in_chain(*name))
            .map(|(member, roles)| RoleConflict {
                member,
                roles: roles.into_vec(),
            })
            .collect()
    }

    pub(crate) fn check_role_conflicts(&self, class: TypeIdx) -> Result<(), DeclareError> {
        let Some(conflict) = self.role_conflicts(class).into_iter().next() else {
            return Ok(());
        };
        Err(DeclareError::ConflictingRoleMembers {
            class: self.display(class),
            member: self.interner().lookup(conflict.member).to_owned(),
            roles: conflict.roles.iter().map(|&r| self.display(r)).collect(),
        })
    }
}

/// Fold `incoming` into `out`. Entries before `locked` are own members and
/// are never extended.
fn merge_providers(
    out: &mut Providers,
    index: &mut FxHashMap<Name, usize>,
    locked: usize,
    incoming: Providers,
) {
    for (name, owners) in incoming {
        match index.get(&name).copied() {
            Some(i) if i < locked => {}
            Some(i) => {
                for owner in owners {
                    if !out[i].1.contains(&owner) {
                        out[i].1.push(owner);
                    }
                }
            }
            None => {
                index.insert(name, out.len());
                out.push((name, owners));
            }
        }
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;
