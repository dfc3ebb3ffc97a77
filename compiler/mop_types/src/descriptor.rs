//! Type descriptors: the nodes of the class/role graph.

use std::sync::atomic::{AtomicBool, Ordering};

use mop_ir::Name;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::flags::TypeFlags;
use crate::value::MemberDef;
use crate::TypeIdx;

/// Class or role.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Instantiable (unless abstract), single inheritance.
    Class,
    /// Non-instantiable bundle of members, consumable by classes and roles.
    Role,
}

impl TypeKind {
    #[inline]
    pub fn is_class(self) -> bool {
        matches!(self, Self::Class)
    }

    #[inline]
    pub fn is_role(self) -> bool {
        matches!(self, Self::Role)
    }
}

/// A registered class or role.
///
/// Structural fields are only written by `Registry` before the descriptor
/// is sealed. The seal flag is atomic so instantiation can seal through a
/// shared reference.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    /// Qualified name (generated for anonymous types).
    pub(crate) name: Name,

    /// Handle of this descriptor.
    pub(crate) idx: TypeIdx,

    pub(crate) kind: TypeKind,

    pub(crate) flags: TypeFlags,

    /// Parent class. Always `None` for roles.
    pub(crate) parent: Option<TypeIdx>,

    /// Consumed roles in consumption order, without duplicates.
    pub(crate) roles: SmallVec<[TypeIdx; 4]>,

    /// Own members in declaration order.
    pub(crate) members: Vec<MemberDef>,

    /// Member name -> position in `members`.
    member_index: FxHashMap<Name, usize>,

    pub(crate) seal: SealState,
}

impl TypeDescriptor {
    pub(crate) fn new(
        name: Name,
        idx: TypeIdx,
        kind: TypeKind,
        flags: TypeFlags,
        parent: Option<TypeIdx>,
        members: Vec<MemberDef>,
    ) -> Self {
        let member_index = members
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name, i))
            .collect();
        Self {
            name,
            idx,
            kind,
            flags,
            parent,
            roles: SmallVec::new(),
            members,
            member_index,
            seal: SealState::default(),
        }
    }

    /// Qualified name (generated for anonymous types).
    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    #[inline]
    pub fn idx(&self) -> TypeIdx {
        self.idx
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    #[inline]
    pub fn is_class(&self) -> bool {
        self.kind.is_class()
    }

    #[inline]
    pub fn is_role(&self) -> bool {
        self.kind.is_role()
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeFlags::ABSTRACT)
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.flags.contains(TypeFlags::ANONYMOUS)
    }

    /// Parent class, if any.
    #[inline]
    pub fn parent(&self) -> Option<TypeIdx> {
        self.parent
    }

    /// Directly consumed roles, in consumption order.
    #[inline]
    pub fn roles(&self) -> &[TypeIdx] {
        &self.roles
    }

    /// Own members in declaration order.
    #[inline]
    pub fn members(&self) -> &[MemberDef] {
        &self.members
    }

    /// Own member by name (inherited members are not consulted).
    pub fn member(&self, name: Name) -> Option<&MemberDef> {
        self.member_index
            .get(&name)
            .and_then(|&i| self.members.get(i))
    }

    #[inline]
    pub fn has_member(&self, name: Name) -> bool {
        self.member_index.contains_key(&name)
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.seal.is_sealed()
    }

    pub(crate) fn push_member(&mut self, member: MemberDef) {
        self.member_index.insert(member.name, self.members.len());
        self.members.push(member);
    }

    pub(crate) fn pop_member(&mut self) {
        if let Some(member) = self.members.pop() {
            self.member_index.remove(&member.name);
        }
    }
}

/// One-way seal flag.
#[derive(Debug, Default)]
pub(crate) struct SealState(AtomicBool);

impl SealState {
    #[inline]
    pub(crate) fn is_sealed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Seal; returns `true` if this call did the sealing.
    #[inline]
    pub(crate) fn seal(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}

impl Clone for SealState {
    fn clone(&self) -> Self {
        SealState(AtomicBool::new(self.is_sealed()))
    }
}
