//! The class/role registry.
//!
//! Owns every descriptor declared in one scope, the name table that maps
//! qualified names to handles, and the interner both share.
//!
//! # Architecture
//!
//! ```text
//! Registry
//!     ├── types: Vec<TypeDescriptor>   (arena, indexed by TypeIdx)
//!     ├── symbols: SymbolTable         (named types only)
//!     └── interner: SharedInterner     (qualified + member names)
//! ```
//!
//! # Edits
//!
//! Every structural edit validates before it writes. A failing call leaves
//! the registry exactly as it was. Multi-step blocks that must be all or
//! nothing go through [`Registry::transaction`].
//!
//! Linearization, instantiation and predicates are further `impl Registry`
//! blocks in their own modules.

mod symbols;

use mop_ir::{Name, NameError, SharedInterner, SEPARATOR};
use rustc_hash::FxHashSet;

pub use symbols::{DuplicateName, SymbolTable};

use crate::config::RegistryConfig;
use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::{DeclareError, ExpectedKind};
use crate::flags::TypeFlags;
use crate::value::MemberDef;
use crate::TypeIdx;

/// Registry of classes and roles for one declaration scope.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    interner: SharedInterner,

    /// All descriptors, indexed by `TypeIdx`.
    types: Vec<TypeDescriptor>,

    symbols: SymbolTable,

    config: RegistryConfig,

    /// Anonymous descriptors declared so far (for generated names).
    anon_count: u32,
}

impl Registry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_interner(SharedInterner::new(), config)
    }

    /// Create an empty registry sharing an existing interner.
    pub fn with_interner(interner: SharedInterner, config: RegistryConfig) -> Self {
        Self {
            interner,
            types: Vec::new(),
            symbols: SymbolTable::new(),
            config,
            anon_count: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Intern a member or type name.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    // === Lookup ===

    /// Look up a named type by its qualified name.
    ///
    /// Anonymous types are never found here.
    pub fn resolve(&self, name: &str) -> Option<TypeIdx> {
        let name = self.interner.get(name)?;
        self.symbols.resolve(name)
    }

    /// Look up a named type by interned name.
    #[inline]
    pub fn resolve_name(&self, name: Name) -> Option<TypeIdx> {
        self.symbols.resolve(name)
    }

    /// Get a descriptor by handle.
    #[inline]
    pub fn get(&self, idx: TypeIdx) -> Option<&TypeDescriptor> {
        self.types.get(idx.index())
    }

    /// Qualified (or generated) name of a type.
    pub fn type_name(&self, idx: TypeIdx) -> Option<&'static str> {
        self.get(idx).map(|d| self.interner.lookup(d.name))
    }

    /// Name for diagnostics; falls back to the handle for foreign indices.
    pub(crate) fn display(&self, idx: TypeIdx) -> String {
        self.type_name(idx)
            .map_or_else(|| format!("{idx:?}"), str::to_owned)
    }

    /// The name table.
    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Iterate over all descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    /// Number of descriptors, anonymous ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // === Declaration ===

    /// Declare a named class.
    #[tracing::instrument(level = "debug", skip_all, fields(name = name))]
    pub fn declare_class(
        &mut self,
        name: &str,
        parent: Option<TypeIdx>,
        is_abstract: bool,
        members: Vec<MemberDef>,
    ) -> Result<TypeIdx, DeclareError> {
        let flags = abstract_flag(is_abstract);
        self.insert(Some(name), TypeKind::Class, flags, parent, members)
    }

    /// Declare a named role.
    #[tracing::instrument(level = "debug", skip_all, fields(name = name))]
    pub fn declare_role(
        &mut self,
        name: &str,
        members: Vec<MemberDef>,
    ) -> Result<TypeIdx, DeclareError> {
        self.insert(Some(name), TypeKind::Role, TypeFlags::empty(), None, members)
    }

    /// Declare a class reachable only through the returned handle.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn declare_anonymous_class(
        &mut self,
        parent: Option<TypeIdx>,
        is_abstract: bool,
        members: Vec<MemberDef>,
    ) -> Result<TypeIdx, DeclareError> {
        let flags = abstract_flag(is_abstract) | TypeFlags::ANONYMOUS;
        self.insert(None, TypeKind::Class, flags, parent, members)
    }

    /// Declare a role reachable only through the returned handle.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn declare_anonymous_role(
        &mut self,
        members: Vec<MemberDef>,
    ) -> Result<TypeIdx, DeclareError> {
        self.insert(None, TypeKind::Role, TypeFlags::ANONYMOUS, None, members)
    }

    fn insert(
        &mut self,
        name: Option<&str>,
        kind: TypeKind,
        flags: TypeFlags,
        parent: Option<TypeIdx>,
        members: Vec<MemberDef>,
    ) -> Result<TypeIdx, DeclareError> {
        let (name, flags) = match name {
            Some(qualified) => {
                self.check_not_reserved(qualified)?;
                (self.interner.intern(qualified), flags)
            }
            None => {
                let kind_label = match kind {
                    TypeKind::Class => "Class",
                    TypeKind::Role => "Role",
                };
                let generated = format!(
                    "{}{SEPARATOR}{kind_label}{}",
                    self.config.anon_prefix,
                    self.anon_count + 1
                );
                (self.interner.intern(&generated), flags | TypeFlags::ANONYMOUS)
            }
        };

        let mut seen = FxHashSet::default();
        for member in &members {
            if !seen.insert(member.name) {
                return Err(DeclareError::DuplicateMember {
                    name: self.interner.lookup(name).to_owned(),
                    member: self.interner.lookup(member.name).to_owned(),
                });
            }
        }

        if let Some(parent) = parent {
            match self.get(parent) {
                None => return Err(self.unknown(parent)),
                Some(p) if p.is_role() => {
                    return Err(DeclareError::TypeMismatch {
                        name: self.display(parent),
                        expected: ExpectedKind::Class,
                    });
                }
                Some(_) => {}
            }
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "descriptor count stays far below u32::MAX"
        )]
        let idx = TypeIdx::from_raw(self.types.len() as u32);

        if flags.is_named() {
            self.symbols
                .register(name, idx)
                .map_err(|dup| DeclareError::DuplicateName {
                    name: self.interner.lookup(dup.name).to_owned(),
                })?;
        } else {
            self.anon_count += 1;
        }
        self.types.push(TypeDescriptor::new(
            name, idx, kind, flags, parent, members,
        ));

        tracing::debug!(
            name = self.interner.lookup(name),
            ?idx,
            ?kind,
            ?parent,
            "declared type"
        );
        Ok(idx)
    }

    /// Generated anonymous names live under `{anon_prefix}::`; declared names
    /// may not.
    fn check_not_reserved(&self, qualified: &str) -> Result<(), DeclareError> {
        let prefix = self.config.anon_prefix.as_str();
        let reserved = qualified
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(SEPARATOR));
        if reserved {
            return Err(NameError::Reserved {
                written: qualified.to_owned(),
                prefix: prefix.to_owned(),
            }
            .into());
        }
        Ok(())
    }

    /// Drop the most recently declared descriptor.
    fn discard_last(&mut self) {
        if let Some(desc) = self.types.pop() {
            if desc.flags.is_named() {
                self.symbols.remove(desc.name);
            } else {
                self.anon_count = self.anon_count.saturating_sub(1);
            }
        }
    }

    // === Structural edits ===

    /// Make `parent` the parent class of `class`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn extend(&mut self, class: TypeIdx, parent: TypeIdx) -> Result<(), DeclareError> {
        let child = self.get(class).ok_or_else(|| self.unknown(class))?;
        if child.is_role() {
            return Err(DeclareError::RoleCannotExtend {
                role: self.display(class),
                parent: self.display(parent),
            });
        }
        if child.is_sealed() {
            return Err(self.sealed(class));
        }
        if let Some(existing) = child.parent {
            return Err(DeclareError::MultipleInheritance {
                class: self.display(class),
                existing: self.display(existing),
                requested: self.display(parent),
            });
        }

        let parent_desc = self.get(parent).ok_or_else(|| self.unknown(parent))?;
        if parent_desc.is_role() {
            return Err(DeclareError::TypeMismatch {
                name: self.display(parent),
                expected: ExpectedKind::Class,
            });
        }
        if self.class_chain(parent).contains(&class) {
            return Err(DeclareError::CyclicInheritance {
                class: self.display(class),
                parent: self.display(parent),
            });
        }

        self.types[class.index()].parent = Some(parent);
        tracing::trace!(?class, ?parent, "added extends edge");
        Ok(())
    }

    /// Add `role` to the roles consumed by `ty`.
    ///
    /// Consuming a role that is already consumed is a no-op.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn consume(&mut self, ty: TypeIdx, role: TypeIdx) -> Result<(), DeclareError> {
        let consumer = self.get(ty).ok_or_else(|| self.unknown(ty))?;
        let role_desc = self.get(role).ok_or_else(|| self.unknown(role))?;

        if ty == role {
            return Err(DeclareError::SelfConsumption {
                name: self.display(ty),
            });
        }
        if !role_desc.is_role() {
            return Err(DeclareError::TypeMismatch {
                name: self.display(role),
                expected: ExpectedKind::Role,
            });
        }
        if consumer.is_sealed() {
            return Err(self.sealed(ty));
        }
        if consumer.roles.contains(&role) {
            tracing::trace!(?ty, ?role, "role already consumed");
            return Ok(());
        }
        if consumer.is_role() && self.role_closure(role).contains(&ty) {
            return Err(DeclareError::CyclicRole {
                consumer: self.display(ty),
                role: self.display(role),
            });
        }

        self.types[ty.index()].roles.push(role);
        if let Err(err) = self.check_consumers_of(ty) {
            self.types[ty.index()].roles.pop();
            return Err(err);
        }

        tracing::trace!(?ty, ?role, "added with edge");
        Ok(())
    }

    /// `with Role?`: consume the role named `role_name`, declaring it as an
    /// empty role first if no type has that name.
    ///
    /// Returns the role's handle. Idempotent.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn tag(&mut self, ty: TypeIdx, role_name: &str) -> Result<TypeIdx, DeclareError> {
        if let Some(role) = self.resolve(role_name) {
            if !self.get(role).is_some_and(TypeDescriptor::is_role) {
                return Err(DeclareError::TypeMismatch {
                    name: role_name.to_owned(),
                    expected: ExpectedKind::Role,
                });
            }
            self.consume(ty, role)?;
            return Ok(role);
        }

        let consumer = self.get(ty).ok_or_else(|| self.unknown(ty))?;
        if consumer.is_sealed() {
            return Err(self.sealed(ty));
        }

        let role = self.insert(
            Some(role_name),
            TypeKind::Role,
            TypeFlags::TAG,
            None,
            Vec::new(),
        )?;
        if let Err(err) = self.consume(ty, role) {
            self.discard_last();
            return Err(err);
        }
        Ok(role)
    }

    /// Add a member to an unsealed type.
    #[tracing::instrument(level = "debug", skip(self, member), fields(member = ?member.name))]
    pub fn add_member(&mut self, ty: TypeIdx, member: MemberDef) -> Result<(), DeclareError> {
        let desc = self.get(ty).ok_or_else(|| self.unknown(ty))?;
        if desc.is_sealed() {
            return Err(self.sealed(ty));
        }
        if desc.has_member(member.name) {
            return Err(DeclareError::DuplicateMember {
                name: self.display(ty),
                member: self.interner.lookup(member.name).to_owned(),
            });
        }

        self.types[ty.index()].push_member(member);
        if let Err(err) = self.check_consumers_of(ty) {
            self.types[ty.index()].pop_member();
            return Err(err);
        }
        Ok(())
    }

    /// Re-run role conflict checks for every class an edit to `ty` can affect.
    fn check_consumers_of(&self, ty: TypeIdx) -> Result<(), DeclareError> {
        let Some(desc) = self.get(ty) else {
            return Ok(());
        };
        if desc.is_class() {
            return self.check_role_conflicts(ty);
        }
        for class in self.types.iter().filter(|d| d.is_class()) {
            if self.role_closure(class.idx).contains(&ty) {
                self.check_role_conflicts(class.idx)?;
            }
        }
        Ok(())
    }

    // === Sealing ===

    /// Seal `ty`, its ancestor classes and every role they reach.
    ///
    /// Returns how many descriptors were newly sealed.
    pub fn seal(&self, ty: TypeIdx) -> usize {
        let mut sealed = 0;
        for idx in self.ancestors(ty) {
            if let Some(desc) = self.get(idx) {
                if desc.seal.seal() {
                    tracing::debug!(name = self.interner.lookup(desc.name), "sealed type");
                    sealed += 1;
                }
            }
        }
        sealed
    }

    /// Seal every descriptor.
    pub fn seal_all(&self) -> usize {
        self.types.iter().filter(|d| d.seal.seal()).count()
    }

    // === Transactions ===

    /// Run a multi-step edit atomically.
    ///
    /// `f` works on a scratch copy; the copy replaces `self` only if `f`
    /// succeeds. Interned strings are not rolled back (they are harmless).
    pub fn transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut Registry) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut scratch = self.clone();
        let out = f(&mut scratch)?;
        *self = scratch;
        Ok(out)
    }

    // === Error helpers ===

    fn unknown(&self, idx: TypeIdx) -> DeclareError {
        DeclareError::UnknownType {
            name: self.display(idx),
        }
    }

    fn sealed(&self, idx: TypeIdx) -> DeclareError {
        DeclareError::SealedType {
            name: self.display(idx),
        }
    }
}

fn abstract_flag(is_abstract: bool) -> TypeFlags {
    if is_abstract {
        TypeFlags::ABSTRACT
    } else {
        TypeFlags::empty()
    }
}
