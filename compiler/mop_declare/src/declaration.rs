//! Declaration trees.
//!
//! Everything here is plain data. Names stay as written (`Cow`, `::Cow`,
//! `+Calf`) until [`crate::declare`] qualifies them against a scope.

use std::fmt;
use std::sync::Arc;

use mop_types::{
    AttributeDef, DispatchError, Instance, MemberDef, MemberKind, Registry, TypeIdx, TypeKind,
    Value,
};

/// A reference to a class, by written name or by handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    /// Qualified against the declaring scope, then resolved.
    Named(String),
    /// A handle from an earlier declaration (anonymous types included).
    Handle(TypeIdx),
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Named(name.to_owned())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::Named(name)
    }
}

impl From<TypeIdx> for TypeRef {
    fn from(idx: TypeIdx) -> Self {
        TypeRef::Handle(idx)
    }
}

/// A role in a `with` list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleRef {
    /// `with Milkable`: the role must already exist.
    Named(String),
    /// `with Milkable?`: declared as an empty tag role if absent.
    Tag(String),
    /// A role handle, usually an anonymous one.
    Handle(TypeIdx),
}

impl RoleRef {
    /// Parse a written role reference. A trailing `?` makes it a tag.
    pub fn parse(written: &str) -> Self {
        match written.strip_suffix('?') {
            Some(name) => RoleRef::Tag(name.to_owned()),
            None => RoleRef::Named(written.to_owned()),
        }
    }
}

impl From<&str> for RoleRef {
    fn from(written: &str) -> Self {
        RoleRef::parse(written)
    }
}

impl From<TypeIdx> for RoleRef {
    fn from(idx: TypeIdx) -> Self {
        RoleRef::Handle(idx)
    }
}

impl fmt::Display for RoleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRef::Named(name) => f.write_str(name),
            RoleRef::Tag(name) => write!(f, "{name}?"),
            RoleRef::Handle(idx) => write!(f, "{idx:?}"),
        }
    }
}

/// A member as written in a declaration; the name is interned on declare.
#[derive(Clone, Debug)]
pub struct MemberDecl {
    name: String,
    kind: MemberKind,
}

impl MemberDecl {
    /// `has name;`
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::with_attribute(name, AttributeDef::default())
    }

    /// `has name (required => 1);`
    pub fn required(name: impl Into<String>) -> Self {
        Self::with_attribute(
            name,
            AttributeDef {
                required: true,
                default: None,
            },
        )
    }

    /// `has name (default => value);`
    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self::with_attribute(
            name,
            AttributeDef {
                required: true,
                default: Some(default.into()),
            },
        )
    }

    fn with_attribute(name: impl Into<String>, attr: AttributeDef) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Attribute(attr),
        }
    }

    /// `method name { ... }`
    pub fn method<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: MemberKind::Method(Arc::new(body)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn to_member(&self, registry: &Registry) -> MemberDef {
        MemberDef {
            name: registry.intern(&self.name),
            kind: self.kind.clone(),
        }
    }
}

/// One `class` or `role` block, with the blocks nested inside it.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub(crate) kind: TypeKind,
    pub(crate) name: Option<String>,
    pub(crate) is_abstract: bool,
    pub(crate) parent: Option<TypeRef>,
    pub(crate) roles: Vec<RoleRef>,
    pub(crate) members: Vec<MemberDecl>,
    pub(crate) nested: Vec<Declaration>,
}

impl Declaration {
    fn new(kind: TypeKind, name: Option<String>) -> Self {
        Declaration {
            kind,
            name,
            is_abstract: false,
            parent: None,
            roles: Vec::new(),
            members: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// `class Name { ... }`
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, Some(name.into()))
    }

    /// `abstract class Name { ... }`
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::class(name).with_abstract(true)
    }

    /// `role Name { ... }`
    pub fn role(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Role, Some(name.into()))
    }

    /// `class { ... }` with no name.
    pub fn anonymous_class() -> Self {
        Self::new(TypeKind::Class, None)
    }

    /// `role { ... }` with no name.
    pub fn anonymous_role() -> Self {
        Self::new(TypeKind::Role, None)
    }

    /// Mark the class abstract (or not).
    ///
    /// Declaring an abstract role fails with `TypeMismatch`.
    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// `extends Parent`.
    pub fn with_parent(mut self, parent: impl Into<TypeRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add one entry to the `with` list.
    pub fn with_role(mut self, role: impl Into<RoleRef>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Add several `with` entries, in order.
    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoleRef>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    /// Add a block declared inside this one.
    pub fn with_nested(mut self, nested: Declaration) -> Self {
        self.nested.push(nested);
        self
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The name as written, `None` for anonymous blocks.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[inline]
    pub fn parent(&self) -> Option<&TypeRef> {
        self.parent.as_ref()
    }

    #[inline]
    pub fn roles(&self) -> &[RoleRef] {
        &self.roles
    }

    #[inline]
    pub fn members(&self) -> &[MemberDecl] {
        &self.members
    }

    #[inline]
    pub fn nested(&self) -> &[Declaration] {
        &self.nested
    }
}

#[cfg(test)]
mod tests;
