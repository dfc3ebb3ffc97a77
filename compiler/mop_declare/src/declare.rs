//! Turning declaration trees into registry entries.

use mop_ir::Scope;
use mop_types::{DeclareError, ExpectedKind, Registry, TypeIdx, TypeKind};

use crate::declaration::{Declaration, RoleRef, TypeRef};

/// Declare `decl` and everything nested in it.
///
/// Runs in order: the type itself with its members and parent, then nested
/// blocks, then the `with` list. Nested blocks may therefore declare roles
/// that the enclosing class consumes. All or nothing: on error the registry
/// is unchanged.
#[tracing::instrument(level = "debug", skip_all, fields(name = decl.name(), scope = scope.prefix()))]
pub fn declare(
    registry: &mut Registry,
    scope: &Scope,
    decl: &Declaration,
) -> Result<TypeIdx, DeclareError> {
    registry.transaction(|reg| declare_in(reg, scope, decl))
}

/// Declare several top-level blocks as one atomic unit.
///
/// Later blocks may refer to earlier ones by name.
#[tracing::instrument(level = "debug", skip_all, fields(count = decls.len()))]
pub fn declare_all(
    registry: &mut Registry,
    scope: &Scope,
    decls: &[Declaration],
) -> Result<Vec<TypeIdx>, DeclareError> {
    registry.transaction(|reg| {
        decls
            .iter()
            .map(|decl| declare_in(reg, scope, decl))
            .collect()
    })
}

fn declare_in(
    reg: &mut Registry,
    scope: &Scope,
    decl: &Declaration,
) -> Result<TypeIdx, DeclareError> {
    let name = decl.name.as_deref().map(|n| scope.qualify(n)).transpose()?;
    if decl.kind.is_role() && decl.is_abstract {
        // Only classes can be abstract.
        return Err(DeclareError::TypeMismatch {
            name: name.unwrap_or_else(|| "anonymous role".to_owned()),
            expected: ExpectedKind::Class,
        });
    }
    let parent = decl
        .parent
        .as_ref()
        .map(|p| resolve_parent(reg, scope, p))
        .transpose()?;
    let members = decl.members.iter().map(|m| m.to_member(reg)).collect();

    let idx = match (decl.kind, name.as_deref()) {
        (TypeKind::Class, Some(name)) => reg.declare_class(name, parent, decl.is_abstract, members)?,
        (TypeKind::Class, None) => reg.declare_anonymous_class(parent, decl.is_abstract, members)?,
        (TypeKind::Role, Some(name)) => reg.declare_role(name, members)?,
        (TypeKind::Role, None) => reg.declare_anonymous_role(members)?,
    };
    if let (TypeKind::Role, Some(parent)) = (decl.kind, parent) {
        // Always fails with RoleCannotExtend.
        reg.extend(idx, parent)?;
    }

    if !decl.nested.is_empty() {
        let inner = match decl.kind {
            TypeKind::Class => scope.enter_class(reg.type_name(idx).unwrap_or_default()),
            TypeKind::Role => scope.clone(),
        };
        for nested in &decl.nested {
            declare_in(reg, &inner, nested)?;
        }
    }

    for role in &decl.roles {
        match role {
            RoleRef::Named(written) => {
                let role = resolve_named(reg, scope, written)?;
                reg.consume(idx, role)?;
            }
            RoleRef::Tag(written) => {
                reg.tag(idx, &scope.qualify(written)?)?;
            }
            RoleRef::Handle(role) => reg.consume(idx, *role)?,
        }
    }

    tracing::trace!(?idx, roles = decl.roles.len(), nested = decl.nested.len(), "declared block");
    Ok(idx)
}

fn resolve_parent(reg: &Registry, scope: &Scope, parent: &TypeRef) -> Result<TypeIdx, DeclareError> {
    let idx = match parent {
        TypeRef::Named(written) => resolve_named(reg, scope, written)?,
        TypeRef::Handle(idx) => *idx,
    };
    if reg.get(idx).is_some_and(|d| d.is_role()) {
        return Err(DeclareError::TypeMismatch {
            name: reg.type_name(idx).unwrap_or_default().to_owned(),
            expected: ExpectedKind::Class,
        });
    }
    Ok(idx)
}

fn resolve_named(reg: &Registry, scope: &Scope, written: &str) -> Result<TypeIdx, DeclareError> {
    let qualified = scope.qualify(written)?;
    reg.resolve(&qualified)
        .ok_or(DeclareError::UnknownType { name: qualified })
}
