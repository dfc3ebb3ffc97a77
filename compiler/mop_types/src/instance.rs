//! Instance factory and method dispatch.
//!
//! `Registry::instantiate` is the only way to create an `Instance`. It takes
//! `&self`: once a registry is frozen, any number of threads may construct
//! instances concurrently.

use std::fmt;

use mop_ir::{Name, SharedInterner};
use rustc_hash::FxHashMap;

use crate::error::{DispatchError, InstantiationError};
use crate::predicate::Subject;
use crate::value::{AttributeDef, MemberKind, Value};
use crate::{Registry, TypeIdx};

/// An object of a concrete class.
#[derive(Clone)]
pub struct Instance {
    ty: TypeIdx,
    fields: FxHashMap<Name, Value>,
    interner: SharedInterner,
}

impl Instance {
    /// The class this is an instance of.
    #[inline]
    pub fn ty(&self) -> TypeIdx {
        self.ty
    }

    /// Read an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = self.interner.get(name)?;
        self.fields.get(&name)
    }

    /// Read an attribute value by interned name.
    #[inline]
    pub fn field(&self, name: Name) -> Option<&Value> {
        self.fields.get(&name)
    }

    /// Attribute names and values, in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(&name, value)| (self.interner.lookup(name), value))
    }

    /// Number of stored attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.fields == other.fields
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.fields().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_struct("Instance")
            .field("ty", &self.ty)
            .field("fields", &fields)
            .finish()
    }
}

impl Registry {
    /// Construct an instance of `ty` from `(attribute, value)` pairs.
    ///
    /// Attributes not supplied take their default. Every required attribute
    /// still missing is reported in one error, in resolution order. On
    /// success the class, its ancestors and all their roles are sealed.
    #[tracing::instrument(level = "trace", skip(self, fields))]
    pub fn instantiate<I, K>(&self, ty: TypeIdx, fields: I) -> Result<Instance, InstantiationError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let desc = self
            .get(ty)
            .ok_or(InstantiationError::UnknownType { raw: ty.raw() })?;
        if desc.is_role() {
            return Err(InstantiationError::RoleInstantiation {
                name: self.display(ty),
            });
        }
        if desc.is_abstract() {
            return Err(InstantiationError::AbstractInstantiation {
                name: self.display(ty),
            });
        }

        let attributes: Vec<(Name, &AttributeDef)> = self
            .members(ty)
            .into_iter()
            .filter_map(|r| Some((r.member.name, r.member.as_attribute()?)))
            .collect();

        let mut values = FxHashMap::default();
        let mut unknown = Vec::new();
        for (key, value) in fields {
            let key = key.as_ref();
            match self.interner().get(key) {
                Some(name) if attributes.iter().any(|(n, _)| *n == name) => {
                    values.insert(name, value);
                }
                _ => unknown.push(key.to_owned()),
            }
        }

        if !unknown.is_empty() {
            if self.config().reject_unknown_fields {
                return Err(InstantiationError::UnknownAttribute {
                    name: self.display(ty),
                    unknown,
                });
            }
            tracing::debug!(?unknown, "dropping unknown construction fields");
        }

        let mut missing = Vec::new();
        for (name, attr) in &attributes {
            if values.contains_key(name) {
                continue;
            }
            if let Some(default) = &attr.default {
                values.insert(*name, default.clone());
            } else if attr.required {
                missing.push(self.interner().lookup(*name).to_owned());
            }
        }
        if !missing.is_empty() {
            return Err(InstantiationError::MissingAttribute {
                name: self.display(ty),
                missing,
            });
        }

        self.seal(ty);
        Ok(Instance {
            ty,
            fields: values,
            interner: self.interner().clone(),
        })
    }

    /// Call `method` on `instance`.
    ///
    /// Methods run their body. Attributes act as read-only accessors and
    /// return the stored value (`Nil` if unset).
    #[tracing::instrument(level = "trace", skip(self, instance, args), fields(ty = ?instance.ty))]
    pub fn invoke(
        &self,
        instance: &Instance,
        method: &str,
        args: &[Value],
    ) -> Result<Value, DispatchError> {
        let no_such_method = || DispatchError::NoSuchMethod {
            type_name: self.display(instance.ty),
            method: method.to_owned(),
        };

        let resolved = self
            .find_member(instance.ty, method)
            .ok_or_else(no_such_method)?;

        match &resolved.member.kind {
            MemberKind::Method(body) => body(instance, args),
            MemberKind::Attribute(_) if !args.is_empty() => Err(DispatchError::ReadOnlyAttribute {
                attribute: method.to_owned(),
            }),
            MemberKind::Attribute(_) => Ok(instance
                .field(resolved.member.name)
                .cloned()
                .unwrap_or_default()),
        }
    }

    /// Which type `subject`'s member `name` resolves to, if any.
    pub fn member_owner<'a>(&self, subject: impl Into<Subject<'a>>, name: &str) -> Option<TypeIdx> {
        self.find_member(subject.into().ty(), name).map(|r| r.owner)
    }
}
