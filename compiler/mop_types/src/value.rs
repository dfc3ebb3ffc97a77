//! Field values and member definitions.

use std::fmt;
use std::sync::Arc;

use mop_ir::Name;

use crate::error::DispatchError;
use crate::instance::Instance;

/// A dynamically typed field value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Vec<Value>),
    Object(Arc<Instance>),
}

impl Value {
    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the instance payload, if this is an object.
    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Instance> for Value {
    fn from(obj: Instance) -> Self {
        Value::Object(Arc::new(obj))
    }
}

/// Body of a method member.
///
/// Receives the invocant and the call arguments.
pub type MethodFn = Arc<dyn Fn(&Instance, &[Value]) -> Result<Value, DispatchError> + Send + Sync>;

/// A named member of a class or role.
#[derive(Clone, Debug)]
pub struct MemberDef {
    /// Member name.
    pub name: Name,

    /// Attribute or method.
    pub kind: MemberKind,
}

/// What a member is.
#[derive(Clone)]
pub enum MemberKind {
    /// A stored attribute, readable through an accessor of the same name.
    Attribute(AttributeDef),

    /// A callable method.
    Method(MethodFn),
}

/// Construction rules for an attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeDef {
    /// Construction fails when neither a value nor a default is available.
    pub required: bool,

    /// Value used when construction supplies none.
    pub default: Option<Value>,
}

impl fmt::Debug for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Attribute(attr) => f.debug_tuple("Attribute").field(attr).finish(),
            MemberKind::Method(_) => f.write_str("Method(..)"),
        }
    }
}

impl MemberDef {
    /// An optional attribute with no default.
    pub fn attribute(name: Name) -> Self {
        Self {
            name,
            kind: MemberKind::Attribute(AttributeDef::default()),
        }
    }

    /// A required attribute.
    pub fn required(name: Name) -> Self {
        Self {
            name,
            kind: MemberKind::Attribute(AttributeDef {
                required: true,
                default: None,
            }),
        }
    }

    /// A required attribute that falls back to `default`.
    ///
    /// Never reported missing.
    pub fn with_default(name: Name, default: impl Into<Value>) -> Self {
        Self {
            name,
            kind: MemberKind::Attribute(AttributeDef {
                required: true,
                default: Some(default.into()),
            }),
        }
    }

    /// A method.
    pub fn method<F>(name: Name, body: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value, DispatchError> + Send + Sync + 'static,
    {
        Self {
            name,
            kind: MemberKind::Method(Arc::new(body)),
        }
    }

    /// Check if this member is an attribute.
    #[inline]
    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, MemberKind::Attribute(_))
    }

    /// Check if this member is a method.
    #[inline]
    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method(_))
    }

    /// The attribute rules, if this is an attribute.
    pub fn as_attribute(&self) -> Option<&AttributeDef> {
        match &self.kind {
            MemberKind::Attribute(attr) => Some(attr),
            MemberKind::Method(_) => None,
        }
    }
}
