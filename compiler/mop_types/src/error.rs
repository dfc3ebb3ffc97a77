//! Registry errors.
//!
//! Three families, by when they can happen:
//! - `DeclareError`: structural edits (declare, extend, consume, tag). Fatal
//!   to the declaration block that caused them.
//! - `InstantiationError`: construction requests. Recoverable; a service can
//!   reject one bad request and keep going.
//! - `DispatchError`: method calls on instances.
//!
//! Names are rendered to strings when the error is built so errors can
//! outlive the registry and print without an interner.

use std::fmt;

use mop_ir::NameError;
use thiserror::Error;

/// Stable codes for every registry error.
///
/// Format: E#### where the first digit is the phase:
/// - E1xxx: declaration errors
/// - E2xxx: instantiation errors
/// - E3xxx: dispatch errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Name registered twice
    E1001,
    /// Role consumption would create a cycle
    E1002,
    /// Type consumes itself
    E1003,
    /// Class already has a parent
    E1004,
    /// Role used as the subject of `extends`
    E1005,
    /// Wrong kind of type (class where a role is needed or vice versa)
    E1006,
    /// Two consumed roles provide the same member
    E1007,
    /// Structural edit after seal
    E1008,
    /// Inheritance would create a cycle
    E1009,
    /// Member declared twice on one type
    E1010,
    /// Unknown type handle or name
    E1011,
    /// Name cannot be qualified
    E1012,

    /// Abstract class instantiated
    E2001,
    /// Role instantiated
    E2002,
    /// Required attributes missing
    E2003,
    /// Fields that name no attribute
    E2004,
    /// Unknown type handle
    E2005,

    /// No method or accessor by that name
    E3001,
    /// Arguments passed to a read-only accessor
    E3002,
    /// Method body reported failure
    E3003,
}

impl ErrorCode {
    /// The code as a string (`"E1001"`).
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            ErrorCode::E1012 => "E1012",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
        }
    }

    /// Check if this is a declaration-time error.
    #[inline]
    pub fn is_declaration_error(self) -> bool {
        self.as_str().starts_with("E1")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind expected by an edge that got the other kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExpectedKind {
    Class,
    Role,
}

impl fmt::Display for ExpectedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedKind::Class => f.write_str("class"),
            ExpectedKind::Role => f.write_str("role"),
        }
    }
}

/// Errors raised by structural edits to the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeclareError {
    #[error("type `{name}` is already declared")]
    DuplicateName { name: String },

    #[error("role `{role}` already consumes `{consumer}`; consuming it back would form a cycle")]
    CyclicRole { consumer: String, role: String },

    #[error("`{name}` cannot consume itself")]
    SelfConsumption { name: String },

    #[error("class `{class}` already extends `{existing}`; cannot also extend `{requested}`")]
    MultipleInheritance {
        class: String,
        existing: String,
        requested: String,
    },

    #[error("`{role}` is a role; roles cannot extend `{parent}`")]
    RoleCannotExtend { role: String, parent: String },

    #[error("`{name}` is not a {expected}")]
    TypeMismatch { name: String, expected: ExpectedKind },

    #[error("class `{class}` gets member `{member}` from several roles ({}); override it in the class", .roles.join(", "))]
    ConflictingRoleMembers {
        class: String,
        member: String,
        roles: Vec<String>,
    },

    #[error("`{name}` is sealed; its structure cannot change after instantiation")]
    SealedType { name: String },

    #[error("class `{class}` cannot extend `{parent}`: `{parent}` already inherits from it")]
    CyclicInheritance { class: String, parent: String },

    #[error("member `{member}` is declared twice on `{name}`")]
    DuplicateMember { name: String, member: String },

    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    #[error(transparent)]
    InvalidName(#[from] NameError),
}

impl DeclareError {
    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DeclareError::DuplicateName { .. } => ErrorCode::E1001,
            DeclareError::CyclicRole { .. } => ErrorCode::E1002,
            DeclareError::SelfConsumption { .. } => ErrorCode::E1003,
            DeclareError::MultipleInheritance { .. } => ErrorCode::E1004,
            DeclareError::RoleCannotExtend { .. } => ErrorCode::E1005,
            DeclareError::TypeMismatch { .. } => ErrorCode::E1006,
            DeclareError::ConflictingRoleMembers { .. } => ErrorCode::E1007,
            DeclareError::SealedType { .. } => ErrorCode::E1008,
            DeclareError::CyclicInheritance { .. } => ErrorCode::E1009,
            DeclareError::DuplicateMember { .. } => ErrorCode::E1010,
            DeclareError::UnknownType { .. } => ErrorCode::E1011,
            DeclareError::InvalidName(_) => ErrorCode::E1012,
        }
    }
}

/// Errors raised by `Registry::instantiate`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstantiationError {
    #[error("cannot instantiate abstract class `{name}`")]
    AbstractInstantiation { name: String },

    #[error("cannot instantiate role `{name}`")]
    RoleInstantiation { name: String },

    #[error("missing required attribute{} for `{name}`: {}", plural(.missing.len()), .missing.join(", "))]
    MissingAttribute { name: String, missing: Vec<String> },

    #[error("unknown attribute{} for `{name}`: {}", plural(.unknown.len()), .unknown.join(", "))]
    UnknownAttribute { name: String, unknown: Vec<String> },

    #[error("unknown type handle {raw}")]
    UnknownType { raw: u32 },
}

impl InstantiationError {
    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            InstantiationError::AbstractInstantiation { .. } => ErrorCode::E2001,
            InstantiationError::RoleInstantiation { .. } => ErrorCode::E2002,
            InstantiationError::MissingAttribute { .. } => ErrorCode::E2003,
            InstantiationError::UnknownAttribute { .. } => ErrorCode::E2004,
            InstantiationError::UnknownType { .. } => ErrorCode::E2005,
        }
    }
}

/// Errors raised when calling a member on an instance.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("`{type_name}` has no method `{method}`")]
    NoSuchMethod { type_name: String, method: String },

    #[error("attribute `{attribute}` is read-only; its accessor takes no arguments")]
    ReadOnlyAttribute { attribute: String },

    #[error("method failed: {message}")]
    Failed { message: String },
}

impl DispatchError {
    /// Convenience constructor for method bodies.
    pub fn failed(message: impl Into<String>) -> Self {
        DispatchError::Failed {
            message: message.into(),
        }
    }

    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::NoSuchMethod { .. } => ErrorCode::E3001,
            DispatchError::ReadOnlyAttribute { .. } => ErrorCode::E3002,
            DispatchError::Failed { .. } => ErrorCode::E3003,
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests;
