//! Declarative front end for the mop object system.
//!
//! A parser for a class/role declaration syntax produces `Declaration` trees;
//! [`declare`] turns one tree into registry entries:
//!
//! ```text
//! class Cow extends Animal with Milkable, Grazing? {   Declaration::class("Cow")
//!     has sound;                                          .with_parent("Animal")
//!     role +Udder { ... }                                 .with_roles(["Milkable", "Grazing?"])
//! }                                                       .with_member(..)
//!                                                         .with_nested(Declaration::role("+Udder"))
//! ```
//!
//! Names in a tree are qualified against an explicit [`Scope`]; nested
//! declarations see the enclosing class for `+Name`. A tree commits
//! atomically: if any part of it fails, nothing from it is registered.

mod declaration;
mod declare;

pub use declaration::{Declaration, MemberDecl, RoleRef, TypeRef};
pub use declare::{declare, declare_all};

pub use mop_ir::Scope;
