//! mop IR - names shared by every layer of the object system.
//!
//! This crate contains the small, dependency-light pieces the registry and
//! the declarative front end both need:
//! - `Name`: a 32-bit interned identifier (type names, member names)
//! - `StringInterner` / `SharedInterner`: sharded, thread-safe interning
//! - `Scope`: the qualified-name rule used when declarations are nested
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: qualified names and member names become `Name(u32)`
//!   so descriptor tables compare and hash in O(1)
//! - **Explicit Scope**: the "current package" is a value threaded through
//!   declaration calls, never ambient state

mod interner;
mod name;
mod scope;

pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use scope::{local_name, NameError, Scope, SEPARATOR};
