//! Class/role registry and dispatch engine.
//!
//! # Layers
//!
//! - `Registry` (symbol table + descriptor graph): declare classes and roles,
//!   add `extends` / `with` edges, tag roles, seal
//! - Linearization: resolution order, `is_a`, `does`, member lookup, role
//!   conflict detection
//! - Instance factory: `instantiate` with attribute validation, `invoke`
//! - Predicates: `is_<Class>` / `does_<Role>` helpers over handles or names
//! - `SharedRegistry` / `FrozenRegistry`: declaration-phase lock and the
//!   lock-free post-seal view
//!
//! # Lifecycle
//!
//! ```text
//! DECLARED --extend/consume/tag/add_member--> DECLARED
//!     |
//!     +-- first instantiation of it or a descendant, or freeze --> SEALED
//! ```
//!
//! Structural edits on a sealed descriptor fail with `SealedType`.

mod config;
mod descriptor;
mod error;
mod flags;
mod idx;
mod instance;
mod linearize;
mod predicate;
mod registry;
mod shared;
mod value;

pub use config::{RegistryConfig, ANON_PREFIX};
pub use descriptor::{TypeDescriptor, TypeKind};
pub use error::{DeclareError, DispatchError, ErrorCode, ExpectedKind, InstantiationError};
pub use flags::TypeFlags;
pub use idx::TypeIdx;
pub use instance::Instance;
pub use linearize::{ResolvedMember, RoleConflict};
pub use predicate::{Predicate, PredicateTable, Subject, Test};
pub use registry::{DuplicateName, Registry, SymbolTable};
pub use shared::{FrozenRegistry, SharedRegistry};
pub use value::{AttributeDef, MemberDef, MemberKind, MethodFn, Value};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=mop_types=debug` or
/// `RUST_LOG=mop_types=trace`; without `RUST_LOG` nothing is installed.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed (e.g. by a host).
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{TypeFlags, TypeIdx};

    const _: [(); 4] = [(); std::mem::size_of::<TypeIdx>()];
    const _: [(); 1] = [(); std::mem::size_of::<TypeFlags>()];
}
