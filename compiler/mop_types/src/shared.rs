//! Registry sharing across threads.
//!
//! Two phases:
//!
//! - **Declaration**: `SharedRegistry` wraps the registry in a single
//!   `RwLock`. Every structural edit takes the write lock; queries may read
//!   concurrently between edits.
//! - **Frozen**: `SharedRegistry::freeze` seals every descriptor and hands
//!   out a `FrozenRegistry`, a plain `Arc<Registry>`. Nothing in it can change
//!   structurally, so `resolve`, `is_a`, `does`, `instantiate` and `invoke`
//!   run from any number of threads without locking.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::DeclareError;
use crate::Registry;

/// A registry in its declaration phase, shareable across threads.
#[derive(Clone, Debug, Default)]
pub struct SharedRegistry(Arc<RwLock<Registry>>);

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        SharedRegistry(Arc::new(RwLock::new(registry)))
    }

    /// Read access; blocks while an edit is in progress.
    pub fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.0.read()
    }

    /// Run an edit under the registry-wide write lock.
    ///
    /// The edit is atomic: if `f` fails the registry is left unchanged.
    pub fn edit<T>(
        &self,
        f: impl FnOnce(&mut Registry) -> Result<T, DeclareError>,
    ) -> Result<T, DeclareError> {
        let mut guard = self.0.write();
        guard.transaction(f)
    }

    /// End the declaration phase.
    ///
    /// Seals every descriptor, including those seen through other
    /// `SharedRegistry` handles. Those handles may still declare new types,
    /// but existing ones stay sealed in every view.
    pub fn freeze(self) -> FrozenRegistry {
        let registry = match Arc::try_unwrap(self.0) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => {
                let guard = shared.write();
                guard.seal_all();
                Registry::clone(&guard)
            }
        };
        FrozenRegistry::new(registry)
    }
}

/// A sealed, immutable registry.
#[derive(Clone, Debug)]
pub struct FrozenRegistry(Arc<Registry>);

impl FrozenRegistry {
    /// Seal everything in `registry` and freeze it.
    pub fn new(registry: Registry) -> Self {
        let sealed = registry.seal_all();
        tracing::debug!(types = registry.len(), sealed, "registry frozen");
        FrozenRegistry(Arc::new(registry))
    }
}

impl std::ops::Deref for FrozenRegistry {
    type Target = Registry;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
