//! Components that own console commands.
//!
//! A component (a loadable module, usually) registers commands and must be
//! kept alive while any of them runs. The console takes a reference on the
//! owner around every handler call and skips the call when the owner is
//! already going away.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tracing::debug;

/// Owner of a group of commands.
pub trait Component: Send + Sync {
    /// Name used to match commands on unload.
    fn name(&self) -> &str;

    /// Takes a reference; returns false if the component is unloading.
    fn try_ref(&self) -> bool;

    /// Releases a reference taken by [`Component::try_ref`].
    fn unref(&self);
}

/// Reference-counted component with an unload flag.
pub struct Module {
    name: String,
    refs: AtomicUsize,
    unloading: AtomicBool,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            refs: AtomicUsize::new(0),
            unloading: AtomicBool::new(false),
        })
    }

    /// Number of references currently held.
    pub fn ref_count(&self) -> usize {
        self.refs.load(Ordering::Acquire)
    }

    /// Refuses new references from now on.
    pub fn begin_unload(&self) {
        self.unloading.store(true, Ordering::Release);
        debug!(module = %self.name, refs = self.ref_count(), "module unloading");
    }

    pub fn is_unloading(&self) -> bool {
        self.unloading.load(Ordering::Acquire)
    }
}

impl Component for Module {
    fn name(&self) -> &str {
        &self.name
    }

    fn try_ref(&self) -> bool {
        self.refs.fetch_add(1, Ordering::AcqRel);
        if self.is_unloading() {
            self.refs.fetch_sub(1, Ordering::AcqRel);
            return false;
        }
        true
    }

    fn unref(&self) {
        self.refs.fetch_sub(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("refs", &self.ref_count())
            .field("unloading", &self.is_unloading())
            .finish()
    }
}

/// Reference on a command's owner, released on drop.
pub(crate) struct OwnerGuard(Option<Arc<dyn Component>>);

impl OwnerGuard {
    /// References `owner`. Commands without an owner always succeed; `None`
    /// means the owner is unloading and the call must be skipped.
    pub(crate) fn enter(owner: Option<&Arc<dyn Component>>) -> Option<Self> {
        match owner {
            None => Some(Self(None)),
            Some(owner) if owner.try_ref() => Some(Self(Some(Arc::clone(owner)))),
            Some(owner) => {
                debug!(owner = owner.name(), "owner unloading, skipping call");
                None
            }
        }
    }
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        if let Some(owner) = &self.0 {
            owner.unref();
        }
    }
}
