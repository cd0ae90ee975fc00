//! Shared run ownership
//!
//! [`SharedRun`] is an owner handle: cloning it adds an owner, dropping it
//! removes one. When the last owner drops, the run is cleared and returned to
//! the pool it was acquired from, keeping its buffer.
//!
//! # Sharing contract
//!
//! A run with more than one owner must not be modified in place. Owners that
//! want to change a shared run call [`SharedRun::make_mut`], which gives them
//! a private copy first.
//!
//! [`SharedRun::get_mut`] is the guarded path. Checked builds (debug builds,
//! or any build with the `strict-debug` feature) terminate with a diagnostic
//! when it is called on a shared run. Other builds skip the test, and every
//! owner observes the write.
//!
//! Batch passes through [`SharedRun::run_if_not_stamped`] bypass the guard:
//! they change a shared run once on behalf of all of its owners.

use crate::epoch::Epoch;
use crate::error::RunError;
use crate::pool::{self, PoolLink};
use crate::run::MutationRun;
use mutrun_types::MutationArena;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

/// Owner handle to a pooled, reference-counted mutation run
pub struct SharedRun {
    body: Rc<RefCell<MutationRun>>,
    pool: PoolLink,
}

/// Report a sharing-contract violation and terminate
#[cold]
#[inline(never)]
#[track_caller]
fn locking_violation(owners: usize) -> ! {
    tracing::error!(owners, "in-place modification of a shared mutation run");
    panic!("mutation run locking violation: {owners} owners, copy the run before modifying it");
}

impl SharedRun {
    pub(crate) fn from_parts(run: MutationRun, pool: PoolLink) -> Self {
        Self {
            body: Rc::new(RefCell::new(run)),
            pool,
        }
    }

    /// Wrap a run that belongs to no pool; it is freed with its last owner
    #[must_use]
    pub fn unpooled(run: MutationRun) -> Self {
        Self::from_parts(run, Weak::new())
    }

    /// Current number of owners
    #[inline]
    #[must_use]
    pub fn owners(&self) -> usize {
        Rc::strong_count(&self.body)
    }

    /// Whether this handle is the only owner
    #[inline]
    #[must_use]
    pub fn is_uniquely_owned(&self) -> bool {
        self.owners() == 1
    }

    /// Whether both handles own the same run
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &SharedRun) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }

    /// Read access
    ///
    /// # Panics
    /// Panics if a batch operation is currently writing this run.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, MutationRun> {
        self.body.borrow()
    }

    /// Guarded write access
    ///
    /// # Panics
    /// In checked builds, panics if the run has more than one owner.
    #[inline]
    #[track_caller]
    pub fn get_mut(&mut self) -> RefMut<'_, MutationRun> {
        #[cfg(any(debug_assertions, feature = "strict-debug"))]
        {
            let owners = self.owners();
            if owners > 1 {
                locking_violation(owners);
            }
        }
        self.body.borrow_mut()
    }

    /// Write access that always checks ownership
    ///
    /// # Errors
    /// Returns [`RunError::SharedMutation`] if the run has more than one owner.
    #[inline]
    pub fn try_get_mut(&mut self) -> Result<RefMut<'_, MutationRun>, RunError> {
        let owners = self.owners();
        if owners > 1 {
            return Err(RunError::SharedMutation { owners });
        }
        Ok(self.body.borrow_mut())
    }

    /// Copy-on-write access
    ///
    /// If other owners exist, this handle is repointed at a private copy
    /// taken from the same pool; the other owners keep the original.
    ///
    /// # Errors
    /// Propagates growth failures; this handle is unchanged on error.
    pub fn make_mut(&mut self) -> Result<RefMut<'_, MutationRun>, RunError> {
        let owners = self.owners();
        if owners > 1 {
            let private = {
                let source = self.body.borrow();
                let copy = SharedRun::from_parts(
                    pool::take_from(&self.pool, &source),
                    self.pool.clone(),
                );
                copy.body.borrow_mut().clone_from_run(&source)?;

                tracing::trace!(owners, len = source.len(), "copied shared run before write");
                copy
            };
            *self = private;
        }
        Ok(self.body.borrow_mut())
    }

    /// Run `op` on the shared run unless it was already processed in `epoch`
    ///
    /// Not subject to the ownership guard.
    ///
    /// # Panics
    /// Panics if the run is currently borrowed through [`SharedRun::borrow`].
    pub fn run_if_not_stamped<R>(
        &self,
        epoch: Epoch,
        op: impl FnOnce(&mut MutationRun) -> R,
    ) -> Option<R> {
        self.body.borrow_mut().run_if_not_stamped(epoch, op)
    }

    /// Remove fixed mutations unless already done in `epoch`
    ///
    /// Returns the number removed, or `None` if the run was already stamped.
    pub fn remove_fixed_mutations<A: MutationArena + ?Sized>(
        &self,
        epoch: Epoch,
        arena: &A,
    ) -> Option<usize> {
        self.run_if_not_stamped(epoch, |run| run.remove_fixed_mutations(arena))
    }

    /// Give up this owner
    ///
    /// Returns `true` if this was the last owner and the run went back to
    /// its pool (or was freed).
    pub fn release(self) -> bool {
        let last = self.is_uniquely_owned();
        drop(self);
        last
    }
}

impl Clone for SharedRun {
    /// Add an owner
    fn clone(&self) -> Self {
        Self {
            body: Rc::clone(&self.body),
            pool: self.pool.clone(),
        }
    }
}

impl Drop for SharedRun {
    fn drop(&mut self) {
        if Rc::strong_count(&self.body) != 1 {
            return;
        }
        if let Ok(mut body) = self.body.try_borrow_mut() {
            let run = std::mem::take(&mut *body);
            pool::return_to(&self.pool, run);
        }
    }
}

impl fmt::Debug for SharedRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("SharedRun");
        debug.field("owners", &self.owners());
        match self.body.try_borrow() {
            Ok(run) => debug.field("run", &*run),
            Err(_) => debug.field("run", &"<borrowed>"),
        };
        debug.finish()
    }
}
