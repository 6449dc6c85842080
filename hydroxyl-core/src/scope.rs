use std::sync::atomic::{AtomicUsize, Ordering};

use crate::slot::SlotError;

/// A mutation scope shared between an engine and its slots.
///
/// The scope is active while at least one [`WriteGuard`] is alive. Guards may
/// nest; the scope closes when the outermost one is dropped.
#[derive(Debug, Default)]
pub struct WriteScope {
    depth: AtomicUsize,
}

impl WriteScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the scope until the returned guard is dropped.
    pub fn begin(&self) -> WriteGuard<'_> {
        self.depth.fetch_add(1, Ordering::AcqRel);
        WriteGuard { scope: self }
    }

    /// Returns true if a write is currently allowed.
    pub fn is_active(&self) -> bool {
        self.depth.load(Ordering::Acquire) > 0
    }

    /// Fails with [`SlotError::WriteOutsideScope`] unless the scope is active.
    pub fn check(&self) -> Result<(), SlotError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(SlotError::WriteOutsideScope)
        }
    }
}

/// Keeps a [`WriteScope`] open.
#[derive(Debug)]
#[must_use = "the write scope closes as soon as the guard is dropped"]
pub struct WriteGuard<'a> {
    scope: &'a WriteScope,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.scope.depth.fetch_sub(1, Ordering::AcqRel);
    }
}
