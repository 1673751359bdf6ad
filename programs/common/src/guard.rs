//! Non-reentrant entry guard

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::BulwarkError;

/// Per-component flag set while a value-moving entry point runs
#[derive(Debug, Default)]
pub struct EntryLock {
    held: Arc<AtomicBool>,
}

/// Scoped hold on an [`EntryLock`]; released on drop
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct Entered {
    held: Arc<AtomicBool>,
    name: &'static str,
}

impl EntryLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self, name: &'static str) -> Result<Entered, BulwarkError> {
        if self
            .held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            log::warn!("re-entrant call into {}", name);
            return Err(BulwarkError::Reentrant(name));
        }
        Ok(Entered {
            held: Arc::clone(&self.held),
            name,
        })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl Entered {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for Entered {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
