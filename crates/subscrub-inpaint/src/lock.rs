//! Process-wide accelerator serialization.
//!
//! The inpainting model is accelerator-resident and cannot run concurrent
//! jobs on the single target device, so every invocation holds this lock.
//! It serializes resource use, not shared memory.

use tokio::sync::{Semaphore, SemaphorePermit};

/// Width-1 lock around the inpainting collaborator.
///
/// Share one instance per process via `Arc`. One global lock rather than a
/// per-device pool: the target deployment assumes a single accelerator.
#[derive(Debug)]
pub struct AcceleratorLock {
    inner: Semaphore,
}

/// RAII guard; the accelerator is released when this drops.
#[derive(Debug)]
pub struct AcceleratorPermit<'a> {
    _permit: SemaphorePermit<'a>,
}

impl AcceleratorLock {
    pub fn new() -> Self {
        Self {
            inner: Semaphore::new(1),
        }
    }

    /// Wait for exclusive accelerator access.
    pub async fn acquire(&self) -> AcceleratorPermit<'_> {
        // The semaphore is never closed, so acquire cannot fail
        let permit = self
            .inner
            .acquire()
            .await
            .expect("accelerator semaphore closed");
        AcceleratorPermit { _permit: permit }
    }

    /// Whether the accelerator is currently free.
    pub fn is_idle(&self) -> bool {
        self.inner.available_permits() == 1
    }
}

impl Default for AcceleratorLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permit_excludes_and_releases() {
        let lock = AcceleratorLock::new();
        assert!(lock.is_idle());
        {
            let _permit = lock.acquire().await;
            assert!(!lock.is_idle());
        }
        assert!(lock.is_idle());
    }
}
