// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A reader/writer spinlock for the process-wide tables (domain registry,
default logger slot).

Critical sections are a push or an `Arc` clone, so spinning is cheaper than
parking.  Guards must never be held across a call into a logger.
*/

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: u8 = 0;
// up to 254 readers, or one writer
const WRITER: u8 = u8::MAX;

pub(crate) struct SpinRwLock<T> {
    state: AtomicU8,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is serialized by `state`.
unsafe impl<T: Send> Send for SpinRwLock<T> {}
// SAFETY: readers only get `&T`, so `T: Sync` is needed in addition to `Send`.
unsafe impl<T: Send + Sync> Sync for SpinRwLock<T> {}

impl<T> SpinRwLock<T> {
    pub(crate) const fn new(data: T) -> Self {
        SpinRwLock {
            state: AtomicU8::new(UNLOCKED),
            data: UnsafeCell::new(data),
        }
    }

    pub(crate) fn read(&self) -> ReadGuard<'_, T> {
        while self
            .state
            .fetch_update(Acquire, Relaxed, |readers| {
                (readers < WRITER - 1).then_some(readers + 1)
            })
            .is_err()
        {
            std::hint::spin_loop();
        }
        ReadGuard { lock: self }
    }

    pub(crate) fn write(&self) -> WriteGuard<'_, T> {
        while self
            .state
            .compare_exchange_weak(UNLOCKED, WRITER, Acquire, Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
        WriteGuard { lock: self }
    }
}

pub(crate) struct ReadGuard<'a, T> {
    lock: &'a SpinRwLock<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: a read guard excludes writers.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.fetch_sub(1, Release);
    }
}

pub(crate) struct WriteGuard<'a, T> {
    lock: &'a SpinRwLock<T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: a write guard is exclusive.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: a write guard is exclusive.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.store(UNLOCKED, Release);
    }
}

#[cfg(test)]
mod tests {
    use super::SpinRwLock;
    use std::sync::Arc;

    #[test]
    fn readers_share() {
        let lock = SpinRwLock::new(5);
        let a = lock.read();
        let b = lock.read();
        assert_eq!(*a + *b, 10);
    }

    #[test]
    fn writers_exclude() {
        let lock = Arc::new(SpinRwLock::new(Vec::new()));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let lock = lock.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        lock.write().push(t * 100 + i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(lock.read().len(), 400);
    }
}
