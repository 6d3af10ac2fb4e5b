//! Bounded pool of reusable hashers.
//!
//! A [`HashPool`] hands out at most `capacity` hashers at a time. Hashers are
//! created on demand up to that bound and recycled afterwards; once all of
//! them are checked out, [`HashPool::checkout`] blocks until one comes back.

use core::ops::{Deref, DerefMut};
use log::trace;
use sha2::digest::Reset;
use std::sync::{Condvar, LazyLock, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

/// Capacity of the process-wide pools.
pub const DEFAULT_POOL_CAPACITY: usize = 32;

static SHA256_POOL: LazyLock<HashPool<sha2::Sha256>> =
    LazyLock::new(|| HashPool::new(DEFAULT_POOL_CAPACITY));

static RIPEMD160_POOL: LazyLock<HashPool<ripemd::Ripemd160>> =
    LazyLock::new(|| HashPool::new(DEFAULT_POOL_CAPACITY));

/// Process-wide SHA-256 pool.
pub fn sha256_pool() -> &'static HashPool<sha2::Sha256> {
    &SHA256_POOL
}

/// Process-wide RIPEMD-160 pool.
pub fn ripemd160_pool() -> &'static HashPool<ripemd::Ripemd160> {
    &RIPEMD160_POOL
}

struct PoolState<D> {
    idle: Vec<D>,
    created: usize,
}

/// A bounded set of hashers of type `D`.
pub struct HashPool<D> {
    state: Mutex<PoolState<D>>,
    returned: Condvar,
    capacity: usize,
}

impl<D: Default + Reset> HashPool<D> {
    /// Creates an empty pool which will hold at most `capacity` hashers.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "hash pool capacity must be non-zero");
        Self {
            state: Mutex::new(PoolState {
                idle: Vec::with_capacity(capacity),
                created: 0,
            }),
            returned: Condvar::new(),
            capacity,
        }
    }

    /// Maximum number of hashers this pool hands out at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of hashers currently checked out.
    pub fn in_use(&self) -> usize {
        let state = self.lock();
        state.created - state.idle.len()
    }

    /// Takes a hasher, blocking while all of them are in use.
    pub fn checkout(&self) -> PooledHasher<'_, D> {
        let mut state = self.lock();
        loop {
            if let Some(hasher) = self.take(&mut state) {
                return PooledHasher { pool: self, hasher };
            }
            trace!("all {} hashers in use, waiting", self.capacity);
            state = self
                .returned
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Takes a hasher if one is available without blocking.
    pub fn try_checkout(&self) -> Option<PooledHasher<'_, D>> {
        let mut state = self.lock();
        self.take(&mut state)
            .map(|hasher| PooledHasher { pool: self, hasher })
    }

    fn take(&self, state: &mut PoolState<D>) -> Option<D> {
        if let Some(hasher) = state.idle.pop() {
            return Some(hasher);
        }
        if state.created < self.capacity {
            state.created += 1;
            return Some(D::default());
        }
        None
    }

    fn checkin(&self, hasher: D) {
        self.lock().idle.push(hasher);
        self.returned.notify_one();
    }

    fn lock(&self) -> MutexGuard<'_, PoolState<D>> {
        // the state is a plain free list, still consistent after a panic
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A hasher checked out of a [`HashPool`].
///
/// Dereferences to the hasher. On drop the hasher is reset and returned to
/// the pool, waking one blocked caller.
pub struct PooledHasher<'a, D: Default + Reset> {
    pool: &'a HashPool<D>,
    hasher: D,
}

impl<D: Default + Reset> Deref for PooledHasher<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.hasher
    }
}

impl<D: Default + Reset> DerefMut for PooledHasher<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.hasher
    }
}

impl<D: Default + Reset> Drop for PooledHasher<'_, D> {
    fn drop(&mut self) {
        let mut hasher = core::mem::take(&mut self.hasher);
        hasher.reset();
        self.pool.checkin(hasher);
    }
}
