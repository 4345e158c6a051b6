//! Core resource pool implementation

use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::monitor::Monitor;
use crate::repair::{RepairWorker, Repairable};

use std::collections::{HashSet, VecDeque};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

/// Custody state: every tracked resource is in exactly one collection.
///
/// A resource being worked on by the repair worker is owned by the worker for
/// the duration of the attempt and is briefly absent from all three; it is
/// always routed back into `idle` or `broken` under the lock.
pub(crate) struct PoolState<T> {
    pub(crate) idle: VecDeque<(u64, T)>,
    in_use: HashSet<u64>,
    pub(crate) broken: VecDeque<(u64, T)>,
    next_id: u64,
}

impl<T> PoolState<T> {
    fn new() -> Self {
        Self {
            idle: VecDeque::new(),
            in_use: HashSet::new(),
            broken: VecDeque::new(),
            next_id: 0,
        }
    }
}

/// An acquired resource that returns itself to the pool when dropped
///
/// Dropping the guard releases the resource back to the idle set (the caller
/// asserts it is healthy). A resource that failed in use should instead be
/// consumed with [`PooledResource::invalidate`], which hands it to the repair
/// worker.
pub struct PooledResource<T> {
    value: Option<T>,
    entry_id: u64,
    shared: Arc<Monitor<PoolState<T>>>,
}

impl<T> PooledResource<T> {
    fn new(value: T, entry_id: u64, shared: Arc<Monitor<PoolState<T>>>) -> Self {
        Self {
            value: Some(value),
            entry_id,
            shared,
        }
    }

    /// Return the resource to the pool as healthy
    ///
    /// Equivalent to dropping the guard; provided for call sites that want
    /// the hand-back to be explicit.
    pub fn release(self) {}

    /// Mark the resource as broken and hand it to the repair worker
    ///
    /// The resource moves to the broken set and will not be handed out again
    /// until a repair attempt succeeds. No waiter is woken; there is nothing
    /// to acquire until then.
    pub fn invalidate(mut self) {
        if let Some(value) = self.value.take() {
            let mut state = self.shared.lock();
            if state.in_use.remove(&self.entry_id) {
                state.broken.push_back((self.entry_id, value));
            } else {
                debug_assert!(false, "invalidated resource was not tracked as in use");
                tracing::warn!(id = self.entry_id, "invalidated resource was not tracked as in use");
            }
        }
    }
}

impl<T> Deref for PooledResource<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value.as_ref().expect("value already taken")
    }
}

impl<T> DerefMut for PooledResource<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value.as_mut().expect("value already taken")
    }
}

impl<T> Drop for PooledResource<T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            let mut state = self.shared.lock();
            if state.in_use.remove(&self.entry_id) {
                state.idle.push_back((self.entry_id, value));
                drop(state);
                self.shared.notify_one();
            } else {
                tracing::warn!(id = self.entry_id, "released resource was not tracked as in use");
            }
        }
    }
}

/// Thread-safe pool of reusable resources with background self-healing
///
/// Resources enter the pool only through [`ResourcePool::add`]; the pool
/// tracks custody (idle, in use, or broken) but never constructs or destroys
/// them. Unless disabled in [`PoolConfig`], a background worker repeatedly
/// attempts to repair broken resources via their [`Repairable`] capability
/// and puts the recovered ones back into circulation. The worker is owned by
/// the pool and is stopped and joined when the pool is dropped.
pub struct ResourcePool<T> {
    shared: Arc<Monitor<PoolState<T>>>,
    worker: Option<RepairWorker>,
}

impl<T: Repairable + Send + 'static> ResourcePool<T> {
    /// Create an empty pool with the default configuration (auto-repair on)
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create an empty pool with the given configuration
    pub fn with_config(config: PoolConfig) -> Self {
        let shared = Arc::new(Monitor::new(PoolState::new()));
        let worker = config
            .auto_repair
            .then(|| RepairWorker::spawn(Arc::clone(&shared), config.repair_interval));
        Self { shared, worker }
    }

    /// Add a resource to the idle set and wake one waiter
    ///
    /// Every call creates a distinct pool entry with its own internal
    /// identity, so the same caller value added twice is tracked as two
    /// independent resources.
    pub fn add(&self, resource: T) {
        {
            let mut state = self.shared.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.idle.push_back((id, resource));
        }
        self.shared.notify_one();
    }

    /// Check out the resource at the head of the idle set
    ///
    /// Blocks while the idle set is empty: `timeout = None` waits
    /// indefinitely for an `add`, a release, or a successful repair; a bounded
    /// wait returns `None` on expiry. Which of several blocked callers is
    /// served first is unspecified.
    pub fn acquire(&self, timeout: Option<Duration>) -> Option<PooledResource<T>> {
        let mut state = self.shared.lock();
        if !self.shared.wait_until(&mut state, timeout, |s| !s.idle.is_empty()) {
            return None;
        }
        let (id, value) = state.idle.pop_front()?;
        state.in_use.insert(id);
        drop(state);
        Some(PooledResource::new(value, id, Arc::clone(&self.shared)))
    }

    /// Check out a resource if one is idle right now
    pub fn try_acquire(&self) -> Option<PooledResource<T>> {
        self.acquire(Some(Duration::ZERO))
    }

    /// Acquire asynchronously, polling until a resource is idle or `timeout`
    /// elapses
    pub async fn acquire_async(&self, timeout: Duration) -> PoolResult<PooledResource<T>> {
        tokio::time::timeout(timeout, async {
            loop {
                if let Some(resource) = self.try_acquire() {
                    return resource;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .map_err(|_| PoolError::Timeout(timeout))
    }

    /// Number of resources ready for acquisition
    pub fn idle_count(&self) -> usize {
        self.shared.lock().idle.len()
    }

    /// Number of resources currently checked out
    pub fn in_use_count(&self) -> usize {
        self.shared.lock().in_use.len()
    }

    /// Number of resources awaiting repair
    pub fn broken_count(&self) -> usize {
        self.shared.lock().broken.len()
    }

    /// Total resources tracked by the pool
    ///
    /// A resource with a repair attempt in flight is owned by the worker and
    /// not counted until the attempt is routed back.
    pub fn len(&self) -> usize {
        let state = self.shared.lock();
        state.idle.len() + state.in_use.len() + state.broken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Repairable + Send + 'static> Default for ResourcePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ResourcePool<T> {
    fn drop(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
        }
    }
}
