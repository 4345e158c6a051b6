//! Broken-resource recovery: the repair capability and the background worker

use crate::monitor::Monitor;
use crate::pool::PoolState;

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Capability the pool invokes to recover a broken resource
///
/// # Examples
///
/// ```
/// use mendpool::Repairable;
///
/// struct Conn {
///     connected: bool,
/// }
///
/// impl Repairable for Conn {
///     fn repair(&mut self) -> bool {
///         self.connected = true;
///         self.connected
///     }
/// }
/// ```
pub trait Repairable {
    /// Attempt to restore the resource to a usable state
    ///
    /// Invoked by the pool's background worker with no pool lock held, so the
    /// implementation may block (re-dialing a connection, reopening a file).
    /// Returning `false` requeues the resource for another attempt on a later
    /// cycle; attempts are retried forever, with no backoff.
    fn repair(&mut self) -> bool;
}

/// Owned handle to the background repair thread
///
/// Stopping the worker is deterministic: the shutdown flag is raised, the
/// sleeping thread is notified, and the handle is joined.
pub(crate) struct RepairWorker {
    shutdown: Arc<Monitor<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl RepairWorker {
    pub fn spawn<T>(shared: Arc<Monitor<PoolState<T>>>, interval: Duration) -> Self
    where
        T: Repairable + Send + 'static,
    {
        let shutdown = Arc::new(Monitor::new(false));
        let handle = {
            let shutdown = Arc::clone(&shutdown);
            thread::Builder::new()
                .name("mendpool-repair".into())
                .spawn(move || repair_loop(&shared, &shutdown, interval))
                .expect("failed to spawn repair worker thread")
        };
        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal the worker to exit and join it. Idempotent.
    pub fn stop(&mut self) {
        *self.shutdown.lock() = true;
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RepairWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One repair attempt per interval: sleep, pop a broken resource, try to fix
/// it, route the outcome.
fn repair_loop<T: Repairable + Send>(
    shared: &Monitor<PoolState<T>>,
    shutdown: &Monitor<bool>,
    interval: Duration,
) {
    loop {
        {
            let mut stop = shutdown.lock();
            if shutdown.wait_until(&mut stop, Some(interval), |requested| *requested) {
                return;
            }
        }

        let next = shared.lock().broken.pop_front();
        let Some((id, mut resource)) = next else {
            continue;
        };

        // The capability may block; it runs without the pool lock so it
        // cannot stall acquire/release on other threads.
        let repaired = resource.repair();

        let mut state = shared.lock();
        if repaired {
            state.idle.push_back((id, resource));
            drop(state);
            shared.notify_one();
            tracing::debug!(id, "repaired resource returned to idle");
        } else {
            state.broken.push_back((id, resource));
            drop(state);
            tracing::debug!(id, "repair failed, requeued for retry");
        }
    }
}
