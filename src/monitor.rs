//! Wait/notify substrate shared by the pool and the task queue

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// A mutex-guarded state paired with a condition variable.
///
/// Both the resource pool and the task queue block on "the guarded collection
/// is non-empty"; this type carries that contract once. The predicate is
/// always evaluated under the same lock that guards mutation, and waits loop
/// on the predicate, so spurious wakeups and check-then-wait races cannot
/// produce a lost wakeup.
pub(crate) struct Monitor<S> {
    state: Mutex<S>,
    cond: Condvar,
}

impl<S> Monitor<S> {
    pub fn new(state: S) -> Self {
        Self {
            state: Mutex::new(state),
            cond: Condvar::new(),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.state.lock()
    }

    /// Wake one waiter. Call after any mutation that could satisfy a waiter's
    /// predicate.
    pub fn notify_one(&self) {
        self.cond.notify_one();
    }

    /// Block until `ready` returns true or `timeout` elapses.
    ///
    /// `None` blocks indefinitely; `Some(Duration::ZERO)` is an immediate
    /// check. Returns whether the predicate held when the wait ended. The
    /// guard is held on return either way, so the caller can act on the state
    /// atomically with the final predicate check.
    pub fn wait_until<F>(
        &self,
        guard: &mut MutexGuard<'_, S>,
        timeout: Option<Duration>,
        mut ready: F,
    ) -> bool
    where
        F: FnMut(&S) -> bool,
    {
        match timeout {
            None => {
                while !ready(guard) {
                    self.cond.wait(guard);
                }
                true
            }
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                while !ready(guard) {
                    if self.cond.wait_until(guard, deadline).timed_out() {
                        // One last check under the lock: the deadline racing a
                        // notify must not drop an element on the floor.
                        return ready(guard);
                    }
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn ready_state_returns_without_waiting() {
        let monitor = Monitor::new(vec![1]);
        let mut guard = monitor.lock();
        assert!(monitor.wait_until(&mut guard, Some(Duration::ZERO), |v: &Vec<i32>| !v.is_empty()));
    }

    #[test]
    fn times_out_when_never_ready() {
        let monitor = Monitor::new(Vec::<i32>::new());
        let start = Instant::now();
        let mut guard = monitor.lock();
        let satisfied =
            monitor.wait_until(&mut guard, Some(Duration::from_millis(50)), |v| !v.is_empty());
        assert!(!satisfied);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn notify_wakes_indefinite_waiter() {
        let monitor = Arc::new(Monitor::new(Vec::new()));

        let waiter = {
            let monitor = Arc::clone(&monitor);
            thread::spawn(move || {
                let mut guard = monitor.lock();
                assert!(monitor.wait_until(&mut guard, None, |v: &Vec<i32>| !v.is_empty()));
                guard.pop()
            })
        };

        thread::sleep(Duration::from_millis(20));
        monitor.lock().push(7);
        monitor.notify_one();

        assert_eq!(waiter.join().unwrap(), Some(7));
    }
}
