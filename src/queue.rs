//! Unbounded FIFO queue for handing work items between threads

use crate::errors::{PoolError, PoolResult};
use crate::monitor::Monitor;

use std::collections::VecDeque;
use std::time::Duration;

/// Thread-safe FIFO work-item queue with blocking consumers
///
/// Producers `push` and never block; consumers `pop` with an optional
/// timeout. Delivery order is the order in which `push` calls acquired the
/// lock, across all producers combined. Each item is delivered to exactly one
/// consumer; which blocked consumer is woken for it is unspecified.
///
/// # Examples
///
/// ```
/// use mendpool::TaskQueue;
///
/// let queue = TaskQueue::new();
/// queue.push("job");
/// assert_eq!(queue.pop(None), Some("job"));
/// ```
pub struct TaskQueue<T> {
    tasks: Monitor<VecDeque<T>>,
}

impl<T> TaskQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            tasks: Monitor::new(VecDeque::new()),
        }
    }

    /// Append an item to the tail and wake one waiting consumer
    ///
    /// The queue is unbounded, so this never blocks and never fails.
    pub fn push(&self, item: T) {
        self.tasks.lock().push_back(item);
        self.tasks.notify_one();
    }

    /// Remove and return the head item, blocking while the queue is empty
    ///
    /// `timeout = None` blocks until an item arrives. Returns `None` only on
    /// timeout; an empty result is an expected outcome, not a failure.
    pub fn pop(&self, timeout: Option<Duration>) -> Option<T> {
        let mut tasks = self.tasks.lock();
        if !self.tasks.wait_until(&mut tasks, timeout, |t| !t.is_empty()) {
            return None;
        }
        tasks.pop_front()
    }

    /// Remove and return the head item if one is present right now
    pub fn try_pop(&self) -> Option<T> {
        self.tasks.lock().pop_front()
    }

    /// Number of items currently queued
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Pop asynchronously, polling until an item arrives or `timeout` elapses
    pub async fn pop_async(&self, timeout: Duration) -> PoolResult<T> {
        tokio::time::timeout(timeout, async {
            loop {
                if let Some(item) = self.try_pop() {
                    return item;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .map_err(|_| PoolError::Timeout(timeout))
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn delivers_in_fifo_order() {
        let queue = TaskQueue::new();
        for i in 0..100 {
            queue.push(i);
        }
        for i in 0..100 {
            assert_eq!(queue.pop(None), Some(i));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn try_pop_on_empty_returns_none() {
        let queue: TaskQueue<i32> = TaskQueue::new();
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn pop_times_out_on_empty_queue() {
        let queue: TaskQueue<i32> = TaskQueue::new();
        let start = Instant::now();
        assert_eq!(queue.pop(Some(Duration::from_millis(50))), None);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn push_wakes_blocked_consumer() {
        let queue = TaskQueue::new();

        crossbeam::scope(|s| {
            let consumer = s.spawn(|_| queue.pop(None));
            thread::sleep(Duration::from_millis(20));
            queue.push(42);
            assert_eq!(consumer.join().unwrap(), Some(42));
        })
        .unwrap();
    }

    #[test]
    fn each_item_reaches_exactly_one_consumer() {
        const PRODUCERS: u32 = 4;
        const CONSUMERS: u32 = 4;
        const PER_PRODUCER: u32 = 100;

        let queue = TaskQueue::new();
        let delivered = Mutex::new(Vec::new());

        crossbeam::scope(|s| {
            for p in 0..PRODUCERS {
                let queue = &queue;
                s.spawn(move |_| {
                    for i in 0..PER_PRODUCER {
                        queue.push(p * PER_PRODUCER + i);
                    }
                });
            }
            for _ in 0..CONSUMERS {
                let queue = &queue;
                let delivered = &delivered;
                s.spawn(move |_| {
                    while let Some(item) = queue.pop(Some(Duration::from_millis(200))) {
                        delivered.lock().unwrap().push(item);
                    }
                });
            }
        })
        .unwrap();

        let delivered = delivered.into_inner().unwrap();
        let expected = PRODUCERS * PER_PRODUCER;
        assert_eq!(delivered.len() as u32, expected);
        let unique: HashSet<_> = delivered.iter().collect();
        assert_eq!(unique.len() as u32, expected);
    }

    #[tokio::test]
    async fn pop_async_receives_item() {
        let queue = TaskQueue::new();
        queue.push(7);
        assert_eq!(queue.pop_async(Duration::from_secs(1)).await, Ok(7));
    }

    #[tokio::test]
    async fn pop_async_times_out() {
        let queue: TaskQueue<i32> = TaskQueue::new();
        let timeout = Duration::from_millis(50);
        assert_eq!(
            queue.pop_async(timeout).await,
            Err(PoolError::Timeout(timeout))
        );
    }
}
