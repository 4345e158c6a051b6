//! Error types for the pool and task queue

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// An async wait ran out of time. The blocking variants signal the same
    /// condition by returning `None` instead.
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type PoolResult<T> = Result<T, PoolError>;
