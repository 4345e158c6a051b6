//! # mendpool
//!
//! Thread-safe resource pool with background self-healing, plus a blocking
//! FIFO task queue built on the same wait/notify substrate.
//!
//! ## Features
//!
//! - Resources tracked in three custody states: idle, in use, broken
//! - Automatic return of resources via RAII ([`PooledResource`])
//! - Explicit invalidation routes failed resources to a repair queue
//! - Background repair worker, retry-forever, stopped and joined on drop
//! - Blocking `acquire`/`pop` with optional timeouts, plus async variants
//! - Unbounded multi-producer multi-consumer [`TaskQueue`]
//!
//! ## Quick Start
//!
//! ```rust
//! use mendpool::{Repairable, ResourcePool};
//!
//! struct Conn(u32);
//!
//! impl Repairable for Conn {
//!     fn repair(&mut self) -> bool {
//!         true
//!     }
//! }
//!
//! let pool = ResourcePool::new();
//! pool.add(Conn(1));
//! {
//!     let conn = pool.acquire(None).unwrap();
//!     println!("using connection {}", conn.0);
//!     // returned to the pool when `conn` goes out of scope
//! }
//! assert_eq!(pool.idle_count(), 1);
//! ```

mod config;
mod errors;
mod monitor;
mod pool;
mod queue;
mod repair;

pub use config::PoolConfig;
pub use errors::{PoolError, PoolResult};
pub use pool::{PooledResource, ResourcePool};
pub use queue::TaskQueue;
pub use repair::Repairable;
