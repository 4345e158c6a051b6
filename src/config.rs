//! Pool configuration options

use std::time::Duration;

/// Configuration for resource pool behavior
///
/// # Examples
///
/// ```
/// use mendpool::PoolConfig;
/// use std::time::Duration;
///
/// let config = PoolConfig::new()
///     .with_auto_repair(false)
///     .with_repair_interval(Duration::from_millis(250));
///
/// assert!(!config.auto_repair);
/// assert_eq!(config.repair_interval, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Whether the pool starts a background repair worker on construction
    pub auto_repair: bool,

    /// Delay between repair cycles. One broken resource is attempted per
    /// cycle, so this also bounds repair throughput.
    pub repair_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            auto_repair: true,
            repair_interval: Duration::from_millis(100),
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the background repair worker
    ///
    /// With repair disabled, invalidated resources stay in the broken set
    /// until the pool is dropped.
    pub fn with_auto_repair(mut self, enabled: bool) -> Self {
        self.auto_repair = enabled;
        self
    }

    /// Set the delay between repair cycles
    ///
    /// # Examples
    ///
    /// ```
    /// use mendpool::PoolConfig;
    /// use std::time::Duration;
    ///
    /// let config = PoolConfig::new()
    ///     .with_repair_interval(Duration::from_secs(1));
    ///
    /// assert_eq!(config.repair_interval, Duration::from_secs(1));
    /// ```
    pub fn with_repair_interval(mut self, interval: Duration) -> Self {
        self.repair_interval = interval;
        self
    }
}
