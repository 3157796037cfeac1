use std::time::Duration;

const MINUTE: u64 = 60;

/// default deadlines of the crud operations of one object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTimeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl OperationTimeouts {
    pub const fn standard() -> Self {
        Self {
            create: Duration::from_secs(10 * MINUTE),
            read: Duration::from_secs(5 * MINUTE),
            update: Duration::from_secs(10 * MINUTE),
            delete: Duration::from_secs(10 * MINUTE),
        }
    }

    /// sites and clusters take much longer to provision
    pub const fn long_running() -> Self {
        Self {
            create: Duration::from_secs(30 * MINUTE),
            read: Duration::from_secs(5 * MINUTE),
            update: Duration::from_secs(30 * MINUTE),
            delete: Duration::from_secs(30 * MINUTE),
        }
    }
}

impl Default for OperationTimeouts {
    fn default() -> Self {
        Self::standard()
    }
}

/// transport level retry of failed requests.
/// off unless `max_retries` is raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub wait_min: Duration,
    pub wait_max: Duration,
    /// wait after 429 when the server gives no hint
    pub rate_limit_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            wait_min: Duration::from_secs(1),
            wait_max: Duration::from_secs(30),
            rate_limit_wait: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// exponential backoff for the given attempt (0 based), capped at `wait_max`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.wait_min
            .checked_mul(factor)
            .map(|wait| wait.min(self.wait_max))
            .unwrap_or(self.wait_max)
    }
}
