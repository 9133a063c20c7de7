//! Retry policy for transient provider errors.

use crate::error::{CloudError, CloudResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// A configurable linear backoff: `attempts` tries, `base_delay` between
/// them, with optional jitter of up to half the base delay. Only
/// `CloudError::Transient` is retried; everything else propagates on the
/// first occurrence.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3, base_delay: Duration::from_secs(10), jitter: true }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(attempts: u32, base_delay: Duration, jitter: bool) -> Self {
        Self { attempts: attempts.max(1), base_delay, jitter }
    }

    fn delay(&self) -> Duration {
        if self.jitter {
            let extra = rand::thread_rng().gen_range(0..=self.base_delay.as_millis().max(1) / 2);
            self.base_delay + Duration::from_millis(extra as u64)
        } else {
            self.base_delay
        }
    }

    /// Run `op`, retrying transient failures up to the configured number of
    /// attempts.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> CloudResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CloudResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.attempts => {
                    let delay = self.delay();
                    tracing::warn!(
                        "{what}: transient error on attempt {attempt}/{}: {err}; retrying in {:?}",
                        self.attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
