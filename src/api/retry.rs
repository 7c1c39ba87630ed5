use std::time::Duration;
use tokio::time::sleep;

use super::error::ApiError;

/// Retry policy with exponential backoff. Only transient failures are
/// retried; client errors come back immediately.
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries, for requests that are not idempotent.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Run a request closure with retries and exponential backoff.
    pub async fn run<F, Fut, T>(&self, mut request: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        let mut delay = self.initial_delay;

        loop {
            match request().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    attempt += 1;

                    if attempt >= self.max_attempts || !err.is_transient() {
                        if attempt >= self.max_attempts && self.max_attempts > 1 {
                            tracing::warn!("Max attempts ({}) exceeded", self.max_attempts);
                        }
                        return Err(err);
                    }

                    tracing::debug!(
                        "Attempt {} failed, retrying in {:?}: {}",
                        attempt,
                        delay,
                        err
                    );

                    sleep(delay).await;

                    // Exponential backoff with cap
                    delay = delay.mul_f64(self.backoff_factor).min(self.max_delay);
                }
            }
        }
    }
}
