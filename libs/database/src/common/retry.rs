use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for connection attempts.
///
/// Delays start at `base_delay`, double after every failure, and are capped
/// at `max_delay`. With `jitter` enabled each delay is scaled to a random
/// point between half and the full computed value, so replicas that start
/// together do not hammer the database in lockstep.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,

    /// Randomize each delay within [50%, 100%] of the computed value
    pub jitter: bool,
}

impl RetryConfig {
    /// Policy used when callers pass `None`: 3 retries, 100ms base delay,
    /// 5s cap, jitter on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Deterministic delays, mainly for tests.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

/// Run `operation` until it succeeds or the retry budget is spent.
///
/// The error of the final attempt is returned unchanged; intermediate
/// failures are logged at debug level only, since a retried failure that
/// eventually succeeds is not actionable.
///
/// # Example
/// ```ignore
/// use database::common::{RetryConfig, retry_with_backoff};
///
/// let db = retry_with_backoff(
///     || database::postgres::connect(&db_url),
///     RetryConfig::new().max_retries(5),
/// )
/// .await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut failures = 0;
    let mut delay = config.base_delay;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if failures > 0 {
                    debug!("Operation recovered after {} failed attempts", failures);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        failures += 1;
        if failures > config.max_retries {
            warn!("Giving up after {} attempts: {}", failures, error);
            return Err(error);
        }

        let wait = if config.jitter { jittered(delay) } else { delay };
        debug!(
            "Attempt {} of {} failed: {}. Retrying in {:?}",
            failures,
            config.max_retries + 1,
            error,
            wait
        );
        tokio::time::sleep(wait).await;

        delay = (delay * 2).min(config.max_delay);
    }
}

/// Scale `delay` to a random point between 50% and 100% of itself.
///
/// Hashing the current time through `RandomState` gives enough spread for
/// backoff purposes without pulling in a rand dependency.
fn jittered(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let roll = RandomState::new().hash_one(std::time::SystemTime::now()) % 51;
    delay.mul_f64(0.5 + roll as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn first_attempt_success_runs_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();

        let result = retry_with_backoff(
            || {
                let calls = seen.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(7)
                }
            },
            RetryConfig::default(),
        )
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_within_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();

        let config = RetryConfig::new()
            .base_delay(Duration::from_millis(5))
            .without_jitter();

        let result = retry_with_backoff(
            || {
                let calls = seen.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("not yet".to_string())
                    } else {
                        Ok("up")
                    }
                }
            },
            config,
        )
        .await;

        assert_eq!(result, Ok("up"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn budget_exhausted_returns_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();

        let config = RetryConfig::new()
            .max_retries(2)
            .base_delay(Duration::from_millis(5))
            .without_jitter();

        let result: Result<(), String> = retry_with_backoff(
            || {
                let calls = seen.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("still down".to_string())
                }
            },
            config,
        )
        .await;

        assert_eq!(result, Err("still down".to_string()));
        // one initial attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn delays_double_up_to_the_cap() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let started = std::time::Instant::now();

        let config = RetryConfig::new()
            .max_retries(3)
            .base_delay(Duration::from_millis(40))
            .max_delay(Duration::from_millis(80))
            .without_jitter();

        let _: Result<(), String> = retry_with_backoff(
            || {
                let calls = seen.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("down".to_string())
                }
            },
            config,
        )
        .await;

        // 40ms + 80ms + 80ms (capped), allowing scheduler slack
        assert!(started.elapsed() >= Duration::from_millis(180));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn jitter_stays_within_half_and_full() {
        let delay = Duration::from_millis(1000);
        for _ in 0..20 {
            let wait = jittered(delay);
            assert!(wait >= Duration::from_millis(500));
            assert!(wait <= delay);
        }
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = RetryConfig::new()
            .max_retries(5)
            .base_delay(Duration::from_millis(200))
            .max_delay(Duration::from_secs(10))
            .without_jitter();

        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay, Duration::from_millis(200));
        assert_eq!(config.max_delay, Duration::from_secs(10));
        assert!(!config.jitter);
    }
}
