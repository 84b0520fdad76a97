use std::{fmt::Display, future::Future, time::Duration};

/// How many times a failed call is repeated, and how long to wait in between.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> usize {
        self.retries + 1
    }
}

/// Terminal failure of [`retry`]: the last error and how many attempts were made.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: usize,
    pub error: E,
}

/// Runs `job` until it succeeds, `should_retry` rejects the error, or the
/// policy's attempts are used up. `job` receives the 1-based attempt number.
pub async fn retry<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    should_retry: R,
    mut job: F,
) -> Result<T, Exhausted<E>>
where
    E: Display,
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match job(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < attempts && should_retry(&error) => {
                tracing::warn!(attempt, attempts, %error, "attempt failed, retrying");
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
            Err(error) => return Err(Exhausted { attempts: attempt, error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    async fn flaky(calls: &AtomicUsize, failures: usize) -> Result<&'static str, String> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n < failures {
            Err(format!("failure {n}"))
        } else {
            Ok("ok")
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicUsize::new(0);
        let result = retry(&RetryPolicy::default(), |_| true, |_| flaky(&calls, 2)).await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let calls = AtomicUsize::new(0);
        let err = retry(&RetryPolicy::default(), |_| true, |_| flaky(&calls, 10))
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 4);
        assert_eq!(err.error, "failure 3");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_stops_on_fatal_error() {
        let calls = AtomicUsize::new(0);
        let err = retry(&RetryPolicy::default(), |_| false, |_| flaky(&calls, 10))
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attempt_numbers() {
        let seen = std::sync::Mutex::new(Vec::new());
        let policy = RetryPolicy {
            retries: 2,
            delay: Duration::from_millis(1),
        };
        let _ = retry(&policy, |_: &String| true, |attempt| {
            seen.lock().unwrap().push(attempt);
            async { Err::<(), _>("nope".to_string()) }
        })
        .await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
}
