//! Attempt budget and pacing for timed-out requests.

use std::time::Duration;

/// Delay inserted between a timed-out attempt and the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Same pause after every timed-out attempt.
    Fixed { delay: Duration },
    /// Pause of `base * factor^n` after the n-th timeout (0-based), capped
    /// at `max`. A negative or non-finite product counts as no pause.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        /// Spread each pause uniformly over 50%..150% of its value.
        jitter: bool,
    },
}

impl Backoff {
    /// Delay after the failed attempt with 0-based index `attempt`.
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = base.as_secs_f64() * factor.powi(exponent);
                let capped_seconds = if seconds.is_finite() {
                    seconds.clamp(0.0, max.as_secs_f64())
                } else {
                    0.0
                };

                let mut delay = Duration::from_secs_f64(capped_seconds);

                if jitter {
                    let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    let jitter_ms = millis / 2;
                    let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                    delay = Duration::from_millis((millis - jitter_ms) + random_offset);
                }

                delay
            }
        }
    }
}

/// How many attempts a request gets and how they are paced.
///
/// Only timeouts consume extra attempts; every other failure is final.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Backoff::None)
    }
}

impl RetryPolicy {
    /// `max_attempts` below 1 is raised to 1.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Whether `attempt` (1-based) is the final one allowed.
    pub const fn is_last_attempt(&self, attempt: u32) -> bool {
        attempt >= self.max_attempts
    }

    /// Delay after the failed 1-based `attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt.saturating_sub(1))
    }
}
