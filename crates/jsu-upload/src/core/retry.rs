use std::time::Duration;

/// Wait policy between a failed request and its retry.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use jsu_upload::Backoff;
///
/// let backoff = Backoff::Exponential {
///     base: Duration::from_millis(250),
///     max: Duration::from_secs(2),
/// };
/// assert_eq!(backoff.delay(1), Duration::from_millis(500));
/// assert_eq!(backoff.delay(6), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed(Duration),
    /// Doubles from `base` with each retry, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Default for Backoff {
    fn default() -> Self { Backoff::Fixed(Duration::from_millis(10_000)) }
}

impl Backoff {
    /// Delay before the retry that follows `retries` earlier ones.
    pub fn delay(&self, retries: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max } => base.saturating_mul(2_u32.saturating_pow(retries)).min(max),
        }
    }
}
