//! Retry policy: when an attempt should be repeated, how often and how late.

use std::ops::RangeInclusive;
use std::time::Duration;

/// Returns `true` if `status` falls within one of the inclusive `ranges`.
#[must_use]
pub fn should_retry_on_status(status: u16, ranges: &[RangeInclusive<u16>]) -> bool {
    ranges.iter().any(|range| range.contains(&status))
}

/// Returns `true` if any of `markers` occurs in `body` (case-sensitive).
#[must_use]
pub fn should_retry_on_text_marker<S: AsRef<str>>(body: &[u8], markers: &[S]) -> bool {
    markers
        .iter()
        .any(|marker| contains_bytes(body, marker.as_ref().as_bytes()))
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty()
        || haystack
            .windows(needle.len())
            .any(|window| window == needle)
}

/// Declarative retry configuration for a request.
///
/// Defaults: 3 attempts, 1ms between attempts, retry on any status in
/// `400..=600` and on bodies containing `error` or `Error`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tenacious_core::RetryPolicy;
///
/// let policy = RetryPolicy::default()
///     .with_attempts(5)
///     .with_delay(Duration::from_millis(200))
///     .with_status_ranges([500..=599])
///     .without_text_markers();
///
/// assert!(policy.retries_status(503));
/// assert!(!policy.retries_status(404));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub attempts: u32,
    /// Fixed delay between two attempts.
    pub delay: Duration,
    /// Inclusive status code ranges that trigger a retry.
    pub status_ranges: Vec<RangeInclusive<u16>>,
    /// Body substrings that trigger a retry.
    pub text_markers: Vec<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(1),
            status_ranges: vec![400..=600],
            text_markers: vec!["error".to_string(), "Error".to_string()],
        }
    }
}

impl RetryPolicy {
    /// A policy that sends exactly once and never retries.
    #[must_use]
    pub fn never() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
            status_ranges: Vec::new(),
            text_markers: Vec::new(),
        }
    }

    /// Set the total number of attempts.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the delay between attempts.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the retried status ranges.
    #[must_use]
    pub fn with_status_ranges(
        mut self,
        ranges: impl IntoIterator<Item = RangeInclusive<u16>>,
    ) -> Self {
        self.status_ranges = ranges.into_iter().collect();
        self
    }

    /// Replace the retried text markers.
    #[must_use]
    pub fn with_text_markers<S: Into<String>>(mut self, markers: impl IntoIterator<Item = S>) -> Self {
        self.text_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Never retry because of the body content.
    #[must_use]
    pub fn without_text_markers(mut self) -> Self {
        self.text_markers.clear();
        self
    }

    /// Effective number of attempts; always at least one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Whether `status` should be retried under this policy.
    #[must_use]
    pub fn retries_status(&self, status: u16) -> bool {
        should_retry_on_status(status, &self.status_ranges)
    }

    /// Whether `body` should be retried under this policy.
    #[must_use]
    pub fn retries_text(&self, body: &[u8]) -> bool {
        should_retry_on_text_marker(body, &self.text_markers)
    }
}
