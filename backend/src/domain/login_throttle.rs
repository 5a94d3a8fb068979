//! Per-username login failure throttle.
//!
//! After [`LoginThrottle::MAX_FAILURES`] consecutive failures inside the
//! window, further attempts for that username are refused until the window
//! measured from the first failure has elapsed. A successful login clears the
//! counter.
//!
//! Attempts are reserved with [`LoginThrottle::begin`] before any password
//! check runs. Reserved attempts count against the limit until they are
//! settled, so concurrent guesses cannot overshoot it. Keys are exact
//! usernames, matching the case-sensitive uniqueness of stored accounts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

#[derive(Debug, Clone, Copy)]
struct FailureWindow {
    started_at: DateTime<Utc>,
    failures: u32,
    in_flight: u32,
}

#[derive(Debug, Clone, Copy)]
enum Settlement {
    Succeeded,
    Failed,
    Released,
}

impl FailureWindow {
    fn is_idle(&self) -> bool {
        self.failures == 0 && self.in_flight == 0
    }
}

/// In-memory failure counter keyed by username.
pub struct LoginThrottle {
    clock: Arc<dyn Clock>,
    max_failures: u32,
    window: TimeDelta,
    entries: Mutex<HashMap<String, FailureWindow>>,
}

impl LoginThrottle {
    /// Failures tolerated before the account is throttled.
    pub const MAX_FAILURES: u32 = 5;
    /// Window length in minutes.
    pub const WINDOW_MINUTES: i64 = 15;

    /// Throttle with the default limits.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(
            clock,
            Self::MAX_FAILURES,
            TimeDelta::minutes(Self::WINDOW_MINUTES),
        )
    }

    pub fn with_limits(clock: Arc<dyn Clock>, max_failures: u32, window: TimeDelta) -> Self {
        Self {
            clock,
            max_failures,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Reserve a login attempt for `username`.
    ///
    /// Returns `None` when recorded failures plus attempts still in flight
    /// have reached the limit. The returned [`LoginAttempt`] must be settled
    /// with [`LoginAttempt::succeeded`] or [`LoginAttempt::failed`]; dropping
    /// it unsettled releases the reservation without counting a failure.
    pub fn begin(&self, username: &str) -> Option<LoginAttempt<'_>> {
        let now = self.clock.utc();
        let mut entries = self.lock();
        self.prune(&mut entries, now);
        let entry = entries.entry(username.to_owned()).or_insert(FailureWindow {
            started_at: now,
            failures: 0,
            in_flight: 0,
        });
        if now - entry.started_at >= self.window {
            entry.started_at = now;
            entry.failures = 0;
        }
        if entry.failures.saturating_add(entry.in_flight) >= self.max_failures {
            return None;
        }
        entry.in_flight += 1;
        Some(LoginAttempt {
            throttle: self,
            username: username.to_owned(),
            settled: false,
        })
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.lock().len()
    }

    fn settle(&self, username: &str, outcome: Settlement) {
        let now = self.clock.utc();
        let mut entries = self.lock();
        if let Some(entry) = entries.get_mut(username) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
            match outcome {
                Settlement::Succeeded => entry.failures = 0,
                Settlement::Failed => {
                    if entry.failures == 0 || now - entry.started_at >= self.window {
                        entry.started_at = now;
                        entry.failures = 0;
                    }
                    entry.failures = entry.failures.saturating_add(1);
                }
                Settlement::Released => {}
            }
        }
        self.prune(&mut entries, now);
    }

    // Drops idle entries and windows that have run out with nothing in flight.
    fn prune(&self, entries: &mut HashMap<String, FailureWindow>, now: DateTime<Utc>) {
        entries.retain(|_, entry| {
            if entry.in_flight > 0 {
                return true;
            }
            !entry.is_idle() && now - entry.started_at < self.window
        });
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, FailureWindow>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A reserved login attempt. See [`LoginThrottle::begin`].
#[must_use = "an unsettled attempt is released without counting"]
pub struct LoginAttempt<'a> {
    throttle: &'a LoginThrottle,
    username: String,
    settled: bool,
}

impl LoginAttempt<'_> {
    /// Credentials matched; the failure counter is cleared.
    pub fn succeeded(mut self) {
        self.settled = true;
        self.throttle.settle(&self.username, Settlement::Succeeded);
    }

    /// Credentials were wrong; the reservation becomes a recorded failure.
    pub fn failed(mut self) {
        self.settled = true;
        self.throttle.settle(&self.username, Settlement::Failed);
    }
}

impl Drop for LoginAttempt<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.throttle.settle(&self.username, Settlement::Released);
        }
    }
}
