//! Self-expiring notification flags for suppressing repeated alerts.
//!
//! A [`NotificationFlag`] is raised when a condition is first reported and
//! checked before the condition is reported again. A flag carrying a timeout
//! expires lazily: the query that observes `now >= set_at + timeout` clears
//! it, so no timer or background task is involved.
//!
//! Flags are single-owner. Callers sharing one across threads must guard it
//! together with the condition it tracks.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notification flag reference is absent")]
    InvalidReference,
}

/// A boolean condition marker with an optional wall-clock expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotificationFlag {
    active: bool,
    set_at: DateTime<Utc>,
    timeout: Duration,
}

impl NotificationFlag {
    /// Creates a cleared flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the flag back to its zeroed, cleared state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Raises the flag.
    ///
    /// `now` defaults to the wall clock. A zero `timeout` keeps the flag
    /// raised until [`unset`](Self::unset) is called.
    pub fn set(&mut self, now: Option<DateTime<Utc>>, timeout: Duration) {
        self.active = true;
        self.set_at = now.unwrap_or_else(Utc::now);
        self.timeout = timeout;
    }

    pub fn unset(&mut self) {
        self.reset();
    }

    /// Reports whether the flag is raised at `now` (wall clock if `None`).
    ///
    /// Observing an expired flag clears it.
    pub fn is_set(&mut self, now: Option<DateTime<Utc>>) -> bool {
        if self.timeout.is_zero() {
            return self.active;
        }

        let now = now.unwrap_or_else(Utc::now);
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.reset();
                false
            }
            _ => self.active,
        }
    }

    /// The instant the flag expires, or `None` if it never does.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        if self.timeout.is_zero() {
            return None;
        }
        // A timeout past the representable range never fires.
        let timeout = TimeDelta::from_std(self.timeout).ok()?;
        self.set_at.checked_add_signed(timeout)
    }

    pub fn set_at(&self) -> DateTime<Utc> {
        self.set_at
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Raises `flag`, failing only if the handle is absent.
pub fn set(
    flag: Option<&mut NotificationFlag>,
    now: Option<DateTime<Utc>>,
    timeout: Duration,
) -> Result<(), NotificationError> {
    let flag = flag.ok_or(NotificationError::InvalidReference)?;
    flag.set(now, timeout);
    Ok(())
}

/// Clears `flag`, failing only if the handle is absent.
pub fn unset(flag: Option<&mut NotificationFlag>) -> Result<(), NotificationError> {
    let flag = flag.ok_or(NotificationError::InvalidReference)?;
    flag.unset();
    Ok(())
}

/// Queries `flag`, applying lazy expiry. Fails only if the handle is absent.
pub fn is_set(
    flag: Option<&mut NotificationFlag>,
    now: Option<DateTime<Utc>>,
) -> Result<bool, NotificationError> {
    let flag = flag.ok_or(NotificationError::InvalidReference)?;
    Ok(flag.is_set(now))
}

/// The set of notification flags a process keeps, one per condition.
#[derive(Debug, Default)]
pub struct LogNotifications {
    flags: HashMap<String, NotificationFlag>,
}

impl LogNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every flag.
    pub fn init(&mut self) {
        self.flags.clear();
    }

    /// Returns the flag for `condition`, creating a cleared one if needed.
    pub fn flag_mut(&mut self, condition: &str) -> &mut NotificationFlag {
        self.flags.entry(condition.to_string()).or_default()
    }

    /// Returns the flag for `condition` if it has ever been touched.
    pub fn get_mut(&mut self, condition: &str) -> Option<&mut NotificationFlag> {
        self.flags.get_mut(condition)
    }

    /// Checks whether `condition` may be reported now.
    ///
    /// Returns `false` while the condition's flag is raised. Otherwise raises
    /// the flag for `timeout` and returns `true`. Adding a new condition first
    /// drops every flag that is no longer raised.
    pub fn should_emit(
        &mut self,
        condition: &str,
        now: Option<DateTime<Utc>>,
        timeout: Duration,
    ) -> bool {
        let now = now.unwrap_or_else(Utc::now);
        if !self.flags.contains_key(condition) {
            self.purge_expired(Some(now));
        }
        let flag = self.flag_mut(condition);
        if flag.is_set(Some(now)) {
            metrics::counter!("log_notifications_suppressed").increment(1);
            return false;
        }
        flag.set(Some(now), timeout);
        true
    }

    /// Removes flags that are cleared or have expired at `now`, returning how
    /// many were removed.
    pub fn purge_expired(&mut self, now: Option<DateTime<Utc>>) -> usize {
        let now = now.unwrap_or_else(Utc::now);
        let before = self.flags.len();
        self.flags.retain(|_, flag| flag.is_set(Some(now)));
        before - self.flags.len()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
