//! Timestamp type for lockup expirations.
//!
//! Timestamps are Unix epoch seconds (UTC), as returned by the voting
//! contract's lockup `end` field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero). An aggregate with no lockups reports this.
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds remaining until this timestamp (0 if already passed).
    pub fn secs_until(&self, now: Timestamp) -> u64 {
        self.0.saturating_sub(now.0)
    }

    /// Whole days remaining until this timestamp (0 if already passed).
    pub fn days_until(&self, now: Timestamp) -> u64 {
        self.secs_until(now) / 86_400
    }

    /// Whether this timestamp has passed relative to `now`.
    pub fn has_passed(&self, now: Timestamp) -> bool {
        now.0 >= self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_until_saturates() {
        let past = Timestamp::new(100);
        let now = Timestamp::new(500);
        assert_eq!(past.secs_until(now), 0);
        assert_eq!(now.secs_until(past), 400);
    }

    #[test]
    fn days_until_whole_days() {
        let now = Timestamp::new(0);
        assert_eq!(Timestamp::new(86_400 * 3 + 100).days_until(now), 3);
        assert_eq!(Timestamp::new(100).days_until(now), 0);
    }

    #[test]
    fn has_passed_boundary() {
        let t = Timestamp::new(1000);
        assert!(t.has_passed(Timestamp::new(1000)));
        assert!(t.has_passed(Timestamp::new(1001)));
        assert!(!t.has_passed(Timestamp::new(999)));
    }
}
