//! Wall-clock access.
//!
//! The reward machine never calls `Utc::now()` directly so that day
//! rollovers can be exercised deterministically.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Local, Utc};

/// Format used for `lastResetDate`, e.g. `Fri Oct 16 2026`.
pub const DAY_FORMAT: &str = "%a %b %d %Y";

pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The user-local calendar day as a string, compared by equality.
    fn today(&self) -> String;
}

/// Clock backed by the system time in the user's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> String {
        Local::now().format(DAY_FORMAT).to_string()
    }
}

/// Manually driven clock. Clones share the same instant.
///
/// Days are computed in UTC so results do not depend on the host time zone.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(at)),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> String {
        self.now.get().format(DAY_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_formats_day_like_a_date_string() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap());
        assert_eq!(clock.today(), "Fri Oct 16 2026");
    }

    #[test]
    fn clones_share_the_same_instant() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 23, 59, 0).unwrap());
        let other = clock.clone();
        clock.advance(Duration::minutes(2));
        assert_eq!(other.today(), "Sat Oct 17 2026");
    }
}
