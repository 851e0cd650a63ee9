//! Calendar source for validation rules.
//!
//! Validation never reads the wall clock directly; it asks a `Clock`, so
//! tests can pin the current year.

use chrono::{Datelike, Local};

/// Supplies the current calendar year.
pub trait Clock {
    fn current_year(&self) -> i32;
}

/// Wall-clock year in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Local::now().year()
    }
}

/// Always reports the same year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock};

    #[test]
    fn fixed_clock_reports_pinned_year() {
        assert_eq!(FixedClock(2031).current_year(), 2031);
    }

    #[test]
    fn system_clock_is_after_epoch_of_this_code() {
        assert!(SystemClock.current_year() >= 2024);
    }
}
