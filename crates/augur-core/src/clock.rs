//! Update start times anchored to the session's start day.
//!
//! The major update begins at 04:00 UTC and the minor at 16:00 UTC. Elapsed
//! times are always measured from the epochs of the UTC day the session
//! started on, not from the day of the event being measured. An event just
//! after midnight in a session started the previous day is therefore
//! measured against the previous day's epoch and comes out a full day late.
//! A reload does not move these epochs; a session that crosses midnight
//! must be restarted to measure against the new day.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::mode::Mode;

const SECONDS_PER_HOUR: i64 = 3600;

/// Fixed reference points for measuring how far into an update an event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    started_at: DateTime<Utc>,
    midnight: i64,
}

impl SessionClock {
    /// Anchor a clock to the day containing `started_at`.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        let day: NaiveDate = started_at.date_naive();
        Self {
            started_at,
            midnight: day.and_time(NaiveTime::MIN).and_utc().timestamp(),
        }
    }

    /// Anchor a clock to the current instant.
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// When the session started.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Unix timestamp at which `mode` starts on the session's day.
    pub const fn epoch(&self, mode: Mode) -> i64 {
        self.midnight
            .saturating_add(SECONDS_PER_HOUR.saturating_mul(mode.start_hour()))
    }

    /// Seconds between the start of `mode` and the event at `timestamp`.
    pub const fn elapsed(&self, timestamp: i64, mode: Mode) -> i64 {
        timestamp.saturating_sub(self.epoch(mode))
    }

    /// The update an operator starting now most likely cares about.
    ///
    /// Anything before 16:00 UTC is treated as the major update.
    pub fn default_mode(&self) -> Mode {
        if self.started_at.timestamp() < self.epoch(Mode::Minor) {
            Mode::Major
        } else {
            Mode::Minor
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn epochs_follow_start_day() {
        let clock = SessionClock::new(at(2024, 3, 9, 10, 30, 0));
        assert_eq!(clock.epoch(Mode::Major), at(2024, 3, 9, 4, 0, 0).timestamp());
        assert_eq!(clock.epoch(Mode::Minor), at(2024, 3, 9, 16, 0, 0).timestamp());
    }

    #[test]
    fn elapsed_from_epoch() {
        let clock = SessionClock::new(at(2024, 3, 9, 3, 59, 0));
        let event = at(2024, 3, 9, 5, 1, 40).timestamp();
        assert_eq!(clock.elapsed(event, Mode::Major), 3700);
        assert_eq!(clock.elapsed(event, Mode::Minor), -39_500);
    }

    #[test]
    fn default_mode_switches_at_sixteen() {
        assert_eq!(
            SessionClock::new(at(2024, 3, 9, 15, 59, 59)).default_mode(),
            Mode::Major
        );
        assert_eq!(
            SessionClock::new(at(2024, 3, 9, 16, 0, 0)).default_mode(),
            Mode::Minor
        );
        assert_eq!(
            SessionClock::new(at(2024, 3, 9, 0, 0, 1)).default_mode(),
            Mode::Major
        );
    }

    #[test]
    fn event_after_midnight_measured_from_session_day() {
        // Session started late on the 9th; the event is the next day's major.
        let clock = SessionClock::new(at(2024, 3, 9, 23, 58, 0));
        let event = at(2024, 3, 10, 4, 0, 30).timestamp();
        assert_eq!(clock.elapsed(event, Mode::Major), 86_430);

        let next_day = SessionClock::new(at(2024, 3, 10, 0, 0, 5));
        assert_eq!(next_day.elapsed(event, Mode::Major), 30);
    }
}
