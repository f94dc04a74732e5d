use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// UTC offset used when no config overrides it (UTC+9).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Fixed-width storage format for calendar dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a date string was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("date is required")]
    Missing,
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Source of the current instant.
pub trait Clock {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Reference zone
// ---------------------------------------------------------------------------

/// The fixed time zone all "today" comparisons are made in.
///
/// Host local time is never consulted, so two machines in different zones
/// agree on which tasks are due today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefZone {
    offset: FixedOffset,
}

impl RefZone {
    /// Zone at `hours` east of UTC. Returns None outside +/-23 hours.
    pub fn from_hours(hours: i32) -> Option<RefZone> {
        if !(-23..=23).contains(&hours) {
            return None;
        }
        FixedOffset::east_opt(hours * 3600).map(|offset| RefZone { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Current instant expressed in this zone
    pub fn now(&self, clock: &dyn Clock) -> DateTime<FixedOffset> {
        clock.now_utc().with_timezone(&self.offset)
    }

    /// Current calendar date in this zone
    pub fn today(&self, clock: &dyn Clock) -> NaiveDate {
        self.now(clock).date_naive()
    }
}

impl Default for RefZone {
    fn default() -> Self {
        RefZone::from_hours(DEFAULT_UTC_OFFSET_HOURS).unwrap_or(RefZone { offset: Utc.fix() })
    }
}

// ---------------------------------------------------------------------------
// String conversion
// ---------------------------------------------------------------------------

/// Format a date as zero-padded `YYYY-MM-DD`.
pub fn date_to_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// Only the fixed-width zero-padded form is accepted so that every stored
/// string sorts lexicographically in chronological order.
pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DateError::Missing);
    }
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(DateError::Malformed(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| DateError::Malformed(s.to_string()))
}
