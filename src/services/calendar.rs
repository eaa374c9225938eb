use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::errors::ValidationError;

/// Source of "today" for the booking rules.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The server's local calendar date.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = s.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(ValidationError::InvalidDate);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate)
}

/// Past dates are reported before weekends.
pub fn check_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        return Err(ValidationError::PastDate);
    }
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return Err(ValidationError::WeekendNotAllowed);
    }
    Ok(())
}

pub fn is_bookable(date: NaiveDate, today: NaiveDate) -> bool {
    check_date(date, today).is_ok()
}
