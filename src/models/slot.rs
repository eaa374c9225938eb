use std::fmt;

use serde::{Deserialize, Serialize};

const FIRST_HOUR: u8 = 9;
const LAST_HOUR: u8 = 17;

/// One of the hourly appointment slots, 09:00 through 17:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot(u8);

impl Slot {
    pub fn from_hour(hour: u8) -> Option<Self> {
        (FIRST_HOUR..=LAST_HOUR).contains(&hour).then_some(Slot(hour))
    }

    /// Parses the `HH:00` form. Anything outside the canonical set is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let (hour, minute) = s.split_once(':')?;
        if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) || minute != "00" {
            return None;
        }
        let hour: u8 = hour.parse().ok()?;
        Self::from_hour(hour)
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        (FIRST_HOUR..=LAST_HOUR).map(Slot)
    }

    pub fn hour(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl TryFrom<String> for Slot {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Slot::parse(&s).ok_or_else(|| format!("invalid slot: {s}"))
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

/// 12-hour label for a stored `HH:MM` value, e.g. "09:00" -> "9 AM".
/// Values that don't carry a 0-23 hour come back unchanged.
pub fn display_time(raw: &str) -> String {
    let hour = raw
        .split(':')
        .next()
        .and_then(|h| h.trim().parse::<u32>().ok())
        .filter(|h| *h <= 23);

    match hour {
        Some(h) => twelve_hour_label(h),
        None => raw.to_string(),
    }
}

fn twelve_hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{hour} AM"),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}
