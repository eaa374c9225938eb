use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::slot::{display_time, Slot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub name: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: Slot,
}

/// A validated booking that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub service: String,
    pub date: NaiveDate,
    pub time: Slot,
}

impl NewBooking {
    pub fn with_id(self, id: i64) -> Booking {
        Booking {
            id,
            name: self.name,
            service: self.service,
            date: self.date,
            time: self.time,
        }
    }
}

/// Raw booking fields as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingForm {
    pub name: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

impl BookingForm {
    pub fn new(name: &str, service: &str, date: &str, time: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            service: Some(service.to_string()),
            date: Some(date.to_string()),
            time: Some(time.to_string()),
        }
    }
}

/// A bookings row exactly as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRow {
    pub id: i64,
    pub name: String,
    pub service: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub id: i64,
    pub name: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub time_display: String,
}

impl From<BookingRow> for BookingView {
    fn from(row: BookingRow) -> Self {
        let time_display = display_time(&row.time);
        Self {
            id: row.id,
            name: row.name,
            service: row.service,
            date: row.date,
            time: row.time,
            time_display,
        }
    }
}
