//! Booking persistence behind a trait, so the service can be exercised
//! against other backends.

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::Connection;

use super::{queries, StoreError, StoreResult};
use crate::models::{Booking, BookingRow, NewBooking, Slot};

pub trait BookingStore: Send + Sync {
    /// Persist a new booking and return it with its assigned id.
    fn insert(&self, booking: &NewBooking) -> StoreResult<Booking>;

    fn find_by_slot(&self, date: NaiveDate, time: Slot) -> StoreResult<Option<Booking>>;

    /// Like `find_by_slot`, ignoring the booking with `exclude_id`.
    fn find_by_slot_excluding(
        &self,
        date: NaiveDate,
        time: Slot,
        exclude_id: i64,
    ) -> StoreResult<Option<Booking>>;

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Booking>>;

    /// All rows in id order, as stored.
    fn list_all(&self) -> StoreResult<Vec<BookingRow>>;

    /// Raw time values already booked on `date`.
    fn booked_times(&self, date: NaiveDate) -> StoreResult<Vec<String>>;

    fn update(&self, booking: &Booking) -> StoreResult<()>;

    fn delete(&self, id: i64) -> StoreResult<()>;
}

/// SQLite-backed store. Every call runs a single statement under the lock.
pub struct SqliteBookingStore {
    conn: Mutex<Connection>,
}

impl SqliteBookingStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl BookingStore for SqliteBookingStore {
    fn insert(&self, booking: &NewBooking) -> StoreResult<Booking> {
        queries::insert_booking(&*self.conn()?, booking)
    }

    fn find_by_slot(&self, date: NaiveDate, time: Slot) -> StoreResult<Option<Booking>> {
        queries::find_booking_by_slot(&*self.conn()?, date, time)
    }

    fn find_by_slot_excluding(
        &self,
        date: NaiveDate,
        time: Slot,
        exclude_id: i64,
    ) -> StoreResult<Option<Booking>> {
        queries::find_booking_by_slot_excluding(&*self.conn()?, date, time, exclude_id)
    }

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Booking>> {
        queries::get_booking_by_id(&*self.conn()?, id)
    }

    fn list_all(&self) -> StoreResult<Vec<BookingRow>> {
        queries::list_bookings(&*self.conn()?)
    }

    fn booked_times(&self, date: NaiveDate) -> StoreResult<Vec<String>> {
        queries::booked_times(&*self.conn()?, date)
    }

    fn update(&self, booking: &Booking) -> StoreResult<()> {
        queries::update_booking(&*self.conn()?, booking)
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        queries::delete_booking(&*self.conn()?, id)
    }
}
