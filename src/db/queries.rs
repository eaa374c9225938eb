use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::{StoreError, StoreResult};
use crate::models::{Booking, BookingRow, NewBooking, Slot};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ── Bookings ──

pub fn insert_booking(conn: &Connection, booking: &NewBooking) -> StoreResult<Booking> {
    let date = booking.date.format(DATE_FORMAT).to_string();

    conn.execute(
        "INSERT INTO bookings (name, service, date, time) VALUES (?1, ?2, ?3, ?4)",
        params![booking.name, booking.service, date, booking.time.to_string()],
    )
    .map_err(map_constraint)?;

    Ok(booking.clone().with_id(conn.last_insert_rowid()))
}

pub fn find_booking_by_slot(
    conn: &Connection,
    date: NaiveDate,
    time: Slot,
) -> StoreResult<Option<Booking>> {
    let date = date.format(DATE_FORMAT).to_string();
    let row = conn
        .query_row(
            "SELECT id, name, service, date, time FROM bookings WHERE date = ?1 AND time = ?2",
            params![date, time.to_string()],
            read_row,
        )
        .optional()?;

    row.map(parse_booking_row).transpose()
}

pub fn find_booking_by_slot_excluding(
    conn: &Connection,
    date: NaiveDate,
    time: Slot,
    exclude_id: i64,
) -> StoreResult<Option<Booking>> {
    let date = date.format(DATE_FORMAT).to_string();
    let row = conn
        .query_row(
            "SELECT id, name, service, date, time FROM bookings
             WHERE date = ?1 AND time = ?2 AND id != ?3",
            params![date, time.to_string(), exclude_id],
            read_row,
        )
        .optional()?;

    row.map(parse_booking_row).transpose()
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> StoreResult<Option<Booking>> {
    let row = conn
        .query_row(
            "SELECT id, name, service, date, time FROM bookings WHERE id = ?1",
            params![id],
            read_row,
        )
        .optional()?;

    row.map(parse_booking_row).transpose()
}

pub fn list_bookings(conn: &Connection) -> StoreResult<Vec<BookingRow>> {
    let mut stmt = conn.prepare("SELECT id, name, service, date, time FROM bookings ORDER BY id ASC")?;
    let rows = stmt.query_map([], read_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn booked_times(conn: &Connection, date: NaiveDate) -> StoreResult<Vec<String>> {
    let date = date.format(DATE_FORMAT).to_string();
    let mut stmt = conn.prepare("SELECT time FROM bookings WHERE date = ?1")?;
    let rows = stmt.query_map(params![date], |row| row.get::<_, String>(0))?;

    let mut times = vec![];
    for row in rows {
        times.push(row?);
    }
    Ok(times)
}

pub fn update_booking(conn: &Connection, booking: &Booking) -> StoreResult<()> {
    let date = booking.date.format(DATE_FORMAT).to_string();
    let count = conn
        .execute(
            "UPDATE bookings SET name = ?1, service = ?2, date = ?3, time = ?4 WHERE id = ?5",
            params![
                booking.name,
                booking.service,
                date,
                booking.time.to_string(),
                booking.id,
            ],
        )
        .map_err(map_constraint)?;

    if count == 0 {
        return Err(StoreError::NotFound(booking.id));
    }
    Ok(())
}

pub fn delete_booking(conn: &Connection, id: i64) -> StoreResult<()> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    if count == 0 {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}

fn read_row(row: &rusqlite::Row) -> rusqlite::Result<BookingRow> {
    Ok(BookingRow {
        id: row.get(0)?,
        name: row.get(1)?,
        service: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
    })
}

fn parse_booking_row(row: BookingRow) -> StoreResult<Booking> {
    let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
        .map_err(|_| StoreError::Corrupt(format!("booking {} has date {:?}", row.id, row.date)))?;
    let time = Slot::parse(&row.time)
        .ok_or_else(|| StoreError::Corrupt(format!("booking {} has time {:?}", row.id, row.time)))?;

    Ok(Booking {
        id: row.id,
        name: row.name,
        service: row.service,
        date,
        time,
    })
}

fn map_constraint(err: rusqlite::Error) -> StoreError {
    let unique = matches!(
        &err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    );

    if unique {
        StoreError::SlotTaken
    } else {
        StoreError::Database(err)
    }
}
