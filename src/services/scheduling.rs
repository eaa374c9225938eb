use std::sync::Arc;

use crate::db::BookingStore;
use crate::errors::{BookingError, ValidationError};
use crate::models::{Booking, BookingForm, BookingView, NewBooking, Slot};
use crate::services::auth::AdminGrant;
use crate::services::calendar::{self, Clock};

/// Booking rules over a store. Holds no booking state between calls.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Required fields, then date format, then the calendar rules, then the slot.
    fn validate(&self, form: &BookingForm) -> Result<NewBooking, ValidationError> {
        let (Some(name), Some(service), Some(date), Some(time)) = (
            required(&form.name),
            required(&form.service),
            required(&form.date),
            required(&form.time),
        ) else {
            return Err(ValidationError::MissingFields);
        };

        let date = calendar::parse_date(date)?;
        calendar::check_date(date, self.clock.today())?;
        let time = Slot::parse(time).ok_or(ValidationError::InvalidTime)?;

        Ok(NewBooking {
            name: name.to_string(),
            service: service.to_string(),
            date,
            time,
        })
    }

    pub fn create(&self, form: &BookingForm) -> Result<Booking, BookingError> {
        let new = self.validate(form)?;

        if let Some(existing) = self.store.find_by_slot(new.date, new.time)? {
            tracing::warn!(
                date = %new.date,
                time = %new.time,
                existing_id = existing.id,
                "slot already booked"
            );
            return Err(BookingError::Conflict {
                date: new.date,
                time: new.time,
            });
        }

        // the unique constraint still catches a concurrent insert that won the race
        let booking = self
            .store
            .insert(&new)
            .map_err(|e| logged(BookingError::from_store(e, new.date, new.time)))?;

        tracing::info!(
            id = booking.id,
            date = %booking.date,
            time = %booking.time,
            "booking created"
        );
        Ok(booking)
    }

    pub fn get(&self, _grant: &AdminGrant, id: i64) -> Result<Booking, BookingError> {
        self.store.find_by_id(id)?.ok_or(BookingError::NotFound(id))
    }

    pub fn update(
        &self,
        _grant: &AdminGrant,
        id: i64,
        form: &BookingForm,
    ) -> Result<Booking, BookingError> {
        let new = self.validate(form)?;

        if let Some(other) = self.store.find_by_slot_excluding(new.date, new.time, id)? {
            tracing::warn!(
                id,
                other_id = other.id,
                date = %new.date,
                time = %new.time,
                "update collides with another booking"
            );
            return Err(BookingError::Conflict {
                date: new.date,
                time: new.time,
            });
        }

        if self.store.find_by_id(id)?.is_none() {
            return Err(BookingError::NotFound(id));
        }

        let booking = new.with_id(id);
        self.store
            .update(&booking)
            .map_err(|e| logged(BookingError::from_store(e, booking.date, booking.time)))?;

        tracing::info!(id, date = %booking.date, time = %booking.time, "booking updated");
        Ok(booking)
    }

    pub fn delete(&self, _grant: &AdminGrant, id: i64) -> Result<(), BookingError> {
        if self.store.find_by_id(id)?.is_none() {
            return Err(BookingError::NotFound(id));
        }

        self.store
            .delete(id)
            .map_err(|e| logged(BookingError::from(e)))?;

        tracing::info!(id, "booking deleted");
        Ok(())
    }

    /// Canonical slots not yet taken on `date`, earliest first. Weekend and
    /// past dates are answered like any other.
    pub fn available_slots(&self, date: &str) -> Result<Vec<Slot>, BookingError> {
        let date = calendar::parse_date(date.trim())?;
        let booked = self.store.booked_times(date)?;

        Ok(Slot::all()
            .filter(|slot| !booked.iter().any(|t| *t == slot.to_string()))
            .collect())
    }

    pub fn list(&self) -> Result<Vec<BookingView>, BookingError> {
        let rows = self.store.list_all().map_err(|e| logged(e.into()))?;
        Ok(rows.into_iter().map(BookingView::from).collect())
    }
}

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn logged(err: BookingError) -> BookingError {
    if let BookingError::Persistence(detail) = &err {
        tracing::error!(error = %detail, "booking store failure");
    }
    err
}
