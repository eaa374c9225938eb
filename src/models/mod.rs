pub mod booking;
pub mod slot;

pub use booking::{Booking, BookingForm, BookingRow, BookingView, NewBooking};
pub use slot::{display_time, Slot};
