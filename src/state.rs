use crate::services::auth::AdminSessions;
use crate::services::scheduling::BookingService;

pub struct AppState {
    pub bookings: BookingService,
    pub sessions: AdminSessions,
}
