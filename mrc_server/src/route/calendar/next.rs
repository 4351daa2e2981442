use axum::{extract::State, Json};
use mrc_core::event::CalendarEvent;

use crate::route::calendar::SharedCalendar;

/// The next upcoming event of the last refresh, `null` if there is none.
pub async fn handler(State(calendar): State<SharedCalendar>) -> Json<Option<CalendarEvent>> {
    Json(calendar.event())
}
