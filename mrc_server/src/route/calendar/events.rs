use axum::{
    extract::{Query, State},
    Json,
};
use mrc_core::event::CalendarEvent;

use crate::route::calendar::{RangeQueryParams, SharedCalendar};

/// Refresh the calendar and list the events overlapping the requested range.
pub async fn handler(
    State(calendar): State<SharedCalendar>,
    Query(range): Query<RangeQueryParams>,
) -> Json<Vec<CalendarEvent>> {
    Json(calendar.get_events(&range.start, &range.end).await)
}
