use axum::{extract::State, Json};
use serde::Serialize;

use crate::route::calendar::SharedCalendar;

#[derive(Debug, Serialize, PartialEq)]
pub struct CalendarInfo {
    name: String,
    unique_id: String,
}

pub async fn handler(State(calendar): State<SharedCalendar>) -> Json<CalendarInfo> {
    Json(CalendarInfo {
        name: calendar.name().to_string(),
        unique_id: calendar.unique_id(),
    })
}
