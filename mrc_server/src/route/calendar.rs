pub mod events;
pub mod info;
pub mod next;

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, FixedOffset, Utc};
use mrc_core::{
    calendar::WasteCalendar, ical::generator::Emitter, ics::to_ical, min_renovasjon::MinRenovasjon,
};
use serde::Deserialize;

pub type SharedCalendar = Arc<WasteCalendar<MinRenovasjon>>;

/// The bounds of a requested range in RFC 3339, e.g. `2024-06-10T00:00:00Z`.
///
/// A `+` in an offset has to be sent as `%2B`.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeQueryParams {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// A range which may be left out, but not halfway.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionalRangeQueryParams {
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
}

/// Handle calendar requests.
///
/// Without `start` and `end` in the query string the events of the last refresh are served,
/// with them the calendar is refreshed and only the overlapping events are served. A range
/// with only one bound or an unreadable bound is rejected.
pub async fn handler(
    State(calendar): State<SharedCalendar>,
    range: Result<Query<OptionalRangeQueryParams>, QueryRejection>,
) -> Result<Response, (StatusCode, String)> {
    let Query(range) = range.map_err(|rejection| (StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let events = match (range.start, range.end) {
        (Some(start), Some(end)) => calendar.get_events(&start, &end).await,
        (None, None) => calendar.events(),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                String::from("a range needs both start and end"),
            ))
        }
    };
    let location = calendar.source().address().location();
    let ical_calendar = to_ical(&events, calendar.timezone(), &location, Utc::now());
    let response = ([(CONTENT_TYPE, "text/calendar")], ical_calendar.generate()).into_response();
    Ok(response)
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::{
        extract::{Query, State},
        http::{header::CONTENT_TYPE, StatusCode, Uri},
    };
    use chrono::{TimeZone, Utc};
    use mrc_core::{
        calendar::{CalendarConfig, WasteCalendar},
        chrono_tz::Europe::Oslo,
        min_renovasjon::{Address, MinRenovasjon},
    };

    use super::*;

    /// A calendar whose source can never be reached.
    pub(crate) fn get_test_calendar() -> SharedCalendar {
        let address = Address {
            municipality_code: "3005".to_string(),
            street_name: "Storgata".to_string(),
            street_code: "12345".to_string(),
            house_number: "1".to_string(),
        };
        Arc::new(WasteCalendar::new(
            MinRenovasjon::with_proxy_url(address, "http://127.0.0.1:9/proxyserver.ashx"),
            CalendarConfig::new("test", Oslo),
        ))
    }

    #[test]
    fn test_range_query_params() {
        let uri: Uri = "http://localhost/calendar?start=2024-06-10T00:00:00Z&end=2024-06-11T08:00:00%2B02:00"
            .parse()
            .unwrap();
        let Query(range) = Query::<RangeQueryParams>::try_from_uri(&uri).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 6, 11, 6, 0, 0).unwrap());
    }

    fn calendar_query(query: &str) -> Result<Query<OptionalRangeQueryParams>, QueryRejection> {
        let uri: Uri = format!("http://localhost/calendar{query}").parse().unwrap();
        Query::try_from_uri(&uri)
    }

    #[tokio::test]
    async fn test_handler_serves_ical() {
        let response = handler(State(get_test_calendar()), calendar_query(""))
            .await
            .ok()
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/calendar");
    }

    #[tokio::test]
    async fn test_handler_with_unreachable_source() {
        let calendar = get_test_calendar();
        let response = handler(
            State(calendar.clone()),
            calendar_query("?start=2024-06-10T00:00:00Z&end=2024-06-11T00:00:00%2B02:00"),
        )
        .await
        .ok()
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(calendar.events().is_empty());
    }

    #[tokio::test]
    async fn test_handler_rejects_partial_range() {
        for query in ["?start=2024-06-10T00:00:00%2B02:00", "?end=2024-06-11T00:00:00Z"] {
            let status = handler(State(get_test_calendar()), calendar_query(query))
                .await
                .err()
                .map(|(status, _)| status);
            assert_eq!(status, Some(StatusCode::BAD_REQUEST), "{query}");
        }
    }

    #[tokio::test]
    async fn test_handler_rejects_unreadable_range() {
        for query in [
            "?start=garbage&end=x",
            // an unescaped `+` arrives as a space
            "?start=2024-06-10T00:00:00+02:00&end=2024-06-11T00:00:00+02:00",
        ] {
            let status = handler(State(get_test_calendar()), calendar_query(query))
                .await
                .err()
                .map(|(status, _)| status);
            assert_eq!(status, Some(StatusCode::BAD_REQUEST), "{query}");
        }
    }
}
