//! Render calendar events as an iCalendar document.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, IcalEventBuilder, Property},
    ical_property,
};

use crate::event::CalendarEvent;

static PROD_ID: &str = "-//Min Renovasjon//norkart.no";
static FORMAT: &str = "%Y%m%d";

/// Build the calendar of all events at a location.
pub fn to_ical(
    events: &[CalendarEvent],
    timezone: &Tz,
    location: &str,
    now: DateTime<Utc>,
) -> IcalCalendar {
    let changed = now.format("%Y%m%dT%H%M%SZ").to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(PROD_ID)
        .build();
    calendar.events = events
        .iter()
        .map(|event| to_ical_event(event, timezone, location, &changed))
        .collect();
    calendar
}

/// Build an all-day event on the local date the event starts.
fn to_ical_event(
    event: &CalendarEvent,
    timezone: &Tz,
    location: &str,
    changed: &str,
) -> IcalEvent {
    let date = event.start.with_timezone(timezone).format(FORMAT).to_string();
    IcalEventBuilder::tzid(timezone.name())
        .uid(uid(location, &event.summary, &date))
        .changed(changed)
        .one_day(date)
        .set(ical_property!("SUMMARY", &event.summary))
        .set(ical_property!("DESCRIPTION", &event.description))
        .set(ical_property!("LOCATION", location))
        .set(ical_property!("TRANSP", "TRANSPARENT"))
        .build()
}

/// Get a unique id for a specific pickup at a specific location.
///
/// Changing this function is a breaking change!
fn uid(location: &str, summary: &str, date: &str) -> String {
    let collapse = |value: &str| value.split_whitespace().collect::<Vec<_>>().join("-");
    format!(
        "MinRenovasjon_{}_{}_{date}@norkart.no",
        collapse(location),
        collapse(summary)
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Europe::Oslo;
    use ical::generator::{Emitter, IcalCalendar};

    use crate::{
        event::CalendarEvent,
        ics::{to_ical, uid},
    };

    fn get_property_values<'a>(calendar: &'a IcalCalendar, property_name: &str) -> Vec<&'a str> {
        calendar
            .events
            .iter()
            .filter_map(|event| {
                event
                    .properties
                    .iter()
                    .find(|property| property.name == property_name)
                    .and_then(|property| property.value.as_deref())
            })
            .collect()
    }

    fn get_test_events() -> Vec<CalendarEvent> {
        ["2024-06-10", "2024-06-24"]
            .into_iter()
            .map(|date| {
                CalendarEvent::local_day("Plast", NaiveDate::from_str(date).unwrap(), &Oslo)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_to_ical() {
        let now = Utc.with_ymd_and_hms(2024, 6, 9, 10, 0, 0).unwrap();
        let calendar = to_ical(&get_test_events(), &Oslo, "Storgata 1", now);
        assert_eq!(calendar.events.len(), 2);
        // The start is 22:00 UTC on the day before, the local date must win.
        assert_eq!(get_property_values(&calendar, "DTSTART"), vec!["20240610", "20240624"]);
        assert_eq!(
            get_property_values(&calendar, "SUMMARY"),
            vec!["Plast tømming", "Plast tømming"]
        );
        assert_eq!(
            get_property_values(&calendar, "UID"),
            vec![
                "MinRenovasjon_Storgata-1_Plast-tømming_20240610@norkart.no",
                "MinRenovasjon_Storgata-1_Plast-tømming_20240624@norkart.no",
            ]
        );
        let generated = calendar.generate();
        assert!(generated.contains("PRODID:-//Min Renovasjon//norkart.no"));
        assert!(generated.contains("DESCRIPTION:Tømming av Plast"));
    }

    #[test]
    fn test_to_ical_empty() {
        let calendar = to_ical(&[], &Oslo, "Storgata 1", Utc::now());
        assert!(calendar.events.is_empty());
    }

    #[test]
    fn test_uid_collapses_whitespace() {
        assert_eq!(
            uid("Kongens  gate 3", "Farlig avfall tømming", "20240610"),
            "MinRenovasjon_Kongens-gate-3_Farlig-avfall-tømming_20240610@norkart.no"
        );
    }
}
