//! Turn pickup entries into day-long calendar events and query them.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, error};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    pickup::PickupEntry,
};

/// How far, in quarter hours, a missing local midnight is searched forward.
static MIDNIGHT_GAP_STEPS: i64 = 12;

/// A calendar event spanning exactly one local day, stored in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarEvent {
    /// Build the pickup event of a fraction on a specific local date.
    pub fn local_day(fraction_name: &str, date: NaiveDate, timezone: &Tz) -> Result<Self> {
        let next_day = date.succ_opt().ok_or(Error::DateOutOfRange(date))?;
        Ok(Self {
            summary: format!("{fraction_name} tømming"),
            description: format!("Tømming av {fraction_name}"),
            start: start_of_local_day(date, timezone)?,
            end: start_of_local_day(next_day, timezone)?,
        })
    }

    /// Whether this event shares at least one instant with `[start, end]`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        (start <= self.start && self.start <= end)
            || (start <= self.end && self.end <= end)
            || (self.start <= start && end <= self.end)
    }
}

/// The first instant of a local date, normalized to UTC.
///
/// An ambiguous midnight resolves to the earlier instant, a skipped one to the first
/// quarter hour of the day which exists.
pub fn start_of_local_day(date: NaiveDate, timezone: &Tz) -> Result<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or(Error::NonexistentLocalTime(date))?;
    (0..=MIDNIGHT_GAP_STEPS)
        .map(|step| midnight + Duration::minutes(15 * step))
        .find_map(|local| timezone.from_local_datetime(&local).earliest())
        .map(|datetime| datetime.with_timezone(&Utc))
        .ok_or(Error::NonexistentLocalTime(date))
}

/// Build the events of all entries, sorted by start.
///
/// Null entries are skipped, dates which fail to build are logged and skipped, and dates
/// before the local date of `now` produce nothing.
pub fn build_events<I>(entries: I, timezone: &Tz, now: DateTime<Utc>) -> Vec<CalendarEvent>
where
    I: IntoIterator<Item = Option<PickupEntry>>,
{
    let today = now.with_timezone(timezone).date_naive();
    let mut events: Vec<CalendarEvent> = vec![];
    for entry in entries.into_iter().flatten() {
        for date in entry.dates().filter(|date| *date >= today) {
            match CalendarEvent::local_day(&entry.fraction_name, date, timezone) {
                Ok(event) => events.push(event),
                Err(err) => error!("skipping {date} of pickup entry {entry:?}: {err}"),
            }
        }
    }
    events.sort_by_key(|event| event.start);
    debug!("built {} calendar events", events.len());
    events
}

/// All events overlapping `[start, end]`, in their original order.
pub fn filter_events<S: TimeZone, E: TimeZone>(
    events: &[CalendarEvent],
    start: &DateTime<S>,
    end: &DateTime<E>,
) -> Vec<CalendarEvent> {
    let start = start.with_timezone(&Utc);
    let end = end.with_timezone(&Utc);
    events
        .iter()
        .filter(|event| event.overlaps(start, end))
        .cloned()
        .collect()
}

/// The earliest event which has not started before `now`.
pub fn next_event(events: &[CalendarEvent], now: DateTime<Utc>) -> Option<&CalendarEvent> {
    events
        .iter()
        .filter(|event| event.start >= now)
        .min_by_key(|event| event.start)
}
