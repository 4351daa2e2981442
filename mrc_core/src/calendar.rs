//! The waste calendar as seen by whoever hosts it.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::{error, info};

use crate::{
    error::Result,
    event::{build_events, filter_events, next_event, CalendarEvent},
    pickup::PickupSource,
};

pub static CALENDAR_NAME: &str = "Min Renovasjon";

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarConfig {
    /// The id of the configuration this calendar belongs to.
    pub entry_id: String,
    pub name: String,
    pub timezone: Tz,
}

impl CalendarConfig {
    pub fn new(entry_id: impl Into<String>, timezone: Tz) -> Self {
        CalendarConfig {
            entry_id: entry_id.into(),
            name: CALENDAR_NAME.to_string(),
            timezone,
        }
    }
}

/// A calendar of pickup events, refreshed from its source.
///
/// None of the refreshing or querying operations fail: errors are logged and the calendar
/// is left empty instead.
pub struct WasteCalendar<S> {
    source: S,
    config: CalendarConfig,
    events: RwLock<Vec<CalendarEvent>>,
}

impl<S: PickupSource> WasteCalendar<S> {
    pub fn new(source: S, config: CalendarConfig) -> Self {
        WasteCalendar {
            source,
            config,
            events: RwLock::new(vec![]),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn unique_id(&self) -> String {
        format!("{}_calendar", self.config.entry_id)
    }

    pub fn timezone(&self) -> &Tz {
        &self.config.timezone
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The events of the last refresh.
    pub fn events(&self) -> Vec<CalendarEvent> {
        self.read_events().clone()
    }

    /// The next upcoming event.
    pub fn event(&self) -> Option<CalendarEvent> {
        self.event_at(Utc::now())
    }

    pub fn event_at(&self, now: DateTime<Utc>) -> Option<CalendarEvent> {
        next_event(&self.read_events(), now).cloned()
    }

    /// Refresh and return all events overlapping `[start, end]`.
    pub async fn get_events<A: TimeZone, B: TimeZone>(
        &self,
        start: &DateTime<A>,
        end: &DateTime<B>,
    ) -> Vec<CalendarEvent> {
        let (start, end) = (start.with_timezone(&Utc), end.with_timezone(&Utc));
        self.get_events_at(start, end, Utc::now()).await
    }

    pub async fn get_events_at(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        let events = self.refresh(now).await;
        filter_events(&events, &start, &end)
    }

    pub async fn update(&self) {
        self.update_at(Utc::now()).await;
    }

    pub async fn update_at(&self, now: DateTime<Utc>) {
        let events = self.refresh(now).await;
        info!("{} updated with {} events", self.unique_id(), events.len());
    }

    /// Fetch the pickup list and build its events without touching the cached ones.
    pub async fn fetch_events(&self, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>> {
        let calendar_list = self.source.get_calendar_list().await?;
        Ok(build_events(calendar_list, &self.config.timezone, now))
    }

    /// Replace the cached events with freshly fetched ones.
    async fn refresh(&self, now: DateTime<Utc>) -> Vec<CalendarEvent> {
        let events = self.fetch_events(now).await.unwrap_or_else(|err| {
            error!("error fetching events for {}: {err}", self.unique_id());
            vec![]
        });
        *self.events.write().unwrap_or_else(PoisonError::into_inner) = events.clone();
        events
    }

    fn read_events(&self) -> RwLockReadGuard<'_, Vec<CalendarEvent>> {
        self.events.read().unwrap_or_else(PoisonError::into_inner)
    }
}
