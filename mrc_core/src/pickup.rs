//! The inbound side: where pickup dates come from.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;

/// One fraction's next two scheduled collection dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupEntry {
    pub fraction_id: u32,
    pub fraction_name: String,
    /// Not used for events, kept as delivered by the source.
    pub icon: String,
    pub pickup_date: Option<NaiveDate>,
    pub next_pickup_date: Option<NaiveDate>,
}

impl PickupEntry {
    /// Both pickup dates in order, skipping the absent ones.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        [self.pickup_date, self.next_pickup_date].into_iter().flatten()
    }
}

/// Anything that can deliver the current pickup list.
///
/// A `None` in the list is an entry the source could not resolve; consumers skip it.
#[async_trait]
pub trait PickupSource: Send + Sync {
    async fn get_calendar_list(&self) -> Result<Vec<Option<PickupEntry>>>;
}
