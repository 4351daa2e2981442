//! This crate turns the waste pickup schedule of a Norwegian household into calendar events.
//!
//! The dates are read from Min Renovasjon (<https://komteksky.norkart.no/MinRenovasjon.Api>),
//! every pickup becomes an event spanning its whole local day.

pub use chrono_tz;
pub use ical;

pub mod calendar;
pub mod error;
pub mod event;
pub mod ics;
pub mod min_renovasjon;
pub mod pickup;
