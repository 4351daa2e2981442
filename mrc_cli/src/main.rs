use std::{env::current_dir, fs::write};

use anyhow::{bail, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use log::info;
use mrc_core::{
    calendar::{CalendarConfig, WasteCalendar},
    chrono_tz::Tz,
    ical::generator::Emitter,
    ics::to_ical,
    min_renovasjon::{Address, MinRenovasjon},
};

#[derive(Debug, Parser)]
pub struct Arguments {
    /// the municipality number
    pub kommunenr: String,
    /// the street name
    pub gatenavn: String,
    /// the street code
    pub gatekode: String,
    /// the house number
    pub husnr: String,
    /// the timezone pickup days are local to
    #[arg(long, default_value = "Europe/Oslo")]
    pub timezone: Tz,
    /// only include events ending at or after this RFC 3339 instant
    #[arg(long, requires = "end")]
    pub start: Option<DateTime<FixedOffset>>,
    /// only include events starting at or before this RFC 3339 instant
    #[arg(long, requires = "start")]
    pub end: Option<DateTime<FixedOffset>>,
    /// print the next pickup instead of writing calendar.ics
    #[arg(long)]
    pub next: bool,
}

impl From<&Arguments> for Address {
    fn from(value: &Arguments) -> Self {
        Address {
            municipality_code: value.kommunenr.clone(),
            street_name: value.gatenavn.clone(),
            street_code: value.gatekode.clone(),
            house_number: value.husnr.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Arguments::parse();
    let address = Address::from(&args);
    let location = address.location();
    let calendar = WasteCalendar::new(
        MinRenovasjon::new(address),
        CalendarConfig::new("cli", args.timezone),
    );
    let now = Utc::now();
    // Fetch directly so failures end the run instead of writing an empty calendar.
    let events = calendar.fetch_events(now).await?;
    let events = match (args.start, args.end) {
        (Some(start), Some(end)) => mrc_core::event::filter_events(&events, &start, &end),
        _ => events,
    };
    if args.next {
        match mrc_core::event::next_event(&events, now) {
            Some(event) => println!(
                "{}: {}",
                event.start.with_timezone(&args.timezone).format("%Y-%m-%d"),
                event.summary
            ),
            None => bail!("no upcoming pickups"),
        }
        return Ok(());
    }
    let ical_calendar = to_ical(&events, &args.timezone, &location, now);
    let mut path = current_dir()?;
    path.push("calendar.ics");
    write(&path, ical_calendar.generate())?;
    info!("wrote {} events to {}", events.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use mrc_core::{chrono_tz::Europe::Oslo, min_renovasjon::Address};

    use crate::Arguments;

    #[test]
    fn test_arguments() {
        let args = Arguments::try_parse_from(["mrc_cli", "3005", "Storgata", "12345", "1"]).unwrap();
        assert_eq!(args.timezone, Oslo);
        assert!(!args.next);
        assert_eq!(Address::from(&args).location(), "Storgata 1");
    }

    #[test]
    fn test_range_requires_both_bounds() {
        let result = Arguments::try_parse_from([
            "mrc_cli",
            "3005",
            "Storgata",
            "12345",
            "1",
            "--start",
            "2024-06-10T00:00:00Z",
        ]);
        assert!(result.is_err());
        let args = Arguments::try_parse_from([
            "mrc_cli",
            "3005",
            "Storgata",
            "12345",
            "1",
            "--start",
            "2024-06-10T00:00:00Z",
            "--end",
            "2024-06-11T00:00:00+02:00",
        ])
        .unwrap();
        assert!(args.start.is_some() && args.end.is_some());
    }
}
