use std::net::SocketAddr;

use clap::Parser;
use mrc_core::{chrono_tz::Tz, min_renovasjon::Address, min_renovasjon::PROXY_URL};

/// Serve the waste pickup calendar of one address.
#[derive(Debug, Parser)]
pub struct Config {
    /// the municipality number
    #[arg(long, env = "MRC_KOMMUNENR")]
    pub kommunenr: String,
    /// the street name
    #[arg(long, env = "MRC_GATENAVN")]
    pub gatenavn: String,
    /// the street code
    #[arg(long, env = "MRC_GATEKODE")]
    pub gatekode: String,
    /// the house number
    #[arg(long, env = "MRC_HUSNR")]
    pub husnr: String,
    /// the timezone pickup days are local to
    #[arg(long, env = "MRC_TIMEZONE", default_value = "Europe/Oslo")]
    pub timezone: Tz,
    /// the id the calendar's unique id is derived from
    #[arg(long, env = "MRC_ENTRY_ID", default_value = "default")]
    pub entry_id: String,
    /// the address to listen on
    #[arg(long, env = "MRC_BIND", default_value = "0.0.0.0:8008")]
    pub bind: SocketAddr,
    /// seconds between two refreshes of the calendar
    #[arg(long, env = "MRC_REFRESH_SECS", default_value_t = 3600)]
    pub refresh_secs: u64,
    /// the Min Renovasjon proxy
    #[arg(long, env = "MRC_PROXY_URL", default_value = PROXY_URL)]
    pub proxy_url: String,
}

impl From<&Config> for Address {
    fn from(value: &Config) -> Self {
        Address {
            municipality_code: value.kommunenr.clone(),
            street_name: value.gatenavn.clone(),
            street_code: value.gatekode.clone(),
            house_number: value.husnr.clone(),
        }
    }
}
