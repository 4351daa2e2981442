//! Errors which can occur while fetching pickup data or building events.

use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to Min Renovasjon failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Min Renovasjon answered {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error("could not decode Min Renovasjon response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid pickup date {0:?}")]
    InvalidDate(String),
    #[error("the day after {0} is out of range")]
    DateOutOfRange(NaiveDate),
    #[error("there is no local midnight on {0}")]
    NonexistentLocalTime(NaiveDate),
}
