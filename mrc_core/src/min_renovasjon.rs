//! This client fetches fractions and pickup dates from Min Renovasjon.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, error};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::{
    error::{Error, Result},
    pickup::{PickupEntry, PickupSource},
};

pub static PROXY_URL: &str = "https://norkartrenovasjon.azurewebsites.net/proxyserver.ashx";
static API_URL: &str = "https://komteksky.norkart.no/MinRenovasjon.Api/api/";
static APP_KEY: &str = "AE13DEEC-804F-4615-A74E-B4FAC11F0A30";
static DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
static DATE_FORMAT: &str = "%Y-%m-%d";

/// The address whose pickup schedule is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// The four digit municipality number, e.g. `3005`.
    pub municipality_code: String,
    pub street_name: String,
    pub street_code: String,
    pub house_number: String,
}

impl Address {
    pub fn location(&self) -> String {
        format!("{} {}", self.street_name, self.house_number)
    }
}

pub struct MinRenovasjon {
    client: reqwest::Client,
    proxy_url: String,
    address: Address,
}

impl MinRenovasjon {
    pub fn new(address: Address) -> Self {
        Self::with_proxy_url(address, PROXY_URL)
    }

    /// Use another proxy than the official one.
    pub fn with_proxy_url(address: Address, proxy_url: impl Into<String>) -> Self {
        MinRenovasjon {
            client: reqwest::Client::new(),
            proxy_url: proxy_url.into(),
            address,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Send a request for an API endpoint through the proxy.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self
            .client
            .get(&self.proxy_url)
            .query(&[("server", endpoint)])
            .header("RenovasjonAppKey", APP_KEY)
            .header("Kommunenr", &self.address.municipality_code)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: endpoint.to_string(),
            });
        }
        Ok(serde_json::from_str(&response.text().await?)?)
    }

    async fn get_fractions(&self) -> Result<Vec<Fraction>> {
        let records: Vec<Value> = self.get_json(&format!("{API_URL}fraksjoner/")).await?;
        Ok(read_fractions(records))
    }

    async fn get_schedule(&self) -> Result<Vec<Value>> {
        let endpoint = self
            .client
            .get(format!("{API_URL}tommekalender/"))
            .query(&[
                ("kommunenr", &self.address.municipality_code),
                ("gatenavn", &self.address.street_name),
                ("gatekode", &self.address.street_code),
                ("husnr", &self.address.house_number),
            ])
            .build()?
            .url()
            .to_string();
        self.get_json(&endpoint).await
    }
}

#[async_trait]
impl PickupSource for MinRenovasjon {
    async fn get_calendar_list(&self) -> Result<Vec<Option<PickupEntry>>> {
        let fractions = self.get_fractions().await?;
        let records = self.get_schedule().await?;
        debug!(
            "received {} fractions and {} schedule records",
            fractions.len(),
            records.len()
        );
        Ok(calendar_list(&fractions, records))
    }
}

#[derive(Debug, Deserialize)]
struct Fraction {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "Navn")]
    name: String,
    #[serde(rename = "Ikon", default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ScheduleRecord {
    #[serde(rename = "FraksjonId")]
    fraction_id: u32,
    #[serde(rename = "Tommedatoer", default)]
    dates: Vec<String>,
}

/// Read the fraction records, dropping those which cannot be read.
fn read_fractions(records: Vec<Value>) -> Vec<Fraction> {
    records
        .into_iter()
        .filter_map(|record| match Fraction::deserialize(&record) {
            Ok(fraction) => Some(fraction),
            Err(err) => {
                error!("skipping fraction record {record}: {err}");
                None
            }
        })
        .collect()
}

/// Join the schedule records with their fractions.
///
/// Records of unknown fractions become `None`, records which cannot be read are dropped.
fn calendar_list(fractions: &[Fraction], records: Vec<Value>) -> Vec<Option<PickupEntry>> {
    records
        .into_iter()
        .filter_map(|record| match read_entry(fractions, &record) {
            Ok(entry) => Some(entry),
            Err(err) => {
                error!("skipping schedule record {record}: {err}");
                None
            }
        })
        .collect()
}

fn read_entry(fractions: &[Fraction], record: &Value) -> Result<Option<PickupEntry>> {
    let record = ScheduleRecord::deserialize(record)?;
    let Some(fraction) = fractions
        .iter()
        .find(|fraction| fraction.id == record.fraction_id)
    else {
        return Ok(None);
    };
    let mut dates = record.dates.iter().map(|date| parse_date(date));
    Ok(Some(PickupEntry {
        fraction_id: fraction.id,
        fraction_name: fraction.name.clone(),
        icon: fraction.icon.clone(),
        pickup_date: dates.next().transpose()?,
        next_pickup_date: dates.next().transpose()?,
    }))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .map(|date_time| date_time.date())
        .or_else(|_| NaiveDate::parse_from_str(value, DATE_FORMAT))
        .map_err(|_| Error::InvalidDate(value.to_string()))
}
