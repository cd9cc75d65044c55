//! Search parameters and the wire shape of provider listings.
//!
//! Providers disagree on almost every field name detail, so the listing
//! shape is permissive: only `id` and `name` are required, everything else
//! is optional, and fields this crate does not model are captured in
//! `extra` and carried through to `LocationRecord::provider_data`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::ProviderError;

/// One airport parking search: where and for which stay window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// IATA code, uppercased (e.g., `"LAX"`).
    pub airport_code: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SearchParams {
    /// Builds search parameters, uppercasing the airport code.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidSearch`] when the airport code is not
    /// 3-4 ASCII letters or digits, or when `start_time` is not before `end_time`.
    pub fn new(
        airport_code: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ProviderError> {
        let code = airport_code.trim().to_ascii_uppercase();
        if !(3..=4).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ProviderError::InvalidSearch(format!(
                "airport code \"{airport_code}\" must be 3-4 letters or digits"
            )));
        }
        if start_time >= end_time {
            return Err(ProviderError::InvalidSearch(format!(
                "start {} must be before end {}",
                start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
                end_time.to_rfc3339_opts(SecondsFormat::Secs, true)
            )));
        }
        Ok(Self {
            airport_code: code,
            start_time,
            end_time,
        })
    }

    pub(crate) fn start_param(&self) -> String {
        self.start_time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub(crate) fn end_param(&self) -> String {
        self.end_time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Top-level body of a provider search response.
#[derive(Debug, Deserialize)]
pub struct ListingsResponse {
    #[serde(default)]
    pub listings: Vec<ProviderListing>,
}

/// A parking listing as returned by a provider, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderListing {
    /// Provider listing ID. Some providers send numbers, some strings.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub name: String,

    /// Street line (e.g., `"9700 Bellanca Ave"`).
    #[serde(default, alias = "street")]
    pub address: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default, alias = "postal_code")]
    pub zip: Option<String>,

    /// Single-line address; built from the parts when absent.
    #[serde(default)]
    pub full_address: Option<String>,

    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,

    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,

    /// Miles to the terminal.
    #[serde(default)]
    pub distance_to_airport: Option<f64>,

    #[serde(default, alias = "price")]
    pub daily_rate: Option<f64>,

    #[serde(default)]
    pub hourly_rate: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub shuttle: Option<bool>,

    #[serde(default)]
    pub valet: Option<bool>,

    #[serde(default)]
    pub covered: Option<bool>,

    /// Absent means bookable.
    #[serde(default)]
    pub available: Option<bool>,

    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,

    #[serde(default)]
    pub available_until: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Uint(n) => n.to_string(),
    })
}
