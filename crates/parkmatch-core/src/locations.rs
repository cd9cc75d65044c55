use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Upstream listing source a [`LocationRecord`] was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    SpotHero,
    ParkWhiz,
    CheapAirportParking,
    AirportParkingReservations,
    Way,
}

impl Provider {
    /// Every provider tag, in display order.
    pub const ALL: [Provider; 5] = [
        Provider::SpotHero,
        Provider::ParkWhiz,
        Provider::CheapAirportParking,
        Provider::AirportParkingReservations,
        Provider::Way,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::SpotHero => "spothero",
            Provider::ParkWhiz => "parkwhiz",
            Provider::CheapAirportParking => "cheap_airport_parking",
            Provider::AirportParkingReservations => "airport_parking_reservations",
            Provider::Way => "way",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| CoreError::UnknownProvider(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
    /// Single-line rendering used for display, e.g. `"1 World Way, Los Angeles, CA 90045"`.
    pub full_address: String,
}

impl Address {
    #[must_use]
    pub fn has_zip(&self) -> bool {
        self.zip.as_deref().is_some_and(|z| !z.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns `Some` only for finite, in-range latitude/longitude pairs.
    #[must_use]
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub daily_rate: f64,
    pub hourly_rate: Option<f64>,
    /// ISO 4217 currency code (e.g., `"USD"`).
    pub currency: String,
}

/// One parking listing from one provider, normalized to the common shape.
///
/// The boolean service flags are derived by the connector and are not
/// guaranteed to agree with `amenities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct LocationRecord {
    /// Provider-assigned listing ID, unique within `provider`.
    pub provider_id: String,
    pub provider: Provider,
    pub name: String,
    pub address: Address,
    pub coordinates: Option<Coordinates>,
    /// Distance to the airport terminal in miles.
    pub distance_to_airport: Option<f64>,
    pub pricing: Pricing,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub shuttle_service: bool,
    #[serde(default)]
    pub valet_service: bool,
    #[serde(default)]
    pub covered_parking: bool,
    #[serde(default = "default_availability")]
    pub availability: bool,
    pub available_from: Option<DateTime<Utc>>,
    pub available_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub provider_data: serde_json::Value,
}

fn default_availability() -> bool {
    true
}

/// Identity of a [`LocationRecord`] across a search: `(provider, provider_id)`.
pub type RecordKey = (Provider, String);

impl LocationRecord {
    #[must_use]
    pub fn key(&self) -> RecordKey {
        (self.provider, self.provider_id.clone())
    }

    /// Data-completeness rubric used to pick a cluster's canonical record.
    ///
    /// Coordinates 0.3, zip 0.2, airport distance 0.2, any amenities 0.2,
    /// hourly rate 0.1.
    #[must_use]
    pub fn completeness_score(&self) -> f64 {
        let mut score = 0.0;
        if self.coordinates.is_some() {
            score += 0.3;
        }
        if self.address.has_zip() {
            score += 0.2;
        }
        if self.distance_to_airport.is_some() {
            score += 0.2;
        }
        if !self.amenities.is_empty() {
            score += 0.2;
        }
        if self.pricing.hourly_rate.is_some() {
            score += 0.1;
        }
        score
    }
}

/// A cluster of [`LocationRecord`]s from different providers believed to
/// describe the same physical facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedLocation {
    pub id: Uuid,
    pub canonical_name: String,
    pub canonical_address: Address,
    /// Mean of member coordinates; `None` when no member has any.
    pub coordinates: Option<Coordinates>,
    /// At least two members, in clustering order (seed first).
    pub locations: Vec<LocationRecord>,
    /// Rubric score in `[0, 0.95]`.
    pub confidence_score: f64,
    pub match_reasons: Vec<String>,
}

impl MatchedLocation {
    #[must_use]
    pub fn provider_count(&self) -> usize {
        let mut providers: Vec<Provider> = self.locations.iter().map(|l| l.provider).collect();
        providers.sort_unstable();
        providers.dedup();
        providers.len()
    }
}
