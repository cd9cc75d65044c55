//! Normalization from provider listings to [`parkmatch_core::LocationRecord`].

use parkmatch_core::{Address, Coordinates, LocationRecord, Pricing, Provider};

use crate::error::ProviderError;
use crate::types::ProviderListing;

const DEFAULT_CURRENCY: &str = "USD";

/// Normalizes one [`ProviderListing`] into a [`LocationRecord`].
///
/// # Errors
///
/// Returns [`ProviderError::Normalization`] when the listing has no ID, no
/// name, no street address, or no positive finite daily rate.
pub fn normalize_listing(
    provider: Provider,
    listing: ProviderListing,
) -> Result<LocationRecord, ProviderError> {
    let provider_id = listing.id.trim().to_string();
    let reject = |reason: &str| ProviderError::Normalization {
        provider_id: provider_id.clone(),
        reason: reason.to_string(),
    };

    if provider_id.is_empty() {
        return Err(reject("listing has an empty id"));
    }
    let name = collapse(&listing.name);
    if name.is_empty() {
        return Err(reject("listing has an empty name"));
    }
    let street = listing.address.as_deref().map(collapse).unwrap_or_default();
    if street.is_empty() {
        return Err(reject("listing has no street address"));
    }

    let daily_rate = match listing.daily_rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        Some(rate) => return Err(reject(&format!("daily rate {rate} is not a positive amount"))),
        None => return Err(reject("listing has no daily rate")),
    };
    let hourly_rate = listing
        .hourly_rate
        .filter(|rate| rate.is_finite() && *rate > 0.0);
    let currency = listing
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| DEFAULT_CURRENCY.to_string(), str::to_ascii_uppercase);

    let city = listing.city.as_deref().map(collapse).unwrap_or_default();
    let state = listing.state.as_deref().map(collapse).unwrap_or_default();
    let zip = listing
        .zip
        .as_deref()
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .map(str::to_string);
    let full_address = listing
        .full_address
        .as_deref()
        .map(collapse)
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| join_address(&street, &city, &state, zip.as_deref()));

    let coordinates = match (listing.latitude, listing.longitude) {
        (Some(lat), Some(lng)) => Coordinates::checked(lat, lng),
        _ => None,
    };
    let distance_to_airport = listing
        .distance_to_airport
        .filter(|d| d.is_finite() && *d >= 0.0);

    let amenities = normalize_amenities(&listing.amenities);
    let has_amenity = |needle: &str| amenities.iter().any(|a| a.contains(needle));
    let shuttle_service = listing.shuttle.unwrap_or(false) || has_amenity("shuttle");
    let valet_service = listing.valet.unwrap_or(false) || has_amenity("valet");
    let covered_parking = listing.covered.unwrap_or(false)
        || has_amenity("covered")
        || has_amenity("indoor");

    let provider_data = if listing.extra.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::Value::Object(listing.extra)
    };

    Ok(LocationRecord {
        provider_id,
        provider,
        name,
        address: Address {
            street,
            city,
            state,
            zip,
            full_address,
        },
        coordinates,
        distance_to_airport,
        pricing: Pricing {
            daily_rate,
            hourly_rate,
            currency,
        },
        amenities,
        shuttle_service,
        valet_service,
        covered_parking,
        availability: listing.available.unwrap_or(true),
        available_from: listing.available_from,
        available_until: listing.available_until,
        provider_data,
    })
}

/// Normalizes every listing, skipping (and logging) the ones that fail.
#[must_use]
pub fn normalize_listings(provider: Provider, listings: Vec<ProviderListing>) -> Vec<LocationRecord> {
    let total = listings.len();
    let records: Vec<LocationRecord> = listings
        .into_iter()
        .filter_map(|listing| match normalize_listing(provider, listing) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(%provider, error = %e, "skipping listing");
                None
            }
        })
        .collect();

    if records.len() < total {
        tracing::info!(
            %provider,
            kept = records.len(),
            skipped = total - records.len(),
            "normalized provider listings"
        );
    }
    records
}

/// Lowercased, trimmed, de-duplicated amenity tags in first-seen order.
fn normalize_amenities(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = collapse(&tag.to_lowercase());
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn join_address(street: &str, city: &str, state: &str, zip: Option<&str>) -> String {
    let region = match (state.is_empty(), zip) {
        (false, Some(z)) => format!("{state} {z}"),
        (true, Some(z)) => z.to_string(),
        (false, None) => state.to_string(),
        (true, None) => String::new(),
    };
    [street, city, region.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
