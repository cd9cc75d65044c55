//! String, address, and geographic similarity primitives.

use parkmatch_core::{Address, Coordinates};

use crate::normalize::normalize_address;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

const STREET_WEIGHT: f64 = 0.6;
const CITY_WEIGHT: f64 = 0.3;
const STATE_WEIGHT: f64 = 0.1;

/// Levenshtein similarity normalized by the longer input: `1 - d / max_len`.
///
/// Two empty strings are identical (`1.0`). Case-sensitive; callers lowercase
/// or normalize first.
#[must_use]
// Both values are string lengths; far below f64's exact integer range.
#[allow(clippy::cast_precision_loss)]
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    1.0 - distance as f64 / max_len as f64
}

/// Weighted address similarity: normalized street 0.6, city 0.3, state 0.1.
#[must_use]
pub fn address_similarity(a: &Address, b: &Address) -> f64 {
    let street = string_similarity(&normalize_address(&a.street), &normalize_address(&b.street));
    let city = if a.city.trim().to_lowercase() == b.city.trim().to_lowercase() {
        1.0
    } else {
        0.0
    };
    let state = if a.state.trim().to_lowercase() == b.state.trim().to_lowercase() {
        1.0
    } else {
        0.0
    };
    STREET_WEIGHT * street + CITY_WEIGHT * city + STATE_WEIGHT * state
}

/// Great-circle distance in meters (haversine).
///
/// The intermediate `a` term is clamped to `[0, 1]` so rounding near equal or
/// antipodal points never yields `NaN`.
#[must_use]
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates {
            latitude,
            longitude,
        }
    }

    fn address(street: &str, city: &str, state: &str) -> Address {
        Address {
            street: street.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip: None,
            full_address: format!("{street}, {city}, {state}"),
        }
    }

    #[test]
    fn empty_strings_are_identical() {
        assert!((string_similarity("", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn one_empty_string_is_zero() {
        assert!(string_similarity("", "abc").abs() < f64::EPSILON);
    }

    #[test]
    fn identical_strings_score_one() {
        assert!((string_similarity("lax economy", "lax economy") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_substitution() {
        // kitten -> sitten: one edit over six chars.
        let s = string_similarity("kitten", "sitten");
        assert!((s - 5.0 / 6.0).abs() < 1e-12, "got {s}");
    }

    #[test]
    fn string_similarity_is_symmetric() {
        let pairs = [
            ("lax economy", "lax official economy"),
            ("wally park", "wallypark premier"),
            ("", "x"),
            ("qüick", "quick"),
        ];
        for (a, b) in pairs {
            assert!(
                (string_similarity(a, b) - string_similarity(b, a)).abs() < f64::EPSILON,
                "asymmetric for {a:?} / {b:?}"
            );
        }
    }

    #[test]
    fn multibyte_chars_count_once() {
        // One substitution over five chars, not over six bytes.
        let s = string_similarity("qüick", "quick");
        assert!((s - 0.8).abs() < 1e-12, "got {s}");
    }

    #[test]
    fn identical_addresses_score_one() {
        let a = address("1 World Way", "Los Angeles", "CA");
        assert!((address_similarity(&a, &a.clone()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn address_suffix_variants_are_equal() {
        let a = address("9700 Bellanca Ave.", "Los Angeles", "CA");
        let b = address("9700 Bellanca Avenue", "los angeles", "ca");
        assert!((address_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn different_city_costs_city_weight() {
        let a = address("1 World Way", "Los Angeles", "CA");
        let b = address("1 World Way", "Inglewood", "CA");
        assert!((address_similarity(&a, &b) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn completely_different_addresses_score_low() {
        let a = address("1 World Way", "Los Angeles", "CA");
        let b = address("4000 Airport Blvd", "Austin", "TX");
        assert!(address_similarity(&a, &b) < 0.3);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = coords(33.9425, -118.408);
        assert!(distance_meters(c, c).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coords(33.9425, -118.408);
        let b = coords(33.9461, -118.4010);
        assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_latitude_is_about_111_km() {
        let d = distance_meters(coords(0.0, 0.0), coords(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = distance_meters(coords(0.0, 0.0), coords(0.0, 180.0));
        let expected = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!(d.is_finite());
        assert!((d - expected).abs() < 1.0, "got {d}");
    }

    #[test]
    fn small_offset_is_meters() {
        // 0.0001 deg latitude is roughly 11 m.
        let d = distance_meters(coords(33.9425, -118.408), coords(33.9426, -118.408));
        assert!(d > 10.0 && d < 12.5, "got {d}");
    }
}
