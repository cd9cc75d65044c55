//! Pairwise compatibility scoring between two location records.
//!
//! Address similarity dominates: independently scraped listings with the same
//! street address are almost always the same facility, while names are
//! branded differently by every provider. Name, proximity, and price add
//! partial credit on top. Every rejection carries exactly one reason so the
//! decision can be audited from logs.

use parkmatch_core::{LocationRecord, MatchCriteria};

use crate::mismatch::obvious_mismatch;
use crate::normalize::normalize_name;
use crate::similarity::{address_similarity, distance_meters, string_similarity};

const ADDRESS_WEIGHT: f64 = 0.6;
const NAME_WEIGHT: f64 = 0.25;
const PROXIMITY_WEIGHT: f64 = 0.15;
const SAME_LOCATION_BONUS: f64 = 0.10;
const PRICE_WEIGHT: f64 = 0.1;

/// Outcome of comparing two records. A `score` of `0.0` means rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

impl MatchScore {
    fn reject(reason: String) -> Self {
        Self {
            score: 0.0,
            reasons: vec![reason],
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.score > 0.0
    }
}

/// Score how likely two records from different providers describe the same
/// facility.
///
/// The caller guarantees the records are distinct candidates (different
/// providers); this function does not check identity keys.
#[must_use]
pub fn score_pair(a: &LocationRecord, b: &LocationRecord, criteria: &MatchCriteria) -> MatchScore {
    if let Some(reason) = obvious_mismatch(&a.name, &b.name) {
        return MatchScore::reject(reason);
    }

    let mut score = 0.0;
    let mut reasons = Vec::new();
    let distance = match (a.coordinates, b.coordinates) {
        (Some(ca), Some(cb)) => Some(distance_meters(ca, cb)),
        _ => None,
    };

    // Address: a weak address match is only trusted when the two points are
    // demonstrably co-located, or, lacking coordinates, still fairly close.
    let address_sim = address_similarity(&a.address, &b.address);
    if address_sim < criteria.strong_address_similarity {
        match distance {
            Some(d) if d > criteria.same_location_distance_meters => {
                return MatchScore::reject(format!(
                    "Address similarity {:.0}% is not strong and locations are {d:.0}m apart",
                    address_sim * 100.0
                ));
            }
            None if address_sim < criteria.minimum_address_similarity => {
                return MatchScore::reject(format!(
                    "Address similarity {:.0}% is below the {:.0}% minimum without coordinates",
                    address_sim * 100.0,
                    criteria.minimum_address_similarity * 100.0
                ));
            }
            _ => {}
        }
    }
    if address_sim >= criteria.minimum_address_similarity {
        score += address_sim * ADDRESS_WEIGHT;
        reasons.push(format!("Address similarity: {:.0}%", address_sim * 100.0));
    }
    if address_sim >= criteria.strong_address_similarity {
        score += criteria.same_address_bonus;
        reasons.push("Same street address".to_string());
    }

    let name_sim = string_similarity(&normalize_name(&a.name), &normalize_name(&b.name));
    if name_sim >= criteria.minimum_name_similarity {
        score += name_sim * NAME_WEIGHT;
        let label = if name_sim >= criteria.strong_name_similarity {
            "Strong name match"
        } else {
            "Name similarity"
        };
        reasons.push(format!("{label}: {:.0}%", name_sim * 100.0));
    }

    if let Some(d) = distance {
        if d <= criteria.maximum_distance_meters {
            score += (1.0 - d / criteria.maximum_distance_meters) * PROXIMITY_WEIGHT;
            reasons.push(format!("Distance: {d:.0}m"));
            if d <= criteria.same_location_distance_meters {
                score += SAME_LOCATION_BONUS;
                reasons.push("Same physical location".to_string());
            }
        }
    }

    if criteria.consider_price_in_matching {
        let ratio = price_difference_ratio(a.pricing.daily_rate, b.pricing.daily_rate);
        if ratio > criteria.maximum_price_difference_ratio {
            return MatchScore::reject(format!(
                "Daily rates differ by {:.0}% (${:.2} vs ${:.2})",
                ratio * 100.0,
                a.pricing.daily_rate,
                b.pricing.daily_rate
            ));
        }
        score += (1.0 - ratio) * PRICE_WEIGHT;
        reasons.push(format!("Price difference: {:.0}%", ratio * 100.0));
    }

    let score = score.min(1.0);
    if !score.is_finite() || score < criteria.minimum_match_confidence {
        return MatchScore::reject(format!(
            "Combined score {:.0}% is below the {:.0}% threshold",
            score * 100.0,
            criteria.minimum_match_confidence * 100.0
        ));
    }

    MatchScore { score, reasons }
}

/// Relative daily-rate gap `|p1 - p2| / max(p1, p2)`.
///
/// Two zero rates differ by nothing. Non-finite input is treated as a total
/// mismatch so it can never slip past the price gate.
fn price_difference_ratio(p1: f64, p2: f64) -> f64 {
    let max = p1.max(p2);
    if max <= 0.0 {
        return 0.0;
    }
    let ratio = (p1 - p2).abs() / max;
    if ratio.is_finite() {
        ratio
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use parkmatch_core::{Address, Coordinates, Pricing, Provider};

    use super::*;

    fn record(provider: Provider, name: &str, street: &str, rate: f64) -> LocationRecord {
        LocationRecord {
            provider_id: format!("{provider}-{name}"),
            provider,
            name: name.to_string(),
            address: Address {
                street: street.to_string(),
                city: "Los Angeles".to_string(),
                state: "CA".to_string(),
                zip: Some("90045".to_string()),
                full_address: format!("{street}, Los Angeles, CA 90045"),
            },
            coordinates: None,
            distance_to_airport: None,
            pricing: Pricing {
                daily_rate: rate,
                hourly_rate: None,
                currency: "USD".to_string(),
            },
            amenities: vec![],
            shuttle_service: false,
            valet_service: false,
            covered_parking: false,
            availability: true,
            available_from: None,
            available_until: None,
            provider_data: serde_json::Value::Null,
        }
    }

    fn at(mut r: LocationRecord, latitude: f64, longitude: f64) -> LocationRecord {
        r.coordinates = Some(Coordinates {
            latitude,
            longitude,
        });
        r
    }

    #[test]
    fn identical_listings_cap_at_one() {
        let a = at(
            record(Provider::SpotHero, "Wally Park", "9700 Bellanca Ave", 20.0),
            33.9500,
            -118.3900,
        );
        let b = at(
            record(Provider::ParkWhiz, "Wally Park", "9700 Bellanca Ave", 20.0),
            33.9500,
            -118.3900,
        );
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!((result.score - 1.0).abs() < f64::EPSILON, "got {result:?}");
        assert!(result.reasons.iter().any(|r| r == "Same street address"));
        assert!(result.reasons.iter().any(|r| r == "Same physical location"));
        assert!(result.reasons.iter().any(|r| r.starts_with("Strong name match")));
    }

    #[test]
    fn mismatch_filter_short_circuits_with_single_reason() {
        let a = record(Provider::SpotHero, "Marriott LAX Hotel Parking", "5855 W Century Blvd", 30.0);
        let b = record(Provider::ParkWhiz, "Hilton LAX Hotel Parking", "5855 W Century Blvd", 30.0);
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!(!result.is_match());
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].contains("hotel brands"));
    }

    #[test]
    fn weak_address_far_apart_is_rejected() {
        let a = at(
            record(Provider::SpotHero, "Quik Park", "6151 W Century Blvd", 20.0),
            33.9456,
            -118.3870,
        );
        let b = at(
            record(Provider::ParkWhiz, "Quik Park", "6225 W Century Blvd", 20.0),
            33.9456,
            -118.3900,
        );
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!(!result.is_match());
        assert_eq!(result.reasons.len(), 1);
        assert!(result.reasons[0].contains("apart"), "got {result:?}");
    }

    #[test]
    fn weak_address_without_coordinates_below_minimum_is_rejected() {
        let a = record(Provider::SpotHero, "Quik Park", "1 World Way", 20.0);
        let mut b = record(Provider::ParkWhiz, "Quik Park", "1 World Way", 20.0);
        b.address.city = "Inglewood".to_string();
        b.address.state = "NV".to_string();
        // street 0.6 only.
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!(!result.is_match());
        assert!(result.reasons[0].contains("without coordinates"));
    }

    #[test]
    fn one_sided_coordinates_use_address_minimum() {
        let a = at(
            record(Provider::SpotHero, "Wally Park", "9700 Bellanca Ave", 20.0),
            33.95,
            -118.39,
        );
        let mut b = record(Provider::ParkWhiz, "Wally Park", "9700 Bellanca Ave", 20.0);
        b.address.city = "Westchester".to_string();
        // 0.7 address similarity, no distance available: below the 0.75 minimum.
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!(!result.is_match());
        assert!(result.reasons[0].contains("without coordinates"));
    }

    #[test]
    fn co_located_weak_address_is_not_rejected_by_gate() {
        // Same point, street typo: address gate passes on proximity.
        let a = at(
            record(Provider::SpotHero, "Wally Park Premier", "9700 Bellanca Ave", 20.0),
            33.95,
            -118.39,
        );
        let b = at(
            record(Provider::ParkWhiz, "WallyPark Premier", "9770 Belanca Ave", 21.0),
            33.95,
            -118.39,
        );
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!(result.is_match(), "got {result:?}");
        assert!(!result.reasons.iter().any(|r| r == "Same street address"));
    }

    #[test]
    fn price_gap_beyond_ratio_is_rejected() {
        let a = record(Provider::SpotHero, "Wally Park", "9700 Bellanca Ave", 10.0);
        let b = record(Provider::ParkWhiz, "Wally Park", "9700 Bellanca Ave", 25.0);
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!(!result.is_match());
        assert!(result.reasons[0].contains("Daily rates differ by 60%"));
    }

    #[test]
    fn price_gap_is_ignored_when_price_matching_disabled() {
        let a = record(Provider::SpotHero, "Wally Park", "9700 Bellanca Ave", 10.0);
        let b = record(Provider::ParkWhiz, "Wally Park", "9700 Bellanca Ave", 25.0);
        let criteria = MatchCriteria {
            consider_price_in_matching: false,
            ..MatchCriteria::default()
        };
        let result = score_pair(&a, &b, &criteria);
        assert!(result.is_match(), "got {result:?}");
        assert!(!result.reasons.iter().any(|r| r.starts_with("Price")));
    }

    #[test]
    fn zero_prices_do_not_produce_nan() {
        let a = record(Provider::SpotHero, "Wally Park", "9700 Bellanca Ave", 0.0);
        let b = record(Provider::ParkWhiz, "Wally Park", "9700 Bellanca Ave", 0.0);
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!(result.score.is_finite());
        assert!(result.is_match());
        assert!(result.reasons.iter().any(|r| r == "Price difference: 0%"));
    }

    #[test]
    fn price_ratio_guards() {
        assert!(price_difference_ratio(0.0, 0.0).abs() < f64::EPSILON);
        assert!((price_difference_ratio(10.0, 25.0) - 0.6).abs() < 1e-12);
        assert!((price_difference_ratio(25.0, 10.0) - 0.6).abs() < 1e-12);
        assert!((price_difference_ratio(f64::INFINITY, 10.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn subtotal_below_confidence_is_rejected() {
        // Address clears the minimum but nothing else contributes enough.
        let a = record(Provider::SpotHero, "Airport Express", "1 World Way", 20.0);
        let mut b = record(Provider::ParkWhiz, "Sunset Valet Co", "1 World Way", 20.0);
        b.address.state = "NV".to_string();
        // address 0.9 -> 0.54, names dissimilar, price +0.1 => 0.64.
        let result = score_pair(&a, &b, &MatchCriteria::default());
        assert!(!result.is_match());
        assert!(result.reasons[0].contains("below the 70% threshold"), "got {result:?}");
    }

    #[test]
    fn score_is_symmetric() {
        let a = at(
            record(Provider::SpotHero, "LAX Official Economy Parking", "1 World Way", 24.0),
            33.9425,
            -118.408,
        );
        let b = at(
            record(Provider::ParkWhiz, "LAX Economy Lot", "1 World Way", 19.5),
            33.94255,
            -118.40805,
        );
        let criteria = MatchCriteria::default();
        let ab = score_pair(&a, &b, &criteria).score;
        let ba = score_pair(&b, &a, &criteria).score;
        assert!((ab - ba).abs() < 1e-12);
    }
}
