//! Markdown rendering of matched locations for human review.

use std::collections::BTreeMap;

use parkmatch_core::{Coordinates, MatchCriteria, MatchedLocation, Provider};

use crate::similarity::distance_meters;

/// Confidence above which a match counts as high-confidence in the summary.
const HIGH_CONFIDENCE: f64 = 0.8;

/// Human label for a confidence score.
#[must_use]
pub fn quality_label(confidence: f64, criteria: &MatchCriteria) -> &'static str {
    if confidence >= criteria.excellent_match_threshold {
        "Excellent"
    } else if confidence >= 0.8 {
        "High"
    } else if confidence >= 0.7 {
        "Good"
    } else if confidence >= 0.6 {
        "Fair"
    } else {
        "Low"
    }
}

/// Geographic spread of a cluster's members around its aggregate centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSpread {
    pub with_coordinates: usize,
    pub max_pairwise_meters: f64,
    pub mean_from_center_meters: f64,
}

/// Spread statistics, or `None` when fewer than two members have coordinates.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cluster_spread(matched: &MatchedLocation) -> Option<ClusterSpread> {
    let points: Vec<Coordinates> = matched
        .locations
        .iter()
        .filter_map(|l| l.coordinates)
        .collect();
    if points.len() < 2 {
        return None;
    }
    let center = matched.coordinates?;

    let mut max_pairwise_meters: f64 = 0.0;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            max_pairwise_meters = max_pairwise_meters.max(distance_meters(*a, *b));
        }
    }
    let mean_from_center_meters = points
        .iter()
        .map(|p| distance_meters(*p, center))
        .sum::<f64>()
        / points.len() as f64;

    Some(ClusterSpread {
        with_coordinates: points.len(),
        max_pairwise_meters,
        mean_from_center_meters,
    })
}

/// Render matched locations as a Markdown report.
///
/// The header lists the criteria the matcher ran with. An empty match list
/// still renders a complete report with `N/A` for the average confidence.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_matching_report(matches: &[MatchedLocation], criteria: &MatchCriteria) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Airport Parking Location Matching Report\n".to_string());
    write_parameters(&mut lines, criteria);

    let total_records: usize = matches.iter().map(|m| m.locations.len()).sum();
    let mut per_provider: BTreeMap<Provider, usize> = BTreeMap::new();
    for location in matches.iter().flat_map(|m| &m.locations) {
        *per_provider.entry(location.provider).or_default() += 1;
    }
    let average = if matches.is_empty() {
        "N/A".to_string()
    } else {
        let mean =
            matches.iter().map(|m| m.confidence_score).sum::<f64>() / matches.len() as f64;
        format!("{:.1}%", mean * 100.0)
    };
    let high_confidence = matches
        .iter()
        .filter(|m| m.confidence_score > HIGH_CONFIDENCE)
        .count();

    lines.push("## Summary\n".to_string());
    lines.push(format!("- Matched locations: {}", matches.len()));
    lines.push(format!("- Total matched records: {total_records}"));
    if per_provider.is_empty() {
        lines.push("- Records by provider: none".to_string());
    } else {
        lines.push("- Records by provider:".to_string());
        for (provider, count) in &per_provider {
            lines.push(format!("  - {provider}: {count}"));
        }
    }
    lines.push(format!("- Average confidence: {average}"));
    lines.push(format!(
        "- High-confidence matches (>{:.0}%): {high_confidence}",
        HIGH_CONFIDENCE * 100.0
    ));

    for (idx, matched) in matches.iter().enumerate() {
        lines.push("\n---\n".to_string());
        write_match(&mut lines, idx + 1, matched, criteria);
    }

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

fn write_parameters(lines: &mut Vec<String>, c: &MatchCriteria) {
    lines.push("## Algorithm Parameters\n".to_string());
    lines.push(format!(
        "- Name similarity: minimum {:.0}%, strong {:.0}%",
        c.minimum_name_similarity * 100.0,
        c.strong_name_similarity * 100.0
    ));
    lines.push(format!(
        "- Address similarity: minimum {:.0}%, strong {:.0}%",
        c.minimum_address_similarity * 100.0,
        c.strong_address_similarity * 100.0
    ));
    lines.push(format!(
        "- Distance: maximum {:.0}m, same location {:.0}m",
        c.maximum_distance_meters, c.same_location_distance_meters
    ));
    if c.consider_price_in_matching {
        lines.push(format!(
            "- Price: maximum difference {:.0}%",
            c.maximum_price_difference_ratio * 100.0
        ));
    } else {
        lines.push("- Price: ignored".to_string());
    }
    lines.push(format!(
        "- Minimum match confidence: {:.0}%\n",
        c.minimum_match_confidence * 100.0
    ));
}

fn write_match(
    lines: &mut Vec<String>,
    number: usize,
    m: &MatchedLocation,
    criteria: &MatchCriteria,
) {
    lines.push(format!("## {number}. {}\n", m.canonical_name));
    lines.push(format!(
        "- **Confidence:** {:.1}% ({})",
        m.confidence_score * 100.0,
        quality_label(m.confidence_score, criteria)
    ));
    lines.push(format!("- **Address:** {}", m.canonical_address.full_address));
    if let Some(c) = m.coordinates {
        lines.push(format!(
            "- **Coordinates:** {:.6}, {:.6}",
            c.latitude, c.longitude
        ));
    }
    if let Some(spread) = cluster_spread(m) {
        lines.push(format!(
            "- **Geographic spread:** {} of {} listings located, max separation {:.0}m, mean distance from center {:.0}m",
            spread.with_coordinates,
            m.locations.len(),
            spread.max_pairwise_meters,
            spread.mean_from_center_meters
        ));
    }

    lines.push("\n### Listings\n".to_string());
    for location in &m.locations {
        let amenities = if location.amenities.is_empty() {
            "none".to_string()
        } else {
            location.amenities.join(", ")
        };
        lines.push(format!("- **{}**: {}", location.provider, location.name));
        lines.push(format!(
            "  - Price: {:.2} {}/day",
            location.pricing.daily_rate, location.pricing.currency
        ));
        lines.push(format!("  - Address: {}", location.address.full_address));
        lines.push(format!("  - Amenities: {amenities}"));
    }

    lines.push("\n### Match Reasons\n".to_string());
    for reason in &m.match_reasons {
        lines.push(format!("- {reason}"));
    }
}
