//! Greedy single-link clustering of records into matched locations.
//!
//! Records are consumed in input order. Each unconsumed record seeds a
//! cluster with every unconsumed record from another provider that scores
//! above the confidence bar against the seed. Candidates are only checked
//! against the seed, not against each other, so two non-seed members of a
//! cluster may not match pairwise. Shuffling the input can change which
//! records end up together when candidate sets overlap; callers that need
//! order-independent output should sort the input first.

use std::collections::HashSet;

use parkmatch_core::{Coordinates, LocationRecord, MatchCriteria, MatchedLocation, RecordKey};
use uuid::Uuid;

use crate::scorer::score_pair;

/// Cheap pre-filter applied before the configured confidence bar.
const CANDIDATE_PREFILTER: f64 = 0.5;

/// Upper bound on any cluster confidence score.
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Group records that describe the same facility across providers.
///
/// Returns clusters of two or more records, sorted by descending confidence.
/// Unmatched records are omitted. No record appears in more than one cluster
/// and no cluster holds the same `(provider, provider_id)` twice.
#[must_use]
pub fn find_matches(records: &[LocationRecord], criteria: &MatchCriteria) -> Vec<MatchedLocation> {
    let mut processed: HashSet<RecordKey> = HashSet::new();
    let mut matches = Vec::new();

    for (i, seed) in records.iter().enumerate() {
        if processed.contains(&seed.key()) {
            continue;
        }

        let candidates = collect_candidates(records, i, &processed, criteria);
        if candidates.is_empty() {
            tracing::trace!(
                provider = %seed.provider,
                provider_id = %seed.provider_id,
                "no cross-provider match"
            );
            continue;
        }

        let mut members = Vec::with_capacity(candidates.len() + 1);
        members.push(seed);
        members.extend(candidates);
        for member in &members {
            processed.insert(member.key());
        }

        let matched = build_matched_location(&members, criteria);
        tracing::debug!(
            id = %matched.id,
            canonical_name = %matched.canonical_name,
            members = matched.locations.len(),
            confidence = matched.confidence_score,
            "built matched location"
        );
        matches.push(matched);
    }

    matches.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));

    tracing::info!(
        records = records.len(),
        clusters = matches.len(),
        matched_records = processed.len(),
        "location matching complete"
    );

    matches
}

/// Unprocessed records from other providers that match `records[seed_idx]`.
fn collect_candidates<'a>(
    records: &'a [LocationRecord],
    seed_idx: usize,
    processed: &HashSet<RecordKey>,
    criteria: &MatchCriteria,
) -> Vec<&'a LocationRecord> {
    let seed = &records[seed_idx];
    let mut seen: HashSet<RecordKey> = HashSet::new();
    let mut candidates = Vec::new();

    for (j, other) in records.iter().enumerate() {
        if j == seed_idx || other.provider == seed.provider {
            continue;
        }
        let key = other.key();
        if processed.contains(&key) || seen.contains(&key) {
            continue;
        }

        let result = score_pair(seed, other, criteria);
        if result.score >= CANDIDATE_PREFILTER && result.score >= criteria.minimum_match_confidence
        {
            tracing::debug!(
                seed = %seed.provider_id,
                candidate = %other.provider_id,
                score = result.score,
                reasons = ?result.reasons,
                "candidate accepted"
            );
            seen.insert(key);
            candidates.push(other);
        } else {
            tracing::trace!(
                seed = %seed.provider_id,
                candidate = %other.provider_id,
                reasons = ?result.reasons,
                "candidate rejected"
            );
        }
    }

    candidates
}

/// Aggregate cluster members into a [`MatchedLocation`].
///
/// `members` must be non-empty; the first member is the seed.
#[must_use]
pub fn build_matched_location(
    members: &[&LocationRecord],
    criteria: &MatchCriteria,
) -> MatchedLocation {
    let canonical = canonical_record(members);
    let coordinates = mean_coordinates(members);
    let all_have_zip = members.iter().all(|m| m.address.has_zip());

    let confidence_score = cluster_confidence(
        members.len(),
        coordinates.is_some(),
        all_have_zip,
        criteria,
    );

    let mut match_reasons = Vec::with_capacity(members.len() + 1);
    match_reasons.push(format!("Matched across {} providers", members.len()));
    for member in members {
        match_reasons.push(format!("{}: {}", member.provider, member.name));
    }

    MatchedLocation {
        id: Uuid::new_v4(),
        canonical_name: canonical.name.clone(),
        canonical_address: canonical.address.clone(),
        coordinates,
        locations: members.iter().map(|m| (*m).clone()).collect(),
        confidence_score,
        match_reasons,
    }
}

/// Most data-complete member; the earliest wins ties.
fn canonical_record<'a>(members: &[&'a LocationRecord]) -> &'a LocationRecord {
    let mut best = members[0];
    let mut best_score = best.completeness_score();
    for &member in &members[1..] {
        let score = member.completeness_score();
        if score > best_score {
            best = member;
            best_score = score;
        }
    }
    best
}

/// Arithmetic mean of member coordinates, ignoring members without any.
#[allow(clippy::cast_precision_loss)]
fn mean_coordinates(members: &[&LocationRecord]) -> Option<Coordinates> {
    let points: Vec<Coordinates> = members.iter().filter_map(|m| m.coordinates).collect();
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let latitude = points.iter().map(|c| c.latitude).sum::<f64>() / n;
    let longitude = points.iter().map(|c| c.longitude).sum::<f64>() / n;
    Some(Coordinates {
        latitude,
        longitude,
    })
}

/// Rubric confidence: base plus a bonus per corroborating member, plus data
/// completeness bonuses, capped at [`MAX_CONFIDENCE`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cluster_confidence(
    member_count: usize,
    has_coordinates: bool,
    all_have_zip: bool,
    criteria: &MatchCriteria,
) -> f64 {
    let corroborating = member_count.saturating_sub(1) as f64;
    let mut score = criteria.base_confidence_score + corroborating * criteria.provider_count_bonus;
    if has_coordinates {
        score += criteria.coordinate_data_bonus;
    }
    if all_have_zip {
        score += criteria.complete_address_bonus;
    }
    if score.is_finite() {
        score.clamp(0.0, MAX_CONFIDENCE)
    } else {
        0.0
    }
}
