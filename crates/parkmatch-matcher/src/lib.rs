//! Cross-provider entity resolution for airport parking listings.
//!
//! Pure, synchronous computation over an in-memory record list. Safe to call
//! concurrently from independent callers; no state outlives a call.

pub mod cluster;
pub mod mismatch;
pub mod normalize;
pub mod report;
pub mod scorer;
pub mod similarity;

pub use cluster::{build_matched_location, cluster_confidence, find_matches, MAX_CONFIDENCE};
pub use mismatch::obvious_mismatch;
pub use normalize::{normalize_address, normalize_name};
pub use report::{cluster_spread, generate_matching_report, quality_label, ClusterSpread};
pub use scorer::{score_pair, MatchScore};
pub use similarity::{address_similarity, distance_meters, string_similarity};

use parkmatch_core::{LocationRecord, MatchCriteria, MatchedLocation};

/// A matcher bound to one set of criteria.
#[derive(Debug, Clone, Default)]
pub struct LocationMatcher {
    criteria: MatchCriteria,
}

impl LocationMatcher {
    #[must_use]
    pub fn new(criteria: MatchCriteria) -> Self {
        Self { criteria }
    }

    #[must_use]
    pub fn criteria(&self) -> &MatchCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn score(&self, a: &LocationRecord, b: &LocationRecord) -> MatchScore {
        score_pair(a, b, &self.criteria)
    }

    #[must_use]
    pub fn find_matches(&self, records: &[LocationRecord]) -> Vec<MatchedLocation> {
        find_matches(records, &self.criteria)
    }

    #[must_use]
    pub fn report(&self, matches: &[MatchedLocation]) -> String {
        generate_matching_report(matches, &self.criteria)
    }
}
