//! Fast-reject rules for pairs that are obviously distinct facilities.
//!
//! Proximity and address similarity cannot tell "Lot A" from "Lot B" or a
//! Hilton garage from the Marriott next door. These rules run before any
//! scoring and are deliberately literal: a missed mismatch is still caught
//! by a low score, a false mismatch loses a real match for good.

use std::sync::LazyLock;

use regex::Regex;

/// Lodging brands whose parking is sold separately per property.
///
/// Multi-word brands come before any single-word brand they could contain.
pub(crate) const LODGING_BRANDS: &[&str] = &[
    "residence inn",
    "holiday inn",
    "best western",
    "doubletree",
    "marriott",
    "hilton",
    "hyatt",
    "sheraton",
    "westin",
    "embassy",
    "courtyard",
    "fairfield",
];

static DESIGNATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(lot|terminal|building|garage|structure)\s+([a-z]|\d+)\b")
        .expect("valid regex")
});

/// Returns a rejection reason when the two names are obviously different
/// facilities, or `None` when scoring should proceed.
#[must_use]
pub fn obvious_mismatch(name_a: &str, name_b: &str) -> Option<String> {
    let a = name_a.to_lowercase();
    let b = name_b.to_lowercase();

    let designators_a = designators(&a);
    let designators_b = designators(&b);
    for (kind, value_a) in &designators_a {
        if let Some((_, value_b)) = designators_b.iter().find(|(k, _)| k == kind) {
            if value_a != value_b {
                return Some(format!(
                    "Different {kind} designators: {} vs {}",
                    value_a.to_uppercase(),
                    value_b.to_uppercase()
                ));
            }
        }
    }

    if let (Some(brand_a), Some(brand_b)) = (lodging_brand(&a), lodging_brand(&b)) {
        if brand_a != brand_b {
            return Some(format!("Different hotel brands: {brand_a} vs {brand_b}"));
        }
    }

    None
}

/// Every `(designator, value)` pair in a lowercased name, e.g.
/// `"terminal 2 lot b"` yields `[("terminal", "2"), ("lot", "b")]`.
fn designators(name: &str) -> Vec<(String, String)> {
    DESIGNATOR
        .captures_iter(name)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect()
}

fn lodging_brand(name: &str) -> Option<&'static str> {
    LODGING_BRANDS.iter().copied().find(|brand| name.contains(brand))
}
