//! Text normalization applied before similarity scoring.
//!
//! Name normalization drops generic parking vocabulary so that
//! "The LAX Economy Parking Lot" and "LAX Economy" compare as equal.
//! Address normalization drops street suffixes and compass directions so
//! that "100 N Main St." and "100 Main Street" compare as equal.

use std::sync::LazyLock;

use regex::Regex;

static NAME_STOPWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:the|hotel|garage|lot|parking|self|park)\b").expect("valid regex")
});

static ADDRESS_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:street|st|avenue|ave|road|rd|drive|dr|boulevard|blvd|north|n|south|s|east|e|west|w)\b\.?",
    )
    .expect("valid regex")
});

/// Lowercase, strip apostrophes, drop generic parking words, collapse whitespace.
///
/// Only used for name similarity; never for display.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase().replace(['\'', '\u{2019}'], "");
    let stripped = NAME_STOPWORDS.replace_all(&lowered, " ");
    collapse_whitespace(&stripped)
}

/// Lowercase, drop street suffixes and directions (with optional trailing
/// period), collapse whitespace.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    let lowered = address.to_lowercase();
    let stripped = ADDRESS_TOKENS.replace_all(&lowered, " ");
    collapse_whitespace(&stripped)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_drops_generic_parking_words() {
        assert_eq!(normalize_name("The LAX Economy Parking Lot"), "lax economy");
    }

    #[test]
    fn name_strips_apostrophes() {
        assert_eq!(normalize_name("Joe's Self Park"), "joes");
        assert_eq!(normalize_name("Joe\u{2019}s Garage"), "joes");
    }

    #[test]
    fn name_keeps_words_that_merely_contain_stopwords() {
        // "parkway" and "hotels" are not standalone stopwords.
        assert_eq!(normalize_name("Parkway Hotels Deck"), "parkway hotels deck");
    }

    #[test]
    fn name_keeps_lot_designator_value() {
        assert_eq!(normalize_name("LAX Economy Parking Lot C"), "lax economy c");
    }

    #[test]
    fn name_of_only_stopwords_is_empty() {
        assert_eq!(normalize_name("The Parking Garage"), "");
    }

    #[test]
    fn address_drops_suffixes_and_directions() {
        assert_eq!(normalize_address("100 N. Main St."), "100 main");
        assert_eq!(normalize_address("100 North Main Street"), "100 main");
    }

    #[test]
    fn address_handles_all_suffix_forms() {
        assert_eq!(
            normalize_address("5 Century Blvd West Airport Avenue Road Drive"),
            "5 century airport"
        );
    }

    #[test]
    fn address_does_not_strip_inside_words() {
        // "Westchester" starts with "west" but is a single word.
        assert_eq!(normalize_address("Westchester Pkwy"), "westchester pkwy");
    }

    #[test]
    fn address_collapses_whitespace() {
        assert_eq!(normalize_address("  1   World   Way  "), "1 world way");
    }
}
