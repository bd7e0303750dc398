//! Name collation for ranking ties.
//!
//! Three levels, compared in order:
//! 1. base letters: NFD, lowercased, combining marks dropped
//! 2. accents: NFD, lowercased, marks kept (unaccented sorts first)
//! 3. case: at the first letter differing only in case, lowercase first

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Precomputed first and second level keys for one name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollationKey {
    base: String,
    accented: String,
}

impl CollationKey {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let accented: String = name.nfd().flat_map(char::to_lowercase).collect();
        let base = accented.chars().filter(|c| !is_combining_mark(*c)).collect();
        Self { base, accented }
    }
}

/// Compare two names given their precomputed keys.
#[must_use]
pub fn compare(a: &str, a_key: &CollationKey, b: &str, b_key: &CollationKey) -> Ordering {
    a_key
        .base
        .cmp(&b_key.base)
        .then_with(|| a_key.accented.cmp(&b_key.accented))
        .then_with(|| case_order(a, b))
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in a.nfd().zip(b.nfd()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }
    Ordering::Equal
}
