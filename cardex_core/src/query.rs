//! Tiered name/text search.
//!
//! Every card is scored against the whole query with the first rule that
//! matches:
//!
//! | tier              | rule                                   | score | hit  |
//! |-------------------|----------------------------------------|-------|------|
//! | `Exact`           | lowercase name equals the query        | 1000  | name |
//! | `Prefix`          | lowercase name starts with the query   | 800   | name |
//! | `AllTokensInName` | every token is a substring of the name | 500   | name |
//! | `AllTokensInText` | every token is a substring of the text | 200   | text |
//!
//! The text tier only applies when the caller asks for it. Rulings and PSCT
//! annotations are never searched.

use rayon::prelude::*;
use std::cmp::Ordering;

use crate::card::{Card, HitKind, ResultSummary};
use crate::collate;
use crate::index::Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    Exact,
    Prefix,
    AllTokensInName,
    AllTokensInText,
}

impl MatchTier {
    #[must_use]
    pub const fn score(self) -> u32 {
        match self {
            Self::Exact => 1000,
            Self::Prefix => 800,
            Self::AllTokensInName => 500,
            Self::AllTokensInText => 200,
        }
    }

    #[must_use]
    pub const fn hit_kind(self) -> HitKind {
        match self {
            Self::Exact | Self::Prefix | Self::AllTokensInName => HitKind::Name,
            Self::AllTokensInText => HitKind::Text,
        }
    }
}

/// A trimmed, lowercased query and its whitespace-separated tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    tokens: Vec<String>,
}

impl Query {
    /// `None` when the query is blank.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        let tokens = text.split_whitespace().map(str::to_string).collect();
        Some(Self { text, tokens })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// First tier this card satisfies, if any.
    #[must_use]
    pub fn tier(&self, card: &Card, include_text: bool) -> Option<MatchTier> {
        let name = card.name_lower();
        if name == self.text {
            Some(MatchTier::Exact)
        } else if name.starts_with(&self.text) {
            Some(MatchTier::Prefix)
        } else if self.all_tokens_in(name) {
            Some(MatchTier::AllTokensInName)
        } else if include_text && self.all_tokens_in(card.text_lower()) {
            Some(MatchTier::AllTokensInText)
        } else {
            None
        }
    }

    fn all_tokens_in(&self, haystack: &str) -> bool {
        self.tokens.iter().all(|token| haystack.contains(token.as_str()))
    }
}

/// A card that matched, with the tier it matched at.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCard<'a> {
    pub card: &'a Card,
    pub tier: MatchTier,
    position: usize,
}

impl ScoredCard<'_> {
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.tier.score()
    }

    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        self.card.summary(self.tier.hit_kind())
    }

    /// Score descending, then name ascending, then index order.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score()
            .cmp(&self.score())
            .then_with(|| compare_names(self.card, other.card))
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Locale-style name order: accents and case only break ties between
/// otherwise equal names, so "apple", "Apple" and "Élan" sort ahead of
/// "Zeta".
#[must_use]
pub fn compare_names(a: &Card, b: &Card) -> Ordering {
    collate::compare(a.name(), a.collation_key(), b.name(), b.collation_key())
}

/// Score every card and return all matches in rank order, uncapped.
#[must_use]
pub fn rank<'a>(index: &'a Index, query: &str, include_text: bool) -> Vec<ScoredCard<'a>> {
    let Some(query) = Query::parse(query) else {
        return Vec::new();
    };

    let mut hits: Vec<ScoredCard<'a>> = index
        .cards()
        .par_iter()
        .enumerate()
        .filter_map(|(position, card)| {
            query.tier(card, include_text).map(|tier| ScoredCard {
                card: card.as_ref(),
                tier,
                position,
            })
        })
        .collect();

    hits.par_sort_unstable_by(ScoredCard::rank_cmp);
    hits
}

/// Ranked search capped at `limit`, projected to result summaries.
#[must_use]
pub fn search(index: &Index, query: &str, limit: usize, include_text: bool) -> Vec<ResultSummary> {
    let mut hits = rank(index, query, include_text);
    hits.truncate(limit);
    tracing::debug!("Query {:?} matched {} cards", query, hits.len());
    hits.iter().map(ScoredCard::summary).collect()
}
