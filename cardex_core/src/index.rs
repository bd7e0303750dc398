//! Card index: ordered card sequence plus id → slot lookup.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::card::{Card, CardId, ResultSummary};
use crate::normalize::Normalizer;
use crate::query;

/// Counters collected while building an [`Index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Raw records offered to the normalizer.
    pub records: usize,
    /// Records the normalizer rejected (missing id or name).
    pub rejected: usize,
    /// Accepted records whose id was already indexed.
    pub duplicates: usize,
}

/// What [`Index::replace`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// An existing slot was overwritten.
    Replaced,
    /// The id was new and the card was appended.
    Appended,
}

/// Normalized card set.
///
/// Iteration order is pack order. Every id occupies exactly one slot: a
/// later record with an already-seen id takes over the earlier record's
/// slot, so the sequence and the lookup never disagree.
#[derive(Debug, Clone, Default)]
pub struct Index {
    cards: Vec<Arc<Card>>,
    slots: HashMap<CardId, usize>,
}

impl Index {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize every raw record and index the survivors.
    #[must_use]
    pub fn build(records: &[Value], normalizer: &Normalizer) -> (Self, BuildReport) {
        let mut index = Self {
            cards: Vec::with_capacity(records.len()),
            slots: HashMap::with_capacity(records.len()),
        };
        let mut report = BuildReport {
            records: records.len(),
            ..BuildReport::default()
        };

        for raw in records {
            let Some(card) = normalizer.normalize(raw) else {
                report.rejected += 1;
                continue;
            };
            if index.replace(card) == Replacement::Replaced {
                report.duplicates += 1;
            }
        }

        if report.duplicates > 0 {
            warn!(
                "Pack contained {} duplicate ids; later records replaced earlier ones",
                report.duplicates
            );
        }
        info!(
            "Built index: {} cards from {} records ({} rejected)",
            index.len(),
            report.records,
            report.rejected
        );

        (index, report)
    }

    /// Index already-normalized cards, same duplicate policy as [`Index::build`].
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut index = Self::new();
        for card in cards {
            index.replace(card);
        }
        index
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.slots.get(&id).map(|&slot| self.cards[slot].as_ref())
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Upsert by id: overwrite the existing slot, or append when the id is new.
    pub fn replace(&mut self, card: Card) -> Replacement {
        let id = card.id();
        if let Some(&slot) = self.slots.get(&id) {
            debug!("Replacing card {} in slot {}", id, slot);
            self.cards[slot] = Arc::new(card);
            Replacement::Replaced
        } else {
            self.slots.insert(id, self.cards.len());
            self.cards.push(Arc::new(card));
            Replacement::Appended
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().map(AsRef::as_ref)
    }

    pub(crate) fn cards(&self) -> &[Arc<Card>] {
        &self.cards
    }

    /// Ranked search; see [`query::search`].
    #[must_use]
    pub fn search(&self, query: &str, limit: usize, include_text: bool) -> Vec<ResultSummary> {
        query::search(self, query, limit, include_text)
    }
}
