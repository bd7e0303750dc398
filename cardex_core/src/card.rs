//! Canonical card types.
//!
//! A [`Card`] is only ever produced by the normalizer, which keeps the
//! lowercase mirrors (`name_lower`, `text_lower`) in sync with their source
//! fields. Cards are never mutated after construction; a refresh swaps in a
//! brand-new value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

use crate::collate::CollationKey;

/// Primary key of a card. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(NonZeroU64);

impl CardId {
    /// Returns `None` for zero.
    #[must_use]
    pub const fn new(id: u64) -> Option<Self> {
        match NonZeroU64::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which field satisfied a search match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    Name,
    Text,
}

impl HitKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for HitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    id: CardId,
    name: String,
    #[serde(skip)]
    name_lower: String,
    #[serde(skip)]
    collation_key: CollationKey,
    #[serde(rename = "type")]
    card_type: String,
    extra: String,
    attribute: String,
    text: String,
    #[serde(skip)]
    text_lower: String,
    atk: Option<i64>,
    def: Option<i64>,
    level: Option<i64>,
    rulings_edison: String,
    psct_edison: String,
    raw_url: String,
}

/// Everything the normalizer extracted from one raw record.
#[derive(Debug, Clone, Default)]
pub(crate) struct CardFields {
    pub card_type: String,
    pub extra: String,
    pub attribute: String,
    pub text: String,
    pub atk: Option<i64>,
    pub def: Option<i64>,
    pub level: Option<i64>,
    pub rulings_edison: String,
    pub psct_edison: String,
}

impl Card {
    pub(crate) fn from_fields(id: CardId, name: String, raw_url: String, fields: CardFields) -> Self {
        let name_lower = name.to_lowercase();
        let collation_key = CollationKey::new(&name);
        let text_lower = fields.text.to_lowercase();
        Self {
            id,
            name,
            name_lower,
            collation_key,
            card_type: fields.card_type,
            extra: fields.extra,
            attribute: fields.attribute,
            text: fields.text,
            text_lower,
            atk: fields.atk,
            def: fields.def,
            level: fields.level,
            rulings_edison: fields.rulings_edison,
            psct_edison: fields.psct_edison,
            raw_url,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn name_lower(&self) -> &str {
        &self.name_lower
    }

    /// Sort key for the name; see [`crate::collate`].
    #[must_use]
    pub const fn collation_key(&self) -> &CollationKey {
        &self.collation_key
    }

    #[must_use]
    pub fn card_type(&self) -> &str {
        &self.card_type
    }

    #[must_use]
    pub fn extra(&self) -> &str {
        &self.extra
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn text_lower(&self) -> &str {
        &self.text_lower
    }

    #[must_use]
    pub const fn atk(&self) -> Option<i64> {
        self.atk
    }

    #[must_use]
    pub const fn def(&self) -> Option<i64> {
        self.def
    }

    #[must_use]
    pub const fn level(&self) -> Option<i64> {
        self.level
    }

    /// Edison-format rulings, empty when the record carried none.
    #[must_use]
    pub fn rulings_edison(&self) -> &str {
        &self.rulings_edison
    }

    /// Edison-format PSCT text, empty when the record carried none.
    #[must_use]
    pub fn psct_edison(&self) -> &str {
        &self.psct_edison
    }

    #[must_use]
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    /// Project this card onto the fields a result list shows.
    #[must_use]
    pub fn summary(&self, hit: HitKind) -> ResultSummary {
        ResultSummary {
            id: self.id,
            name: self.name.clone(),
            card_type: self.card_type.clone(),
            extra: self.extra.clone(),
            attribute: self.attribute.clone(),
            hit,
        }
    }
}

/// One row of a search result. Text, stats and annotations are left out;
/// the detail view fetches the full [`Card`] by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub id: CardId,
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub extra: String,
    pub attribute: String,
    pub hit: HitKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Card {
        let Some(id) = CardId::new(89_631_139) else {
            panic!("non-zero id");
        };
        Card::from_fields(
            id,
            "Blue-Eyes White Dragon".to_string(),
            "https://example.test/89631139.json".to_string(),
            CardFields {
                card_type: "Normal Monster".to_string(),
                text: "This legendary DRAGON is a powerful engine of destruction.".to_string(),
                atk: Some(3000),
                def: Some(2500),
                level: Some(8),
                rulings_edison: "Edison ruling".to_string(),
                ..CardFields::default()
            },
        )
    }

    #[test]
    fn card_id_rejects_zero() {
        assert!(CardId::new(0).is_none());
        assert_eq!(CardId::new(7).map(CardId::get), Some(7));
    }

    #[test]
    fn lowercase_mirrors_follow_source() {
        let card = sample();
        assert_eq!(card.name_lower(), "blue-eyes white dragon");
        assert_eq!(card.text_lower(), card.text().to_lowercase());
    }

    #[test]
    fn serialized_card_uses_camel_case_and_hides_mirrors() {
        let value = match serde_json::to_value(sample()) {
            Ok(value) => value,
            Err(e) => panic!("serialize card: {e}"),
        };
        assert_eq!(value["id"], 89_631_139);
        assert_eq!(value["type"], "Normal Monster");
        assert_eq!(value["rulingsEdison"], "Edison ruling");
        assert_eq!(value["rawUrl"], "https://example.test/89631139.json");
        assert!(value["extra"].is_string());
        assert!(value["level"].is_number());
        assert!(value.get("nameLower").is_none());
        assert!(value.get("textLower").is_none());
    }

    #[test]
    fn summary_drops_detail_fields() {
        let summary = sample().summary(HitKind::Name);
        let value = match serde_json::to_value(&summary) {
            Ok(value) => value,
            Err(e) => panic!("serialize summary: {e}"),
        };
        assert_eq!(value["hit"], "name");
        assert_eq!(value["type"], "Normal Monster");
        assert!(value.get("text").is_none());
        assert!(value.get("atk").is_none());
        assert!(value.get("rulingsEdison").is_none());
    }
}
