//! Raw record → [`Card`] conversion.
//!
//! Packs come from several generations of tooling, so the same logical field
//! can appear under a capitalized or a lowercase key. Each field has an
//! explicit alias list; the first alias holding a non-null value wins and
//! the others are ignored.

use serde_json::{Map, Value};

use crate::card::{Card, CardFields, CardId};

/// Per-id location of the upstream record. `{id}` is replaced by the card id.
pub const DEFAULT_RAW_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/MikaMikaDE/mikaRulings/main/cards/{id}.json";

const ID_KEYS: &[&str] = &["id", "Id"];
const NAME_KEYS: &[&str] = &["Name", "name"];
const TYPE_KEYS: &[&str] = &["Type", "type"];
const EXTRA_KEYS: &[&str] = &["Extra", "extra"];
const ATTRIBUTE_KEYS: &[&str] = &["Attribute", "attribute"];
const TEXT_KEYS: &[&str] = &["Text", "text"];
const ATK_KEYS: &[&str] = &["Atk", "atk"];
const DEF_KEYS: &[&str] = &["Def", "def"];
const LEVEL_KEYS: &[&str] = &["Level", "level"];
const RULINGS_KEYS: &[&str] = &["Rulings", "rulings"];
const PSCT_KEYS: &[&str] = &["PSCT", "psct"];

/// The only annotation variant surfaced on a [`Card`].
const EDISON_VARIANT: &str = "Edison";

/// Largest integer an f64 represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Converts raw records into cards, deriving `raw_url` from a template.
#[derive(Debug, Clone)]
pub struct Normalizer {
    raw_url_template: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_RAW_URL_TEMPLATE)
    }
}

impl Normalizer {
    #[must_use]
    pub fn new(raw_url_template: impl Into<String>) -> Self {
        Self {
            raw_url_template: raw_url_template.into(),
        }
    }

    /// Upstream location of the record with the given id.
    #[must_use]
    pub fn raw_url(&self, id: CardId) -> String {
        self.raw_url_template.replace("{id}", &id.to_string())
    }

    /// Normalize one raw record.
    ///
    /// Returns `None` when the record is not an object, has no usable id
    /// (missing, zero, negative, fractional or non-numeric), or has a name
    /// that is empty after trimming. Never panics.
    #[must_use]
    pub fn normalize(&self, raw: &Value) -> Option<Card> {
        let record = raw.as_object()?;

        let id = field(record, ID_KEYS).and_then(coerce_id)?;
        let name = field(record, NAME_KEYS).map(coerce_string).unwrap_or_default();
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let fields = CardFields {
            card_type: trimmed(record, TYPE_KEYS),
            extra: trimmed(record, EXTRA_KEYS),
            attribute: trimmed(record, ATTRIBUTE_KEYS),
            text: trimmed(record, TEXT_KEYS),
            atk: stat(record, ATK_KEYS),
            def: stat(record, DEF_KEYS),
            level: stat(record, LEVEL_KEYS),
            rulings_edison: edison_or_string(field(record, RULINGS_KEYS)),
            psct_edison: edison_or_string(field(record, PSCT_KEYS)),
        };

        Some(Card::from_fields(
            id,
            name.to_string(),
            self.raw_url(id),
            fields,
        ))
    }
}

/// Normalize with the built-in raw URL template.
#[must_use]
pub fn normalize(raw: &Value) -> Option<Card> {
    Normalizer::default().normalize(raw)
}

fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|value| !value.is_null()))
}

fn trimmed(record: &Map<String, Value>, keys: &[&str]) -> String {
    field(record, keys)
        .map(coerce_string)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn coerce_id(value: &Value) -> Option<CardId> {
    let n = coerce_number(value)?;
    if !n.is_finite() || n <= 0.0 || n.fract() != 0.0 || n > MAX_EXACT_INTEGER {
        return None;
    }
    CardId::new(n as u64)
}

/// Stats are only read when present and not the empty string. Values that
/// do not coerce to an integer (`"?"`, `"X"`) stay unset.
fn stat(record: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    let value = field(record, keys)?;
    if value.as_str() == Some("") {
        return None;
    }
    let n = coerce_number(value)?;
    if !n.is_finite() || n.fract() != 0.0 || n.abs() > MAX_EXACT_INTEGER {
        return None;
    }
    Some(n as i64)
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Annotation fields are either a plain string or an object keyed by
/// variant name. Only the Edison variant is kept.
fn edison_or_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(variants)) => variants
            .get(EDISON_VARIANT)
            .filter(|v| is_truthy(v))
            .map(coerce_string)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
