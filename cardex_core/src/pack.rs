//! Pack document shapes.
//!
//! A pack is accepted in one of three layouts, checked in this order:
//!
//! 1. a bare array of records
//! 2. an object whose `cards` field is an array of records
//! 3. any other object, whose values (in document order) are the records
//!
//! Nothing else is inferred.

use serde_json::{Map, Value};

use crate::error::LoadError;

const CARDS_FIELD: &str = "cards";

/// A pack document resolved to one of the accepted layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum PackShape {
    Sequence(Vec<Value>),
    Wrapped(Vec<Value>),
    Keyed(Map<String, Value>),
}

impl PackShape {
    pub fn resolve(document: Value) -> Result<Self, LoadError> {
        match document {
            Value::Array(records) => Ok(Self::Sequence(records)),
            Value::Object(mut object) => {
                if let Some(Value::Array(records)) = object.get_mut(CARDS_FIELD) {
                    return Ok(Self::Wrapped(std::mem::take(records)));
                }
                // A non-array `cards` is just another keyed record.
                Ok(Self::Keyed(object))
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                Err(LoadError::FormatNotRecognized)
            }
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Sequence(_) => "sequence",
            Self::Wrapped(_) => "wrapped",
            Self::Keyed(_) => "keyed",
        }
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Self::Sequence(records) | Self::Wrapped(records) => records,
            Self::Keyed(object) => object.into_iter().map(|(_, record)| record).collect(),
        }
    }
}

/// Parse pack bytes into raw records.
pub fn parse_pack(bytes: &[u8]) -> Result<Vec<Value>, LoadError> {
    let document: Value = serde_json::from_slice(bytes)?;
    let shape = PackShape::resolve(document)?;
    tracing::debug!("Resolved pack shape: {}", shape.kind());
    Ok(shape.into_records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(bytes: &str) -> Vec<Value> {
        match parse_pack(bytes.as_bytes()) {
            Ok(records) => records,
            Err(e) => panic!("pack should parse: {e}"),
        }
    }

    #[test]
    fn bare_array_is_a_sequence() {
        let Ok(shape) = PackShape::resolve(json!([{ "id": 1 }, { "id": 2 }])) else {
            panic!("array should resolve");
        };
        assert_eq!(shape.kind(), "sequence");
        assert_eq!(shape.into_records().len(), 2);
    }

    #[test]
    fn cards_field_is_unwrapped() {
        let recs = records(r#"{ "version": 3, "cards": [{ "id": 1 }, { "id": 2 }, { "id": 3 }] }"#);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[2]["id"], 3);
    }

    #[test]
    fn keyed_object_yields_values_in_document_order() {
        let recs = records(
            r#"{ "89631139": { "id": 89631139 }, "46986414": { "id": 46986414 }, "1": { "id": 1 } }"#,
        );
        let ids: Vec<_> = recs.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(89_631_139), json!(46_986_414), json!(1)]);
    }

    #[test]
    fn non_array_cards_field_falls_back_to_keyed() {
        let Ok(shape) = PackShape::resolve(json!({ "cards": { "id": 9 }, "x": { "id": 10 } })) else {
            panic!("object should resolve");
        };
        assert_eq!(shape.kind(), "keyed");
        assert_eq!(shape.into_records().len(), 2);
    }

    #[test]
    fn empty_object_is_an_empty_pack() {
        assert!(records("{}").is_empty());
    }

    #[test]
    fn scalars_are_not_recognized() {
        for doc in ["null", "42", "\"cards\"", "true"] {
            assert!(matches!(
                parse_pack(doc.as_bytes()),
                Err(LoadError::FormatNotRecognized)
            ));
        }
    }

    #[test]
    fn invalid_json_is_a_load_error() {
        assert!(matches!(parse_pack(b"[{"), Err(LoadError::Json(_))));
    }
}
