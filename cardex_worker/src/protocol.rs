//! Messages exchanged with the worker.
//!
//! On the wire every message is `{ "type": ..., "payload": ... }` with
//! camelCase names throughout.

use cardex_core::{Card, CardId, ResultSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Request {
    /// Load a pack and replace the index.
    Init(InitPayload),
    Search(SearchPayload),
    Get(IdPayload),
    /// Re-fetch one card from upstream and patch it into the index.
    RefreshRaw(IdPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    pub pack_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    #[serde(default, alias = "q")]
    pub query: String,
    /// Falls back to the worker's default limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub include_text: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPayload {
    pub id: CardId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Response {
    Ready {
        count: usize,
        elapsed_ms: u64,
    },
    SearchResults {
        query: String,
        results: Vec<ResultSummary>,
    },
    /// `card` is `null` when the id is unknown or the upstream record was
    /// unusable.
    Card {
        card: Option<Card>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        refreshed: bool,
    },
    Error {
        message: String,
    },
}

impl Response {
    #[must_use]
    pub fn error(message: impl ToString) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Request {
        match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => panic!("request should parse: {e}"),
        }
    }

    #[test]
    fn parses_init() {
        let request = parse(json!({ "type": "init", "payload": { "packUrl": "data/pack.json" } }));
        assert_eq!(
            request,
            Request::Init(InitPayload {
                pack_url: "data/pack.json".to_string()
            })
        );
    }

    #[test]
    fn search_accepts_q_alias_and_defaults() {
        let request = parse(json!({ "type": "search", "payload": { "q": "dark" } }));
        assert_eq!(
            request,
            Request::Search(SearchPayload {
                query: "dark".to_string(),
                limit: None,
                include_text: false,
            })
        );

        let request = parse(json!({
            "type": "search",
            "payload": { "query": "dragon", "limit": 5, "includeText": true }
        }));
        let Request::Search(payload) = request else {
            panic!("expected search");
        };
        assert_eq!(payload.limit, Some(5));
        assert!(payload.include_text);
    }

    #[test]
    fn refresh_raw_uses_camel_case_tag() {
        let request = parse(json!({ "type": "refreshRaw", "payload": { "id": 42 } }));
        let Request::RefreshRaw(IdPayload { id }) = request else {
            panic!("expected refreshRaw");
        };
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn zero_id_is_rejected() {
        let result: Result<Request, _> =
            serde_json::from_value(json!({ "type": "get", "payload": { "id": 0 } }));
        assert!(result.is_err());
    }

    #[test]
    fn responses_serialize_camel_case() {
        let ready = Response::Ready {
            count: 3,
            elapsed_ms: 12,
        };
        assert_eq!(
            serde_json::to_value(&ready).ok(),
            Some(json!({ "type": "ready", "payload": { "count": 3, "elapsedMs": 12 } }))
        );

        let results = Response::SearchResults {
            query: "x".to_string(),
            results: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&results).ok(),
            Some(json!({ "type": "searchResults", "payload": { "query": "x", "results": [] } }))
        );
    }

    #[test]
    fn card_response_only_marks_refreshes() {
        let plain = Response::Card {
            card: None,
            refreshed: false,
        };
        assert_eq!(
            serde_json::to_value(&plain).ok(),
            Some(json!({ "type": "card", "payload": { "card": null } }))
        );

        let refreshed = Response::Card {
            card: None,
            refreshed: true,
        };
        assert_eq!(
            serde_json::to_value(&refreshed).ok(),
            Some(json!({ "type": "card", "payload": { "card": null, "refreshed": true } }))
        );
    }
}
