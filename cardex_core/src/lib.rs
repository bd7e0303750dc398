#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]

//! In-memory card catalog: normalization, indexing and ranked search.
//!
//! The crate is transport-free. Raw records come in as `serde_json::Value`s
//! (from whatever [`CardSource`] the caller plugs in), are normalized into
//! [`Card`]s, and land in an [`Index`] that answers tiered prefix/substring
//! queries.

pub mod card;
pub mod collate;
pub mod error;
pub mod index;
pub mod normalize;
pub mod pack;
pub mod query;
pub mod source;

pub use card::{Card, CardId, HitKind, ResultSummary};
pub use error::{FetchError, LoadError};
pub use index::{BuildReport, Index, Replacement};
pub use normalize::{DEFAULT_RAW_URL_TEMPLATE, Normalizer, normalize};
pub use pack::{PackShape, parse_pack};
pub use query::{MatchTier, Query, ScoredCard, rank, search};
pub use source::{CardSource, fetch_card, load_index, refresh};

/// Result cap used when the caller does not supply one.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;
