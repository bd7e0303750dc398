//! Where raw records come from, and the operations built on top of it.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::card::{Card, CardId};
use crate::error::{FetchError, LoadError};
use crate::index::{BuildReport, Index};
use crate::normalize::Normalizer;

/// Transport for packs and single records.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Fetch a pack and return its raw records.
    async fn load_pack(&self, location: &str) -> Result<Vec<Value>, LoadError>;

    /// Fetch the upstream raw record for one card.
    async fn fetch_raw(&self, id: CardId) -> Result<Value, FetchError>;
}

/// Load a pack and build a fresh index from it.
pub async fn load_index<S>(
    source: &S,
    location: &str,
    normalizer: &Normalizer,
) -> Result<(Index, BuildReport), LoadError>
where
    S: CardSource + ?Sized,
{
    info!("Loading pack from {}", location);
    let records = source.load_pack(location).await?;
    Ok(Index::build(&records, normalizer))
}

/// Fetch and normalize one record without touching any index.
///
/// `Ok(None)` means the upstream record exists but is unusable; that is a
/// "no data" outcome, not an error.
pub async fn fetch_card<S>(
    source: &S,
    normalizer: &Normalizer,
    id: CardId,
) -> Result<Option<Card>, FetchError>
where
    S: CardSource + ?Sized,
{
    let raw = source.fetch_raw(id).await?;
    let card = normalizer.normalize(&raw);
    if card.is_none() {
        info!("Raw record for card {} did not normalize", id);
    }
    Ok(card)
}

/// Re-fetch one card and patch it into `index`.
pub async fn refresh<S>(
    source: &S,
    index: &mut Index,
    normalizer: &Normalizer,
    id: CardId,
) -> Result<Option<Card>, FetchError>
where
    S: CardSource + ?Sized,
{
    let card = fetch_card(source, normalizer, id).await?;
    if let Some(card) = &card {
        let outcome = index.replace(card.clone());
        info!("Refreshed card {} ({:?})", id, outcome);
    }
    Ok(card)
}
