//! Trade lookup
//!
//! Finds a single trade to analyze, either the latest one in the feed or the
//! latest one made by a given KOL wallet.

use std::sync::Arc;

use kolbr_core::{KolbrError, KolbrResult, RawTrade};

use crate::client::TradeSource;
use crate::error::validate_wallet_query;

pub struct TradeLocator<S> {
    source: Arc<S>,
}

impl<S: TradeSource> TradeLocator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Latest trade among the `limit` most recent ones
    pub async fn fetch_recent(&self, limit: usize) -> KolbrResult<RawTrade> {
        let entries = self.source.recent_trades(limit).await?;

        let first = entries
            .into_iter()
            .next()
            .ok_or_else(|| KolbrError::NotFound("no recent trades available".into()))?;
        let trade = RawTrade::try_from(first)?;

        tracing::info!(
            ca = ?trade.ca,
            recorded_at = ?trade.recorded_at(),
            "Fetched latest trade"
        );
        Ok(trade)
    }

    /// First trade, in feed order, whose KOL wallet matches `query`.
    ///
    /// The query is validated before any network call. Matching is a
    /// case-insensitive substring test in both directions, so a partial
    /// wallet on either side still matches. A trade without a KOL wallet has
    /// an empty identity, which matches any query. Feed entries that are not
    /// objects are skipped.
    pub async fn find_by_wallet(&self, query: &str, limit: usize) -> KolbrResult<RawTrade> {
        let query = validate_wallet_query(query)?.to_lowercase();

        let entries = self.source.recent_trades(limit).await?;
        let scanned = entries.len();

        let found = entries
            .into_iter()
            .filter_map(|entry| RawTrade::try_from(entry).ok())
            .find(|trade| {
                let identity = trade
                    .kol
                    .as_ref()
                    .and_then(|kol| kol.identity())
                    .unwrap_or("");
                wallet_matches(identity, &query)
            });

        match found {
            Some(trade) => {
                tracing::info!(scanned, ca = ?trade.ca, "Found trade for wallet");
                Ok(trade)
            }
            None => {
                tracing::info!(scanned, "No trade found for wallet");
                Err(KolbrError::NotFound("no trade found for this wallet".into()))
            }
        }
    }
}

/// Bidirectional case-insensitive substring match. `query` must already be
/// trimmed and lower-cased.
fn wallet_matches(identity: &str, query: &str) -> bool {
    let identity = identity.to_lowercase();
    identity.contains(query) || query.contains(identity.as_str())
}
