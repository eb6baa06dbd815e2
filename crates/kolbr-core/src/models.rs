//! Trade and request models
//!
//! The recent-trades feed is schema-inconsistent: the same concept shows up
//! under different keys depending on which producer recorded the trade, and
//! numbers sometimes arrive as strings. [`RawTrade`] keeps every known alias as
//! its own optional field so the normalizer can resolve them in a fixed order,
//! while [`AnalysisRequest`] is the fully keyed shape the analyst expects.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{KolbrError, KolbrResult};

// =============================================================================
// Raw Trade (as recorded by the feed)
// =============================================================================

/// A trade record exactly as the recent-trades feed returned it.
///
/// Every alias is kept separately; nothing is merged here. The original JSON
/// object is retained in `source` so the trade can be shown back to the user
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RawTrade {
    // Contract address aliases
    pub ca: Option<String>,
    pub mint: Option<String>,
    pub token_mint: Option<String>,

    pub name: Option<String>,
    pub symbol: Option<String>,

    // Market cap aliases
    pub mc: Option<f64>,
    pub market_cap: Option<f64>,

    // Liquidity aliases
    pub liq: Option<f64>,
    pub liquidity: Option<f64>,

    // 24h volume aliases
    pub vol24h: Option<f64>,
    pub volume_24h: Option<f64>,

    pub buys: Option<f64>,
    pub sells: Option<f64>,

    // 24h price change aliases
    pub change: Option<f64>,
    pub price_change_24h: Option<f64>,

    pub price_change_1h: Option<f64>,

    // Trade direction aliases (`type`, `tradeType`)
    pub kind: Option<String>,
    pub trade_type: Option<String>,

    pub kol: Option<RawKol>,

    /// Epoch milliseconds stamped by the trade store (`_ts`)
    pub recorded_at_ms: Option<i64>,

    /// The untouched JSON object
    pub source: Map<String, Value>,
}

impl RawTrade {
    /// Parse user-supplied trade text.
    ///
    /// Fails with `InvalidInput` if the text is not JSON or is not an object.
    pub fn parse(text: &str) -> KolbrResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| KolbrError::InvalidInput(format!("trade is not valid JSON: {}", e)))?;
        Self::try_from(value)
    }

    /// When the trade store recorded this trade, if it was stamped
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.recorded_at_ms
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Pretty-printed original JSON, for display
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.source).unwrap_or_default()
    }
}

impl TryFrom<Value> for RawTrade {
    type Error = KolbrError;

    fn try_from(value: Value) -> KolbrResult<Self> {
        let Value::Object(obj) = value else {
            return Err(KolbrError::InvalidInput("trade must be a JSON object".into()));
        };

        Ok(Self {
            ca: text_field(&obj, "ca"),
            mint: text_field(&obj, "mint"),
            token_mint: text_field(&obj, "tokenMint"),
            name: text_field(&obj, "name"),
            symbol: text_field(&obj, "symbol"),
            mc: number_field(&obj, "mc"),
            market_cap: number_field(&obj, "marketCap"),
            liq: number_field(&obj, "liq"),
            liquidity: number_field(&obj, "liquidity"),
            vol24h: number_field(&obj, "vol24h"),
            volume_24h: number_field(&obj, "volume24h"),
            buys: number_field(&obj, "buys"),
            sells: number_field(&obj, "sells"),
            change: number_field(&obj, "change"),
            price_change_24h: number_field(&obj, "priceChange24h"),
            price_change_1h: number_field(&obj, "priceChange1h"),
            kind: text_field(&obj, "type"),
            trade_type: text_field(&obj, "tradeType"),
            kol: match obj.get("kol") {
                Some(Value::Object(kol)) => Some(RawKol::from_object(kol)),
                _ => None,
            },
            recorded_at_ms: number_field(&obj, "_ts").map(|ms| ms as i64),
            source: obj,
        })
    }
}

impl From<RawTrade> for Value {
    fn from(trade: RawTrade) -> Self {
        Value::Object(trade.source)
    }
}

/// The key opinion leader attached to a trade
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawKol {
    pub name: Option<String>,
    pub win_rate: Option<f64>,
    pub rank: Option<Rank>,
    pub chain: Option<String>,

    // Identity aliases: full wallet address first, then `wallet`
    pub full: Option<String>,
    pub wallet: Option<String>,
}

impl RawKol {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            name: text_field(obj, "name"),
            win_rate: number_field(obj, "winRate"),
            rank: obj.get("rank").and_then(Rank::from_value),
            chain: text_field(obj, "chain"),
            full: text_field(obj, "full"),
            wallet: text_field(obj, "wallet"),
        }
    }

    /// Wallet identity used for lookups
    pub fn identity(&self) -> Option<&str> {
        self.full.as_deref().or(self.wallet.as_deref())
    }
}

/// KOL leaderboard position, or a free-form label when the feed has none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rank {
    Position(u64),
    Label(String),
}

impl Rank {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(
                n.as_u64()
                    .map(Rank::Position)
                    .unwrap_or_else(|| Rank::Label(n.to_string())),
            ),
            Value::String(s) if !s.trim().is_empty() => Some(Rank::Label(s.clone())),
            _ => None,
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::Label("?".to_string())
    }
}

/// Read a non-blank string; numbers are accepted and stringified.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a number; numeric strings are accepted, anything else is absent.
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Analysis Request (canonical)
// =============================================================================

/// Canonical body for `POST /api/analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub token: TokenPayload,
    pub kol: KolPayload,
    /// Lower-cased trade direction, `"buy"` when unknown
    pub trade_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    /// Contract address, never empty
    pub ca: String,
    pub name: String,
    pub symbol: String,
    pub market_cap: f64,
    pub liquidity: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub buys: f64,
    pub sells: f64,
    #[serde(rename = "priceChange24h")]
    pub price_change_24h: f64,
    #[serde(rename = "priceChange1h")]
    pub price_change_1h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KolPayload {
    pub name: String,
    pub win_rate: f64,
    pub rank: Rank,
    pub chain: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rejects_non_json() {
        let err = RawTrade::parse("{ca: ABC").unwrap_err();
        assert!(matches!(err, KolbrError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = RawTrade::parse(r#"["ABC", 1]"#).unwrap_err();
        assert_eq!(
            err,
            KolbrError::InvalidInput("trade must be a JSON object".into())
        );
    }

    #[test]
    fn test_lenient_fields() {
        let trade = RawTrade::parse(
            r#"{"ca": "", "mint": "MINT1", "mc": "125000.5", "liq": true, "buys": 42, "name": null}"#,
        )
        .unwrap();

        // Blank strings and nulls count as absent
        assert_eq!(trade.ca, None);
        assert_eq!(trade.name, None);
        assert_eq!(trade.mint.as_deref(), Some("MINT1"));
        assert_eq!(trade.mc, Some(125000.5));
        assert_eq!(trade.liq, None);
        assert_eq!(trade.buys, Some(42.0));
    }

    #[test]
    fn test_kol_identity_prefers_full() {
        let trade = RawTrade::parse(
            r#"{"ca": "X", "kol": {"name": "Joao", "full": "FULLWALLET", "wallet": "SHORT", "rank": 3}}"#,
        )
        .unwrap();
        let kol = trade.kol.unwrap();
        assert_eq!(kol.identity(), Some("FULLWALLET"));
        assert_eq!(kol.rank, Some(Rank::Position(3)));

        let only_wallet = RawTrade::parse(r#"{"kol": {"wallet": "W1"}}"#).unwrap();
        assert_eq!(only_wallet.kol.unwrap().identity(), Some("W1"));
    }

    #[test]
    fn test_source_is_preserved_for_display() {
        let original = json!({"ca": "ABC", "mc": "500", "extra": {"nested": [1, 2]}, "_ts": 1735689600000i64});
        let trade = RawTrade::try_from(original.clone()).unwrap();

        assert_eq!(Value::from(trade.clone()), original);
        assert_eq!(
            trade.recorded_at().unwrap().to_rfc3339(),
            "2025-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_feed_list_deserializes() {
        let trades: Vec<RawTrade> =
            serde_json::from_value(json!([{"ca": "A"}, {"tokenMint": "B"}])).unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[1].token_mint.as_deref(), Some("B"));
    }
}
