//! Payload normalization
//!
//! Turns a [`RawTrade`] into the canonical [`AnalysisRequest`]. Each canonical
//! field lists its source aliases in precedence order; the first alias present
//! in the trade wins. Pure and total, except when no contract address resolves.

use crate::error::{KolbrError, KolbrResult};
use crate::models::{AnalysisRequest, KolPayload, RawKol, RawTrade, TokenPayload};

/// Trade direction assumed when the record carries none
pub const DEFAULT_TRADE_TYPE: &str = "buy";

/// Placeholder for unknown text fields
pub const UNKNOWN: &str = "?";

/// Chain assumed when the KOL descriptor carries none
pub const DEFAULT_CHAIN: &str = "SOL";

/// Return the first present candidate, in the order given.
pub fn first_present<'a, T: ?Sized>(candidates: &[Option<&'a T>]) -> Option<&'a T> {
    candidates.iter().copied().flatten().next()
}

fn number(candidates: &[Option<&f64>]) -> f64 {
    first_present(candidates).copied().unwrap_or(0.0)
}

fn text(candidates: &[Option<&str>], default: &str) -> String {
    first_present(candidates).unwrap_or(default).to_string()
}

/// Build the analyst request for a trade.
///
/// Fails with `MissingField` if none of `ca`, `mint`, `tokenMint` is present.
pub fn build_request(trade: &RawTrade) -> KolbrResult<AnalysisRequest> {
    let ca = first_present(&[
        trade.ca.as_deref(),
        trade.mint.as_deref(),
        trade.token_mint.as_deref(),
    ])
    .ok_or_else(|| {
        KolbrError::MissingField("trade has no contract address (ca, mint or tokenMint)".into())
    })?;

    let token = TokenPayload {
        ca: ca.to_string(),
        name: text(&[trade.name.as_deref()], UNKNOWN),
        symbol: text(&[trade.symbol.as_deref()], UNKNOWN),
        market_cap: number(&[trade.mc.as_ref(), trade.market_cap.as_ref()]),
        liquidity: number(&[trade.liq.as_ref(), trade.liquidity.as_ref()]),
        volume_24h: number(&[trade.vol24h.as_ref(), trade.volume_24h.as_ref()]),
        buys: number(&[trade.buys.as_ref()]),
        sells: number(&[trade.sells.as_ref()]),
        price_change_24h: number(&[trade.change.as_ref(), trade.price_change_24h.as_ref()]),
        price_change_1h: number(&[trade.price_change_1h.as_ref()]),
    };

    let no_kol = RawKol::default();
    let kol = trade.kol.as_ref().unwrap_or(&no_kol);
    let kol = KolPayload {
        name: text(&[kol.name.as_deref()], UNKNOWN),
        win_rate: number(&[kol.win_rate.as_ref()]),
        rank: kol.rank.clone().unwrap_or_default(),
        chain: text(&[kol.chain.as_deref()], DEFAULT_CHAIN),
    };

    let trade_type = text(
        &[trade.kind.as_deref(), trade.trade_type.as_deref()],
        DEFAULT_TRADE_TYPE,
    )
    .trim()
    .to_lowercase();

    Ok(AnalysisRequest {
        token,
        kol,
        trade_type,
    })
}
