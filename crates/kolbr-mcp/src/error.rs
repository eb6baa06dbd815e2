//! Error types for the KOLBR MCP server

use kolbr_core::KolbrError;
use thiserror::Error;

/// Minimum length of a wallet query before any lookup is attempted
pub const MIN_WALLET_QUERY_LEN: usize = 20;

/// Tool-layer error type
#[derive(Error, Debug)]
pub enum McpError {
    #[error(transparent)]
    Pipeline(#[from] KolbrError),

    /// Terminal error card of an analysis run, already labeled
    #[error("{0}")]
    Analysis(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, McpError>;

/// Validate a wallet query, returning it trimmed. The minimum length is
/// counted on the query as typed.
pub fn validate_wallet_query(query: &str) -> kolbr_core::KolbrResult<&str> {
    if query.chars().count() < MIN_WALLET_QUERY_LEN {
        return Err(KolbrError::InvalidInput(format!(
            "wallet query must have at least {} characters (e.g. DXwuEuLCjq44dHJtBNc6cNGyduHrQ7YwJSZdP69VXGFH)",
            MIN_WALLET_QUERY_LEN
        )));
    }
    Ok(query.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_wallet_query() {
        assert!(validate_wallet_query("").is_err());
        assert!(validate_wallet_query("DXwuEuLCjq44dHJtBNc").is_err());
        assert!(validate_wallet_query("  DXwuEuLCjq44  ").is_err());
        assert_eq!(
            validate_wallet_query(" DXwuEuLCjq44dHJtBNc6 ").unwrap(),
            "DXwuEuLCjq44dHJtBNc6"
        );
        // Length is counted as typed, padding included
        assert_eq!(
            validate_wallet_query("DXwuEuLCjq44dHJtBNc ").unwrap(),
            "DXwuEuLCjq44dHJtBNc"
        );
        assert_eq!(
            validate_wallet_query("   DXwuEuLCjq44dHJtBNc   ").unwrap(),
            "DXwuEuLCjq44dHJtBNc"
        );
    }
}
