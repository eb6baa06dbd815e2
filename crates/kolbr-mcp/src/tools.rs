//! MCP tool definitions and request handling
//!
//! Exposes the three caller entry points (latest trade, wallet lookup,
//! analysis) plus a health check. Every failure becomes an `isError` tool
//! result; nothing escapes past this layer.

use std::sync::Arc;

use kolbr_core::{AnalysisState, Presentation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::TradeSource;
use crate::config::ApiConfig;
use crate::error::{McpError, Result};
use crate::locator::TradeLocator;
use crate::pipeline::AnalysisPipeline;

// =============================================================================
// MCP Protocol Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent on notifications
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Sink for out-of-band messages sent while a request is in flight
pub type Notifier<'a> = &'a dyn Fn(JsonRpcNotification);

// =============================================================================
// KOLBR Tools
// =============================================================================

pub struct KolbrTools<S> {
    source: Arc<S>,
    locator: TradeLocator<S>,
    pipeline: AnalysisPipeline<S>,
    recent_limit: usize,
    wallet_scan_limit: usize,
}

impl<S: TradeSource> KolbrTools<S> {
    pub fn new(source: Arc<S>, config: &ApiConfig) -> Self {
        Self {
            locator: TradeLocator::new(Arc::clone(&source)),
            pipeline: AnalysisPipeline::new(Arc::clone(&source)),
            source,
            recent_limit: config.recent_limit,
            wallet_scan_limit: config.wallet_scan_limit,
        }
    }

    /// Get all available tools
    pub fn get_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "kolbr_health".to_string(),
                description: "Check whether the KOLBR API is reachable".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            Tool {
                name: "kolbr_fetch_recent".to_string(),
                description: "Fetch the latest trade made by a tracked Brazilian KOL on Solana. Returns the raw trade JSON, ready to pass to kolbr_run_analysis.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "limit": {
                            "type": "integer",
                            "description": format!("How many recent trades to request (default: {})", self.recent_limit)
                        }
                    },
                    "required": []
                }),
            },
            Tool {
                name: "kolbr_find_by_wallet".to_string(),
                description: "Find the most recent trade made by a KOL wallet. Partial wallets are accepted (at least 20 characters).".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "wallet": {
                            "type": "string",
                            "description": "KOL wallet address, full or partial (base58)"
                        },
                        "limit": {
                            "type": "integer",
                            "description": format!("How many recent trades to scan (default: {})", self.wallet_scan_limit)
                        }
                    },
                    "required": ["wallet"]
                }),
            },
            Tool {
                name: "kolbr_run_analysis".to_string(),
                description: "Analyze a trade with the KOLBR Analyst. Sends a loading notification, then returns the verdict (COMPRA / NEUTRO / EVITAR), confidence, risk, summary, positives and risks.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "trade": {
                            "type": "string",
                            "description": "Trade JSON, as returned by kolbr_fetch_recent or kolbr_find_by_wallet"
                        }
                    },
                    "required": ["trade"]
                }),
            },
        ]
    }

    /// Execute a tool by name
    pub async fn execute(
        &self,
        name: &str,
        args: &Value,
        progress_token: Option<&Value>,
        notify: Notifier<'_>,
    ) -> Result<Value> {
        match name {
            "kolbr_health" => {
                let health = self.source.health().await;
                Ok(json!({
                    "status": if health.is_ok() { "healthy" } else { "unreachable" },
                    "version": env!("CARGO_PKG_VERSION"),
                    "api": {
                        "available": health.is_ok(),
                        "response": health.as_ref().ok(),
                        "error": health.as_ref().err().map(|e| e.to_string()),
                    }
                }))
            }

            "kolbr_fetch_recent" => {
                let limit = limit_arg(args, self.recent_limit);
                let trade = self.locator.fetch_recent(limit).await?;
                Ok(trade.into())
            }

            "kolbr_find_by_wallet" => {
                let wallet = args["wallet"]
                    .as_str()
                    .ok_or_else(|| McpError::InvalidParameter("Missing wallet parameter".into()))?;
                let limit = limit_arg(args, self.wallet_scan_limit);
                let trade = self.locator.find_by_wallet(wallet, limit).await?;
                Ok(trade.into())
            }

            "kolbr_run_analysis" => {
                // Accept the trade either as text or as an already-parsed object.
                // A missing trade still goes through the pipeline and ends as invalid input.
                let trade_text = match &args["trade"] {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };

                let mut terminal = None;
                self.pipeline
                    .run_analysis(&trade_text, |state| match state {
                        AnalysisState::Loading => {
                            notify(loading_notification(progress_token, &AnalysisState::Loading))
                        }
                        AnalysisState::Done(presentation) => terminal = Some(presentation),
                    })
                    .await;

                match terminal {
                    Some(Presentation::Error { message }) => Err(McpError::Analysis(message)),
                    Some(presentation) => Ok(json!({
                        "html": presentation.to_html(),
                        "presentation": serde_json::to_value(&presentation)?,
                    })),
                    None => Err(McpError::Analysis("analysis produced no result".into())),
                }
            }

            _ => Err(McpError::UnknownTool(name.to_string())),
        }
    }
}

fn limit_arg(args: &Value, default: usize) -> usize {
    args["limit"]
        .as_u64()
        .map(|l| l as usize)
        .filter(|l| *l > 0)
        .unwrap_or(default)
}

/// Loading state as an MCP notification: a progress update when the caller
/// asked for one, a log message otherwise.
fn loading_notification(progress_token: Option<&Value>, state: &AnalysisState) -> JsonRpcNotification {
    let params = match progress_token {
        Some(token) => json!({
            "progressToken": token,
            "progress": 0,
            "total": 1,
            "message": "KOLBR Analyst analisando...",
        }),
        None => json!({
            "level": "info",
            "logger": "kolbr",
            "data": {
                "state": state,
                "html": state.to_html(),
            },
        }),
    };

    JsonRpcNotification {
        jsonrpc: "2.0".to_string(),
        method: if progress_token.is_some() {
            "notifications/progress".to_string()
        } else {
            "notifications/message".to_string()
        },
        params,
    }
}

// =============================================================================
// MCP Protocol Handlers
// =============================================================================

fn handle_initialize(_params: &Value) -> Value {
    json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {},
            "logging": {}
        },
        "serverInfo": {
            "name": "kolbr-mcp",
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn handle_list_tools<S: TradeSource>(tools: &KolbrTools<S>) -> Value {
    json!({
        "tools": tools.get_tools()
    })
}

async fn handle_call_tool<S: TradeSource>(
    tools: &KolbrTools<S>,
    params: &Value,
    notify: Notifier<'_>,
) -> Value {
    let name = params["name"].as_str().unwrap_or("");
    let args = &params["arguments"];
    let progress_token = params["_meta"].get("progressToken");

    let outcome = tools.execute(name, args, progress_token, notify).await;
    if let Err(e) = &outcome {
        tracing::warn!(tool = %name, error = %e, "Tool call failed");
    }

    match outcome {
        Ok(result) => {
            json!({
                "content": [{
                    "type": "text",
                    "text": serde_json::to_string_pretty(&result).unwrap_or_default()
                }]
            })
        }
        Err(e) => {
            json!({
                "content": [{
                    "type": "text",
                    "text": format!("Error: {}", e)
                }],
                "isError": true
            })
        }
    }
}

/// Handle an incoming MCP request
pub async fn handle_request<S: TradeSource>(
    tools: &KolbrTools<S>,
    request: JsonRpcRequest,
    notify: Notifier<'_>,
) -> Option<JsonRpcResponse> {
    if request.method.starts_with("notifications/") || request.method == "initialized" {
        return None;
    }

    let result = match request.method.as_str() {
        "initialize" => handle_initialize(&request.params),
        "ping" => json!({}),
        "tools/list" => handle_list_tools(tools),
        "tools/call" => handle_call_tool(tools, &request.params, notify).await,
        _ => {
            return Some(JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32601,
                    message: format!("Method not found: {}", request.method),
                }),
            });
        }
    };

    Some(JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id: request.id,
        result: Some(result),
        error: None,
    })
}
