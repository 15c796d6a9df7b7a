//! Stdio serve loop: line-delimited JSON-RPC 2.0.
//!
//! Two methods are exposed: `tools/list` for discovery and
//! `tools/call` for invocation. The loop holds no state beyond the
//! registry and ends at EOF; each request with an id gets exactly one
//! response line on stdout, and notifications (no id) get none.

use anyhow::Result;
use nws_core::{ToolError, ToolRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Self { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    fn err(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError { code, message: message.into() }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Run the loop until stdin closes.
pub async fn serve(registry: ToolRegistry) -> Result<()> {
    info!(tools = ?registry.names(), "tool server listening on stdio");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(response) = handle_line(&registry, &line).await else {
            continue;
        };

        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

async fn handle_line(registry: &ToolRegistry, line: &str) -> Option<Response> {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            return Some(Response::err(Value::Null, PARSE_ERROR, format!("parse error: {err}")));
        }
    };

    handle_request(registry, request).await
}

async fn handle_request(registry: &ToolRegistry, request: Request) -> Option<Response> {
    // A request without an id is a notification; it gets no reply.
    let id = request.id?;

    Some(respond(registry, id, &request.method, request.params).await)
}

async fn respond(registry: &ToolRegistry, id: Value, method: &str, params: Value) -> Response {
    match method {
        "tools/list" => Response::ok(id, json!({ "tools": registry.specs() })),
        "tools/call" => {
            let params: CallParams = match serde_json::from_value(params) {
                Ok(params) => params,
                Err(err) => {
                    return Response::err(id, INVALID_PARAMS, format!("invalid params: {err}"));
                }
            };

            debug!(tool = %params.name, "dispatching tool call");

            match registry.dispatch(&params.name, params.arguments).await {
                Ok(text) => Response::ok(
                    id,
                    json!({ "content": [{ "type": "text", "text": text }] }),
                ),
                Err(err @ ToolError::UnknownTool(_)) => {
                    Response::err(id, METHOD_NOT_FOUND, err.to_string())
                }
                Err(err) => Response::err(id, INVALID_PARAMS, err.to_string()),
            }
        }
        other => Response::err(id, METHOD_NOT_FOUND, format!("unknown method '{other}'")),
    }
}
