//! Tool exposure layer.
//!
//! Both pipelines are registered as named operations with declared
//! parameter schemas so an external orchestrator can discover and call
//! them without knowing their implementation. The registry is an
//! explicit table built once at startup; there is no hidden global
//! registration.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, fmt, sync::Arc};
use thiserror::Error;

use crate::{
    alerts::AlertsTool,
    client::{NwsClient, NwsFetch},
    config::Config,
    forecast::ForecastTool,
};

/// Registry-level failures: protocol misuse, not weather failures.
/// Weather failures never reach this type; the pipelines collapse them
/// to text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("invalid tool arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
}

/// A named, independently invocable operation.
///
/// Implementations are stateless between calls and safe to invoke
/// concurrently; a call always yields a single text payload.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the arguments object.
    fn parameters_schema(&self) -> Value;

    async fn call(&self, arguments: Value) -> Result<String, ToolError>;
}

/// Serializable description of a registered tool, for discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Name-keyed table of tools.
///
/// Built once at startup via explicit [`register`](Self::register)
/// calls and read-only afterwards; holds no other state.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: BTreeMap::new() }
    }

    /// Register a tool under its own name, replacing any previous
    /// entry with that name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Discovery listing: name, description, and parameter schema of
    /// every registered tool, in sorted name order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .values()
            .map(|tool| ToolSpec {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.parameters_schema(),
            })
            .collect()
    }

    /// Look up `name` and invoke it with `arguments`.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Result<String, ToolError> {
        let tool =
            self.tools.get(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        tool.call(arguments).await
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}

/// Build the standard registry (forecast + alerts) against the real
/// HTTP client described by `config`.
pub fn registry_from_config(config: &Config) -> anyhow::Result<ToolRegistry> {
    let client = Arc::new(NwsClient::new(config)?);
    Ok(registry_with_fetcher(client, config.base_url.clone()))
}

/// Build the standard registry over an arbitrary fetcher. Used by
/// [`registry_from_config`] and by tests that script the upstream.
pub fn registry_with_fetcher(fetch: Arc<dyn NwsFetch>, base_url: String) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(ForecastTool::new(fetch.clone(), base_url.clone()));
    registry.register(AlertsTool::new(fetch, base_url));
    registry
}

/// Convert a derived schema into a plain JSON value for transport.
pub(crate) fn schema_value(schema: schemars::Schema) -> Value {
    serde_json::to_value(schema).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}
