//! Alert lookup pipeline.
//!
//! One upstream call per invocation. "The fetch failed or the body was
//! malformed" and "the fetch worked and there are no alerts" are
//! different outcomes with different fixed messages.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
    BLOCK_SEPARATOR,
    client::{NwsFetch, fetch_decoded},
    model::{AlertFeature, AlertResponse},
    tool::{Tool, ToolError, schema_value},
};

pub const UNABLE_TO_FETCH_ALERTS: &str = "Unable to fetch alerts or no alerts found.";
pub const NO_ACTIVE_ALERTS: &str = "No active alerts for this state.";

const UNKNOWN: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description available";
const NO_INSTRUCTIONS: &str = "No specific instructions provided";

/// Fetch and render all active alerts for a two-letter state code.
///
/// Never fails from the caller's perspective.
pub async fn get_alerts(fetch: &dyn NwsFetch, base_url: &str, state: &str) -> String {
    let url = format!("{base_url}/alerts/active/area/{state}");

    let response: AlertResponse = match fetch_decoded(fetch, &url).await {
        Ok(response) => response,
        Err(err) => {
            warn!(url = %url, error = %err, "alert fetch failed");
            return UNABLE_TO_FETCH_ALERTS.to_string();
        }
    };

    let Some(features) = response.features else {
        warn!(url = %url, "alert response carried no feature list");
        return UNABLE_TO_FETCH_ALERTS.to_string();
    };

    if features.is_empty() {
        return NO_ACTIVE_ALERTS.to_string();
    }

    features.iter().map(format_alert).collect::<Vec<_>>().join(BLOCK_SEPARATOR)
}

/// Render one alert as a fixed text block, substituting placeholders
/// for absent fields. Pure: no I/O, identical input yields identical
/// output.
pub fn format_alert(feature: &AlertFeature) -> String {
    let props = &feature.properties;

    format!(
        "\nEvent: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}\n",
        props.event.as_deref().unwrap_or(UNKNOWN),
        props.area_desc.as_deref().unwrap_or(UNKNOWN),
        props.severity.as_deref().unwrap_or(UNKNOWN),
        props.description.as_deref().unwrap_or(NO_DESCRIPTION),
        props.instruction.as_deref().unwrap_or(NO_INSTRUCTIONS),
    )
}

/// Arguments of the `get_alerts` tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AlertsArgs {
    /// Two-letter US state code (e.g. CA, NY, WA, TX).
    pub state: String,
}

/// Tool wrapper around [`get_alerts`].
pub struct AlertsTool {
    fetch: Arc<dyn NwsFetch>,
    base_url: String,
}

impl AlertsTool {
    pub fn new(fetch: Arc<dyn NwsFetch>, base_url: impl Into<String>) -> Self {
        Self { fetch, base_url: base_url.into() }
    }
}

#[async_trait]
impl Tool for AlertsTool {
    fn name(&self) -> &str {
        "get_alerts"
    }

    fn description(&self) -> &str {
        "Get active severe weather alerts for a US state. Returns each alert's \
         event, affected area, severity, description, and instructions."
    }

    fn parameters_schema(&self) -> Value {
        schema_value(schema_for!(AlertsArgs))
    }

    async fn call(&self, arguments: Value) -> Result<String, ToolError> {
        let args: AlertsArgs = serde_json::from_value(arguments)?;

        Ok(get_alerts(self.fetch.as_ref(), &self.base_url, &args.state).await)
    }
}
