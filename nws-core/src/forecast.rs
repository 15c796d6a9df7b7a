//! Forecast lookup pipeline.
//!
//! Resolving a coordinate takes two sequential upstream calls: the
//! `/points` endpoint maps the coordinate to a grid-specific forecast
//! URL, and that URL yields the ordered forecast periods. Each phase
//! fails independently with its own fixed message so callers can tell
//! "can't resolve the location" from "resolved, but the forecast fetch
//! failed".

use std::sync::Arc;

use async_trait::async_trait;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
    BLOCK_SEPARATOR,
    client::{NwsFetch, fetch_decoded},
    model::{Coordinate, ForecastPeriod, ForecastResponse, PointsResponse},
    tool::{Tool, ToolError, schema_value},
};

pub const UNABLE_TO_FETCH_POINTS: &str = "Unable to fetch forecast data for this location.";
pub const UNABLE_TO_DETERMINE_URL: &str = "Unable to determine forecast URL for this location.";
pub const UNABLE_TO_FETCH_FORECAST: &str = "Unable to fetch detailed forecast.";

/// Everything past the first 5 periods is dropped from the output.
const MAX_PERIODS: usize = 5;

/// Fetch and render the forecast for a coordinate.
///
/// Never fails from the caller's perspective: every upstream problem
/// collapses to one of the fixed messages above.
pub async fn get_forecast(fetch: &dyn NwsFetch, base_url: &str, coord: Coordinate) -> String {
    let points_url = format!("{}/points/{},{}", base_url, coord.latitude, coord.longitude);

    let points: PointsResponse = match fetch_decoded(fetch, &points_url).await {
        Ok(points) => points,
        Err(err) => {
            warn!(url = %points_url, error = %err, "points lookup failed");
            return UNABLE_TO_FETCH_POINTS.to_string();
        }
    };

    let Some(forecast_url) = points.properties.forecast else {
        warn!(url = %points_url, "points response carried no forecast endpoint");
        return UNABLE_TO_DETERMINE_URL.to_string();
    };

    let forecast: ForecastResponse = match fetch_decoded(fetch, &forecast_url).await {
        Ok(forecast) => forecast,
        Err(err) => {
            warn!(url = %forecast_url, error = %err, "forecast fetch failed");
            return UNABLE_TO_FETCH_FORECAST.to_string();
        }
    };

    forecast
        .properties
        .periods
        .iter()
        .take(MAX_PERIODS)
        .map(format_period)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Render one period as a fixed text block. Pure: no I/O, identical
/// input yields identical output.
pub fn format_period(period: &ForecastPeriod) -> String {
    format!(
        "\n{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}\n",
        period.name,
        period.temperature,
        period.temperature_unit,
        period.wind_speed,
        period.wind_direction,
        period.detailed_forecast,
    )
}

/// Arguments of the `get_forecast` tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ForecastArgs {
    /// Latitude of the location (e.g. 47.6062 for Seattle).
    pub latitude: f64,
    /// Longitude of the location (e.g. -122.3321 for Seattle).
    pub longitude: f64,
}

/// Tool wrapper around [`get_forecast`].
pub struct ForecastTool {
    fetch: Arc<dyn NwsFetch>,
    base_url: String,
}

impl ForecastTool {
    pub fn new(fetch: Arc<dyn NwsFetch>, base_url: impl Into<String>) -> Self {
        Self { fetch, base_url: base_url.into() }
    }
}

#[async_trait]
impl Tool for ForecastTool {
    fn name(&self) -> &str {
        "get_forecast"
    }

    fn description(&self) -> &str {
        "Get the weather forecast for a location. Returns the next 5 forecast \
         periods with temperature, wind, and a detailed narrative."
    }

    fn parameters_schema(&self) -> Value {
        schema_value(schema_for!(ForecastArgs))
    }

    async fn call(&self, arguments: Value) -> Result<String, ToolError> {
        let args: ForecastArgs = serde_json::from_value(arguments)?;
        let coord = Coordinate { latitude: args.latitude, longitude: args.longitude };

        Ok(get_forecast(self.fetch.as_ref(), &self.base_url, coord).await)
    }
}
