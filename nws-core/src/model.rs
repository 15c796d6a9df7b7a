use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point in floating-point degrees.
///
/// No range validation happens locally; out-of-range values are
/// forwarded to the upstream API, which rejects them itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response of `/points/{lat},{lon}`: resolves a coordinate to the
/// grid-specific forecast endpoint.
#[derive(Debug, Deserialize)]
pub struct PointsResponse {
    #[serde(default)]
    pub properties: PointsProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct PointsProperties {
    /// URL of the forecast endpoint for this grid, when the upstream
    /// resolved one.
    pub forecast: Option<String>,
}

/// Response of the resolved forecast endpoint.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
pub struct ForecastProperties {
    pub periods: Vec<ForecastPeriod>,
}

/// One named forecast window ("Tonight", "Friday", ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    /// Whole degrees; the NWS endpoint returns integers.
    pub temperature: i64,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
    #[serde(default)]
    pub short_forecast: String,
    pub detailed_forecast: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Response of `/alerts/active/area/{state}`.
#[derive(Debug, Deserialize)]
pub struct AlertResponse {
    /// `None` when the body decodes but carries no feature list at
    /// all. That is a malformed response, distinct from an empty list.
    pub features: Option<Vec<AlertFeature>>,
}

/// One active weather-hazard notice.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertFeature {
    #[serde(default)]
    pub properties: AlertProperties,
}

/// Alert fields are all optional on the wire; rendering substitutes
/// placeholders for whatever is missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertProperties {
    pub event: Option<String>,
    pub area_desc: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
}
