use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::predict::{
    step_from_seconds, GroundStation, OrbitalElements, PassReport, Sgp4Propagator, TimeWindow,
};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct PassesQuery {
    pub tle1: Option<String>,
    pub tle2: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt_km: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start: Option<DateTime<Utc>>,
    pub days: Option<f64>,
    pub step_seconds: Option<f64>,
    pub min_elevation: Option<f64>,
    pub max_passes: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/passes",
    tag = "passes",
    params(
        ("tle1" = String, Query, description = "TLE line 1"),
        ("tle2" = String, Query, description = "TLE line 2"),
        ("lat" = Option<f64>, Query, description = "Observer latitude (degrees, default: station)"),
        ("lon" = Option<f64>, Query, description = "Observer longitude (degrees, default: station)"),
        ("alt_km" = Option<f64>, Query, description = "Observer altitude (km, default: station)"),
        ("start" = Option<String>, Query, description = "Search start (RFC3339, default: now)"),
        ("days" = Option<f64>, Query, description = "Search length in days"),
        ("step_seconds" = Option<f64>, Query, description = "Sampling step in seconds"),
        ("min_elevation" = Option<f64>, Query, description = "Minimum elevation (degrees)"),
        ("max_passes" = Option<usize>, Query, description = "Maximum number of passes returned")
    ),
    responses(
        (status = 200, description = "Predicted passes", body = PassReport),
        (status = 400, description = "Missing/invalid TLE or invalid parameters", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn find_passes(
    State(state): State<AppState>,
    Query(query): Query<PassesQuery>,
) -> ApiResult<impl IntoResponse> {
    let (tle1, tle2) = match (query.tle1, query.tle2) {
        (Some(l1), Some(l2)) if !l1.trim().is_empty() && !l2.trim().is_empty() => (l1, l2),
        _ => return Err(ApiError::MissingTle),
    };
    let elements = OrbitalElements::new(None, tle1.trim(), tle2.trim());

    let defaults = &state.config.predict;
    let station = GroundStation::new(
        query.lat.unwrap_or(state.station.latitude_deg),
        query.lon.unwrap_or(state.station.longitude_deg),
        query.alt_km.unwrap_or(state.station.altitude_km),
    );
    let step = match query.step_seconds {
        Some(seconds) => step_from_seconds(seconds)?,
        None => defaults.step(),
    };
    let start = query.start.unwrap_or_else(Utc::now);
    let window = TimeWindow::from_days(start, query.days.unwrap_or(defaults.days), step)?;

    let mut finder = defaults.finder();
    if let Some(min_elevation) = query.min_elevation {
        finder.min_elevation_deg = min_elevation;
    }
    if let Some(max_passes) = query.max_passes {
        finder.max_passes = max_passes;
    }

    let report = tokio::task::spawn_blocking(move || {
        let propagator = Sgp4Propagator::initialize(&elements)?;
        finder.find(&propagator, &station, &window)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((StatusCode::OK, Json(report)))
}

fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}
