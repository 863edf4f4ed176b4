use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use weather_core::{LocationQuery, NormalizedWeatherReport, WeatherError};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: &'static str,
}

pub(super) struct ApiError(WeatherError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            WeatherError::InvalidRequest => StatusCode::BAD_REQUEST,
            WeatherError::LocationNotFound => StatusCode::NOT_FOUND,
            WeatherError::Configuration | WeatherError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody { error: self.0.user_message() };
        (self.status(), Json(body)).into_response()
    }
}

// ─── GET /health ─────────────────────────────────────────────────

#[derive(Serialize)]
pub(super) struct Health {
    status: &'static str,
}

pub(super) async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

// ─── GET /api/weather ────────────────────────────────────────────

/// Raw strings so that malformed input still gets the JSON error body.
#[derive(Debug, Default, PartialEq)]
pub(super) struct WeatherParams {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl WeatherParams {
    /// Repeated keys keep their first value; unknown keys are ignored.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "city" => &mut params.city,
                "lat" => &mut params.lat,
                "lon" => &mut params.lon,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

pub(super) async fn weather(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<NormalizedWeatherReport>, ApiError> {
    let start = Instant::now();

    let params = match query {
        Ok(Query(pairs)) => WeatherParams::from_pairs(pairs),
        Err(rejection) => {
            tracing::info!(error = %rejection.body_text(), "GET /api/weather rejected: unreadable query");
            return Err(WeatherError::InvalidRequest.into());
        }
    };

    let query = LocationQuery::from_params(
        params.city.as_deref(),
        params.lat.as_deref(),
        params.lon.as_deref(),
    )
    .inspect_err(|_| tracing::info!("GET /api/weather rejected: no city or lat/lon pair"))?;

    match state.service.report(&query).await {
        Ok(report) => {
            tracing::info!(
                kind = query.kind(),
                location = %report.name,
                uv = ?report.uv.value(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "GET /api/weather ok"
            );
            Ok(Json(report))
        }
        Err(err) => {
            if err.is_client_error() {
                tracing::info!(kind = query.kind(), error = %err, "GET /api/weather failed");
            } else {
                tracing::error!(kind = query.kind(), error = %err, "GET /api/weather failed");
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let params = WeatherParams::from_pairs(pairs(&[
            ("city", "Colombo"),
            ("units", "imperial"),
            ("city", "Kandy"),
            ("lat", "6.9"),
        ]));

        assert_eq!(
            params,
            WeatherParams {
                city: Some("Colombo".into()),
                lat: Some("6.9".into()),
                lon: None,
            }
        );
    }

    #[test]
    fn error_status_per_kind() {
        assert_eq!(ApiError(WeatherError::InvalidRequest).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(WeatherError::LocationNotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError(WeatherError::Configuration).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(WeatherError::Upstream("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
