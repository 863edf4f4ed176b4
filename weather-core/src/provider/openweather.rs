use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    config::UpstreamConfig,
    error::WeatherError,
    model::{Coordinates, LocationQuery, UpstreamConditions},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, upstream: &UpstreamConfig) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(upstream.timeout()).build()?;

        Ok(Self {
            api_key,
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn location_params(&self, query: &LocationQuery) -> Vec<(&'static str, String)> {
        let mut params = match query {
            LocationQuery::Coordinates(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
            LocationQuery::Place(place) => vec![("q", place.clone())],
        };
        params.push(("appid", self.api_key.clone()));
        params
    }

    #[instrument(skip(self, query), fields(kind = query.kind()))]
    async fn fetch_current(&self, query: &LocationQuery) -> Result<UpstreamConditions, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let mut params = self.location_params(query);
        params.push(("units", "metric".to_string()));

        // Request URLs carry the API key; strip them from every transport error.
        let res = self.http.get(&url).query(&params).send().await.map_err(|e| {
            WeatherError::Upstream(format!(
                "Failed to send request to OpenWeather (current weather): {}",
                e.without_url()
            ))
        })?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::LocationNotFound);
        }

        let body = res.text().await.map_err(|e| {
            WeatherError::Upstream(format!(
                "Failed to read OpenWeather current response body: {}",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            return Err(WeatherError::Upstream(format!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: UpstreamConditions = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Upstream(format!("Failed to parse OpenWeather current JSON: {e}"))
        })?;

        if parsed.weather.is_empty() {
            return Err(WeatherError::Upstream(
                "OpenWeather current response contained no weather conditions".to_string(),
            ));
        }

        Ok(parsed)
    }

    #[instrument(skip(self))]
    async fn fetch_uv(&self, coord: Coordinates) -> Result<f64> {
        let url = format!("{}/uvi", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&self.location_params(&LocationQuery::Coordinates(coord)))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to OpenWeather (UV index)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read OpenWeather UV response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather UV request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwUvResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather UV JSON")?;

        Ok(parsed.value)
    }
}

#[derive(Debug, Deserialize)]
struct OwUvResponse {
    value: f64,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(
        &self,
        query: &LocationQuery,
    ) -> Result<UpstreamConditions, WeatherError> {
        self.fetch_current(query).await
    }

    async fn uv_index(&self, coord: Coordinates) -> Result<f64> {
        self.fetch_uv(coord).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
