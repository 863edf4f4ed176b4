//! Two-stage lookup: current conditions first, then a best-effort UV reading at the
//! coordinates the provider resolved.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    Config, LocationQuery, NormalizedWeatherReport, UpstreamConditions, UvIndex, WeatherError,
    WeatherProvider, provider::provider_from_config,
};

#[derive(Debug, Clone)]
pub struct WeatherService {
    provider: Option<Arc<dyn WeatherProvider>>,
}

impl WeatherService {
    /// Build the service from resolved configuration.
    ///
    /// A missing credential is not an error here; every lookup will report it instead.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        match provider_from_config(config) {
            Ok(provider) => Ok(Self { provider: Some(Arc::from(provider)) }),
            Err(WeatherError::Configuration) => {
                warn!("no OpenWeather API key configured; lookups will fail until one is set");
                Ok(Self::unconfigured())
            }
            Err(err) => Err(err),
        }
    }

    pub fn with_provider(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider: Some(provider) }
    }

    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    /// Validate raw request parameters, then run [`WeatherService::report`].
    pub async fn lookup(
        &self,
        city: Option<&str>,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<NormalizedWeatherReport, WeatherError> {
        let query = LocationQuery::from_params(city, lat, lon)?;
        self.report(&query).await
    }

    pub async fn report(
        &self,
        query: &LocationQuery,
    ) -> Result<NormalizedWeatherReport, WeatherError> {
        let provider = self.provider.as_deref().ok_or(WeatherError::Configuration)?;

        let conditions = provider.current_conditions(query).await?;
        let uv = enrich_uv(provider, &conditions).await;

        Ok(NormalizedWeatherReport::assemble(conditions, uv))
    }
}

/// Failures here are logged and become [`UvIndex::Absent`]; they never reach the caller.
async fn enrich_uv(provider: &dyn WeatherProvider, conditions: &UpstreamConditions) -> UvIndex {
    let Some(coord) = conditions.coord else {
        warn!(location = %conditions.name, "upstream response has no coordinates; skipping UV index");
        return UvIndex::Absent;
    };

    match provider.uv_index(coord).await {
        Ok(value) => {
            let uv = UvIndex::from_reading(value);
            debug!(raw = value, ?uv, "UV index fetched");
            uv
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), location = %conditions.name, "failed to fetch UV index");
            UvIndex::Absent
        }
    }
}
