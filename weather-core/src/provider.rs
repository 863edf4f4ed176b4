use crate::{
    Config, Coordinates, LocationQuery, UpstreamConditions, WeatherError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The two read-only lookups the service needs from an upstream weather source.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a place name or coordinate pair.
    async fn current_conditions(
        &self,
        query: &LocationQuery,
    ) -> Result<UpstreamConditions, WeatherError>;

    /// Raw UV index reading at the given coordinates.
    async fn uv_index(&self, coord: Coordinates) -> anyhow::Result<f64>;
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key().ok_or(WeatherError::Configuration)?;

    let provider = OpenWeatherProvider::new(api_key.to_owned(), &config.upstream)?;
    Ok(Box::new(provider))
}
