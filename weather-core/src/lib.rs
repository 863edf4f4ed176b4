//! Core library for the `weather` lookup endpoint.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the upstream weather provider
//! - Shared domain models (location queries, normalized reports)
//! - The aggregation pipeline that merges current conditions with a UV reading
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{Config, ProviderConfig, UpstreamConfig};
pub use error::WeatherError;
pub use model::{
    Condition, Coordinates, LocationQuery, NormalizedWeatherReport, UpstreamConditions, UvIndex,
};
pub use provider::WeatherProvider;
pub use service::WeatherService;
