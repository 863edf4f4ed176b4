use thiserror::Error;

/// Every way a weather lookup can fail.
///
/// The UV enrichment has no variant here: its failures never leave the service.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("neither a place name nor a complete coordinate pair was supplied")]
    InvalidRequest,

    #[error("no OpenWeather API key configured")]
    Configuration,

    #[error("upstream provider has no match for the requested location")]
    LocationNotFound,

    #[error("upstream weather request failed: {0}")]
    Upstream(String),
}

impl WeatherError {
    /// Message safe to show to the caller. Upstream details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "City name or coordinates (lat, lon) are required",
            Self::Configuration => "Weather API key not configured",
            Self::LocationNotFound => "Location not found",
            Self::Upstream(_) => "Failed to fetch weather data",
        }
    }

    /// Whether the caller, rather than the deployment or upstream, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest | Self::LocationNotFound)
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.without_url().to_string())
    }
}
