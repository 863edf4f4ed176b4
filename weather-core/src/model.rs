use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A latitude/longitude pair, as sent to and echoed back by the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What the caller asked for: a free-text place name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Place(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Build a query from the raw `city`, `lat` and `lon` request parameters.
    ///
    /// Blank values count as absent. A complete coordinate pair wins over a place name
    /// when both are supplied; ranges are left for the upstream provider to judge.
    pub fn from_params(
        city: Option<&str>,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Result<Self, WeatherError> {
        let city = non_blank(city);

        if let (Some(lat), Some(lon)) = (non_blank(lat), non_blank(lon)) {
            return Ok(LocationQuery::Coordinates(Coordinates {
                lat: parse_coordinate(lat)?,
                lon: parse_coordinate(lon)?,
            }));
        }

        match city {
            Some(place) => Ok(LocationQuery::Place(place.to_string())),
            None => Err(WeatherError::InvalidRequest),
        }
    }

    /// Short label for logs; never includes the free-text value.
    pub fn kind(&self) -> &'static str {
        match self {
            LocationQuery::Place(_) => "place",
            LocationQuery::Coordinates(_) => "coordinates",
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::Place(place) => f.write_str(place),
            LocationQuery::Coordinates(c) => write!(f, "{}, {}", c.lat, c.lon),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_coordinate(raw: &str) -> Result<f64, WeatherError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(WeatherError::InvalidRequest)
}

/// One upstream condition descriptor ("Clouds" / "broken clouds").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub main: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    /// Degrees Celsius.
    pub temp: f64,
    /// Percent.
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Metres per second.
    pub speed: f64,
}

/// Current conditions as returned by the upstream provider.
///
/// `coord` is the provider's resolved location and is what the UV lookup must use.
/// Without it the UV lookup is skipped; the rest of the report still stands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamConditions {
    pub name: String,
    #[serde(default)]
    pub coord: Option<Coordinates>,
    pub main: MainReadings,
    pub wind: Wind,
    pub weather: Vec<Condition>,
}

/// Outcome of the best-effort UV enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum UvIndex {
    Measured(i64),
    #[default]
    Absent,
}

impl UvIndex {
    /// Round a raw upstream reading to the nearest integer (halves away from zero).
    pub fn from_reading(value: f64) -> Self {
        if value.is_finite() {
            UvIndex::Measured(value.round() as i64)
        } else {
            UvIndex::Absent
        }
    }

    pub fn value(self) -> Option<i64> {
        self.into()
    }
}

impl From<Option<i64>> for UvIndex {
    fn from(value: Option<i64>) -> Self {
        value.map_or(UvIndex::Absent, UvIndex::Measured)
    }
}

impl From<UvIndex> for Option<i64> {
    fn from(value: UvIndex) -> Self {
        match value {
            UvIndex::Measured(v) => Some(v),
            UvIndex::Absent => None,
        }
    }
}

/// The simplified payload handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeatherReport {
    pub name: String,
    pub main: MainReadings,
    pub wind: Wind,
    pub weather: Vec<Condition>,
    pub uv: UvIndex,
}

impl NormalizedWeatherReport {
    pub fn assemble(conditions: UpstreamConditions, uv: UvIndex) -> Self {
        Self {
            name: conditions.name,
            main: conditions.main,
            wind: conditions.wind,
            weather: conditions.weather,
            uv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn place_name_is_trimmed() {
        let q = LocationQuery::from_params(Some("  Colombo,LK "), None, None).unwrap();
        assert_eq!(q, LocationQuery::Place("Colombo,LK".into()));
    }

    #[test]
    fn coordinates_take_precedence_over_place() {
        let q = LocationQuery::from_params(Some("Paris"), Some("6.93"), Some("79.85")).unwrap();
        assert_eq!(q, LocationQuery::Coordinates(Coordinates { lat: 6.93, lon: 79.85 }));
    }

    #[test]
    fn half_pair_falls_back_to_place() {
        let q = LocationQuery::from_params(Some("Paris"), Some("6.93"), None).unwrap();
        assert_eq!(q, LocationQuery::Place("Paris".into()));
    }

    #[test]
    fn missing_everything_is_invalid() {
        for (city, lat, lon) in [
            (None, None, None),
            (Some(""), None, None),
            (Some("   "), Some(""), Some("")),
            (None, Some("6.93"), None),
            (None, None, Some("79.85")),
        ] {
            let err = LocationQuery::from_params(city, lat, lon).unwrap_err();
            assert!(matches!(err, WeatherError::InvalidRequest), "{city:?} {lat:?} {lon:?}");
        }
    }

    #[test]
    fn non_numeric_coordinates_are_invalid() {
        let err = LocationQuery::from_params(None, Some("north"), Some("79.85")).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidRequest));

        let err = LocationQuery::from_params(None, Some("6.9"), Some("NaN")).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidRequest));
    }

    #[test]
    fn uv_rounds_to_nearest() {
        assert_eq!(UvIndex::from_reading(5.6), UvIndex::Measured(6));
        assert_eq!(UvIndex::from_reading(5.4), UvIndex::Measured(5));
        assert_eq!(UvIndex::from_reading(0.5), UvIndex::Measured(1));
        assert_eq!(UvIndex::from_reading(f64::NAN), UvIndex::Absent);
    }

    #[test]
    fn report_serializes_to_public_shape() {
        let upstream: UpstreamConditions = serde_json::from_value(json!({
            "coord": { "lon": 79.8478, "lat": 6.9319 },
            "weather": [
                { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" },
                { "main": "Mist", "description": "mist" }
            ],
            "main": { "temp": 28.3, "feels_like": 32.1, "humidity": 70, "pressure": 1009 },
            "wind": { "speed": 2.1, "deg": 250 },
            "name": "Colombo",
            "cod": 200
        }))
        .unwrap();

        let report = NormalizedWeatherReport::assemble(upstream, UvIndex::Measured(6));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "Colombo",
                "main": { "temp": 28.3, "humidity": 70 },
                "wind": { "speed": 2.1 },
                "weather": [
                    { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" },
                    { "main": "Mist", "description": "mist" }
                ],
                "uv": 6
            })
        );
    }

    #[test]
    fn conditions_without_coord_still_parse() {
        let upstream: UpstreamConditions = serde_json::from_value(json!({
            "weather": [{ "main": "Clear", "description": "clear sky" }],
            "main": { "temp": 12.0, "humidity": 55 },
            "wind": { "speed": 3.4 },
            "name": "Nowhere"
        }))
        .unwrap();

        assert_eq!(upstream.coord, None);
        assert_eq!(upstream.weather[0].main, "Clear");
    }

    #[test]
    fn absent_uv_serializes_as_null() {
        let report = NormalizedWeatherReport {
            name: "Oslo".into(),
            main: MainReadings { temp: -3.0, humidity: 80 },
            wind: Wind { speed: 4.0 },
            weather: vec![],
            uv: UvIndex::Absent,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["uv"].is_null());
    }
}
