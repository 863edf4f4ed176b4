use weather_core::WeatherService;

pub struct AppState {
    pub service: WeatherService,
}
