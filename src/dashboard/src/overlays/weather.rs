use serde::Deserialize;
use tracing::info;

use super::OverlayData;

pub const KELVIN_OFFSET: f64 = 273.15;

/// A forecast in the OpenWeather 5 day / 3 hour format.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherData {
    pub list: Vec<WeatherEntry>,
    pub city: City,
}

#[derive(Debug, Clone, Deserialize)]
pub struct City {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherEntry {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Wind,
    /// Meters.
    #[serde(default)]
    pub visibility: Option<f64>,
    /// Probability of precipitation, 0 to 1.
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub rain: Option<Rain>,
    pub dt_txt: String,
}

/// Temperatures in Kelvin.
#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

/// Speeds in m/s.
#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rain {
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn ms_to_kmh(speed: f64) -> f64 {
    speed * 3.6
}

impl WeatherData {
    pub fn current(&self) -> Option<&WeatherEntry> {
        self.list.first()
    }
}

impl WeatherEntry {
    pub fn temperature_celsius(&self) -> f64 {
        kelvin_to_celsius(self.main.temp)
    }

    pub fn feels_like_celsius(&self) -> f64 {
        kelvin_to_celsius(self.main.feels_like)
    }

    pub fn wind_kmh(&self) -> f64 {
        ms_to_kmh(self.wind.speed)
    }

    pub fn gust_kmh(&self) -> Option<f64> {
        self.wind.gust.map(ms_to_kmh)
    }

    pub fn visibility_km(&self) -> Option<f64> {
        self.visibility.map(|v| v / 1000.0)
    }

    pub fn rain_mm(&self) -> Option<f64> {
        self.rain.as_ref().and_then(|r| r.three_hours)
    }

    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|c| c.description.as_str())
    }
}

impl OverlayData for WeatherData {
    const NAME: &'static str = "weather";

    fn log_current(&self) {
        let Some(entry) = self.current() else {
            return;
        };
        info!(
            city = %self.city.name,
            time = %entry.dt_txt,
            condition = entry.description().unwrap_or("-"),
            temperature = entry.temperature_celsius().round(),
            wind_kmh = entry.wind_kmh().round(),
            wind_deg = entry.wind.deg,
            "current weather"
        );
    }
}
