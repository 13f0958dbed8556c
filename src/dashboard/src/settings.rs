use std::time::Duration;

use ais_stream::StreamSettings;
use config::{Config, ConfigError, File};
use http_client::HttpClient;
use seawatch_core::{ClusterSettings, LatLon};
use serde::Deserialize;
use strum::{AsRefStr, EnumString};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub log_level: LogLevel,
    #[serde(default)]
    pub streams: Vec<StreamSettings>,
    pub map: MapSettings,
    pub overlays: OverlaySettings,
    pub risk_dashboard: RiskDashboardSettings,
    pub http: HttpSettings,
    /// How often the status panel is logged.
    #[serde(with = "humantime_serde")]
    pub status_interval: Duration,
    /// How often stores are checked for new snapshots to render.
    #[serde(with = "humantime_serde")]
    pub render_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, EnumString, AsRefStr, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapSettings {
    pub center: LatLon,
    pub zoom: f64,
    #[serde(default)]
    pub cluster: ClusterSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlaySettings {
    pub marine: OverlaySource,
    pub weather: OverlaySource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlaySource {
    pub url: String,
    /// Activate the overlay as soon as the application starts.
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskDashboardSettings {
    pub base_url: String,
    #[serde(default)]
    pub load_on_start: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .ok()
            .and_then(|e| e.parse().ok())
            .unwrap_or(Environment::Local);

        let environment = environment.as_ref().to_string();

        Config::builder()
            .add_source(File::with_name(&format!("config/{environment}")).required(true))
            .add_source(File::with_name(&format!("config/{environment}.secret")).required(false))
            .add_source(config::Environment::with_prefix("SEAWATCH").separator("__"))
            .set_override("environment", environment.as_str())?
            .build()?
            .try_deserialize()
    }
}

impl LogLevel {
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl HttpSettings {
    /// Client shared by overlays and risk cards. Failed requests are never retried here,
    /// retrying is left to the user.
    pub fn client(&self) -> http_client::Result<HttpClient> {
        HttpClient::builder().timeout(self.timeout).build()
    }
}

impl RiskDashboardSettings {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
