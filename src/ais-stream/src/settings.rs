use serde::Deserialize;

use crate::{ReconnectSettings, VesselFilter};

/// One named stream endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub filter: Option<VesselFilter>,
    #[serde(default)]
    pub reconnect: ReconnectSettings,
}

fn default_enabled() -> bool {
    true
}
