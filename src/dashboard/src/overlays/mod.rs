//! Map overlays backed by static JSON documents. Each overlay is fetched on its first
//! activation and kept for the lifetime of the application.

use std::sync::Arc;

use http_client::HttpClient;
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::settings::OverlaySource;

mod marine;
mod weather;

pub use marine::*;
pub use weather::*;

pub trait OverlayData: DeserializeOwned + Send + Sync + 'static {
    const NAME: &'static str;

    fn log_current(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    NotLoaded,
    Loading,
    Loaded(Arc<T>),
    Failed(String),
}

#[derive(Debug)]
pub struct Overlay<T> {
    url: String,
    active: bool,
    state: LoadState<T>,
}

impl<T: OverlayData> Overlay<T> {
    pub fn new(source: &OverlaySource) -> Self {
        Self {
            url: source.url.clone(),
            active: false,
            state: LoadState::NotLoaded,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&Arc<T>> {
        match &self.state {
            LoadState::Loaded(data) => Some(data),
            LoadState::NotLoaded | LoadState::Loading | LoadState::Failed(_) => None,
        }
    }

    /// Turns the overlay on, fetching its data unless an earlier activation already loaded
    /// it. Activating an active overlay does nothing, so a failed load is only retried after
    /// [Overlay::deactivate].
    #[instrument(skip_all, fields(overlay = T::NAME, url = %self.url))]
    pub async fn activate(&mut self, client: &HttpClient) -> Option<Arc<T>> {
        if self.active {
            return self.data().cloned();
        }
        self.active = true;

        if let LoadState::Loaded(data) = &self.state {
            return Some(data.clone());
        }

        self.state = LoadState::Loading;
        match client.get_json::<T>(self.url.as_str(), None::<&()>).await {
            Ok(data) => {
                info!("loaded overlay data");
                data.log_current();
                self.state = LoadState::Loaded(Arc::new(data));
            }
            Err(e) => {
                warn!("failed to load overlay data: {e:?}");
                self.state = LoadState::Failed(e.to_string());
            }
        }

        self.data().cloned()
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// The overlays shown on top of the vessel map.
#[derive(Debug)]
pub struct Overlays {
    pub marine: Overlay<MarineData>,
    pub weather: Overlay<WeatherData>,
}

impl Overlays {
    pub fn new(marine: &OverlaySource, weather: &OverlaySource) -> Self {
        Self {
            marine: Overlay::new(marine),
            weather: Overlay::new(weather),
        }
    }
}
