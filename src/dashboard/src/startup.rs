use ais_stream::WebSocketConnector;
use http_client::HttpClient;
use snafu::ResultExt;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, instrument, warn};

use crate::{
    composition::Dashboard,
    error::{HttpClientSnafu, Result, SignalSnafu},
    headless::HeadlessMap,
    overlays::Overlays,
    risk::RiskDashboard,
    settings::Settings,
};

pub struct App {
    settings: Settings,
    client: HttpClient,
    dashboard: Dashboard<HeadlessMap>,
    overlays: Overlays,
    risk: RiskDashboard,
}

impl App {
    /// Must be called from within a tokio runtime, every enabled stream starts connecting
    /// right away.
    pub fn build(settings: Settings) -> Result<App> {
        let client = settings.http.client().context(HttpClientSnafu)?;

        let dashboard = Dashboard::start(
            &settings.streams,
            &settings.map,
            WebSocketConnector,
            |_| HeadlessMap::new(),
        );
        let overlays = Overlays::new(&settings.overlays.marine, &settings.overlays.weather);
        let risk = RiskDashboard::new(client.clone(), settings.risk_dashboard.clone());

        info!(
            environment = %settings.environment,
            streams = settings.streams.len(),
            "built dashboard"
        );

        Ok(App {
            settings,
            client,
            dashboard,
            overlays,
            risk,
        })
    }

    pub fn dashboard(&self) -> &Dashboard<HeadlessMap> {
        &self.dashboard
    }

    /// Runs until ctrl-c, then tears every stream down.
    pub async fn run(mut self) -> Result<()> {
        self.load_on_start().await;

        let mut render = interval(self.settings.render_interval);
        render.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut status = interval(self.settings.status_interval);
        status.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                res = &mut shutdown => {
                    res.context(SignalSnafu)?;
                    info!("received shutdown signal");
                    break;
                }
                _ = render.tick() => {
                    self.dashboard.refresh();
                }
                _ = status.tick() => {
                    self.log_status();
                }
            }
        }

        let surfaces = self.dashboard.shutdown().await;
        info!(streams = surfaces.len(), "dashboard stopped");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn load_on_start(&mut self) {
        if self.settings.overlays.marine.active {
            self.overlays.marine.activate(&self.client).await;
        }
        if self.settings.overlays.weather.active {
            self.overlays.weather.activate(&self.client).await;
        }
        if self.settings.risk_dashboard.load_on_start {
            self.risk.load_all().await;
        }
    }

    fn log_status(&self) {
        let panel = self.dashboard.status_panel();
        if panel.all_connected() {
            info!(vessels = panel.total_vessels(), "{panel}");
        } else {
            warn!(vessels = panel.total_vessels(), "{panel}");
        }
    }
}
