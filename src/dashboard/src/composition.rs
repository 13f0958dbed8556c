use std::{collections::BTreeSet, sync::Arc};

use ais_stream::{Connector, FeedStatsHandle, StreamHandle, StreamSettings, VesselFeed};
use seawatch_core::{
    ClusterRenderer, MapSurface, MarkerClick, MarkerId, Mmsi, Snapshot, VESSEL_FOCUS_ZOOM,
    VesselDetailView, VesselRecord,
};
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::{
    settings::MapSettings,
    status::{StatusPanel, StreamState, StreamStatusRow},
};

/// One stream endpoint with its own store, connection and map layer.
pub struct StreamView<M> {
    name: String,
    enabled: bool,
    handle: StreamHandle,
    snapshots: watch::Receiver<Snapshot>,
    stats: FeedStatsHandle,
    renderer: ClusterRenderer<M>,
}

/// A tracked vessel matching a search, with the stream that tracks it.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub stream: String,
    pub vessel: Arc<VesselRecord>,
}

/// All configured streams. Streams are independent of each other: each has its own vessel
/// store, and one stream failing never affects the others.
pub struct Dashboard<M> {
    streams: Vec<StreamView<M>>,
}

impl<M: MapSurface> StreamView<M> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn handle(&self) -> &StreamHandle {
        &self.handle
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn stats(&self) -> &FeedStatsHandle {
        &self.stats
    }

    pub fn renderer(&self) -> &ClusterRenderer<M> {
        &self.renderer
    }

    /// Renders the latest snapshot if it changed since the last call.
    pub fn refresh(&mut self) -> bool {
        let snapshot = self.snapshots.borrow_and_update().clone();
        self.renderer.render(&snapshot)
    }

    fn status_row(&self) -> StreamStatusRow {
        let status = self.handle.status();
        if self.enabled {
            StreamStatusRow {
                name: self.name.clone(),
                enabled: true,
                state: StreamState::Connection(status.state),
                error: status.last_error,
                vessels: self.snapshots.borrow().len(),
            }
        } else {
            StreamStatusRow {
                name: self.name.clone(),
                enabled: false,
                state: StreamState::Disabled,
                error: None,
                vessels: 0,
            }
        }
    }
}

impl<M: MapSurface> Dashboard<M> {
    /// Spawns a connection per stream, each drawing onto the surface `surface_for` returns.
    pub fn start<C, F>(
        streams: &[StreamSettings],
        map: &MapSettings,
        connector: C,
        mut surface_for: F,
    ) -> Self
    where
        C: Connector + Clone,
        F: FnMut(&StreamSettings) -> M,
    {
        let streams = streams
            .iter()
            .map(|settings| {
                let feed = VesselFeed::new(&settings.name, settings.filter.clone());
                let snapshots = feed.subscribe();
                let stats = feed.stats();
                let handle = StreamHandle::from_settings(settings, connector.clone(), feed);

                info!(
                    stream = %settings.name,
                    url = %settings.url,
                    enabled = settings.enabled,
                    "started stream"
                );

                StreamView {
                    name: settings.name.clone(),
                    enabled: settings.enabled,
                    handle,
                    snapshots,
                    stats,
                    renderer: ClusterRenderer::new(surface_for(settings), map.cluster, map.zoom),
                }
            })
            .collect();

        Self { streams }
    }

    pub fn streams(&self) -> &[StreamView<M>] {
        &self.streams
    }

    pub fn stream(&self, name: &str) -> Option<&StreamView<M>> {
        self.streams.iter().find(|s| s.name == name)
    }

    fn stream_mut(&mut self, name: &str) -> Option<&mut StreamView<M>> {
        self.streams.iter_mut().find(|s| s.name == name)
    }

    /// The power switch of a stream, returns false for unknown streams.
    #[instrument(skip(self))]
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let Some(stream) = self.stream_mut(name) else {
            return false;
        };
        stream.enabled = enabled;
        if enabled {
            stream.handle.enable();
        } else {
            stream.handle.disable();
        }
        true
    }

    /// Renders every stream whose store published a new snapshot, returns the number of
    /// redrawn streams.
    pub fn refresh(&mut self) -> usize {
        self.streams
            .iter_mut()
            .map(StreamView::refresh)
            .filter(|redrawn| *redrawn)
            .count()
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        for stream in &mut self.streams {
            stream.renderer.set_zoom(zoom);
        }
    }

    pub fn click(
        &mut self,
        stream: &str,
        marker: MarkerId,
        detail: &mut impl VesselDetailView,
    ) -> Option<MarkerClick> {
        self.stream_mut(stream)?
            .renderer
            .handle_click(marker, detail)
    }

    /// Searches the vessels of every enabled stream by name or MMSI. A vessel tracked by
    /// several streams is listed once, under the first of them.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let mut seen = BTreeSet::new();
        let mut hits = Vec::new();
        for stream in self.streams.iter().filter(|s| s.enabled) {
            let snapshot = stream.snapshot();
            for vessel in snapshot.search(query) {
                if seen.insert(vessel.mmsi) {
                    hits.push(SearchHit {
                        stream: stream.name.clone(),
                        vessel: vessel.clone(),
                    });
                }
            }
        }
        hits
    }

    /// Flies the map of `stream` to a tracked vessel and zooms every stream in on it.
    /// Returns the vessel, or `None` if the stream does not track it.
    #[instrument(skip(self))]
    pub fn focus_vessel(&mut self, stream: &str, mmsi: Mmsi) -> Option<Arc<VesselRecord>> {
        let view = self.stream_mut(stream)?;
        let vessel = view.snapshot().get(&mmsi)?.clone();
        view.renderer.fly_to(vessel.position(), VESSEL_FOCUS_ZOOM);
        self.set_zoom(VESSEL_FOCUS_ZOOM);
        info!(name = vessel.display_name(), "focused vessel");
        Some(vessel)
    }

    pub fn status_panel(&self) -> StatusPanel {
        StatusPanel {
            streams: self.streams.iter().map(StreamView::status_row).collect(),
        }
    }

    /// Tears every stream down and removes their markers, handing back the map surfaces.
    pub async fn shutdown(self) -> Vec<M> {
        let mut surfaces = Vec::with_capacity(self.streams.len());
        for stream in self.streams {
            stream.handle.close().await;
            surfaces.push(stream.renderer.detach());
        }
        surfaces
    }
}
