#![deny(rust_2018_idioms)]

//! Keeps a single streaming AIS connection alive, reconnecting on loss, and feeds every
//! inbound payload through normalization into a per-stream vessel store.

pub mod error;
pub mod feed;
pub mod lifecycle;
pub mod manager;
pub mod policy;
pub mod settings;
pub mod transport;

#[cfg(feature = "test")]
pub mod test_helper;

pub use error::{Error, Result};
pub use feed::{FeedStats, FeedStatsHandle, MessageSink, VesselFeed, VesselFilter};
pub use manager::StreamHandle;
pub use policy::{ReconnectPolicy, ReconnectSettings};
pub use settings::StreamSettings;
pub use transport::{Connection, Connector, WebSocketConnector};
