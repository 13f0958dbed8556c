use std::fmt::{self, Display};

use seawatch_core::ConnectionState;
use serde::Serialize;

/// What the status panel shows for a single stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Disabled,
    Connection(ConnectionState),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamStatusRow {
    pub name: String,
    pub enabled: bool,
    pub state: StreamState,
    /// Only reported for enabled streams.
    pub error: Option<String>,
    pub vessels: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusPanel {
    pub streams: Vec<StreamStatusRow>,
}

impl StatusPanel {
    /// True when every enabled stream is connected.
    pub fn all_connected(&self) -> bool {
        self.streams
            .iter()
            .filter(|s| s.enabled)
            .all(|s| s.state == StreamState::Connection(ConnectionState::Connected))
    }

    pub fn total_vessels(&self) -> usize {
        self.streams.iter().map(|s| s.vessels).sum()
    }

    pub fn row(&self, name: &str) -> Option<&StreamStatusRow> {
        self.streams.iter().find(|s| s.name == name)
    }
}

impl Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamState::Disabled => f.write_str("disabled"),
            StreamState::Connection(state) => state.fmt(f),
        }
    }
}

impl Display for StatusPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.streams.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {} ({} vessels)", row.name, row.state, row.vessels)?;
            if let Some(error) = &row.error {
                write!(f, " [{error}]")?;
            }
        }
        Ok(())
    }
}
