use serde::Serialize;
use strum::{AsRefStr, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display, AsRefStr, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Observable state of a single stream connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub last_error: Option<String>,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}
