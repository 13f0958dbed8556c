use async_trait::async_trait;
use futures::StreamExt;
use snafu::ResultExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, instrument, warn};

use crate::error::{ConnectSnafu, Result, TransportSnafu};

/// Establishes connections to a streaming endpoint.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Connection;

    async fn connect(&self, url: &str) -> Result<Self::Connection>;
}

/// A live, ordered stream of text payloads.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Next inbound payload, `None` once the peer has closed the connection.
    /// Must be cancel safe.
    async fn next_message(&mut self) -> Option<Result<String>>;

    async fn close(&mut self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

pub struct WebSocketConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connector for WebSocketConnector {
    type Connection = WebSocketConnection;

    #[instrument(skip(self))]
    async fn connect(&self, url: &str) -> Result<WebSocketConnection> {
        let (stream, response) = connect_async(url).await.context(ConnectSnafu { url })?;
        debug!(status = %response.status(), "websocket handshake completed");
        Ok(WebSocketConnection { stream })
    }
}

#[async_trait]
impl Connection for WebSocketConnection {
    async fn next_message(&mut self) -> Option<Result<String>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(e).context(TransportSnafu)),
            };

            match message {
                Message::Text(text) => return Some(Ok(text.as_str().to_owned())),
                Message::Binary(bytes) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => return Some(Ok(text)),
                    Err(e) => warn!("dropping binary frame that is not utf-8: {e}"),
                },
                Message::Close(frame) => {
                    debug!(?frame, "peer closed websocket");
                    return None;
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!("websocket close handshake failed: {e}");
        }
    }
}
