use snafu::{Location, Snafu};
use tokio_tungstenite::tungstenite;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to connect to '{url}'"))]
    Connect {
        #[snafu(implicit)]
        location: Location,
        url: String,
        source: tungstenite::Error,
    },
    #[snafu(display("Stream transport failed"))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        source: tungstenite::Error,
    },
    #[cfg(feature = "test")]
    #[snafu(display("Stream endpoint refused the connection: {reason}"))]
    Refused {
        #[snafu(implicit)]
        location: Location,
        reason: String,
    },
}

impl Error {
    /// Message shown to users next to an errored stream.
    pub fn status_message(&self) -> String {
        match self {
            Error::Connect { url, source, .. } => format!("failed to connect to {url}: {source}"),
            Error::Transport { source, .. } => format!("connection lost: {source}"),
            #[cfg(feature = "test")]
            Error::Refused { reason, .. } => reason.clone(),
        }
    }
}
