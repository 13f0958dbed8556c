use reqwest::StatusCode;
use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to build HTTP client"))]
    Build {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
    #[snafu(display("Failed to send HTTP request"))]
    Send {
        #[snafu(implicit)]
        location: Location,
        source: reqwest_middleware::Error,
    },
    #[snafu(display("Failed to read HTTP response body"))]
    Body {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
    #[snafu(display("HTTP request failed, status: '{status}', url: '{url}', body: '{body}'"))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: StatusCode,
        body: String,
    },
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::FailedRequest { status, .. } => Some(*status),
            Error::Build { .. } | Error::Send { .. } | Error::Body { .. } => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Error::FailedRequest { body, .. } => Some(body),
            Error::Build { .. } | Error::Send { .. } | Error::Body { .. } => None,
        }
    }
}
