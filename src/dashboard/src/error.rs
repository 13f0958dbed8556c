use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to construct the HTTP client"))]
    HttpClient {
        #[snafu(implicit)]
        location: Location,
        source: http_client::Error,
    },
    #[snafu(display("Failed to listen for the shutdown signal"))]
    Signal {
        #[snafu(implicit)]
        location: Location,
        source: std::io::Error,
    },
}
