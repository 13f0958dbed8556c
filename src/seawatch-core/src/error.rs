use snafu::{Location, Snafu};

use crate::Mmsi;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum NormalizeError {
    #[snafu(display("Payload is not valid json"))]
    MalformedJson {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
    #[snafu(display("Payload is not a json object"))]
    NotAnObject {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Payload carries no valid vessel identity"))]
    MissingIdentity {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Vessel '{mmsi}' has no usable coordinates"))]
    MissingCoordinates {
        #[snafu(implicit)]
        location: Location,
        mmsi: Mmsi,
    },
}
