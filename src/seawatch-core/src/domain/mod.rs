mod connection;
mod geo;
mod risk;
mod vessel;

pub use connection::*;
pub use geo::*;
pub use risk::*;
pub use vessel::*;
