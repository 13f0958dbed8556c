#![deny(rust_2018_idioms)]

//! Domain types and the pure parts of the live vessel pipeline: payload normalization, the
//! change-minimizing vessel store and screen-space marker clustering.

mod cluster;
mod domain;
mod error;
mod normalize;
mod ports;
mod store;

#[cfg(any(test, feature = "test"))]
mod test_helper;

pub use cluster::*;
pub use domain::*;
pub use error::*;
pub use normalize::*;
pub use ports::*;
pub use store::*;
