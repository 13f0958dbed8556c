#![deny(rust_2018_idioms)]

//! Composes the live vessel streams, map overlays and the port risk dashboard into one
//! headless application.

pub mod composition;
pub mod error;
pub mod headless;
pub mod overlays;
pub mod risk;
pub mod settings;
pub mod startup;
pub mod status;
pub mod telemetry;
