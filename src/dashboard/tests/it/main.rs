#![deny(rust_2018_idioms)]

use config::{Config, File};
use dashboard::settings::{Environment, Settings};

pub mod helper;
pub mod overlays;
pub mod risk;

fn load(file: &str, environment: &str) -> Settings {
    Config::builder()
        .add_source(File::with_name(file).required(true))
        .set_override("environment", environment)
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap()
}

#[test]
fn test_local_settings_are_valid() {
    let settings = load("config/local.yml", "local");
    assert_eq!(settings.environment, Environment::Local);
    assert!(settings.streams.iter().any(|s| !s.enabled));
}

#[test]
fn test_development_settings_are_valid() {
    load("config/development.yml", "development");
}

#[test]
fn test_production_settings_are_valid() {
    let settings = load("config/production.yml", "production");
    assert_eq!(settings.environment, Environment::Production);
    assert_eq!(settings.http.timeout, std::time::Duration::from_secs(10));
}

#[test]
fn test_test_settings_are_valid() {
    let settings = load("config/test.yml", "test");
    assert!(settings.streams.is_empty());
}
