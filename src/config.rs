use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::{
    entities::Coordinates,
    error::{config_error, Error},
};

pub const DEFAULT_ORIGIN: Coordinates = Coordinates {
    lng: -5.93,
    lat: 54.5958,
};

#[derive(Clone, Debug)]
pub struct Config {
    pub tomtom_api_base: String,
    pub tomtom_api_key: String,
    pub routing_timeout: Duration,
    pub geolocation_api_url: Option<String>,
    pub geolocation_timeout: Duration,
    pub default_origin: Coordinates,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads the configuration from the process environment. Only
    /// `TOMTOM_API_KEY` is required.
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tomtom_api_key = lookup("TOMTOM_API_KEY").ok_or_else(|| config_error("TOMTOM_API_KEY"))?;
        let tomtom_api_base = lookup("TOMTOM_API_BASE").unwrap_or_else(|| "api.tomtom.com".into());

        let routing_timeout = Duration::from_secs(parse_or(&lookup, "ROUTING_TIMEOUT_SECS", 10)?);
        let geolocation_timeout =
            Duration::from_secs(parse_or(&lookup, "GEOLOCATION_TIMEOUT_SECS", 5)?);

        let default_origin = Coordinates::new(
            parse_or(&lookup, "DEFAULT_ORIGIN_LNG", DEFAULT_ORIGIN.lng)?,
            parse_or(&lookup, "DEFAULT_ORIGIN_LAT", DEFAULT_ORIGIN.lat)?,
        );

        let listen_addr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".into())
            .parse()?;

        Ok(Self {
            tomtom_api_base,
            tomtom_api_key,
            routing_timeout,
            geolocation_api_url: lookup("GEOLOCATION_API_URL").filter(|url| !url.is_empty()),
            geolocation_timeout,
            default_origin,
            listen_addr,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|_| config_error(name)),
        None => Ok(default),
    }
}

#[test]
fn defaults_apply_when_only_key_is_set() {
    let config = Config::from_lookup(|name| match name {
        "TOMTOM_API_KEY" => Some("secret".into()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.tomtom_api_base, "api.tomtom.com");
    assert_eq!(config.routing_timeout, Duration::from_secs(10));
    assert_eq!(config.default_origin, DEFAULT_ORIGIN);
    assert_eq!(config.listen_addr.port(), 3000);
    assert!(config.geolocation_api_url.is_none());
}

#[test]
fn missing_key_is_rejected() {
    let err = Config::from_lookup(|_| None).unwrap_err();
    assert_eq!(err.code, 2);
}

#[test]
fn malformed_number_is_rejected() {
    let result = Config::from_lookup(|name| match name {
        "TOMTOM_API_KEY" => Some("secret".into()),
        "ROUTING_TIMEOUT_SECS" => Some("soon".into()),
        _ => None,
    });

    assert!(result.is_err());
}
