use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Geolocator;
use crate::{
    entities::Coordinates,
    error::{upstream_error, Error},
};

/// Looks the caller up through an IP geolocation endpoint returning
/// `{ "status": "success", "lat": .., "lon": .. }`.
#[derive(Clone, Debug)]
pub struct IpGeolocator {
    client: reqwest::Client,
    url: String,
}

impl IpGeolocator {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

fn into_coordinates(data: Response) -> Result<Coordinates, Error> {
    if let Some(status) = &data.status {
        if status != "success" {
            return Err(upstream_error());
        }
    }

    match (data.lon, data.lat) {
        (Some(lng), Some(lat)) => Ok(Coordinates::new(lng, lat)),
        _ => Err(upstream_error()),
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    #[tracing::instrument(skip(self))]
    async fn locate(&self) -> Result<Coordinates, Error> {
        let res = self.client.get(&self.url).send().await?;

        if res.status().as_u16() != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        into_coordinates(data)
    }
}

#[test]
fn failed_lookup_is_an_error() {
    let data: Response = serde_json::from_str(r#"{"status":"fail","message":"private range"}"#).unwrap();
    assert!(into_coordinates(data).is_err());

    let data: Response = serde_json::from_str(r#"{"status":"success","lat":54.5958}"#).unwrap();
    assert!(into_coordinates(data).is_err());
}

#[test]
fn lookup_reads_lat_lon() {
    let data: Response =
        serde_json::from_str(r#"{"status":"success","lat":54.5958,"lon":-5.93,"city":"Belfast"}"#)
            .unwrap();

    assert_eq!(into_coordinates(data).unwrap(), Coordinates::new(-5.93, 54.5958));
}
