use geo_types::LineString;
use serde::{Deserialize, Serialize};
use serde_json::json;

use async_trait::async_trait;

use super::{RoutingService, TravelTimeMatrix};
use crate::{
    config::Config,
    entities::{Coordinates, RouteGeometry, RouteSummary},
    error::{invalid_input_error, upstream_error, Error},
};

#[derive(Clone, Debug)]
pub struct TomTom {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

impl TomTom {
    pub fn new(api_base: String, key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tomtom_api_base.clone(), config.tomtom_api_key.clone())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Point {
    latitude: f64,
    longitude: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Waypoint {
    point: Point,
}

impl From<&Coordinates> for Waypoint {
    fn from(coordinates: &Coordinates) -> Self {
        Self {
            point: Point {
                latitude: coordinates.lat,
                longitude: coordinates.lng,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct MatrixRequest {
    origins: Vec<Waypoint>,
    destinations: Vec<Waypoint>,
}

#[derive(Clone, Debug, Deserialize)]
struct MatrixResponse {
    matrix: Vec<Vec<MatrixCell>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixCell {
    status_code: u16,
    response: Option<MatrixCellResponse>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixCellResponse {
    route_summary: Option<MatrixRouteSummary>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixRouteSummary {
    travel_time_in_seconds: u64,
}

#[derive(Clone, Debug, Deserialize)]
struct CalculateRouteResponse {
    routes: Vec<RouteData>,
}

#[derive(Clone, Debug, Deserialize)]
struct RouteData {
    summary: RouteSummary,
    legs: Vec<Leg>,
}

#[derive(Clone, Debug, Deserialize)]
struct Leg {
    points: Vec<Point>,
}

fn into_travel_times(response: MatrixResponse) -> TravelTimeMatrix {
    response
        .matrix
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match (cell.status_code, cell.response) {
                    (200, Some(MatrixCellResponse { route_summary: Some(summary) })) => {
                        Some(summary.travel_time_in_seconds)
                    }
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn into_geometry(response: CalculateRouteResponse) -> Result<RouteGeometry, Error> {
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(upstream_error)?;

    let line: LineString<f64> = route
        .legs
        .iter()
        .flat_map(|leg| leg.points.iter())
        .map(|point| (point.longitude, point.latitude))
        .collect();

    let coordinates: Vec<[f64; 2]> = line.coords().map(|c| [c.x, c.y]).collect();

    let geojson = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates,
            },
            "properties": {
                "summary": route.summary,
            },
        }],
    });

    Ok(RouteGeometry {
        geojson,
        summary: Some(route.summary),
    })
}

fn check_status(res: &reqwest::Response) -> Result<(), Error> {
    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    Ok(())
}

#[async_trait]
impl RoutingService for TomTom {
    #[tracing::instrument(skip(self))]
    async fn matrix_routing(
        &self,
        origins: &[Coordinates],
        destinations: &[Coordinates],
    ) -> Result<TravelTimeMatrix, Error> {
        let url = format!("https://{}/routing/1/matrix/sync/json", self.api_base);

        let body = MatrixRequest {
            origins: origins.iter().map(Waypoint::from).collect(),
            destinations: destinations.iter().map(Waypoint::from).collect(),
        };

        let res = self
            .client
            .post(url)
            .query(&[("key", &self.key)])
            .json(&body)
            .send()
            .await?;

        check_status(&res)?;

        let data: MatrixResponse = res.json().await?;

        Ok(into_travel_times(data))
    }

    #[tracing::instrument(skip(self))]
    async fn calculate_route(&self, locations: &[Coordinates]) -> Result<RouteGeometry, Error> {
        if locations.len() < 2 {
            return Err(invalid_input_error());
        }

        let locations: Vec<String> = locations.iter().map(|c| String::from(*c)).collect();
        let url = format!(
            "https://{}/routing/1/calculateRoute/{}/json",
            self.api_base,
            locations.join(":")
        );

        let res = self
            .client
            .get(url)
            .query(&[("key", &self.key)])
            .send()
            .await?;

        check_status(&res)?;

        let data: CalculateRouteResponse = res.json().await?;

        into_geometry(data)
    }
}

#[test]
fn matrix_cells_without_summary_are_missing() {
    let response: MatrixResponse = serde_json::from_value(json!({
        "formatVersion": "0.0.1",
        "matrix": [[
            {
                "statusCode": 200,
                "response": { "routeSummary": { "lengthInMeters": 4120, "travelTimeInSeconds": 500 } }
            },
            {
                "statusCode": 400,
                "response": { "errorText": "Engine error while executing route request" }
            },
            {
                "statusCode": 200,
                "response": { "routeSummary": { "lengthInMeters": 2003, "travelTimeInSeconds": 300 } }
            }
        ]]
    }))
    .unwrap();

    assert_eq!(
        into_travel_times(response),
        vec![vec![Some(500), None, Some(300)]]
    );
}

#[test]
fn route_legs_become_one_line_string() {
    let response: CalculateRouteResponse = serde_json::from_value(json!({
        "routes": [{
            "summary": { "lengthInMeters": 5200, "travelTimeInSeconds": 640, "trafficDelayInSeconds": 0 },
            "legs": [
                { "points": [
                    { "latitude": 54.5958, "longitude": -5.93 },
                    { "latitude": 54.55, "longitude": -5.87 }
                ] },
                { "points": [
                    { "latitude": 54.55, "longitude": -5.87 },
                    { "latitude": 54.5, "longitude": -5.8 }
                ] }
            ]
        }]
    }))
    .unwrap();

    let geometry = into_geometry(response).unwrap();

    assert_eq!(
        geometry.summary,
        Some(RouteSummary {
            length_in_meters: 5200,
            travel_time_in_seconds: 640,
        })
    );

    let feature = &geometry.geojson["features"][0];
    assert_eq!(feature["geometry"]["type"], "LineString");
    assert_eq!(feature["geometry"]["coordinates"][0], json!([-5.93, 54.5958]));
    assert_eq!(feature["geometry"]["coordinates"][3], json!([-5.8, 54.5]));
}

#[test]
fn empty_route_list_is_upstream_error() {
    let response = CalculateRouteResponse { routes: vec![] };

    assert_eq!(into_geometry(response).unwrap_err(), upstream_error());
}
