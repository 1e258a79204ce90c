use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedDestination {
    pub location: Coordinates,
    pub travel_time_in_seconds: u64,
}

/// Ordered stops handed to the route calculation: origin first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePath(Vec<Coordinates>);

impl RoutePath {
    pub fn new(origin: Coordinates, ranked: &[RankedDestination]) -> Self {
        let mut stops = Vec::with_capacity(ranked.len() + 1);
        stops.push(origin);
        stops.extend(ranked.iter().map(|r| r.location));

        Self(stops)
    }

    pub fn destinations(&self) -> &[Coordinates] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[Coordinates] {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub length_in_meters: u64,
    pub travel_time_in_seconds: u64,
}

/// Drawable route as returned by the routing service, kept as GeoJSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub geojson: serde_json::Value,
    pub summary: Option<RouteSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub token: Uuid,
    pub path: RoutePath,
    pub ranking: Vec<RankedDestination>,
    pub geometry: RouteGeometry,
    pub planned_at: DateTime<Utc>,
}

impl Route {
    pub fn new(path: RoutePath, ranking: Vec<RankedDestination>, geometry: RouteGeometry) -> Self {
        Self {
            token: Uuid::new_v4(),
            path,
            ranking,
            geometry,
            planned_at: Utc::now(),
        }
    }
}

#[test]
fn path_starts_at_origin() {
    let origin = Coordinates::new(-5.93, 54.5958);
    let ranked = vec![
        RankedDestination {
            location: Coordinates::new(-5.8, 54.5),
            travel_time_in_seconds: 300,
        },
        RankedDestination {
            location: Coordinates::new(-6.0, 54.6),
            travel_time_in_seconds: 500,
        },
    ];

    let path = RoutePath::new(origin, &ranked);

    assert_eq!(path.as_slice()[0], origin);
    assert_eq!(
        path.destinations(),
        &[Coordinates::new(-5.8, 54.5), Coordinates::new(-6.0, 54.6)]
    );
}
