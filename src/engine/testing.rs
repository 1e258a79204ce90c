use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use crate::{
    config::DEFAULT_ORIGIN,
    engine::{Engine, GeolocationResolver},
    entities::{Coordinates, RouteGeometry},
    error::{upstream_error, Error},
    external::{DynGeolocator, Geolocator, RoutingService, TravelTimeMatrix},
    map::MapCanvas,
};

/// Parks matrix requests that include `point` until released.
pub struct Hold {
    pub point: Coordinates,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

pub struct MockRouting {
    travel_times: Vec<(Coordinates, u64)>,
    fail_matrix: bool,
    rejected: Vec<Coordinates>,
    fail_route: bool,
    hold: Option<Hold>,
    matrix_calls: Mutex<Vec<Vec<Coordinates>>>,
    route_calls: Mutex<Vec<Vec<Coordinates>>>,
}

impl MockRouting {
    pub fn new(travel_times: Vec<(Coordinates, u64)>) -> Self {
        Self {
            travel_times,
            fail_matrix: false,
            rejected: vec![],
            fail_route: false,
            hold: None,
            matrix_calls: Mutex::new(vec![]),
            route_calls: Mutex::new(vec![]),
        }
    }

    pub fn failing_matrix(mut self) -> Self {
        self.fail_matrix = true;
        self
    }

    pub fn rejecting(mut self, point: Coordinates) -> Self {
        self.rejected.push(point);
        self
    }

    pub fn failing_route(mut self) -> Self {
        self.fail_route = true;
        self
    }

    pub fn holding(mut self, hold: Hold) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn matrix_calls(&self) -> Vec<Vec<Coordinates>> {
        self.matrix_calls.lock().unwrap().clone()
    }

    pub fn route_calls(&self) -> Vec<Vec<Coordinates>> {
        self.route_calls.lock().unwrap().clone()
    }

    fn travel_time(&self, destination: &Coordinates) -> Option<u64> {
        self.travel_times
            .iter()
            .find(|(location, _)| location == destination)
            .map(|(_, seconds)| *seconds)
    }
}

#[async_trait]
impl RoutingService for MockRouting {
    async fn matrix_routing(
        &self,
        _origins: &[Coordinates],
        destinations: &[Coordinates],
    ) -> Result<TravelTimeMatrix, Error> {
        self.matrix_calls.lock().unwrap().push(destinations.to_vec());

        if let Some(hold) = &self.hold {
            if destinations.contains(&hold.point) {
                hold.entered.notify_one();
                hold.release.notified().await;
            }
        }

        if self.fail_matrix || destinations.iter().any(|d| self.rejected.contains(d)) {
            return Err(upstream_error());
        }

        Ok(vec![destinations
            .iter()
            .map(|destination| self.travel_time(destination))
            .collect()])
    }

    async fn calculate_route(&self, locations: &[Coordinates]) -> Result<RouteGeometry, Error> {
        self.route_calls.lock().unwrap().push(locations.to_vec());

        if self.fail_route {
            return Err(upstream_error());
        }

        let coordinates: Vec<[f64; 2]> = locations.iter().map(|c| [c.lng, c.lat]).collect();

        Ok(RouteGeometry {
            geojson: json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "LineString", "coordinates": coordinates },
                    "properties": {},
                }],
            }),
            summary: None,
        })
    }
}

pub struct FixedGeolocator(pub Result<Coordinates, Error>);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<Coordinates, Error> {
        self.0.clone()
    }
}

pub struct StalledGeolocator;

#[async_trait]
impl Geolocator for StalledGeolocator {
    async fn locate(&self) -> Result<Coordinates, Error> {
        futures::future::pending().await
    }
}

/// Engine wired to a mock router and an in-memory canvas, starting at the
/// default origin.
pub struct TestBench {
    pub engine: Arc<Engine>,
    pub routing: Arc<MockRouting>,
    pub canvas: Arc<MapCanvas>,
    pub origin: Coordinates,
}

impl TestBench {
    pub async fn new(travel_times: Vec<(Coordinates, u64)>) -> Self {
        Self::with_routing(MockRouting::new(travel_times), Self::canvas()).await
    }

    pub fn canvas() -> Arc<MapCanvas> {
        Arc::new(MapCanvas::new(DEFAULT_ORIGIN))
    }

    pub async fn with_routing(routing: MockRouting, canvas: Arc<MapCanvas>) -> Self {
        Self::with_geolocator(routing, canvas, None).await
    }

    pub async fn with_geolocator(
        routing: MockRouting,
        canvas: Arc<MapCanvas>,
        geolocator: Option<DynGeolocator>,
    ) -> Self {
        let routing = Arc::new(routing);
        let resolver = GeolocationResolver::new(geolocator, DEFAULT_ORIGIN, Duration::from_secs(1));

        let engine = Engine::new(
            routing.clone(),
            resolver,
            canvas.clone(),
            Duration::from_secs(1),
        )
        .await;
        let origin = engine.live.lock().await.session.origin;

        Self {
            engine: Arc::new(engine),
            routing,
            origin,
            canvas,
        }
    }
}
