pub mod ip_geolocation;
pub mod tomtom;

use async_trait::async_trait;

use crate::{
    entities::{Coordinates, RouteGeometry},
    error::Error,
};

/// Travel times in seconds, one row per origin and one column per
/// destination. A cell the service could not route is `None`.
pub type TravelTimeMatrix = Vec<Vec<Option<u64>>>;

#[async_trait]
pub trait RoutingService {
    async fn matrix_routing(
        &self,
        origins: &[Coordinates],
        destinations: &[Coordinates],
    ) -> Result<TravelTimeMatrix, Error>;

    async fn calculate_route(&self, locations: &[Coordinates]) -> Result<RouteGeometry, Error>;
}

#[async_trait]
pub trait Geolocator {
    async fn locate(&self) -> Result<Coordinates, Error>;
}

pub type DynRoutingService = std::sync::Arc<dyn RoutingService + Send + Sync>;
pub type DynGeolocator = std::sync::Arc<dyn Geolocator + Send + Sync>;
