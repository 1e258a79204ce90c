use std::time::Duration;

use crate::{entities::Coordinates, external::DynGeolocator};

/// One best-effort position lookup, falling back to a fixed origin.
pub struct GeolocationResolver {
    geolocator: Option<DynGeolocator>,
    fallback: Coordinates,
    timeout: Duration,
}

impl GeolocationResolver {
    pub fn new(geolocator: Option<DynGeolocator>, fallback: Coordinates, timeout: Duration) -> Self {
        Self {
            geolocator,
            fallback,
            timeout,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self) -> Coordinates {
        let geolocator = match &self.geolocator {
            Some(geolocator) => geolocator,
            None => {
                tracing::debug!("no geolocator configured, using default origin");
                return self.fallback;
            }
        };

        match tokio::time::timeout(self.timeout, geolocator.locate()).await {
            Ok(Ok(coordinates)) => coordinates,
            Ok(Err(err)) => {
                tracing::debug!("geolocation failed: {}", err);
                self.fallback
            }
            Err(_) => {
                tracing::debug!("geolocation timed out after {:?}", self.timeout);
                self.fallback
            }
        }
    }
}

#[test]
fn resolves_live_position() {
    use super::testing::FixedGeolocator;
    use std::sync::Arc;
    use tokio_test::block_on;

    let resolver = GeolocationResolver::new(
        Some(Arc::new(FixedGeolocator(Ok(Coordinates::new(2.35, 48.85))))),
        Coordinates::new(-5.93, 54.5958),
        Duration::from_secs(1),
    );

    assert_eq!(block_on(resolver.resolve()), Coordinates::new(2.35, 48.85));
}

#[test]
fn falls_back_on_failure_or_absence() {
    use super::testing::FixedGeolocator;
    use crate::error::upstream_error;
    use std::sync::Arc;
    use tokio_test::block_on;

    let fallback = Coordinates::new(-5.93, 54.5958);

    let failing = GeolocationResolver::new(
        Some(Arc::new(FixedGeolocator(Err(upstream_error())))),
        fallback,
        Duration::from_secs(1),
    );
    assert_eq!(block_on(failing.resolve()), fallback);

    let absent = GeolocationResolver::new(None, fallback, Duration::from_secs(1));
    assert_eq!(block_on(absent.resolve()), fallback);
}

#[test]
fn falls_back_when_lookup_stalls() {
    use super::testing::StalledGeolocator;
    use std::sync::Arc;
    use tokio_test::block_on;

    let fallback = Coordinates::new(-5.93, 54.5958);
    let resolver = GeolocationResolver::new(
        Some(Arc::new(StalledGeolocator)),
        fallback,
        Duration::from_millis(20),
    );

    assert_eq!(block_on(resolver.resolve()), fallback);
}
