use super::Engine;

use async_trait::async_trait;

use crate::{
    api::SessionAPI,
    entities::{Coordinates, Session},
    error::Error,
};

impl Engine {
    async fn relocate(&self, origin: Coordinates) -> Session {
        let mut live = self.live.lock().await;
        live.supersede();
        live.session.move_origin(origin);

        self.presenter.show_origin(origin);

        live.session.clone()
    }
}

#[async_trait]
impl SessionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_session(&self) -> Result<Session, Error> {
        Ok(self.live.lock().await.session.clone())
    }

    /// Form submission: both fields must parse and lie in [-90, 90].
    #[tracing::instrument(skip(self))]
    async fn update_origin(&self, longitude: String, latitude: String) -> Result<Session, Error> {
        let origin = Coordinates::parse_input(&longitude, &latitude)?;

        Ok(self.relocate(origin).await)
    }

    #[tracing::instrument(skip(self))]
    async fn move_origin(&self, origin: Coordinates) -> Result<Session, Error> {
        Ok(self.relocate(origin).await)
    }

    #[tracing::instrument(skip(self))]
    async fn refresh(&self) -> Result<Session, Error> {
        let origin = self.resolver.resolve().await;

        Ok(self.relocate(origin).await)
    }
}

#[tokio::test]
async fn origin_input_boundary() {
    use super::testing::TestBench;

    let bench = TestBench::new(vec![]).await;

    let err = bench
        .engine
        .update_origin("91".into(), "54.5958".into())
        .await
        .unwrap_err();
    assert_eq!(err.code, 101);
    assert_eq!(bench.engine.find_session().await.unwrap().origin, bench.origin);

    let session = bench
        .engine
        .update_origin("90".into(), "54.5958".into())
        .await
        .unwrap();
    assert_eq!(session.origin, Coordinates::new(90.0, 54.5958));
}

#[tokio::test]
async fn new_origin_clears_destination_and_route() {
    use super::testing::TestBench;
    use crate::api::DestinationAPI;

    let destination = Coordinates::new(-6.0, 54.6);
    let bench = TestBench::new(vec![(destination, 500)]).await;
    bench.engine.select_destination(destination).await.unwrap();

    let dragged = Coordinates::new(-5.95, 54.59);
    let session = bench.engine.move_origin(dragged).await.unwrap();

    assert_eq!(session.origin, dragged);
    assert!(session.destinations.is_empty());

    let state = bench.canvas.snapshot();
    assert_eq!(state.origin.unwrap().position, dragged);
    assert!(state.destination.is_none());
    assert!(state.route.is_none());
}

#[tokio::test]
async fn refresh_resolves_position_again() {
    use super::testing::{FixedGeolocator, MockRouting, TestBench};
    use std::sync::Arc;

    let located = Coordinates::new(2.35, 48.85);
    let bench = TestBench::with_geolocator(
        MockRouting::new(vec![]),
        TestBench::canvas(),
        Some(Arc::new(FixedGeolocator(Ok(located)))),
    )
    .await;
    assert_eq!(bench.origin, located);

    bench
        .engine
        .update_origin("10".into(), "20".into())
        .await
        .unwrap();

    let session = bench.engine.refresh().await.unwrap();
    assert_eq!(session.origin, located);
    assert!(session.destinations.is_empty());
    assert_eq!(bench.canvas.snapshot().view.center, located);
}
