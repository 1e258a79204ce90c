use super::{planner, Engine};

use async_trait::async_trait;

use crate::{
    api::RouteAPI,
    entities::{Coordinates, Route},
    error::Error,
};

#[async_trait]
impl RouteAPI for Engine {
    /// Plans a multi-stop route without touching the session or the map.
    #[tracing::instrument(skip(self))]
    async fn plan_route(
        &self,
        origin: Coordinates,
        destinations: Vec<Coordinates>,
    ) -> Result<Option<Route>, Error> {
        planner::plan(
            self.routing.as_ref(),
            origin,
            &destinations,
            self.routing_timeout,
        )
        .await
    }
}

#[tokio::test]
async fn plans_without_drawing() {
    use super::testing::TestBench;

    let far = Coordinates::new(-6.0, 54.6);
    let near = Coordinates::new(-5.8, 54.5);
    let bench = TestBench::new(vec![(far, 500), (near, 300)]).await;

    let route = bench
        .engine
        .plan_route(bench.origin, vec![far, near])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(route.path.destinations(), &[near, far]);
    assert_eq!(route.ranking[0].travel_time_in_seconds, 300);
    assert!(bench.canvas.snapshot().route.is_none());
}
