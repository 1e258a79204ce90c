mod destination_api;
mod geolocation;
pub mod planner;
mod route_api;
mod session_api;
#[cfg(test)]
mod testing;

pub use geolocation::GeolocationResolver;

use std::sync::Arc;
use std::time::Duration;

use async_channel::Receiver;
use futures::future::AbortHandle;
use tokio::sync::Mutex;

use crate::{
    api::API,
    entities::{Coordinates, Session},
    external::DynRoutingService,
    map::DynPresenter,
};

/// Session state plus the handle of the plan currently in flight for it.
struct Live {
    session: Session,
    in_flight: Option<AbortHandle>,
}

impl Live {
    fn supersede(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

pub struct Engine {
    live: Mutex<Live>,
    routing: DynRoutingService,
    resolver: GeolocationResolver,
    presenter: DynPresenter,
    routing_timeout: Duration,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(
        routing: DynRoutingService,
        resolver: GeolocationResolver,
        presenter: DynPresenter,
        routing_timeout: Duration,
    ) -> Self {
        let origin = resolver.resolve().await;
        presenter.show_origin(origin);

        tracing::info!("session started at {:?}", origin);

        Self {
            live: Mutex::new(Live {
                session: Session::new(origin),
                in_flight: None,
            }),
            routing,
            resolver,
            presenter,
            routing_timeout,
        }
    }

    /// Drains point-selection events. Each event is recorded in arrival
    /// order before its plan is spawned, so a later event always supersedes
    /// an earlier one still waiting on the router.
    pub async fn listen(self: Arc<Self>, selections: Receiver<Coordinates>) {
        while let Ok(point) = selections.recv().await {
            let pending = self.begin_selection(point).await;
            let engine = self.clone();

            tokio::spawn(async move {
                match engine.finish_selection(pending).await {
                    Ok(selection) if selection.is_superseded() => {
                        tracing::debug!("selection {:?} superseded", point)
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!("selection {:?} failed: {}", point, err),
                }
            });
        }

        tracing::info!("selection channel closed");
    }
}

impl API for Engine {}

#[tokio::test]
async fn listener_plans_each_selection() {
    use crate::engine::testing::TestBench;
    use crate::map::MapState;

    let first = Coordinates::new(-6.0, 54.6);
    let second = Coordinates::new(-5.8, 54.5);
    let bench = TestBench::new(vec![(first, 500), (second, 300)]).await;

    let (sender, receiver) = async_channel::unbounded();
    let listener = tokio::spawn(bench.engine.clone().listen(receiver));

    let routed_to = |state: &MapState, point: Coordinates| {
        state.route.as_ref().map(|layer| {
            layer.data["features"][0]["geometry"]["coordinates"][1]
                == serde_json::json!([point.lng, point.lat])
        }) == Some(true)
    };

    for point in [first, second] {
        sender.send(point).await.unwrap();

        let mut attempts = 0;
        while !routed_to(&bench.canvas.snapshot(), point) {
            attempts += 1;
            assert!(attempts < 200, "route to {:?} never drawn", point);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    sender.close();
    listener.await.unwrap();

    let state = bench.canvas.snapshot();
    assert_eq!(state.destination.unwrap().position, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn listener_keeps_last_of_a_burst() {
    use crate::engine::testing::TestBench;

    let points: Vec<Coordinates> = (0..200)
        .map(|i| Coordinates::new(i as f64 / 10.0, 54.5))
        .collect();
    let travel_times = points.iter().map(|point| (*point, 300)).collect();
    let bench = TestBench::new(travel_times).await;

    let (sender, receiver) = async_channel::unbounded();
    for point in &points {
        sender.send(*point).await.unwrap();
    }
    sender.close();

    bench.engine.clone().listen(receiver).await;

    let last = *points.last().unwrap();
    let session = bench.engine.live.lock().await.session.clone();
    assert_eq!(session.destinations.as_slice(), &[last]);
    assert_eq!(session.sequence, points.len() as u64);

    let mut attempts = 0;
    loop {
        let state = bench.canvas.snapshot();
        assert_eq!(state.destination.as_ref().unwrap().position, last);

        let drawn_last = state.route.as_ref().map(|layer| {
            layer.data["features"][0]["geometry"]["coordinates"][1]
                == serde_json::json!([last.lng, last.lat])
        });
        if drawn_last == Some(true) {
            break;
        }

        attempts += 1;
        assert!(attempts < 200, "route to the last point never drawn");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
