use super::{planner, Engine};

use async_trait::async_trait;
use futures::future::{AbortHandle, AbortRegistration, Abortable};

use crate::{
    api::DestinationAPI,
    entities::{Coordinates, Selection},
    error::Error,
};

/// A selection already recorded in the session whose route is still to be
/// planned.
pub(super) struct PendingSelection {
    ticket: u64,
    origin: Coordinates,
    destinations: Vec<Coordinates>,
    registration: AbortRegistration,
}

impl Engine {
    /// Records the selection, cancels the plan in flight and shows the
    /// marker. Tickets are handed out in call order.
    pub(super) async fn begin_selection(&self, point: Coordinates) -> PendingSelection {
        let mut live = self.live.lock().await;
        live.supersede();

        let ticket = live.session.select(point);
        let (handle, registration) = AbortHandle::new_pair();
        live.in_flight = Some(handle);

        self.presenter.show_destination(point);

        PendingSelection {
            ticket,
            origin: live.session.origin,
            destinations: live.session.destinations.to_vec(),
            registration,
        }
    }

    /// Plans the pending selection and draws it if no newer one replaced it.
    pub(super) async fn finish_selection(
        &self,
        pending: PendingSelection,
    ) -> Result<Selection, Error> {
        let PendingSelection {
            ticket,
            origin,
            destinations,
            registration,
        } = pending;

        let planning = planner::plan(
            self.routing.as_ref(),
            origin,
            &destinations,
            self.routing_timeout,
        );

        let planned = match Abortable::new(planning, registration).await {
            Ok(planned) => planned,
            Err(_) => {
                tracing::info!("plan {} cancelled by a newer selection", ticket);
                return Ok(Selection::Superseded);
            }
        };

        let mut live = self.live.lock().await;

        if !live.session.is_current(ticket) {
            tracing::info!("plan {} finished after being superseded", ticket);
            return Ok(Selection::Superseded);
        }

        live.in_flight = None;

        match planned {
            Ok(Some(route)) => {
                self.presenter.draw_route(&route);
                Ok(Selection::Routed(route))
            }
            Ok(None) => Ok(Selection::Empty),
            Err(err) => {
                self.presenter.alert(err.message.clone());
                Err(err)
            }
        }
    }
}

#[async_trait]
impl DestinationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn select_destination(&self, point: Coordinates) -> Result<Selection, Error> {
        let pending = self.begin_selection(point).await;

        self.finish_selection(pending).await
    }
}

#[tokio::test]
async fn scenario_routes_nearest_destination_first() {
    use super::testing::TestBench;

    let near = Coordinates::new(-5.8, 54.5);
    let bench = TestBench::new(vec![(near, 300)]).await;

    let selection = bench.engine.select_destination(near).await.unwrap();

    let route = selection.route().unwrap();
    assert_eq!(route.path.as_slice(), &[bench.origin, near]);

    let state = bench.canvas.snapshot();
    assert_eq!(state.destination.unwrap().position, near);
    assert_eq!(state.route.unwrap().route_token, route.token);
}

#[tokio::test]
async fn new_selection_replaces_marker_and_route() {
    use super::testing::TestBench;

    let first = Coordinates::new(-6.0, 54.6);
    let second = Coordinates::new(-5.8, 54.5);
    let bench = TestBench::new(vec![(first, 500), (second, 300)]).await;

    bench.engine.select_destination(first).await.unwrap();
    let selection = bench.engine.select_destination(second).await.unwrap();

    let state = bench.canvas.snapshot();
    assert_eq!(state.destination.unwrap().position, second);
    assert_eq!(
        state.route.unwrap().route_token,
        selection.route().unwrap().token
    );

    let session = bench.engine.live.lock().await.session.clone();
    assert_eq!(session.destinations.as_slice(), &[second]);
    assert_eq!(bench.routing.matrix_calls(), vec![vec![first], vec![second]]);
}

#[tokio::test]
async fn matrix_rejection_keeps_previous_route() {
    use super::testing::{MockRouting, TestBench};

    let first = Coordinates::new(-6.0, 54.6);
    let second = Coordinates::new(-5.8, 54.5);
    let routing = MockRouting::new(vec![(first, 500), (second, 300)]).rejecting(second);
    let bench = TestBench::with_routing(routing, TestBench::canvas()).await;

    let selection = bench.engine.select_destination(first).await.unwrap();
    let err = bench.engine.select_destination(second).await.unwrap_err();
    assert!(err.is_routing_unavailable());

    let state = bench.canvas.snapshot();
    assert_eq!(
        state.route.unwrap().route_token,
        selection.route().unwrap().token
    );
    assert_eq!(state.alert.unwrap().message, "routing unavailable");
    assert_eq!(bench.routing.route_calls(), vec![vec![bench.origin, first]]);
}

#[tokio::test]
async fn failed_reroute_leaves_drawn_route_in_place() {
    use super::testing::TestBench;

    let reachable = Coordinates::new(-6.0, 54.6);
    let unreachable = Coordinates::new(40.0, 40.0);
    let bench = TestBench::new(vec![(reachable, 500)]).await;

    let selection = bench.engine.select_destination(reachable).await.unwrap();
    let err = bench.engine.select_destination(unreachable).await.unwrap_err();
    assert!(err.is_routing_unavailable());

    let state = bench.canvas.snapshot();
    assert_eq!(
        state.route.unwrap().route_token,
        selection.route().unwrap().token
    );
    assert!(state.alert.is_some());
}

#[tokio::test]
async fn newer_selection_cancels_plan_in_flight() {
    use super::testing::{Hold, MockRouting, TestBench};
    use std::sync::Arc;
    use tokio::sync::Notify;

    let slow = Coordinates::new(-6.0, 54.6);
    let fast = Coordinates::new(-5.8, 54.5);
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());

    let routing = MockRouting::new(vec![(slow, 500), (fast, 300)]).holding(Hold {
        point: slow,
        entered: entered.clone(),
        release: release.clone(),
    });
    let bench = TestBench::with_routing(routing, TestBench::canvas()).await;

    let engine = bench.engine.clone();
    let pending = tokio::spawn(async move { engine.select_destination(slow).await });

    entered.notified().await;

    let selection = bench.engine.select_destination(fast).await.unwrap();
    release.notify_one();

    let stale = pending.await.unwrap().unwrap();
    assert!(stale.is_superseded());

    let state = bench.canvas.snapshot();
    assert_eq!(state.destination.unwrap().position, fast);
    assert_eq!(
        state.route.unwrap().route_token,
        selection.route().unwrap().token
    );
    assert_eq!(bench.routing.route_calls(), vec![vec![bench.origin, fast]]);
}
