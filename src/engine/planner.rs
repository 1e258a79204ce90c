//! Orders destinations by drive time from the origin and asks the routing
//! service for one route through them in that order.

use std::future::Future;
use std::time::Duration;

use crate::{
    entities::{Coordinates, RankedDestination, Route, RoutePath},
    error::{routing_unavailable_error, Error},
    external::RoutingService,
};

/// Plans a route from `origin` through every destination, nearest by drive
/// time first. Returns `None` without calling the service when there is
/// nothing to visit.
#[tracing::instrument(skip(routing))]
pub async fn plan(
    routing: &(dyn RoutingService + Send + Sync),
    origin: Coordinates,
    destinations: &[Coordinates],
    timeout: Duration,
) -> Result<Option<Route>, Error> {
    if destinations.is_empty() {
        return Ok(None);
    }

    let ranking = rank(routing, origin, destinations, timeout).await?;
    let path = RoutePath::new(origin, &ranking);

    let geometry = bounded(timeout, routing.calculate_route(path.as_slice())).await?;

    Ok(Some(Route::new(path, ranking, geometry)))
}

/// Pairs each destination with its matrix travel time and sorts ascending.
/// Equal travel times keep their input order.
pub async fn rank(
    routing: &(dyn RoutingService + Send + Sync),
    origin: Coordinates,
    destinations: &[Coordinates],
    timeout: Duration,
) -> Result<Vec<RankedDestination>, Error> {
    let matrix = bounded(timeout, routing.matrix_routing(&[origin], destinations)).await?;

    let row = matrix
        .into_iter()
        .next()
        .ok_or_else(routing_unavailable_error)?;

    if row.len() != destinations.len() {
        tracing::warn!(
            "matrix returned {} cells for {} destinations",
            row.len(),
            destinations.len()
        );
        return Err(routing_unavailable_error());
    }

    let mut ranking = destinations
        .iter()
        .zip(row)
        .map(|(location, travel_time)| {
            travel_time
                .map(|travel_time_in_seconds| RankedDestination {
                    location: *location,
                    travel_time_in_seconds,
                })
                .ok_or_else(routing_unavailable_error)
        })
        .collect::<Result<Vec<_>, Error>>()?;

    ranking.sort_by_key(|ranked| ranked.travel_time_in_seconds);

    Ok(ranking)
}

async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            tracing::warn!("routing service failed: {}", err);
            Err(routing_unavailable_error())
        }
        Err(_) => {
            tracing::warn!("routing service timed out after {:?}", timeout);
            Err(routing_unavailable_error())
        }
    }
}

#[test]
fn orders_destinations_by_travel_time() {
    use super::testing::MockRouting;
    use tokio_test::block_on;

    let origin = Coordinates::new(-5.93, 54.5958);
    let far = Coordinates::new(-6.0, 54.6);
    let near = Coordinates::new(-5.8, 54.5);
    let routing = MockRouting::new(vec![(far, 500), (near, 300)]);

    let route = block_on(plan(&routing, origin, &[far, near], Duration::from_secs(1)))
        .unwrap()
        .unwrap();

    assert_eq!(route.path.as_slice(), &[origin, near, far]);
    assert_eq!(routing.matrix_calls(), vec![vec![far, near]]);
    assert_eq!(routing.route_calls(), vec![vec![origin, near, far]]);
}

#[test]
fn equal_travel_times_keep_input_order() {
    use super::testing::MockRouting;
    use tokio_test::block_on;

    let origin = Coordinates::new(0.0, 0.0);
    let destinations: Vec<Coordinates> = (0..6).map(|i| Coordinates::new(i as f64, 1.0)).collect();
    let times: [u64; 6] = [120, 60, 120, 60, 30, 120];
    let routing = MockRouting::new(destinations.iter().copied().zip(times).collect());

    let ranking = block_on(rank(&routing, origin, &destinations, Duration::from_secs(1))).unwrap();

    let order: Vec<f64> = ranking.iter().map(|r| r.location.lng).collect();
    assert_eq!(order, vec![4.0, 1.0, 3.0, 0.0, 2.0, 5.0]);
    assert!(ranking
        .windows(2)
        .all(|pair| pair[0].travel_time_in_seconds <= pair[1].travel_time_in_seconds));
}

#[test]
fn empty_destinations_make_no_calls() {
    use super::testing::MockRouting;
    use tokio_test::block_on;

    let routing = MockRouting::new(vec![]);

    let route = block_on(plan(
        &routing,
        Coordinates::new(-5.93, 54.5958),
        &[],
        Duration::from_secs(1),
    ))
    .unwrap();

    assert!(route.is_none());
    assert!(routing.matrix_calls().is_empty());
    assert!(routing.route_calls().is_empty());
}

#[test]
fn matrix_failure_is_routing_unavailable() {
    use super::testing::MockRouting;
    use tokio_test::block_on;

    let destination = Coordinates::new(-6.0, 54.6);
    let routing = MockRouting::new(vec![(destination, 500)]).failing_matrix();

    let err = block_on(plan(
        &routing,
        Coordinates::new(-5.93, 54.5958),
        &[destination],
        Duration::from_secs(1),
    ))
    .unwrap_err();

    assert!(err.is_routing_unavailable());
    assert!(routing.route_calls().is_empty());
}

#[test]
fn incomplete_matrix_is_routing_unavailable() {
    use super::testing::MockRouting;
    use tokio_test::block_on;

    let known = Coordinates::new(-6.0, 54.6);
    let unknown = Coordinates::new(-5.8, 54.5);
    let routing = MockRouting::new(vec![(known, 500)]);

    let err = block_on(plan(
        &routing,
        Coordinates::new(-5.93, 54.5958),
        &[known, unknown],
        Duration::from_secs(1),
    ))
    .unwrap_err();

    assert!(err.is_routing_unavailable());
    assert!(routing.route_calls().is_empty());
}

#[test]
fn route_failure_is_routing_unavailable() {
    use super::testing::MockRouting;
    use tokio_test::block_on;

    let destination = Coordinates::new(-6.0, 54.6);
    let routing = MockRouting::new(vec![(destination, 500)]).failing_route();

    let err = block_on(plan(
        &routing,
        Coordinates::new(-5.93, 54.5958),
        &[destination],
        Duration::from_secs(1),
    ))
    .unwrap_err();

    assert!(err.is_routing_unavailable());
}
