use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Coordinates, Route};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct PlanParams {
    origin: Coordinates,
    destinations: Vec<Coordinates>,
}

pub async fn plan(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<PlanParams>,
) -> Result<Json<Option<Route>>, Error> {
    let route = api.plan_route(params.origin, params.destinations).await?;

    Ok(route.into())
}
