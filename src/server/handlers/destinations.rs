use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Coordinates, Selection};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct SelectParams {
    coordinates: Coordinates,
}

pub async fn select(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SelectParams>,
) -> Result<Json<Selection>, Error> {
    let selection = api.select_destination(params.coordinates).await?;

    Ok(selection.into())
}
