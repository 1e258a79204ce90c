use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Coordinates, Session};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct UpdateOriginParams {
    longitude: String,
    latitude: String,
}

#[derive(Serialize, Deserialize)]
pub struct MoveOriginParams {
    coordinates: Coordinates,
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<Session>, Error> {
    let session = api.find_session().await?;

    Ok(session.into())
}

pub async fn update_origin(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<UpdateOriginParams>,
) -> Result<Json<Session>, Error> {
    let session = api
        .update_origin(params.longitude, params.latitude)
        .await?;

    Ok(session.into())
}

pub async fn move_origin(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<MoveOriginParams>,
) -> Result<Json<Session>, Error> {
    let session = api.move_origin(params.coordinates).await?;

    Ok(session.into())
}

pub async fn refresh(Extension(api): Extension<DynAPI>) -> Result<Json<Session>, Error> {
    let session = api.refresh().await?;

    Ok(session.into())
}
