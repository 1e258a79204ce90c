use std::sync::Arc;

use async_channel::Sender;
use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;
use crate::error::{invalid_state_error, Error};
use crate::map::{MapCanvas, MapState};

#[derive(Serialize, Deserialize)]
pub struct ClickParams {
    coordinates: Coordinates,
}

pub async fn find(Extension(canvas): Extension<Arc<MapCanvas>>) -> Json<MapState> {
    canvas.snapshot().into()
}

/// Queues a point selection; the drawn result shows up on `GET /map`.
pub async fn click(
    Extension(selections): Extension<Sender<Coordinates>>,
    Json(params): Json<ClickParams>,
) -> Result<StatusCode, Error> {
    selections
        .send(params.coordinates)
        .await
        .map_err(|_| invalid_state_error())?;

    Ok(StatusCode::ACCEPTED)
}
