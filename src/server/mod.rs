mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use async_channel::Sender;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::DynAPI;
use crate::entities::Coordinates;
use crate::error::{unexpected_error, Error};
use crate::map::MapCanvas;
use crate::server::handlers::{destinations, map, routes, session};

pub fn router(api: DynAPI, canvas: Arc<MapCanvas>, selections: Sender<Coordinates>) -> Router {
    Router::new()
        .route("/session", get(session::find))
        .route("/origin", post(session::update_origin).patch(session::move_origin))
        .route("/refresh", post(session::refresh))
        .route("/destinations", post(destinations::select))
        .route("/map", get(map::find))
        .route("/map/clicks", post(map::click))
        .route("/routes", post(routes::plan))
        .layer(Extension(api))
        .layer(Extension(canvas))
        .layer(Extension(selections))
}

pub async fn serve(
    api: DynAPI,
    canvas: Arc<MapCanvas>,
    selections: Sender<Coordinates>,
    addr: SocketAddr,
) -> Result<(), Error> {
    let app = router(api, canvas, selections);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}
