use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{Coordinates, Route, Selection, Session};
use crate::error::Error;

#[async_trait]
pub trait SessionAPI {
    async fn find_session(&self) -> Result<Session, Error>;
    async fn update_origin(&self, longitude: String, latitude: String) -> Result<Session, Error>;
    async fn move_origin(&self, origin: Coordinates) -> Result<Session, Error>;
    async fn refresh(&self) -> Result<Session, Error>;
}

#[async_trait]
pub trait DestinationAPI {
    async fn select_destination(&self, point: Coordinates) -> Result<Selection, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn plan_route(
        &self,
        origin: Coordinates,
        destinations: Vec<Coordinates>,
    ) -> Result<Option<Route>, Error>;
}

pub trait API: SessionAPI + DestinationAPI + RouteAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
